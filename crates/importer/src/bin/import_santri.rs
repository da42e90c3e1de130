use clap::Parser;
use database::db::connect_and_migrate;
use importer::{ImportOptions, import_file};
use log::error;
use std::{path::PathBuf, process::ExitCode, time::Duration};

/// Imports santri records from a CSV export into the database
#[derive(Debug, Parser)]
#[command(name = "import-santri", version)]
struct Args {
    /// CSV file with a header row
    csv_path: PathBuf,

    /// Rows written per transaction
    #[arg(long, default_value_t = 100)]
    batch_size: usize,

    /// Parsed rows buffered ahead of the database writer
    #[arg(long, default_value_t = 256)]
    queue_capacity: usize,

    /// Pause after each row, in milliseconds
    #[arg(long)]
    row_delay_ms: Option<u64>,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,
}

impl Args {
    fn options(&self) -> ImportOptions {
        ImportOptions {
            batch_size: self.batch_size,
            queue_capacity: self.queue_capacity,
            row_delay: self.row_delay_ms.map(Duration::from_millis),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let db = match connect_and_migrate(&args.database_url).await {
        Ok(db) => db,
        Err(err) => {
            error!("Failed to prepare database: {err}");
            return ExitCode::FAILURE;
        }
    };

    match import_file(&db, &args.csv_path, &args.options()).await {
        Ok(summary) => {
            println!(
                "Imported {} rows: {} succeeded, {} failed",
                summary.total, summary.succeeded, summary.failed
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!("Import aborted: {err}");
            ExitCode::FAILURE
        }
    }
}
