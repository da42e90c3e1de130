mod config;
mod dtos;
mod error;
mod extract;
mod routes;
mod state;
mod utils;

use crate::{config::Config, state::AppState, utils::shutdown::shutdown_signal};
use database::db::connect_and_migrate;
use log::{error, info};
use std::process::ExitCode;

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env()?;

    let db = connect_and_migrate(&config.database_url).await?;
    let app = routes::router(AppState::new(db));

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    info!("Running axum on http://{}", config.addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    // A missing .env file is fine, deployments set variables directly
    dotenvy::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("Server stopped: {err}");
            ExitCode::FAILURE
        }
    }
}
