use crate::row::{RowError, SantriRow};
use database::services::santri::{SantriRecord, SantriService};
use log::{debug, info, warn};
use sea_orm::{DatabaseConnection, DatabaseTransaction, DbErr, TransactionTrait};
use std::{io::Read, path::Path, time::Duration};
use thiserror::Error;
use tokio::{sync::mpsc, task::JoinError};

/// Tuning knobs for an import run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOptions {
    /// Rows written per outer transaction
    pub batch_size: usize,
    /// Parsed rows buffered ahead of the writer
    pub queue_capacity: usize,
    /// Pause after each row, for throttling against a busy database
    pub row_delay: Option<Duration>,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            batch_size: 100,
            queue_capacity: 256,
            row_delay: None,
        }
    }
}

/// Outcome of an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

/// Errors that abort an import run
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("failed to open {path}: {source}")]
    Open { path: String, source: csv::Error },

    #[error("failed to read input: {0}")]
    Read(csv::Error),

    #[error("database error: {0}")]
    Db(#[from] DbErr),

    #[error("reader task failed: {0}")]
    Join(#[from] JoinError),
}

/// A parsed line tagged with its 1-based data row number
type Numbered = (usize, Result<SantriRow, csv::Error>);

fn reader_builder() -> csv::ReaderBuilder {
    let mut builder = csv::ReaderBuilder::new();
    builder.trim(csv::Trim::All);
    builder
}

/// Builds a CSV reader with the settings the santri sheet needs
pub fn csv_reader<R: Read>(input: R) -> csv::Reader<R> {
    reader_builder().from_reader(input)
}

/// Imports the santri sheet at `path`
pub async fn import_file(
    db: &DatabaseConnection,
    path: impl AsRef<Path>,
    options: &ImportOptions,
) -> Result<ImportSummary, ImportError> {
    let path = path.as_ref();
    let reader = reader_builder()
        .from_path(path)
        .map_err(|source| ImportError::Open {
            path: path.display().to_string(),
            source,
        })?;

    info!("Importing santri from {}", path.display());
    import_reader(db, reader, options).await
}

/// Imports santri rows from an already opened CSV reader
///
/// Parsing runs on a blocking thread and hands rows to the writer through a
/// bounded queue, so a slow database holds the reader back instead of the
/// whole file piling up in memory.
pub async fn import_reader<R>(
    db: &DatabaseConnection,
    reader: csv::Reader<R>,
    options: &ImportOptions,
) -> Result<ImportSummary, ImportError>
where
    R: Read + Send + 'static,
{
    let batch_size = options.batch_size.max(1);
    let (tx, mut rx) = mpsc::channel::<Numbered>(options.queue_capacity.max(1));

    let producer = tokio::task::spawn_blocking(move || {
        let mut reader = reader;
        for (index, row) in reader.deserialize::<SantriRow>().enumerate() {
            // The writer stopped early, nothing left to feed
            if tx.blocking_send((index + 1, row)).is_err() {
                break;
            }
        }
    });

    let mut summary = ImportSummary::default();
    let mut batch = Vec::with_capacity(batch_size);

    while let Some((row_number, row)) = rx.recv().await {
        match row {
            Err(err) if matches!(err.kind(), csv::ErrorKind::Io(_)) => {
                return Err(ImportError::Read(err));
            }
            row => batch.push((row_number, row)),
        }

        if batch.len() >= batch_size {
            write_batch(db, &mut batch, options, &mut summary).await?;
        }
    }
    if !batch.is_empty() {
        write_batch(db, &mut batch, options, &mut summary).await?;
    }

    producer.await?;

    info!(
        "Import finished: {} rows, {} succeeded, {} failed",
        summary.total, summary.succeeded, summary.failed
    );
    Ok(summary)
}

/// Writes the queued rows in one outer transaction, one savepoint per row
///
/// Failing to open the outer transaction is fatal. If it breaks later on, the
/// batch is rolled back and its rows are replayed one transaction each, so
/// only the offending row fails.
async fn write_batch(
    db: &DatabaseConnection,
    batch: &mut Vec<Numbered>,
    options: &ImportOptions,
    summary: &mut ImportSummary,
) -> Result<(), ImportError> {
    let mut pending = Vec::with_capacity(batch.len());

    for (row_number, row) in batch.drain(..) {
        summary.total += 1;

        let record = row
            .map_err(RowError::Malformed)
            .and_then(SantriRecord::try_from);
        match record {
            Ok(record) => pending.push((row_number, record)),
            Err(err) => {
                summary.failed += 1;
                warn!("Skipping row {row_number}: {err}");
            }
        }
    }

    let txn = db.begin().await?;
    let outcomes = match write_in_transaction(txn, &pending, options).await {
        Ok(outcomes) => outcomes,
        Err(err) => {
            warn!(
                "Batch of {} rows rolled back ({err}), replaying row by row",
                pending.len()
            );
            replay(db, &pending, options).await
        }
    };

    for ((row_number, _), outcome) in pending.iter().zip(outcomes) {
        match outcome {
            Ok(()) => summary.succeeded += 1,
            Err(err) => {
                summary.failed += 1;
                warn!("Skipping row {row_number}: {err}");
            }
        }
    }

    debug!("Finished batch ending at row {}", summary.total);
    Ok(())
}

/// Stores every record inside one transaction, each in its own savepoint
///
/// A store error inside a savepoint only fails that row. Any error that
/// leaves the outer transaction in doubt is returned instead.
async fn write_in_transaction(
    txn: DatabaseTransaction,
    pending: &[(usize, SantriRecord)],
    options: &ImportOptions,
) -> Result<Vec<Result<(), RowError>>, DbErr> {
    let mut outcomes = Vec::with_capacity(pending.len());

    for (_, record) in pending {
        match write_row(&txn, record.clone()).await {
            Ok(outcome) => outcomes.push(outcome),
            Err(err) => {
                abandon(txn).await;
                return Err(err);
            }
        }
        pause(options).await;
    }

    txn.commit().await?;
    Ok(outcomes)
}

/// Stores one row inside its own savepoint
///
/// The outer error means the transaction itself is unusable; the inner one
/// only concerns this row.
async fn write_row(
    txn: &DatabaseTransaction,
    record: SantriRecord,
) -> Result<Result<(), RowError>, DbErr> {
    let savepoint = txn.begin().await?;
    match SantriService::upsert_by_code(&savepoint, record).await {
        Ok(()) => {
            savepoint.commit().await?;
            Ok(Ok(()))
        }
        Err(err) => {
            savepoint.rollback().await?;
            Ok(Err(RowError::Store(err)))
        }
    }
}

/// Writes each record in a transaction of its own
async fn replay(
    db: &DatabaseConnection,
    pending: &[(usize, SantriRecord)],
    options: &ImportOptions,
) -> Vec<Result<(), RowError>> {
    let mut outcomes = Vec::with_capacity(pending.len());
    for (_, record) in pending {
        outcomes.push(write_alone(db, record.clone()).await);
        pause(options).await;
    }
    outcomes
}

async fn write_alone(db: &DatabaseConnection, record: SantriRecord) -> Result<(), RowError> {
    let txn = db.begin().await.map_err(RowError::Store)?;
    match SantriService::upsert_by_code(&txn, record).await {
        Ok(()) => txn.commit().await.map_err(RowError::Store),
        Err(err) => {
            abandon(txn).await;
            Err(RowError::Store(err))
        }
    }
}

/// Rolls back a transaction the database may already have discarded
async fn abandon(txn: DatabaseTransaction) {
    if let Err(err) = txn.rollback().await {
        debug!("Rollback after failure also failed: {err}");
    }
}

async fn pause(options: &ImportOptions) {
    if let Some(delay) = options.row_delay {
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use database::{db::connect_and_migrate, entities::santri};
    use models::{Gender, Status};
    use sea_orm::{ConnectionTrait, EntityTrait, PaginatorTrait, QueryOrder};
    use std::io::Cursor;
    use tempfile::TempDir;

    const HEADER: &str = "code,fullname,nickname,gender,role,status,email,phone,incoming_year,\
college_year,high_school,university,faculty,major,birth_place,birth_date,full_address,village,\
district,city,province";

    async fn database() -> (TempDir, DatabaseConnection) {
        let temp_dir = TempDir::with_prefix("santri-import").unwrap();
        let uri = format!("sqlite://{}?mode=rwc", temp_dir.path().join("db.sqlite").display());
        let db = connect_and_migrate(&uri).await.unwrap();
        (temp_dir, db)
    }

    fn sheet(rows: &[&str]) -> csv::Reader<Cursor<Vec<u8>>> {
        let mut text = format!("{HEADER}\n");
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        csv_reader(Cursor::new(text.into_bytes()))
    }

    const ROWS: [&str; 3] = [
        "A2301, Ahmad Fajar ,Fajar,putra,santri,active,a@mail.id,-,2023,2023,SMAN 1,ITB,FTI,Informatika,Bandung,5-1-2005,-,,,Bandung,Jawa Barat",
        "B2301,Budi,,male,pentashih,,,,,2022,,,,,,31-04-2004,,,,,",
        "C2301,,Citra,Putri,,-,,,,,,,,,,,,,,,",
    ];

    #[tokio::test]
    async fn test_import_is_idempotent() {
        let (_dir, db) = database().await;
        let options = ImportOptions {
            batch_size: 2,
            ..Default::default()
        };

        let first = import_reader(&db, sheet(&ROWS), &options).await.unwrap();
        let stored_first = santri::Entity::find()
            .order_by_asc(santri::Column::Id)
            .all(&db)
            .await
            .unwrap();
        let second = import_reader(&db, sheet(&ROWS), &options).await.unwrap();
        let stored_second = santri::Entity::find()
            .order_by_asc(santri::Column::Id)
            .all(&db)
            .await
            .unwrap();

        let expected = ImportSummary {
            total: 3,
            succeeded: 3,
            failed: 0,
        };
        assert_eq!(first, expected);
        assert_eq!(second, expected);
        assert_eq!(stored_first.len(), 3);

        for (before, after) in stored_first.iter().zip(&stored_second) {
            assert_eq!(before.id, after.id);
            assert_eq!(before.code, after.code);
            assert_eq!(before.fullname, after.fullname);
            assert_eq!(before.created_at, after.created_at);
        }
    }

    #[tokio::test]
    async fn test_import_normalizes_fields() {
        let (_dir, db) = database().await;

        import_reader(&db, sheet(&ROWS), &ImportOptions::default())
            .await
            .unwrap();
        let stored = santri::Entity::find()
            .order_by_asc(santri::Column::Id)
            .all(&db)
            .await
            .unwrap();

        let ahmad = &stored[0];
        assert_eq!(ahmad.fullname, "Ahmad Fajar");
        assert_eq!(ahmad.gender, Some(Gender::Male));
        assert_eq!(ahmad.phone, None);
        assert_eq!(ahmad.full_address, None);
        assert_eq!(ahmad.village, None);
        assert_eq!(
            ahmad.birth_date.map(|date| date.to_string()).as_deref(),
            Some("2005-01-05")
        );

        let budi = &stored[1];
        assert_eq!(budi.status, Status::Inactive);
        assert_eq!(budi.birth_date, None);

        let citra = &stored[2];
        assert_eq!(citra.fullname, "Citra");
        assert_eq!(citra.gender, Some(Gender::Female));
    }

    #[tokio::test]
    async fn test_invalid_row_fails_alone() {
        let (_dir, db) = database().await;
        let rows = [
            ROWS[0],
            "X2301,Xavier,,unknown,santri,active,,,,,,,,,,,,,,,",
            ROWS[1],
            ",,,,,,,,,,,,,,,,,,,,",
        ];

        let summary = import_reader(&db, sheet(&rows), &ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.total, 4);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(santri::Entity::find().count(&db).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_malformed_line_is_counted() {
        let (_dir, db) = database().await;
        let rows = [ROWS[0], "Z2301,too,few"];

        let summary = import_reader(&db, sheet(&rows), &ImportOptions::default())
            .await
            .unwrap();

        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
    }

    #[tokio::test]
    async fn test_missing_file() {
        let (dir, db) = database().await;

        let path = dir.path().join("absent.csv");
        let result = import_file(&db, path, &ImportOptions::default()).await;

        assert!(matches!(result, Err(ImportError::Open { .. })));
    }

    #[tokio::test]
    async fn test_broken_transaction_fails_only_its_row() {
        let (_dir, db) = database().await;
        // Aborts the whole enclosing transaction, not just the statement
        db.execute_unprepared(
            "CREATE TRIGGER reject_bad_code BEFORE INSERT ON santri \
             WHEN NEW.code = 'BAD' BEGIN SELECT RAISE(ROLLBACK, 'rejected'); END",
        )
        .await
        .unwrap();
        let rows = [
            "A1,Ahmad,,,,,,,,,,,,,,,,,,,",
            "BAD,Bad,,,,,,,,,,,,,,,,,,,",
            "C1,Citra,,,,,,,,,,,,,,,,,,,",
        ];

        let summary = import_reader(&db, sheet(&rows), &ImportOptions::default())
            .await
            .unwrap();
        let codes: Vec<Option<String>> = santri::Entity::find()
            .order_by_asc(santri::Column::Id)
            .all(&db)
            .await
            .unwrap()
            .into_iter()
            .map(|santri| santri.code)
            .collect();

        assert_eq!(
            summary,
            ImportSummary {
                total: 3,
                succeeded: 2,
                failed: 1,
            }
        );
        assert_eq!(codes, [Some("A1".to_string()), Some("C1".to_string())]);
    }

    #[tokio::test]
    async fn test_import_with_row_delay() {
        let (_dir, db) = database().await;
        let options = ImportOptions {
            batch_size: 2,
            queue_capacity: 1,
            row_delay: Some(Duration::from_millis(1)),
        };

        let summary = import_reader(&db, sheet(&ROWS), &options).await.unwrap();

        assert_eq!(
            summary,
            ImportSummary {
                total: 3,
                succeeded: 3,
                failed: 0,
            }
        );
        assert_eq!(santri::Entity::find().count(&db).await.unwrap(), 3);
    }
}
