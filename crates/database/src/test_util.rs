use crate::db::connect_and_migrate;
use sea_orm::DatabaseConnection;
use tempfile::TempDir;

/// A migrated SQLite database living in a temporary directory
pub struct TestDb {
    // Kept so the directory outlives the connection
    _temp_dir: TempDir,
    pub conn: DatabaseConnection,
}

impl TestDb {
    pub async fn new() -> Self {
        let temp_dir = TempDir::with_prefix("santri-test-db").unwrap();
        let path = temp_dir.path().join("db.sqlite");
        let uri = format!("sqlite://{}?mode=rwc", path.display());

        let conn = connect_and_migrate(&uri).await.unwrap();

        Self {
            _temp_dir: temp_dir,
            conn,
        }
    }
}
