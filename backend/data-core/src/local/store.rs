//! SQLite connection ownership for the local data sources.

use crate::data_source::Entity;
use crate::error::LocalStoreError;
use crate::local::filter::validate_identifier;
use crate::local::sqlite::SqliteDataSource;

use common::ErrorLocation;

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, Instant};

use log::{debug, error, info};
use rusqlite::Connection;

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// A shared SQLite connection.
///
/// Cloning is cheap; every clone talks to the same database. All statements run
/// on tokio's blocking pool so callers on the async runtime never block.
#[derive(Clone)]
pub struct LocalStore {
    conn: Arc<Mutex<Connection>>,
    path: Option<PathBuf>,
}

impl LocalStore {
    /// Open (or create) the database file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`LocalStoreError::Open`] if the file cannot be opened or the
    /// connection cannot be configured.
    #[track_caller]
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocalStoreError> {
        let location = ErrorLocation::caller();
        let path = path.as_ref().to_path_buf();
        let started_at = Instant::now();

        let conn = Connection::open(&path)
            .and_then(|conn| conn.busy_timeout(BUSY_TIMEOUT).map(|()| conn))
            .map_err(|e| {
                error!("Failed to open local store at {}: {e}", path.display());
                LocalStoreError::Open {
                    path: path.clone(),
                    message: e.to_string(),
                    location,
                    source: e,
                }
            })?;

        info!(
            "Local store opened at {} in {}ms",
            path.display(),
            started_at.elapsed().as_millis()
        );

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: Some(path),
        })
    }

    /// Open a private in-memory database.
    #[track_caller]
    pub fn open_in_memory() -> Result<Self, LocalStoreError> {
        let location = ErrorLocation::caller();
        let conn = Connection::open_in_memory().map_err(|e| LocalStoreError::Open {
            path: PathBuf::from(":memory:"),
            message: e.to_string(),
            location,
            source: e,
        })?;

        debug!("In-memory local store opened");

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            path: None,
        })
    }

    /// Database file, `None` for in-memory stores.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Create the table for `T` if needed and return a data source over it.
    pub fn data_source<T: Entity>(&self) -> Result<SqliteDataSource<T>, LocalStoreError> {
        let table = T::table_name();
        validate_identifier(table)?;

        let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS \"{table}\" (
                id TEXT PRIMARY KEY NOT NULL,
                body TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now') * 1000)
            );"
        ))?;

        debug!("Local table `{table}` ready");
        Ok(SqliteDataSource::new(self.clone(), table))
    }

    /// Run `work` against the connection on the blocking pool.
    pub(crate) async fn run<R, F>(&self, work: F) -> Result<R, LocalStoreError>
    where
        F: FnOnce(&mut Connection) -> Result<R, LocalStoreError> + Send + 'static,
        R: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut guard = conn.lock().unwrap_or_else(PoisonError::into_inner);
            work(&mut guard)
        })
        .await?
    }
}
