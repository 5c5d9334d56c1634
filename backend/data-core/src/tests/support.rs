//! Entities and data source doubles shared by the unit tests.

use crate::data_source::{DataSource, Entity};
use crate::local::InMemoryDataSource;

use models::{DataSourceError, DataSourceResponse, Query};

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub owner: String,
    pub archived: bool,
    pub priority: i64,
}

impl Entity for Note {
    type Id = String;

    fn table_name() -> &'static str {
        "notes"
    }

    fn id(&self) -> &String {
        &self.id
    }
}

pub fn note(id: &str, owner: &str, archived: bool, priority: i64) -> Note {
    Note {
        id: id.to_string(),
        owner: owner.to_string(),
        archived,
        priority,
    }
}

/// Entity with a floating point field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub id: String,
    pub score: f64,
}

impl Entity for Reading {
    type Id = String;

    fn table_name() -> &'static str {
        "readings"
    }

    fn id(&self) -> &String {
        &self.id
    }
}

pub fn reading(id: &str, score: f64) -> Reading {
    Reading {
        id: id.to_string(),
        score,
    }
}

pub fn memory(items: Vec<Note>) -> Arc<InMemoryDataSource<Note>> {
    Arc::new(InMemoryDataSource::with_records(items))
}

/// Every call fails with the same error.
pub struct FailingSource {
    pub error: DataSourceError,
}

impl FailingSource {
    pub fn new(error: DataSourceError) -> Arc<Self> {
        Arc::new(Self { error })
    }
}

#[async_trait]
impl DataSource<Note> for FailingSource {
    async fn get_all(&self) -> DataSourceResponse<Vec<Note>> {
        DataSourceResponse::unsuccessful(self.error.clone())
    }

    async fn get_all_matching(&self, _query: &Query) -> DataSourceResponse<Vec<Note>> {
        DataSourceResponse::unsuccessful(self.error.clone())
    }

    async fn get_one(&self) -> DataSourceResponse<Note> {
        DataSourceResponse::unsuccessful(self.error.clone())
    }

    async fn save(&self, _item: &Note) -> Result<(), DataSourceError> {
        Err(self.error.clone())
    }

    async fn save_all(&self, _items: &[Note]) -> Result<(), DataSourceError> {
        Err(self.error.clone())
    }

    async fn remove(&self, _item: &Note) -> Result<(), DataSourceError> {
        Err(self.error.clone())
    }

    async fn remove_all(&self, _items: &[Note]) -> Result<(), DataSourceError> {
        Err(self.error.clone())
    }
}

/// Reads panic, as a buggy adapter would.
pub struct PanickingSource;

#[async_trait]
impl DataSource<Note> for PanickingSource {
    async fn get_all(&self) -> DataSourceResponse<Vec<Note>> {
        panic!("adapter bug")
    }

    async fn get_all_matching(&self, _query: &Query) -> DataSourceResponse<Vec<Note>> {
        panic!("adapter bug")
    }

    async fn get_one(&self) -> DataSourceResponse<Note> {
        panic!("adapter bug")
    }

    async fn save(&self, _item: &Note) -> Result<(), DataSourceError> {
        Ok(())
    }

    async fn save_all(&self, _items: &[Note]) -> Result<(), DataSourceError> {
        Ok(())
    }

    async fn remove(&self, _item: &Note) -> Result<(), DataSourceError> {
        Ok(())
    }

    async fn remove_all(&self, _items: &[Note]) -> Result<(), DataSourceError> {
        Ok(())
    }
}

/// Delegates to `inner`, counting reads and optionally sleeping before them.
/// Writes fail when `reject_writes` is set.
pub struct InstrumentedSource {
    pub inner: Arc<dyn DataSource<Note>>,
    pub delay: Duration,
    pub reject_writes: bool,
    pub reads: AtomicUsize,
}

impl InstrumentedSource {
    pub fn wrap(inner: Arc<dyn DataSource<Note>>) -> Self {
        Self {
            inner,
            delay: Duration::ZERO,
            reject_writes: false,
            reads: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn rejecting_writes(mut self) -> Self {
        self.reject_writes = true;
        self
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    async fn before_read(&self) {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }

    fn check_write(&self) -> Result<(), DataSourceError> {
        if self.reject_writes {
            Err(DataSourceError::db("disk full"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl DataSource<Note> for InstrumentedSource {
    async fn get_all(&self) -> DataSourceResponse<Vec<Note>> {
        self.before_read().await;
        self.inner.get_all().await
    }

    async fn get_all_matching(&self, query: &Query) -> DataSourceResponse<Vec<Note>> {
        self.before_read().await;
        self.inner.get_all_matching(query).await
    }

    async fn get_one(&self) -> DataSourceResponse<Note> {
        self.before_read().await;
        self.inner.get_one().await
    }

    async fn save(&self, item: &Note) -> Result<(), DataSourceError> {
        self.check_write()?;
        self.inner.save(item).await
    }

    async fn save_all(&self, items: &[Note]) -> Result<(), DataSourceError> {
        self.check_write()?;
        self.inner.save_all(items).await
    }

    async fn remove(&self, item: &Note) -> Result<(), DataSourceError> {
        self.check_write()?;
        self.inner.remove(item).await
    }

    async fn remove_all(&self, items: &[Note]) -> Result<(), DataSourceError> {
        self.check_write()?;
        self.inner.remove_all(items).await
    }
}
