//! The capability contract shared by local and remote stores.
//!
//! The repository only ever talks to [`DataSource`] trait objects, so an SQLite
//! table, an in-memory map and an HTTP collection are interchangeable.
//!
//! # Contract
//!
//! - Reads return a [`DataSourceResponse`]; an empty collection is a success.
//! - Writes return `Result<(), DataSourceError>` and have upsert semantics.
//! - Removing an item that does not exist is a no-op.
//! - Implementations run their I/O off the caller's thread and never panic on
//!   store or transport failures.

use models::{DataSourceError, DataSourceResponse, Query};

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A record the shipped adapters know how to persist.
///
/// Identity drives upserts and deletes; the table name is used by the local
/// store. The repository itself does not require this trait.
pub trait Entity: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    type Id: ToString + Send + Sync + 'static;

    fn table_name() -> &'static str;

    fn id(&self) -> &Self::Id;
}

#[async_trait]
pub trait DataSource<T>: Send + Sync
where
    T: Send + Sync + 'static,
{
    /// Every record, unfiltered.
    async fn get_all(&self) -> DataSourceResponse<Vec<T>>;

    /// Records matching every equality constraint of `query`.
    async fn get_all_matching(&self, query: &Query) -> DataSourceResponse<Vec<T>>;

    /// A single record; absence is reported as unsuccessful.
    async fn get_one(&self) -> DataSourceResponse<T>;

    async fn save(&self, item: &T) -> Result<(), DataSourceError>;

    async fn save_all(&self, items: &[T]) -> Result<(), DataSourceError>;

    async fn remove(&self, item: &T) -> Result<(), DataSourceError>;

    async fn remove_all(&self, items: &[T]) -> Result<(), DataSourceError>;

    /// Start a query bound to this source.
    fn query(&self) -> BoundQuery<'_, T>
    where
        Self: Sized,
    {
        BoundQuery::new(self)
    }
}

/// A [`Query`] that remembers which source it will run against.
///
/// # Example
///
/// ```ignore
/// let open = store.query().where_eq("status", "open").find_all().await;
/// ```
pub struct BoundQuery<'a, T> {
    source: &'a dyn DataSource<T>,
    query: Query,
}

impl<'a, T> BoundQuery<'a, T>
where
    T: Send + Sync + 'static,
{
    pub fn new(source: &'a dyn DataSource<T>) -> Self {
        Self {
            source,
            query: Query::new(),
        }
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Serialize) -> Self {
        self.query = self.query.where_eq(field, value);
        self
    }

    pub fn has(&self, field: &str) -> bool {
        self.query.has(field)
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.query.get(field)
    }

    pub fn as_query(&self) -> &Query {
        &self.query
    }

    pub async fn find_all(self) -> DataSourceResponse<Vec<T>> {
        self.source.get_all_matching(&self.query).await
    }
}
