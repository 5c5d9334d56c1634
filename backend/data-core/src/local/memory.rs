//! Volatile [`DataSource`] keyed by entity id.

use crate::data_source::{DataSource, Entity};
use crate::error::LocalStoreError;
use crate::local::filter::{matches_json, validate_identifier};

use models::{DataSourceError, DataSourceResponse, Query};

use std::collections::BTreeMap;
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use log::debug;

/// Map-backed store with the same upsert/filter semantics as the SQLite store.
///
/// Records are kept in id order, so `get_one` returns the smallest id.
pub struct InMemoryDataSource<T> {
    records: Mutex<BTreeMap<String, T>>,
}

impl<T: Entity> InMemoryDataSource<T> {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(BTreeMap::new()),
        }
    }

    /// Store pre-populated with `items`.
    pub fn with_records(items: impl IntoIterator<Item = T>) -> Self {
        let records = items
            .into_iter()
            .map(|item| (item.id().to_string(), item))
            .collect();
        Self {
            records: Mutex::new(records),
        }
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, T>> {
        self.records.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn filter(&self, query: &Query) -> Result<Vec<T>, LocalStoreError> {
        for (field, _) in query.iter() {
            validate_identifier(field)?;
        }

        let records = self.lock();
        if query.is_empty() {
            return Ok(records.values().cloned().collect());
        }

        let mut matched = Vec::new();
        for item in records.values() {
            let document = serde_json::to_value(item)?;
            if matches_json(query, &document) {
                matched.push(item.clone());
            }
        }
        Ok(matched)
    }
}

impl<T: Entity> Default for InMemoryDataSource<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataSource<T> for InMemoryDataSource<T> {
    async fn get_all(&self) -> DataSourceResponse<Vec<T>> {
        self.get_all_matching(&Query::new()).await
    }

    async fn get_all_matching(&self, query: &Query) -> DataSourceResponse<Vec<T>> {
        self.filter(query).map_err(DataSourceError::from).into()
    }

    async fn get_one(&self) -> DataSourceResponse<T> {
        match self.lock().values().next() {
            Some(item) => DataSourceResponse::successful(item.clone()),
            None => DataSourceResponse::unsuccessful(DataSourceError::no_data(format!(
                "no record stored in `{}`",
                T::table_name()
            ))),
        }
    }

    async fn save(&self, item: &T) -> Result<(), DataSourceError> {
        self.save_all(std::slice::from_ref(item)).await
    }

    async fn save_all(&self, items: &[T]) -> Result<(), DataSourceError> {
        let mut records = self.lock();
        for item in items {
            records.insert(item.id().to_string(), item.clone());
        }
        debug!("In-memory `{}` upserted {} records", T::table_name(), items.len());
        Ok(())
    }

    async fn remove(&self, item: &T) -> Result<(), DataSourceError> {
        self.remove_all(std::slice::from_ref(item)).await
    }

    async fn remove_all(&self, items: &[T]) -> Result<(), DataSourceError> {
        let mut records = self.lock();
        for item in items {
            records.remove(&item.id().to_string());
        }
        Ok(())
    }
}
