//! SQLite-backed [`DataSource`].
//!
//! Each entity type owns one table of `(id, body, updated_at)` rows where
//! `body` is the JSON document of the entity. Filters run through SQLite's
//! JSON functions, see [`crate::local::filter::sql_where`].

use crate::data_source::{DataSource, Entity};
use crate::error::LocalStoreError;
use crate::local::filter::sql_where;
use crate::local::store::LocalStore;

use models::{DataSourceError, DataSourceResponse, Query};

use std::marker::PhantomData;

use async_trait::async_trait;
use log::{debug, warn};
use rusqlite::{OptionalExtension, params, params_from_iter};

pub struct SqliteDataSource<T> {
    store: LocalStore,
    table: &'static str,
    _marker: PhantomData<T>,
}

impl<T: Entity> SqliteDataSource<T> {
    pub(crate) fn new(store: LocalStore, table: &'static str) -> Self {
        Self {
            store,
            table,
            _marker: PhantomData,
        }
    }

    pub fn table(&self) -> &'static str {
        self.table
    }

    async fn select(&self, query: &Query) -> Result<Vec<T>, LocalStoreError> {
        let select = sql_where(self.table, query)?;

        let bodies = self
            .store
            .run(move |conn| {
                let mut stmt = conn.prepare(&select.sql)?;
                let rows = stmt.query_map(params_from_iter(select.params.iter()), |row| {
                    row.get::<_, String>(0)
                })?;
                let mut bodies = Vec::new();
                for body in rows {
                    bodies.push(body?);
                }
                Ok(bodies)
            })
            .await?;

        bodies
            .iter()
            .map(|body| serde_json::from_str::<T>(body).map_err(LocalStoreError::from))
            .collect()
    }

    async fn select_first(&self) -> Result<Option<T>, LocalStoreError> {
        let sql = format!("SELECT body FROM \"{}\" ORDER BY id LIMIT 1", self.table);

        let body = self
            .store
            .run(move |conn| {
                let body = conn
                    .query_row(&sql, [], |row| row.get::<_, String>(0))
                    .optional()?;
                Ok(body)
            })
            .await?;

        body.map(|body| serde_json::from_str::<T>(&body).map_err(LocalStoreError::from))
            .transpose()
    }

    fn failed(&self, operation: &str, error: LocalStoreError) -> DataSourceError {
        warn!("Local `{}` {operation} failed: {error}", self.table);
        DataSourceError::from(error)
    }
}

#[async_trait]
impl<T: Entity> DataSource<T> for SqliteDataSource<T> {
    async fn get_all(&self) -> DataSourceResponse<Vec<T>> {
        self.get_all_matching(&Query::new()).await
    }

    async fn get_all_matching(&self, query: &Query) -> DataSourceResponse<Vec<T>> {
        match self.select(query).await {
            Ok(items) => {
                debug!("Local `{}` returned {} rows", self.table, items.len());
                DataSourceResponse::successful(items)
            }
            Err(e) => DataSourceResponse::unsuccessful(self.failed("read", e)),
        }
    }

    async fn get_one(&self) -> DataSourceResponse<T> {
        match self.select_first().await {
            Ok(Some(item)) => DataSourceResponse::successful(item),
            Ok(None) => DataSourceResponse::unsuccessful(DataSourceError::no_data(format!(
                "no record stored in `{}`",
                self.table
            ))),
            Err(e) => DataSourceResponse::unsuccessful(self.failed("read", e)),
        }
    }

    async fn save(&self, item: &T) -> Result<(), DataSourceError> {
        self.save_all(std::slice::from_ref(item)).await
    }

    async fn save_all(&self, items: &[T]) -> Result<(), DataSourceError> {
        if items.is_empty() {
            return Ok(());
        }

        let rows = items
            .iter()
            .map(|item| -> Result<(String, String), LocalStoreError> {
                Ok((item.id().to_string(), serde_json::to_string(item)?))
            })
            .collect::<Result<Vec<(String, String)>, LocalStoreError>>()
            .map_err(|e| self.failed("save", e))?;

        let count = rows.len();
        let sql = format!(
            "INSERT INTO \"{}\" (id, body, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(id) DO UPDATE SET
                body = excluded.body,
                updated_at = excluded.updated_at;",
            self.table
        );

        self.store
            .run(move |conn| {
                let tx = conn.transaction()?;
                {
                    let mut stmt = tx.prepare(&sql)?;
                    for (id, body) in &rows {
                        stmt.execute(params![id, body])?;
                    }
                }
                tx.commit()?;
                Ok(())
            })
            .await
            .map_err(|e| self.failed("save", e))?;

        debug!("Local `{}` upserted {count} rows", self.table);
        Ok(())
    }

    async fn remove(&self, item: &T) -> Result<(), DataSourceError> {
        self.remove_all(std::slice::from_ref(item)).await
    }

    async fn remove_all(&self, items: &[T]) -> Result<(), DataSourceError> {
        if items.is_empty() {
            return Ok(());
        }

        let ids: Vec<String> = items.iter().map(|item| item.id().to_string()).collect();
        let sql = format!("DELETE FROM \"{}\" WHERE id = ?1;", self.table);

        let removed = self
            .store
            .run(move |conn| {
                let tx = conn.transaction()?;
                let mut removed = 0;
                {
                    let mut stmt = tx.prepare(&sql)?;
                    for id in &ids {
                        removed += stmt.execute(params![id])?;
                    }
                }
                tx.commit()?;
                Ok(removed)
            })
            .await
            .map_err(|e| self.failed("remove", e))?;

        debug!("Local `{}` removed {removed} rows", self.table);
        Ok(())
    }
}
