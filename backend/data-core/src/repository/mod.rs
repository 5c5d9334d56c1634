//! Offline-first orchestration over a local and a remote [`DataSource`].
//!
//! Every read yields two envelopes: what the device already has, then what the
//! remote side says. A successful remote answer is written back to the local
//! store in the background, so the next read starts from fresher data.
//!
//! ```ignore
//! let repository = Repository::new(remote, local);
//! let mut updates = repository.get_all();
//! while let Some(update) = updates.next().await {
//!     render(update);
//! }
//! ```

pub mod stream;
pub mod targets;
pub(crate) mod write_through;

pub use stream::ResponseStream;
pub use targets::StoreTargets;

use crate::convert::{DefaultErrorMessages, ErrorMessageProvider};
use crate::data_source::DataSource;
use crate::repository::stream::{Reconciliation, local_failure, reconcile, remote_failure};
use crate::repository::write_through::WriteThroughs;

use models::{DataSourceError, DataSourceResponse, Query};

use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt};
use log::{debug, warn};

pub struct Repository<T> {
    remote: Arc<dyn DataSource<T>>,
    local: Arc<dyn DataSource<T>>,
    messages: Arc<dyn ErrorMessageProvider>,
    write_throughs: WriteThroughs,
}

impl<T> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            remote: Arc::clone(&self.remote),
            local: Arc::clone(&self.local),
            messages: Arc::clone(&self.messages),
            write_throughs: self.write_throughs.clone(),
        }
    }
}

impl<T> Repository<T>
where
    T: Clone + Send + Sync + 'static,
{
    pub fn new(remote: Arc<dyn DataSource<T>>, local: Arc<dyn DataSource<T>>) -> Self {
        Self {
            remote,
            local,
            messages: Arc::new(DefaultErrorMessages),
            write_throughs: WriteThroughs::default(),
        }
    }

    /// Replace the texts used for errors produced by the repository itself.
    pub fn with_messages(mut self, messages: Arc<dyn ErrorMessageProvider>) -> Self {
        self.messages = messages;
        self
    }

    pub fn remote(&self) -> &Arc<dyn DataSource<T>> {
        &self.remote
    }

    pub fn local(&self) -> &Arc<dyn DataSource<T>> {
        &self.local
    }

    // ============================================
    // READS
    // ============================================

    pub fn get_all(&self) -> ResponseStream<Vec<T>> {
        let local = Arc::clone(&self.local);
        let remote = Arc::clone(&self.remote);

        self.collection_read(
            "get_all",
            async move { local.get_all().await }.boxed(),
            async move { remote.get_all().await }.boxed(),
        )
    }

    pub fn get_all_matching(&self, query: Query) -> ResponseStream<Vec<T>> {
        let local = Arc::clone(&self.local);
        let remote = Arc::clone(&self.remote);
        let remote_query = query.clone();

        self.collection_read(
            "get_all_matching",
            async move { local.get_all_matching(&query).await }.boxed(),
            async move { remote.get_all_matching(&remote_query).await }.boxed(),
        )
    }

    pub fn get_one(&self) -> ResponseStream<T> {
        let local = Arc::clone(&self.local);
        let remote = Arc::clone(&self.remote);
        let write_local = Arc::clone(&self.local);

        reconcile(Reconciliation {
            operation: "get_one",
            local: async move { local.get_one().await }.boxed(),
            remote: async move { remote.get_one().await }.boxed(),
            write_through: Box::new(move |item: T| {
                async move { write_local.save(&item).await }.boxed()
            }),
            is_empty: |_: &T| false,
            messages: Arc::clone(&self.messages),
            write_throughs: self.write_throughs.clone(),
        })
    }

    /// Single-shot [`Repository::get_all`]: only the remote-reconciled envelope.
    pub async fn fetch_all(&self) -> DataSourceResponse<Vec<T>> {
        last_emission(self.get_all()).await
    }

    pub async fn fetch_all_matching(&self, query: Query) -> DataSourceResponse<Vec<T>> {
        last_emission(self.get_all_matching(query)).await
    }

    pub async fn fetch_one(&self) -> DataSourceResponse<T> {
        last_emission(self.get_one()).await
    }

    /// Wait for every background write-through started so far.
    pub async fn flush_write_throughs(&self) {
        self.write_throughs.flush().await;
    }

    /// Write-throughs that have not finished yet.
    pub fn pending_write_throughs(&self) -> usize {
        self.write_throughs.pending()
    }

    // ============================================
    // WRITES
    // ============================================

    /// Store `item` locally.
    pub async fn save(&self, item: &T) -> DataSourceResponse<()> {
        self.save_to(item, StoreTargets::LOCAL).await
    }

    pub async fn save_all(&self, items: &[T]) -> DataSourceResponse<()> {
        self.save_all_to(items, StoreTargets::LOCAL).await
    }

    pub async fn save_to(&self, item: &T, targets: StoreTargets) -> DataSourceResponse<()> {
        self.mutate(
            "save",
            targets.remote.then(|| self.remote.save(item)),
            targets.local.then(|| self.local.save(item)),
        )
        .await
    }

    pub async fn save_all_to(&self, items: &[T], targets: StoreTargets) -> DataSourceResponse<()> {
        self.mutate(
            "save_all",
            targets.remote.then(|| self.remote.save_all(items)),
            targets.local.then(|| self.local.save_all(items)),
        )
        .await
    }

    pub async fn delete(&self, item: &T, targets: StoreTargets) -> DataSourceResponse<()> {
        self.mutate(
            "delete",
            targets.remote.then(|| self.remote.remove(item)),
            targets.local.then(|| self.local.remove(item)),
        )
        .await
    }

    pub async fn delete_all(&self, items: &[T], targets: StoreTargets) -> DataSourceResponse<()> {
        self.mutate(
            "delete_all",
            targets.remote.then(|| self.remote.remove_all(items)),
            targets.local.then(|| self.local.remove_all(items)),
        )
        .await
    }

    // ============================================
    // INTERNALS
    // ============================================

    fn collection_read(
        &self,
        operation: &'static str,
        local: BoxFuture<'static, DataSourceResponse<Vec<T>>>,
        remote: BoxFuture<'static, DataSourceResponse<Vec<T>>>,
    ) -> ResponseStream<Vec<T>> {
        let write_local = Arc::clone(&self.local);

        reconcile(Reconciliation {
            operation,
            local,
            remote,
            write_through: Box::new(move |items: Vec<T>| {
                async move { write_local.save_all(&items).await }.boxed()
            }),
            is_empty: |items: &Vec<T>| items.is_empty(),
            messages: Arc::clone(&self.messages),
            write_throughs: self.write_throughs.clone(),
        })
    }

    /// Run the selected mutations concurrently. The remote failure wins over
    /// the local one; the loser is only logged.
    async fn mutate(
        &self,
        operation: &str,
        remote: Option<BoxFuture<'_, Result<(), DataSourceError>>>,
        local: Option<BoxFuture<'_, Result<(), DataSourceError>>>,
    ) -> DataSourceResponse<()> {
        if remote.is_none() && local.is_none() {
            debug!("{operation}: no store selected, nothing to do");
            return DataSourceResponse::successful(());
        }

        let (remote, local) = tokio::join!(run_target(remote), run_target(local));
        let messages = self.messages.as_ref();

        match (remote, local) {
            (Some(Err(remote_error)), local) => {
                if let Some(Err(local_error)) = local {
                    warn!("{operation}: local store also failed: {local_error}");
                }
                warn!("{operation}: remote store failed: {remote_error}");
                DataSourceResponse::unsuccessful(remote_failure(remote_error, messages))
            }
            (_, Some(Err(local_error))) => {
                warn!("{operation}: local store failed: {local_error}");
                DataSourceResponse::unsuccessful(local_failure(local_error, messages))
            }
            _ => DataSourceResponse::successful(()),
        }
    }
}

async fn run_target(
    target: Option<BoxFuture<'_, Result<(), DataSourceError>>>,
) -> Option<Result<(), DataSourceError>> {
    match target {
        Some(future) => Some(future.await),
        None => None,
    }
}

async fn last_emission<U>(mut stream: ResponseStream<U>) -> DataSourceResponse<U> {
    let mut last = None;
    while let Some(envelope) = stream.next().await {
        last = Some(envelope);
    }
    last.unwrap_or_else(|| {
        DataSourceResponse::unsuccessful(DataSourceError::internal(
            "read finished without an answer",
        ))
    })
}
