//! The two-stage read: local first, then the remote answer.

use crate::convert::ErrorMessageProvider;
use crate::error::LocalStoreError;
use crate::repository::write_through::WriteThroughs;

use models::{DataSourceError, DataSourceResponse, ErrorKind, UNKNOWN_ERROR_CODE};

use std::pin::Pin;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::{Stream, stream};
use log::{debug, warn};
use tokio::task::{JoinError, JoinHandle};
use uuid::Uuid;

/// Finite sequence of envelopes produced by a repository read.
pub type ResponseStream<T> = Pin<Box<dyn Stream<Item = DataSourceResponse<T>> + Send>>;

pub(crate) type WriteThrough<T> =
    Box<dyn FnOnce(T) -> BoxFuture<'static, Result<(), DataSourceError>> + Send>;

/// Everything one read needs, captured before the stream is first polled.
pub(crate) struct Reconciliation<T> {
    pub operation: &'static str,
    pub local: BoxFuture<'static, DataSourceResponse<T>>,
    pub remote: BoxFuture<'static, DataSourceResponse<T>>,
    pub write_through: WriteThrough<T>,
    /// Local data for which this returns `true` is reported as "no data".
    pub is_empty: fn(&T) -> bool,
    pub messages: Arc<dyn ErrorMessageProvider>,
    pub write_throughs: WriteThroughs,
}

enum Stage<T> {
    Cold(Reconciliation<T>),
    AwaitingRemote {
        remote: JoinHandle<DataSourceResponse<T>>,
        messages: Arc<dyn ErrorMessageProvider>,
        trace: Uuid,
        operation: &'static str,
    },
    Done,
}

/// Build the stream. Nothing runs until the first poll, which starts both
/// reads; the local envelope is always yielded before the remote one.
pub(crate) fn reconcile<T>(plan: Reconciliation<T>) -> ResponseStream<T>
where
    T: Clone + Send + Sync + 'static,
{
    Box::pin(stream::unfold(Stage::Cold(plan), |stage| async move {
        match stage {
            Stage::Cold(plan) => {
                let Reconciliation {
                    operation,
                    local,
                    remote,
                    write_through,
                    is_empty,
                    messages,
                    write_throughs,
                } = plan;
                let trace = Uuid::new_v4();
                debug!("[{trace}] {operation}: reading local and remote");

                let local = tokio::spawn(local);
                let remote = tokio::spawn(remote_with_write_through(
                    remote,
                    write_through,
                    write_throughs,
                    trace,
                    operation,
                ));

                let first = settle_local(local.await, is_empty, messages.as_ref());
                debug!(
                    "[{trace}] {operation}: local stage successful={}",
                    first.is_successful()
                );

                Some((
                    first,
                    Stage::AwaitingRemote {
                        remote,
                        messages,
                        trace,
                        operation,
                    },
                ))
            }
            Stage::AwaitingRemote {
                remote,
                messages,
                trace,
                operation,
            } => {
                let second = settle_remote(remote.await, messages.as_ref());
                debug!(
                    "[{trace}] {operation}: remote stage successful={}",
                    second.is_successful()
                );
                Some((second, Stage::Done))
            }
            Stage::Done => None,
        }
    }))
}

/// Remote read that schedules the local write itself, so the write happens
/// even when the stream is dropped before the second envelope is taken.
async fn remote_with_write_through<T>(
    remote: BoxFuture<'static, DataSourceResponse<T>>,
    write_through: WriteThrough<T>,
    write_throughs: WriteThroughs,
    trace: Uuid,
    operation: &'static str,
) -> DataSourceResponse<T>
where
    T: Clone + Send + Sync + 'static,
{
    let response = remote.await;

    if let DataSourceResponse::Successful(data) = &response {
        let pending = write_through(data.clone());
        write_throughs.spawn(async move {
            match pending.await {
                Ok(()) => debug!("[{trace}] {operation}: local store refreshed"),
                Err(e) => warn!("[{trace}] {operation}: write-through failed: {e}"),
            }
        });
    }

    response
}

fn settle_local<T>(
    outcome: Result<DataSourceResponse<T>, JoinError>,
    is_empty: fn(&T) -> bool,
    messages: &dyn ErrorMessageProvider,
) -> DataSourceResponse<T> {
    let response = outcome.unwrap_or_else(|e| {
        DataSourceResponse::unsuccessful(DataSourceError::from(LocalStoreError::from(e)))
    });

    match response {
        DataSourceResponse::Successful(data) if is_empty(&data) => {
            DataSourceResponse::unsuccessful(DataSourceError::no_data(messages.no_cached_data()))
        }
        DataSourceResponse::Successful(data) => DataSourceResponse::successful(data),
        DataSourceResponse::Unsuccessful(error) => {
            DataSourceResponse::unsuccessful(local_failure(error, messages))
        }
    }
}

fn settle_remote<T>(
    outcome: Result<DataSourceResponse<T>, JoinError>,
    messages: &dyn ErrorMessageProvider,
) -> DataSourceResponse<T> {
    outcome
        .unwrap_or_else(|e| {
            DataSourceResponse::unsuccessful(
                DataSourceError::internal(format!("remote task failed: {e}")).with_cause(e),
            )
        })
        .map_err(|error| remote_failure(error, messages))
}

/// Local failures are never the server's fault.
pub(crate) fn local_failure(
    error: DataSourceError,
    messages: &dyn ErrorMessageProvider,
) -> DataSourceError {
    if error.kind() == ErrorKind::NoData {
        return error.relabel(UNKNOWN_ERROR_CODE, messages.no_cached_data(), false);
    }
    let message = messages.local_failure(error.error_message());
    DataSourceError::db(message).with_cause(error)
}

/// Anything that kept the remote answer from arriving is reported as a server
/// error; the kind tells transport problems apart from application errors.
pub(crate) fn remote_failure(
    error: DataSourceError,
    messages: &dyn ErrorMessageProvider,
) -> DataSourceError {
    let message = if error.kind() == ErrorKind::Server {
        error.error_message().to_string()
    } else {
        messages.remote_failure(error.error_message())
    };
    error.relabel(UNKNOWN_ERROR_CODE, message, true)
}
