//! REST collection exposed as a [`DataSource`].
//!
//! | operation      | request                                 |
//! |----------------|-----------------------------------------|
//! | `get_all`      | `GET {collection}?field=value&..`       |
//! | `get_one`      | `GET {single}` or first of `get_all`    |
//! | `save`         | `PUT {collection}/{id}`                 |
//! | `save_all`     | `PUT {collection}` with a JSON array    |
//! | `remove`       | `DELETE {collection}/{id}`, 404 is fine |

use crate::USER_AGENT;
use crate::config::RemoteConfig;
use crate::convert::{
    DefaultErrorMessages, ErrorMessageProvider, ResponseConverter, TransportResponse,
};
use crate::data_source::{DataSource, Entity};
use crate::error::RemoteError;
use crate::remote::connectivity::{AlwaysOnline, ConnectivityProbe, NetworkGuard};

use common::{ErrorLocation, HttpStatusCode, RedactedApiKey};
use models::{DataSourceError, DataSourceResponse, Query};

use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use url::Url;
use uuid::Uuid;

const DEFAULT_TIMEOUT_DURATION: Duration = Duration::from_secs(30);

pub struct HttpDataSource<T> {
    client: Client,
    base_url: Url,
    collection: String,
    single: Option<String>,
    token: Option<RedactedApiKey>,
    guard: NetworkGuard,
    converter: ResponseConverter,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> HttpDataSource<T> {
    pub fn builder(base_url: impl Into<String>) -> HttpDataSourceBuilder<T> {
        HttpDataSourceBuilder::new(base_url)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn collection_url(&self) -> Result<Url, RemoteError> {
        Ok(self.base_url.join(&self.collection)?)
    }

    #[track_caller]
    fn item_url(&self, item: &T) -> Result<Url, RemoteError> {
        let location = ErrorLocation::caller();
        let mut url = self.collection_url()?;
        url.path_segments_mut()
            .map_err(|()| RemoteError::Configuration {
                message: format!("{} cannot carry path segments", self.base_url),
                location,
            })?
            .pop_if_empty()
            .push(&item.id().to_string());
        Ok(url)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token.as_str()),
            None => request,
        }
    }

    /// Send a request and decode a 2xx body as `R`.
    async fn read<R: DeserializeOwned>(&self, url: Url) -> Result<R, DataSourceError> {
        let trace = Uuid::new_v4();
        debug!("[{trace}] GET {url}");

        let transport = self.send_read::<R>(url).await.inspect_err(|e| {
            warn!("[{trace}] Remote read failed: {e}");
        })?;

        debug!("[{trace}] HTTP {}", transport.status);
        self.converter.resolve(transport)
    }

    async fn send_read<R: DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<TransportResponse<R>, RemoteError> {
        self.guard.ensure_online().await?;

        let response = self.authorize(self.client.get(url)).send().await?;
        let status = HttpStatusCode(response.status().as_u16());

        if !status.is_success() {
            let error_body = response.text().await.ok();
            return Ok(TransportResponse::failure(status, error_body));
        }

        let bytes = response.bytes().await?;
        let body: R = if bytes.is_empty() {
            serde_json::from_slice(b"null")?
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(TransportResponse::success(status, body))
    }

    /// Send a mutating request; any 2xx is success.
    async fn write(
        &self,
        request: RequestBuilder,
        tolerate_not_found: bool,
    ) -> Result<(), DataSourceError> {
        self.guard.ensure_online().await?;

        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(RemoteError::from)?;
        let status = HttpStatusCode(response.status().as_u16());

        if status.is_success() || (tolerate_not_found && status.is_not_found()) {
            return Ok(());
        }

        let error_body = response.text().await.ok();
        warn!("Remote write to `{}` answered HTTP {status}", self.collection);
        self.converter
            .resolve(TransportResponse::<()>::failure(status, error_body))
    }
}

#[async_trait]
impl<T: Entity> DataSource<T> for HttpDataSource<T> {
    async fn get_all(&self) -> DataSourceResponse<Vec<T>> {
        self.get_all_matching(&Query::new()).await
    }

    async fn get_all_matching(&self, query: &Query) -> DataSourceResponse<Vec<T>> {
        let mut url = match self.collection_url() {
            Ok(url) => url,
            Err(e) => return DataSourceResponse::unsuccessful(e.into()),
        };
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (field, value) in query.iter() {
                pairs.append_pair(field, value);
            }
        }

        self.read::<Vec<T>>(url).await.into()
    }

    async fn get_one(&self) -> DataSourceResponse<T> {
        if let Some(single) = &self.single {
            let url = match self.base_url.join(single) {
                Ok(url) => url,
                Err(e) => return DataSourceResponse::unsuccessful(RemoteError::from(e).into()),
            };
            return self.read::<T>(url).await.into();
        }

        self.get_all()
            .await
            .into_result()
            .and_then(|items| {
                items.into_iter().next().ok_or_else(|| {
                    DataSourceError::server(
                        HttpStatusCode::NOT_FOUND.as_error_code(),
                        self.converter
                            .messages()
                            .server_failure(HttpStatusCode::NOT_FOUND),
                    )
                })
            })
            .into()
    }

    async fn save(&self, item: &T) -> Result<(), DataSourceError> {
        let url = self.item_url(item)?;
        self.write(self.client.put(url).json(item), false).await
    }

    async fn save_all(&self, items: &[T]) -> Result<(), DataSourceError> {
        if items.is_empty() {
            return Ok(());
        }
        let url = self.collection_url()?;
        self.write(self.client.put(url).json(items), false).await
    }

    async fn remove(&self, item: &T) -> Result<(), DataSourceError> {
        let url = self.item_url(item)?;
        self.write(self.client.delete(url), true).await
    }

    async fn remove_all(&self, items: &[T]) -> Result<(), DataSourceError> {
        for item in items {
            self.remove(item).await?;
        }
        Ok(())
    }
}

pub struct HttpDataSourceBuilder<T> {
    base_url: String,
    collection: Option<String>,
    single: Option<String>,
    timeout: Duration,
    token: Option<RedactedApiKey>,
    probe: Arc<dyn ConnectivityProbe>,
    messages: Arc<dyn ErrorMessageProvider>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Entity> HttpDataSourceBuilder<T> {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            collection: None,
            single: None,
            timeout: DEFAULT_TIMEOUT_DURATION,
            token: None,
            probe: Arc::new(AlwaysOnline),
            messages: Arc::new(DefaultErrorMessages),
            _marker: PhantomData,
        }
    }

    /// Base URL, timeout and token taken from the remote section of the config.
    pub fn from_config(config: &RemoteConfig) -> Self {
        let mut builder =
            Self::new(config.base_url.clone()).timeout(Duration::from_secs(config.timeout_secs));
        if let Some(var) = &config.api_token_env {
            builder.token = RedactedApiKey::from_env(var);
            if builder.token.is_none() {
                warn!("API token variable {var} is not set, sending unauthenticated requests");
            }
        }
        builder
    }

    /// Collection path relative to the base URL, defaults to the entity table name.
    pub fn collection(mut self, path: impl Into<String>) -> Self {
        self.collection = Some(path.into());
        self
    }

    /// Path answering `get_one` directly.
    pub fn single(mut self, path: impl Into<String>) -> Self {
        self.single = Some(path.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn bearer_token(mut self, token: RedactedApiKey) -> Self {
        self.token = Some(token);
        self
    }

    pub fn probe(mut self, probe: Arc<dyn ConnectivityProbe>) -> Self {
        self.probe = probe;
        self
    }

    pub fn messages(mut self, messages: Arc<dyn ErrorMessageProvider>) -> Self {
        self.messages = messages;
        self
    }

    /// # Errors
    ///
    /// Returns [`RemoteError`] if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn build(self) -> Result<HttpDataSource<T>, RemoteError> {
        let mut base = self.base_url.trim().to_string();
        if !base.ends_with('/') {
            base.push('/');
        }
        let base_url = Url::parse(&base)?;

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(USER_AGENT)
            .build()?;

        let collection = self
            .collection
            .unwrap_or_else(|| T::table_name().to_string())
            .trim_matches('/')
            .to_string();

        debug!("Remote data source for {base_url}{collection} ready");

        Ok(HttpDataSource {
            client,
            base_url,
            collection,
            single: self.single.map(|path| path.trim_start_matches('/').to_string()),
            token: self.token,
            guard: NetworkGuard::new(self.probe, Arc::clone(&self.messages)),
            converter: ResponseConverter::new(self.messages),
            _marker: PhantomData,
        })
    }
}
