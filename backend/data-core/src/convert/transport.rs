use common::HttpStatusCode;

/// What the transport handed back for one request.
///
/// On success `body` holds the decoded payload; otherwise `error_body` holds
/// the raw text the server sent, if any.
#[derive(Debug, Clone)]
pub struct TransportResponse<T> {
    pub status: HttpStatusCode,
    pub body: Option<T>,
    pub error_body: Option<String>,
}

impl<T> TransportResponse<T> {
    pub fn success(status: impl Into<HttpStatusCode>, body: T) -> Self {
        Self {
            status: status.into(),
            body: Some(body),
            error_body: None,
        }
    }

    pub fn failure(status: impl Into<HttpStatusCode>, error_body: Option<String>) -> Self {
        Self {
            status: status.into(),
            body: None,
            error_body,
        }
    }

    pub fn is_successful(&self) -> bool {
        self.status.is_success()
    }
}
