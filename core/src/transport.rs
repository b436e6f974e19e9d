//! Network execution seam.
//!
//! The executor never opens sockets itself. It hands an [`HttpRequest`] to
//! whatever [`Transport`] the [`crate::Client`] was built with and classifies
//! the outcome. [`ReqwestTransport`] is the default; tests plug in doubles.

use async_trait::async_trait;
use futures_util::TryStreamExt;

use crate::http::{Body, HttpRequest, HttpResponse};

/// Failures that happen before a complete response is available.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("request timed out")]
    Timeout,

    #[error("context canceled")]
    Cancelled,

    #[error("context deadline exceeded")]
    DeadlineExceeded,

    #[error("connection failed: {0}")]
    Connect(#[source] reqwest::Error),

    #[error(transparent)]
    Http(reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl TransportError {
    /// True when the failure came from the caller's context rather than the
    /// network.
    pub fn is_context(&self) -> bool {
        matches!(self, TransportError::Cancelled | TransportError::DeadlineExceeded)
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            TransportError::Timeout
        } else if err.is_connect() {
            TransportError::Connect(err)
        } else {
            TransportError::Http(err)
        }
    }
}

/// Executes a single HTTP exchange.
///
/// Implementations must be safe to share across tasks. `Ok(None)` means the
/// exchange finished without a response and without reporting an error; the
/// executor surfaces that as [`crate::ClientError::NilResponse`].
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: HttpRequest) -> Result<Option<HttpResponse>, TransportError>;
}

/// [`Transport`] backed by a pooled `reqwest::Client`.
///
/// Pooling, TLS and redirect policy are whatever the wrapped client is
/// configured with.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &reqwest::Client {
        &self.client
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: HttpRequest) -> Result<Option<HttpResponse>, TransportError> {
        let mut builder = self
            .client
            .request(request.method.into(), request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        // The connection goes back to the pool once this stream is read to the end.
        let body = Body::from_stream(response.bytes_stream().map_err(TransportError::from));

        Ok(Some(HttpResponse {
            status,
            headers,
            body,
        }))
    }
}
