//! Request executor and per-verb entry points.
//!
//! # Design
//! `Client` holds only an injected transport, its options and a debug sink,
//! so one instance can serve concurrent calls. Each call builds a request,
//! runs it through the transport under the caller's [`Context`], reads the
//! body to the end, classifies the status and, on success, hands headers and
//! decoded JSON back to the caller. Failures are returned as soon as they
//! happen; nothing is retried here.

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::{DeserializeOwned, IgnoredAny};

use crate::classify::{classify, is_success};
use crate::config::Options;
use crate::context::Context;
use crate::dump::{self, DebugSink, TracingSink};
use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::request::build_request;
use crate::response::Response;
use crate::transport::{ReqwestTransport, Transport, TransportError};

/// HTTP client that classifies every outcome into a [`ClientError`].
///
/// The per-verb methods take an optional decode target and an optional
/// header carrier. The carrier's contents are sent as request headers and,
/// on success, replaced with the response headers.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    options: Options,
    sink: Arc<dyn DebugSink>,
}

impl Client {
    /// `None` falls back to [`ReqwestTransport::default`] and
    /// [`Options::default`].
    pub fn new(transport: Option<Arc<dyn Transport>>, options: Option<Options>) -> Self {
        Self {
            transport: transport.unwrap_or_else(|| Arc::new(ReqwestTransport::default())),
            options: options.unwrap_or_default(),
            sink: Arc::new(TracingSink),
        }
    }

    /// Send debug dumps somewhere other than `tracing`.
    pub fn with_debug_sink(mut self, sink: Arc<dyn DebugSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn options(&self) -> &Options {
        &self.options
    }

    /// HEAD never decodes; only the header carrier is filled.
    pub async fn head(
        &self,
        ctx: &Context,
        url: &str,
        payload: Option<&[u8]>,
        headers: Option<&mut HeaderMap>,
    ) -> Result<(), ClientError> {
        self.call::<IgnoredAny>(ctx, HttpMethod::Head, url, payload, None, headers)
            .await
    }

    pub async fn get<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: &str,
        target: Option<&mut T>,
        headers: Option<&mut HeaderMap>,
    ) -> Result<(), ClientError> {
        self.call(ctx, HttpMethod::Get, url, None, target, headers).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: &str,
        payload: Option<&[u8]>,
        target: Option<&mut T>,
        headers: Option<&mut HeaderMap>,
    ) -> Result<(), ClientError> {
        self.call(ctx, HttpMethod::Post, url, payload, target, headers).await
    }

    pub async fn put<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: &str,
        payload: Option<&[u8]>,
        target: Option<&mut T>,
        headers: Option<&mut HeaderMap>,
    ) -> Result<(), ClientError> {
        self.call(ctx, HttpMethod::Put, url, payload, target, headers).await
    }

    pub async fn patch<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: &str,
        payload: Option<&[u8]>,
        target: Option<&mut T>,
        headers: Option<&mut HeaderMap>,
    ) -> Result<(), ClientError> {
        self.call(ctx, HttpMethod::Patch, url, payload, target, headers).await
    }

    pub async fn delete<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        url: &str,
        payload: Option<&[u8]>,
        target: Option<&mut T>,
        headers: Option<&mut HeaderMap>,
    ) -> Result<(), ClientError> {
        self.call(ctx, HttpMethod::Delete, url, payload, target, headers).await
    }

    async fn call<T: DeserializeOwned>(
        &self,
        ctx: &Context,
        method: HttpMethod,
        url: &str,
        payload: Option<&[u8]>,
        target: Option<&mut T>,
        headers: Option<&mut HeaderMap>,
    ) -> Result<(), ClientError> {
        let request = build_request(method, url, payload, headers.as_deref())?;
        let response = self.execute(ctx, request).await?;

        if let Some(carrier) = headers {
            *carrier = response.headers().clone();
        }
        if method == HttpMethod::Head {
            return Ok(());
        }
        if let Some(target) = target {
            *target = response.json()?;
        }
        Ok(())
    }

    /// Run one exchange and classify it.
    ///
    /// The response body is always read to the end (or dropped when the
    /// context fires) before this returns, whatever the outcome.
    pub async fn execute(&self, ctx: &Context, request: HttpRequest) -> Result<Response, ClientError> {
        let method = request.method;
        let url = request.url.to_string();
        let transport_error = |source: TransportError| ClientError::Transport {
            method,
            url: url.clone(),
            source,
        };

        if self.options.debug {
            self.sink.write(&dump::request(&request));
        }
        tracing::debug!(%method, %url, "sending request");

        let response = ctx
            .run(self.transport.execute(request))
            .await
            .and_then(|outcome| outcome)
            .map_err(&transport_error)?;
        let Some(HttpResponse { status, headers, body }) = response else {
            return Err(ClientError::NilResponse);
        };

        let body = match ctx.run(body.collect()).await.and_then(|read| read) {
            Ok(bytes) => bytes,
            Err(source) if source.is_context() || is_success(status) => {
                return Err(transport_error(source));
            }
            Err(source) => {
                tracing::debug!(%method, %url, status, error = %source, "failed to read error body");
                Bytes::new()
            }
        };

        if self.options.debug {
            self.sink.write(&dump::response(status, &headers, &body));
        }
        tracing::debug!(%method, %url, status, bytes = body.len(), "response received");

        classify(status, &body)?;
        Ok(Response::new(method, url, status, headers, body))
    }
}

impl Default for Client {
    fn default() -> Self {
        Self::new(None, None)
    }
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}
