//! Error types for the request executor.
//!
//! # Design
//! Every failure is a variant of one closed enum so callers branch on
//! `kind()` instead of matching strings. Retriability is a separate question
//! answered by `is_retriable()`: an error is, for example, both
//! `ServiceUnavailable` and retriable. The executor only labels errors; it
//! never retries.

use std::fmt;

use crate::http::HttpMethod;
use crate::transport::TransportError;

/// Errors returned by [`crate::Client`] calls.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The URL could not be parsed. Always a caller bug.
    #[error("failed to create {method} request: {source}")]
    Construction {
        method: HttpMethod,
        #[source]
        source: url::ParseError,
    },

    /// No status line was received: connection, DNS, TLS, timeout or
    /// cancellation.
    #[error("failed to make request [{method}:{url}]: {source}")]
    Transport {
        method: HttpMethod,
        url: String,
        #[source]
        source: TransportError,
    },

    /// The transport returned neither a response nor an error.
    #[error("response is nil")]
    NilResponse,

    #[error("bad request")]
    BadRequest,

    /// 401 or 403.
    #[error("requested resource unauthorized")]
    AccessDenied { status: u16 },

    #[error("requested resource not found")]
    NotFound,

    #[error("unprocessable entity: retriable error")]
    UnprocessableEntity,

    #[error("requested resource rate limited: retriable error")]
    TooManyRequests,

    #[error("internal server error: retriable error")]
    InternalServerError,

    #[error("bad gateway: retriable error")]
    BadGateway,

    #[error("service unavailable: retriable error")]
    ServiceUnavailable,

    #[error("gateway timeout: retriable error")]
    GatewayTimeout,

    /// Any status outside the classification table.
    #[error("request failed, {status} status code received: {body}")]
    Unhandled { status: u16, body: String },

    /// A 2xx body that is not valid JSON for the decode target.
    #[error("could not parse response body: {source} [{method}:{url}] {body}")]
    Decode {
        method: HttpMethod,
        url: String,
        body: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Fieldless mirror of [`ClientError`] for programmatic branching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Construction,
    Transport,
    NilResponse,
    BadRequest,
    AccessDenied,
    NotFound,
    UnprocessableEntity,
    TooManyRequests,
    InternalServerError,
    BadGateway,
    ServiceUnavailable,
    GatewayTimeout,
    Unhandled,
    Decode,
}

impl ErrorKind {
    /// Whether an error of this kind may succeed if the same call is repeated
    /// unchanged.
    pub fn is_retriable(&self) -> bool {
        matches!(
            self,
            ErrorKind::UnprocessableEntity
                | ErrorKind::TooManyRequests
                | ErrorKind::InternalServerError
                | ErrorKind::BadGateway
                | ErrorKind::ServiceUnavailable
                | ErrorKind::GatewayTimeout
        )
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl ClientError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ClientError::Construction { .. } => ErrorKind::Construction,
            ClientError::Transport { .. } => ErrorKind::Transport,
            ClientError::NilResponse => ErrorKind::NilResponse,
            ClientError::BadRequest => ErrorKind::BadRequest,
            ClientError::AccessDenied { .. } => ErrorKind::AccessDenied,
            ClientError::NotFound => ErrorKind::NotFound,
            ClientError::UnprocessableEntity => ErrorKind::UnprocessableEntity,
            ClientError::TooManyRequests => ErrorKind::TooManyRequests,
            ClientError::InternalServerError => ErrorKind::InternalServerError,
            ClientError::BadGateway => ErrorKind::BadGateway,
            ClientError::ServiceUnavailable => ErrorKind::ServiceUnavailable,
            ClientError::GatewayTimeout => ErrorKind::GatewayTimeout,
            ClientError::Unhandled { .. } => ErrorKind::Unhandled,
            ClientError::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// The retriable annotation. Transport failures are never marked, even
    /// transient ones; callers may still choose to retry them.
    pub fn is_retriable(&self) -> bool {
        self.kind().is_retriable()
    }

    /// HTTP status that produced this error, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::BadRequest => Some(400),
            ClientError::AccessDenied { status } | ClientError::Unhandled { status, .. } => Some(*status),
            ClientError::NotFound => Some(404),
            ClientError::UnprocessableEntity => Some(422),
            ClientError::TooManyRequests => Some(429),
            ClientError::InternalServerError => Some(500),
            ClientError::BadGateway => Some(502),
            ClientError::ServiceUnavailable => Some(503),
            ClientError::GatewayTimeout => Some(504),
            _ => None,
        }
    }

    /// True for transport errors caused by the call's context.
    pub fn is_cancellation(&self) -> bool {
        matches!(self, ClientError::Transport { source, .. } if source.is_context())
    }
}
