//! Classifying HTTP request executor.
//!
//! # Overview
//! Wraps an injected [`Transport`] so every call ends in either typed data or
//! a [`ClientError`] drawn from a fixed taxonomy, with a retriable annotation
//! an outer retry loop can key off.
//!
//! # Design
//! - `Client` is immutable after construction and safe to share.
//! - Each call races the exchange against the caller's [`Context`] so it can
//!   be cancelled or time out.
//! - Response bodies are always read to the end before a call returns,
//!   which lets the transport reuse the connection.
//! - Status handling lives in [`classify`]; nothing here retries.

pub mod classify;
pub mod client;
pub mod config;
pub mod context;
pub mod dump;
pub mod error;
pub mod http;
pub mod request;
pub mod response;
pub mod transport;

pub use client::Client;
pub use config::Options;
pub use context::Context;
pub use dump::{DebugSink, TracingSink};
pub use error::{ClientError, ErrorKind};
pub use http::{Body, HttpMethod, HttpRequest, HttpResponse};
pub use response::Response;
pub use transport::{ReqwestTransport, Transport, TransportError};

pub use reqwest::header::HeaderMap;
pub use tokio_util::sync::CancellationToken;
