//! Successful, fully buffered responses.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use serde::de::DeserializeOwned;

use crate::error::ClientError;
use crate::http::HttpMethod;

/// A 2xx response whose body has already been read to the end.
///
/// The connection it came from is back in the pool by the time a `Response`
/// exists, so dropping it without decoding is the "discard body" path.
#[derive(Debug, Clone)]
pub struct Response {
    method: HttpMethod,
    url: String,
    status: u16,
    headers: HeaderMap,
    body: Bytes,
}

impl Response {
    pub(crate) fn new(method: HttpMethod, url: String, status: u16, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            url,
            status,
            headers,
            body,
        }
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn into_headers(self) -> HeaderMap {
        self.headers
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Parse the first JSON value in the body. Anything after it is ignored.
    ///
    /// On failure the error carries the method, URL and raw body text.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ClientError> {
        let mut de = serde_json::Deserializer::from_slice(&self.body);
        T::deserialize(&mut de).map_err(|source| ClientError::Decode {
            method: self.method,
            url: self.url.clone(),
            body: String::from_utf8_lossy(&self.body).into_owned(),
            source,
        })
    }
}
