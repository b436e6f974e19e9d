//! Outbound request construction.

use bytes::Bytes;
use reqwest::header::HeaderMap;
use url::Url;

use crate::error::ClientError;
use crate::http::{HttpMethod, HttpRequest};

/// Build a request for `method` and `url`.
///
/// `payload` of `None` produces a request with no body; `Some(&[])` produces
/// an empty body. A malformed URL fails with
/// [`ClientError::Construction`].
pub fn build_request(
    method: HttpMethod,
    url: &str,
    payload: Option<&[u8]>,
    headers: Option<&HeaderMap>,
) -> Result<HttpRequest, ClientError> {
    let url = Url::parse(url).map_err(|source| ClientError::Construction { method, source })?;
    Ok(HttpRequest {
        method,
        url,
        headers: headers.cloned().unwrap_or_default(),
        body: payload.map(Bytes::copy_from_slice),
    })
}
