//! Raw request/response dumps for debug mode.
//!
//! Dumps are rendered from copies of the buffered bytes, so writing one
//! never consumes the body the executor later sends or decodes.

use reqwest::header::HeaderMap;

use crate::http::HttpRequest;

/// Destination for debug dumps.
pub trait DebugSink: Send + Sync {
    fn write(&self, dump: &str);
}

/// Default sink: one `tracing` event per dump on target
/// `httpclient_core::dump`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DebugSink for TracingSink {
    fn write(&self, dump: &str) {
        tracing::info!(target: "httpclient_core::dump", "{dump}");
    }
}

/// Render `request` in HTTP/1.1 wire form: request line, `Host`, headers,
/// blank line, body.
pub fn request(request: &HttpRequest) -> String {
    let url = &request.url;
    let mut target = url.path().to_string();
    if let Some(query) = url.query() {
        target.push('?');
        target.push_str(query);
    }

    let mut out = format!("{} {} HTTP/1.1\r\n", request.method, target);
    if let Some(host) = url.host_str() {
        match url.port() {
            Some(port) => out.push_str(&format!("Host: {host}:{port}\r\n")),
            None => out.push_str(&format!("Host: {host}\r\n")),
        }
    }
    write_headers(&mut out, &request.headers);
    out.push_str("\r\n");
    if let Some(body) = &request.body {
        out.push_str(&String::from_utf8_lossy(body));
    }
    out
}

/// Render a response: status line, headers, blank line, body.
pub fn response(status: u16, headers: &HeaderMap, body: &[u8]) -> String {
    let reason = reqwest::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("");
    let mut out = format!("HTTP/1.1 {status} {reason}").trim_end().to_string();
    out.push_str("\r\n");
    write_headers(&mut out, headers);
    out.push_str("\r\n");
    out.push_str(&String::from_utf8_lossy(body));
    out
}

fn write_headers(out: &mut String, headers: &HeaderMap) {
    for (name, value) in headers {
        out.push_str(&format!("{}: {}\r\n", name, String::from_utf8_lossy(value.as_bytes())));
    }
}
