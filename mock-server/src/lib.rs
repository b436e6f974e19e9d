use std::{collections::BTreeMap, time::Duration};

use axum::{
    body::Bytes,
    extract::Path,
    http::{HeaderMap, HeaderValue, Method, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// Value of the `location` header on every `/test` reply.
pub const LOCATION: &str = "https://this.location/";

/// How long `/slow` waits before answering.
pub const SLOW_DELAY: Duration = Duration::from_secs(30);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub status: String,
}

/// What `/echo` saw.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub body: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/test", any(ok))
        .route("/status/{code}", any(status))
        .route("/headers", any(request_headers))
        .route("/echo", any(echo))
        .route("/invalid", any(invalid))
        .route("/slow", any(slow))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn ok() -> (HeaderMap, Json<Status>) {
    let mut headers = HeaderMap::new();
    headers.insert("location", HeaderValue::from_static(LOCATION));
    (
        headers,
        Json(Status {
            status: "OK".to_string(),
        }),
    )
}

async fn status(Path(code): Path<u16>) -> Response {
    let Ok(status) = StatusCode::from_u16(code) else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if status == StatusCode::NO_CONTENT {
        return status.into_response();
    }
    (status, format!("status {code}")).into_response()
}

/// Reply with the request headers as a multi-map.
async fn request_headers(headers: HeaderMap) -> Json<BTreeMap<String, Vec<String>>> {
    let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, value) in &headers {
        seen.entry(name.to_string())
            .or_default()
            .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
    }
    Json(seen)
}

async fn echo(method: Method, body: Bytes) -> Json<Echo> {
    Json(Echo {
        method: method.to_string(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

async fn invalid() -> &'static str {
    "this is not json"
}

async fn slow() -> Json<Status> {
    tokio::time::sleep(SLOW_DELAY).await;
    Json(Status {
        status: "late".to_string(),
    })
}
