//! End-to-end tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port and drives the default
//! reqwest transport over real HTTP, so classification, header propagation
//! and cancellation are checked against an actual socket.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use httpclient_core::{
    CancellationToken, Client, ClientError, Context, ErrorKind, HeaderMap, HttpMethod, ReqwestTransport,
    TransportError,
};
use mock_server::{Echo, Status, LOCATION};

async fn start_server() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(mock_server::run(listener));
    format!("http://{addr}")
}

/// Default reqwest transport, minus any proxy picked up from the environment.
fn client() -> Client {
    let http = reqwest::Client::builder().no_proxy().build().unwrap();
    Client::new(Some(Arc::new(ReqwestTransport::new(http))), None)
}

/// Issue `method` against `url` with no decode target and no header carrier.
async fn call(client: &Client, method: HttpMethod, url: &str) -> Result<(), ClientError> {
    let ctx = Context::background();
    let payload: Option<&[u8]> = Some(br#"{"target":{"name":"test"}}"#);
    match method {
        HttpMethod::Get => client.get::<serde_json::Value>(&ctx, url, None, None).await,
        HttpMethod::Head => client.head(&ctx, url, None, None).await,
        HttpMethod::Post => client.post::<serde_json::Value>(&ctx, url, payload, None, None).await,
        HttpMethod::Put => client.put::<serde_json::Value>(&ctx, url, payload, None, None).await,
        HttpMethod::Patch => client.patch::<serde_json::Value>(&ctx, url, payload, None, None).await,
        HttpMethod::Delete => client.delete::<serde_json::Value>(&ctx, url, payload, None, None).await,
    }
}

const VERBS: [HttpMethod; 6] = [
    HttpMethod::Get,
    HttpMethod::Head,
    HttpMethod::Post,
    HttpMethod::Put,
    HttpMethod::Patch,
    HttpMethod::Delete,
];

#[tokio::test]
async fn every_verb_decodes_and_returns_headers() {
    let base = start_server().await;
    let url = format!("{base}/test");
    let client = client();
    let ctx = Context::background();
    let payload = br#"{"target":{"name":"test"}}"#;
    let expected = Status {
        status: "OK".to_string(),
    };

    // post
    let mut result: Option<Status> = None;
    let mut headers = HeaderMap::new();
    client
        .post(&ctx, &url, Some(payload), Some(&mut result), Some(&mut headers))
        .await
        .unwrap();
    assert_eq!(result.as_ref(), Some(&expected));
    assert_eq!(headers["location"], LOCATION);

    // post, headers only
    let mut headers = HeaderMap::new();
    client
        .post::<Status>(&ctx, &url, Some(payload), None, Some(&mut headers))
        .await
        .unwrap();
    assert_eq!(headers["location"], LOCATION, "headers are returned without a decode target");

    // get
    let mut result: Option<Status> = None;
    let mut headers = HeaderMap::new();
    headers.insert("content-type", "application/json".parse().unwrap());
    client.get(&ctx, &url, Some(&mut result), Some(&mut headers)).await.unwrap();
    assert_eq!(result.as_ref(), Some(&expected));
    assert_eq!(headers["location"], LOCATION);

    // head
    let mut headers = HeaderMap::new();
    client.head(&ctx, &url, None, Some(&mut headers)).await.unwrap();
    assert_eq!(headers["location"], LOCATION);

    // put, patch, delete
    let mut result: Option<Status> = None;
    client.put(&ctx, &url, Some(payload), Some(&mut result), None).await.unwrap();
    assert_eq!(result.as_ref(), Some(&expected));

    let mut result: Option<Status> = None;
    client.patch(&ctx, &url, Some(payload), Some(&mut result), None).await.unwrap();
    assert_eq!(result.as_ref(), Some(&expected));

    let mut result: Option<Status> = None;
    let mut headers = HeaderMap::new();
    client
        .delete(&ctx, &url, Some(payload), Some(&mut result), Some(&mut headers))
        .await
        .unwrap();
    assert_eq!(result.as_ref(), Some(&expected));
    assert_eq!(headers["location"], LOCATION);
}

#[tokio::test]
async fn status_table_holds_for_every_verb() {
    let base = start_server().await;
    let client = client();

    let table = [
        (400, ErrorKind::BadRequest, false),
        (401, ErrorKind::AccessDenied, false),
        (403, ErrorKind::AccessDenied, false),
        (404, ErrorKind::NotFound, false),
        (410, ErrorKind::Unhandled, false),
        (422, ErrorKind::UnprocessableEntity, true),
        (429, ErrorKind::TooManyRequests, true),
        (500, ErrorKind::InternalServerError, true),
        (502, ErrorKind::BadGateway, true),
        (503, ErrorKind::ServiceUnavailable, true),
        (504, ErrorKind::GatewayTimeout, true),
        (507, ErrorKind::Unhandled, false),
    ];

    for method in VERBS {
        for (code, kind, retriable) in table {
            let url = format!("{base}/status/{code}");
            let err = call(&client, method, &url).await.unwrap_err();
            assert_eq!(err.kind(), kind, "{method} {code}");
            assert_eq!(err.is_retriable(), retriable, "{method} {code}");
            assert_eq!(err.status(), Some(code), "{method} {code}");
        }
        for code in [200, 201, 202, 204] {
            let url = format!("{base}/status/{code}");
            call(&client, method, &url)
                .await
                .unwrap_or_else(|e| panic!("{method} {code}: {e}"));
        }
    }
}

#[tokio::test]
async fn unhandled_status_carries_body() {
    let base = start_server().await;
    let client = client();
    let err = call(&client, HttpMethod::Get, &format!("{base}/status/410"))
        .await
        .unwrap_err();
    match err {
        ClientError::Unhandled { status, body } => {
            assert_eq!(status, 410);
            assert_eq!(body, "status 410");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[tokio::test]
async fn request_headers_reach_the_server() {
    let base = start_server().await;
    let client = client();
    let ctx = Context::background();
    let url = format!("{base}/headers");

    for method in [HttpMethod::Get, HttpMethod::Post] {
        let mut headers = HeaderMap::new();
        headers.append("test", "testvalue".parse().unwrap());
        headers.append("test", "second".parse().unwrap());
        let mut seen: BTreeMap<String, Vec<String>> = BTreeMap::new();

        let result = match method {
            HttpMethod::Get => client.get(&ctx, &url, Some(&mut seen), Some(&mut headers)).await,
            _ => client.post(&ctx, &url, None, Some(&mut seen), Some(&mut headers)).await,
        };
        result.unwrap();

        assert_eq!(seen["test"], vec!["testvalue", "second"], "{method}");
        assert!(headers.get("test").is_none(), "{method}: carrier holds response headers now");
        assert_eq!(headers["content-type"], "application/json", "{method}");
    }
}

#[tokio::test]
async fn payload_is_sent_as_body() {
    let base = start_server().await;
    let client = client();
    let mut echo: Option<Echo> = None;
    client
        .patch(
            &Context::background(),
            &format!("{base}/echo"),
            Some(b"raw bytes"),
            Some(&mut echo),
            None,
        )
        .await
        .unwrap();
    let echo = echo.unwrap();
    assert_eq!(echo.method, "PATCH");
    assert_eq!(echo.body, "raw bytes");
}

#[tokio::test]
async fn invalid_json_is_a_decode_error() {
    let base = start_server().await;
    let client = client();
    let url = format!("{base}/invalid");
    let mut target: Option<Status> = None;

    let err = client
        .get(&Context::background(), &url, Some(&mut target), None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
    assert!(!err.is_retriable());
    let msg = err.to_string();
    assert!(msg.contains("GET"), "{msg}");
    assert!(msg.contains(&url), "{msg}");
    assert!(msg.contains("this is not json"), "{msg}");
}

#[tokio::test]
async fn discarding_body_succeeds() {
    let base = start_server().await;
    let client = client();
    let url = format!("{base}/invalid");
    call(&client, HttpMethod::Get, &url).await.unwrap();
    call(&client, HttpMethod::Head, &url).await.unwrap();
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    let addr = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap()
    };
    let url = format!("http://{addr}/test");
    let client = client();

    let err = call(&client, HttpMethod::Get, &url).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert!(!err.is_retriable());
    assert!(!err.is_cancellation());
    assert!(err.to_string().contains(&format!("[GET:{url}]")));
}

#[tokio::test]
async fn cancellation_unblocks_in_flight_call() {
    let base = start_server().await;
    let client = client();
    let token = CancellationToken::new();
    let ctx = Context::with_token(token.clone());

    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        token.cancel();
    });

    let started = Instant::now();
    let err = client
        .get::<Status>(&ctx, &format!("{base}/slow"), None, None)
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(err.is_cancellation());
    assert!(matches!(
        err,
        ClientError::Transport {
            method: HttpMethod::Get,
            source: TransportError::Cancelled,
            ..
        }
    ));
}

#[tokio::test]
async fn deadline_unblocks_in_flight_call() {
    let base = start_server().await;
    let client = client();
    let ctx = Context::background().with_timeout(Duration::from_millis(100));

    let started = Instant::now();
    let err = client
        .post::<Status>(&ctx, &format!("{base}/slow"), None, None, None)
        .await
        .unwrap_err();

    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(matches!(
        err,
        ClientError::Transport {
            source: TransportError::DeadlineExceeded,
            ..
        }
    ));
}

#[tokio::test]
async fn client_is_shared_across_tasks() {
    let base = start_server().await;
    let client = client();

    let tasks: Vec<_> = (0..8)
        .map(|_| {
            let client = client.clone();
            let url = format!("{base}/test");
            tokio::spawn(async move {
                let ctx = Context::background();
                let mut result: Option<Status> = None;
                client.get(&ctx, &url, Some(&mut result), None).await?;
                Ok::<_, ClientError>(result)
            })
        })
        .collect();

    for task in tasks {
        let result = task.await.unwrap().unwrap();
        assert_eq!(result.unwrap().status, "OK");
    }
}

#[tokio::test]
async fn client_without_injected_transport_reaches_server() {
    let base = start_server().await;
    let client = Client::new(None, None);
    assert!(!client.options().debug);

    let mut result: Option<Status> = None;
    let mut headers = HeaderMap::new();
    client
        .get(&Context::background(), &format!("{base}/test"), Some(&mut result), Some(&mut headers))
        .await
        .unwrap();
    assert_eq!(result.unwrap().status, "OK");
    assert_eq!(headers["location"], LOCATION);
}
