//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;

use redirector::config::RedirectorConfig;
use redirector::lifecycle::{Service, Shutdown};
use redirector::routing::RuleSetSummary;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

pub const HEADER: &str =
    "source_host,match_type,source_path_or_regex,target_url_format,status_code,weight\n";

/// Write `rows` (without header) to `dir/name`, creating parent directories.
pub fn write_rules(dir: &std::path::Path, name: &str, rows: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, format!("{HEADER}{rows}")).unwrap();
}

/// A service running on an ephemeral local port.
pub struct TestService {
    pub addr: SocketAddr,
    pub rules: TempDir,
    shutdown: Shutdown,
    handle: JoinHandle<()>,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    /// Trigger shutdown and wait for the service to drain.
    pub async fn stop(self) {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .expect("service did not stop")
            .unwrap();
    }
}

/// Start a service reading rules from `rules`, after `configure` has
/// adjusted the default configuration.
pub async fn start_service(
    rules: TempDir,
    configure: impl FnOnce(&mut RedirectorConfig),
) -> (TestService, RuleSetSummary) {
    let mut config = RedirectorConfig::default();
    config.source.location = rules.path().display().to_string();
    configure(&mut config);

    let service = Service::prepare(config).await.unwrap();
    let summary = service.store().summary();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let serving = shutdown.clone();
    let handle = tokio::spawn(async move {
        service.serve(listener, serving).await.unwrap();
    });

    (
        TestService {
            addr,
            rules,
            shutdown,
            handle,
        },
        summary,
    )
}

/// A client that reports redirects instead of following them.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap()
}

/// Poll `check` until it holds or `deadline` passes.
pub async fn eventually<F, Fut>(deadline: Duration, mut check: F) -> bool
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let start = tokio::time::Instant::now();
    while start.elapsed() < deadline {
        if check().await {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    false
}

/// Requests seen by the mock S3 backend.
#[derive(Debug, Default)]
pub struct S3Log {
    pub prefixes: Vec<String>,
    pub fetched: Vec<String>,
    pub authorizations: Vec<String>,
}

/// A path-style S3 endpoint serving a fixed two-page listing.
///
/// Bucket `denied` refuses to list. Under any other bucket, listing
/// returns `prod/a.csv`, `prod/notes.txt` and `prod/missing.csv`, then
/// `prod/nested/b.CSV` and `prod/bad.csv` on the second page.
/// `missing.csv` answers `NoSuchKey`; `bad.csv` is not valid UTF-8.
pub async fn start_mock_s3() -> (SocketAddr, Arc<Mutex<S3Log>>) {
    let log = Arc::new(Mutex::new(S3Log::default()));
    let app = Router::new()
        .route("/{bucket}", get(list_objects))
        .route("/{bucket}/", get(list_objects))
        .route("/{bucket}/{*key}", get(get_object))
        .with_state(log.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, log)
}

const FIRST_PAGE: &[&str] = &["prod/a.csv", "prod/notes.txt", "prod/missing.csv"];
const SECOND_PAGE: &[&str] = &["prod/nested/b.CSV", "prod/bad.csv"];

fn s3_error(status: StatusCode, code: &str) -> Response {
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Error><Code>{code}</Code><Message>{code}</Message></Error>"
    );
    (status, [(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

async fn list_objects(
    State(log): State<Arc<Mutex<S3Log>>>,
    Path(bucket): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Response {
    {
        let mut log = log.lock().unwrap();
        if let Some(auth) = headers.get(header::AUTHORIZATION).and_then(|v| v.to_str().ok()) {
            log.authorizations.push(auth.to_string());
        }
        log.prefixes.push(params.get("prefix").cloned().unwrap_or_default());
    }

    if bucket == "denied" {
        return s3_error(StatusCode::FORBIDDEN, "AccessDenied");
    }

    let (keys, next) = match params.get("continuation-token").map(String::as_str) {
        None => (FIRST_PAGE, Some("page-2")),
        Some("page-2") => (SECOND_PAGE, None),
        Some(_) => return s3_error(StatusCode::BAD_REQUEST, "InvalidArgument"),
    };

    let contents: String = keys
        .iter()
        .map(|key| format!("<Contents><Key>{key}</Key><Size>64</Size><StorageClass>STANDARD</StorageClass></Contents>"))
        .collect();
    let token = next
        .map(|t| format!("<NextContinuationToken>{t}</NextContinuationToken>"))
        .unwrap_or_default();
    let body = format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <ListBucketResult xmlns=\"http://s3.amazonaws.com/doc/2006-03-01/\">\
         <Name>{bucket}</Name><Prefix>prod/</Prefix><KeyCount>{}</KeyCount><MaxKeys>1000</MaxKeys>\
         <IsTruncated>{}</IsTruncated>{token}{contents}</ListBucketResult>",
        keys.len(),
        next.is_some(),
    );
    ([(header::CONTENT_TYPE, "application/xml")], body).into_response()
}

async fn get_object(
    State(log): State<Arc<Mutex<S3Log>>>,
    Path((_bucket, key)): Path<(String, String)>,
) -> Response {
    log.lock().unwrap().fetched.push(key.clone());

    let body: Vec<u8> = match key.as_str() {
        "prod/a.csv" => format!("{HEADER}a.com,exact,/,https://a.test,301,1\n").into_bytes(),
        "prod/nested/b.CSV" => format!("{HEADER}b.com,exact,/,https://b.test,302,1\n").into_bytes(),
        "prod/bad.csv" => {
            let mut bytes = HEADER.as_bytes().to_vec();
            bytes.extend_from_slice(b"c.com,exact,/\xff,https://c.test,301,1\n");
            bytes
        }
        _ => return s3_error(StatusCode::NOT_FOUND, "NoSuchKey"),
    };
    ([(header::CONTENT_TYPE, "text/csv")], body).into_response()
}
