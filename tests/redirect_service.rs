//! End-to-end tests over a real TCP listener.

use reqwest::header::{HOST, LOCATION};
use reqwest::StatusCode;

use redirector::health::HealthStatus;
use redirector::routing::RuleSetSummary;

mod common;

fn rule_tree() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    common::write_rules(
        dir.path(),
        "site.csv",
        "old-site.com,regex,^/products/(\\d+),https://new-site.com/items/$1,301,200\n\
         old-site.com,exact,/about-us,https://new-site.com/about,308,100\n\
         old-site.com,regex,^/(.*)$,https://new-site.com$path,302,1\n",
    );
    common::write_rules(
        dir.path(),
        "nested/blog.CSV",
        "# comment row\n\
         blog.example.com,exact,/,https://example.com/blog,301,0\n\
         blog.example.com,exact,/only,https://x.test,abc,1\n",
    );
    std::fs::write(dir.path().join("notes.txt"), "ignored.com,exact,/,https://x.test,301,1\n").unwrap();
    dir
}

#[tokio::test]
async fn test_initial_load_counts() {
    let (service, summary) = common::start_service(rule_tree(), |_| {}).await;

    // "abc" falls back to status 0, which is kept but answered with 500.
    assert_eq!(summary, RuleSetSummary { domains: 2, redirects: 5 });
    service.stop().await;
}

#[tokio::test]
async fn test_redirects_by_weight() {
    let (service, _) = common::start_service(rule_tree(), |_| {}).await;
    let client = common::client();

    let res = client
        .get(service.url("/products/123"))
        .header(HOST, "old-site.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "https://new-site.com/items/123");
    assert!(res.headers().contains_key("x-request-id"));

    let res = client
        .get(service.url("/about-us/"))
        .header(HOST, "old-site.com:8080")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()[LOCATION], "https://new-site.com/about");

    let res = client
        .get(service.url("/anything/else"))
        .header(HOST, "old-site.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "https://new-site.com/anything/else");

    let res = client
        .post(service.url("/"))
        .header(HOST, "blog.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(res.headers()[LOCATION], "https://example.com/blog");

    service.stop().await;
}

#[tokio::test]
async fn test_not_found_and_invalid_status() {
    let (service, _) = common::start_service(rule_tree(), |_| {}).await;
    let client = common::client();

    let res = client
        .get(service.url("/"))
        .header(HOST, "ignored.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(service.url("/missing"))
        .header(HOST, "blog.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .get(service.url("/only"))
        .header(HOST, "blog.example.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);

    service.stop().await;
}

#[tokio::test]
async fn test_health_endpoint() {
    let (service, _) = common::start_service(rule_tree(), |config| {
        config.health.path = Some("/healthz".into());
        config.health.host = Some("status.internal".into());
    })
    .await;
    let client = common::client();

    let res = client
        .get(service.url("/healthz"))
        .header(HOST, "status.internal")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let status: HealthStatus = serde_json::from_slice(&res.bytes().await.unwrap()).unwrap();
    assert_eq!(
        status,
        HealthStatus {
            status: "ok".into(),
            domains: 2,
            redirects: 5
        }
    );

    // Other hosts fall through to redirect matching.
    let res = client
        .get(service.url("/healthz"))
        .header(HOST, "old-site.com")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()[LOCATION], "https://new-site.com/healthz");

    service.stop().await;
}
