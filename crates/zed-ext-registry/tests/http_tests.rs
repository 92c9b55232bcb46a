//! End-to-end HTTP behavior against a local mock registry.
//!
//! The client is blocking, so each test drives `wiremock` on its own runtime
//! and calls the client from the test thread, outside `block_on`.

use std::fs;
use std::sync::Arc;
use std::time::Duration;

use pretty_assertions::assert_eq;
use tempfile::TempDir;
use tokio::runtime::Runtime;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use zed_ext_registry::{
    Error, FetchError, Fetcher, RegistryClient, ReqwestTransport, RetryPolicy, Transport,
};

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()
        .unwrap()
}

fn transport() -> Arc<dyn Transport> {
    Arc::new(ReqwestTransport::new(Duration::from_secs(5)).unwrap())
}

#[test]
fn search_hits_the_extensions_endpoint() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(method("GET"))
            .and(path("/extensions"))
            .and(query_param("filter", "html"))
            .and(query_param("max_schema_version", "1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(
                r#"{"data": [{"id": "html", "name": "HTML", "version": "0.1.4",
                   "description": "HTML support", "download_count": 9000}]}"#,
            ))
            .expect(1)
            .mount(&server),
    );

    let client = RegistryClient::new(transport(), server.uri());
    let results = client.search("html").unwrap();

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].name, "HTML");
    assert_eq!(results[0].download_count, 9000);
}

#[test]
fn api_error_surfaces_status_and_body() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(path("/extensions"))
            .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
            .mount(&server),
    );

    let client = RegistryClient::new(transport(), server.uri());
    let err = client.find_exact("html").unwrap_err();

    assert!(
        matches!(err, Error::Api { status: 503, ref body } if body == "maintenance"),
        "got {err:?}"
    );
}

#[test]
fn download_follows_redirect_and_writes_exact_bytes() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    let payload = vec![42u8; 10_000];
    rt.block_on(async {
        Mock::given(path("/extensions/foo/1.0.0/download"))
            .respond_with(
                ResponseTemplate::new(302)
                    .insert_header("location", format!("{}/blobs/foo.tgz", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(path("/blobs/foo.tgz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .mount(&server)
            .await;
    });

    let transport = transport();
    let client = RegistryClient::new(transport.clone(), server.uri());
    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("foo.tar.gz");

    let written = Fetcher::new(transport, RetryPolicy::immediate(0))
        .fetch(&client.download_url("foo", "1.0.0"), &dest)
        .unwrap();

    assert_eq!(written, 10_000);
    assert_eq!(fs::read(&dest).unwrap(), payload);
}

#[test]
fn server_errors_are_retried_until_exhausted() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(
        Mock::given(path("/extensions/foo/1.0.0/download"))
            .respond_with(ResponseTemplate::new(500))
            .expect(6)
            .mount(&server),
    );

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("foo.tar.gz");
    let url = format!("{}/extensions/foo/1.0.0/download", server.uri());

    let err = Fetcher::new(transport(), RetryPolicy::immediate(5))
        .fetch(&url, &dest)
        .unwrap_err();

    let FetchError::Exhausted { attempts, last, .. } = err else {
        panic!("expected Exhausted");
    };
    assert_eq!(attempts, 6);
    assert!(matches!(*last, FetchError::Status { status: 500, .. }));
    assert!(!dest.exists());

    let received = rt.block_on(server.received_requests()).unwrap();
    assert_eq!(received.len(), 6);
}

#[test]
fn transient_failure_then_success() {
    let rt = runtime();
    let server = rt.block_on(MockServer::start());
    rt.block_on(async {
        Mock::given(path("/file"))
            .respond_with(ResponseTemplate::new(502))
            .up_to_n_times(2)
            .mount(&server)
            .await;
        Mock::given(path("/file"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"ok".to_vec()))
            .mount(&server)
            .await;
    });

    let temp = TempDir::new().unwrap();
    let dest = temp.path().join("file");

    let written = Fetcher::new(transport(), RetryPolicy::immediate(5))
        .fetch(&format!("{}/file", server.uri()), &dest)
        .unwrap();

    assert_eq!(written, 2);
    assert_eq!(fs::read(&dest).unwrap(), b"ok");
}

#[test]
fn unreachable_host_is_a_transport_error() {
    // Nothing listens on the discard port of the loopback address.
    let client = RegistryClient::new(transport(), "http://127.0.0.1:9");
    let err = client.search("anything").unwrap_err();
    assert!(matches!(err, Error::Transport(_)), "got {err:?}");
}
