//! End-to-end tests: pack a directory into a store, serve it over a real
//! socket, and check the wire-level responses.

use std::fs;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::Notify;

use pagevault::config::{Config, LoggingConfig, ServerConfig, StoreConfig};
use pagevault::pack::pack_tree;
use pagevault::store::{Page, PageReader, PageWriter};
use pagevault::Server;

const INDEX_BODY: &[u8] = b"<html></html>";
const NESTED_BODY: &[u8] = b"plain text body";

fn write_site(root: &Path) {
    fs::write(root.join("index.html"), INDEX_BODY).unwrap();
    fs::create_dir_all(root.join("a")).unwrap();
    fs::write(root.join("a/b.txt"), NESTED_BODY).unwrap();
    fs::write(root.join("empty.bin"), b"").unwrap();
}

fn pack_site(root: &Path, store: &Path) {
    let writer = PageWriter::open(store).unwrap();
    let summary = pack_tree(root, &writer);
    assert_eq!(summary.failed, 0);
}

fn test_config(store: &Path) -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        store: StoreConfig {
            path: store.to_path_buf(),
            busy_timeout_ms: 5000,
        },
        logging: LoggingConfig { access_log: false },
    }
}

/// Issue one raw HTTP/1.1 request and collect the full response.
async fn raw_request(addr: SocketAddr, method: &str, path: &str) -> String {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    let request = format!("{method} {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = Vec::new();
    stream.read_to_end(&mut response).await.unwrap();
    String::from_utf8_lossy(&response).into_owned()
}

/// Run `check` against a server bound to an ephemeral port, then shut
/// the serve loop down and wait for it to return.
async fn with_server<F, Fut>(store: &Path, check: F)
where
    F: FnOnce(SocketAddr) -> Fut,
    Fut: std::future::Future<Output = ()>,
{
    let shutdown = Arc::new(Notify::new());
    let cfg = test_config(store);
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();

    let local = tokio::task::LocalSet::new();
    local
        .run_until(async {
            let server = Server::bind(addr, &cfg, Arc::clone(&shutdown)).unwrap();
            let bound_addr = server.local_addr().unwrap();
            let serve_task = tokio::task::spawn_local(server.serve());

            check(bound_addr).await;

            shutdown.notify_one();
            serve_task.await.unwrap().unwrap();
        })
        .await;
}

#[tokio::test]
async fn get_root_serves_index_page() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");
    pack_site(site.path(), &store);

    with_server(&store, |addr| async move {
        let response = raw_request(addr, "GET", "/").await;
        assert!(response.starts_with("HTTP/1.1 200"), "got: {response}");
        assert!(response.contains("content-type: text/html")
            || response.contains("Content-Type: text/html"));
        assert!(response.ends_with("<html></html>"));
    })
    .await;
}

#[tokio::test]
async fn get_nested_path_serves_exact_bytes() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");
    pack_site(site.path(), &store);

    with_server(&store, |addr| async move {
        let response = raw_request(addr, "GET", "/a/b.txt").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("content-type: text/plain")
            || response.contains("Content-Type: text/plain"));
        assert!(response.ends_with("plain text body"));
    })
    .await;
}

#[tokio::test]
async fn get_missing_path_is_404_with_fixed_message() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");
    pack_site(site.path(), &store);

    with_server(&store, |addr| async move {
        let response = raw_request(addr, "GET", "/missing").await;
        assert!(response.starts_with("HTTP/1.1 404"));
        assert!(response.ends_with("404 Not Found"));
    })
    .await;
}

#[tokio::test]
async fn empty_page_serves_empty_body() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");
    pack_site(site.path(), &store);

    with_server(&store, |addr| async move {
        let response = raw_request(addr, "GET", "/empty.bin").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        assert!(response.contains("content-length: 0")
            || response.contains("Content-Length: 0"));
        assert!(response.ends_with("\r\n\r\n"));
    })
    .await;
}

#[tokio::test]
async fn head_mirrors_get_without_body() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");
    pack_site(site.path(), &store);

    with_server(&store, |addr| async move {
        let response = raw_request(addr, "HEAD", "/").await;
        assert!(response.starts_with("HTTP/1.1 200"));
        let expected_length = format!("content-length: {}", INDEX_BODY.len());
        assert!(
            response.to_ascii_lowercase().contains(&expected_length),
            "got: {response}"
        );
        assert!(response.ends_with("\r\n\r\n"));
    })
    .await;
}

#[tokio::test]
async fn post_is_method_not_allowed() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");
    pack_site(site.path(), &store);

    with_server(&store, |addr| async move {
        let response = raw_request(addr, "POST", "/index.html").await;
        assert!(response.starts_with("HTTP/1.1 405"));
    })
    .await;
}

#[tokio::test]
async fn requests_after_first_keep_serving() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");
    pack_site(site.path(), &store);

    with_server(&store, |addr| async move {
        // A miss must not affect later requests on the same server.
        let miss = raw_request(addr, "GET", "/nope").await;
        assert!(miss.starts_with("HTTP/1.1 404"));
        for _ in 0..3 {
            let hit = raw_request(addr, "GET", "/a/b.txt").await;
            assert!(hit.starts_with("HTTP/1.1 200"));
        }
    })
    .await;
}

#[tokio::test]
async fn bind_fails_without_store() {
    let out = tempfile::tempdir().unwrap();
    let cfg = test_config(&out.path().join("absent.db"));
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();

    let result = Server::bind(addr, &cfg, Arc::new(Notify::new()));
    assert!(result.is_err());
}

#[test]
fn repacking_unchanged_tree_is_idempotent() {
    let site = tempfile::tempdir().unwrap();
    write_site(site.path());
    let out = tempfile::tempdir().unwrap();
    let store = out.path().join("pages.db");

    pack_site(site.path(), &store);
    let reader = PageReader::open(&store).unwrap();
    let first: Vec<_> = ["/index.html", "/a/b.txt", "/empty.bin"]
        .iter()
        .map(|p| reader.load(p).unwrap().unwrap())
        .collect();
    drop(reader);

    pack_site(site.path(), &store);
    let reader = PageReader::open(&store).unwrap();
    for page in &first {
        let repacked = reader.load(page.path()).unwrap().unwrap();
        assert_eq!(&repacked, page);
    }
}
