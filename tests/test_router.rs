use std::io::{self, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use wicket::http::request::{Method, Request, RequestBuilder};
use wicket::http::response::StatusCode;
use wicket::routes::{DiskStore, FileError, FileStore, Router};

fn request(method: Method, target: &str) -> RequestBuilder {
    RequestBuilder::new()
        .method(method)
        .target(target)
        .header("Host", "localhost:4221")
}

fn get(target: &str) -> Request {
    request(Method::GET, target).build().unwrap()
}

/// Store whose every operation fails with a non-NotFound error
struct BrokenStore;

impl FileStore for BrokenStore {
    async fn read(&self, _root: &Path, _name: &str) -> Result<Vec<u8>, FileError> {
        Err(FileError::Io(io::Error::other("disk unavailable")))
    }

    async fn write(&self, _root: &Path, _name: &str, _contents: &[u8]) -> Result<(), FileError> {
        Err(FileError::Io(io::Error::other("disk unavailable")))
    }
}

#[tokio::test]
async fn test_root_is_empty_ok() {
    let response = Router::new(None).route(&get("/")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.body.is_empty());
    assert_eq!(response.header("Content-Type"), None);
    assert_eq!(response.header("Content-Length"), Some("0"));
}

#[tokio::test]
async fn test_echo_plain() {
    let response = Router::new(None).route(&get("/echo/hello")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"hello".to_vec());
    assert_eq!(response.header("Content-Length"), Some("5"));
    assert_eq!(response.header("Content-Type"), Some("text/plain"));
    assert_eq!(response.header("Content-Encoding"), None);
}

#[tokio::test]
async fn test_echo_gzip_when_accepted() {
    let req = request(Method::GET, "/echo/hello")
        .header("Accept-Encoding", "invalid-encoding, gzip")
        .build()
        .unwrap();
    let response = Router::new(None).route(&req).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.header("Content-Encoding"), Some("gzip"));
    assert_eq!(
        response.header("Content-Length"),
        Some(response.body.len().to_string().as_str())
    );

    let mut decoded = String::new();
    GzDecoder::new(response.body.as_slice())
        .read_to_string(&mut decoded)
        .unwrap();
    assert_eq!(decoded, "hello");
}

#[tokio::test]
async fn test_echo_unsupported_encoding_is_plain() {
    let req = request(Method::GET, "/echo/abc")
        .header("Accept-Encoding", "invalid-encoding")
        .build()
        .unwrap();
    let response = Router::new(None).route(&req).await;

    assert_eq!(response.header("Content-Encoding"), None);
    assert_eq!(response.body, b"abc".to_vec());
}

#[tokio::test]
async fn test_echo_without_value_is_not_found() {
    let response = Router::new(None).route(&get("/echo")).await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_user_agent_reflected() {
    let req = request(Method::GET, "/user-agent")
        .header("User-Agent", "foobar/1.2.3")
        .build()
        .unwrap();
    let response = Router::new(None).route(&req).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert_eq!(response.body, b"foobar/1.2.3".to_vec());
    assert_eq!(response.header("Content-Length"), Some("12"));
}

#[tokio::test]
async fn test_user_agent_missing_is_empty() {
    let response = Router::new(None).route(&get("/user-agent")).await;

    assert_eq!(response.status, StatusCode::Ok);
    assert!(response.body.is_empty());
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let router = Router::new(None);

    assert_eq!(router.route(&get("/nope")).await.status, StatusCode::NotFound);
    assert_eq!(router.route(&get("/files")).await.status, StatusCode::NotFound);
    assert_eq!(router.route(&get("/files/a/b")).await.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_put_and_delete_are_not_allowed() {
    let router = Router::new(None);

    for method in [Method::PUT, Method::DELETE] {
        for target in ["/echo", "/", "/files/a.txt"] {
            let response = router.route(&request(method.clone(), target).build().unwrap()).await;
            assert_eq!(response.status, StatusCode::MethodNotAllowed);
        }
    }
}

#[tokio::test]
async fn test_unrecognized_method_is_bad_request() {
    let router = Router::new(None);

    for method in [Method::Other("FOO".to_string()), Method::PATCH, Method::HEAD] {
        let response = router.route(&request(method, "/echo/x").build().unwrap()).await;
        assert_eq!(response.status, StatusCode::BadRequest);
    }
}

#[tokio::test]
async fn test_post_outside_files_is_not_found() {
    let response = Router::new(None)
        .route(&request(Method::POST, "/echo/x").build().unwrap())
        .await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_files_without_directory_is_server_error() {
    let router = Router::new(None);

    let read = router.route(&get("/files/a.txt")).await;
    assert_eq!(read.status, StatusCode::InternalServerError);
    assert!(!read.body.is_empty());

    let write = router
        .route(&request(Method::POST, "/files/a.txt").body(b"abc".to_vec()).build().unwrap())
        .await;
    assert_eq!(write.status, StatusCode::InternalServerError);
}

#[tokio::test]
async fn test_files_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let router = Router::new(Some(dir.path().to_path_buf()));

    let created = router
        .route(
            &request(Method::POST, "/files/foo.txt")
                .header("Content-Length", "3")
                .body(b"abc".to_vec())
                .build()
                .unwrap(),
        )
        .await;
    assert_eq!(created.status, StatusCode::Created);
    assert!(created.body.is_empty());

    let on_disk = DiskStore.read(dir.path(), "foo.txt").await.unwrap();
    assert_eq!(on_disk, b"abc".to_vec());

    let fetched = router.route(&get("/files/foo.txt")).await;
    assert_eq!(fetched.status, StatusCode::Ok);
    assert_eq!(fetched.body, b"abc".to_vec());
    assert_eq!(fetched.header("Content-Type"), Some("application/octet-stream"));
    assert_eq!(fetched.header("Content-Length"), Some("3"));
}

#[tokio::test]
async fn test_files_missing_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let router = Router::new(Some(dir.path().to_path_buf()));

    let response = router.route(&get("/files/missing.txt")).await;

    assert_eq!(response.status, StatusCode::NotFound);
}

#[tokio::test]
async fn test_files_read_of_directory_is_server_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir(dir.path().join("sub")).unwrap();
    let router = Router::new(Some(dir.path().to_path_buf()));

    let response = router.route(&get("/files/sub")).await;

    assert_eq!(response.status, StatusCode::InternalServerError);
}

#[tokio::test]
async fn test_files_store_failures_are_server_errors() {
    let dir = tempfile::tempdir().unwrap();
    let router = Router::with_store(Some(dir.path().to_path_buf()), BrokenStore);

    let read = router.route(&get("/files/a.txt")).await;
    assert_eq!(read.status, StatusCode::InternalServerError);

    let write = router
        .route(&request(Method::POST, "/files/a.txt").body(b"abc".to_vec()).build().unwrap())
        .await;
    assert_eq!(write.status, StatusCode::InternalServerError);
}
