//! HTTP server for Mini Cloud-Drive.
//!
//! Exposes the catalog service over a small JSON API and serves uploaded
//! blobs at the public download URLs the service hands out.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::{ServerConfig, DEFAULT_BODY_LIMIT};
pub use error::{ServerError, ServerResult};
pub use handler::AppState;
pub use server::DriveServer;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use axum::Router;
    use tower::util::ServiceExt;

    use drive_catalog::InMemoryCatalogStore;
    use drive_sdk::CatalogService;
    use drive_store::InMemoryBlobStore;
    use drive_types::FileRecord;

    const BOUNDARY: &str = "drive-test-boundary";

    fn service(max_bytes: u64) -> Arc<CatalogService> {
        let blobs = InMemoryBlobStore::with_base_url("bucket", "http://localhost/v1/blobs").unwrap();
        Arc::new(
            CatalogService::new(Arc::new(blobs), Arc::new(InMemoryCatalogStore::default()))
                .with_max_file_size(max_bytes),
        )
    }

    fn app(service: &Arc<CatalogService>) -> Router {
        router::build_router(AppState::new(Arc::clone(service)), &ServerConfig::default())
    }

    fn multipart_body(field: &str, filename: &str, content_type: &str, data: &[u8]) -> Vec<u8> {
        let mut body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
        body
    }

    fn upload_request(body: Vec<u8>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/v1/files")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
        serde_json::from_slice(&body_bytes(response).await).unwrap()
    }

    async fn upload(service: &Arc<CatalogService>, name: &str, data: &[u8]) -> FileRecord {
        let response = app(service)
            .oneshot(upload_request(multipart_body("file", name, "text/plain", data)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        body_json(response).await
    }

    #[tokio::test]
    async fn health_endpoint() {
        let response = app(&service(1024)).oneshot(get("/v1/health")).await.unwrap();
        assert_eq!(response.status(), 200);
    }

    #[tokio::test]
    async fn info_endpoint() {
        let response = app(&service(1024)).oneshot(get("/v1/info")).await.unwrap();
        assert_eq!(response.status(), 200);
        let info: serde_json::Value = body_json(response).await;
        assert_eq!(info["bucket"], "bucket");
        assert_eq!(info["collection"], "files");
        assert_eq!(info["max_file_size_bytes"], 1024);
    }

    #[tokio::test]
    async fn upload_then_list_and_show() {
        let service = service(1024);
        let record = upload(&service, "a.txt", b"hello").await;
        assert_eq!(record.original_name, "a.txt");
        assert_eq!(record.size_bytes, 5);
        assert_eq!(record.mime_type.as_deref(), Some("text/plain"));
        assert_eq!(record.file_extension, ".txt");

        let response = app(&service).oneshot(get("/v1/files")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let listed: Vec<FileRecord> = body_json(response).await;
        assert_eq!(listed, vec![record.clone()]);

        let response = app(&service)
            .oneshot(get(&format!("/v1/files/{}", record.id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let shown: FileRecord = body_json(response).await;
        assert_eq!(shown, record);
    }

    #[tokio::test]
    async fn show_unknown_is_not_found() {
        let response = app(&service(1024)).oneshot(get("/v1/files/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let err: serde_json::Value = body_json(response).await;
        assert!(err["error"].as_str().unwrap().contains("nope"));
    }

    #[tokio::test]
    async fn oversized_upload_is_rejected() {
        let service = service(4);
        let response = app(&service)
            .oneshot(upload_request(multipart_body("file", "big.bin", "application/octet-stream", b"12345")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let err: serde_json::Value = body_json(response).await;
        assert_eq!(err["error"], "file size exceeds 4 B limit");
        assert!(service.list().is_empty());
    }

    #[tokio::test]
    async fn upload_without_file_field_is_bad_request() {
        let service = service(1024);
        let response = app(&service)
            .oneshot(upload_request(multipart_body("attachment", "a.txt", "text/plain", b"x")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(service.list().is_empty());
    }

    #[tokio::test]
    async fn download_serves_stored_bytes() {
        let service = service(1024);
        let record = upload(&service, "a.txt", b"hello").await;
        let path = record
            .download_url
            .strip_prefix("http://localhost")
            .unwrap()
            .to_string();

        let response = app(&service).oneshot(get(&path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
        assert_eq!(body_bytes(response).await, b"hello");
    }

    #[tokio::test]
    async fn download_of_unpublished_blob_is_not_found() {
        let service = service(1024);
        service.blobs().put("uploads/secret", b"x", Some("text/plain")).unwrap();

        let response = app(&service)
            .oneshot(get("/v1/blobs/bucket/uploads/secret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        service.blobs().make_public("uploads/secret").unwrap();
        let response = app(&service)
            .oneshot(get("/v1/blobs/bucket/uploads/secret"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_bytes(response).await, b"x");
    }

    #[tokio::test]
    async fn download_of_other_bucket_is_not_found() {
        let response = app(&service(1024))
            .oneshot(get("/v1/blobs/elsewhere/uploads/x"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn delete_removes_file() {
        let service = service(1024);
        let record = upload(&service, "a.txt", b"hello").await;

        let response = app(&service)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!(
                        "/v1/files/{}?storage_path={}",
                        record.id, record.storage_path
                    ))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(service.list().is_empty());
    }

    #[tokio::test]
    async fn delete_of_missing_blob_is_bad_gateway() {
        let service = service(1024);
        let record = upload(&service, "a.txt", b"hello").await;

        let response = app(&service)
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/v1/files/{}?storage_path=uploads/missing", record.id))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let err: serde_json::Value = body_json(response).await;
        assert!(err["error"].as_str().unwrap().starts_with("blob store error"));
        assert_eq!(service.list().len(), 1);
    }

    #[tokio::test]
    async fn delete_without_storage_path_is_bad_request() {
        let response = app(&service(1024))
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri("/v1/files/some-id")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn stats_endpoint() {
        let service = service(1024);
        upload(&service, "a.txt", b"hello").await;
        upload(&service, "b.txt", b"world!").await;

        let response = app(&service).oneshot(get("/v1/stats")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let stats: serde_json::Value = body_json(response).await;
        assert_eq!(stats["total_files"], 2);
        assert_eq!(stats["total_size_bytes"], 11);
    }
}
