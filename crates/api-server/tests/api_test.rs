//! End-to-end tests for the HTTP surface
//!
//! These run the full router against the in-memory backends, so the whole
//! upload → list → mark-done → delete → report flow is exercised without
//! MinIO or `PostgreSQL`.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use std::io::{Cursor, Write};
use std::sync::Arc;
use tower::ServiceExt;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip_depot_api_server::{build_router, ApiState};
use zip_depot_storage::{BucketConfig, MemoryObjectStorage, MemoryOperationLog, ObjectStorage};

const BOUNDARY: &str = "zip-depot-test-boundary";
const MAX_UPLOAD: usize = 4 * 1024 * 1024;

fn test_router() -> (Router, Arc<MemoryObjectStorage>) {
    let store = Arc::new(MemoryObjectStorage::with_public_buckets(
        "http://localhost:9000",
        &["extracted"],
    ));
    let state = ApiState::new(
        store.clone(),
        Arc::new(MemoryOperationLog::new()),
        BucketConfig {
            extracted: "extracted".to_string(),
            completed: "done".to_string(),
        },
    );

    (build_router(state, MAX_UPLOAD), store)
}

fn build_zip(files: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();

    for (name, contents) in files {
        writer.start_file(*name, options).unwrap();
        writer.write_all(contents).unwrap();
    }

    writer.finish().unwrap().into_inner()
}

fn multipart_body(field: &str, payload: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    write!(
        body,
        "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.zip\"\r\nContent-Type: application/zip\r\n\r\n"
    )
    .unwrap();
    body.extend_from_slice(payload);
    write!(body, "\r\n--{BOUNDARY}--\r\n").unwrap();
    body
}

fn upload_request(field: &str, payload: &[u8]) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/upload-zip")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(field, payload)))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_stores_and_reports_keys() {
    let (router, store) = test_router();
    let zip = build_zip(&[
        ("job1/a.txt", b"one"),
        ("job1/dir/b.txt", b"two"),
        ("../../evil.txt", b"payload"),
    ]);

    let response = router.oneshot(upload_request("file", &zip)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["ok"], true);

    let mut uploaded: Vec<String> = body["uploaded"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap().to_string())
        .collect();
    uploaded.sort();
    assert_eq!(uploaded, vec!["evil.txt", "job1/a.txt", "job1/dir/b.txt"]);
    assert!(body["failed"].as_array().unwrap().is_empty());

    assert_eq!(store.object_count("extracted").await, 3);
    assert!(store.get_object("extracted", "evil.txt").await.is_ok());
}

#[tokio::test]
async fn test_upload_without_file_field_is_rejected() {
    let (router, store) = test_router();
    let zip = build_zip(&[("a.txt", b"one")]);

    let response = router
        .oneshot(upload_request("document", &zip))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("file"));
    assert_eq!(store.object_count("extracted").await, 0);
}

#[tokio::test]
async fn test_corrupt_upload_stores_nothing() {
    let (router, store) = test_router();

    let response = router
        .oneshot(upload_request("file", b"definitely not a zip"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = json_body(response).await;
    assert!(body["error"].as_str().unwrap().contains("corrupt"));
    assert_eq!(store.object_count("extracted").await, 0);
}

#[tokio::test]
async fn test_oversized_upload_is_rejected() {
    let (router, _store) = test_router();
    let huge = vec![0u8; MAX_UPLOAD + 1];

    let response = router.oneshot(upload_request("file", &huge)).await.unwrap();
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_files_listing_annotates_public_urls() {
    let (router, _store) = test_router();
    let zip = build_zip(&[("job1/a.txt", b"one")]);

    router
        .clone()
        .oneshot(upload_request("file", &zip))
        .await
        .unwrap();

    let response = router
        .oneshot(Request::get("/files").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    let files = body["files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["name"], "job1/a.txt");
    assert_eq!(
        files[0]["publicUrl"],
        "http://localhost:9000/extracted/job1/a.txt"
    );
}

#[tokio::test]
async fn test_full_folder_lifecycle() {
    let (router, store) = test_router();
    let zip = build_zip(&[("job1/a.txt", b"one"), ("job1/b.txt", b"two")]);

    // Upload
    router
        .clone()
        .oneshot(upload_request("file", &zip))
        .await
        .unwrap();

    // Extracted listing sees both files
    let response = router
        .clone()
        .oneshot(
            Request::get("/extracted/job1/list")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json_body(response).await;
    assert_eq!(body["files"].as_array().unwrap().len(), 2);

    // Mark done
    let response = router
        .clone()
        .oneshot(
            Request::post("/extracted/job1/done")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["ok"], true);

    // Sources are gone; completed listing has both files plus the marker
    assert_eq!(store.object_count("extracted").await, 0);
    let response = router
        .clone()
        .oneshot(Request::get("/done/job1/list").body(Body::empty()).unwrap())
        .await
        .unwrap();
    let body = json_body(response).await;
    let names: Vec<&str> = body["files"]
        .as_array()
        .unwrap()
        .iter()
        .map(|f| f["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names.contains(&"job1/.completed.json"));

    // Delete the completed folder
    let response = router
        .clone()
        .oneshot(
            Request::delete("/done/job1/delete")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(store.object_count("done").await, 0);

    // A second delete finds nothing
    let response = router
        .oneshot(
            Request::delete("/done/job1/delete")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_report_generation_returns_pdf() {
    let (router, _store) = test_router();
    let zip = build_zip(&[("job1/a.txt", b"one")]);

    router
        .clone()
        .oneshot(upload_request("file", &zip))
        .await
        .unwrap();

    for report_type in ["extracted", "completed", "operations"] {
        let response = router
            .clone()
            .oneshot(
                Request::post("/print/generate")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(format!(
                        r#"{{"reportType": "{report_type}"}}"#
                    )))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{report_type}");
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/pdf",
            "{report_type}"
        );

        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert!(bytes.starts_with(b"%PDF-"), "{report_type}");
    }
}

#[tokio::test]
async fn test_unknown_report_type_is_rejected() {
    let (router, _store) = test_router();

    let response = router
        .oneshot(
            Request::post("/print/generate")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"reportType": "everything"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_check() {
    let (router, _store) = test_router();

    let response = router
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = json_body(response).await;
    assert_eq!(body["status"], "ok");
}
