//! ApiClient against an in-process fake backend.

use std::collections::HashMap;

use axum::extract::{Path, Query};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use udm_dash::models::{MatchingStatus, PatternTestRequest, ScanMode, UdmFilters};
use udm_dash::{ApiClient, ApiError, ErrorBody};

fn item(name: &str, status: &str, detail: &str) -> Value {
    json!({
        "file_name": name,
        "nas": null,
        "segment_count": 2,
        "udm_count": 1,
        "segments": [],
        "status": status,
        "status_detail": detail,
        "warnings": [],
    })
}

async fn matrix(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    let detail = format!(
        "status={} search={}",
        params.get("status").map(String::as_str).unwrap_or("-"),
        params.get("search").map(String::as_str).unwrap_or("-"),
    );
    Json(json!({
        "total_files": 1,
        "total_segments": 2,
        "matched_files": 1,
        "matched_segments": 1,
        "orphan_records": 0,
        "unmatched_nas": 0,
        "items": [item("WSOP_2003_Final.mp4", "partial", &detail)],
    }))
}

async fn segments(Path(name): Path<String>) -> Json<Value> {
    Json(json!({
        "file_name": name,
        "nas": null,
        "total_segments": 0,
        "converted_segments": 0,
        "segments": [],
    }))
}

async fn missing_asset(Path(_uuid): Path<String>) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(json!({"detail": "Asset not found"})),
    )
}

async fn broken_stats() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "database exploded\n")
}

async fn wrong_shape() -> Json<Value> {
    Json(json!({"matching": "not an object"}))
}

async fn full_assets() -> Json<Value> {
    Json(json!({
        "total": 3,
        "filtered": 3,
        "assets": [
            {"asset_uuid": "a", "file_name": "a.mp4", "segments": [{"segment_uuid": "s1"}]},
            {"asset_uuid": "b", "file_name": "b.mp4", "segments": []},
            {"asset_uuid": "c", "file_name": "c.mp4"},
        ],
    }))
}

async fn pattern_test(Json(body): Json<Value>) -> Json<Value> {
    Json(json!({
        "success": true,
        "matched": body.get("regex").is_some(),
        "pattern_name": body["file_name"],
        "extracted_groups": {"year": 2003},
        "error": null,
    }))
}

async fn nas_refresh(Query(params): Query<HashMap<String, String>>) -> Json<Value> {
    Json(json!({
        "message": "ok",
        "mode": params.get("mode").cloned().unwrap_or_default(),
        "total_files": 12,
        "total_size_gb": 1.5,
        "scan_duration_sec": 0.2,
        "brand_counts": {"WSOP": 12},
    }))
}

async fn start_backend() -> ApiClient {
    let app = Router::new()
        .route("/api/matching/matrix", get(matrix))
        .route("/api/matching/file/:name/segments", get(segments))
        .route("/api/matching/stats", get(wrong_shape))
        .route("/api/udm/assets/full", get(full_assets))
        .route("/api/udm/assets/:uuid", get(missing_asset))
        .route("/api/udm/stats", get(broken_stats))
        .route("/api/pattern/test", post(pattern_test))
        .route("/api/nas/refresh", post(nas_refresh));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    ApiClient::with_client(reqwest::Client::new(), &format!("http://{}/api/", addr))
}

#[tokio::test]
async fn test_matrix_sends_status_and_search() {
    let api = start_backend().await;

    let matrix = api
        .matching_matrix(Some(MatchingStatus::NoMetadata), Some("wsop"))
        .await
        .unwrap();
    assert_eq!(matrix.items.len(), 1);
    assert_eq!(matrix.items[0].status, MatchingStatus::Partial);
    assert_eq!(matrix.items[0].status_detail, "status=no_metadata search=wsop");

    let unfiltered = api.matching_matrix(None, Some("")).await.unwrap();
    assert_eq!(unfiltered.items[0].status_detail, "status=- search=-");
}

#[tokio::test]
async fn test_file_name_is_percent_encoded_in_path() {
    let api = start_backend().await;
    let name = "WSOP 2003/Final #1.mp4";
    let detail = api.file_segments(name).await.unwrap();
    assert_eq!(detail.file_name, name);
}

#[tokio::test]
async fn test_json_error_detail_is_kept() {
    let api = start_backend().await;
    let err = api.asset("does-not-exist").await.unwrap_err();

    assert!(err.is_not_found());
    match &err {
        ApiError::Status {
            status,
            status_text,
            body,
        } => {
            assert_eq!(*status, 404);
            assert_eq!(status_text, "Not Found");
            assert!(matches!(body, ErrorBody::Json(_)));
            assert_eq!(body.detail(), Some("Asset not found"));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert_eq!(
        err.to_string(),
        "API error 404 Not Found: Asset not found"
    );
}

#[tokio::test]
async fn test_text_error_body() {
    let api = start_backend().await;
    let err = api.udm_stats().await.unwrap_err();

    assert_eq!(err.status(), Some(500));
    match &err {
        ApiError::Status { body, .. } => {
            assert_eq!(body, &ErrorBody::Text("database exploded\n".to_string()));
        }
        other => panic!("expected status error, got {other:?}"),
    }
    assert!(err.to_string().ends_with("database exploded"));
}

#[tokio::test]
async fn test_unexpected_shape_is_decode_error() {
    let api = start_backend().await;
    let err = api.matching_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Decode { .. }));
    assert_eq!(err.status(), None);
}

#[tokio::test]
async fn test_refused_connection_is_transport_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let api = ApiClient::with_client(reqwest::Client::new(), &format!("http://{}/api", addr));
    let err = api.matching_stats().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_has_segments_filters_locally() {
    let api = start_backend().await;

    let all = api.full_assets(&UdmFilters::default()).await.unwrap();
    assert_eq!(all.assets.len(), 3);
    assert_eq!(all.filtered, 3);

    let with = api
        .full_assets(&UdmFilters {
            has_segments: Some(true),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(with.total, 3);
    assert_eq!(with.filtered, 1);
    assert_eq!(with.assets[0]["asset_uuid"], "a");

    let without = api
        .full_assets(&UdmFilters {
            has_segments: Some(false),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(without.filtered, 2);
}

#[tokio::test]
async fn test_pattern_test_posts_json_body() {
    let api = start_backend().await;

    let plain = api
        .test_pattern(&PatternTestRequest {
            file_name: "WSOP_2003.mp4".to_string(),
            regex: None,
        })
        .await
        .unwrap();
    assert!(plain.success);
    assert!(!plain.matched);
    assert_eq!(plain.pattern_name.as_deref(), Some("WSOP_2003.mp4"));
    assert_eq!(plain.extracted_groups["year"], 2003);

    let custom = api
        .test_pattern(&PatternTestRequest {
            file_name: "x.mp4".to_string(),
            regex: Some(r"(?P<year>\d{4})".to_string()),
        })
        .await
        .unwrap();
    assert!(custom.matched);
}

#[tokio::test]
async fn test_refresh_sends_mode() {
    let api = start_backend().await;
    let result = api.refresh_nas(ScanMode::Incremental).await.unwrap();
    assert_eq!(result.mode, ScanMode::Incremental);
    assert_eq!(result.brand_counts["WSOP"], 12);
}
