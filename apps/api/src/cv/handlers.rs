//! Axum route handler for CV generation.

use std::sync::Arc;

use anyhow::Context;
use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::{info, warn};

use crate::cv::models::{validate_name, ResumeRecord};
use crate::errors::AppError;
use crate::render::{render, RenderError};
use crate::state::AppState;
use crate::storage::{generated_key, ObjectStore};

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// A rendered CV and the filename it is offered and archived under.
#[derive(Debug, Clone)]
pub struct GeneratedCv {
    pub filename: String,
    pub pdf: Bytes,
}

impl GeneratedCv {
    pub fn into_http_response(self) -> Result<Response, AppError> {
        let disposition = format!("inline; filename=\"{}\"", escape_quoted(&self.filename));
        let disposition = HeaderValue::from_str(&disposition)
            .context("filename is not a valid Content-Disposition value")?;

        Ok((
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, HeaderValue::from_static(PDF_CONTENT_TYPE)),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            self.pdf,
        )
            .into_response())
    }
}

/// POST /api/cv
///
/// Validates `name`, renders the PDF and returns it inline. A copy is handed to the
/// storage collaborator in the background; its outcome never affects this response.
pub async fn handle_create_cv(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, AppError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|_| AppError::Validation("Request body must be valid JSON".to_string()))?;

    let generated = create_document(payload, Utc::now()).await?;
    info!(
        filename = %generated.filename,
        bytes = generated.pdf.len(),
        "Generated CV"
    );

    archive(state.storage.clone(), &generated);
    generated.into_http_response()
}

/// Validates and renders a payload. The name check happens before any decoding or layout.
pub async fn create_document(payload: Value, now: DateTime<Utc>) -> Result<GeneratedCv, AppError> {
    let name = validate_name(&payload)?.to_string();
    let record: ResumeRecord = serde_json::from_value(payload).map_err(RenderError::from)?;

    // Layout and serialization are CPU-bound; keep them off the async executor.
    let pdf = tokio::task::spawn_blocking(move || render(&record))
        .await
        .context("render task failed")??;

    Ok(GeneratedCv {
        filename: cv_filename(&name, now),
        pdf: Bytes::from(pdf),
    })
}

/// `CV_<name, spaces as underscores>_<YYYYMMDD_HHMMSS>.pdf`
///
/// Control characters become underscores too; they are not allowed in a header value.
pub fn cv_filename(name: &str, at: DateTime<Utc>) -> String {
    let name: String = name
        .chars()
        .map(|c| if c == ' ' || c.is_control() { '_' } else { c })
        .collect();
    format!("CV_{}_{}.pdf", name, at.format("%Y%m%d_%H%M%S"))
}

/// Fire-and-forget upload to `generated/<filename>`. Failures are logged and dropped.
fn archive(storage: Arc<dyn ObjectStore>, generated: &GeneratedCv) {
    let key = generated_key(&generated.filename);
    let pdf = generated.pdf.clone();
    tokio::spawn(async move {
        if let Err(e) = storage.put(&key, pdf, PDF_CONTENT_TYPE).await {
            warn!("Storage upload of {key} failed: {e}");
        }
    });
}

fn escape_quoted(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::{
        body::{to_bytes, Body},
        http::Request,
        Router,
    };
    use chrono::TimeZone;
    use serde_json::json;
    use std::time::Duration;
    use tokio::sync::mpsc;
    use tower::ServiceExt;

    use crate::routes::build_router;
    use crate::storage::{DisabledStore, StorageError};

    struct FailingStore;

    #[async_trait]
    impl ObjectStore for FailingStore {
        async fn put(&self, _key: &str, _body: Bytes, _ct: &str) -> Result<(), StorageError> {
            Err(StorageError::Rejected {
                status: 503,
                body: "bucket unavailable".to_string(),
            })
        }

        fn describe(&self) -> String {
            "failing".to_string()
        }
    }

    struct RecordingStore {
        uploads: mpsc::UnboundedSender<(String, Bytes, String)>,
    }

    #[async_trait]
    impl ObjectStore for RecordingStore {
        async fn put(&self, key: &str, body: Bytes, ct: &str) -> Result<(), StorageError> {
            let _ = self.uploads.send((key.to_string(), body, ct.to_string()));
            Ok(())
        }

        fn describe(&self) -> String {
            "recording".to_string()
        }
    }

    fn app(storage: Arc<dyn ObjectStore>) -> Router {
        build_router(AppState { storage })
    }

    fn post_cv(body: impl Into<Body>) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/cv")
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap()
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Option<String>, Bytes) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let disposition = response
            .headers()
            .get(header::CONTENT_DISPOSITION)
            .map(|v| v.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, disposition, body)
    }

    fn message(body: &Bytes) -> String {
        let json: Value = serde_json::from_slice(body).unwrap();
        json["message"].as_str().unwrap().to_string()
    }

    #[test]
    fn test_cv_filename_is_deterministic() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(cv_filename("Jane Doe", at), "CV_Jane_Doe_20240309_070501.pdf");
        assert_eq!(cv_filename("Jane Doe", at), cv_filename("Jane Doe", at));
        assert_eq!(
            cv_filename("Mary Jane  Watson", at),
            "CV_Mary_Jane__Watson_20240309_070501.pdf"
        );
    }

    #[test]
    fn test_cv_filename_replaces_control_characters() {
        let at = Utc.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(cv_filename("Jane\nDoe", at), "CV_Jane_Doe_20240309_070501.pdf");
        assert_eq!(cv_filename("Jane\t\u{7F}Doe", at), "CV_Jane__Doe_20240309_070501.pdf");
        assert_eq!(cv_filename("José", at), "CV_José_20240309_070501.pdf");
    }

    #[test]
    fn test_escape_quoted() {
        assert_eq!(escape_quoted(r#"CV_a"b\c.pdf"#), r#"CV_a\"b\\c.pdf"#);
    }

    #[tokio::test]
    async fn test_create_document_rejects_blank_name_before_rendering() {
        let err = create_document(json!({ "name": "  ", "educations": "not a list" }), Utc::now())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Name is required");
    }

    #[tokio::test]
    async fn test_create_document_malformed_entries_is_render_error() {
        let err = create_document(
            json!({ "name": "Jane", "achievements": ["Award"] }),
            Utc::now(),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Render(RenderError::MalformedRecord(_))));
    }

    #[tokio::test]
    async fn test_create_document_names_file_from_payload() {
        let at = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();
        let generated = create_document(json!({ "name": "Jane Doe" }), at).await.unwrap();
        assert_eq!(generated.filename, "CV_Jane_Doe_20250102_030405.pdf");
        assert!(generated.pdf.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_post_cv_returns_inline_pdf() {
        let (status, disposition, body) = send(
            app(Arc::new(DisabledStore)),
            post_cv(json!({ "name": "Jane Doe" }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        let disposition = disposition.unwrap();
        assert!(disposition.starts_with("inline; filename=\"CV_Jane_Doe_"));
        assert!(disposition.ends_with(".pdf\""));
        assert!(body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_post_cv_name_with_line_break_is_served() {
        let (status, disposition, body) = send(
            app(Arc::new(DisabledStore)),
            post_cv(json!({ "name": "Jane\nDoe" }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(disposition.unwrap().starts_with("inline; filename=\"CV_Jane_Doe_"));
        assert!(body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_post_cv_sets_pdf_content_type() {
        let response = app(Arc::new(DisabledStore))
            .oneshot(post_cv(json!({ "name": "Jane" }).to_string()))
            .await
            .unwrap();
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            PDF_CONTENT_TYPE
        );
    }

    #[tokio::test]
    async fn test_post_cv_missing_name_is_400() {
        for body in [json!({}), json!({ "name": "" }), json!({ "name": "   " })] {
            let (status, _, body) =
                send(app(Arc::new(DisabledStore)), post_cv(body.to_string())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(message(&body), "Name is required");
        }
    }

    #[tokio::test]
    async fn test_post_cv_invalid_json_is_400() {
        let (status, _, body) = send(app(Arc::new(DisabledStore)), post_cv("{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(message(&body), "Request body must be valid JSON");
    }

    #[tokio::test]
    async fn test_post_cv_render_failure_is_500_with_message() {
        let (status, _, body) = send(
            app(Arc::new(DisabledStore)),
            post_cv(json!({ "name": "Jane", "certificates": [42] }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message(&body).starts_with("Malformed record"));
    }

    #[tokio::test]
    async fn test_post_cv_unsupported_character_is_500() {
        let (status, _, body) = send(
            app(Arc::new(DisabledStore)),
            post_cv(json!({ "name": "Jane", "careerObjective": "数据工程" }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(message(&body).contains("cannot be encoded"));
    }

    #[tokio::test]
    async fn test_storage_failure_does_not_change_response() {
        let payload = json!({ "name": "Jane Doe", "careerObjective": "Ship it." }).to_string();

        let (ok_status, _, ok_body) =
            send(app(Arc::new(DisabledStore)), post_cv(payload.clone())).await;
        let (failing_status, failing_disposition, failing_body) =
            send(app(Arc::new(FailingStore)), post_cv(payload)).await;

        assert_eq!(ok_status, StatusCode::OK);
        assert_eq!(failing_status, ok_status);
        assert!(failing_disposition.is_some());
        assert!(failing_body.starts_with(b"%PDF-"));
        assert!(ok_body.starts_with(b"%PDF-"));
    }

    #[tokio::test]
    async fn test_successful_generation_is_archived_under_generated_prefix() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (status, disposition, body) = send(
            app(Arc::new(RecordingStore { uploads: tx })),
            post_cv(json!({ "name": "Jane Doe" }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (key, uploaded, content_type) = tokio::time::timeout(Duration::from_secs(5), rx.recv())
            .await
            .expect("upload was not attempted")
            .unwrap();
        let filename = disposition
            .unwrap()
            .trim_start_matches("inline; filename=\"")
            .trim_end_matches('"')
            .to_string();
        assert_eq!(key, format!("generated/{filename}"));
        assert_eq!(uploaded, body);
        assert_eq!(content_type, PDF_CONTENT_TYPE);
    }

    #[tokio::test]
    async fn test_rejected_request_is_not_archived() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let (status, _, _) = send(
            app(Arc::new(RecordingStore { uploads: tx })),
            post_cv(json!({ "email": "jane@example.com" }).to_string()),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        tokio::task::yield_now().await;
        assert!(rx.try_recv().is_err());
    }
}
