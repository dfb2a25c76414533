//! HTTP handlers for the resume lifecycle: upload, delete, and presigned
//! download. Every entrypoint runs behind the identity gate; delete and
//! download additionally check ownership of the caller-supplied key.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Query, State};
use axum::{Extension, Json};
use bytes::Bytes;
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::auth::SessionUser;
use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::naming::{ensure_owned, resume_key};
use crate::state::AppState;
use crate::storage::DEFAULT_PRESIGN_TTL;

/// Max accepted resume size: 5 MiB.
pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Body ceiling for the upload route, slightly above the file ceiling so a
/// just-oversized file still parses and gets the precise validation message.
pub const MAX_UPLOAD_BODY_BYTES: usize = MAX_FILE_SIZE + 1024 * 1024;

/// MIME types accepted for upload, matched by value only.
const ALLOWED_TYPES: &[&str] = &[
    "application/pdf",
    "application/msword",
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
];

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub success: bool,
    pub data: ResumeRecord,
}

#[derive(Debug, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
pub struct DownloadResponse {
    pub success: bool,
    pub url: String,
}

#[derive(Debug, Deserialize)]
pub struct DeleteRequest {
    #[serde(rename = "s3Key")]
    pub s3_key: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DownloadQuery {
    #[serde(rename = "s3Key")]
    pub s3_key: Option<String>,
}

/// POST /api/resume/upload
///
/// The storage key is constructed from the verified identity, so no
/// ownership check is needed here; a put failure aborts with no metadata
/// produced.
pub async fn upload_resume(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (file_name, content_type, data) = read_file_field(multipart).await?;
    validate_upload(&content_type, data.len())?;

    let timestamp = Utc::now().timestamp_millis();
    let s3_key = resume_key(&user.email, timestamp, &file_name);

    state.store.put(&s3_key, data, &content_type).await?;

    let record = ResumeRecord {
        id: timestamp.to_string(),
        file_name,
        s3_key,
        uploaded_date: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    Ok(Json(UploadResponse {
        success: true,
        data: record,
    }))
}

/// DELETE /api/resume/delete
///
/// Best-effort against the remote store: the client clears its local record
/// whatever this returns, so a failed remote delete leaves an orphaned
/// object but never a dangling local reference.
pub async fn delete_resume(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    body: Result<Json<DeleteRequest>, JsonRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let Json(request) =
        body.map_err(|_| AppError::Validation("Invalid request body".to_string()))?;
    let s3_key = require_key(request.s3_key)?;
    ensure_owned(&user.email, &s3_key)?;

    state.store.delete(&s3_key).await?;

    Ok(Json(DeleteResponse { success: true }))
}

/// GET /api/resume?s3Key=...
///
/// Returns a time-boxed download URL; the URL itself carries the access
/// grant and the server holds no further session over its use.
pub async fn download_resume(
    State(state): State<AppState>,
    Extension(user): Extension<SessionUser>,
    Query(query): Query<DownloadQuery>,
) -> Result<Json<DownloadResponse>, AppError> {
    let s3_key = require_key(query.s3_key)?;
    ensure_owned(&user.email, &s3_key)?;

    let url = state.store.presign_get(&s3_key, DEFAULT_PRESIGN_TTL).await?;

    Ok(Json(DownloadResponse { success: true, url }))
}

/// Pulls the first `file` field out of the multipart payload; other fields
/// are skipped.
async fn read_file_field(mut multipart: Multipart) -> Result<(String, String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or("resume").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Malformed multipart payload: {e}")))?;
        return Ok((file_name, content_type, data));
    }

    Err(AppError::Validation("No file provided".to_string()))
}

/// Content-type allow-list and size ceiling; violations produce no side
/// effect on the store.
fn validate_upload(content_type: &str, size: usize) -> Result<(), AppError> {
    if !ALLOWED_TYPES.contains(&content_type) {
        return Err(AppError::Validation(
            "Invalid file type. Please upload a PDF or Word document.".to_string(),
        ));
    }
    if size > MAX_FILE_SIZE {
        return Err(AppError::Validation(
            "File too large. Maximum size is 5MB.".to_string(),
        ));
    }
    Ok(())
}

fn require_key(key: Option<String>) -> Result<String, AppError> {
    match key {
        Some(k) if !k.is_empty() => Ok(k),
        _ => Err(AppError::Validation("No S3 key provided".to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_accepts_each_allowed_type() {
        for mime in ALLOWED_TYPES {
            validate_upload(mime, 1200).unwrap();
        }
    }

    #[test]
    fn test_validate_rejects_other_types() {
        for mime in ["text/plain", "image/png", "application/octet-stream", ""] {
            assert!(matches!(
                validate_upload(mime, 1200),
                Err(AppError::Validation(_))
            ));
        }
    }

    #[test]
    fn test_validate_size_boundary() {
        // Exactly 5 MiB is accepted; one byte more is not.
        validate_upload("application/pdf", 5_242_880).unwrap();
        assert!(matches!(
            validate_upload("application/pdf", 5_242_881),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_validate_checks_type_before_size() {
        let err = validate_upload("text/plain", 6_000_000).unwrap_err();
        let AppError::Validation(msg) = err else {
            panic!("expected validation error");
        };
        assert!(msg.contains("Invalid file type"));
    }

    #[test]
    fn test_require_key_rejects_missing_and_empty() {
        assert!(require_key(None).is_err());
        assert!(require_key(Some(String::new())).is_err());
        assert_eq!(
            require_key(Some("users/a_at_b.com/x".to_string())).unwrap(),
            "users/a_at_b.com/x"
        );
    }

    #[test]
    fn test_upload_response_wire_shape() {
        let response = UploadResponse {
            success: true,
            data: ResumeRecord {
                id: "1722470400000".to_string(),
                file_name: "resume.docx".to_string(),
                s3_key: "users/jane.doe_at_x.com/original-resumes/1722470400000_resume.docx"
                    .to_string(),
                uploaded_date: "2026-08-07T12:00:00.000Z".to_string(),
            },
        };
        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], serde_json::json!(true));
        assert_eq!(value["data"]["fileName"], "resume.docx");
        assert_eq!(
            value["data"]["s3Key"],
            "users/jane.doe_at_x.com/original-resumes/1722470400000_resume.docx"
        );
    }

    #[test]
    fn test_delete_request_accepts_camel_case_key() {
        let request: DeleteRequest =
            serde_json::from_str(r#"{"s3Key":"users/a_at_b.com/original-resumes/1_r.pdf"}"#)
                .unwrap();
        assert_eq!(
            request.s3_key.as_deref(),
            Some("users/a_at_b.com/original-resumes/1_r.pdf")
        );

        let missing: DeleteRequest = serde_json::from_str("{}").unwrap();
        assert!(missing.s3_key.is_none());
    }
}
