use std::convert::Infallible;
use std::net::SocketAddr;

use axum::Json;
use axum::extract::multipart::Field;
use axum::extract::{ConnectInfo, FromRequestParts, Multipart, State};
use axum::http::request::Parts;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tracing::{info, warn};

use skyline_core::models::attachment::{PNG_MEDIA_TYPE, SignatureSource, UploadedFile};
use skyline_core::models::certification::SubmitterContext;

use crate::error::{ApiError, SubmitResponse};
use crate::pipeline::{IncomingSubmission, process};
use crate::state::{AppState, UploadLimits};

pub const SOURCE_DOCUMENT_PART: &str = "pdf_attachment";
pub const SIGNATURE_PART: &str = "signature";
pub const INLINE_SIGNATURE_FIELD: &str = "signature_data";

pub fn success_message(recipient: &str) -> String {
    format!("Form submitted successfully! A copy with PDF attachment has been sent to {recipient}")
}

/// Accept a booking form post, render it and email it.
pub async fn submit_form(
    State(state): State<AppState>,
    SubmitterInfo(submitter): SubmitterInfo,
    mut multipart: Multipart,
) -> Result<Json<SubmitResponse>, ApiError> {
    let submission = read_submission(&mut multipart, state.limits).await?;
    let delivered = process(&state, submission, submitter).await?;

    info!(
        document_id = %delivered.document_id,
        strategy = %delivered.strategy,
        attachments = delivered.attachments,
        "submission delivered"
    );

    Ok(Json(SubmitResponse {
        success: true,
        message: success_message(&state.dispatch.to),
    }))
}

/// Drain the multipart stream, enforcing the per-file ceiling as bytes
/// arrive.
pub async fn read_submission(
    multipart: &mut Multipart,
    limits: UploadLimits,
) -> Result<IncomingSubmission, ApiError> {
    let mut submission = IncomingSubmission::default();
    let mut signature_upload = None;
    let mut inline_signature = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            SOURCE_DOCUMENT_PART => {
                submission.source_upload = read_file(field, &name, limits).await?;
            }
            SIGNATURE_PART if field.file_name().is_some() => {
                signature_upload = read_file(field, &name, limits).await?;
            }
            INLINE_SIGNATURE_FIELD => {
                let value = field.text().await?;
                inline_signature = decode_data_url(&value, limits)?;
            }
            _ => {
                let value = field.text().await?;
                submission.form.push(&name, value);
            }
        }
    }

    submission.signature = signature_upload
        .map(SignatureSource::Upload)
        .or(inline_signature);
    Ok(submission)
}

/// An empty file part (no file chosen) counts as absent.
async fn read_file(
    mut field: Field<'_>,
    name: &str,
    limits: UploadLimits,
) -> Result<Option<UploadedFile>, ApiError> {
    let filename = field
        .file_name()
        .map(str::to_string)
        .filter(|f| !f.is_empty());
    let media_type = field.content_type().map(str::to_string);

    let mut content = Vec::new();
    while let Some(chunk) = field.chunk().await? {
        if content.len() + chunk.len() > limits.max_file_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "part '{name}' exceeds {} bytes",
                limits.max_file_bytes
            )));
        }
        content.extend_from_slice(&chunk);
    }

    if content.is_empty() {
        return Ok(None);
    }
    Ok(Some(UploadedFile {
        filename,
        media_type,
        content,
    }))
}

/// Decode a `data:image/...;base64,` URL. Anything else is ignored with a
/// warning so the document is produced without a signature.
fn decode_data_url(value: &str, limits: UploadLimits) -> Result<Option<SignatureSource>, ApiError> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(None);
    }

    let Some((meta, payload)) = value
        .strip_prefix("data:")
        .and_then(|rest| rest.split_once(','))
    else {
        warn!("inline signature is not a data URL, ignoring it");
        return Ok(None);
    };
    let Some(media_type) = meta.strip_suffix(";base64") else {
        warn!("inline signature is not base64 encoded, ignoring it");
        return Ok(None);
    };

    // Base64 expands by 4/3; reject before decoding.
    if payload.len() / 4 * 3 > limits.max_file_bytes {
        return Err(ApiError::PayloadTooLarge(format!(
            "inline signature exceeds {} bytes",
            limits.max_file_bytes
        )));
    }

    match STANDARD.decode(payload.trim()) {
        Ok(content) => Ok(Some(SignatureSource::Inline {
            media_type: if media_type.is_empty() {
                PNG_MEDIA_TYPE.to_string()
            } else {
                media_type.to_string()
            },
            content,
        })),
        Err(e) => {
            warn!(error = %e, "inline signature is not valid base64, ignoring it");
            Ok(None)
        }
    }
}

/// Client address and user agent, as seen through any proxy headers.
pub struct SubmitterInfo(pub SubmitterContext);

impl<S: Send + Sync> FromRequestParts<S> for SubmitterInfo {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let ip = header("x-forwarded-for")
            .and_then(|chain| chain.split(',').next().map(|ip| ip.trim().to_string()))
            .filter(|ip| !ip.is_empty())
            .or_else(|| header("x-real-ip"))
            .or_else(|| {
                parts
                    .extensions
                    .get::<ConnectInfo<SocketAddr>>()
                    .map(|ConnectInfo(addr)| addr.ip().to_string())
            });

        Ok(SubmitterInfo(SubmitterContext {
            ip,
            user_agent: header("user-agent"),
        }))
    }
}
