//! One submission, end to end: normalize, extract guests, certify, render,
//! compose, send. Nothing is retried and nothing is kept afterwards.

use serde_json::json;
use uuid::Uuid;

use skyline_audit::events::{AuditAction, AuditEvent};
use skyline_core::certify::stamp;
use skyline_core::guests::extract_guests;
use skyline_core::models::attachment::{SignatureSource, UploadedFile};
use skyline_core::models::certification::SubmitterContext;
use skyline_core::models::form::RawForm;
use skyline_core::normalize::normalize;
use skyline_dispatch::compose::compose;
use skyline_export::renderer::RenderStrategy;

use crate::error::PipelineError;
use crate::state::AppState;

/// Everything read from the multipart request.
#[derive(Debug, Clone, Default)]
pub struct IncomingSubmission {
    pub form: RawForm,
    pub source_upload: Option<UploadedFile>,
    pub signature: Option<SignatureSource>,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivered {
    pub document_id: Uuid,
    pub strategy: RenderStrategy,
    pub attachments: usize,
}

pub async fn process(
    state: &AppState,
    submission: IncomingSubmission,
    submitter: SubmitterContext,
) -> Result<Delivered, PipelineError> {
    let record = normalize(&submission.form);
    let guests = extract_guests(&record);
    let certification = stamp(&record, &submitter)?;
    let document_id = certification.document_id;
    let ip = submitter.ip.as_deref();

    AuditEvent::new(AuditAction::SubmissionReceived)
        .for_document(document_id)
        .from_ip(ip)
        .with_details(json!({
            "form_fields": submission.form.len(),
            "guests": guests.len(),
            "source_upload": submission.source_upload.is_some(),
            "signature": submission.signature.is_some(),
        }))
        .emit();

    let rendered = state
        .renderer
        .render(
            &record,
            &guests,
            submission.signature.as_ref().map(SignatureSource::bytes),
            submission.source_upload.as_ref().map(|u| u.content.as_slice()),
            &certification,
        )
        .await;
    let document = match rendered {
        Ok(document) => document,
        Err(e) => {
            AuditEvent::new(AuditAction::RenderFailed)
                .for_document(document_id)
                .from_ip(ip)
                .with_details(json!({
                    "strategy": state.renderer.strategy().as_str(),
                    "kind": format!("{:?}", e.kind()),
                    "error": e.to_string(),
                }))
                .emit();
            return Err(e.into());
        }
    };

    AuditEvent::new(AuditAction::DocumentRendered)
        .for_document(document_id)
        .from_ip(ip)
        .with_details(json!({
            "strategy": document.strategy().as_str(),
            "bytes": document.bytes().len(),
        }))
        .emit();

    let message = compose(
        &state.dispatch,
        &record,
        &guests,
        &document,
        submission.source_upload.as_ref(),
        submission.signature.as_ref(),
    )?;

    if let Err(e) = state.mailer.send(&message).await {
        AuditEvent::new(AuditAction::DispatchFailed)
            .for_document(document_id)
            .from_ip(ip)
            .with_details(json!({ "error": e.to_string() }))
            .emit();
        return Err(e.into());
    }

    AuditEvent::new(AuditAction::DispatchSent)
        .for_document(document_id)
        .from_ip(ip)
        .with_details(json!({
            "attachments": message.attachments.len(),
            "bytes": message.total_attachment_bytes(),
        }))
        .emit();

    Ok(Delivered {
        document_id,
        strategy: document.strategy(),
        attachments: message.attachments.len(),
    })
}
