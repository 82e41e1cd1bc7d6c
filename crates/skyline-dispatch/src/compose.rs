use skyline_core::fields::Field;
use skyline_core::models::attachment::{
    Attachment, PDF_MEDIA_TYPE, PNG_MEDIA_TYPE, SignatureSource, UploadedFile,
};
use skyline_core::models::guest::GuestEntry;
use skyline_core::models::submission::SubmissionRecord;
use skyline_export::renderer::RenderedDocument;

use crate::error::DispatchError;
use crate::message::{DispatchSettings, OutboundMessage};
use crate::summary::render_summary;

pub const SIGNATURE_FALLBACK_NAME: &str = "signature.png";

/// Build the reservation email for a rendered submission.
///
/// Attachments, in order: the rendered document, the raw uploaded PDF (if
/// any), the signature image when it was posted as a file. An inline
/// signature is only part of the rendered document.
pub fn compose(
    settings: &DispatchSettings,
    record: &SubmissionRecord,
    guests: &[GuestEntry],
    document: &RenderedDocument,
    source_upload: Option<&UploadedFile>,
    signature: Option<&SignatureSource>,
) -> Result<OutboundMessage, DispatchError> {
    let certification = document.certification();
    let millis = certification.generated_at.as_millisecond();

    let mut attachments = vec![Attachment {
        filename: rendered_filename(record, millis),
        content: document.bytes().to_vec(),
        media_type: PDF_MEDIA_TYPE.to_string(),
    }];

    if let Some(upload) = source_upload {
        attachments.push(Attachment {
            filename: client_filename(upload)
                .unwrap_or_else(|| format!("uploaded_document_{millis}.pdf")),
            content: upload.content.clone(),
            media_type: upload
                .media_type
                .clone()
                .unwrap_or_else(|| PDF_MEDIA_TYPE.to_string()),
        });
    }

    if let Some(SignatureSource::Upload(file)) = signature {
        attachments.push(Attachment {
            filename: client_filename(file).unwrap_or_else(|| SIGNATURE_FALLBACK_NAME.to_string()),
            content: file.content.clone(),
            media_type: file
                .media_type
                .clone()
                .unwrap_or_else(|| PNG_MEDIA_TYPE.to_string()),
        });
    }

    Ok(OutboundMessage {
        from: settings.from.clone(),
        to: settings.to.clone(),
        subject: settings.subject.clone(),
        html_body: render_summary(settings, record, guests, certification)?,
        attachments,
    })
}

/// `booking_form_<first name or "guest">_<epoch millis>.pdf`
pub fn rendered_filename(record: &SubmissionRecord, millis: i64) -> String {
    let name = record
        .get(Field::FirstName)
        .map(filename_safe)
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "guest".to_string());
    format!("booking_form_{name}_{millis}.pdf")
}

/// Keep alphanumerics, `-` and `_`; everything else becomes `_`.
fn filename_safe(value: &str) -> String {
    value
        .trim()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// The last path component of a client-supplied filename, if usable.
fn client_filename(file: &UploadedFile) -> Option<String> {
    let name = file.filename.as_deref()?;
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name).trim();
    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base.to_string())
    }
}
