//! Document certification: identifier, content hash and terms assertion.

use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::error::CoreError;
use crate::fields::Field;
use crate::models::certification::{CertificationMetadata, SubmitterContext};
use crate::models::submission::SubmissionRecord;

pub const TERMS_ACCEPTED_LINE: &str =
    "I certify that I have read, understood and accepted the terms and conditions of this reservation.";

pub const TERMS_NOT_ACCEPTED_LINE: &str = "Terms and conditions were not accepted.";

/// Stamp a submission with a fresh document id at the current time.
pub fn stamp(
    record: &SubmissionRecord,
    submitter: &SubmitterContext,
) -> Result<CertificationMetadata, CoreError> {
    stamp_with(record, submitter, Uuid::new_v4(), jiff::Timestamp::now())
}

/// Stamp a submission with an injected id and timestamp.
pub fn stamp_with(
    record: &SubmissionRecord,
    submitter: &SubmitterContext,
    document_id: Uuid,
    generated_at: jiff::Timestamp,
) -> Result<CertificationMetadata, CoreError> {
    let content_hash = content_hash(record, generated_at)?;
    Ok(CertificationMetadata {
        document_id,
        content_hash,
        generated_at,
        submitter_ip: submitter.ip.clone(),
        user_agent: submitter.user_agent.clone(),
        form_accessed_at: record.get(Field::FormAccessedAt).map(str::to_string),
    })
}

/// SHA-256 over the canonical record followed by the RFC 3339 timestamp.
pub fn content_hash(
    record: &SubmissionRecord,
    generated_at: jiff::Timestamp,
) -> Result<String, CoreError> {
    let mut hasher = Sha256::new();
    hasher.update(record.canonical_bytes()?);
    hasher.update(generated_at.to_string().as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

pub fn terms_assertion(accepted: bool) -> &'static str {
    if accepted {
        TERMS_ACCEPTED_LINE
    } else {
        TERMS_NOT_ACCEPTED_LINE
    }
}
