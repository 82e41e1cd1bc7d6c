use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Number of hash characters shown in page headers.
pub const SHORT_HASH_LEN: usize = 16;

/// Who submitted the form, as seen by the HTTP layer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitterContext {
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Integrity and audit data for one rendered document.
///
/// Generated once per submission before rendering, so every section of the
/// document shows the same identifier and hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationMetadata {
    pub document_id: Uuid,
    /// Lowercase hex SHA-256.
    pub content_hash: String,
    pub generated_at: jiff::Timestamp,
    pub submitter_ip: Option<String>,
    pub user_agent: Option<String>,
    pub form_accessed_at: Option<String>,
}

impl CertificationMetadata {
    /// Truncated hash for headers; the full hash goes in the audit block.
    pub fn short_hash(&self) -> &str {
        let end = self.content_hash.len().min(SHORT_HASH_LEN);
        &self.content_hash[..end]
    }
}
