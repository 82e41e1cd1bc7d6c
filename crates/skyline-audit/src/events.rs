use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

/// Pipeline milestones worth an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    SubmissionReceived,
    DocumentRendered,
    RenderFailed,
    DispatchSent,
    DispatchFailed,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::SubmissionReceived => "submission_received",
            AuditAction::DocumentRendered => "document_rendered",
            AuditAction::RenderFailed => "render_failed",
            AuditAction::DispatchSent => "dispatch_sent",
            AuditAction::DispatchFailed => "dispatch_failed",
        }
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AuditAction::RenderFailed | AuditAction::DispatchFailed)
    }
}

/// A structured audit event for one submission.
///
/// Details must never carry raw payment data; record values are masked
/// before any event can be built from them.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub document_id: Option<Uuid>,
    pub submitter_ip: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(action: AuditAction) -> Self {
        Self {
            action,
            document_id: None,
            submitter_ip: None,
            details: None,
        }
    }

    pub fn for_document(mut self, document_id: Uuid) -> Self {
        self.document_id = Some(document_id);
        self
    }

    pub fn from_ip(mut self, ip: Option<&str>) -> Self {
        self.submitter_ip = ip.map(str::to_string);
        self
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Emit this audit event via tracing; failures at `warn`.
    pub fn emit(&self) {
        let document_id = self
            .document_id
            .map(|id| id.to_string())
            .unwrap_or_default();
        let submitter_ip = self.submitter_ip.as_deref().unwrap_or_default();
        let details = self
            .details
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_default();

        if self.action.is_failure() {
            warn!(
                audit.action = self.action.as_str(),
                audit.document_id = %document_id,
                audit.submitter_ip = %submitter_ip,
                audit.details = %details,
                "audit event"
            );
        } else {
            info!(
                audit.action = self.action.as_str(),
                audit.document_id = %document_id,
                audit.submitter_ip = %submitter_ip,
                audit.details = %details,
                "audit event"
            );
        }
    }
}
