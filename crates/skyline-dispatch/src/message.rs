use serde::{Deserialize, Serialize};

use skyline_core::NOT_PROVIDED;
use skyline_core::models::attachment::Attachment;

pub const DEFAULT_FROM: &str = "bookings@exclusiveskyline.com";
pub const DEFAULT_TO: &str = "reservations@skylinehousing.net";
pub const DEFAULT_SUBJECT: &str = "New Reservation Request";

/// Fixed envelope of every reservation email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchSettings {
    pub from: String,
    pub to: String,
    pub subject: String,
    /// Shown in the summary body for fields that were not submitted.
    pub not_provided: String,
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            from: DEFAULT_FROM.to_string(),
            to: DEFAULT_TO.to_string(),
            subject: DEFAULT_SUBJECT.to_string(),
            not_provided: NOT_PROVIDED.to_string(),
        }
    }
}

/// A complete message, ready for a [`crate::transport::MailTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundMessage {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
    /// The rendered document always comes first.
    pub attachments: Vec<Attachment>,
}

impl OutboundMessage {
    pub fn attachment(&self, filename: &str) -> Option<&Attachment> {
        self.attachments.iter().find(|a| a.filename == filename)
    }

    pub fn total_attachment_bytes(&self) -> usize {
        self.attachments.iter().map(|a| a.content.len()).sum()
    }
}
