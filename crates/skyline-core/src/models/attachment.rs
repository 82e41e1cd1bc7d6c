use serde::{Deserialize, Serialize};

pub const PDF_MEDIA_TYPE: &str = "application/pdf";
pub const PNG_MEDIA_TYPE: &str = "image/png";

/// A file carried by the outbound message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub filename: String,
    #[serde(skip)]
    pub content: Vec<u8>,
    pub media_type: String,
}

/// A file part received with the submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub media_type: Option<String>,
    pub content: Vec<u8>,
}

/// Where a signature image came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignatureSource {
    /// Posted as a file part; forwarded as an attachment too.
    Upload(UploadedFile),
    /// Posted as an inline data URL; rendered only.
    Inline { media_type: String, content: Vec<u8> },
}

impl SignatureSource {
    pub fn bytes(&self) -> &[u8] {
        match self {
            SignatureSource::Upload(file) => &file.content,
            SignatureSource::Inline { content, .. } => content,
        }
    }
}
