use thiserror::Error;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("invalid mail address '{address}': {reason}")]
    Address { address: String, reason: String },

    #[error("invalid attachment '{filename}': {reason}")]
    Attachment { filename: String, reason: String },

    #[error("failed to build message: {0}")]
    Build(String),

    #[error("summary template error: {0}")]
    Template(String),

    #[error("mail transport error: {0}")]
    Transport(String),
}

impl From<tera::Error> for DispatchError {
    fn from(e: tera::Error) -> Self {
        DispatchError::Template(e.to_string())
    }
}
