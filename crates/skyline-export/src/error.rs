use thiserror::Error;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid source document: {0}")]
    InvalidSourceDocument(String),

    #[error("rendering backend unavailable: {0}")]
    RenderingBackendUnavailable(String),

    #[error("template rendering failed: {0}")]
    Template(String),

    #[error("PDF generation failed: {0}")]
    Pdf(String),

    #[error("signature embedding failed: {0}")]
    SignatureEmbedding(String),
}

/// Coarse classification of a [`RenderError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderErrorKind {
    InvalidSourceDocument,
    RenderingBackendUnavailable,
    Template,
    Pdf,
    SignatureEmbedding,
}

impl RenderError {
    pub fn kind(&self) -> RenderErrorKind {
        match self {
            RenderError::InvalidSourceDocument(_) => RenderErrorKind::InvalidSourceDocument,
            RenderError::RenderingBackendUnavailable(_) => {
                RenderErrorKind::RenderingBackendUnavailable
            }
            RenderError::Template(_) => RenderErrorKind::Template,
            RenderError::Pdf(_) => RenderErrorKind::Pdf,
            RenderError::SignatureEmbedding(_) => RenderErrorKind::SignatureEmbedding,
        }
    }
}

impl From<tera::Error> for RenderError {
    fn from(e: tera::Error) -> Self {
        RenderError::Template(e.to_string())
    }
}

impl From<lopdf::Error> for RenderError {
    fn from(e: lopdf::Error) -> Self {
        RenderError::Pdf(e.to_string())
    }
}
