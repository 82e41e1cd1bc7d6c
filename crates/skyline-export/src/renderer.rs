use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use skyline_core::models::certification::CertificationMetadata;
use skyline_core::models::guest::GuestEntry;
use skyline_core::models::submission::SubmissionRecord;

use crate::backend::PageBackend;
use crate::drawn::draw_document;
use crate::error::RenderError;
use crate::overlay::overlay_document;
use crate::render::{BOOKING_TEMPLATE, BOOKING_TEMPLATE_NAME, booking_context, render_template};
use crate::sections::{DocumentContent, build_content};
use crate::signature::SignatureImage;
use crate::styles::DocumentStyles;

/// How the certified document is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderStrategy {
    /// Build a new document page by page.
    Drawn,
    /// Stamp the uploaded PDF; without one, behaves like `Drawn`.
    Overlay,
    /// Fill the HTML template and print it through a [`PageBackend`].
    Templated,
}

impl RenderStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            RenderStrategy::Drawn => "drawn",
            RenderStrategy::Overlay => "overlay",
            RenderStrategy::Templated => "templated",
        }
    }
}

impl fmt::Display for RenderStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RenderStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "drawn" => Ok(RenderStrategy::Drawn),
            "overlay" => Ok(RenderStrategy::Overlay),
            "templated" => Ok(RenderStrategy::Templated),
            other => Err(format!(
                "unknown render strategy '{other}' (expected drawn, overlay or templated)"
            )),
        }
    }
}

/// A finished, certified PDF.
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    bytes: Vec<u8>,
    certification: CertificationMetadata,
    strategy: RenderStrategy,
}

impl RenderedDocument {
    pub fn new(
        bytes: Vec<u8>,
        certification: CertificationMetadata,
        strategy: RenderStrategy,
    ) -> Self {
        Self {
            bytes,
            certification,
            strategy,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn certification(&self) -> &CertificationMetadata {
        &self.certification
    }

    /// The strategy that actually produced the bytes (an overlay without a
    /// source document reports `Drawn`).
    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }
}

pub struct DocumentRenderer {
    strategy: RenderStrategy,
    styles: DocumentStyles,
    template: String,
    backend: Option<Arc<dyn PageBackend>>,
}

impl DocumentRenderer {
    pub fn new(strategy: RenderStrategy, styles: DocumentStyles) -> Self {
        Self {
            strategy,
            styles,
            template: BOOKING_TEMPLATE.to_string(),
            backend: None,
        }
    }

    pub fn with_backend(mut self, backend: Arc<dyn PageBackend>) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Replace the bundled booking template.
    pub fn with_template(mut self, template: impl Into<String>) -> Self {
        self.template = template.into();
        self
    }

    pub fn strategy(&self) -> RenderStrategy {
        self.strategy
    }

    pub fn styles(&self) -> &DocumentStyles {
        &self.styles
    }

    pub fn has_backend(&self) -> bool {
        self.backend.is_some()
    }

    /// Render a submission into a certified PDF.
    ///
    /// `signature` is raw image bytes (PNG or JPEG); a signature that cannot
    /// be decoded is left out with a warning instead of failing the render.
    /// `source_document` is only read by the overlay strategy.
    pub async fn render(
        &self,
        record: &SubmissionRecord,
        guests: &[GuestEntry],
        signature: Option<&[u8]>,
        source_document: Option<&[u8]>,
        certification: &CertificationMetadata,
    ) -> Result<RenderedDocument, RenderError> {
        let (strategy, bytes) = match (self.strategy, source_document) {
            (RenderStrategy::Overlay, Some(source)) => {
                let content = self.content(record, guests, certification, RenderStrategy::Overlay);
                let bytes = overlay_document(
                    source,
                    &content,
                    signature,
                    &self.styles,
                    certification.generated_at,
                )?;
                (RenderStrategy::Overlay, bytes)
            }
            (RenderStrategy::Templated, _) => {
                let bytes = self
                    .templated(record, guests, signature, certification)
                    .await?;
                (RenderStrategy::Templated, bytes)
            }
            (RenderStrategy::Overlay, None) | (RenderStrategy::Drawn, _) => {
                if self.strategy == RenderStrategy::Overlay {
                    info!("no source document uploaded, drawing a new one");
                }
                let content = self.content(record, guests, certification, RenderStrategy::Drawn);
                let signature = decode_signature(signature);
                let bytes = draw_document(
                    &content,
                    signature.as_ref(),
                    &self.styles,
                    certification.generated_at,
                )?;
                (RenderStrategy::Drawn, bytes)
            }
        };

        info!(
            document_id = %certification.document_id,
            strategy = %strategy,
            bytes = bytes.len(),
            "document rendered"
        );

        Ok(RenderedDocument::new(bytes, certification.clone(), strategy))
    }

    async fn templated(
        &self,
        record: &SubmissionRecord,
        guests: &[GuestEntry],
        signature: Option<&[u8]>,
        certification: &CertificationMetadata,
    ) -> Result<Vec<u8>, RenderError> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            RenderError::RenderingBackendUnavailable("no page backend configured".to_string())
        })?;

        let content = self.content(record, guests, certification, RenderStrategy::Templated);
        let signature = decode_signature(signature);
        let context = booking_context(
            record,
            &content,
            certification,
            signature.as_ref(),
            &self.styles,
        );
        let html = render_template(BOOKING_TEMPLATE_NAME, &self.template, &context)?;
        backend.html_to_pdf(&html).await
    }

    fn content(
        &self,
        record: &SubmissionRecord,
        guests: &[GuestEntry],
        certification: &CertificationMetadata,
        strategy: RenderStrategy,
    ) -> DocumentContent {
        build_content(record, guests, certification, strategy.as_str(), &self.styles)
    }
}

fn decode_signature(bytes: Option<&[u8]>) -> Option<SignatureImage> {
    match SignatureImage::decode(bytes?) {
        Ok(sig) => Some(sig),
        Err(e) => {
            warn!(error = %e, "signature could not be embedded, continuing without it");
            None
        }
    }
}
