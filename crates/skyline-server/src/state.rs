use std::sync::Arc;

use skyline_dispatch::message::DispatchSettings;
use skyline_dispatch::transport::MailTransport;
use skyline_export::renderer::DocumentRenderer;

/// Shared application state, injected into all route handlers via Axum state.
///
/// Built once at startup and never mutated afterwards.
#[derive(Clone)]
pub struct AppState {
    pub renderer: Arc<DocumentRenderer>,
    pub mailer: Arc<dyn MailTransport>,
    pub dispatch: Arc<DispatchSettings>,
    pub limits: UploadLimits,
}

impl AppState {
    pub fn new(
        renderer: DocumentRenderer,
        mailer: Arc<dyn MailTransport>,
        dispatch: DispatchSettings,
        limits: UploadLimits,
    ) -> Self {
        Self {
            renderer: Arc::new(renderer),
            mailer,
            dispatch: Arc::new(dispatch),
            limits,
        }
    }
}

/// Upload ceilings, checked while the multipart stream is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UploadLimits {
    /// Per file part (and per decoded inline signature).
    pub max_file_bytes: usize,
}

impl UploadLimits {
    pub const DEFAULT_MAX_FILE_BYTES: usize = 10 * 1024 * 1024;

    /// Whole request body: two file parts plus the text fields.
    pub fn max_request_bytes(&self) -> usize {
        self.max_file_bytes.saturating_mul(3)
    }
}

impl Default for UploadLimits {
    fn default() -> Self {
        Self {
            max_file_bytes: Self::DEFAULT_MAX_FILE_BYTES,
        }
    }
}
