//! HTML-to-PDF printing for the templated strategy.

use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;

use futures::future::BoxFuture;
use tokio::process::Command;
use tracing::{debug, warn};

use crate::error::RenderError;

/// Turns a filled HTML page into PDF bytes.
pub trait PageBackend: Send + Sync {
    fn html_to_pdf<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RenderError>>;
}

/// Prints through a headless Chromium binary.
#[derive(Debug, Clone)]
pub struct ChromiumBackend {
    binary: PathBuf,
    timeout: Duration,
}

impl ChromiumBackend {
    pub fn new(binary: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            binary: binary.into(),
            timeout,
        }
    }

    pub fn binary(&self) -> &std::path::Path {
        &self.binary
    }

    async fn print(&self, html: &str) -> Result<Vec<u8>, RenderError> {
        let workdir = tempfile::tempdir().map_err(|e| {
            RenderError::RenderingBackendUnavailable(format!("failed to create work dir: {e}"))
        })?;
        let input = workdir.path().join("booking.html");
        let output = workdir.path().join("booking.pdf");
        tokio::fs::write(&input, html).await.map_err(|e| {
            RenderError::RenderingBackendUnavailable(format!("failed to write page: {e}"))
        })?;

        let mut command = Command::new(&self.binary);
        command
            .arg("--headless")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--no-pdf-header-footer")
            .arg(format!("--print-to-pdf={}", output.display()))
            .arg(format!("file://{}", input.display()))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let child = command.spawn().map_err(|e| {
            RenderError::RenderingBackendUnavailable(format!(
                "failed to start {}: {e}",
                self.binary.display()
            ))
        })?;

        let finished = tokio::time::timeout(self.timeout, child.wait_with_output())
            .await
            .map_err(|_| {
                RenderError::RenderingBackendUnavailable(format!(
                    "timed out after {}s",
                    self.timeout.as_secs()
                ))
            })?
            .map_err(|e| RenderError::RenderingBackendUnavailable(e.to_string()))?;

        if !finished.status.success() {
            let stderr = String::from_utf8_lossy(&finished.stderr);
            warn!(status = %finished.status, stderr = %stderr.trim(), "chromium exited with failure");
            return Err(RenderError::RenderingBackendUnavailable(format!(
                "chromium exited with {}",
                finished.status
            )));
        }

        let bytes = tokio::fs::read(&output).await.map_err(|e| {
            RenderError::RenderingBackendUnavailable(format!("no PDF produced: {e}"))
        })?;
        if !bytes.starts_with(b"%PDF") {
            return Err(RenderError::Pdf("backend output is not a PDF".to_string()));
        }

        debug!(bytes = bytes.len(), "chromium printed page");
        Ok(bytes)
    }
}

impl PageBackend for ChromiumBackend {
    fn html_to_pdf<'a>(&'a self, html: &'a str) -> BoxFuture<'a, Result<Vec<u8>, RenderError>> {
        Box::pin(self.print(html))
    }
}
