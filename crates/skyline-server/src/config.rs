use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use eyre::eyre;

use skyline_core::NOT_PROVIDED;
use skyline_dispatch::message::{DEFAULT_FROM, DEFAULT_SUBJECT, DEFAULT_TO, DispatchSettings};
use skyline_dispatch::transport::SmtpSettings;
use skyline_export::backend::ChromiumBackend;
use skyline_export::renderer::{DocumentRenderer, RenderStrategy};
use skyline_export::styles::DocumentStyles;

use crate::state::UploadLimits;

const SMTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Process configuration, read once from the environment at startup.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub port: u16,
    pub strategy: RenderStrategy,
    pub smtp: SmtpSettings,
    pub dispatch: DispatchSettings,
    pub limits: UploadLimits,
    pub chromium: PathBuf,
    pub render_timeout: Duration,
}

impl ServiceConfig {
    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key lookup; unset and blank values take the default.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> eyre::Result<Self> {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let text = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let not_provided = text("SKYLINE_NOT_PROVIDED", NOT_PROVIDED);
        let max_file_bytes: usize = parse(
            &get,
            "MAX_UPLOAD_BYTES",
            UploadLimits::DEFAULT_MAX_FILE_BYTES,
        )?;
        if max_file_bytes == 0 {
            return Err(eyre!("MAX_UPLOAD_BYTES must be greater than zero"));
        }

        Ok(Self {
            port: parse(&get, "PORT", 8000)?,
            strategy: parse(&get, "SKYLINE_RENDER_STRATEGY", RenderStrategy::Drawn)?,
            smtp: SmtpSettings {
                host: text("SMTP_HOST", "smtp.gmail.com"),
                port: parse(&get, "SMTP_PORT", 587)?,
                username: get("SMTP_USERNAME"),
                password: get("SMTP_PASSWORD"),
                timeout: SMTP_TIMEOUT,
            },
            dispatch: DispatchSettings {
                from: text("MAIL_FROM", DEFAULT_FROM),
                to: text("MAIL_TO", DEFAULT_TO),
                subject: text("MAIL_SUBJECT", DEFAULT_SUBJECT),
                not_provided,
            },
            limits: UploadLimits { max_file_bytes },
            chromium: PathBuf::from(text("SKYLINE_CHROMIUM", "chromium")),
            render_timeout: Duration::from_secs(parse(&get, "SKYLINE_RENDER_TIMEOUT_SECS", 30)?),
        })
    }

    pub fn styles(&self) -> DocumentStyles {
        DocumentStyles::default().with_not_provided(self.dispatch.not_provided.clone())
    }

    /// The configured renderer; only the templated strategy gets a browser.
    pub fn build_renderer(&self) -> DocumentRenderer {
        let renderer = DocumentRenderer::new(self.strategy, self.styles());
        match self.strategy {
            RenderStrategy::Templated => renderer.with_backend(Arc::new(ChromiumBackend::new(
                self.chromium.clone(),
                self.render_timeout,
            ))),
            RenderStrategy::Drawn | RenderStrategy::Overlay => renderer,
        }
    }
}

fn parse<T>(get: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> eyre::Result<T>
where
    T: FromStr,
    T::Err: Display,
{
    match get(key) {
        Some(raw) => raw
            .parse()
            .map_err(|e| eyre!("invalid value for {key} ({raw:?}): {e}")),
        None => Ok(default),
    }
}
