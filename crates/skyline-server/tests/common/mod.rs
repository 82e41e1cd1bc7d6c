#![allow(dead_code)]

use std::io::Cursor;
use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{Request, Response};
use futures::future::BoxFuture;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use lopdf::content::Content;
use lopdf::{Document, Object};
use tower::ServiceExt;

use skyline_dispatch::error::DispatchError;
use skyline_dispatch::message::{DispatchSettings, OutboundMessage};
use skyline_dispatch::transport::MailTransport;
use skyline_export::renderer::{DocumentRenderer, RenderStrategy};
use skyline_export::styles::DocumentStyles;
use skyline_server::state::{AppState, UploadLimits};

pub const BOUNDARY: &str = "skyline-test-boundary";

/// In-memory transport that keeps every message it is handed.
#[derive(Default)]
pub struct RecordingTransport {
    pub sent: Mutex<Vec<OutboundMessage>>,
    pub fail: bool,
}

impl RecordingTransport {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn messages(&self) -> Vec<OutboundMessage> {
        self.sent.lock().unwrap().clone()
    }
}

impl MailTransport for RecordingTransport {
    fn send<'a>(&'a self, message: &'a OutboundMessage) -> BoxFuture<'a, Result<(), DispatchError>> {
        Box::pin(async move {
            if self.fail {
                return Err(DispatchError::Transport(
                    "535 authentication rejected for bookings@exclusiveskyline.com".to_string(),
                ));
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        })
    }

    fn verify(&self) -> BoxFuture<'_, Result<(), DispatchError>> {
        Box::pin(async { Ok(()) })
    }
}

pub fn state_with(
    strategy: RenderStrategy,
    transport: Arc<RecordingTransport>,
    limits: UploadLimits,
) -> AppState {
    AppState::new(
        DocumentRenderer::new(strategy, DocumentStyles::default()),
        transport,
        DispatchSettings::default(),
        limits,
    )
}

pub fn drawn_state(transport: Arc<RecordingTransport>) -> AppState {
    state_with(RenderStrategy::Drawn, transport, UploadLimits::default())
}

/// Hand-built `multipart/form-data` body.
#[derive(Default)]
pub struct MultipartBody {
    bytes: Vec<u8>,
}

impl MultipartBody {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
        self
    }

    pub fn file(mut self, name: &str, filename: &str, content_type: &str, content: &[u8]) -> Self {
        self.bytes.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {content_type}\r\n\r\n"
            )
            .as_bytes(),
        );
        self.bytes.extend_from_slice(content);
        self.bytes.extend_from_slice(b"\r\n");
        self
    }

    pub fn finish(mut self) -> Vec<u8> {
        self.bytes
            .extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        self.bytes
    }
}

pub fn submit_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/submit-form")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
        .header("user-agent", "skyline-tests/1.0")
        .body(Body::from(body))
        .unwrap()
}

pub async fn send(state: AppState, request: Request<Body>) -> Response<Body> {
    skyline_server::app(state).oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn signature_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(48, 16, |x, y| {
        if (x + y) % 4 == 0 {
            Rgba([10, 10, 60, 255])
        } else {
            Rgba([0, 0, 0, 0])
        }
    });
    let mut out = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
        .unwrap();
    out
}

/// All `Tj` strings of a PDF, concatenated in page order.
pub fn pdf_text(pdf: &[u8]) -> String {
    let doc = Document::load_mem(pdf).unwrap();
    let mut text = String::new();
    for page_id in doc.get_pages().values() {
        let data = doc.get_page_content(*page_id).unwrap();
        for op in Content::decode(&data).unwrap().operations {
            if op.operator == "Tj"
                && let Some(Object::String(bytes, _)) = op.operands.first()
            {
                text.extend(bytes.iter().map(|&b| char::from(b)));
                text.push('\n');
            }
        }
    }
    text
}
