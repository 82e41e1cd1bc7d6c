mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use skyline_export::renderer::RenderStrategy;
use skyline_export::sections::NO_GUESTS_LINE;
use skyline_server::error::FAILURE_MESSAGE;
use skyline_server::routes::submit::success_message;
use skyline_server::state::UploadLimits;

use common::{
    MultipartBody, RecordingTransport, body_json, drawn_state, pdf_text, send, signature_png,
    state_with, submit_request,
};

fn booking() -> MultipartBody {
    MultipartBody::new()
        .text("firstName", "Ada")
        .text("lastName", "Lovelace")
        .text("customerEmail", "ada@example.com")
        .text("card_number", "4111 1111 1111 1111")
        .text("cvv", "987")
        .text("terms_accepted", "yes")
        .text("first_name[]", "Ada")
        .text("guest_checkin[]", "2024-05-01")
        .text("guest_checkout[]", "2024-05-04")
}

#[tokio::test]
async fn successful_submission_sends_one_message() {
    let transport = Arc::new(RecordingTransport::default());
    let response = send(
        drawn_state(transport.clone()),
        submit_request(booking().finish()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        success_message("reservations@skylinehousing.net")
    );

    let sent = transport.messages();
    assert_eq!(sent.len(), 1);
    let message = &sent[0];
    assert_eq!(message.to, "reservations@skylinehousing.net");
    assert_eq!(message.attachments.len(), 1);
    assert!(message.attachments[0].filename.starts_with("booking_form_Ada_"));
    assert!(message.attachments[0].content.starts_with(b"%PDF"));
    assert!(message.html_body.contains("Ada"));
}

#[tokio::test]
async fn rendered_document_carries_submitter_and_masked_payment() {
    let transport = Arc::new(RecordingTransport::default());
    send(
        drawn_state(transport.clone()),
        submit_request(booking().finish()),
    )
    .await;

    let sent = transport.messages();
    let text = pdf_text(&sent[0].attachments[0].content);
    assert!(text.contains("203.0.113.7"));
    assert!(text.contains("skyline-tests/1.0"));
    assert!(text.contains("**** **** **** 1111"));
    assert!(!text.contains("4111 1111 1111 1111"));
    assert!(text.contains("\n***\n"));
}

#[tokio::test]
async fn uploads_are_forwarded_as_attachments() {
    let transport = Arc::new(RecordingTransport::default());
    let png = signature_png();
    let body = booking()
        .file("pdf_attachment", "contract.pdf", "application/pdf", b"%PDF-1.4 not parsed by drawn")
        .file("signature", "", "image/png", &png)
        .finish();

    let response = send(drawn_state(transport.clone()), submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let sent = transport.messages();
    let names: Vec<&str> = sent[0]
        .attachments
        .iter()
        .map(|a| a.filename.as_str())
        .collect();
    assert_eq!(names.len(), 3);
    assert!(names[0].starts_with("booking_form_Ada_"));
    assert_eq!(names[1], "contract.pdf");
    assert_eq!(names[2], "signature.png");
    assert_eq!(sent[0].attachments[2].content, png);
}

#[tokio::test]
async fn empty_file_inputs_are_ignored() {
    let transport = Arc::new(RecordingTransport::default());
    let body = booking()
        .file("pdf_attachment", "", "application/octet-stream", b"")
        .file("signature", "", "application/octet-stream", b"")
        .finish();

    let response = send(drawn_state(transport.clone()), submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(transport.messages()[0].attachments.len(), 1);
}

#[tokio::test]
async fn inline_signature_is_rendered_not_attached() {
    let transport = Arc::new(RecordingTransport::default());
    let data_url = format!("data:image/png;base64,{}", STANDARD.encode(signature_png()));
    let body = booking().text("signature_data", &data_url).finish();

    let response = send(drawn_state(transport.clone()), submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let sent = transport.messages();
    assert_eq!(sent[0].attachments.len(), 1);
    let pdf = &sent[0].attachments[0].content;
    assert!(pdf.windows(b"/DCTDecode".len()).any(|w| w == b"/DCTDecode"));
}

#[tokio::test]
async fn empty_submission_still_succeeds() {
    let transport = Arc::new(RecordingTransport::default());
    let response = send(
        drawn_state(transport.clone()),
        submit_request(MultipartBody::new().finish()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let sent = transport.messages();
    assert!(sent[0].attachments[0].filename.starts_with("booking_form_guest_"));
    assert!(sent[0].html_body.contains("N&#x2F;A"));
}

#[tokio::test]
async fn invalid_overlay_source_fails_without_sending() {
    let transport = Arc::new(RecordingTransport::default());
    let state = state_with(
        RenderStrategy::Overlay,
        transport.clone(),
        UploadLimits::default(),
    );
    let body = booking()
        .file("pdf_attachment", "broken.pdf", "application/pdf", b"this is not a pdf")
        .finish();

    let response = send(state, submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], FAILURE_MESSAGE);
    assert!(transport.messages().is_empty());
}

#[tokio::test]
async fn templated_without_backend_fails_generically() {
    let transport = Arc::new(RecordingTransport::default());
    let state = state_with(
        RenderStrategy::Templated,
        transport.clone(),
        UploadLimits::default(),
    );

    let response = send(state, submit_request(booking().finish())).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = body_json(response).await;
    assert_eq!(body["message"], FAILURE_MESSAGE);
    assert!(transport.messages().is_empty());
}

#[tokio::test]
async fn transport_failure_is_not_leaked() {
    let transport = Arc::new(RecordingTransport::failing());
    let response = send(
        drawn_state(transport.clone()),
        submit_request(booking().finish()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = body_json(response).await.to_string();
    assert!(text.contains(FAILURE_MESSAGE));
    assert!(!text.contains("535"));
    assert!(!text.contains("authentication"));
}

#[tokio::test]
async fn oversized_upload_is_rejected_before_rendering() {
    let transport = Arc::new(RecordingTransport::default());
    let state = state_with(
        RenderStrategy::Drawn,
        transport.clone(),
        UploadLimits {
            max_file_bytes: 1024,
        },
    );
    let body = MultipartBody::new()
        .text("firstName", "Ada")
        .file("pdf_attachment", "big.pdf", "application/pdf", &vec![b'x'; 2048])
        .finish();

    let response = send(state, submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["success"], false);
    assert!(transport.messages().is_empty());
}

#[tokio::test]
async fn truncated_multipart_is_a_bad_request() {
    let transport = Arc::new(RecordingTransport::default());
    let body = format!(
        "--{}\r\nContent-Disposition: form-data; name=\"firstName\"\r\n\r\nAda",
        common::BOUNDARY
    )
    .into_bytes();

    let response = send(drawn_state(transport.clone()), submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], false);
    assert!(transport.messages().is_empty());
}

#[tokio::test]
async fn blank_guest_row_shows_no_guests() {
    let transport = Arc::new(RecordingTransport::default());
    let body = MultipartBody::new()
        .text("firstName", "Ada")
        .text("first_name[]", "")
        .text("last_name[]", "")
        .text("guest_checkin[]", "")
        .text("guest_checkout[]", "")
        .finish();

    let response = send(drawn_state(transport.clone()), submit_request(body)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let sent = transport.messages();
    let text = pdf_text(&sent[0].attachments[0].content);
    assert!(text.contains(NO_GUESTS_LINE));
    assert!(sent[0].html_body.contains(NO_GUESTS_LINE));
    assert!(!sent[0].html_body.contains("<td>1</td>"));
}
