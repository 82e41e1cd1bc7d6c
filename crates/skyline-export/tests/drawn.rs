mod common;

use skyline_core::certify::{TERMS_ACCEPTED_LINE, TERMS_NOT_ACCEPTED_LINE};
use skyline_export::drawn::CERTIFICATION_TITLE;
use skyline_export::renderer::{DocumentRenderer, RenderStrategy};
use skyline_export::sections::NO_GUESTS_LINE;
use skyline_export::styles::DocumentStyles;

use common::{FULL_FORM, all_texts, certification, page_texts, signature_png, submission, value_after};

fn drawn() -> DocumentRenderer {
    DocumentRenderer::new(RenderStrategy::Drawn, DocumentStyles::default())
}

#[tokio::test]
async fn every_page_starts_with_id_and_short_hash() {
    let (record, guests) = submission(FULL_FORM);
    let cert = certification(&record);

    let doc = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();
    assert_eq!(doc.strategy(), RenderStrategy::Drawn);

    let header = format!("Document ID: {} | Hash: {}", cert.document_id, cert.short_hash());
    let pages = page_texts(doc.bytes());
    assert!(pages.len() >= 2);
    for page in &pages {
        assert_eq!(page.first(), Some(&header));
    }

    let last = pages.last().unwrap().concat();
    assert!(last.contains(&cert.content_hash));
    assert!(last.contains(&cert.document_id.to_string()));
    assert!(last.contains("203.0.113.7"));
}

#[tokio::test]
async fn certification_block_starts_a_new_page() {
    let (record, guests) = submission(FULL_FORM);
    let cert = certification(&record);
    let doc = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();

    let pages = page_texts(doc.bytes());
    let cert_page = pages
        .iter()
        .position(|p| p.iter().any(|t| t == CERTIFICATION_TITLE))
        .unwrap();
    assert!(cert_page >= 1);
    assert!(!pages[cert_page].iter().any(|t| t == "Personal Information"));
    assert!(pages[0].iter().any(|t| t == "Personal Information"));
}

#[tokio::test]
async fn payment_details_are_masked() {
    let (record, guests) = submission(FULL_FORM);
    let cert = certification(&record);
    let doc = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();

    let texts = all_texts(&page_texts(doc.bytes()));
    assert_eq!(value_after(&texts, "CVV"), Some("***"));
    assert_eq!(value_after(&texts, "Card Number"), Some("**** **** **** 1111"));
    assert!(!texts.iter().any(|t| t == "987"));
    assert!(!texts.iter().any(|t| t.contains("4111 1111 1111 1111")));
}

#[tokio::test]
async fn absent_fields_show_the_marker() {
    let (record, guests) = submission(&[("firstName", "Ada")]);
    let cert = certification(&record);
    let doc = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();

    let texts = all_texts(&page_texts(doc.bytes()));
    assert_eq!(value_after(&texts, "First Name"), Some("Ada"));
    assert_eq!(value_after(&texts, "Phone"), Some("N/A"));
    assert_eq!(value_after(&texts, "Company Name"), Some("N/A"));
    assert_eq!(value_after(&texts, "CVV"), Some("N/A"));
    assert_eq!(value_after(&texts, "Signature"), Some("N/A"));
}

#[tokio::test]
async fn marker_follows_configured_styles() {
    let (record, guests) = submission(&[]);
    let cert = certification(&record);
    let renderer = DocumentRenderer::new(
        RenderStrategy::Drawn,
        DocumentStyles::default().with_not_provided("Not provided"),
    );
    let doc = renderer
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();

    let texts = all_texts(&page_texts(doc.bytes()));
    assert_eq!(value_after(&texts, "Email"), Some("Not provided"));
    assert!(!texts.iter().any(|t| t == "N/A"));
}

#[tokio::test]
async fn empty_guest_list_renders_empty_state() {
    let (record, guests) = submission(&[("firstName", "Ada")]);
    assert!(guests.is_empty());
    let cert = certification(&record);
    let doc = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();

    let texts = all_texts(&page_texts(doc.bytes()));
    assert!(texts.iter().any(|t| t == NO_GUESTS_LINE));
    assert!(!texts.iter().any(|t| t == "Nights"));
}

#[tokio::test]
async fn guest_rows_show_nights() {
    let (record, guests) = submission(FULL_FORM);
    let cert = certification(&record);
    let doc = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();

    let texts = all_texts(&page_texts(doc.bytes()));
    let start = texts.iter().position(|t| t == "Nights").unwrap();
    assert_eq!(
        &texts[start + 1..start + 7],
        &["1", "Ada", "Lovelace", "2024-05-01", "2024-05-04", "3"]
    );
}

#[tokio::test]
async fn terms_line_reflects_acceptance() {
    let (accepted, guests) = submission(FULL_FORM);
    let cert = certification(&accepted);
    let doc = drawn()
        .render(&accepted, &guests, None, None, &cert)
        .await
        .unwrap();
    let joined = all_texts(&page_texts(doc.bytes())).join(" ");
    assert!(joined.contains(TERMS_ACCEPTED_LINE));

    let (declined, guests) = submission(&[("firstName", "Ada"), ("terms_accepted", "false")]);
    let cert = certification(&declined);
    let doc = drawn()
        .render(&declined, &guests, None, None, &cert)
        .await
        .unwrap();
    let joined = all_texts(&page_texts(doc.bytes())).join(" ");
    assert!(joined.contains(TERMS_NOT_ACCEPTED_LINE));
    assert!(!joined.contains(TERMS_ACCEPTED_LINE));
}

#[tokio::test]
async fn rerender_with_same_metadata_is_byte_identical() {
    let (record, guests) = submission(FULL_FORM);
    let cert = certification(&record);

    let first = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();
    let second = drawn()
        .render(&record, &guests, None, None, &cert)
        .await
        .unwrap();
    assert_eq!(first.bytes(), second.bytes());
}

#[tokio::test]
async fn signature_is_embedded_as_image() {
    let (record, guests) = submission(FULL_FORM);
    let cert = certification(&record);
    let png = signature_png();

    let doc = drawn()
        .render(&record, &guests, Some(&png), None, &cert)
        .await
        .unwrap();

    let pdf = lopdf::Document::load_mem(doc.bytes()).unwrap();
    let images = pdf
        .objects
        .values()
        .filter_map(|o| o.as_stream().ok())
        .filter(|s| {
            s.dict
                .get(b"Subtype")
                .and_then(|v| v.as_name())
                .is_ok_and(|n| n == b"Image")
        })
        .count();
    assert_eq!(images, 1);

    let texts = all_texts(&page_texts(doc.bytes()));
    assert_ne!(value_after(&texts, "Signature"), Some("N/A"));
}

#[tokio::test]
async fn corrupt_signature_is_left_out() {
    let (record, guests) = submission(FULL_FORM);
    let cert = certification(&record);

    let doc = drawn()
        .render(&record, &guests, Some(b"not an image"), None, &cert)
        .await
        .unwrap();

    let texts = all_texts(&page_texts(doc.bytes()));
    assert_eq!(value_after(&texts, "Signature"), Some("N/A"));
}
