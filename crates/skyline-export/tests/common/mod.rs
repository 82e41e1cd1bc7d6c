#![allow(dead_code)]

use std::io::Cursor;

use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use lopdf::content::Content;
use lopdf::{Document, Object};
use uuid::Uuid;

use skyline_core::certify::stamp_with;
use skyline_core::guests::extract_guests;
use skyline_core::models::certification::{CertificationMetadata, SubmitterContext};
use skyline_core::models::form::RawForm;
use skyline_core::models::guest::GuestEntry;
use skyline_core::models::submission::SubmissionRecord;
use skyline_core::normalize::normalize;

pub const FULL_FORM: &[(&str, &str)] = &[
    ("firstName", "Ada"),
    ("lastName", "Lovelace"),
    ("phone", "+1 555 0100"),
    ("customerEmail", "ada@example.com"),
    ("property_name", "Skyline Tower"),
    ("checkin_date", "2024-05-01"),
    ("checkout_date", "2024-05-04"),
    ("rooms", "2"),
    ("adults", "2"),
    ("children", "0"),
    ("company_name", "Analytical Engines Ltd"),
    ("card_holder_name", "Ada Lovelace"),
    ("card_type", "Visa"),
    ("card_number", "4111 1111 1111 1111"),
    ("expiration_date", "12/27"),
    ("cvv", "987"),
    ("terms_accepted", "on"),
    ("first_name[]", "Ada"),
    ("last_name[]", "Lovelace"),
    ("guest_checkin[]", "2024-05-01"),
    ("guest_checkout[]", "2024-05-04"),
];

pub fn submission(pairs: &[(&str, &str)]) -> (SubmissionRecord, Vec<GuestEntry>) {
    let form: RawForm = pairs.iter().copied().collect();
    let record = normalize(&form);
    let guests = extract_guests(&record);
    (record, guests)
}

pub fn certification(record: &SubmissionRecord) -> CertificationMetadata {
    let submitter = SubmitterContext {
        ip: Some("203.0.113.7".to_string()),
        user_agent: Some("skyline-tests/1.0".to_string()),
    };
    let id = Uuid::parse_str("6f1c2a7e-3b9d-4c1e-9a55-2d8f0e4b7c11").unwrap();
    let at: jiff::Timestamp = "2024-04-20T10:15:00Z".parse().unwrap();
    stamp_with(record, &submitter, id, at).unwrap()
}

pub fn signature_png() -> Vec<u8> {
    let img = RgbaImage::from_fn(60, 20, |x, _| {
        if x % 3 == 0 {
            Rgba([0, 0, 0, 255])
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

/// Every `Tj` string of every page, in page order.
pub fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
    let doc = Document::load_mem(pdf).unwrap();
    doc.get_pages()
        .values()
        .map(|&page_id| {
            let data = doc.get_page_content(page_id).unwrap();
            Content::decode(&data)
                .unwrap()
                .operations
                .iter()
                .filter(|op| op.operator == "Tj")
                .filter_map(|op| match op.operands.first() {
                    Some(Object::String(bytes, _)) => {
                        Some(bytes.iter().map(|&b| char::from(b)).collect())
                    }
                    _ => None,
                })
                .collect()
        })
        .collect()
}

/// The value drawn right after a `Label:` cell.
pub fn value_after<'a>(texts: &'a [String], label: &str) -> Option<&'a str> {
    let label = format!("{label}:");
    texts
        .iter()
        .position(|t| *t == label)
        .and_then(|i| texts.get(i + 1))
        .map(String::as_str)
}

pub fn all_texts(pages: &[Vec<String>]) -> Vec<String> {
    pages.concat()
}
