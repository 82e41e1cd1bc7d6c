//! The content every rendering strategy must show.
//!
//! Strategies differ only in how they lay this out; what appears (sections,
//! guest table or its empty state, terms line, certification block) is
//! decided here once.

use serde::Serialize;

use skyline_core::certify::terms_assertion;
use skyline_core::fields::Field;
use skyline_core::models::certification::CertificationMetadata;
use skyline_core::models::guest::{GuestEntry, StayDate};
use skyline_core::models::submission::SubmissionRecord;
use skyline_core::normalize::CVV_MASK;

use crate::styles::DocumentStyles;

pub const NO_GUESTS_LINE: &str = "No guest information provided.";

pub const PERSONAL_FIELDS: &[Field] = &[Field::FirstName, Field::LastName, Field::Phone, Field::Email];

pub const RESERVATION_FIELDS: &[Field] = &[
    Field::PropertyName,
    Field::CheckIn,
    Field::CheckOut,
    Field::Rooms,
    Field::Adults,
    Field::Children,
    Field::SpecialRequests,
];

pub const COMPANY_FIELDS: &[Field] = &[
    Field::CompanyName,
    Field::LeaderName,
    Field::BillingAddress,
    Field::DirectNumber,
];

pub const PAYMENT_FIELDS: &[Field] = &[
    Field::CardHolderName,
    Field::CardType,
    Field::CardNumber,
    Field::CardExpiry,
    Field::Cvv,
    Field::TodaysDate,
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Row {
    pub label: String,
    pub value: String,
}

impl Row {
    fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Section {
    pub title: String,
    pub rows: Vec<Row>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuestRow {
    pub number: usize,
    pub first_name: String,
    pub last_name: String,
    pub check_in: String,
    pub check_out: String,
    pub nights: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentContent {
    pub title: String,
    /// Identifier and short hash, repeated at the top of every page.
    pub header_line: String,
    pub sections: Vec<Section>,
    /// Empty means the document shows [`NO_GUESTS_LINE`] instead of a table.
    pub guests: Vec<GuestRow>,
    pub terms_line: String,
    pub certification: Vec<Row>,
}

/// Displayed value of a field; CVV never leaves this function unmasked.
pub fn field_display(record: &SubmissionRecord, field: Field, marker: &str) -> String {
    match record.get(field) {
        Some(_) if field == Field::Cvv => CVV_MASK.to_string(),
        Some(value) => value.to_string(),
        None => marker.to_string(),
    }
}

pub fn header_line(certification: &CertificationMetadata) -> String {
    format!(
        "Document ID: {} | Hash: {}",
        certification.document_id,
        certification.short_hash()
    )
}

pub fn build_content(
    record: &SubmissionRecord,
    guests: &[GuestEntry],
    certification: &CertificationMetadata,
    processing: &str,
    styles: &DocumentStyles,
) -> DocumentContent {
    let marker = styles.not_provided.as_str();
    let section = |title: &str, fields: &[Field]| Section {
        title: title.to_string(),
        rows: fields
            .iter()
            .map(|&field| Row::new(field.label(), field_display(record, field, marker)))
            .collect(),
    };

    DocumentContent {
        title: styles.title.clone(),
        header_line: header_line(certification),
        sections: vec![
            section("Personal Information", PERSONAL_FIELDS),
            section("Property & Reservation", RESERVATION_FIELDS),
            section("Company Information", COMPANY_FIELDS),
            section("Payment Information", PAYMENT_FIELDS),
        ],
        guests: guest_rows(guests, marker),
        terms_line: terms_assertion(record.terms_accepted()).to_string(),
        certification: certification_rows(certification, processing, marker),
    }
}

pub fn guest_rows(guests: &[GuestEntry], marker: &str) -> Vec<GuestRow> {
    guests
        .iter()
        .enumerate()
        .map(|(i, guest)| GuestRow {
            number: i + 1,
            first_name: guest.first_name().unwrap_or(marker).to_string(),
            last_name: guest.last_name().unwrap_or(marker).to_string(),
            check_in: date_display(guest.check_in(), marker),
            check_out: date_display(guest.check_out(), marker),
            nights: guest
                .nights_stayed()
                .map(|n| n.to_string())
                .unwrap_or_else(|| marker.to_string()),
        })
        .collect()
}

fn date_display(date: &StayDate, marker: &str) -> String {
    if date.is_missing() {
        marker.to_string()
    } else {
        date.to_string()
    }
}

pub fn certification_rows(
    certification: &CertificationMetadata,
    processing: &str,
    marker: &str,
) -> Vec<Row> {
    let or_marker = |value: &Option<String>| value.clone().unwrap_or_else(|| marker.to_string());
    vec![
        Row::new("Document ID", certification.document_id.to_string()),
        Row::new("Content Hash (SHA-256)", certification.content_hash.clone()),
        Row::new("Generated At (UTC)", certification.generated_at.to_string()),
        Row::new("Submitter IP", or_marker(&certification.submitter_ip)),
        Row::new("User Agent", or_marker(&certification.user_agent)),
        Row::new("Form Accessed At", or_marker(&certification.form_accessed_at)),
        Row::new("Processing", processing),
    ]
}
