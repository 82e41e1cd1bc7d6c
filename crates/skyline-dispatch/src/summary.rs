//! HTML body of the reservation email.
//!
//! Built from the submission alone, independently of the rendered document,
//! so a missing field can never fail the message.

use tera::{Context, Tera};

use skyline_core::fields::Field;
use skyline_core::models::certification::CertificationMetadata;
use skyline_core::models::guest::GuestEntry;
use skyline_core::models::submission::SubmissionRecord;
use skyline_export::sections::{NO_GUESTS_LINE, Row, Section, guest_rows};

use crate::error::DispatchError;
use crate::message::DispatchSettings;

pub const SUMMARY_TEMPLATE: &str = include_str!("../templates/summary.html.tera");

const SUMMARY_TEMPLATE_NAME: &str = "summary.html";

/// Email summary sections. Payment shows masked values only and leaves the
/// security code out entirely.
const SUMMARY_SECTIONS: &[(&str, &[Field])] = &[
    (
        "Personal Information",
        &[Field::FirstName, Field::LastName, Field::Phone, Field::Email],
    ),
    (
        "Reservation Details",
        &[
            Field::PropertyName,
            Field::CheckIn,
            Field::CheckOut,
            Field::Rooms,
            Field::Adults,
            Field::Children,
            Field::SpecialRequests,
        ],
    ),
    (
        "Company Information",
        &[Field::CompanyName, Field::LeaderName, Field::BillingAddress],
    ),
    (
        "Payment Information",
        &[
            Field::CardHolderName,
            Field::CardType,
            Field::CardNumber,
            Field::TodaysDate,
        ],
    ),
    ("Contact Information", &[Field::DirectNumber]),
];

pub fn summary_sections(record: &SubmissionRecord, marker: &str) -> Vec<Section> {
    SUMMARY_SECTIONS
        .iter()
        .map(|(title, fields)| Section {
            title: title.to_string(),
            rows: fields
                .iter()
                .map(|&field| Row {
                    label: field.label().to_string(),
                    value: record.display_or(field, marker).to_string(),
                })
                .collect(),
        })
        .collect()
}

pub fn render_summary(
    settings: &DispatchSettings,
    record: &SubmissionRecord,
    guests: &[GuestEntry],
    certification: &CertificationMetadata,
) -> Result<String, DispatchError> {
    let marker = settings.not_provided.as_str();

    let mut context = Context::new();
    context.insert("subject", &settings.subject);
    context.insert("document_id", &certification.document_id.to_string());
    context.insert("short_hash", certification.short_hash());
    context.insert("sections", &summary_sections(record, marker));
    context.insert("guests", &guest_rows(guests, marker));
    context.insert("no_guests", NO_GUESTS_LINE);
    context.insert(
        "terms_accepted",
        if record.terms_accepted() { "Yes" } else { "No" },
    );
    context.insert(
        "submitted_at",
        &certification
            .generated_at
            .strftime("%Y-%m-%d %H:%M:%S UTC")
            .to_string(),
    );

    let mut tera = Tera::default();
    tera.add_raw_template(SUMMARY_TEMPLATE_NAME, SUMMARY_TEMPLATE)?;
    Ok(tera.render(SUMMARY_TEMPLATE_NAME, &context)?)
}
