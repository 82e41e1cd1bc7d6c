use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use tera::{Context, Tera};

use skyline_core::fields::Field;
use skyline_core::models::certification::CertificationMetadata;
use skyline_core::models::submission::SubmissionRecord;

use crate::error::RenderError;
use crate::sections::{DocumentContent, GuestRow, NO_GUESTS_LINE, field_display};
use crate::signature::SignatureImage;
use crate::styles::DocumentStyles;

/// Bundled booking template (Jinja2 syntax, HTML output).
pub const BOOKING_TEMPLATE: &str = include_str!("../templates/booking.html.tera");

/// Template name; the `.html` suffix turns on Tera's autoescaping.
pub const BOOKING_TEMPLATE_NAME: &str = "booking.html";

/// Render a Tera template with the given context.
///
/// Every occurrence of a placeholder is substituted; a placeholder with no
/// context value is an error rather than silently left in the output.
pub fn render_template(
    template_name: &str,
    template_content: &str,
    context: &Context,
) -> Result<String, RenderError> {
    let mut tera = Tera::default();
    tera.add_raw_template(template_name, template_content)
        .map_err(|e| RenderError::Template(e.to_string()))?;

    let rendered = tera.render(template_name, context)?;
    Ok(rendered)
}

/// Template variables for a submission.
///
/// Each field key maps to its display value or the not-provided marker,
/// so templates never see an undefined placeholder for a known field.
pub fn booking_context(
    record: &SubmissionRecord,
    content: &DocumentContent,
    certification: &CertificationMetadata,
    signature: Option<&SignatureImage>,
    styles: &DocumentStyles,
) -> Context {
    let marker = styles.not_provided.as_str();
    let mut context = Context::new();

    for field in Field::ALL {
        context.insert(field.key(), &field_display(record, field, marker));
    }

    context.insert("title", &content.title);
    context.insert("header_line", &content.header_line);
    context.insert("sections", &content.sections);
    context.insert("guest_table", &guest_table_fragment(&content.guests));
    context.insert("terms_line", &content.terms_line);
    context.insert("terms_accepted", &record.terms_accepted());
    context.insert("certification", &content.certification);
    context.insert("document_id", &certification.document_id.to_string());
    context.insert("content_hash", &certification.content_hash);
    context.insert("short_hash", certification.short_hash());
    context.insert("generated_at", &certification.generated_at.to_string());
    context.insert("not_provided", marker);
    context.insert(
        "signature_src",
        &signature.map(|sig| format!("data:image/jpeg;base64,{}", STANDARD.encode(sig.jpeg()))),
    );
    context
}

/// Pre-rendered guest table; inserted into templates with `| safe`.
pub fn guest_table_fragment(guests: &[GuestRow]) -> String {
    if guests.is_empty() {
        return format!("<p class=\"empty-state\">{NO_GUESTS_LINE}</p>");
    }

    let mut html = String::from(
        "<table class=\"guests\">\n<thead><tr><th>#</th><th>First Name</th><th>Last Name</th>\
         <th>Check-in</th><th>Check-out</th><th>Nights</th></tr></thead>\n<tbody>\n",
    );
    for guest in guests {
        html.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
            guest.number,
            tera::escape_html(&guest.first_name),
            tera::escape_html(&guest.last_name),
            tera::escape_html(&guest.check_in),
            tera::escape_html(&guest.check_out),
            tera::escape_html(&guest.nights),
        ));
    }
    html.push_str("</tbody>\n</table>");
    html
}
