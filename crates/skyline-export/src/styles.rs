use serde::{Deserialize, Serialize};

use skyline_core::NOT_PROVIDED;

/// Page geometry and typography shared by every rendering strategy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentStyles {
    /// Title printed on the first page.
    pub title: String,

    /// Standard Type1 font for body text.
    pub body_font: String,

    /// Standard Type1 font for headings and labels.
    pub heading_font: String,

    /// Page size in points (A4 by default).
    pub page_width: f32,
    pub page_height: f32,

    /// Uniform page margin in points.
    pub margin: f32,

    pub title_size: f32,
    pub heading_size: f32,
    pub body_size: f32,
    pub small_size: f32,

    /// Baseline-to-baseline distance as a multiple of the font size.
    pub line_height: f32,

    /// Horizontal offset of values from the label column, in points.
    pub value_offset: f32,

    /// Box the signature image is scaled into, in points.
    pub signature_width: f32,
    pub signature_height: f32,

    /// Shown in place of any value that was not submitted.
    pub not_provided: String,
}

impl Default for DocumentStyles {
    fn default() -> Self {
        Self {
            title: "Reservation Booking Form".to_string(),
            body_font: "Helvetica".to_string(),
            heading_font: "Helvetica-Bold".to_string(),
            page_width: 595.0,
            page_height: 842.0,
            margin: 54.0,
            title_size: 18.0,
            heading_size: 13.0,
            body_size: 10.0,
            small_size: 8.0,
            line_height: 1.45,
            value_offset: 150.0,
            signature_width: 180.0,
            signature_height: 60.0,
            not_provided: NOT_PROVIDED.to_string(),
        }
    }
}

impl DocumentStyles {
    pub fn with_not_provided(mut self, marker: impl Into<String>) -> Self {
        self.not_provided = marker.into();
        self
    }

    pub fn content_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }
}
