//! skyline-core
//!
//! Pure domain types for booking-form intake: field catalogue, submission
//! normalization, guest extraction and document certification.
//! No I/O. This is the shared vocabulary of the Skyline services.

pub mod certify;
pub mod error;
pub mod fields;
pub mod guests;
pub mod models;
pub mod normalize;

/// Marker shown wherever a value was not submitted.
pub const NOT_PROVIDED: &str = "N/A";
