//! skyline-export
//!
//! Certified PDF generation for booking submissions. One shared section
//! contract, three interchangeable strategies: drawn from scratch, overlaid
//! onto an uploaded PDF, or filled into an HTML template and printed.

pub mod backend;
pub mod drawn;
pub mod error;
pub mod overlay;
pub mod render;
pub mod renderer;
pub mod sections;
pub mod signature;
pub mod styles;
