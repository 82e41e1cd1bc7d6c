//! skyline-dispatch
//!
//! Outbound reservation email: composes the summary message with its
//! attachments and hands it to a mail transport (SMTP in production).

pub mod compose;
pub mod error;
pub mod message;
pub mod summary;
pub mod transport;
