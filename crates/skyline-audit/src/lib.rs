//! skyline-audit
//!
//! Structured audit events for the intake pipeline, emitted through
//! `tracing` so they land in the same log stream as request logs.

pub mod events;
