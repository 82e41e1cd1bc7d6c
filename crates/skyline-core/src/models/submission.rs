use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::NOT_PROVIDED;
use crate::error::CoreError;
use crate::fields::{Field, GuestRole};

/// A normalized field value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Scalar(String),
    /// Positional values of a repeated field; empty strings keep their slot.
    Sequence(Vec<String>),
}

/// Canonical record of one submission, keyed by canonical field keys.
///
/// A key that is absent was not submitted. Sensitive payment fields are
/// already masked by the time a record exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionRecord {
    fields: BTreeMap<String, FieldValue>,
}

impl SubmissionRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: Field, value: impl Into<String>) {
        self.fields
            .insert(field.key().to_string(), FieldValue::Scalar(value.into()));
    }

    pub fn set_guest_role(&mut self, role: GuestRole, values: Vec<String>) {
        self.fields
            .insert(role.key().to_string(), FieldValue::Sequence(values));
    }

    /// The submitted value, or `None` when the field was not provided.
    pub fn get(&self, field: Field) -> Option<&str> {
        match self.fields.get(field.key()) {
            Some(FieldValue::Scalar(value)) => Some(value.as_str()),
            _ => None,
        }
    }

    /// The submitted value, or `marker` when absent.
    pub fn display_or<'a>(&'a self, field: Field, marker: &'a str) -> &'a str {
        self.get(field).unwrap_or(marker)
    }

    /// The submitted value, or the default not-provided marker.
    pub fn display(&self, field: Field) -> &str {
        self.display_or(field, NOT_PROVIDED)
    }

    /// Positional values for a guest role; empty when the role was not posted.
    pub fn guest_role(&self, role: GuestRole) -> &[String] {
        match self.fields.get(role.key()) {
            Some(FieldValue::Sequence(values)) => values.as_slice(),
            _ => &[],
        }
    }

    /// Whether the terms checkbox was ticked.
    pub fn terms_accepted(&self) -> bool {
        match self.get(Field::TermsAccepted) {
            Some(value) => !matches!(
                value.trim().to_ascii_lowercase().as_str(),
                "" | "false" | "0" | "no" | "off"
            ),
            None => false,
        }
    }

    /// Deterministic serialization (sorted keys) used for content hashing.
    pub fn canonical_bytes(&self) -> Result<Vec<u8>, CoreError> {
        Ok(serde_json::to_vec(&self.fields)?)
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}
