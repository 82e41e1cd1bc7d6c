//! Field normalization.
//!
//! Resolves raw form fields into a [`SubmissionRecord`] through the alias
//! lists in [`crate::fields`]. Absence is normal: a field with no non-empty
//! alias is simply left out of the record.

use crate::fields::{Field, GuestRole};
use crate::models::form::RawForm;
use crate::models::submission::SubmissionRecord;

/// Fixed-length mask written in place of any submitted CVV.
pub const CVV_MASK: &str = "***";

pub fn normalize(form: &RawForm) -> SubmissionRecord {
    let mut record = SubmissionRecord::new();

    for field in Field::ALL {
        if let Some(value) = resolve_scalar(form, field.aliases()) {
            record.set(field, mask(field, value));
        }
    }

    for role in GuestRole::ALL {
        if let Some(values) = resolve_sequence(form, role.aliases()) {
            record.set_guest_role(role, values);
        }
    }

    record
}

/// First non-empty value across the aliases, in alias order.
fn resolve_scalar<'a>(form: &'a RawForm, aliases: &[&str]) -> Option<&'a str> {
    aliases.iter().find_map(|alias| {
        form.values(alias)
            .into_iter()
            .map(str::trim)
            .find(|value| !value.is_empty())
    })
}

/// All positional values of the first alias that was posted at all.
fn resolve_sequence(form: &RawForm, aliases: &[&str]) -> Option<Vec<String>> {
    aliases
        .iter()
        .find(|alias| form.contains(alias))
        .map(|alias| {
            form.values(alias)
                .into_iter()
                .map(|value| value.trim().to_string())
                .collect()
        })
}

fn mask(field: Field, value: &str) -> String {
    match field {
        Field::Cvv => CVV_MASK.to_string(),
        Field::CardNumber => mask_card_number(value),
        _ => value.to_string(),
    }
}

/// Keep only the last four digits of a card number.
pub fn mask_card_number(value: &str) -> String {
    let digits: Vec<char> = value.chars().filter(char::is_ascii_digit).collect();
    if digits.len() < 8 {
        return "****".to_string();
    }
    let last_four: String = digits[digits.len() - 4..].iter().collect();
    format!("**** **** **** {last_four}")
}
