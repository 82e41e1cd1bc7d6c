//! Guest list extraction from the parallel guest arrays of a record.

use crate::fields::GuestRole;
use crate::models::guest::{GuestEntry, StayDate};
use crate::models::submission::SubmissionRecord;

/// Build one [`GuestEntry`] per index across the four guest roles.
///
/// Shorter roles pad with unknown. An index where every role is blank is
/// an untouched form row and is skipped, so a record whose guest rows are
/// all blank yields an empty list.
pub fn extract_guests(record: &SubmissionRecord) -> Vec<GuestEntry> {
    let first_names = record.guest_role(GuestRole::FirstName);
    let last_names = record.guest_role(GuestRole::LastName);
    let check_ins = record.guest_role(GuestRole::CheckIn);
    let check_outs = record.guest_role(GuestRole::CheckOut);

    let count = [
        first_names.len(),
        last_names.len(),
        check_ins.len(),
        check_outs.len(),
    ]
    .into_iter()
    .max()
    .unwrap_or(0);

    (0..count)
        .filter(|&i| {
            [first_names, last_names, check_ins, check_outs]
                .iter()
                .any(|role| text_at(role, i).is_some())
        })
        .map(|i| {
            GuestEntry::new(
                text_at(first_names, i),
                text_at(last_names, i),
                date_at(check_ins, i),
                date_at(check_outs, i),
            )
        })
        .collect()
}

fn text_at(values: &[String], index: usize) -> Option<String> {
    values
        .get(index)
        .map(|value| value.trim())
        .filter(|value| !value.is_empty())
        .map(str::to_string)
}

fn date_at(values: &[String], index: usize) -> StayDate {
    values
        .get(index)
        .map(|value| StayDate::parse(value))
        .unwrap_or(StayDate::Missing)
}
