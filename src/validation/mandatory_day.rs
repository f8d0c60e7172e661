//! Validators for mandatory-day records themselves.

use chrono::NaiveDate;

use super::{AdvisoryRejection, PolicyViolation};
use crate::model::mandatory_day::MandatoryDaySnapshot;

/// Mandatory: no other record may carry the same name, the identical
/// window and a shared employee. Dates compare by exact equality, so
/// overlapping but non-identical windows are not duplicates.
pub fn reject_duplicates(
    name: &str,
    start_date: NaiveDate,
    end_date: NaiveDate,
    employee_ids: &[u64],
    existing: &[MandatoryDaySnapshot],
) -> Result<(), PolicyViolation> {
    let duplicate = existing.iter().find(|other| {
        other.name == name
            && other.start_date == start_date
            && other.end_date == end_date
            && other
                .employee_ids
                .iter()
                .any(|id| employee_ids.contains(id))
    });

    match duplicate {
        Some(other) => Err(PolicyViolation::new(format!(
            "A mandatory day record named '{}' already exists for these dates and employees. \
             You cannot create duplicate records.",
            other.name
        ))),
        None => Ok(()),
    }
}

/// Advisory: a start date must not lie in the past at entry time. There is
/// deliberately no mandatory-phase counterpart, so non-interactive writes
/// may still backdate a window.
pub fn reject_backdated_start(
    start_date: NaiveDate,
    today: NaiveDate,
) -> Result<(), AdvisoryRejection> {
    if start_date < today {
        Err(AdvisoryRejection::new(
            format!(
                "You selected {start_date}, which is in the past. \
                 Mandatory days must be scheduled for today or the future."
            ),
            vec!["start_date"],
        ))
    } else {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn snapshot(id: u64, name: &str, start: &str, end: &str, employees: &[u64]) -> MandatoryDaySnapshot {
        MandatoryDaySnapshot {
            id,
            name: name.to_string(),
            start_date: date(start),
            end_date: date(end),
            employee_ids: employees.to_vec(),
        }
    }

    #[test]
    fn same_name_dates_and_shared_employee_is_a_duplicate() {
        let existing = [snapshot(7, "Stocktake", "2026-02-02", "2026-02-04", &[3, 4])];
        let err = reject_duplicates(
            "Stocktake",
            date("2026-02-02"),
            date("2026-02-04"),
            &[4, 9],
            &existing,
        )
        .unwrap_err();
        assert!(err.message.contains("'Stocktake'"));
    }

    #[test]
    fn overlapping_but_non_identical_window_is_not_a_duplicate() {
        let existing = [snapshot(7, "Stocktake", "2026-02-02", "2026-02-04", &[3])];
        assert!(
            reject_duplicates(
                "Stocktake",
                date("2026-02-03"),
                date("2026-02-04"),
                &[3],
                &existing,
            )
            .is_ok()
        );
    }

    #[test]
    fn disjoint_employee_sets_are_not_duplicates() {
        let existing = [snapshot(7, "Stocktake", "2026-02-02", "2026-02-04", &[3, 4])];
        assert!(
            reject_duplicates(
                "Stocktake",
                date("2026-02-02"),
                date("2026-02-04"),
                &[8, 9],
                &existing,
            )
            .is_ok()
        );
    }

    #[test]
    fn different_name_is_not_a_duplicate() {
        let existing = [snapshot(7, "Stocktake", "2026-02-02", "2026-02-04", &[3])];
        assert!(
            reject_duplicates(
                "Audit",
                date("2026-02-02"),
                date("2026-02-04"),
                &[3],
                &existing,
            )
            .is_ok()
        );
    }

    #[test]
    fn backdated_start_is_rejected_and_cleared() {
        let err = reject_backdated_start(date("2025-11-30"), date("2025-12-10")).unwrap_err();
        assert!(err.message.contains("2025-11-30"));
        assert_eq!(err.reset_fields, vec!["start_date"]);
    }

    #[test]
    fn today_and_future_starts_pass() {
        assert!(reject_backdated_start(date("2025-12-10"), date("2025-12-10")).is_ok());
        assert!(reject_backdated_start(date("2026-01-01"), date("2025-12-10")).is_ok());
    }
}
