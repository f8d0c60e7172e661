//! Validators guarding time-off requests against mandatory days, past
//! dates and premature deletion.

use chrono::{NaiveDate, NaiveDateTime};

use super::{AdvisoryRejection, PolicyViolation};
use crate::model::leave_request::LeaveState;
use crate::model::mandatory_day::MandatoryDayWindow;

/// Windows whose `[start_date, end_date]` intersects the requested period.
/// Inclusive on both ends, compared on calendar dates only.
fn matching_windows<'a>(
    windows: &'a [MandatoryDayWindow],
    date_from: NaiveDateTime,
    date_to: NaiveDateTime,
) -> Vec<&'a MandatoryDayWindow> {
    let from = date_from.date();
    let to = date_to.date();
    windows
        .iter()
        .filter(|w| w.start_date <= to && w.end_date >= from)
        .collect()
}

fn describe(window: &MandatoryDayWindow) -> String {
    if window.start_date == window.end_date {
        format!("- {} ({})", window.name, window.start_date)
    } else {
        format!(
            "- {} (From {} To {})",
            window.name, window.start_date, window.end_date
        )
    }
}

/// Advisory: start and end dates lying before today are rejected, each one
/// independently and clearing only the offending field. Never bypassed.
pub fn reject_past_dates(
    date_from: Option<NaiveDateTime>,
    date_to: Option<NaiveDateTime>,
    today: NaiveDate,
) -> Result<(), AdvisoryRejection> {
    if let Some(from) = date_from {
        if from.date() < today {
            return Err(AdvisoryRejection::new(
                "You cannot select a start date in the past.",
                vec!["date_from"],
            ));
        }
    }

    if let Some(to) = date_to {
        if to.date() < today {
            return Err(AdvisoryRejection::new(
                "You cannot select an end date in the past.",
                vec!["date_to"],
            ));
        }
    }

    Ok(())
}

/// Advisory: periods touching a mandatory day are rejected with every
/// conflicting window listed, and both date fields cleared. Callers skip
/// this for actors holding the bypass privilege.
pub fn reject_overlaps(
    windows: &[MandatoryDayWindow],
    date_from: NaiveDateTime,
    date_to: NaiveDateTime,
) -> Result<(), AdvisoryRejection> {
    let matches = matching_windows(windows, date_from, date_to);
    if matches.is_empty() {
        return Ok(());
    }

    let details = matches
        .iter()
        .map(|w| describe(w))
        .collect::<Vec<_>>()
        .join("\n");

    Err(AdvisoryRejection::new(
        format!(
            "The selected period overlaps with the following Mandatory Day(s):\n\n{details}\n\nPlease choose a different period."
        ),
        vec!["date_from", "date_to"],
    ))
}

/// Mandatory: the non-bypassable backstop run before insert, update,
/// confirm and approve. Same matching as [`reject_overlaps`], generic
/// denial message.
pub fn enforce_no_overlap(
    windows: &[MandatoryDayWindow],
    date_from: NaiveDateTime,
    date_to: NaiveDateTime,
) -> Result<(), PolicyViolation> {
    if matching_windows(windows, date_from, date_to).is_empty() {
        Ok(())
    } else {
        Err(PolicyViolation::new(
            "Submission Denied: You cannot request leave during a Mandatory Day. \
             Please check the company calendar and select different dates.",
        ))
    }
}

/// Mandatory: a deletion batch goes through only if every targeted request
/// is in a deletable state. The first offender fails the whole batch.
pub fn enforce_deletable(requests: &[(u64, LeaveState)]) -> Result<(), PolicyViolation> {
    for (_, state) in requests {
        if !state.is_deletable() {
            return Err(PolicyViolation::new(format!(
                "You cannot delete a time off which is in {state} state. \
                 Only Draft, Cancelled, or Refused leaves can be deleted."
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn at_nine(s: &str) -> NaiveDateTime {
        date(s).and_hms_opt(9, 0, 0).unwrap()
    }

    fn window(name: &str, start: &str, end: &str) -> MandatoryDayWindow {
        MandatoryDayWindow {
            name: name.to_string(),
            start_date: date(start),
            end_date: date(end),
        }
    }

    #[test]
    fn past_start_date_clears_only_the_start_field() {
        let err = reject_past_dates(
            Some(at_nine("2025-12-01")),
            Some(at_nine("2025-12-20")),
            date("2025-12-10"),
        )
        .unwrap_err();
        assert_eq!(err.reset_fields, vec!["date_from"]);
        assert!(err.message.contains("start date"));
    }

    #[test]
    fn past_end_date_clears_only_the_end_field() {
        let err = reject_past_dates(
            Some(at_nine("2025-12-15")),
            Some(at_nine("2025-12-05")),
            date("2025-12-10"),
        )
        .unwrap_err();
        assert_eq!(err.reset_fields, vec!["date_to"]);
        assert!(err.message.contains("end date"));
    }

    #[test]
    fn today_is_not_in_the_past() {
        assert!(
            reject_past_dates(
                Some(at_nine("2025-12-10")),
                Some(at_nine("2025-12-10")),
                date("2025-12-10"),
            )
            .is_ok()
        );
    }

    #[test]
    fn missing_dates_are_not_judged() {
        assert!(reject_past_dates(None, None, date("2025-12-10")).is_ok());
        assert!(reject_past_dates(None, Some(at_nine("2025-12-20")), date("2025-12-10")).is_ok());
    }

    #[test]
    fn overlap_bounds_are_inclusive() {
        let windows = [window("Freeze", "2025-12-29", "2025-12-31")];

        // Request ends exactly on the window's first day.
        assert!(reject_overlaps(&windows, at_nine("2025-12-27"), at_nine("2025-12-29")).is_err());
        // Request starts exactly on the window's last day.
        assert!(reject_overlaps(&windows, at_nine("2025-12-31"), at_nine("2026-01-02")).is_err());
        // Request ends the day before the window opens.
        assert!(reject_overlaps(&windows, at_nine("2025-12-26"), at_nine("2025-12-28")).is_ok());
        // Request starts the day after the window closes.
        assert!(reject_overlaps(&windows, at_nine("2026-01-01"), at_nine("2026-01-03")).is_ok());
    }

    #[test]
    fn overlap_comparison_strips_time_of_day() {
        let windows = [window("Freeze", "2025-12-31", "2025-12-31")];
        let late_arrival = date("2025-12-31").and_hms_opt(23, 30, 0).unwrap();
        assert!(reject_overlaps(&windows, late_arrival, late_arrival).is_err());
    }

    #[test]
    fn rejection_lists_every_match_with_its_range() {
        let windows = [
            window("Inventory Day", "2025-12-30", "2025-12-30"),
            window("Year-End Freeze", "2025-12-29", "2025-12-31"),
            window("Spring Audit", "2026-03-01", "2026-03-05"),
        ];
        let err =
            reject_overlaps(&windows, at_nine("2025-12-30"), at_nine("2026-01-02")).unwrap_err();

        // Single-day windows are rendered as one date, ranges as From/To.
        assert!(err.message.contains("- Inventory Day (2025-12-30)"));
        assert!(
            err.message
                .contains("- Year-End Freeze (From 2025-12-29 To 2025-12-31)")
        );
        assert!(!err.message.contains("Spring Audit"));
        assert_eq!(err.reset_fields, vec!["date_from", "date_to"]);
    }

    #[test]
    fn year_end_freeze_scenario() {
        // Freeze assigned to employee E1 only; the handler's audience query
        // yields the window for E1 and nothing for E2.
        let for_e1 = [window("Year-End Freeze", "2025-12-29", "2025-12-31")];
        let for_e2: [MandatoryDayWindow; 0] = [];

        let from = at_nine("2025-12-30");
        let to = at_nine("2026-01-02");

        assert!(reject_overlaps(&for_e1, from, to).is_err());
        assert!(enforce_no_overlap(&for_e1, from, to).is_err());
        assert!(reject_overlaps(&for_e2, from, to).is_ok());
        assert!(enforce_no_overlap(&for_e2, from, to).is_ok());
    }

    #[test]
    fn backstop_message_is_generic() {
        let windows = [window("Freeze", "2025-12-29", "2025-12-31")];
        let err = enforce_no_overlap(&windows, at_nine("2025-12-30"), at_nine("2025-12-30"))
            .unwrap_err();
        assert!(err.message.starts_with("Submission Denied"));
        assert!(!err.message.contains("Freeze"));
    }

    #[test]
    fn one_confirmed_request_fails_the_whole_batch() {
        let batch = [
            (1, LeaveState::Draft),
            (2, LeaveState::Confirmed),
            (3, LeaveState::Draft),
        ];
        let err = enforce_deletable(&batch).unwrap_err();
        assert!(err.message.contains("confirmed state"));
    }

    #[test]
    fn all_draft_batch_may_be_deleted() {
        let batch = [
            (1, LeaveState::Draft),
            (2, LeaveState::Draft),
            (3, LeaveState::Draft),
        ];
        assert!(enforce_deletable(&batch).is_ok());
    }

    #[test]
    fn refused_and_cancelled_requests_may_be_deleted() {
        let batch = [(1, LeaveState::Refused), (2, LeaveState::Cancelled)];
        assert!(enforce_deletable(&batch).is_ok());
    }
}
