//! Due/overdue evaluation.
//!
//! Pure functions over a loan record and an instant; no storage access, so
//! read paths can call them per record with no locking.

use chrono::{DateTime, Utc};

use crate::models::loan::{DueStatus, LoanRecord};

const SECONDS_PER_DAY: i64 = 86_400;

/// Whole days until the due date, rounded up.
///
/// An hour before the deadline still counts as one day remaining; an hour
/// past it counts as zero (due today), and a full day past as -1.
pub fn days_remaining(due_date: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let secs = (due_date - now).num_seconds();
    let days = secs.div_euclid(SECONDS_PER_DAY);
    if secs.rem_euclid(SECONDS_PER_DAY) != 0 {
        days + 1
    } else {
        days
    }
}

/// Classify an open deadline at `now`
pub fn due_status(due_date: DateTime<Utc>, now: DateTime<Utc>) -> DueStatus {
    let remaining = days_remaining(due_date, now);
    if remaining > 0 {
        DueStatus::OnTime {
            days_remaining: remaining,
        }
    } else if remaining == 0 {
        DueStatus::DueToday
    } else {
        DueStatus::Overdue {
            days_late: -remaining,
        }
    }
}

/// Classify a loan record at `now`. Closed loans are never overdue.
pub fn evaluate(record: &LoanRecord, now: DateTime<Utc>) -> DueStatus {
    if record.is_active() {
        due_status(record.due_date, now)
    } else {
        DueStatus::Returned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::loan::LoanStatus;
    use chrono::{Duration, TimeZone};

    fn at(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
    }

    #[test]
    fn due_yesterday_is_one_day_late() {
        let now = at(2026, 3, 10, 12);
        let due = now - Duration::days(1);
        assert_eq!(due_status(due, now), DueStatus::Overdue { days_late: 1 });
    }

    #[test]
    fn due_exactly_now_is_due_today() {
        let now = at(2026, 3, 10, 12);
        assert_eq!(due_status(now, now), DueStatus::DueToday);
    }

    #[test]
    fn due_a_few_hours_ago_is_due_today() {
        let now = at(2026, 3, 10, 12);
        let due = now - Duration::hours(3);
        assert_eq!(due_status(due, now), DueStatus::DueToday);
    }

    #[test]
    fn due_in_one_hour_counts_as_one_day_remaining() {
        let now = at(2026, 3, 10, 12);
        let due = now + Duration::hours(1);
        assert_eq!(due_status(due, now), DueStatus::OnTime { days_remaining: 1 });
    }

    #[test]
    fn due_in_three_weeks() {
        let now = at(2026, 3, 10, 12);
        let due = now + Duration::days(21);
        assert_eq!(
            due_status(due, now),
            DueStatus::OnTime { days_remaining: 21 }
        );
    }

    #[test]
    fn ten_days_late() {
        let now = at(2026, 3, 10, 12);
        let due = now - Duration::days(10);
        assert_eq!(due_status(due, now), DueStatus::Overdue { days_late: 10 });
    }

    #[test]
    fn returned_loan_is_never_overdue() {
        let now = at(2026, 3, 10, 12);
        let record = LoanRecord {
            id: 1,
            member_id: 1,
            item_id: 1,
            loan_date: now - Duration::days(40),
            due_date: now - Duration::days(19),
            return_date: Some(now - Duration::days(20)),
            status: LoanStatus::Returned,
        };
        assert_eq!(evaluate(&record, now), DueStatus::Returned);
    }

    #[test]
    fn active_loan_uses_its_due_date() {
        let now = at(2026, 3, 10, 12);
        let record = LoanRecord {
            id: 2,
            member_id: 1,
            item_id: 1,
            loan_date: now - Duration::days(5),
            due_date: now + Duration::days(16),
            return_date: None,
            status: LoanStatus::Active,
        };
        assert_eq!(
            evaluate(&record, now),
            DueStatus::OnTime { days_remaining: 16 }
        );
    }
}
