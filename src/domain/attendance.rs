use chrono::{Duration, NaiveDateTime, NaiveTime};

use crate::error::HrError;
use crate::model::attendance::{AttendanceRecord, AttendanceStatus, CheckOut, NewAttendance};

/// Hours at or above which a day counts as a full day.
pub const FULL_DAY_HOURS: f64 = 8.0;
/// Hours at or above which a day counts as at least a half day.
pub const HALF_DAY_HOURS: f64 = 4.0;

#[derive(Debug, Clone, PartialEq)]
pub struct AttendancePolicy {
    pub office_start: NaiveTime,
    pub late_grace: Duration,
}

impl Default for AttendancePolicy {
    fn default() -> Self {
        Self {
            office_start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            late_grace: Duration::minutes(15),
        }
    }
}

impl AttendancePolicy {
    pub fn is_late(&self, check_in: NaiveDateTime) -> bool {
        let (cutoff, _) = self.office_start.overflowing_add_signed(self.late_grace);
        check_in.time() > cutoff
    }
}

/// Caller-supplied check-in context, stored as-is.
#[derive(Debug, Clone, Default)]
pub struct CheckInDetails {
    pub ip: Option<String>,
    pub location: Option<String>,
    pub late_reason: Option<String>,
    pub project: Option<String>,
}

/// Builds today's record for `employee_id`, given whatever is already stored
/// for that day.
pub fn check_in(
    employee_id: u64,
    existing: Option<&AttendanceRecord>,
    now: NaiveDateTime,
    policy: &AttendancePolicy,
    details: CheckInDetails,
) -> Result<NewAttendance, HrError> {
    if existing.is_some() {
        return Err(HrError::AlreadyCheckedIn);
    }

    Ok(NewAttendance {
        employee_id,
        date: now.date(),
        check_in_time: now,
        status: AttendanceStatus::Present,
        check_in_ip: details.ip,
        check_in_location: details.location,
        is_late: policy.is_late(now),
        late_reason: details.late_reason,
        project: details.project,
    })
}

pub fn check_out(
    existing: Option<&AttendanceRecord>,
    now: NaiveDateTime,
    location: Option<String>,
) -> Result<CheckOut, HrError> {
    let record = existing.ok_or(HrError::NotCheckedIn)?;
    let check_in_time = record.check_in_time.ok_or(HrError::NotCheckedIn)?;

    if record.check_out_time.is_some() {
        return Err(HrError::AlreadyCheckedOut);
    }

    let working_hours = worked_hours(check_in_time, now);

    Ok(CheckOut {
        record_id: record.id,
        check_out_time: now,
        check_out_location: location,
        working_hours,
        status: classify_working_hours(working_hours),
    })
}

/// Fractional hours between two instants, never negative.
pub fn worked_hours(check_in: NaiveDateTime, check_out: NaiveDateTime) -> f64 {
    ((check_out - check_in).num_seconds() as f64 / 3600.0).max(0.0)
}

/// Short days below `HALF_DAY_HOURS` stay PRESENT; only the 4..8 hour band
/// is downgraded.
pub fn classify_working_hours(hours: f64) -> AttendanceStatus {
    if hours >= FULL_DAY_HOURS {
        AttendanceStatus::Present
    } else if hours >= HALF_DAY_HOURS {
        AttendanceStatus::HalfDay
    } else {
        AttendanceStatus::Present
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 3, 2)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    fn checked_in(time: NaiveDateTime) -> AttendanceRecord {
        let new = check_in(
            42,
            None,
            time,
            &AttendancePolicy::default(),
            CheckInDetails::default(),
        )
        .unwrap();

        AttendanceRecord {
            id: 1,
            employee_id: new.employee_id,
            date: new.date,
            check_in_time: Some(new.check_in_time),
            check_out_time: None,
            status: new.status,
            working_hours: None,
            check_in_ip: new.check_in_ip,
            check_in_location: new.check_in_location,
            check_out_location: None,
            is_late: new.is_late,
            late_reason: new.late_reason,
            project: new.project,
        }
    }

    #[test]
    fn check_in_creates_present_record() {
        let new = check_in(
            42,
            None,
            at(9, 0),
            &AttendancePolicy::default(),
            CheckInDetails {
                ip: Some("10.0.0.5".into()),
                project: Some("Payroll revamp".into()),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(new.employee_id, 42);
        assert_eq!(new.date, at(9, 0).date());
        assert_eq!(new.status, AttendanceStatus::Present);
        assert_eq!(new.check_in_ip.as_deref(), Some("10.0.0.5"));
        assert_eq!(new.project.as_deref(), Some("Payroll revamp"));
        assert!(!new.is_late);
    }

    #[test]
    fn second_check_in_same_day_is_rejected() {
        let first = checked_in(at(9, 0));
        let err = check_in(
            42,
            Some(&first),
            at(9, 5),
            &AttendancePolicy::default(),
            CheckInDetails::default(),
        )
        .unwrap_err();
        assert_eq!(err, HrError::AlreadyCheckedIn);
    }

    #[test]
    fn lateness_uses_start_plus_grace() {
        let policy = AttendancePolicy::default();
        assert!(!policy.is_late(at(9, 45)));
        assert!(policy.is_late(at(9, 46)));
    }

    #[test]
    fn full_day_is_present() {
        let out = check_out(Some(&checked_in(at(9, 0))), at(18, 0), None).unwrap();
        assert_eq!(out.working_hours, 9.0);
        assert_eq!(out.status, AttendanceStatus::Present);
        assert_eq!(out.check_out_time, at(18, 0));
    }

    #[test]
    fn short_day_is_still_present() {
        let out = check_out(Some(&checked_in(at(9, 0))), at(12, 30), None).unwrap();
        assert_eq!(out.working_hours, 3.5);
        assert_eq!(out.status, AttendanceStatus::Present);
    }

    #[test]
    fn mid_length_day_is_half_day() {
        let out = check_out(Some(&checked_in(at(9, 0))), at(15, 0), None).unwrap();
        assert_eq!(out.working_hours, 6.0);
        assert_eq!(out.status, AttendanceStatus::HalfDay);

        let boundary = check_out(Some(&checked_in(at(9, 0))), at(13, 0), None).unwrap();
        assert_eq!(boundary.status, AttendanceStatus::HalfDay);
    }

    #[test]
    fn check_out_without_check_in_is_rejected() {
        assert_eq!(
            check_out(None, at(18, 0), None).unwrap_err(),
            HrError::NotCheckedIn
        );

        let mut record = checked_in(at(9, 0));
        record.check_in_time = None;
        assert_eq!(
            check_out(Some(&record), at(18, 0), None).unwrap_err(),
            HrError::NotCheckedIn
        );
    }

    #[test]
    fn check_out_twice_is_rejected() {
        let mut record = checked_in(at(9, 0));
        record.check_out_time = Some(at(17, 0));
        assert_eq!(
            check_out(Some(&record), at(18, 0), None).unwrap_err(),
            HrError::AlreadyCheckedOut
        );
    }

    #[test]
    fn working_hours_are_not_rounded() {
        let hours = worked_hours(at(9, 0), at(9, 20));
        assert!((hours - 1.0 / 3.0).abs() < 1e-9);
        assert_eq!(worked_hours(at(10, 0), at(9, 0)), 0.0);
    }
}
