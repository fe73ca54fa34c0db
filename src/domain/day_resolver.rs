//! Resolution of a single employee-day into one canonical status.
//!
//! Precedence is a plain ordered list of rules; the first rule that matches
//! wins and anything left over is ABSENT. Reordering precedence means
//! reordering `PRECEDENCE`.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Weekday};
use serde::Serialize;
use strum::{AsRefStr, Display};
use utoipa::ToSchema;

use crate::error::HrError;
use crate::model::{
    attendance::{AttendanceRecord, AttendanceStatus},
    employee::Employee,
    holiday::Holiday,
    leave_request::{LeaveRequest, LeaveStatus},
    leave_type::LeaveType,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display, AsRefStr, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum DayStatus {
    Present,
    HalfDay,
    Absent,
    OnLeave,
    Holiday,
    Weekend,
    Wfh,
    Break,
}

/// Weekdays treated as non-working.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkWeek {
    weekend: Vec<Weekday>,
}

impl Default for WorkWeek {
    fn default() -> Self {
        Self {
            weekend: vec![Weekday::Sat, Weekday::Sun],
        }
    }
}

impl WorkWeek {
    pub fn new(weekend: Vec<Weekday>) -> Self {
        Self { weekend }
    }

    pub fn is_weekend(&self, date: NaiveDate) -> bool {
        self.weekend.contains(&date.weekday())
    }
}

/// Everything known about one employee on one date.
///
/// `leaves` and `holidays` may hold unrelated rows (other employees, other
/// dates, non-approved requests); the rules filter them.
pub struct DayInputs<'a> {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub attendance: Option<&'a AttendanceRecord>,
    pub leaves: &'a [LeaveRequest],
    pub leave_types: &'a [LeaveType],
    pub holidays: &'a [Holiday],
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayDetails {
    /// Status with HALF_DAY kept apart from PRESENT, used for statistics.
    pub granular_status: DayStatus,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out: Option<NaiveDateTime>,
    pub working_hours: Option<f64>,
    pub is_late: bool,
    pub remarks: Option<String>,
}

impl DayDetails {
    fn plain(granular_status: DayStatus, remarks: Option<String>) -> Self {
        Self {
            granular_status,
            check_in: None,
            check_out: None,
            working_hours: None,
            is_late: false,
            remarks,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct DayStatusView {
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub date: NaiveDate,
    pub status: DayStatus,
    pub details: DayDetails,
}

type Rule = fn(&DayInputs<'_>, &WorkWeek) -> Option<(DayStatus, DayDetails)>;

/// First match wins; anything unmatched is `Absent`.
const PRECEDENCE: [Rule; 4] = [from_attendance, from_approved_leave, from_holiday, from_weekend];

fn from_attendance(inputs: &DayInputs<'_>, _: &WorkWeek) -> Option<(DayStatus, DayDetails)> {
    let record = inputs.attendance?;
    let check_in = record.check_in_time?;

    let (status, granular) = match record.status {
        AttendanceStatus::Wfh => (DayStatus::Wfh, DayStatus::Wfh),
        AttendanceStatus::Break => (DayStatus::Break, DayStatus::Break),
        AttendanceStatus::HalfDay => (DayStatus::Present, DayStatus::HalfDay),
        AttendanceStatus::Present | AttendanceStatus::Absent => {
            (DayStatus::Present, DayStatus::Present)
        }
    };

    Some((
        status,
        DayDetails {
            granular_status: granular,
            check_in: Some(check_in),
            check_out: record.check_out_time,
            working_hours: record.working_hours,
            is_late: record.is_late,
            remarks: record.late_reason.clone(),
        },
    ))
}

fn from_approved_leave(inputs: &DayInputs<'_>, _: &WorkWeek) -> Option<(DayStatus, DayDetails)> {
    let leave = inputs.leaves.iter().find(|l| {
        l.employee_id == inputs.employee_id
            && l.status == LeaveStatus::Approved
            && l.covers(inputs.date)
    })?;

    let type_name = inputs
        .leave_types
        .iter()
        .find(|t| t.id == leave.leave_type_id)
        .map(|t| t.name.as_str())
        .unwrap_or("Leave");

    let remarks = if leave.is_half_day {
        format!("{type_name} (Half Day)")
    } else {
        type_name.to_string()
    };

    Some((
        DayStatus::OnLeave,
        DayDetails::plain(DayStatus::OnLeave, Some(remarks)),
    ))
}

fn from_holiday(inputs: &DayInputs<'_>, _: &WorkWeek) -> Option<(DayStatus, DayDetails)> {
    let holiday = inputs
        .holidays
        .iter()
        .find(|h| h.is_active && h.date == inputs.date)?;

    Some((
        DayStatus::Holiday,
        DayDetails::plain(DayStatus::Holiday, Some(holiday.name.clone())),
    ))
}

fn from_weekend(inputs: &DayInputs<'_>, week: &WorkWeek) -> Option<(DayStatus, DayDetails)> {
    week.is_weekend(inputs.date)
        .then(|| (DayStatus::Weekend, DayDetails::plain(DayStatus::Weekend, None)))
}

pub fn resolve_day(inputs: &DayInputs<'_>, week: &WorkWeek) -> DayStatusView {
    let (status, details) = PRECEDENCE
        .iter()
        .find_map(|rule| rule(inputs, week))
        .unwrap_or_else(|| (DayStatus::Absent, DayDetails::plain(DayStatus::Absent, None)));

    DayStatusView {
        date: inputs.date,
        status,
        details,
    }
}

/// Per-status day counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct StatusCounts {
    pub present: u32,
    pub wfh: u32,
    pub leave: u32,
    pub holiday: u32,
    pub absent: u32,
    pub half_day: u32,
    pub weekend: u32,
}

impl StatusCounts {
    pub fn record(&mut self, granular: DayStatus) {
        match granular {
            DayStatus::Present | DayStatus::Break => self.present += 1,
            DayStatus::HalfDay => self.half_day += 1,
            DayStatus::Wfh => self.wfh += 1,
            DayStatus::OnLeave => self.leave += 1,
            DayStatus::Holiday => self.holiday += 1,
            DayStatus::Weekend => self.weekend += 1,
            DayStatus::Absent => self.absent += 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MonthView {
    pub employee_id: u64,
    pub year: i32,
    pub month: u32,
    #[schema(value_type = Object)]
    pub days: BTreeMap<NaiveDate, DayStatusView>,
    pub summary: StatusCounts,
}

/// Raw records for one employee touching one month.
pub struct MonthInputs<'a> {
    pub employee_id: u64,
    pub records: &'a [AttendanceRecord],
    pub leaves: &'a [LeaveRequest],
    pub leave_types: &'a [LeaveType],
    pub holidays: &'a [Holiday],
}

pub fn month_bounds(year: i32, month: u32) -> Result<(NaiveDate, NaiveDate), HrError> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| HrError::validation("Invalid year/month"))?;
    let next = if month == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, month + 1, 1)
    }
    .ok_or_else(|| HrError::validation("Invalid year/month"))?;

    Ok((first, next - Duration::days(1)))
}

/// Resolves every day of the month. Days after `as_of` are listed but left
/// out of the summary.
pub fn month_view(
    year: i32,
    month: u32,
    inputs: &MonthInputs<'_>,
    week: &WorkWeek,
    as_of: NaiveDate,
) -> Result<MonthView, HrError> {
    let (first, last) = month_bounds(year, month)?;

    let mut days = BTreeMap::new();
    let mut summary = StatusCounts::default();

    for date in first.iter_days().take_while(|d| *d <= last) {
        let attendance = inputs
            .records
            .iter()
            .find(|r| r.employee_id == inputs.employee_id && r.date == date);

        let view = resolve_day(
            &DayInputs {
                employee_id: inputs.employee_id,
                date,
                attendance,
                leaves: inputs.leaves,
                leave_types: inputs.leave_types,
                holidays: inputs.holidays,
            },
            week,
        );

        if date <= as_of {
            summary.record(view.details.granular_status);
        }
        days.insert(date, view);
    }

    Ok(MonthView {
        employee_id: inputs.employee_id,
        year,
        month,
        days,
        summary,
    })
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresenceEntry {
    pub employee_id: u64,
    pub name: String,
    pub designation: Option<String>,
    pub status: DayStatus,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_in: Option<NaiveDateTime>,
    #[schema(value_type = Option<String>, format = "date-time")]
    pub check_out: Option<NaiveDateTime>,
    /// Time since check-in while still in, total worked once out.
    #[schema(example = "3h 05m")]
    pub duration: Option<String>,
    pub remarks: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PresenceView {
    #[schema(format = "date", value_type = String)]
    pub date: NaiveDate,
    pub counts: StatusCounts,
    pub members: Vec<PresenceEntry>,
}

/// Today's records for the whole team.
pub struct TeamInputs<'a> {
    pub employees: &'a [Employee],
    pub records: &'a [AttendanceRecord],
    pub leaves: &'a [LeaveRequest],
    pub leave_types: &'a [LeaveType],
    pub holidays: &'a [Holiday],
}

/// Virtual-office view: every active employee resolved for `now`'s date.
pub fn presence(inputs: &TeamInputs<'_>, week: &WorkWeek, now: NaiveDateTime) -> PresenceView {
    let today = now.date();
    let mut counts = StatusCounts::default();

    let members = inputs
        .employees
        .iter()
        .filter(|e| e.is_active())
        .map(|employee| {
            let attendance = inputs
                .records
                .iter()
                .find(|r| r.employee_id == employee.id && r.date == today);

            let view = resolve_day(
                &DayInputs {
                    employee_id: employee.id,
                    date: today,
                    attendance,
                    leaves: inputs.leaves,
                    leave_types: inputs.leave_types,
                    holidays: inputs.holidays,
                },
                week,
            );
            counts.record(view.details.granular_status);

            let duration = match (view.details.check_in, view.details.check_out) {
                (Some(start), Some(end)) => Some(format_duration(end - start)),
                (Some(start), None) => Some(format_duration(now - start)),
                _ => None,
            };

            PresenceEntry {
                employee_id: employee.id,
                name: employee.full_name(),
                designation: employee.designation.clone(),
                status: view.status,
                check_in: view.details.check_in,
                check_out: view.details.check_out,
                duration,
                remarks: view.details.remarks,
            }
        })
        .collect();

    PresenceView {
        date: today,
        counts,
        members,
    }
}

/// Formats as `"{h}h {mm}m"`; negative spans read as zero.
pub fn format_duration(span: Duration) -> String {
    let minutes = span.num_minutes().max(0);
    format!("{}h {:02}m", minutes / 60, minutes % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::holiday::HolidayType;
    use crate::model::leave_request::HalfDayType;

    const EMP: u64 = 7;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(d: NaiveDate, h: u32, m: u32) -> NaiveDateTime {
        d.and_hms_opt(h, m, 0).unwrap()
    }

    fn record(d: NaiveDate, status: AttendanceStatus) -> AttendanceRecord {
        AttendanceRecord {
            id: 1,
            employee_id: EMP,
            date: d,
            check_in_time: Some(at(d, 9, 0)),
            check_out_time: None,
            status,
            working_hours: None,
            check_in_ip: None,
            check_in_location: None,
            check_out_location: None,
            is_late: false,
            late_reason: None,
            project: None,
        }
    }

    fn leave(from: NaiveDate, to: NaiveDate, status: LeaveStatus) -> LeaveRequest {
        LeaveRequest {
            id: 1,
            employee_id: EMP,
            leave_type_id: 1,
            from_date: from,
            to_date: to,
            number_of_days: ((to - from).num_days() + 1) as f64,
            reason: "family trip".into(),
            status,
            is_half_day: false,
            half_day_type: None,
            contact_number: None,
            admin_comments: None,
            applied_at: at(from, 8, 0),
            decided_at: None,
        }
    }

    fn leave_types() -> Vec<LeaveType> {
        vec![LeaveType {
            id: 1,
            name: "Casual Leave".into(),
            code: "CL".into(),
            days_allowed: 12,
            requires_approval: true,
            is_paid: true,
            is_active: true,
        }]
    }

    fn holiday(d: NaiveDate, kind: HolidayType, active: bool) -> Holiday {
        Holiday {
            id: 1,
            date: d,
            name: "Founders Day".into(),
            holiday_type: kind,
            is_active: active,
        }
    }

    fn resolve(
        d: NaiveDate,
        attendance: Option<&AttendanceRecord>,
        leaves: &[LeaveRequest],
        holidays: &[Holiday],
    ) -> DayStatusView {
        let types = leave_types();
        resolve_day(
            &DayInputs {
                employee_id: EMP,
                date: d,
                attendance,
                leaves,
                leave_types: &types,
                holidays,
            },
            &WorkWeek::default(),
        )
    }

    // 2026-03-02 is a Monday, 2026-03-01 a Sunday.

    #[test]
    fn plain_workday_is_absent() {
        let view = resolve(date(2026, 3, 2), None, &[], &[]);
        assert_eq!(view.status, DayStatus::Absent);
        assert_eq!(view.details.granular_status, DayStatus::Absent);
    }

    #[test]
    fn weekend_without_anything_else() {
        let view = resolve(date(2026, 3, 1), None, &[], &[]);
        assert_eq!(view.status, DayStatus::Weekend);
    }

    #[test]
    fn approved_leave_outranks_weekend() {
        let sunday = date(2026, 3, 1);
        let leaves = [leave(sunday, sunday, LeaveStatus::Approved)];
        let view = resolve(sunday, None, &leaves, &[]);
        assert_eq!(view.status, DayStatus::OnLeave);
        assert_eq!(view.details.remarks.as_deref(), Some("Casual Leave"));
    }

    #[test]
    fn half_day_leave_is_marked_in_remarks() {
        let monday = date(2026, 3, 2);
        let mut half = leave(monday, monday, LeaveStatus::Approved);
        half.is_half_day = true;
        half.half_day_type = Some(HalfDayType::SecondHalf);
        half.number_of_days = 0.5;

        let view = resolve(monday, None, &[half], &[]);
        assert_eq!(view.status, DayStatus::OnLeave);
        assert_eq!(
            view.details.remarks.as_deref(),
            Some("Casual Leave (Half Day)")
        );
    }

    #[test]
    fn pending_and_foreign_leaves_are_ignored() {
        let monday = date(2026, 3, 2);
        let mut other = leave(monday, monday, LeaveStatus::Approved);
        other.employee_id = EMP + 1;
        let leaves = [leave(monday, monday, LeaveStatus::Pending), other];

        let view = resolve(monday, None, &leaves, &[]);
        assert_eq!(view.status, DayStatus::Absent);
    }

    #[test]
    fn leave_outranks_holiday() {
        let monday = date(2026, 3, 2);
        let leaves = [leave(date(2026, 2, 27), date(2026, 3, 4), LeaveStatus::Approved)];
        let holidays = [holiday(monday, HolidayType::Public, true)];
        let view = resolve(monday, None, &leaves, &holidays);
        assert_eq!(view.status, DayStatus::OnLeave);
    }

    #[test]
    fn holiday_outranks_weekend_and_carries_name() {
        let sunday = date(2026, 3, 1);
        let holidays = [holiday(sunday, HolidayType::Restricted, true)];
        let view = resolve(sunday, None, &[], &holidays);
        assert_eq!(view.status, DayStatus::Holiday);
        assert_eq!(view.details.remarks.as_deref(), Some("Founders Day"));
    }

    #[test]
    fn inactive_holiday_is_ignored() {
        let monday = date(2026, 3, 2);
        let holidays = [holiday(monday, HolidayType::Public, false)];
        let view = resolve(monday, None, &[], &holidays);
        assert_eq!(view.status, DayStatus::Absent);
    }

    #[test]
    fn check_in_outranks_everything() {
        let sunday = date(2026, 3, 1);
        let rec = record(sunday, AttendanceStatus::Present);
        let leaves = [leave(sunday, sunday, LeaveStatus::Approved)];
        let holidays = [holiday(sunday, HolidayType::Public, true)];

        let view = resolve(sunday, Some(&rec), &leaves, &holidays);
        assert_eq!(view.status, DayStatus::Present);
        assert_eq!(view.details.check_in, Some(at(sunday, 9, 0)));
    }

    #[test]
    fn wfh_and_break_outrank_approved_leave() {
        let monday = date(2026, 3, 2);
        let leaves = [leave(monday, monday, LeaveStatus::Approved)];

        for stored in [AttendanceStatus::Wfh, AttendanceStatus::Break] {
            let rec = record(monday, stored);
            let view = resolve(monday, Some(&rec), &leaves, &[]);
            assert_ne!(view.status, DayStatus::OnLeave, "stored {stored}");
        }
    }

    #[test]
    fn stored_status_maps_to_coarse_and_granular() {
        let monday = date(2026, 3, 2);
        let cases = [
            (AttendanceStatus::Present, DayStatus::Present, DayStatus::Present),
            (AttendanceStatus::HalfDay, DayStatus::Present, DayStatus::HalfDay),
            (AttendanceStatus::Wfh, DayStatus::Wfh, DayStatus::Wfh),
            (AttendanceStatus::Break, DayStatus::Break, DayStatus::Break),
            (AttendanceStatus::Absent, DayStatus::Present, DayStatus::Present),
        ];

        for (stored, coarse, granular) in cases {
            let rec = record(monday, stored);
            let view = resolve(monday, Some(&rec), &[], &[]);
            assert_eq!(view.status, coarse, "stored {stored}");
            assert_eq!(view.details.granular_status, granular, "stored {stored}");
        }
    }

    #[test]
    fn record_without_check_in_falls_through() {
        let monday = date(2026, 3, 2);
        let mut rec = record(monday, AttendanceStatus::Present);
        rec.check_in_time = None;
        let leaves = [leave(monday, monday, LeaveStatus::Approved)];

        let view = resolve(monday, Some(&rec), &leaves, &[]);
        assert_eq!(view.status, DayStatus::OnLeave);
    }

    #[test]
    fn custom_work_week() {
        let friday = date(2026, 3, 6);
        let types = leave_types();
        let inputs = DayInputs {
            employee_id: EMP,
            date: friday,
            attendance: None,
            leaves: &[],
            leave_types: &types,
            holidays: &[],
        };

        let week = WorkWeek::new(vec![Weekday::Fri, Weekday::Sat]);
        assert_eq!(resolve_day(&inputs, &week).status, DayStatus::Weekend);
        assert_eq!(
            resolve_day(&inputs, &WorkWeek::default()).status,
            DayStatus::Absent
        );
    }

    #[test]
    fn month_view_folds_every_day() {
        let types = leave_types();
        let records = vec![
            record(date(2026, 3, 2), AttendanceStatus::Present),
            record(date(2026, 3, 3), AttendanceStatus::HalfDay),
            record(date(2026, 3, 4), AttendanceStatus::Wfh),
        ];
        let leaves = vec![leave(date(2026, 3, 5), date(2026, 3, 6), LeaveStatus::Approved)];
        let holidays = vec![holiday(date(2026, 3, 9), HolidayType::Public, true)];

        let view = month_view(
            2026,
            3,
            &MonthInputs {
                employee_id: EMP,
                records: &records,
                leaves: &leaves,
                leave_types: &types,
                holidays: &holidays,
            },
            &WorkWeek::default(),
            date(2026, 3, 31),
        )
        .unwrap();

        assert_eq!(view.days.len(), 31);
        assert_eq!(view.days[&date(2026, 3, 5)].status, DayStatus::OnLeave);
        assert_eq!(
            view.summary,
            StatusCounts {
                present: 1,
                wfh: 1,
                leave: 2,
                holiday: 1,
                half_day: 1,
                // March 2026: 9 weekend days, 22 weekdays
                weekend: 9,
                absent: 22 - 6,
            }
        );
    }

    #[test]
    fn month_view_skips_future_days_in_summary() {
        let types = leave_types();
        let view = month_view(
            2026,
            3,
            &MonthInputs {
                employee_id: EMP,
                records: &[],
                leaves: &[],
                leave_types: &types,
                holidays: &[],
            },
            &WorkWeek::default(),
            date(2026, 3, 3),
        )
        .unwrap();

        assert_eq!(view.days.len(), 31);
        // Sun 1st, Mon 2nd, Tue 3rd
        assert_eq!(view.summary.weekend, 1);
        assert_eq!(view.summary.absent, 2);
    }

    #[test]
    fn month_view_rejects_bad_month() {
        let err = month_view(
            2026,
            13,
            &MonthInputs {
                employee_id: EMP,
                records: &[],
                leaves: &[],
                leave_types: &[],
                holidays: &[],
            },
            &WorkWeek::default(),
            date(2026, 3, 3),
        )
        .unwrap_err();
        assert!(matches!(err, HrError::Validation(_)));
    }

    #[test]
    fn month_bounds_handle_december_and_february() {
        assert_eq!(
            month_bounds(2026, 12).unwrap(),
            (date(2026, 12, 1), date(2026, 12, 31))
        );
        assert_eq!(
            month_bounds(2028, 2).unwrap(),
            (date(2028, 2, 1), date(2028, 2, 29))
        );
    }

    fn employee(id: u64, status: &str) -> Employee {
        Employee {
            id,
            employee_code: format!("EMP-{id}"),
            first_name: "Asha".into(),
            last_name: "Rao".into(),
            email: format!("e{id}@company.com"),
            department_id: 1,
            job_title_id: 1,
            designation: Some("Engineer".into()),
            hire_date: date(2024, 1, 1),
            status: status.into(),
        }
    }

    #[test]
    fn presence_reports_elapsed_and_total_durations() {
        let monday = date(2026, 3, 2);
        let now = at(monday, 12, 30);

        let employees = vec![
            employee(EMP, "active"),
            employee(EMP + 1, "active"),
            employee(EMP + 2, "active"),
            employee(EMP + 3, "inactive"),
        ];

        let still_in = record(monday, AttendanceStatus::Present);
        let mut done = record(monday, AttendanceStatus::HalfDay);
        done.employee_id = EMP + 1;
        done.check_out_time = Some(at(monday, 14, 15));
        done.working_hours = Some(5.25);

        let types = leave_types();
        let view = presence(
            &TeamInputs {
                employees: &employees,
                records: &[still_in, done],
                leaves: &[],
                leave_types: &types,
                holidays: &[],
            },
            &WorkWeek::default(),
            now,
        );

        assert_eq!(view.date, monday);
        assert_eq!(view.members.len(), 3);
        assert_eq!(view.members[0].duration.as_deref(), Some("3h 30m"));
        assert_eq!(view.members[1].duration.as_deref(), Some("5h 15m"));
        assert_eq!(view.members[2].status, DayStatus::Absent);
        assert_eq!(view.members[2].duration, None);
        assert_eq!(view.counts.present, 1);
        assert_eq!(view.counts.half_day, 1);
        assert_eq!(view.counts.absent, 1);
    }

    #[test]
    fn durations_format_hours_and_minutes() {
        assert_eq!(format_duration(Duration::minutes(0)), "0h 00m");
        assert_eq!(format_duration(Duration::minutes(185)), "3h 05m");
        assert_eq!(format_duration(Duration::minutes(-10)), "0h 00m");
    }
}
