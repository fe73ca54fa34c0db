//! Leave balances and the leave-request lifecycle.
//!
//! Balances are never stored: every read folds the employee's request
//! history against the leave-type catalog, so they cannot drift from it.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::HrError;
use crate::model::{
    leave_request::{HalfDayType, LeaveDecision, LeaveRequest, LeaveStatus, NewLeaveRequest},
    leave_type::LeaveType,
};

const HALF_DAY: f64 = 0.5;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LeaveApplication {
    #[schema(example = 1)]
    pub leave_type_id: u64,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-04", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[serde(default)]
    #[schema(example = "Family function")]
    pub reason: String,
    #[serde(default)]
    pub is_half_day: bool,
    pub half_day_type: Option<HalfDayType>,
    pub contact_number: Option<String>,
}

/// Span in days, inclusive of both ends. A half-day request is always 0.5.
pub fn number_of_days(from: NaiveDate, to: NaiveDate, is_half_day: bool) -> f64 {
    if is_half_day {
        HALF_DAY
    } else {
        ((to - from).num_days() + 1) as f64
    }
}

pub fn apply(
    employee_id: u64,
    application: LeaveApplication,
    leave_types: &[LeaveType],
) -> Result<NewLeaveRequest, HrError> {
    let reason = application.reason.trim();
    if reason.is_empty() {
        return Err(HrError::validation("Reason is required"));
    }

    if application.from_date > application.to_date {
        return Err(HrError::validation("from_date cannot be after to_date"));
    }

    if !leave_types
        .iter()
        .any(|t| t.id == application.leave_type_id && t.is_active)
    {
        return Err(HrError::validation("Invalid or inactive leave type"));
    }

    Ok(NewLeaveRequest {
        employee_id,
        leave_type_id: application.leave_type_id,
        from_date: application.from_date,
        to_date: application.to_date,
        number_of_days: number_of_days(
            application.from_date,
            application.to_date,
            application.is_half_day,
        ),
        reason: reason.to_string(),
        is_half_day: application.is_half_day,
        half_day_type: application
            .half_day_type
            .filter(|_| application.is_half_day),
        contact_number: application.contact_number,
    })
}

/// Approver decision. Only PENDING requests can be decided.
pub fn decide(
    request: Option<&LeaveRequest>,
    decision: LeaveDecision,
) -> Result<LeaveStatus, HrError> {
    let request = request.ok_or(HrError::NotFound("Leave request"))?;

    if request.status != LeaveStatus::Pending {
        return Err(HrError::AlreadyProcessed);
    }

    Ok(decision.into())
}

/// Requester cancellation. Approved leave can only be withdrawn before it
/// starts.
pub fn cancel(
    request: Option<&LeaveRequest>,
    employee_id: u64,
    today: NaiveDate,
) -> Result<(), HrError> {
    let request = request
        .filter(|r| r.employee_id == employee_id)
        .ok_or(HrError::NotFound("Leave request"))?;

    match request.status {
        LeaveStatus::Pending => Ok(()),
        LeaveStatus::Approved if request.from_date > today => Ok(()),
        LeaveStatus::Approved => Err(HrError::LeaveAlreadyStarted),
        LeaveStatus::Rejected | LeaveStatus::Cancelled => Err(HrError::AlreadyProcessed),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LeaveBalanceView {
    pub leave_type_id: u64,
    #[schema(example = "Casual Leave")]
    pub name: String,
    #[schema(example = "CL")]
    pub code: String,
    pub allocated: f64,
    pub used: f64,
    pub pending: f64,
    pub available: f64,
    /// Always zero for now.
    pub carried_forward: f64,
    /// Always zero for now.
    pub adjustment: f64,
}

/// Per active leave type balances for `employee_id` in `year`.
pub fn balances(
    employee_id: u64,
    year: i32,
    leave_types: &[LeaveType],
    requests: &[LeaveRequest],
) -> Vec<LeaveBalanceView> {
    let (Some(start), Some(end)) = (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) else {
        return Vec::new();
    };

    let total = |leave_type_id: u64, status: LeaveStatus| -> f64 {
        requests
            .iter()
            .filter(|r| {
                r.employee_id == employee_id
                    && r.leave_type_id == leave_type_id
                    && r.status == status
                    && r.overlaps(start, end)
            })
            .map(|r| r.number_of_days)
            .sum()
    };

    leave_types
        .iter()
        .filter(|t| t.is_active)
        .map(|t| {
            let allocated = f64::from(t.days_allowed);
            let carried_forward = 0.0;
            let adjustment = 0.0;
            let used = total(t.id, LeaveStatus::Approved);
            let pending = total(t.id, LeaveStatus::Pending);

            LeaveBalanceView {
                leave_type_id: t.id,
                name: t.name.clone(),
                code: t.code.clone(),
                allocated,
                used,
                pending,
                available: (allocated + carried_forward + adjustment - used).max(0.0),
                carried_forward,
                adjustment,
            }
        })
        .collect()
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LeaveRequestView {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type_id: u64,
    #[schema(example = "Casual Leave")]
    pub leave_type: String,
    #[schema(example = "2026-03-02", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2026-03-04", format = "date", value_type = String)]
    pub to_date: NaiveDate,
    #[schema(example = 3.0)]
    pub number_of_days: f64,
    pub status: LeaveStatus,
    pub reason: String,
    pub is_half_day: bool,
    pub half_day_type: Option<HalfDayType>,
    pub admin_comments: Option<String>,
    #[schema(example = "2026-02-20T10:15:00", format = "date-time", value_type = String)]
    pub applied_on: NaiveDateTime,
}

impl LeaveRequestView {
    pub fn new(request: LeaveRequest, leave_types: &[LeaveType]) -> Self {
        let leave_type = leave_types
            .iter()
            .find(|t| t.id == request.leave_type_id)
            .map(|t| t.name.clone())
            .unwrap_or_default();

        Self {
            id: request.id,
            employee_id: request.employee_id,
            leave_type_id: request.leave_type_id,
            leave_type,
            from_date: request.from_date,
            to_date: request.to_date,
            number_of_days: request.number_of_days,
            status: request.status,
            reason: request.reason,
            is_half_day: request.is_half_day,
            half_day_type: request.half_day_type,
            admin_comments: request.admin_comments,
            applied_on: request.applied_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EMP: u64 = 11;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn catalog() -> Vec<LeaveType> {
        vec![
            LeaveType {
                id: 1,
                name: "Casual Leave".into(),
                code: "CL".into(),
                days_allowed: 12,
                requires_approval: true,
                is_paid: true,
                is_active: true,
            },
            LeaveType {
                id: 2,
                name: "Sabbatical".into(),
                code: "SB".into(),
                days_allowed: 30,
                requires_approval: true,
                is_paid: false,
                is_active: false,
            },
        ]
    }

    fn application(from: NaiveDate, to: NaiveDate) -> LeaveApplication {
        LeaveApplication {
            leave_type_id: 1,
            from_date: from,
            to_date: to,
            reason: "Visiting family".into(),
            is_half_day: false,
            half_day_type: None,
            contact_number: None,
        }
    }

    fn request(
        id: u64,
        from: NaiveDate,
        to: NaiveDate,
        days: f64,
        status: LeaveStatus,
    ) -> LeaveRequest {
        LeaveRequest {
            id,
            employee_id: EMP,
            leave_type_id: 1,
            from_date: from,
            to_date: to,
            number_of_days: days,
            reason: "Visiting family".into(),
            status,
            is_half_day: false,
            half_day_type: None,
            contact_number: None,
            admin_comments: None,
            applied_at: from.and_hms_opt(9, 0, 0).unwrap(),
            decided_at: None,
        }
    }

    #[test]
    fn multi_day_span_counts_both_ends() {
        let new = apply(EMP, application(date(2026, 3, 1), date(2026, 3, 3)), &catalog()).unwrap();
        assert_eq!(new.number_of_days, 3.0);
        assert_eq!(new.employee_id, EMP);
        assert!(!new.is_half_day);
    }

    #[test]
    fn half_day_is_always_half() {
        let mut app = application(date(2026, 3, 1), date(2026, 3, 1));
        app.is_half_day = true;
        app.half_day_type = Some(HalfDayType::FirstHalf);
        app.reason = "x".into();
        let new = apply(EMP, app, &catalog()).unwrap();
        assert_eq!(new.number_of_days, 0.5);
        assert_eq!(new.half_day_type, Some(HalfDayType::FirstHalf));

        let mut wide = application(date(2026, 3, 1), date(2026, 3, 5));
        wide.is_half_day = true;
        assert_eq!(apply(EMP, wide, &catalog()).unwrap().number_of_days, 0.5);
    }

    #[test]
    fn half_day_type_dropped_for_full_days() {
        let mut app = application(date(2026, 3, 2), date(2026, 3, 2));
        app.half_day_type = Some(HalfDayType::SecondHalf);
        assert_eq!(apply(EMP, app, &catalog()).unwrap().half_day_type, None);
    }

    #[test]
    fn blank_reason_is_rejected() {
        let mut app = application(date(2026, 3, 2), date(2026, 3, 2));
        app.reason = "   ".into();
        assert_eq!(
            apply(EMP, app, &catalog()).unwrap_err(),
            HrError::validation("Reason is required")
        );
    }

    #[test]
    fn inverted_range_is_rejected() {
        let app = application(date(2026, 3, 5), date(2026, 3, 2));
        assert!(matches!(
            apply(EMP, app, &catalog()),
            Err(HrError::Validation(_))
        ));
    }

    #[test]
    fn unknown_or_inactive_type_is_rejected() {
        let mut unknown = application(date(2026, 3, 2), date(2026, 3, 2));
        unknown.leave_type_id = 99;
        assert!(matches!(
            apply(EMP, unknown, &catalog()),
            Err(HrError::Validation(_))
        ));

        let mut inactive = application(date(2026, 3, 2), date(2026, 3, 2));
        inactive.leave_type_id = 2;
        assert!(matches!(
            apply(EMP, inactive, &catalog()),
            Err(HrError::Validation(_))
        ));
    }

    #[test]
    fn pending_request_can_be_decided_once() {
        let mut req = request(1, date(2026, 3, 2), date(2026, 3, 2), 1.0, LeaveStatus::Pending);

        let status = decide(Some(&req), LeaveDecision::Approved).unwrap();
        assert_eq!(status, LeaveStatus::Approved);
        req.status = status;

        assert_eq!(
            decide(Some(&req), LeaveDecision::Approved).unwrap_err(),
            HrError::AlreadyProcessed
        );
        assert_eq!(
            decide(Some(&req), LeaveDecision::Rejected).unwrap_err(),
            HrError::AlreadyProcessed
        );
    }

    #[test]
    fn reject_and_missing_request() {
        let req = request(1, date(2026, 3, 2), date(2026, 3, 2), 1.0, LeaveStatus::Pending);
        assert_eq!(
            decide(Some(&req), LeaveDecision::Rejected).unwrap(),
            LeaveStatus::Rejected
        );
        assert_eq!(
            decide(None, LeaveDecision::Approved).unwrap_err(),
            HrError::NotFound("Leave request")
        );
    }

    #[test]
    fn cancellation_rules() {
        let today = date(2026, 3, 10);
        let pending = request(1, date(2026, 3, 2), date(2026, 3, 2), 1.0, LeaveStatus::Pending);
        let future = request(2, date(2026, 3, 12), date(2026, 3, 13), 2.0, LeaveStatus::Approved);
        let started = request(3, date(2026, 3, 10), date(2026, 3, 11), 2.0, LeaveStatus::Approved);
        let rejected = request(4, date(2026, 3, 20), date(2026, 3, 20), 1.0, LeaveStatus::Rejected);
        let cancelled = request(5, date(2026, 3, 20), date(2026, 3, 20), 1.0, LeaveStatus::Cancelled);

        assert_eq!(cancel(Some(&pending), EMP, today), Ok(()));
        assert_eq!(cancel(Some(&future), EMP, today), Ok(()));
        assert_eq!(
            cancel(Some(&started), EMP, today),
            Err(HrError::LeaveAlreadyStarted)
        );
        assert_eq!(
            cancel(Some(&rejected), EMP, today),
            Err(HrError::AlreadyProcessed)
        );
        assert_eq!(
            cancel(Some(&cancelled), EMP, today),
            Err(HrError::AlreadyProcessed)
        );
    }

    #[test]
    fn only_the_requester_can_cancel() {
        let pending = request(1, date(2026, 3, 2), date(2026, 3, 2), 1.0, LeaveStatus::Pending);
        assert_eq!(
            cancel(Some(&pending), EMP + 1, date(2026, 3, 1)),
            Err(HrError::NotFound("Leave request"))
        );
    }

    #[test]
    fn balance_counts_used_and_pending_separately() {
        let mut requests = vec![request(
            1,
            date(2026, 2, 2),
            date(2026, 2, 6),
            5.0,
            LeaveStatus::Approved,
        )];

        let view = balances(EMP, 2026, &catalog(), &requests);
        assert_eq!(view.len(), 1, "inactive types are not listed");
        assert_eq!(view[0].allocated, 12.0);
        assert_eq!(view[0].used, 5.0);
        assert_eq!(view[0].available, 7.0);
        assert_eq!(view[0].pending, 0.0);

        requests.push(request(
            2,
            date(2026, 4, 1),
            date(2026, 4, 3),
            3.0,
            LeaveStatus::Pending,
        ));

        let view = balances(EMP, 2026, &catalog(), &requests);
        assert_eq!(view[0].pending, 3.0);
        assert_eq!(view[0].used, 5.0);
        assert_eq!(view[0].available, 7.0);
    }

    #[test]
    fn overdrawn_balance_clamps_to_zero() {
        let requests = vec![request(
            1,
            date(2026, 5, 4),
            date(2026, 5, 22),
            15.0,
            LeaveStatus::Approved,
        )];

        let view = balances(EMP, 2026, &catalog(), &requests);
        assert_eq!(view[0].used, 15.0);
        assert_eq!(view[0].available, 0.0);
    }

    #[test]
    fn balance_ignores_other_years_statuses_and_employees() {
        let mut foreign = request(5, date(2026, 6, 1), date(2026, 6, 1), 1.0, LeaveStatus::Approved);
        foreign.employee_id = EMP + 1;

        let requests = vec![
            request(1, date(2025, 6, 2), date(2025, 6, 3), 2.0, LeaveStatus::Approved),
            request(2, date(2026, 6, 2), date(2026, 6, 3), 2.0, LeaveStatus::Rejected),
            request(3, date(2026, 6, 8), date(2026, 6, 9), 2.0, LeaveStatus::Cancelled),
            // straddles the new year, counts in full for both years
            request(4, date(2025, 12, 31), date(2026, 1, 1), 2.0, LeaveStatus::Approved),
            foreign,
        ];

        let view = balances(EMP, 2026, &catalog(), &requests);
        assert_eq!(view[0].used, 2.0);
        assert_eq!(view[0].pending, 0.0);

        let previous = balances(EMP, 2025, &catalog(), &requests);
        assert_eq!(previous[0].used, 4.0);
    }

    #[test]
    fn request_view_resolves_type_name() {
        let req = request(9, date(2026, 3, 2), date(2026, 3, 4), 3.0, LeaveStatus::Pending);
        let view = LeaveRequestView::new(req, &catalog());
        assert_eq!(view.leave_type, "Casual Leave");
        assert_eq!(view.number_of_days, 3.0);
        assert_eq!(view.applied_on, date(2026, 3, 2).and_hms_opt(9, 0, 0).unwrap());
    }
}
