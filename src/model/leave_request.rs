use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

string_column!(LeaveStatus);

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum HalfDayType {
    FirstHalf,
    SecondHalf,
}

string_column!(HalfDayType);

/// Outcome an approver can set on a pending request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeaveDecision {
    Approved,
    Rejected,
}

impl From<LeaveDecision> for LeaveStatus {
    fn from(decision: LeaveDecision) -> Self {
        match decision {
            LeaveDecision::Approved => LeaveStatus::Approved,
            LeaveDecision::Rejected => LeaveStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct LeaveRequest {
    pub id: u64,
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub number_of_days: f64,
    pub reason: String,
    pub status: LeaveStatus,
    pub is_half_day: bool,
    pub half_day_type: Option<HalfDayType>,
    pub contact_number: Option<String>,
    pub admin_comments: Option<String>,
    pub applied_at: NaiveDateTime,
    pub decided_at: Option<NaiveDateTime>,
}

impl LeaveRequest {
    pub fn covers(&self, date: NaiveDate) -> bool {
        self.from_date <= date && date <= self.to_date
    }

    pub fn overlaps(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.from_date <= end && self.to_date >= start
    }
}

/// A validated application, ready to be stored as PENDING.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLeaveRequest {
    pub employee_id: u64,
    pub leave_type_id: u64,
    pub from_date: NaiveDate,
    pub to_date: NaiveDate,
    pub number_of_days: f64,
    pub reason: String,
    pub is_half_day: bool,
    pub half_day_type: Option<HalfDayType>,
    pub contact_number: Option<String>,
}
