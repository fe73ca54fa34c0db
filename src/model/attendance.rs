use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

/// Raw status stored on an attendance row.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AttendanceStatus {
    Present,
    HalfDay,
    Absent,
    Wfh,
    Break,
}

string_column!(AttendanceStatus);

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct AttendanceRecord {
    pub id: u64,
    pub employee_id: u64,
    pub date: NaiveDate,
    pub check_in_time: Option<NaiveDateTime>,
    pub check_out_time: Option<NaiveDateTime>,
    pub status: AttendanceStatus,
    pub working_hours: Option<f64>,
    pub check_in_ip: Option<String>,
    pub check_in_location: Option<String>,
    pub check_out_location: Option<String>,
    pub is_late: bool,
    pub late_reason: Option<String>,
    pub project: Option<String>,
}

/// A record about to be inserted by a check-in.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAttendance {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub check_in_time: NaiveDateTime,
    pub status: AttendanceStatus,
    pub check_in_ip: Option<String>,
    pub check_in_location: Option<String>,
    pub is_late: bool,
    pub late_reason: Option<String>,
    pub project: Option<String>,
}

/// Fields written to an existing record by a check-out.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckOut {
    pub record_id: u64,
    pub check_out_time: NaiveDateTime,
    pub check_out_location: Option<String>,
    pub working_hours: f64,
    pub status: AttendanceStatus,
}
