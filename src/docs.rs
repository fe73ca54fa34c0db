use crate::api::attendance::{CheckInPayload, CheckOutPayload};
use crate::api::employee::EmployeeListResponse;
use crate::api::leave_request::{DecisionPayload, LeaveFilter, LeaveListResponse};
use crate::api::reference::{CreateHoliday, CreateLeaveType};
use crate::domain::day_resolver::{
    DayDetails, DayStatus, DayStatusView, MonthView, PresenceEntry, PresenceView, StatusCounts,
};
use crate::domain::leave_ledger::{LeaveApplication, LeaveBalanceView, LeaveRequestView};
use crate::model::attendance::AttendanceStatus;
use crate::model::employee::Employee;
use crate::model::holiday::{Holiday, HolidayType};
use crate::model::leave_request::{HalfDayType, LeaveStatus};
use crate::model::leave_type::LeaveType;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HRM Attendance & Leave API",
        version = "1.0.0",
        description = r#"
## Attendance and Leave

Daily attendance, leave requests and the calendar view built on top of them.

### 🔹 Key Features
- **Attendance**
  - Check-in / check-out with lateness and working-hours classification
  - Resolved day status (present, leave, holiday, weekend, absent...) and monthly calendar
  - Team presence for today
- **Leave**
  - Apply, approve/reject (HR/Admin), cancel, and view history
  - Balances per leave type, derived from request history
- **Reference data**
  - Leave-type catalog and holiday calendar
- **Employee directory**

### 🔐 Security
Every endpoint requires a **JWT Bearer** access token.
Approvals and reference-data writes are limited to **Admin** and **HR**.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::today,
        crate::api::attendance::calendar,
        crate::api::attendance::team_presence,

        crate::api::leave_request::leave_list,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::leave_balance,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::cancel_leave,

        crate::api::reference::list_leave_types,
        crate::api::reference::create_leave_type,
        crate::api::reference::list_holidays,
        crate::api::reference::create_holiday,

        crate::api::employee::list_employees,
        crate::api::employee::get_employee
    ),
    components(
        schemas(
            CheckInPayload,
            CheckOutPayload,
            AttendanceStatus,
            DayStatus,
            DayDetails,
            DayStatusView,
            StatusCounts,
            MonthView,
            PresenceEntry,
            PresenceView,
            LeaveApplication,
            LeaveStatus,
            HalfDayType,
            LeaveRequestView,
            LeaveBalanceView,
            LeaveFilter,
            LeaveListResponse,
            DecisionPayload,
            LeaveType,
            CreateLeaveType,
            Holiday,
            HolidayType,
            CreateHoliday,
            Employee,
            EmployeeListResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Attendance", description = "Check-in/out and resolved day status"),
        (name = "Leave", description = "Leave requests and balances"),
        (name = "Reference", description = "Leave types and holidays"),
        (name = "Employee", description = "Employee directory"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
