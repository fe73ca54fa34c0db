use crate::{
    api::{existing_employee, local_now},
    auth::auth::AuthUser,
    config::Config,
    domain::{
        attendance::{self as rules, CheckInDetails},
        day_resolver::{
            DayInputs, DayStatusView, MonthInputs, PresenceView, TeamInputs,
            month_bounds, month_view, presence, resolve_day,
        },
    },
    error::{HrError, internal},
    repository::{self, attendance as attendance_repo, employee as employee_repo, leave as leave_repo},
    utils::reference_cache,
};
use actix_web::{HttpRequest, HttpResponse, Responder, web};
use chrono::Datelike;
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckInPayload {
    #[schema(example = "Traffic on the ring road")]
    pub late_reason: Option<String>,
    #[schema(example = "Payroll revamp")]
    pub project: Option<String>,
    /// Opaque location string from the client, e.g. "23.81,90.41".
    pub location: Option<String>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CheckOutPayload {
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    /// Defaults to the current year
    pub year: Option<i32>,
    /// 1-12, defaults to the current month
    pub month: Option<u32>,
    /// HR/Admin only when not the caller's own id
    pub employee_id: Option<u64>,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body(content = CheckInPayload, description = "Optional check-in context"),
    responses(
        (status = 200, description = "Checked in successfully", body = Object, example = json!({
            "message": "Checked in successfully",
            "is_late": false
        })),
        (status = 404, description = "Employee not found"),
        (status = 409, description = "Already checked in today", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    auth: AuthUser,
    req: HttpRequest,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    payload: Option<web::Json<CheckInPayload>>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let now = local_now();

    let existing = attendance_repo::find_for_day(pool.get_ref(), employee_id, now.date())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to load today's attendance");
            HrError::Internal
        })?;

    let payload = payload.map(web::Json::into_inner).unwrap_or_default();
    let ip = req
        .connection_info()
        .realip_remote_addr()
        .map(str::to_string);

    let record = rules::check_in(
        employee_id,
        existing.as_ref(),
        now,
        &config.attendance_policy(),
        CheckInDetails {
            ip,
            location: payload.location,
            late_reason: payload.late_reason,
            project: payload.project,
        },
    )?;

    match attendance_repo::insert(pool.get_ref(), &record).await {
        Ok(id) => {
            info!(employee_id, id, is_late = record.is_late, "Checked in");
            Ok(HttpResponse::Ok().json(json!({
                "message": "Checked in successfully",
                "id": id,
                "check_in_time": record.check_in_time,
                "is_late": record.is_late
            })))
        }
        // Lost the race against a concurrent check-in.
        Err(e) if repository::is_duplicate_key(&e) => Err(HrError::AlreadyCheckedIn.into()),
        // The linked employee row is gone.
        Err(e) if repository::is_foreign_key_violation(&e) => {
            Err(HrError::NotFound("Employee").into())
        }
        Err(e) => {
            error!(error = %e, employee_id, "Check-in failed");
            Err(HrError::Internal.into())
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-out",
    request_body(content = CheckOutPayload, description = "Optional check-out context"),
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully",
            "working_hours": 9.0,
            "status": "PRESENT"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 409, description = "Already checked out today", body = Object, example = json!({
            "message": "Already checked out today"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal server error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: Option<web::Json<CheckOutPayload>>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let now = local_now();

    let existing = attendance_repo::find_for_day(pool.get_ref(), employee_id, now.date())
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Failed to load today's attendance");
            HrError::Internal
        })?;

    let location = payload.and_then(|p| p.into_inner().location);
    let update = rules::check_out(existing.as_ref(), now, location)?;

    let applied = attendance_repo::apply_check_out(pool.get_ref(), &update)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, "Check-out failed");
            HrError::Internal
        })?;

    if !applied {
        return Err(HrError::AlreadyCheckedOut.into());
    }

    info!(employee_id, working_hours = update.working_hours, status = %update.status, "Checked out");

    Ok(HttpResponse::Ok().json(json!({
        "message": "Checked out successfully",
        "check_out_time": update.check_out_time,
        "working_hours": update.working_hours,
        "status": update.status
    })))
}

/// Caller's resolved status for today
#[utoipa::path(
    get,
    path = "/api/attendance/today",
    responses(
        (status = 200, description = "Today's status", body = DayStatusView),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn today(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let employee_id = auth.require_employee()?;
    let date = local_now().date();
    let pool = pool.get_ref();
    existing_employee(pool, employee_id).await?;

    let attendance = attendance_repo::find_for_day(pool, employee_id, date)
        .await
        .map_err(|e| internal("Failed to load attendance", e))?;
    let leaves = leave_repo::list_for_employee(pool, employee_id)
        .await
        .map_err(|e| internal("Failed to load leave requests", e))?;
    let leave_types = reference_cache::leave_types(pool)
        .await
        .map_err(|e| internal("Failed to load leave types", e))?;
    let holidays = reference_cache::holidays_between(pool, date, date)
        .await
        .map_err(|e| internal("Failed to load holidays", e))?;

    let view: DayStatusView = resolve_day(
        &DayInputs {
            employee_id,
            date,
            attendance: attendance.as_ref(),
            leaves: &leaves,
            leave_types: &leave_types,
            holidays: &holidays,
        },
        &config.work_week(),
    );

    Ok(HttpResponse::Ok().json(view))
}

/// Monthly calendar with per-day status and summary counts
#[utoipa::path(
    get,
    path = "/api/attendance/calendar",
    params(CalendarQuery),
    responses(
        (status = 200, description = "Month view", body = MonthView),
        (status = 400, description = "Invalid year/month"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Employee not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn calendar(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<CalendarQuery>,
) -> actix_web::Result<impl Responder> {
    let employee_id = match query.employee_id {
        Some(id) => id,
        None => auth.require_employee()?,
    };
    if !auth.can_view_employee(employee_id) {
        return Err(actix_web::error::ErrorForbidden("HR/Admin only"));
    }

    let today = local_now().date();
    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());
    let (first, last) = month_bounds(year, month)?;
    let pool = pool.get_ref();
    existing_employee(pool, employee_id).await?;

    let records = attendance_repo::list_for_range(pool, employee_id, first, last)
        .await
        .map_err(|e| {
            error!(error = %e, employee_id, year, month, "Failed to load month attendance");
            HrError::Internal
        })?;
    let leaves = leave_repo::list_for_employee(pool, employee_id)
        .await
        .map_err(|e| internal("Failed to load leave requests", e))?;
    let leave_types = reference_cache::leave_types(pool)
        .await
        .map_err(|e| internal("Failed to load leave types", e))?;
    let holidays = reference_cache::holidays_between(pool, first, last)
        .await
        .map_err(|e| internal("Failed to load holidays", e))?;

    let view = month_view(
        year,
        month,
        &MonthInputs {
            employee_id,
            records: &records,
            leaves: &leaves,
            leave_types: &leave_types,
            holidays: &holidays,
        },
        &config.work_week(),
        today,
    )?;

    Ok(HttpResponse::Ok().json(view))
}

/// Virtual office: who is in, out, on leave right now
#[utoipa::path(
    get,
    path = "/api/attendance/presence",
    responses(
        (status = 200, description = "Team presence for today", body = PresenceView),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn team_presence(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
) -> actix_web::Result<impl Responder> {
    let now = local_now();
    let date = now.date();
    let pool = pool.get_ref();

    let employees = employee_repo::list_active(pool)
        .await
        .map_err(|e| internal("Failed to load employees", e))?;
    let records = attendance_repo::list_for_day(pool, date)
        .await
        .map_err(|e| internal("Failed to load attendance", e))?;
    let leaves = leave_repo::list_approved_between(pool, date, date)
        .await
        .map_err(|e| internal("Failed to load approved leave", e))?;
    let leave_types = reference_cache::leave_types(pool)
        .await
        .map_err(|e| internal("Failed to load leave types", e))?;
    let holidays = reference_cache::holidays_between(pool, date, date)
        .await
        .map_err(|e| internal("Failed to load holidays", e))?;

    let view: PresenceView = presence(
        &TeamInputs {
            employees: &employees,
            records: &records,
            leaves: &leaves,
            leave_types: &leave_types,
            holidays: &holidays,
        },
        &config.work_week(),
        now,
    );

    Ok(HttpResponse::Ok().json(view))
}
