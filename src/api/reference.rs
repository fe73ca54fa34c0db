use crate::{
    api::local_now,
    auth::auth::AuthUser,
    error::{HrError, internal},
    model::{
        holiday::HolidayType,
        leave_type::LeaveType,
    },
    repository::{self, reference},
    utils::reference_cache,
};
use actix_web::{HttpResponse, Responder, web};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;
use serde_json::json;
use sqlx::MySqlPool;
use tracing::{error, info};
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeaveType {
    #[schema(example = "Casual Leave")]
    pub name: String,
    #[schema(example = "CL")]
    pub code: String,
    #[schema(example = 12)]
    pub days_allowed: u32,
    #[serde(default = "default_true")]
    pub requires_approval: bool,
    #[serde(default = "default_true")]
    pub is_paid: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "2026-01-26", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "Republic Day")]
    pub name: String,
    #[serde(default = "default_holiday_type")]
    pub holiday_type: HolidayType,
}

fn default_holiday_type() -> HolidayType {
    HolidayType::Public
}

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct HolidayQuery {
    /// Defaults to the current year
    pub year: Option<i32>,
}

/// Active leave types
#[utoipa::path(
    get,
    path = "/api/leave-types",
    responses(
        (status = 200, description = "Active leave-type catalog", body = Vec<LeaveType>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reference"
)]
pub async fn list_leave_types(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
) -> actix_web::Result<impl Responder> {
    let catalog = reference_cache::leave_types(pool.get_ref())
        .await
        .map_err(|e| internal("Failed to load leave types", e))?;

    let active: Vec<&LeaveType> = catalog.iter().filter(|t| t.is_active).collect();

    Ok(HttpResponse::Ok().json(active))
}

/// Create leave type (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/leave-types",
    request_body = CreateLeaveType,
    responses(
        (status = 201, description = "Leave type created", body = Object, example = json!({
            "message": "Leave type created",
            "id": 3
        })),
        (status = 400, description = "Invalid payload or duplicate code"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reference"
)]
pub async fn create_leave_type(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateLeaveType>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let name = payload.name.trim();
    let code = payload.code.trim().to_uppercase();
    if name.is_empty() || code.is_empty() {
        return Err(HrError::validation("name and code are required").into());
    }

    let id = match reference::insert_leave_type(
        pool.get_ref(),
        name,
        &code,
        payload.days_allowed,
        payload.requires_approval,
        payload.is_paid,
    )
    .await
    {
        Ok(id) => id,
        Err(e) if repository::is_duplicate_key(&e) => {
            return Err(HrError::validation(format!("Leave type code {code} already exists")).into());
        }
        Err(e) => {
            error!(error = %e, code = %code, "Failed to create leave type");
            return Err(HrError::Internal.into());
        }
    };

    reference_cache::invalidate_leave_types();
    info!(id, code = %code, created_by = auth.user_id, "Leave type created");

    Ok(HttpResponse::Created().json(json!({
        "message": "Leave type created",
        "id": id
    })))
}

/// Active holidays in a year
#[utoipa::path(
    get,
    path = "/api/holidays",
    params(HolidayQuery),
    responses(
        (status = 200, description = "Holidays for the year, by date", body = Vec<Holiday>),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reference"
)]
pub async fn list_holidays(
    _auth: AuthUser,
    pool: web::Data<MySqlPool>,
    query: web::Query<HolidayQuery>,
) -> actix_web::Result<impl Responder> {
    let year = query.year.unwrap_or_else(|| local_now().year());

    let holidays = reference_cache::holidays_for_year(pool.get_ref(), year)
        .await
        .map_err(|e| internal("Failed to load holidays", e))?;

    Ok(HttpResponse::Ok().json(holidays.as_slice()))
}

/// Create holiday (HR/Admin)
#[utoipa::path(
    post,
    path = "/api/holidays",
    request_body = CreateHoliday,
    responses(
        (status = 201, description = "Holiday created", body = Object, example = json!({
            "message": "Holiday created",
            "id": 9
        })),
        (status = 400, description = "Invalid payload or date already a holiday"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Reference"
)]
pub async fn create_holiday(
    auth: AuthUser,
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    auth.require_hr_or_admin()?;

    let name = payload.name.trim();
    if name.is_empty() {
        return Err(HrError::validation("name is required").into());
    }

    let id = match reference::insert_holiday(pool.get_ref(), payload.date, name, payload.holiday_type)
        .await
    {
        Ok(id) => id,
        Err(e) if repository::is_duplicate_key(&e) => {
            return Err(
                HrError::validation(format!("{} is already a holiday", payload.date)).into(),
            );
        }
        Err(e) => {
            error!(error = %e, date = %payload.date, "Failed to create holiday");
            return Err(HrError::Internal.into());
        }
    };

    reference_cache::invalidate_holidays(payload.date.year()).await;
    info!(id, date = %payload.date, created_by = auth.user_id, "Holiday created");

    Ok(HttpResponse::Created().json(json!({
        "message": "Holiday created",
        "id": id
    })))
}
