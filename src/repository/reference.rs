use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::{
    holiday::{Holiday, HolidayType},
    leave_type::LeaveType,
};

/// Every leave type, active or not; inactive ones are still needed to name
/// historical requests.
pub async fn all_leave_types(pool: &MySqlPool) -> Result<Vec<LeaveType>, sqlx::Error> {
    sqlx::query_as::<_, LeaveType>(
        r#"
        SELECT id, name, code, days_allowed, requires_approval, is_paid, is_active
        FROM leave_types
        ORDER BY name
        "#,
    )
    .fetch_all(pool)
    .await
}

pub async fn insert_leave_type(
    pool: &MySqlPool,
    name: &str,
    code: &str,
    days_allowed: u32,
    requires_approval: bool,
    is_paid: bool,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO leave_types (name, code, days_allowed, requires_approval, is_paid, is_active)
        VALUES (?, ?, ?, ?, ?, TRUE)
        "#,
    )
    .bind(name)
    .bind(code)
    .bind(days_allowed)
    .bind(requires_approval)
    .bind(is_paid)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn active_holidays_between(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Holiday>, sqlx::Error> {
    sqlx::query_as::<_, Holiday>(
        r#"
        SELECT id, date, name, holiday_type, is_active
        FROM holidays
        WHERE is_active = TRUE
        AND date BETWEEN ? AND ?
        ORDER BY date
        "#,
    )
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

pub async fn insert_holiday(
    pool: &MySqlPool,
    date: NaiveDate,
    name: &str,
    holiday_type: HolidayType,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO holidays (date, name, holiday_type, is_active)
        VALUES (?, ?, ?, TRUE)
        "#,
    )
    .bind(date)
    .bind(name)
    .bind(holiday_type)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}
