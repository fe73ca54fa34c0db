use chrono::{NaiveDate, NaiveDateTime};
use sqlx::MySqlPool;

use crate::model::leave_request::{LeaveRequest, LeaveStatus, NewLeaveRequest};

const COLUMNS: &str = r#"
    id, employee_id, leave_type_id, from_date, to_date, number_of_days, reason, status,
    is_half_day, half_day_type, contact_number, admin_comments, applied_at, decided_at
"#;

pub async fn insert(
    pool: &MySqlPool,
    request: &NewLeaveRequest,
    applied_at: NaiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO leave_requests
            (employee_id, leave_type_id, from_date, to_date, number_of_days, reason,
             status, is_half_day, half_day_type, contact_number, applied_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(request.employee_id)
    .bind(request.leave_type_id)
    .bind(request.from_date)
    .bind(request.to_date)
    .bind(request.number_of_days)
    .bind(&request.reason)
    .bind(LeaveStatus::Pending)
    .bind(request.is_half_day)
    .bind(request.half_day_type)
    .bind(&request.contact_number)
    .bind(applied_at)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

pub async fn find(pool: &MySqlPool, id: u64) -> Result<Option<LeaveRequest>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM leave_requests WHERE id = ?");

    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Vec<LeaveRequest>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM leave_requests WHERE employee_id = ? ORDER BY applied_at DESC"
    );

    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(employee_id)
        .fetch_all(pool)
        .await
}

/// Approved requests of any employee overlapping `[from, to]`.
pub async fn list_approved_between(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<LeaveRequest>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM leave_requests WHERE status = ? AND from_date <= ? AND to_date >= ?"
    );

    sqlx::query_as::<_, LeaveRequest>(&sql)
        .bind(LeaveStatus::Approved)
        .bind(to)
        .bind(from)
        .fetch_all(pool)
        .await
}

/// Paginated search, newest first. Returns the total match count alongside
/// the page.
pub async fn search(
    pool: &MySqlPool,
    employee_id: Option<u64>,
    status: Option<LeaveStatus>,
    limit: u64,
    offset: u64,
) -> Result<(i64, Vec<LeaveRequest>), sqlx::Error> {
    let mut where_sql = String::from(" WHERE 1=1");
    if employee_id.is_some() {
        where_sql.push_str(" AND employee_id = ?");
    }
    if status.is_some() {
        where_sql.push_str(" AND status = ?");
    }

    let count_sql = format!("SELECT COUNT(*) FROM leave_requests{where_sql}");
    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    if let Some(id) = employee_id {
        count_q = count_q.bind(id);
    }
    if let Some(status) = status {
        count_q = count_q.bind(status);
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!(
        "SELECT {COLUMNS} FROM leave_requests{where_sql} ORDER BY applied_at DESC LIMIT ? OFFSET ?"
    );
    let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
    if let Some(id) = employee_id {
        data_q = data_q.bind(id);
    }
    if let Some(status) = status {
        data_q = data_q.bind(status);
    }
    let rows = data_q.bind(limit).bind(offset).fetch_all(pool).await?;

    Ok((total, rows))
}

/// Compare-and-swap on PENDING. Returns false if the request was decided
/// (or removed) since it was read.
pub async fn set_decision(
    pool: &MySqlPool,
    id: u64,
    status: LeaveStatus,
    admin_comments: Option<&str>,
    decided_at: NaiveDateTime,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?, admin_comments = ?, decided_at = ?
        WHERE id = ?
        AND status = ?
        "#,
    )
    .bind(status)
    .bind(admin_comments)
    .bind(decided_at)
    .bind(id)
    .bind(LeaveStatus::Pending)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}

/// Compare-and-swap cancellation guarded by the same rule as
/// `domain::leave_ledger::cancel`.
pub async fn cancel(
    pool: &MySqlPool,
    id: u64,
    employee_id: u64,
    today: NaiveDate,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE leave_requests
        SET status = ?
        WHERE id = ?
        AND employee_id = ?
        AND (status = ? OR (status = ? AND from_date > ?))
        "#,
    )
    .bind(LeaveStatus::Cancelled)
    .bind(id)
    .bind(employee_id)
    .bind(LeaveStatus::Pending)
    .bind(LeaveStatus::Approved)
    .bind(today)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
