use chrono::NaiveDate;
use sqlx::MySqlPool;

use crate::model::attendance::{AttendanceRecord, CheckOut, NewAttendance};

const COLUMNS: &str = r#"
    id, employee_id, date, check_in_time, check_out_time, status, working_hours,
    check_in_ip, check_in_location, check_out_location, is_late, late_reason, project
"#;

pub async fn find_for_day(
    pool: &MySqlPool,
    employee_id: u64,
    date: NaiveDate,
) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM attendance WHERE employee_id = ? AND date = ?");

    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(date)
        .fetch_optional(pool)
        .await
}

pub async fn list_for_range(
    pool: &MySqlPool,
    employee_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let sql = format!(
        "SELECT {COLUMNS} FROM attendance WHERE employee_id = ? AND date BETWEEN ? AND ? ORDER BY date"
    );

    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(employee_id)
        .bind(from)
        .bind(to)
        .fetch_all(pool)
        .await
}

/// All employees' records for one day.
pub async fn list_for_day(
    pool: &MySqlPool,
    date: NaiveDate,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    let sql = format!("SELECT {COLUMNS} FROM attendance WHERE date = ?");

    sqlx::query_as::<_, AttendanceRecord>(&sql)
        .bind(date)
        .fetch_all(pool)
        .await
}

/// Fails with an integrity violation when the employee already has a row
/// for that date (`UNIQUE (employee_id, date)`).
pub async fn insert(pool: &MySqlPool, record: &NewAttendance) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO attendance
            (employee_id, date, check_in_time, status, check_in_ip,
             check_in_location, is_late, late_reason, project)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(record.employee_id)
    .bind(record.date)
    .bind(record.check_in_time)
    .bind(record.status)
    .bind(&record.check_in_ip)
    .bind(&record.check_in_location)
    .bind(record.is_late)
    .bind(&record.late_reason)
    .bind(&record.project)
    .execute(pool)
    .await?;

    Ok(result.last_insert_id())
}

/// Returns false when another request checked out first.
pub async fn apply_check_out(pool: &MySqlPool, check_out: &CheckOut) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET check_out_time = ?, check_out_location = ?, working_hours = ?, status = ?
        WHERE id = ?
        AND check_out_time IS NULL
        "#,
    )
    .bind(check_out.check_out_time)
    .bind(&check_out.check_out_location)
    .bind(check_out.working_hours)
    .bind(check_out.status)
    .bind(check_out.record_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() == 1)
}
