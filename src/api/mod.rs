use chrono::{Local, NaiveDateTime};
use sqlx::MySqlPool;

use crate::error::{HrError, internal};
use crate::model::employee::Employee;
use crate::repository::employee as employee_repo;

pub mod attendance;
pub mod employee;
pub mod leave_request;
pub mod reference;

/// Wall-clock time in the server's timezone; attendance days follow it.
pub(crate) fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Highest page number a list endpoint accepts.
pub(crate) const MAX_PAGE: u32 = 100_000;
const DEFAULT_PER_PAGE: u32 = 10;
const MAX_PER_PAGE: u32 = 100;

/// A validated 1-based page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Page {
    pub page: u32,
    pub per_page: u32,
    pub offset: u64,
}

impl Page {
    pub(crate) fn from_query(page: Option<u32>, per_page: Option<u32>) -> Result<Self, HrError> {
        let page = page.unwrap_or(1).max(1);
        if page > MAX_PAGE {
            return Err(HrError::validation(format!("page must be at most {MAX_PAGE}")));
        }
        let per_page = per_page.unwrap_or(DEFAULT_PER_PAGE).clamp(1, MAX_PER_PAGE);

        let offset = u64::from(page - 1)
            .checked_mul(u64::from(per_page))
            .ok_or_else(|| HrError::validation("page out of range"))?;

        Ok(Self {
            page,
            per_page,
            offset,
        })
    }
}

/// Missing employees are a 404 rather than an empty month or balance sheet.
pub(crate) async fn existing_employee(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Employee, HrError> {
    let found = employee_repo::find(pool, employee_id)
        .await
        .map_err(|e| internal("Failed to load employee", e))?;
    require_found(found)
}

fn require_found(found: Option<Employee>) -> Result<Employee, HrError> {
    found.ok_or(HrError::NotFound("Employee"))
}
