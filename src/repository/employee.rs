use sqlx::MySqlPool;
use tracing::debug;

use crate::model::employee::Employee;

const SELECT: &str = r#"
    SELECT e.id, e.employee_code, e.first_name, e.last_name, e.email,
           e.department_id, e.job_title_id, jt.title AS designation,
           e.hire_date, e.status
    FROM employees e
    LEFT JOIN job_titles jt ON jt.id = e.job_title_id
"#;

pub async fn find(pool: &MySqlPool, id: u64) -> Result<Option<Employee>, sqlx::Error> {
    let sql = format!("{SELECT} WHERE e.id = ?");

    sqlx::query_as::<_, Employee>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn list_active(pool: &MySqlPool) -> Result<Vec<Employee>, sqlx::Error> {
    let sql = format!("{SELECT} WHERE e.status = 'active' ORDER BY e.first_name, e.last_name");

    sqlx::query_as::<_, Employee>(&sql).fetch_all(pool).await
}

/// Directory filters; all optional.
#[derive(Debug, Default)]
pub struct EmployeeFilter<'a> {
    pub department_id: Option<u64>,
    pub job_title_id: Option<u64>,
    pub status: Option<&'a str>,
    pub search: Option<&'a str>,
}

enum Bind<'a> {
    U64(u64),
    Str(&'a str),
    Owned(String),
}

pub async fn search(
    pool: &MySqlPool,
    filter: &EmployeeFilter<'_>,
    limit: u32,
    offset: u64,
) -> Result<(i64, Vec<Employee>), sqlx::Error> {
    let mut conditions = Vec::new();
    let mut binds: Vec<Bind> = Vec::new();

    if let Some(department_id) = filter.department_id {
        conditions.push("e.department_id = ?");
        binds.push(Bind::U64(department_id));
    }

    if let Some(job_title_id) = filter.job_title_id {
        conditions.push("e.job_title_id = ?");
        binds.push(Bind::U64(job_title_id));
    }

    if let Some(status) = filter.status {
        conditions.push("e.status = ?");
        binds.push(Bind::Str(status));
    }

    if let Some(search) = filter.search {
        conditions.push("(e.first_name LIKE ? OR e.last_name LIKE ? OR e.email LIKE ?)");
        let like = format!("%{search}%");
        binds.push(Bind::Owned(like.clone()));
        binds.push(Bind::Owned(like.clone()));
        binds.push(Bind::Owned(like));
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", conditions.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM employees e{where_clause}");
    debug!(sql = %count_sql, "Counting employees");

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for b in &binds {
        count_q = match b {
            Bind::U64(v) => count_q.bind(*v),
            Bind::Str(s) => count_q.bind(*s),
            Bind::Owned(s) => count_q.bind(s.as_str()),
        };
    }
    let total = count_q.fetch_one(pool).await?;

    let data_sql = format!("{SELECT}{where_clause} ORDER BY e.id DESC LIMIT ? OFFSET ?");
    debug!(sql = %data_sql, limit, offset, "Fetching employees");

    let mut data_q = sqlx::query_as::<_, Employee>(&data_sql);
    for b in &binds {
        data_q = match b {
            Bind::U64(v) => data_q.bind(*v),
            Bind::Str(s) => data_q.bind(*s),
            Bind::Owned(s) => data_q.bind(s.as_str()),
        };
    }
    let rows = data_q.bind(limit).bind(offset).fetch_all(pool).await?;

    Ok((total, rows))
}
