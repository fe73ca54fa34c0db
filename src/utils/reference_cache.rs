//! In-memory cache for reference data (leave-type catalog, holidays).
//!
//! Leave requests and attendance are never cached here: balances and day
//! statuses are always derived from fresh rows.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use moka::future::Cache;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;

use crate::model::{holiday::Holiday, leave_type::LeaveType};
use crate::repository::reference;

const TTL: Duration = Duration::from_secs(600);

static LEAVE_TYPES: Lazy<Cache<(), Arc<Vec<LeaveType>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(1)
        .time_to_live(TTL)
        .build()
});

/// Active holidays keyed by calendar year.
static HOLIDAYS: Lazy<Cache<i32, Arc<Vec<Holiday>>>> = Lazy::new(|| {
    Cache::builder()
        .max_capacity(16)
        .time_to_live(TTL)
        .build()
});

/// Full leave-type catalog, including inactive types.
pub async fn leave_types(pool: &MySqlPool) -> Result<Arc<Vec<LeaveType>>, Arc<sqlx::Error>> {
    LEAVE_TYPES
        .try_get_with((), async {
            reference::all_leave_types(pool).await.map(Arc::new)
        })
        .await
}

pub async fn holidays_for_year(
    pool: &MySqlPool,
    year: i32,
) -> Result<Arc<Vec<Holiday>>, Arc<sqlx::Error>> {
    HOLIDAYS
        .try_get_with(year, async move {
            let (from, to) = year_bounds(year);
            reference::active_holidays_between(pool, from, to)
                .await
                .map(Arc::new)
        })
        .await
}

/// Active holidays in `[from, to]`, assembled from the per-year entries.
pub async fn holidays_between(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<Holiday>, Arc<sqlx::Error>> {
    let mut holidays = Vec::new();
    for year in from.year()..=to.year() {
        let cached = holidays_for_year(pool, year).await?;
        holidays.extend(
            cached
                .iter()
                .filter(|h| h.date >= from && h.date <= to)
                .cloned(),
        );
    }
    Ok(holidays)
}

pub fn invalidate_leave_types() {
    LEAVE_TYPES.invalidate_all();
}

pub async fn invalidate_holidays(year: i32) {
    HOLIDAYS.invalidate(&year).await;
}

fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    (
        NaiveDate::from_ymd_opt(year, 1, 1).unwrap_or(NaiveDate::MIN),
        NaiveDate::from_ymd_opt(year, 12, 31).unwrap_or(NaiveDate::MAX),
    )
}

/// Loads the catalog and the given year's holidays ahead of first use.
pub async fn warmup_reference_cache(pool: &MySqlPool, year: i32) -> Result<()> {
    let types = leave_types(pool)
        .await
        .map_err(|e| anyhow::anyhow!("leave types: {e}"))?;
    let holidays = holidays_for_year(pool, year)
        .await
        .map_err(|e| anyhow::anyhow!("holidays: {e}"))?;

    log::info!(
        "Reference cache warmup complete: {} leave types, {} holidays in {}",
        types.len(),
        holidays.len(),
        year
    );

    Ok(())
}
