use anyhow::{Context, Result, anyhow};
use chrono::{Duration, NaiveTime, Weekday};
use dotenvy::dotenv;
use std::env;

use crate::domain::{attendance::AttendancePolicy, day_resolver::WorkWeek};

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub server_addr: String,

    // Rate limiting
    pub rate_protected_per_min: u32,

    pub api_prefix: String,

    // Logging
    pub log_dir: String,
    pub log_level: tracing::Level,

    // Attendance rules
    pub weekend_days: Vec<Weekday>,
    pub office_start: NaiveTime,
    pub late_grace_minutes: i64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: required("SERVER_ADDR")?,
            database_url: required("DATABASE_URL")?,
            jwt_secret: required("JWT_SECRET")?,

            rate_protected_per_min: parsed("RATE_PROTECTED_PER_MIN", "1000")?,

            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            log_dir: env::var("LOG_DIR").unwrap_or_else(|_| "logs".to_string()),
            log_level: parsed("LOG_LEVEL", "debug")?,

            weekend_days: parse_weekend_days(
                &env::var("WEEKEND_DAYS").unwrap_or_else(|_| "Sat,Sun".to_string()),
            )?,
            office_start: parse_office_start(
                &env::var("OFFICE_START_TIME").unwrap_or_else(|_| "09:30".to_string()),
            )?,
            late_grace_minutes: parsed("LATE_GRACE_MINUTES", "15")?,
        })
    }

    pub fn work_week(&self) -> WorkWeek {
        WorkWeek::new(self.weekend_days.clone())
    }

    pub fn attendance_policy(&self) -> AttendancePolicy {
        AttendancePolicy {
            office_start: self.office_start,
            late_grace: Duration::minutes(self.late_grace_minutes),
        }
    }
}

fn required(key: &str) -> Result<String> {
    env::var(key).with_context(|| format!("{key} must be set"))
}

fn parsed<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw = env::var(key).unwrap_or_else(|_| default.to_string());
    raw.parse::<T>()
        .map_err(|e| anyhow!("{key}={raw} is invalid: {e}"))
}

/// Comma-separated weekday names, e.g. `Sat,Sun` or `friday, saturday`.
/// An empty value means no weekend.
pub fn parse_weekend_days(raw: &str) -> Result<Vec<Weekday>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<Weekday>()
                .map_err(|_| anyhow!("WEEKEND_DAYS: unknown weekday {s:?}"))
        })
        .collect()
}

pub fn parse_office_start(raw: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .with_context(|| format!("OFFICE_START_TIME={raw} is not HH:MM"))
}
