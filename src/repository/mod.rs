//! SQL access. Every function is a single statement; the rules that decide
//! what to write live in `crate::domain`.

pub mod attendance;
pub mod employee;
pub mod leave;
pub mod reference;

/// MySQL reports both duplicate keys and missing parents as SQLSTATE 23000;
/// the driver's error kind tells them apart by error number.
pub fn is_duplicate_key(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}

pub fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_foreign_key_violation(),
        _ => false,
    }
}
