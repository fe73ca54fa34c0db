pub mod attendance;
pub mod day_resolver;
pub mod leave_ledger;
