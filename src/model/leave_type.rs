use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
#[schema(example = json!({
    "id": 1,
    "name": "Casual Leave",
    "code": "CL",
    "days_allowed": 12,
    "requires_approval": true,
    "is_paid": true,
    "is_active": true
}))]
pub struct LeaveType {
    pub id: u64,
    pub name: String,
    pub code: String,
    /// Default annual allocation.
    pub days_allowed: u32,
    pub requires_approval: bool,
    pub is_paid: bool,
    pub is_active: bool,
}
