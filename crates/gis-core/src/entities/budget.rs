use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::BudgetRequestStatus;

/// A request to raise a project's budget, decided once by finance.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct BudgetRequest {
    pub id: String,
    pub project_id: String,
    pub requested_by: String,
    pub requested_amount: f64,
    pub reason: String,
    pub status: BudgetRequestStatus,
    pub approved_amount: Option<f64>,
    pub decision_notes: Option<String>,
    pub reviewed_by: Option<String>,
    pub reviewed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

/// One status change of a budget request.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BudgetRequestStatusHistory {
    pub id: String,
    pub budget_request_id: String,
    pub from_status: BudgetRequestStatus,
    pub to_status: BudgetRequestStatus,
    pub action_by: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}
