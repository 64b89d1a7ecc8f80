use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Employee as exposed on the wire: `{id, specialty, full_name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Employee {
    pub id: i64,
    #[serde(skip_serializing, default)]
    pub user_id: i64,
    pub specialty: String,
    pub full_name: String,
}
