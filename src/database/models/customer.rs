use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Customer as exposed on the wire: `{id, address, full_name}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Customer {
    pub id: i64,
    #[serde(skip_serializing, default)]
    pub user_id: i64,
    pub address: String,
    pub full_name: String,
}
