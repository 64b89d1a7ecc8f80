use axum::extract::{rejection::PathRejection, Path, State};

use crate::database::models::Customer;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /customers - List customers
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Customer>> {
    Ok(ApiResponse::success(state.store.list_customers().await?))
}

/// GET /customers/:id - Get a single customer by ID
pub async fn get(State(state): State<AppState>, path: Result<Path<i64>, PathRejection>) -> ApiResult<Customer> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.store.get_customer(id).await?))
}
