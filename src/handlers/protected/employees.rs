use axum::extract::{rejection::PathRejection, Path, State};

use crate::database::models::Employee;
use crate::middleware::{ApiResponse, ApiResult};
use crate::state::AppState;

/// GET /employees - List employees available for assignment
pub async fn list(State(state): State<AppState>) -> ApiResult<Vec<Employee>> {
    Ok(ApiResponse::success(state.store.list_employees().await?))
}

/// GET /employees/:id - Get a single employee by ID
pub async fn get(State(state): State<AppState>, path: Result<Path<i64>, PathRejection>) -> ApiResult<Employee> {
    let Path(id) = path?;
    Ok(ApiResponse::success(state.store.get_employee(id).await?))
}
