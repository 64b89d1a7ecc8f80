use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Extension, Path, State,
    },
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};

use crate::database::models::{ServiceTicket, TicketAssignment};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

use super::check_mutation_access;

#[derive(Debug, Deserialize)]
pub struct EmployeeRef {
    pub id: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTicket {
    pub employee: EmployeeRef,
    /// Key is required; `null` clears the completion date
    #[serde(deserialize_with = "required_nullable")]
    pub date_completed: Option<NaiveDate>,
}

// With `deserialize_with`, serde reports a missing key instead of defaulting to None
fn required_nullable<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<NaiveDate>::deserialize(deserializer)
}

/// GET /service-tickets/:id - Get a single ticket by ID
pub async fn get(State(state): State<AppState>, path: Result<Path<i64>, PathRejection>) -> ApiResult<ServiceTicket> {
    let Path(id) = path?;
    let ticket = state.store.get_ticket(id).await?;
    Ok(ApiResponse::success(ticket))
}

/// PUT /service-tickets/:id - Assign an employee and set the completion date
pub async fn put(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<UpdateTicket>, JsonRejection>,
) -> ApiResult<()> {
    let Path(id) = path?;
    check_mutation_access(&state, &auth_user, "update", id)?;
    let Json(body) = payload?;

    let ticket = state.store.get_ticket(id).await?;
    let employee = state.store.get_employee(body.employee.id).await?;

    state
        .store
        .assign_ticket(
            ticket.id,
            TicketAssignment {
                employee_id: employee.id,
                date_completed: body.date_completed,
            },
        )
        .await?;

    tracing::info!(
        "Service ticket {} assigned to employee {} (completed: {:?}) by '{}'",
        ticket.id,
        employee.id,
        body.date_completed,
        auth_user.username
    );
    Ok(ApiResponse::no_content())
}

/// DELETE /service-tickets/:id - Delete a ticket by ID
pub async fn delete(
    State(state): State<AppState>,
    path: Result<Path<i64>, PathRejection>,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<()> {
    let Path(id) = path?;
    check_mutation_access(&state, &auth_user, "delete", id)?;

    state.store.delete_ticket(id).await?;

    tracing::info!("Service ticket {} deleted by '{}'", id, auth_user.username);
    Ok(ApiResponse::no_content())
}
