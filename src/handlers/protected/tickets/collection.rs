use axum::{
    extract::{rejection::JsonRejection, Extension, RawQuery, State},
    Json,
};
use serde::Deserialize;

use crate::database::models::{NewTicket, ServiceTicket, StatusFilter};
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTicket {
    pub description: String,
    pub emergency: bool,
}

/// GET /service-tickets - List tickets visible to the caller
pub async fn get(
    State(state): State<AppState>,
    RawQuery(query): RawQuery,
    Extension(auth_user): Extension<AuthUser>,
) -> ApiResult<Vec<ServiceTicket>> {
    // Customers only ever see resolved tickets
    let filter = if auth_user.is_staff {
        let status = status_param(query.as_deref());
        StatusFilter::from_query(status.as_deref()).map_err(|e| ApiError::bad_request(e.to_string()))?
    } else {
        StatusFilter::Done
    };

    let tickets = state.store.list_tickets(filter).await?;
    Ok(ApiResponse::success(tickets))
}

/// Last `status` value in the query string; a repeated key takes the final one
fn status_param(query: Option<&str>) -> Option<String> {
    url::form_urlencoded::parse(query?.as_bytes())
        .filter(|(key, _)| key == "status")
        .last()
        .map(|(_, value)| value.into_owned())
}

/// POST /service-tickets - File a ticket as the calling customer
pub async fn post(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    payload: Result<Json<CreateTicket>, JsonRejection>,
) -> ApiResult<ServiceTicket> {
    let Json(body) = payload?;

    let customer = state
        .store
        .customer_for_user(auth_user.user_id)
        .await?
        .ok_or_else(|| {
            tracing::warn!("User '{}' has no customer record; ticket rejected", auth_user.username);
            ApiError::forbidden("Only customers can file service tickets")
        })?;

    let ticket = state
        .store
        .create_ticket(NewTicket {
            customer_id: customer.id,
            description: body.description,
            emergency: body.emergency,
        })
        .await?;

    tracing::info!("Customer {} filed service ticket {}", customer.id, ticket.id);
    Ok(ApiResponse::created(ticket))
}
