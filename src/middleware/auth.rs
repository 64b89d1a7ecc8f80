use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::validate_jwt;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller, resolved from the bearer token and the users table
#[derive(Clone, Debug)]
pub struct AuthUser {
    pub user_id: i64,
    pub username: String,
    pub is_staff: bool,
}

/// Validates the bearer token, confirms the user is still active, and
/// injects `AuthUser` into request extensions
pub async fn jwt_auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_jwt_from_headers(&headers).map_err(ApiError::unauthorized)?;
    let claims = validate_jwt(&token, &state.config.security.jwt_secret)?;

    let user = state.store.find_user(claims.user_id).await?;
    let user = match user {
        Some(user) if user.is_active => user,
        _ => {
            tracing::warn!(
                "User validation failed: user '{}' (ID: {}) not found or inactive",
                claims.username,
                claims.user_id
            );
            return Err(ApiError::forbidden(format!("User '{}' is not active", claims.username)));
        }
    };

    if user.username != claims.username {
        tracing::warn!(
            "User validation failed: token user '{}' doesn't match stored username '{}'",
            claims.username,
            user.username
        );
        return Err(ApiError::forbidden("User authentication mismatch"));
    }

    tracing::debug!("Authenticated {} (ID: {}, staff: {})", user.username, user.id, user.is_staff);

    request.extensions_mut().insert(AuthUser {
        user_id: user.id,
        username: user.username,
        is_staff: user.is_staff,
    });

    Ok(next.run(request).await)
}

/// Extract JWT token from Authorization header
fn extract_jwt_from_headers(headers: &HeaderMap) -> Result<String, String> {
    let auth_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or_else(|| "Missing Authorization header".to_string())?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| "Invalid Authorization header format".to_string())?;

    if let Some(token) = auth_str.strip_prefix("Bearer ") {
        if token.trim().is_empty() {
            return Err("Empty JWT token".to_string());
        }
        Ok(token.trim().to_string())
    } else {
        Err("Authorization header must use Bearer token format".to_string())
    }
}
