pub mod collection;
pub mod record;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::state::AppState;

// Re-export handler functions for use in routing
pub use collection::get as ticket_list;
pub use collection::post as ticket_create;
pub use record::delete as ticket_delete;
pub use record::get as ticket_get;
pub use record::put as ticket_update;

/// Staff gate for ticket mutations. Enforced only when configured; otherwise
/// a non-staff mutation goes through and is logged.
fn check_mutation_access(state: &AppState, auth_user: &AuthUser, action: &str, id: i64) -> Result<(), ApiError> {
    if auth_user.is_staff {
        return Ok(());
    }

    if state.config.security.enforce_staff_mutations {
        tracing::warn!("Rejected {} of service ticket {} by non-staff user '{}'", action, id, auth_user.username);
        return Err(ApiError::forbidden(format!("Only staff can {} service tickets", action)));
    }

    tracing::warn!("Non-staff user '{}' performing {} on service ticket {}", auth_user.username, action, id);
    Ok(())
}
