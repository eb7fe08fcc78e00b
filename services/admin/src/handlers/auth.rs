use axum::{Json, extract::State};

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::permission::Authorization;

use crate::error::AdminServiceError;
use crate::state::AppState;

// ── GET /auth/me ─────────────────────────────────────────────────────────────

/// The caller's roles, permission codes and menu forest.
///
/// A caller whose account was deleted after the token was issued is 401.
pub async fn get_me(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Authorization>, AdminServiceError> {
    match state.resolver().execute(identity.user_id).await {
        Ok(authorization) => Ok(Json(authorization)),
        Err(AdminServiceError::UserNotFound) => Err(AdminServiceError::Unauthorized),
        Err(e) => Err(e),
    }
}
