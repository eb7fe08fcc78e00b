pub mod alert_rule;
pub mod auth;
pub mod dictionary;
pub mod email_template;
pub mod health;
pub mod menu;
pub mod metric;
pub mod notification;
pub mod permission;
pub mod role;
pub mod user;

use serde::{Deserialize, Deserializer};

use backoffice_auth_types::identity::IdentityHeaders;

use crate::error::AdminServiceError;
use crate::state::AppState;

/// Resolve the caller's authorization and require `code`.
pub(crate) async fn require_permission(
    state: &AppState,
    identity: &IdentityHeaders,
    code: &str,
) -> Result<(), AdminServiceError> {
    state.resolver().require(identity.user_id, code).await?;
    Ok(())
}

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`)
/// in PATCH bodies. Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, T, D>(de: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(de).map(Some)
}
