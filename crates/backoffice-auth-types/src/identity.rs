//! Verified-principal header extractor.

use axum::extract::FromRequestParts;
use http::request::Parts;
use uuid::Uuid;

use backoffice_core::error::AppError;

/// Header carrying the verified user id. Set by the authentication layer, which
/// strips any client-supplied value first.
pub const USER_ID_HEADER: &str = "x-backoffice-user-id";

/// Authenticated principal taken from [`USER_ID_HEADER`].
///
/// Rejects with 401 if the header is absent or not a UUID. Permission checks
/// (403) happen in handlers after extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityHeaders {
    pub user_id: Uuid,
}

impl<S> FromRequestParts<S> for IdentityHeaders
where
    S: Send + Sync,
{
    type Rejection = AppError;

    // Read the header synchronously and hand back a 'static future; an
    // `async fn` here would capture `parts` and trip E0195.
    fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> impl std::future::Future<Output = Result<Self, Self::Rejection>> + Send {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<Uuid>().ok());

        async move {
            let user_id = user_id.ok_or(AppError::Unauthorized)?;
            Ok(Self { user_id })
        }
    }
}
