//! Gateway authentication in front of the router.

use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::{HeaderValue, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};

use backoffice_auth_types::identity::USER_ID_HEADER;
use backoffice_auth_types::token::validate_access_token;
use backoffice_core::error::AppError;

/// HS256 secret shared with the token issuer.
#[derive(Clone)]
pub struct TokenSecret(pub Arc<str>);

/// Turn a bearer token into the verified-principal header.
///
/// Any client-supplied `x-backoffice-user-id` is dropped first. A request with
/// no `Authorization` header continues unauthenticated; a malformed, expired
/// or forged token is rejected with 401.
pub async fn authenticate(
    State(secret): State<TokenSecret>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    request.headers_mut().remove(USER_ID_HEADER);

    if request.headers().contains_key(AUTHORIZATION) {
        let bearer = request
            .headers()
            .typed_get::<Authorization<Bearer>>()
            .ok_or(AppError::Unauthorized)?;
        let user_id = validate_access_token(bearer.token(), &secret.0).map_err(|e| {
            tracing::debug!(error = %e, "rejected access token");
            AppError::Unauthorized
        })?;
        let value = HeaderValue::from_str(&user_id.to_string())
            .map_err(|e| AppError::Internal(e.into()))?;
        request.headers_mut().insert(USER_ID_HEADER, value);
    }

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::{Router, http::StatusCode, middleware::from_fn_with_state, routing::get};
    use axum_test::TestServer;
    use uuid::Uuid;

    use backoffice_auth_types::identity::IdentityHeaders;
    use backoffice_auth_types::token::issue_access_token;
    use backoffice_testing::auth::MockAuth;

    const SECRET: &str = "middleware-test-secret";

    async fn whoami(identity: IdentityHeaders) -> String {
        identity.user_id.to_string()
    }

    fn server() -> TestServer {
        let router = Router::new()
            .route("/whoami", get(whoami))
            .route("/public", get(|| async { "ok" }))
            .layer(from_fn_with_state(TokenSecret(Arc::from(SECRET)), authenticate));
        TestServer::new(router).unwrap()
    }

    fn far_future() -> u64 {
        4_102_444_800 // 2100-01-01
    }

    fn bearer(token: &str) -> HeaderValue {
        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    #[tokio::test]
    async fn should_inject_user_id_from_valid_token() {
        let user_id = Uuid::now_v7();
        let token = issue_access_token(user_id, far_future(), SECRET).unwrap();

        let response = server()
            .get("/whoami")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), user_id.to_string());
    }

    #[tokio::test]
    async fn should_strip_spoofed_identity_header() {
        let (name, value) = MockAuth::new(Uuid::now_v7()).header();

        let response = server().get("/whoami").add_header(name, value).await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_replace_spoofed_header_with_token_subject() {
        let user_id = Uuid::now_v7();
        let token = issue_access_token(user_id, far_future(), SECRET).unwrap();
        let (name, value) = MockAuth::new(Uuid::now_v7()).header();

        let response = server()
            .get("/whoami")
            .add_header(AUTHORIZATION, bearer(&token))
            .add_header(name, value)
            .await;

        response.assert_status_ok();
        assert_eq!(response.text(), user_id.to_string());
    }

    #[tokio::test]
    async fn should_reject_token_signed_with_other_secret() {
        let token = issue_access_token(Uuid::now_v7(), far_future(), "other-secret").unwrap();

        let response = server()
            .get("/public")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
        let body: serde_json::Value = response.json();
        assert_eq!(body["kind"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn should_reject_expired_token() {
        let token = issue_access_token(Uuid::now_v7(), 1_000_000, SECRET).unwrap();

        let response = server()
            .get("/whoami")
            .add_header(AUTHORIZATION, bearer(&token))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_reject_non_bearer_scheme() {
        let response = server()
            .get("/public")
            .add_header(AUTHORIZATION, HeaderValue::from_static("Basic YWRtaW46YWRtaW4="))
            .await;

        response.assert_status(StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn should_let_anonymous_requests_through() {
        let response = server().get("/public").await;

        response.assert_status_ok();
        assert_eq!(response.text(), "ok");
    }
}
