use axum::http::StatusCode;

/// Liveness check for `GET /healthz`. Services provide their own
/// `readyz` that checks their backing stores.
pub async fn healthz() -> StatusCode {
    StatusCode::OK
}
