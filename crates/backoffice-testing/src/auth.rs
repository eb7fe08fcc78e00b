//! Mock identity helpers for integration tests.
//!
//! Services trust the `x-backoffice-user-id` header injected by the
//! authentication layer. `MockAuth` builds that header directly so tests need
//! neither a token nor the layer itself.

use axum::http::{HeaderName, HeaderValue};
use uuid::Uuid;

use backoffice_auth_types::identity::USER_ID_HEADER;

/// Identity injected into test requests.
pub struct MockAuth {
    pub user_id: Uuid,
}

impl MockAuth {
    pub fn new(user_id: Uuid) -> Self {
        Self { user_id }
    }

    /// The identity header as the authentication layer would inject it.
    pub fn header(&self) -> (HeaderName, HeaderValue) {
        (
            HeaderName::from_static(USER_ID_HEADER),
            HeaderValue::from_str(&self.user_id.to_string()).unwrap(),
        )
    }
}
