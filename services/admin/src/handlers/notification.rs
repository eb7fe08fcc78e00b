use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::kind::NotificationType;
use backoffice_domain::pagination::{Page, PageRequest};
use backoffice_domain::permission::codes;

use crate::domain::types::Notification;
use crate::error::AdminServiceError;
use crate::handlers::require_permission;
use crate::state::AppState;
use crate::usecase::notification::{
    CountUnreadUseCase, DeleteNotificationUseCase, ListNotificationsUseCase, MarkAllReadUseCase,
    MarkReadUseCase, SendNotificationInput, SendNotificationUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct NotificationResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type")]
    pub notification_type: NotificationType,
    pub link: Option<String>,
    pub is_read: bool,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms_opt")]
    pub read_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Notification> for NotificationResponse {
    fn from(notification: Notification) -> Self {
        Self {
            id: notification.id,
            user_id: notification.user_id,
            title: notification.title,
            content: notification.content,
            notification_type: notification.notification_type,
            link: notification.link,
            is_read: notification.is_read,
            read_at: notification.read_at,
            created_at: notification.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct CountResponse {
    pub count: u64,
}

// ── POST /notifications ──────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SendNotificationRequest {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    #[serde(rename = "type", default = "default_type")]
    pub notification_type: NotificationType,
    pub link: Option<String>,
}

fn default_type() -> NotificationType {
    NotificationType::Info
}

pub async fn send_notification(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<SendNotificationRequest>,
) -> Result<(StatusCode, Json<NotificationResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::NOTIFICATION_SEND).await?;
    let usecase = SendNotificationUseCase {
        users: state.user_repo(),
        notifications: state.notification_repo(),
    };
    let notification = usecase
        .execute(SendNotificationInput {
            user_id: body.user_id,
            title: body.title,
            content: body.content,
            notification_type: body.notification_type,
            link: body.link,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(notification.into())))
}

// ── GET /notifications/@me ───────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct NotificationListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    #[serde(default)]
    pub unread_only: bool,
}

pub async fn get_my_notifications(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<NotificationListQuery>,
) -> Result<Json<Page<NotificationResponse>>, AdminServiceError> {
    let usecase = ListNotificationsUseCase {
        repo: state.notification_repo(),
    };
    let page = usecase
        .execute(
            identity.user_id,
            query.unread_only,
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(page.map(NotificationResponse::from)))
}

// ── GET /notifications/@me/unread-count ──────────────────────────────────────

pub async fn get_my_unread_count(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AdminServiceError> {
    let usecase = CountUnreadUseCase {
        repo: state.notification_repo(),
    };
    let count = usecase.execute(identity.user_id).await?;
    Ok(Json(CountResponse { count }))
}

// ── PATCH /notifications/@me/{id}/read ───────────────────────────────────────

pub async fn mark_my_notification_read(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<NotificationResponse>, AdminServiceError> {
    let usecase = MarkReadUseCase {
        repo: state.notification_repo(),
    };
    let notification = usecase.execute(identity.user_id, id).await?;
    Ok(Json(notification.into()))
}

// ── PATCH /notifications/@me/read-all ────────────────────────────────────────

/// Responds with the number of notifications that changed from unread to read.
pub async fn mark_all_my_notifications_read(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<CountResponse>, AdminServiceError> {
    let usecase = MarkAllReadUseCase {
        repo: state.notification_repo(),
    };
    let count = usecase.execute(identity.user_id).await?;
    Ok(Json(CountResponse { count }))
}

// ── DELETE /notifications/@me/{id} ───────────────────────────────────────────

pub async fn delete_my_notification(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    let usecase = DeleteNotificationUseCase {
        repo: state.notification_repo(),
    };
    usecase.execute(identity.user_id, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
