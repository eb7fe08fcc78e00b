use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::kind::NotificationType;
use backoffice_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{NotificationRepository, UserRepository};
use crate::domain::types::{Notification, fits_opt, non_blank};
use crate::error::AdminServiceError;

/// Load `id` and make sure it belongs to `user_id`. Another user's
/// notification is reported as missing.
async fn owned<R: NotificationRepository>(
    repo: &R,
    user_id: Uuid,
    id: Uuid,
) -> Result<Notification, AdminServiceError> {
    repo.find_by_id(id)
        .await?
        .filter(|n| n.user_id == user_id)
        .ok_or(AdminServiceError::NotificationNotFound)
}

// ── SendNotification ─────────────────────────────────────────────────────────

pub struct SendNotificationInput {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub notification_type: NotificationType,
    pub link: Option<String>,
}

pub struct SendNotificationUseCase<U: UserRepository, N: NotificationRepository> {
    pub users: U,
    pub notifications: N,
}

impl<U: UserRepository, N: NotificationRepository> SendNotificationUseCase<U, N> {
    /// New notifications always start unread with no `read_at`.
    pub async fn execute(&self, input: SendNotificationInput) -> Result<Notification, AdminServiceError> {
        if !non_blank(&input.title, 255) {
            return Err(AdminServiceError::Invalid("title"));
        }
        if !fits_opt(input.link.as_deref(), 255) {
            return Err(AdminServiceError::Invalid("link"));
        }
        self.users
            .find_by_id(input.user_id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;

        let notification = Notification {
            id: Uuid::now_v7(),
            user_id: input.user_id,
            title: input.title.trim().to_owned(),
            content: input.content,
            notification_type: input.notification_type,
            link: input.link,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
        };
        self.notifications.create(&notification).await?;
        Ok(notification)
    }
}

// ── ListNotifications ────────────────────────────────────────────────────────

pub struct ListNotificationsUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> ListNotificationsUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>, AdminServiceError> {
        self.repo
            .list_for_user(user_id, unread_only, page.clamped())
            .await
    }
}

// ── CountUnread ──────────────────────────────────────────────────────────────

pub struct CountUnreadUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> CountUnreadUseCase<R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<u64, AdminServiceError> {
        self.repo.count_unread(user_id).await
    }
}

// ── MarkRead ─────────────────────────────────────────────────────────────────

pub struct MarkReadUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> MarkReadUseCase<R> {
    /// One-way and idempotent. Marking an already-read notification succeeds
    /// and keeps the original `read_at`.
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<Notification, AdminServiceError> {
        let notification = owned(&self.repo, user_id, id).await?;
        if notification.is_read {
            return Ok(notification);
        }
        self.repo.mark_read(id, Utc::now()).await?;
        owned(&self.repo, user_id, id).await
    }
}

// ── MarkAllRead ──────────────────────────────────────────────────────────────

pub struct MarkAllReadUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> MarkAllReadUseCase<R> {
    /// Returns how many notifications moved from unread to read.
    pub async fn execute(&self, user_id: Uuid) -> Result<u64, AdminServiceError> {
        self.repo.mark_all_read(user_id, Utc::now()).await
    }
}

// ── DeleteNotification ───────────────────────────────────────────────────────

pub struct DeleteNotificationUseCase<R: NotificationRepository> {
    pub repo: R,
}

impl<R: NotificationRepository> DeleteNotificationUseCase<R> {
    pub async fn execute(&self, user_id: Uuid, id: Uuid) -> Result<(), AdminServiceError> {
        owned(&self.repo, user_id, id).await?;
        if !self.repo.delete(id).await? {
            return Err(AdminServiceError::NotificationNotFound);
        }
        Ok(())
    }
}
