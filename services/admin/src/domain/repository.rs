#![allow(async_fn_in_trait)]

use chrono::{DateTime, Utc};
use uuid::Uuid;

use backoffice_domain::kind::UserStatus;
use backoffice_domain::pagination::{Page, PageRequest};

use crate::domain::types::{
    AlertRule, Dictionary, EmailTemplate, Menu, MetricQuery, MonitorMetric, Notification,
    Permission, Role, User,
};
use crate::error::AdminServiceError;

/// Repository for back-office accounts. Soft-deleted rows are invisible.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AdminServiceError>;
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AdminServiceError>;
    async fn list(
        &self,
        status: Option<UserStatus>,
        page: PageRequest,
    ) -> Result<Page<User>, AdminServiceError>;
    /// Fails with `UsernameTaken` if a live account already uses the username.
    async fn create(&self, user: &User) -> Result<(), AdminServiceError>;
    async fn update(&self, user: &User) -> Result<(), AdminServiceError>;
    /// Returns `true` if a live row was tombstoned.
    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AdminServiceError>;
}

/// Repository for roles. Lookups take `include_deleted` so restore can find
/// tombstoned rows; every other path passes `false`.
pub trait RoleRepository: Send + Sync {
    async fn find_by_id(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<Role>, AdminServiceError>;
    /// Live (non-deleted) role with this name, if any.
    async fn find_live_by_name(&self, name: &str) -> Result<Option<Role>, AdminServiceError>;
    /// Live (non-deleted) role with this code, if any.
    async fn find_live_by_code(&self, code: &str) -> Result<Option<Role>, AdminServiceError>;
    /// Ordered by `sort` then `name`.
    async fn list(&self, include_deleted: bool) -> Result<Vec<Role>, AdminServiceError>;
    /// Live roles granted to the user, any status.
    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, AdminServiceError>;
    async fn create(&self, role: &Role) -> Result<(), AdminServiceError>;
    /// Write every column of `role`, including status and tombstone.
    async fn update(&self, role: &Role) -> Result<(), AdminServiceError>;
}

pub trait PermissionRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Permission>, AdminServiceError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<Permission>, AdminServiceError>;
    async fn list(&self) -> Result<Vec<Permission>, AdminServiceError>;
    async fn list_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, AdminServiceError>;
    /// Distinct permission codes granted to any of `role_ids`.
    async fn codes_for_roles(&self, role_ids: &[Uuid]) -> Result<Vec<String>, AdminServiceError>;
    async fn create(&self, permission: &Permission) -> Result<(), AdminServiceError>;
    async fn update(&self, permission: &Permission) -> Result<(), AdminServiceError>;
    /// Hard delete; role grants go with it. Returns `true` if a row was deleted.
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}

pub trait MenuRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Menu>, AdminServiceError>;
    async fn list(&self) -> Result<Vec<Menu>, AdminServiceError>;
    /// Distinct menus granted to any of `role_ids`, any status.
    async fn list_for_roles(&self, role_ids: &[Uuid]) -> Result<Vec<Menu>, AdminServiceError>;
    async fn has_children(&self, id: Uuid) -> Result<bool, AdminServiceError>;
    /// `create` and `update` check `menu.parent_id` against the stored tree
    /// and write under one lock on it. An unknown parent fails with
    /// `MenuNotFound`; a parent that is `menu` or one of its descendants
    /// fails with `MenuCycle`.
    async fn create(&self, menu: &Menu) -> Result<(), AdminServiceError>;
    async fn update(&self, menu: &Menu) -> Result<(), AdminServiceError>;
    /// Fails with `MenuHasChildren` if another menu still points at this one.
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}

/// Join-table writes. Grants are idempotent: inserting an existing pair
/// succeeds and returns `false`. Revokes return `true` if a row was removed.
pub trait GrantRepository: Send + Sync {
    async fn grant_user_role(&self, user_id: Uuid, role_id: Uuid)
    -> Result<bool, AdminServiceError>;
    async fn revoke_user_role(
        &self,
        user_id: Uuid,
        role_id: Uuid,
    ) -> Result<bool, AdminServiceError>;
    async fn grant_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, AdminServiceError>;
    async fn revoke_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, AdminServiceError>;
    async fn grant_role_menu(&self, role_id: Uuid, menu_id: Uuid)
    -> Result<bool, AdminServiceError>;
    async fn revoke_role_menu(
        &self,
        role_id: Uuid,
        menu_id: Uuid,
    ) -> Result<bool, AdminServiceError>;
}

pub trait NotificationRepository: Send + Sync {
    async fn create(&self, notification: &Notification) -> Result<(), AdminServiceError>;
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AdminServiceError>;
    /// Newest first.
    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>, AdminServiceError>;
    async fn count_unread(&self, user_id: Uuid) -> Result<u64, AdminServiceError>;
    /// Flip an unread notification to read. Returns `false` (and leaves
    /// `read_at` alone) if it was already read.
    async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AdminServiceError>;
    /// Returns the number of notifications that transitioned.
    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>)
    -> Result<u64, AdminServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}

pub trait DictionaryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dictionary>, AdminServiceError>;
    async fn find_by_code(
        &self,
        dict_type: &str,
        dict_code: &str,
    ) -> Result<Option<Dictionary>, AdminServiceError>;
    /// Ordered by type, then `sort`, then code.
    async fn list(&self, dict_type: Option<&str>) -> Result<Vec<Dictionary>, AdminServiceError>;
    /// Whether any entry of `dict_type` names `dict_code` as its parent.
    async fn is_parent(&self, dict_type: &str, dict_code: &str) -> Result<bool, AdminServiceError>;
    async fn create(&self, entry: &Dictionary) -> Result<(), AdminServiceError>;
    async fn update(&self, entry: &Dictionary) -> Result<(), AdminServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}

/// Append-only metric store: no update or delete path.
pub trait MetricRepository: Send + Sync {
    async fn insert_batch(&self, metrics: &[MonitorMetric]) -> Result<(), AdminServiceError>;
    /// Newest first.
    async fn query(
        &self,
        query: &MetricQuery,
        page: PageRequest,
    ) -> Result<Page<MonitorMetric>, AdminServiceError>;
}

pub trait AlertRuleRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlertRule>, AdminServiceError>;
    async fn list(&self) -> Result<Vec<AlertRule>, AdminServiceError>;
    async fn list_enabled(&self) -> Result<Vec<AlertRule>, AdminServiceError>;
    async fn create(&self, rule: &AlertRule) -> Result<(), AdminServiceError>;
    async fn update(&self, rule: &AlertRule) -> Result<(), AdminServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}

pub trait EmailTemplateRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmailTemplate>, AdminServiceError>;
    async fn find_by_code(&self, code: &str) -> Result<Option<EmailTemplate>, AdminServiceError>;
    async fn list(&self) -> Result<Vec<EmailTemplate>, AdminServiceError>;
    async fn create(&self, template: &EmailTemplate) -> Result<(), AdminServiceError>;
    async fn update(&self, template: &EmailTemplate) -> Result<(), AdminServiceError>;
    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError>;
}
