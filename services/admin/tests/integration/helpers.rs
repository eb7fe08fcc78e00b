use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use uuid::Uuid;

use backoffice_admin::domain::repository::{
    AlertRuleRepository, GrantRepository, MenuRepository, MetricRepository,
    NotificationRepository, PermissionRepository, RoleRepository, UserRepository,
};
use backoffice_admin::domain::types::{
    AlertRule, Menu, MetricQuery, MonitorMetric, Notification, Permission, Role, User,
};
use backoffice_admin::error::AdminServiceError;
use backoffice_admin::usecase::authorization::ResolveAuthorizationUseCase;
use backoffice_domain::kind::{MenuType, RoleStatus, Toggle, UserStatus};
use backoffice_domain::menu_tree::check_parent;
use backoffice_domain::pagination::{Page, PageRequest};

// ── MemoryStore ──────────────────────────────────────────────────────────────

/// Rows of every table the use cases under test touch. Join tables are sets
/// of `(left, right)` pairs, mirroring the composite unique indexes.
#[derive(Default)]
pub struct Tables {
    pub users: Vec<User>,
    pub roles: Vec<Role>,
    pub permissions: Vec<Permission>,
    pub menus: Vec<Menu>,
    pub user_roles: BTreeSet<(Uuid, Uuid)>,
    pub role_permissions: BTreeSet<(Uuid, Uuid)>,
    pub role_menus: BTreeSet<(Uuid, Uuid)>,
    pub notifications: Vec<Notification>,
    pub metrics: Vec<MonitorMetric>,
    pub alert_rules: Vec<AlertRule>,
}

/// In-memory stand-in for the database. Clones share the same tables, so one
/// store can back every repository parameter of a use case.
#[derive(Clone, Default)]
pub struct MemoryStore {
    pub tables: Arc<Mutex<Tables>>,
}

fn paged<T: Clone>(rows: Vec<T>, page: PageRequest) -> Page<T> {
    let total = rows.len() as u64;
    let items = rows
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit() as usize)
        .collect();
    Page::new(items, total, page)
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) -> Uuid {
        let id = user.id;
        self.tables.lock().unwrap().users.push(user);
        id
    }

    pub fn insert_role(&self, role: Role) -> Uuid {
        let id = role.id;
        self.tables.lock().unwrap().roles.push(role);
        id
    }

    pub fn insert_permission(&self, permission: Permission) -> Uuid {
        let id = permission.id;
        self.tables.lock().unwrap().permissions.push(permission);
        id
    }

    pub fn insert_menu(&self, menu: Menu) -> Uuid {
        let id = menu.id;
        self.tables.lock().unwrap().menus.push(menu);
        id
    }

    pub fn link_user_role(&self, user_id: Uuid, role_id: Uuid) {
        self.tables
            .lock()
            .unwrap()
            .user_roles
            .insert((user_id, role_id));
    }

    pub fn link_role_permission(&self, role_id: Uuid, permission_id: Uuid) {
        self.tables
            .lock()
            .unwrap()
            .role_permissions
            .insert((role_id, permission_id));
    }

    pub fn link_role_menu(&self, role_id: Uuid, menu_id: Uuid) {
        self.tables
            .lock()
            .unwrap()
            .role_menus
            .insert((role_id, menu_id));
    }

    pub fn role(&self, id: Uuid) -> Role {
        self.tables
            .lock()
            .unwrap()
            .roles
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .unwrap()
    }

    pub fn set_role_status(&self, id: Uuid, status: RoleStatus) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(role) = tables.roles.iter_mut().find(|r| r.id == id) {
            role.status = status;
        }
    }

    pub fn set_menu_status(&self, id: Uuid, status: Toggle) {
        let mut tables = self.tables.lock().unwrap();
        if let Some(menu) = tables.menus.iter_mut().find(|m| m.id == id) {
            menu.status = status;
        }
    }

    pub fn grant_counts(&self) -> (usize, usize, usize) {
        let tables = self.tables.lock().unwrap();
        (
            tables.user_roles.len(),
            tables.role_permissions.len(),
            tables.role_menus.len(),
        )
    }

    pub fn metric_count(&self) -> usize {
        self.tables.lock().unwrap().metrics.len()
    }
}

impl UserRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.id == id && u.deleted_at.is_none())
            .cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .users
            .iter()
            .find(|u| u.username == username && u.deleted_at.is_none())
            .cloned())
    }

    async fn list(
        &self,
        status: Option<UserStatus>,
        page: PageRequest,
    ) -> Result<Page<User>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<User> = tables
            .users
            .iter()
            .filter(|u| u.deleted_at.is_none())
            .filter(|u| status.is_none_or(|s| u.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(paged(rows, page))
    }

    async fn create(&self, user: &User) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables
            .users
            .iter()
            .any(|u| u.username == user.username && u.deleted_at.is_none())
        {
            return Err(AdminServiceError::UsernameTaken);
        }
        tables.users.push(user.clone());
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables.users.iter_mut().find(|u| u.id == user.id) {
            *row = user.clone();
        }
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        match tables
            .users
            .iter_mut()
            .find(|u| u.id == id && u.deleted_at.is_none())
        {
            Some(user) => {
                user.deleted_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

impl RoleRepository for MemoryStore {
    async fn find_by_id(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<Role>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .roles
            .iter()
            .find(|r| r.id == id && (include_deleted || r.deleted_at.is_none()))
            .cloned())
    }

    async fn find_live_by_name(&self, name: &str) -> Result<Option<Role>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .roles
            .iter()
            .find(|r| r.name == name && r.deleted_at.is_none())
            .cloned())
    }

    async fn find_live_by_code(&self, code: &str) -> Result<Option<Role>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .roles
            .iter()
            .find(|r| r.code == code && r.deleted_at.is_none())
            .cloned())
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Role>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Role> = tables
            .roles
            .iter()
            .filter(|r| include_deleted || r.deleted_at.is_none())
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.name.cmp(&b.name)));
        Ok(rows)
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .roles
            .iter()
            .filter(|r| r.deleted_at.is_none() && tables.user_roles.contains(&(user_id, r.id)))
            .cloned()
            .collect())
    }

    async fn create(&self, role: &Role) -> Result<(), AdminServiceError> {
        self.tables.lock().unwrap().roles.push(role.clone());
        Ok(())
    }

    async fn update(&self, role: &Role) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables.roles.iter_mut().find(|r| r.id == role.id) {
            *row = role.clone();
        }
        Ok(())
    }
}

impl PermissionRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Permission>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.permissions.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Permission>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.permissions.iter().find(|p| p.code == code).cloned())
    }

    async fn list(&self) -> Result<Vec<Permission>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut rows = tables.permissions.clone();
        rows.sort_by(|a, b| a.code.cmp(&b.code));
        Ok(rows)
    }

    async fn list_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .permissions
            .iter()
            .filter(|p| tables.role_permissions.contains(&(role_id, p.id)))
            .cloned()
            .collect())
    }

    async fn codes_for_roles(&self, role_ids: &[Uuid]) -> Result<Vec<String>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        let codes: BTreeSet<String> = tables
            .role_permissions
            .iter()
            .filter(|(role_id, _)| role_ids.contains(role_id))
            .filter_map(|(_, permission_id)| {
                tables
                    .permissions
                    .iter()
                    .find(|p| p.id == *permission_id)
                    .map(|p| p.code.clone())
            })
            .collect();
        Ok(codes.into_iter().collect())
    }

    async fn create(&self, permission: &Permission) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.permissions.iter().any(|p| p.code == permission.code) {
            return Err(AdminServiceError::PermissionCodeTaken);
        }
        tables.permissions.push(permission.clone());
        Ok(())
    }

    async fn update(&self, permission: &Permission) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables.permissions.iter_mut().find(|p| p.id == permission.id) {
            *row = permission.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.permissions.len();
        tables.permissions.retain(|p| p.id != id);
        tables.role_permissions.retain(|(_, p)| *p != id);
        Ok(tables.permissions.len() < before)
    }
}

fn check_menu_parent(
    tables: &Tables,
    menu: Option<Uuid>,
    parent: Option<Uuid>,
) -> Result<(), AdminServiceError> {
    let Some(parent) = parent else {
        return Ok(());
    };
    let parents: HashMap<Uuid, Option<Uuid>> =
        tables.menus.iter().map(|m| (m.id, m.parent_id)).collect();
    Ok(check_parent(menu, parent, &parents)?)
}

impl MenuRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Menu>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.menus.iter().find(|m| m.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Menu>, AdminServiceError> {
        Ok(self.tables.lock().unwrap().menus.clone())
    }

    async fn list_for_roles(&self, role_ids: &[Uuid]) -> Result<Vec<Menu>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .menus
            .iter()
            .filter(|m| {
                role_ids
                    .iter()
                    .any(|role_id| tables.role_menus.contains(&(*role_id, m.id)))
            })
            .cloned()
            .collect())
    }

    async fn has_children(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.menus.iter().any(|m| m.parent_id == Some(id)))
    }

    async fn create(&self, menu: &Menu) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        check_menu_parent(&tables, None, menu.parent_id)?;
        tables.menus.push(menu.clone());
        Ok(())
    }

    async fn update(&self, menu: &Menu) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        check_menu_parent(&tables, Some(menu.id), menu.parent_id)?;
        if let Some(row) = tables.menus.iter_mut().find(|m| m.id == menu.id) {
            *row = menu.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if tables.menus.iter().any(|m| m.parent_id == Some(id)) {
            return Err(AdminServiceError::MenuHasChildren);
        }
        let before = tables.menus.len();
        tables.menus.retain(|m| m.id != id);
        tables.role_menus.retain(|(_, m)| *m != id);
        Ok(tables.menus.len() < before)
    }
}

impl GrantRepository for MemoryStore {
    async fn grant_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AdminServiceError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .user_roles
            .insert((user_id, role_id)))
    }

    async fn revoke_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AdminServiceError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .user_roles
            .remove(&(user_id, role_id)))
    }

    async fn grant_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, AdminServiceError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .role_permissions
            .insert((role_id, permission_id)))
    }

    async fn revoke_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, AdminServiceError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .role_permissions
            .remove(&(role_id, permission_id)))
    }

    async fn grant_role_menu(&self, role_id: Uuid, menu_id: Uuid) -> Result<bool, AdminServiceError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .role_menus
            .insert((role_id, menu_id)))
    }

    async fn revoke_role_menu(&self, role_id: Uuid, menu_id: Uuid) -> Result<bool, AdminServiceError> {
        Ok(self
            .tables
            .lock()
            .unwrap()
            .role_menus
            .remove(&(role_id, menu_id)))
    }
}

impl NotificationRepository for MemoryStore {
    async fn create(&self, notification: &Notification) -> Result<(), AdminServiceError> {
        self.tables
            .lock()
            .unwrap()
            .notifications
            .push(notification.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.notifications.iter().find(|n| n.id == id).cloned())
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<Notification> = tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && (!unread_only || !n.is_read))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paged(rows, page))
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<u64, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .notifications
            .iter()
            .filter(|n| n.user_id == user_id && !n.is_read)
            .count() as u64)
    }

    async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        match tables
            .notifications
            .iter_mut()
            .find(|n| n.id == id && !n.is_read)
        {
            Some(notification) => {
                notification.is_read = true;
                notification.read_at = Some(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let mut changed = 0;
        for notification in tables
            .notifications
            .iter_mut()
            .filter(|n| n.user_id == user_id && !n.is_read)
        {
            notification.is_read = true;
            notification.read_at = Some(at);
            changed += 1;
        }
        Ok(changed)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.notifications.len();
        tables.notifications.retain(|n| n.id != id);
        Ok(tables.notifications.len() < before)
    }
}

impl MetricRepository for MemoryStore {
    async fn insert_batch(&self, metrics: &[MonitorMetric]) -> Result<(), AdminServiceError> {
        self.tables
            .lock()
            .unwrap()
            .metrics
            .extend(metrics.iter().cloned());
        Ok(())
    }

    async fn query(
        &self,
        query: &MetricQuery,
        page: PageRequest,
    ) -> Result<Page<MonitorMetric>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<MonitorMetric> = tables
            .metrics
            .iter()
            .filter(|m| metric_matches(query, m))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(paged(rows, page))
    }
}

/// Inclusive range filter the SQL `WHERE` clause applies.
pub fn metric_matches(query: &MetricQuery, metric: &MonitorMetric) -> bool {
    query.metric_type.is_none_or(|t| t == metric.metric_type)
        && query
            .metric_name
            .as_deref()
            .is_none_or(|n| n == metric.metric_name)
        && query.from.is_none_or(|from| metric.created_at >= from)
        && query.to.is_none_or(|to| metric.created_at <= to)
}

impl AlertRuleRepository for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlertRule>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables.alert_rules.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<AlertRule>, AdminServiceError> {
        Ok(self.tables.lock().unwrap().alert_rules.clone())
    }

    async fn list_enabled(&self) -> Result<Vec<AlertRule>, AdminServiceError> {
        let tables = self.tables.lock().unwrap();
        Ok(tables
            .alert_rules
            .iter()
            .filter(|r| r.enabled)
            .cloned()
            .collect())
    }

    async fn create(&self, rule: &AlertRule) -> Result<(), AdminServiceError> {
        self.tables.lock().unwrap().alert_rules.push(rule.clone());
        Ok(())
    }

    async fn update(&self, rule: &AlertRule) -> Result<(), AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        if let Some(row) = tables.alert_rules.iter_mut().find(|r| r.id == rule.id) {
            *row = rule.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let mut tables = self.tables.lock().unwrap();
        let before = tables.alert_rules.len();
        tables.alert_rules.retain(|r| r.id != id);
        Ok(tables.alert_rules.len() < before)
    }
}

pub fn resolver(
    store: &MemoryStore,
) -> ResolveAuthorizationUseCase<MemoryStore, MemoryStore, MemoryStore, MemoryStore> {
    ResolveAuthorizationUseCase {
        users: store.clone(),
        roles: store.clone(),
        permissions: store.clone(),
        menus: store.clone(),
    }
}

// ── Fixtures ─────────────────────────────────────────────────────────────────

pub fn test_user(username: &str) -> User {
    let now = Utc::now();
    User {
        id: Uuid::now_v7(),
        username: username.to_owned(),
        email: format!("{username}@example.com"),
        nickname: username.to_owned(),
        status: UserStatus::Active,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn test_role(code: &str) -> Role {
    let now = Utc::now();
    Role {
        id: Uuid::now_v7(),
        name: code.to_owned(),
        code: code.to_owned(),
        description: String::new(),
        status: RoleStatus::Active,
        sort: 0,
        created_at: now,
        updated_at: now,
        deleted_at: None,
    }
}

pub fn test_permission(code: &str) -> Permission {
    let now = Utc::now();
    Permission {
        id: Uuid::now_v7(),
        code: code.to_owned(),
        name: code.to_owned(),
        description: String::new(),
        created_at: now,
        updated_at: now,
    }
}

pub fn test_menu(name: &str, parent_id: Option<Uuid>, sort: i32) -> Menu {
    let now = Utc::now();
    Menu {
        id: Uuid::now_v7(),
        parent_id,
        name: name.to_owned(),
        path: format!("/{}", name.to_lowercase()),
        component: None,
        icon: String::new(),
        menu_type: MenuType::Menu,
        visible: true,
        sort,
        status: Toggle::Enabled,
        permission_code: None,
        created_at: now,
        updated_at: now,
    }
}
