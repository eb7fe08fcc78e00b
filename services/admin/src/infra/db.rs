use std::collections::HashMap;

use anyhow::Context as _;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection,
    DatabaseTransaction, DbErr, EntityTrait, JoinType, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, Select, TransactionTrait,
    sea_query::{Expr, OnConflict},
};
use uuid::Uuid;

use backoffice_admin_schema::{
    alert_rules, dictionaries, email_templates, menus, monitor_metrics, notifications,
    permissions, role_menus, role_permissions, roles, user_roles, users,
};
use backoffice_core::sea_ext::{is_foreign_key_violation, is_unique_violation};
use backoffice_domain::kind::UserStatus;
use backoffice_domain::menu_tree::check_parent;
use backoffice_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{
    AlertRuleRepository, DictionaryRepository, EmailTemplateRepository, GrantRepository,
    MenuRepository, MetricRepository, NotificationRepository, PermissionRepository,
    RoleRepository, UserRepository,
};
use crate::domain::types::{
    AlertRule, Dictionary, EmailTemplate, Menu, MetricQuery, MonitorMetric, Notification,
    Permission, Role, User,
};
use crate::error::AdminServiceError;

/// Map a unique violation to `conflict`; anything else is internal.
fn conflict_or_internal(
    err: DbErr,
    conflict: AdminServiceError,
    context: &'static str,
) -> AdminServiceError {
    if is_unique_violation(&err) {
        conflict
    } else {
        anyhow::Error::new(err).context(context).into()
    }
}

async fn paginate<E, T>(
    db: &DatabaseConnection,
    query: Select<E>,
    page: PageRequest,
    map: impl Fn(E::Model) -> Result<T, AdminServiceError>,
    context: &'static str,
) -> Result<Page<T>, AdminServiceError>
where
    E: EntityTrait,
    E::Model: Send + Sync,
{
    let total = query.clone().count(db).await.context(context)?;
    let models = query
        .offset(page.offset())
        .limit(page.limit())
        .all(db)
        .await
        .context(context)?;
    let items = models.into_iter().map(map).collect::<Result<Vec<_>, _>>()?;
    Ok(Page::new(items, total, page))
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AdminServiceError> {
        let model = users::Entity::find_by_id(id)
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, AdminServiceError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn list(
        &self,
        status: Option<UserStatus>,
        page: PageRequest,
    ) -> Result<Page<User>, AdminServiceError> {
        let mut query = users::Entity::find().filter(users::Column::DeletedAt.is_null());
        if let Some(status) = status {
            query = query.filter(users::Column::Status.eq(status.as_str()));
        }
        let query = query
            .order_by_asc(users::Column::Username)
            .order_by_asc(users::Column::Id);
        paginate(&self.db, query, page, user_from_model, "list users").await
    }

    async fn create(&self, user: &User) -> Result<(), AdminServiceError> {
        user_to_active(user)
            .insert(&self.db)
            .await
            .map_err(|e| conflict_or_internal(e, AdminServiceError::UsernameTaken, "create user"))?;
        Ok(())
    }

    async fn update(&self, user: &User) -> Result<(), AdminServiceError> {
        user_to_active(user)
            .update(&self.db)
            .await
            .context("update user")?;
        Ok(())
    }

    async fn soft_delete(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AdminServiceError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::DeletedAt, Expr::value(Some(at)))
            .col_expr(users::Column::UpdatedAt, Expr::value(at))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await
            .context("soft delete user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_to_active(user: &User) -> users::ActiveModel {
    users::ActiveModel {
        id: Set(user.id),
        username: Set(user.username.clone()),
        email: Set(user.email.clone()),
        nickname: Set(user.nickname.clone()),
        status: Set(user.status.as_str().to_owned()),
        created_at: Set(user.created_at),
        updated_at: Set(user.updated_at),
        deleted_at: Set(user.deleted_at),
    }
}

fn user_from_model(model: users::Model) -> Result<User, AdminServiceError> {
    Ok(User {
        id: model.id,
        username: model.username,
        email: model.email,
        nickname: model.nickname,
        status: model.status.parse().context("stored user status")?,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    })
}

// ── Role repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRoleRepository {
    pub db: DatabaseConnection,
}

/// The partial unique indexes are named after the column they guard.
fn role_conflict(err: DbErr, context: &'static str) -> AdminServiceError {
    let conflict = if err.to_string().contains("uq_roles_code_live") {
        AdminServiceError::RoleCodeTaken
    } else {
        AdminServiceError::RoleNameTaken
    };
    conflict_or_internal(err, conflict, context)
}

impl RoleRepository for DbRoleRepository {
    async fn find_by_id(
        &self,
        id: Uuid,
        include_deleted: bool,
    ) -> Result<Option<Role>, AdminServiceError> {
        let mut query = roles::Entity::find_by_id(id);
        if !include_deleted {
            query = query.filter(roles::Column::DeletedAt.is_null());
        }
        let model = query.one(&self.db).await.context("find role by id")?;
        model.map(role_from_model).transpose()
    }

    async fn find_live_by_name(&self, name: &str) -> Result<Option<Role>, AdminServiceError> {
        let model = roles::Entity::find()
            .filter(roles::Column::Name.eq(name))
            .filter(roles::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find role by name")?;
        model.map(role_from_model).transpose()
    }

    async fn find_live_by_code(&self, code: &str) -> Result<Option<Role>, AdminServiceError> {
        let model = roles::Entity::find()
            .filter(roles::Column::Code.eq(code))
            .filter(roles::Column::DeletedAt.is_null())
            .one(&self.db)
            .await
            .context("find role by code")?;
        model.map(role_from_model).transpose()
    }

    async fn list(&self, include_deleted: bool) -> Result<Vec<Role>, AdminServiceError> {
        let mut query = roles::Entity::find();
        if !include_deleted {
            query = query.filter(roles::Column::DeletedAt.is_null());
        }
        let models = query
            .order_by_asc(roles::Column::Sort)
            .order_by_asc(roles::Column::Name)
            .order_by_asc(roles::Column::Id)
            .all(&self.db)
            .await
            .context("list roles")?;
        models.into_iter().map(role_from_model).collect()
    }

    async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Role>, AdminServiceError> {
        let models = roles::Entity::find()
            .join(JoinType::InnerJoin, roles::Relation::UserRoles.def())
            .filter(user_roles::Column::UserId.eq(user_id))
            .filter(roles::Column::DeletedAt.is_null())
            .order_by_asc(roles::Column::Id)
            .all(&self.db)
            .await
            .context("list roles for user")?;
        models.into_iter().map(role_from_model).collect()
    }

    async fn create(&self, role: &Role) -> Result<(), AdminServiceError> {
        role_to_active(role)
            .insert(&self.db)
            .await
            .map_err(|e| role_conflict(e, "create role"))?;
        Ok(())
    }

    async fn update(&self, role: &Role) -> Result<(), AdminServiceError> {
        role_to_active(role)
            .update(&self.db)
            .await
            .map_err(|e| role_conflict(e, "update role"))?;
        Ok(())
    }
}

fn role_to_active(role: &Role) -> roles::ActiveModel {
    roles::ActiveModel {
        id: Set(role.id),
        name: Set(role.name.clone()),
        code: Set(role.code.clone()),
        description: Set(role.description.clone()),
        status: Set(role.status.as_str().to_owned()),
        sort: Set(role.sort),
        created_at: Set(role.created_at),
        updated_at: Set(role.updated_at),
        deleted_at: Set(role.deleted_at),
    }
}

fn role_from_model(model: roles::Model) -> Result<Role, AdminServiceError> {
    Ok(Role {
        id: model.id,
        name: model.name,
        code: model.code,
        description: model.description,
        status: model.status.parse().context("stored role status")?,
        sort: model.sort,
        created_at: model.created_at,
        updated_at: model.updated_at,
        deleted_at: model.deleted_at,
    })
}

// ── Permission repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbPermissionRepository {
    pub db: DatabaseConnection,
}

impl PermissionRepository for DbPermissionRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Permission>, AdminServiceError> {
        let model = permissions::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find permission by id")?;
        Ok(model.map(permission_from_model))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Permission>, AdminServiceError> {
        let model = permissions::Entity::find()
            .filter(permissions::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find permission by code")?;
        Ok(model.map(permission_from_model))
    }

    async fn list(&self) -> Result<Vec<Permission>, AdminServiceError> {
        let models = permissions::Entity::find()
            .order_by_asc(permissions::Column::Code)
            .all(&self.db)
            .await
            .context("list permissions")?;
        Ok(models.into_iter().map(permission_from_model).collect())
    }

    async fn list_for_role(&self, role_id: Uuid) -> Result<Vec<Permission>, AdminServiceError> {
        let models = permissions::Entity::find()
            .join(
                JoinType::InnerJoin,
                permissions::Relation::RolePermissions.def(),
            )
            .filter(role_permissions::Column::RoleId.eq(role_id))
            .order_by_asc(permissions::Column::Code)
            .all(&self.db)
            .await
            .context("list permissions for role")?;
        Ok(models.into_iter().map(permission_from_model).collect())
    }

    async fn codes_for_roles(&self, role_ids: &[Uuid]) -> Result<Vec<String>, AdminServiceError> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }
        let codes = permissions::Entity::find()
            .join(
                JoinType::InnerJoin,
                permissions::Relation::RolePermissions.def(),
            )
            .filter(role_permissions::Column::RoleId.is_in(role_ids.iter().copied()))
            .select_only()
            .column(permissions::Column::Code)
            .distinct()
            .into_tuple::<String>()
            .all(&self.db)
            .await
            .context("permission codes for roles")?;
        Ok(codes)
    }

    async fn create(&self, permission: &Permission) -> Result<(), AdminServiceError> {
        permission_to_active(permission)
            .insert(&self.db)
            .await
            .map_err(|e| {
                conflict_or_internal(e, AdminServiceError::PermissionCodeTaken, "create permission")
            })?;
        Ok(())
    }

    async fn update(&self, permission: &Permission) -> Result<(), AdminServiceError> {
        permission_to_active(permission)
            .update(&self.db)
            .await
            .context("update permission")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = permissions::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete permission")?;
        Ok(result.rows_affected > 0)
    }
}

fn permission_to_active(permission: &Permission) -> permissions::ActiveModel {
    permissions::ActiveModel {
        id: Set(permission.id),
        code: Set(permission.code.clone()),
        name: Set(permission.name.clone()),
        description: Set(permission.description.clone()),
        created_at: Set(permission.created_at),
        updated_at: Set(permission.updated_at),
    }
}

fn permission_from_model(model: permissions::Model) -> Permission {
    Permission {
        id: model.id,
        code: model.code,
        name: model.name,
        description: model.description,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}

// ── Menu repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMenuRepository {
    pub db: DatabaseConnection,
}

impl MenuRepository for DbMenuRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Menu>, AdminServiceError> {
        let model = menus::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find menu by id")?;
        model.map(menu_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<Menu>, AdminServiceError> {
        let models = menus::Entity::find()
            .order_by_asc(menus::Column::Sort)
            .order_by_asc(menus::Column::Name)
            .all(&self.db)
            .await
            .context("list menus")?;
        models.into_iter().map(menu_from_model).collect()
    }

    async fn list_for_roles(&self, role_ids: &[Uuid]) -> Result<Vec<Menu>, AdminServiceError> {
        if role_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = menus::Entity::find()
            .join(JoinType::InnerJoin, menus::Relation::RoleMenus.def())
            .filter(role_menus::Column::RoleId.is_in(role_ids.iter().copied()))
            .distinct()
            .all(&self.db)
            .await
            .context("list menus for roles")?;
        models.into_iter().map(menu_from_model).collect()
    }

    async fn has_children(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let count = menus::Entity::find()
            .filter(menus::Column::ParentId.eq(id))
            .count(&self.db)
            .await
            .context("count menu children")?;
        Ok(count > 0)
    }

    async fn create(&self, menu: &Menu) -> Result<(), AdminServiceError> {
        let txn = lock_menu_tree(&self.db, None, menu.parent_id).await?;
        menu_to_active(menu)
            .insert(&txn)
            .await
            .map_err(|e| {
                if is_foreign_key_violation(&e) {
                    AdminServiceError::MenuNotFound
                } else {
                    anyhow::Error::new(e).context("create menu").into()
                }
            })?;
        txn.commit().await.context("commit menu create")?;
        Ok(())
    }

    async fn update(&self, menu: &Menu) -> Result<(), AdminServiceError> {
        let txn = lock_menu_tree(&self.db, Some(menu.id), menu.parent_id).await?;
        menu_to_active(menu)
            .update(&txn)
            .await
            .context("update menu")?;
        txn.commit().await.context("commit menu update")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = menus::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .map_err(|e| {
                // A child inserted after the has_children check trips the RESTRICT FK.
                if is_foreign_key_violation(&e) {
                    AdminServiceError::MenuHasChildren
                } else {
                    anyhow::Error::new(e).context("delete menu").into()
                }
            })?;
        Ok(result.rows_affected > 0)
    }
}

/// Open a menu write transaction. With a `parent`, the table is locked and
/// `parent` is checked for `menu` (`None` on create) before returning.
async fn lock_menu_tree(
    db: &DatabaseConnection,
    menu: Option<Uuid>,
    parent: Option<Uuid>,
) -> Result<DatabaseTransaction, AdminServiceError> {
    let txn = db.begin().await.context("begin menu write")?;
    let Some(parent) = parent else {
        return Ok(txn);
    };
    // SHARE ROW EXCLUSIVE conflicts with itself, so parent changes serialize.
    txn.execute_unprepared("LOCK TABLE menus IN SHARE ROW EXCLUSIVE MODE")
        .await
        .context("lock menus")?;
    let parents: HashMap<Uuid, Option<Uuid>> = menus::Entity::find()
        .select_only()
        .column(menus::Column::Id)
        .column(menus::Column::ParentId)
        .into_tuple::<(Uuid, Option<Uuid>)>()
        .all(&txn)
        .await
        .context("load menu parents")?
        .into_iter()
        .collect();
    check_parent(menu, parent, &parents)?;
    Ok(txn)
}

fn menu_to_active(menu: &Menu) -> menus::ActiveModel {
    menus::ActiveModel {
        id: Set(menu.id),
        parent_id: Set(menu.parent_id),
        name: Set(menu.name.clone()),
        path: Set(menu.path.clone()),
        component: Set(menu.component.clone()),
        icon: Set(menu.icon.clone()),
        menu_type: Set(menu.menu_type.as_str().to_owned()),
        visible: Set(menu.visible),
        sort: Set(menu.sort),
        status: Set(menu.status.as_str().to_owned()),
        permission_code: Set(menu.permission_code.clone()),
        created_at: Set(menu.created_at),
        updated_at: Set(menu.updated_at),
    }
}

fn menu_from_model(model: menus::Model) -> Result<Menu, AdminServiceError> {
    Ok(Menu {
        id: model.id,
        parent_id: model.parent_id,
        name: model.name,
        path: model.path,
        component: model.component,
        icon: model.icon,
        menu_type: model.menu_type.parse().context("stored menu type")?,
        visible: model.visible,
        sort: model.sort,
        status: model.status.parse().context("stored menu status")?,
        permission_code: model.permission_code,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Grant repository ─────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbGrantRepository {
    pub db: DatabaseConnection,
}

impl GrantRepository for DbGrantRepository {
    async fn grant_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AdminServiceError> {
        let rows = user_roles::Entity::insert(user_roles::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(user_id),
            role_id: Set(role_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([user_roles::Column::UserId, user_roles::Column::RoleId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("grant user role")?;
        Ok(rows > 0)
    }

    async fn revoke_user_role(&self, user_id: Uuid, role_id: Uuid) -> Result<bool, AdminServiceError> {
        let result = user_roles::Entity::delete_many()
            .filter(user_roles::Column::UserId.eq(user_id))
            .filter(user_roles::Column::RoleId.eq(role_id))
            .exec(&self.db)
            .await
            .context("revoke user role")?;
        Ok(result.rows_affected > 0)
    }

    async fn grant_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, AdminServiceError> {
        let rows = role_permissions::Entity::insert(role_permissions::ActiveModel {
            id: Set(Uuid::now_v7()),
            role_id: Set(role_id),
            permission_id: Set(permission_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([
                role_permissions::Column::RoleId,
                role_permissions::Column::PermissionId,
            ])
            .do_nothing()
            .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("grant role permission")?;
        Ok(rows > 0)
    }

    async fn revoke_role_permission(
        &self,
        role_id: Uuid,
        permission_id: Uuid,
    ) -> Result<bool, AdminServiceError> {
        let result = role_permissions::Entity::delete_many()
            .filter(role_permissions::Column::RoleId.eq(role_id))
            .filter(role_permissions::Column::PermissionId.eq(permission_id))
            .exec(&self.db)
            .await
            .context("revoke role permission")?;
        Ok(result.rows_affected > 0)
    }

    async fn grant_role_menu(&self, role_id: Uuid, menu_id: Uuid) -> Result<bool, AdminServiceError> {
        let rows = role_menus::Entity::insert(role_menus::ActiveModel {
            id: Set(Uuid::now_v7()),
            role_id: Set(role_id),
            menu_id: Set(menu_id),
            created_at: Set(Utc::now()),
        })
        .on_conflict(
            OnConflict::columns([role_menus::Column::RoleId, role_menus::Column::MenuId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .context("grant role menu")?;
        Ok(rows > 0)
    }

    async fn revoke_role_menu(&self, role_id: Uuid, menu_id: Uuid) -> Result<bool, AdminServiceError> {
        let result = role_menus::Entity::delete_many()
            .filter(role_menus::Column::RoleId.eq(role_id))
            .filter(role_menus::Column::MenuId.eq(menu_id))
            .exec(&self.db)
            .await
            .context("revoke role menu")?;
        Ok(result.rows_affected > 0)
    }
}

// ── Notification repository ──────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbNotificationRepository {
    pub db: DatabaseConnection,
}

impl NotificationRepository for DbNotificationRepository {
    async fn create(&self, notification: &Notification) -> Result<(), AdminServiceError> {
        notifications::ActiveModel {
            id: Set(notification.id),
            user_id: Set(notification.user_id),
            title: Set(notification.title.clone()),
            content: Set(notification.content.clone()),
            notification_type: Set(notification.notification_type.as_str().to_owned()),
            link: Set(notification.link.clone()),
            is_read: Set(notification.is_read),
            read_at: Set(notification.read_at),
            created_at: Set(notification.created_at),
        }
        .insert(&self.db)
        .await
        .context("create notification")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Notification>, AdminServiceError> {
        let model = notifications::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find notification by id")?;
        model.map(notification_from_model).transpose()
    }

    async fn list_for_user(
        &self,
        user_id: Uuid,
        unread_only: bool,
        page: PageRequest,
    ) -> Result<Page<Notification>, AdminServiceError> {
        let mut query =
            notifications::Entity::find().filter(notifications::Column::UserId.eq(user_id));
        if unread_only {
            query = query.filter(notifications::Column::IsRead.eq(false));
        }
        let query = query
            .order_by_desc(notifications::Column::CreatedAt)
            .order_by_desc(notifications::Column::Id);
        paginate(
            &self.db,
            query,
            page,
            notification_from_model,
            "list notifications",
        )
        .await
    }

    async fn count_unread(&self, user_id: Uuid) -> Result<u64, AdminServiceError> {
        let count = notifications::Entity::find()
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .count(&self.db)
            .await
            .context("count unread notifications")?;
        Ok(count)
    }

    async fn mark_read(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool, AdminServiceError> {
        // The is_read guard keeps the first read_at under concurrent calls.
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .col_expr(notifications::Column::ReadAt, Expr::value(Some(at)))
            .filter(notifications::Column::Id.eq(id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .context("mark notification read")?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_all_read(&self, user_id: Uuid, at: DateTime<Utc>) -> Result<u64, AdminServiceError> {
        let result = notifications::Entity::update_many()
            .col_expr(notifications::Column::IsRead, Expr::value(true))
            .col_expr(notifications::Column::ReadAt, Expr::value(Some(at)))
            .filter(notifications::Column::UserId.eq(user_id))
            .filter(notifications::Column::IsRead.eq(false))
            .exec(&self.db)
            .await
            .context("mark all notifications read")?;
        Ok(result.rows_affected)
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = notifications::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete notification")?;
        Ok(result.rows_affected > 0)
    }
}

fn notification_from_model(model: notifications::Model) -> Result<Notification, AdminServiceError> {
    Ok(Notification {
        id: model.id,
        user_id: model.user_id,
        title: model.title,
        content: model.content,
        notification_type: model
            .notification_type
            .parse()
            .context("stored notification type")?,
        link: model.link,
        is_read: model.is_read,
        read_at: model.read_at,
        created_at: model.created_at,
    })
}

// ── Dictionary repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbDictionaryRepository {
    pub db: DatabaseConnection,
}

impl DictionaryRepository for DbDictionaryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Dictionary>, AdminServiceError> {
        let model = dictionaries::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find dictionary by id")?;
        model.map(dictionary_from_model).transpose()
    }

    async fn find_by_code(
        &self,
        dict_type: &str,
        dict_code: &str,
    ) -> Result<Option<Dictionary>, AdminServiceError> {
        let model = dictionaries::Entity::find()
            .filter(dictionaries::Column::DictType.eq(dict_type))
            .filter(dictionaries::Column::DictCode.eq(dict_code))
            .one(&self.db)
            .await
            .context("find dictionary by code")?;
        model.map(dictionary_from_model).transpose()
    }

    async fn list(&self, dict_type: Option<&str>) -> Result<Vec<Dictionary>, AdminServiceError> {
        let mut query = dictionaries::Entity::find();
        if let Some(dict_type) = dict_type {
            query = query.filter(dictionaries::Column::DictType.eq(dict_type));
        }
        let models = query
            .order_by_asc(dictionaries::Column::DictType)
            .order_by_asc(dictionaries::Column::Sort)
            .order_by_asc(dictionaries::Column::DictCode)
            .all(&self.db)
            .await
            .context("list dictionaries")?;
        models.into_iter().map(dictionary_from_model).collect()
    }

    async fn is_parent(&self, dict_type: &str, dict_code: &str) -> Result<bool, AdminServiceError> {
        let count = dictionaries::Entity::find()
            .filter(dictionaries::Column::DictType.eq(dict_type))
            .filter(dictionaries::Column::ParentCode.eq(dict_code))
            .count(&self.db)
            .await
            .context("count dictionary children")?;
        Ok(count > 0)
    }

    async fn create(&self, entry: &Dictionary) -> Result<(), AdminServiceError> {
        dictionary_to_active(entry)
            .insert(&self.db)
            .await
            .map_err(|e| {
                conflict_or_internal(e, AdminServiceError::DictionaryCodeTaken, "create dictionary")
            })?;
        Ok(())
    }

    async fn update(&self, entry: &Dictionary) -> Result<(), AdminServiceError> {
        dictionary_to_active(entry)
            .update(&self.db)
            .await
            .context("update dictionary")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = dictionaries::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete dictionary")?;
        Ok(result.rows_affected > 0)
    }
}

fn dictionary_to_active(entry: &Dictionary) -> dictionaries::ActiveModel {
    dictionaries::ActiveModel {
        id: Set(entry.id),
        dict_type: Set(entry.dict_type.clone()),
        dict_code: Set(entry.dict_code.clone()),
        dict_name: Set(entry.dict_name.clone()),
        parent_code: Set(entry.parent_code.clone()),
        sort: Set(entry.sort),
        status: Set(entry.status.as_str().to_owned()),
        remark: Set(entry.remark.clone()),
        created_at: Set(entry.created_at),
        updated_at: Set(entry.updated_at),
    }
}

fn dictionary_from_model(model: dictionaries::Model) -> Result<Dictionary, AdminServiceError> {
    Ok(Dictionary {
        id: model.id,
        dict_type: model.dict_type,
        dict_code: model.dict_code,
        dict_name: model.dict_name,
        parent_code: model.parent_code,
        sort: model.sort,
        status: model.status.parse().context("stored dictionary status")?,
        remark: model.remark,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Metric repository ────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbMetricRepository {
    pub db: DatabaseConnection,
}

impl MetricRepository for DbMetricRepository {
    async fn insert_batch(&self, metrics: &[MonitorMetric]) -> Result<(), AdminServiceError> {
        if metrics.is_empty() {
            return Ok(());
        }
        let models = metrics.iter().map(|metric| monitor_metrics::ActiveModel {
            id: Set(metric.id),
            metric_type: Set(metric.metric_type.as_str().to_owned()),
            metric_name: Set(metric.metric_name.clone()),
            value: Set(metric.value),
            unit: Set(metric.unit.clone()),
            tags: Set(serde_json::Value::Object(metric.tags.clone())),
            created_at: Set(metric.created_at),
        });
        monitor_metrics::Entity::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .context("insert metric batch")?;
        Ok(())
    }

    async fn query(
        &self,
        query: &MetricQuery,
        page: PageRequest,
    ) -> Result<Page<MonitorMetric>, AdminServiceError> {
        let mut select = monitor_metrics::Entity::find();
        if let Some(metric_type) = query.metric_type {
            select = select.filter(monitor_metrics::Column::MetricType.eq(metric_type.as_str()));
        }
        if let Some(name) = query.metric_name.as_deref() {
            select = select.filter(monitor_metrics::Column::MetricName.eq(name));
        }
        if let Some(from) = query.from {
            select = select.filter(monitor_metrics::Column::CreatedAt.gte(from));
        }
        if let Some(to) = query.to {
            select = select.filter(monitor_metrics::Column::CreatedAt.lte(to));
        }
        let select = select
            .order_by_desc(monitor_metrics::Column::CreatedAt)
            .order_by_desc(monitor_metrics::Column::Id);
        paginate(&self.db, select, page, metric_from_model, "query metrics").await
    }
}

fn metric_from_model(model: monitor_metrics::Model) -> Result<MonitorMetric, AdminServiceError> {
    let tags = match model.tags {
        serde_json::Value::Object(map) => map,
        _ => serde_json::Map::new(),
    };
    Ok(MonitorMetric {
        id: model.id,
        metric_type: model.metric_type.parse().context("stored metric type")?,
        metric_name: model.metric_name,
        value: model.value,
        unit: model.unit,
        tags,
        created_at: model.created_at,
    })
}

// ── Alert rule repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbAlertRuleRepository {
    pub db: DatabaseConnection,
}

impl AlertRuleRepository for DbAlertRuleRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<AlertRule>, AdminServiceError> {
        let model = alert_rules::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find alert rule by id")?;
        model.map(alert_rule_from_model).transpose()
    }

    async fn list(&self) -> Result<Vec<AlertRule>, AdminServiceError> {
        let models = alert_rules::Entity::find()
            .order_by_asc(alert_rules::Column::Name)
            .all(&self.db)
            .await
            .context("list alert rules")?;
        models.into_iter().map(alert_rule_from_model).collect()
    }

    async fn list_enabled(&self) -> Result<Vec<AlertRule>, AdminServiceError> {
        let models = alert_rules::Entity::find()
            .filter(alert_rules::Column::Enabled.eq(true))
            .order_by_asc(alert_rules::Column::Name)
            .all(&self.db)
            .await
            .context("list enabled alert rules")?;
        models.into_iter().map(alert_rule_from_model).collect()
    }

    async fn create(&self, rule: &AlertRule) -> Result<(), AdminServiceError> {
        alert_rule_to_active(rule)
            .insert(&self.db)
            .await
            .context("create alert rule")?;
        Ok(())
    }

    async fn update(&self, rule: &AlertRule) -> Result<(), AdminServiceError> {
        alert_rule_to_active(rule)
            .update(&self.db)
            .await
            .context("update alert rule")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = alert_rules::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete alert rule")?;
        Ok(result.rows_affected > 0)
    }
}

fn alert_rule_to_active(rule: &AlertRule) -> alert_rules::ActiveModel {
    alert_rules::ActiveModel {
        id: Set(rule.id),
        name: Set(rule.name.clone()),
        metric_type: Set(rule.metric_type.as_str().to_owned()),
        metric_name: Set(rule.metric_name.clone()),
        operator: Set(rule.operator.as_str().to_owned()),
        threshold: Set(rule.threshold),
        severity: Set(rule.severity.as_str().to_owned()),
        enabled: Set(rule.enabled),
        created_at: Set(rule.created_at),
        updated_at: Set(rule.updated_at),
    }
}

fn alert_rule_from_model(model: alert_rules::Model) -> Result<AlertRule, AdminServiceError> {
    Ok(AlertRule {
        id: model.id,
        name: model.name,
        metric_type: model.metric_type.parse().context("stored metric type")?,
        metric_name: model.metric_name,
        operator: model.operator.parse().context("stored alert operator")?,
        threshold: model.threshold,
        severity: model.severity.parse().context("stored severity")?,
        enabled: model.enabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ── Email template repository ────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbEmailTemplateRepository {
    pub db: DatabaseConnection,
}

impl EmailTemplateRepository for DbEmailTemplateRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<EmailTemplate>, AdminServiceError> {
        let model = email_templates::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find email template by id")?;
        Ok(model.map(email_template_from_model))
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<EmailTemplate>, AdminServiceError> {
        let model = email_templates::Entity::find()
            .filter(email_templates::Column::Code.eq(code))
            .one(&self.db)
            .await
            .context("find email template by code")?;
        Ok(model.map(email_template_from_model))
    }

    async fn list(&self) -> Result<Vec<EmailTemplate>, AdminServiceError> {
        let models = email_templates::Entity::find()
            .order_by_asc(email_templates::Column::Code)
            .all(&self.db)
            .await
            .context("list email templates")?;
        Ok(models.into_iter().map(email_template_from_model).collect())
    }

    async fn create(&self, template: &EmailTemplate) -> Result<(), AdminServiceError> {
        email_template_to_active(template)
            .insert(&self.db)
            .await
            .map_err(|e| {
                conflict_or_internal(e, AdminServiceError::TemplateCodeTaken, "create email template")
            })?;
        Ok(())
    }

    async fn update(&self, template: &EmailTemplate) -> Result<(), AdminServiceError> {
        email_template_to_active(template)
            .update(&self.db)
            .await
            .context("update email template")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<bool, AdminServiceError> {
        let result = email_templates::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete email template")?;
        Ok(result.rows_affected > 0)
    }
}

fn email_template_to_active(template: &EmailTemplate) -> email_templates::ActiveModel {
    email_templates::ActiveModel {
        id: Set(template.id),
        code: Set(template.code.clone()),
        name: Set(template.name.clone()),
        subject: Set(template.subject.clone()),
        body: Set(template.body.clone()),
        enabled: Set(template.enabled),
        created_at: Set(template.created_at),
        updated_at: Set(template.updated_at),
    }
}

fn email_template_from_model(model: email_templates::Model) -> EmailTemplate {
    EmailTemplate {
        id: model.id,
        code: model.code,
        name: model.name,
        subject: model.subject,
        body: model.body,
        enabled: model.enabled,
        created_at: model.created_at,
        updated_at: model.updated_at,
    }
}
