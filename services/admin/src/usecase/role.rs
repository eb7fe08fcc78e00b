use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::kind::RoleStatus;
use backoffice_domain::permission::validate_code;

use crate::domain::repository::{
    GrantRepository, MenuRepository, PermissionRepository, RoleRepository,
};
use crate::domain::types::{Menu, Permission, Role, fits, fits_opt, non_blank};
use crate::error::AdminServiceError;

/// Reject `name`/`code` if another live role (not `exclude`) already uses it.
async fn ensure_unique<R: RoleRepository>(
    repo: &R,
    name: &str,
    code: &str,
    exclude: Option<Uuid>,
) -> Result<(), AdminServiceError> {
    let other = |role: &Role| Some(role.id) != exclude;
    if repo.find_live_by_name(name).await?.is_some_and(|r| other(&r)) {
        return Err(AdminServiceError::RoleNameTaken);
    }
    if repo.find_live_by_code(code).await?.is_some_and(|r| other(&r)) {
        return Err(AdminServiceError::RoleCodeTaken);
    }
    Ok(())
}

async fn live_role<R: RoleRepository>(repo: &R, id: Uuid) -> Result<Role, AdminServiceError> {
    repo.find_by_id(id, false)
        .await?
        .ok_or(AdminServiceError::RoleNotFound)
}

// ── CreateRole ───────────────────────────────────────────────────────────────

pub struct CreateRoleInput {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub status: Option<RoleStatus>,
    pub sort: Option<i32>,
}

pub struct CreateRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> CreateRoleUseCase<R> {
    pub async fn execute(&self, input: CreateRoleInput) -> Result<Role, AdminServiceError> {
        if !non_blank(&input.name, 64) {
            return Err(AdminServiceError::Invalid("role name"));
        }
        // `*` is a permission wildcard, never a role code.
        if !validate_code(&input.code) || input.code.contains('*') {
            return Err(AdminServiceError::Invalid("role code"));
        }
        if !fits_opt(input.description.as_deref(), 255) {
            return Err(AdminServiceError::Invalid("role description"));
        }
        let name = input.name.trim().to_owned();
        ensure_unique(&self.repo, &name, &input.code, None).await?;

        let now = Utc::now();
        let role = Role {
            id: Uuid::now_v7(),
            name,
            code: input.code,
            description: input.description.unwrap_or_default(),
            status: input.status.unwrap_or(RoleStatus::Active),
            sort: input.sort.unwrap_or(0),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.repo.create(&role).await?;
        tracing::info!(role_id = %role.id, code = %role.code, "role created");
        Ok(role)
    }
}

// ── GetRole / ListRoles ──────────────────────────────────────────────────────

pub struct GetRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> GetRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Role, AdminServiceError> {
        live_role(&self.repo, id).await
    }
}

pub struct ListRolesUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> ListRolesUseCase<R> {
    pub async fn execute(&self, include_deleted: bool) -> Result<Vec<Role>, AdminServiceError> {
        self.repo.list(include_deleted).await
    }
}

// ── UpdateRole ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateRoleInput {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub sort: Option<i32>,
}

pub struct UpdateRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> UpdateRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid, input: UpdateRoleInput) -> Result<Role, AdminServiceError> {
        let mut role = live_role(&self.repo, id).await?;
        if let Some(name) = input.name {
            if !non_blank(&name, 64) {
                return Err(AdminServiceError::Invalid("role name"));
            }
            role.name = name.trim().to_owned();
        }
        if let Some(code) = input.code {
            if !validate_code(&code) || code.contains('*') {
                return Err(AdminServiceError::Invalid("role code"));
            }
            role.code = code;
        }
        if let Some(description) = input.description {
            if !fits(&description, 255) {
                return Err(AdminServiceError::Invalid("role description"));
            }
            role.description = description;
        }
        if let Some(sort) = input.sort {
            role.sort = sort;
        }
        ensure_unique(&self.repo, &role.name, &role.code, Some(role.id)).await?;
        role.updated_at = Utc::now();
        self.repo.update(&role).await?;
        Ok(role)
    }
}

// ── SetRoleStatus ────────────────────────────────────────────────────────────

pub struct SetRoleStatusUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> SetRoleStatusUseCase<R> {
    pub async fn execute(&self, id: Uuid, status: RoleStatus) -> Result<Role, AdminServiceError> {
        let mut role = live_role(&self.repo, id).await?;
        if role.status != status {
            role.status = status;
            role.updated_at = Utc::now();
            self.repo.update(&role).await?;
            tracing::info!(role_id = %id, status = %status, "role status changed");
        }
        Ok(role)
    }
}

// ── DeleteRole / RestoreRole ─────────────────────────────────────────────────

pub struct DeleteRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> DeleteRoleUseCase<R> {
    /// Tombstone the role. Grant rows stay so a restore brings them back.
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        let mut role = live_role(&self.repo, id).await?;
        let now = Utc::now();
        role.deleted_at = Some(now);
        role.updated_at = now;
        self.repo.update(&role).await?;
        tracing::info!(role_id = %id, code = %role.code, "role soft-deleted");
        Ok(())
    }
}

pub struct RestoreRoleUseCase<R: RoleRepository> {
    pub repo: R,
}

impl<R: RoleRepository> RestoreRoleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Role, AdminServiceError> {
        let mut role = self
            .repo
            .find_by_id(id, true)
            .await?
            .ok_or(AdminServiceError::RoleNotFound)?;
        if role.deleted_at.is_none() {
            return Ok(role);
        }
        // Another live role may have claimed the name or code meanwhile.
        ensure_unique(&self.repo, &role.name, &role.code, Some(role.id)).await?;
        role.deleted_at = None;
        role.updated_at = Utc::now();
        self.repo.update(&role).await?;
        tracing::info!(role_id = %id, code = %role.code, "role restored");
        Ok(role)
    }
}

// ── Role permission grants ───────────────────────────────────────────────────

pub struct ListRolePermissionsUseCase<R: RoleRepository, P: PermissionRepository> {
    pub roles: R,
    pub permissions: P,
}

impl<R: RoleRepository, P: PermissionRepository> ListRolePermissionsUseCase<R, P> {
    pub async fn execute(&self, role_id: Uuid) -> Result<Vec<Permission>, AdminServiceError> {
        live_role(&self.roles, role_id).await?;
        self.permissions.list_for_role(role_id).await
    }
}

pub struct GrantRolePermissionUseCase<R, P, G>
where
    R: RoleRepository,
    P: PermissionRepository,
    G: GrantRepository,
{
    pub roles: R,
    pub permissions: P,
    pub grants: G,
}

impl<R, P, G> GrantRolePermissionUseCase<R, P, G>
where
    R: RoleRepository,
    P: PermissionRepository,
    G: GrantRepository,
{
    /// Idempotent: a repeated grant succeeds without a second row.
    pub async fn execute(&self, role_id: Uuid, permission_id: Uuid) -> Result<(), AdminServiceError> {
        live_role(&self.roles, role_id).await?;
        self.permissions
            .find_by_id(permission_id)
            .await?
            .ok_or(AdminServiceError::PermissionNotFound)?;
        if self.grants.grant_role_permission(role_id, permission_id).await? {
            tracing::info!(%role_id, %permission_id, "permission granted to role");
        }
        Ok(())
    }
}

pub struct RevokeRolePermissionUseCase<R: RoleRepository, G: GrantRepository> {
    pub roles: R,
    pub grants: G,
}

impl<R: RoleRepository, G: GrantRepository> RevokeRolePermissionUseCase<R, G> {
    pub async fn execute(&self, role_id: Uuid, permission_id: Uuid) -> Result<(), AdminServiceError> {
        live_role(&self.roles, role_id).await?;
        if self.grants.revoke_role_permission(role_id, permission_id).await? {
            tracing::info!(%role_id, %permission_id, "permission revoked from role");
        }
        Ok(())
    }
}

// ── Role menu grants ─────────────────────────────────────────────────────────

pub struct ListRoleMenusUseCase<R: RoleRepository, M: MenuRepository> {
    pub roles: R,
    pub menus: M,
}

impl<R: RoleRepository, M: MenuRepository> ListRoleMenusUseCase<R, M> {
    pub async fn execute(&self, role_id: Uuid) -> Result<Vec<Menu>, AdminServiceError> {
        live_role(&self.roles, role_id).await?;
        let mut menus = self.menus.list_for_roles(&[role_id]).await?;
        menus.sort_by(|a, b| {
            (a.sort, &a.name, a.id).cmp(&(b.sort, &b.name, b.id))
        });
        Ok(menus)
    }
}

pub struct GrantRoleMenuUseCase<R, M, G>
where
    R: RoleRepository,
    M: MenuRepository,
    G: GrantRepository,
{
    pub roles: R,
    pub menus: M,
    pub grants: G,
}

impl<R, M, G> GrantRoleMenuUseCase<R, M, G>
where
    R: RoleRepository,
    M: MenuRepository,
    G: GrantRepository,
{
    pub async fn execute(&self, role_id: Uuid, menu_id: Uuid) -> Result<(), AdminServiceError> {
        live_role(&self.roles, role_id).await?;
        self.menus
            .find_by_id(menu_id)
            .await?
            .ok_or(AdminServiceError::MenuNotFound)?;
        if self.grants.grant_role_menu(role_id, menu_id).await? {
            tracing::info!(%role_id, %menu_id, "menu granted to role");
        }
        Ok(())
    }
}

pub struct RevokeRoleMenuUseCase<R: RoleRepository, G: GrantRepository> {
    pub roles: R,
    pub grants: G,
}

impl<R: RoleRepository, G: GrantRepository> RevokeRoleMenuUseCase<R, G> {
    pub async fn execute(&self, role_id: Uuid, menu_id: Uuid) -> Result<(), AdminServiceError> {
        live_role(&self.roles, role_id).await?;
        if self.grants.revoke_role_menu(role_id, menu_id).await? {
            tracing::info!(%role_id, %menu_id, "menu revoked from role");
        }
        Ok(())
    }
}
