use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::permission::validate_code;

use crate::domain::repository::PermissionRepository;
use crate::domain::types::{Permission, fits, fits_opt, non_blank};
use crate::error::AdminServiceError;

// ── CreatePermission ─────────────────────────────────────────────────────────

pub struct CreatePermissionInput {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

pub struct CreatePermissionUseCase<R: PermissionRepository> {
    pub repo: R,
}

impl<R: PermissionRepository> CreatePermissionUseCase<R> {
    pub async fn execute(&self, input: CreatePermissionInput) -> Result<Permission, AdminServiceError> {
        if !validate_code(&input.code) {
            return Err(AdminServiceError::Invalid("permission code"));
        }
        if !non_blank(&input.name, 64) {
            return Err(AdminServiceError::Invalid("permission name"));
        }
        if !fits_opt(input.description.as_deref(), 255) {
            return Err(AdminServiceError::Invalid("permission description"));
        }
        if self.repo.find_by_code(&input.code).await?.is_some() {
            return Err(AdminServiceError::PermissionCodeTaken);
        }
        let now = Utc::now();
        let permission = Permission {
            id: Uuid::now_v7(),
            code: input.code,
            name: input.name.trim().to_owned(),
            description: input.description.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&permission).await?;
        Ok(permission)
    }
}

// ── GetPermission / ListPermissions ──────────────────────────────────────────

pub struct GetPermissionUseCase<R: PermissionRepository> {
    pub repo: R,
}

impl<R: PermissionRepository> GetPermissionUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Permission, AdminServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::PermissionNotFound)
    }
}

pub struct ListPermissionsUseCase<R: PermissionRepository> {
    pub repo: R,
}

impl<R: PermissionRepository> ListPermissionsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Permission>, AdminServiceError> {
        self.repo.list().await
    }
}

// ── UpdatePermission ─────────────────────────────────────────────────────────

/// The code is immutable: menus and clients refer to it by value.
#[derive(Default)]
pub struct UpdatePermissionInput {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub struct UpdatePermissionUseCase<R: PermissionRepository> {
    pub repo: R,
}

impl<R: PermissionRepository> UpdatePermissionUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdatePermissionInput,
    ) -> Result<Permission, AdminServiceError> {
        let mut permission = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::PermissionNotFound)?;
        if let Some(name) = input.name {
            if !non_blank(&name, 64) {
                return Err(AdminServiceError::Invalid("permission name"));
            }
            permission.name = name.trim().to_owned();
        }
        if let Some(description) = input.description {
            if !fits(&description, 255) {
                return Err(AdminServiceError::Invalid("permission description"));
            }
            permission.description = description;
        }
        permission.updated_at = Utc::now();
        self.repo.update(&permission).await?;
        Ok(permission)
    }
}

// ── DeletePermission ─────────────────────────────────────────────────────────

pub struct DeletePermissionUseCase<R: PermissionRepository> {
    pub repo: R,
}

impl<R: PermissionRepository> DeletePermissionUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        if !self.repo.delete(id).await? {
            return Err(AdminServiceError::PermissionNotFound);
        }
        tracing::info!(permission_id = %id, "permission deleted");
        Ok(())
    }
}
