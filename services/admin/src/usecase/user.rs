use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::kind::UserStatus;
use backoffice_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{GrantRepository, RoleRepository, UserRepository};
use crate::domain::types::{Role, User, non_blank, validate_email, validate_username};
use crate::error::AdminServiceError;

// ── CreateUser ───────────────────────────────────────────────────────────────

pub struct CreateUserInput {
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub status: Option<UserStatus>,
}

pub struct CreateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> CreateUserUseCase<R> {
    pub async fn execute(&self, input: CreateUserInput) -> Result<User, AdminServiceError> {
        let username = input.username.trim();
        if !validate_username(username) {
            return Err(AdminServiceError::Invalid("username"));
        }
        if !validate_email(&input.email) {
            return Err(AdminServiceError::Invalid("email"));
        }
        if self.repo.find_by_username(username).await?.is_some() {
            return Err(AdminServiceError::UsernameTaken);
        }
        let nickname = input.nickname.unwrap_or_else(|| username.to_owned());
        if nickname.chars().count() > 64 {
            return Err(AdminServiceError::Invalid("nickname"));
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_owned(),
            email: input.email,
            nickname,
            status: input.status.unwrap_or(UserStatus::Active),
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        self.repo.create(&user).await?;
        tracing::info!(user_id = %user.id, username = %user.username, "user created");
        Ok(user)
    }
}

// ── GetUser ──────────────────────────────────────────────────────────────────

pub struct GetUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> GetUserUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<User, AdminServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)
    }
}

// ── ListUsers ────────────────────────────────────────────────────────────────

pub struct ListUsersUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> ListUsersUseCase<R> {
    pub async fn execute(
        &self,
        status: Option<UserStatus>,
        page: PageRequest,
    ) -> Result<Page<User>, AdminServiceError> {
        self.repo.list(status, page.clamped()).await
    }
}

// ── UpdateUser ───────────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateUserInput {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub status: Option<UserStatus>,
}

pub struct UpdateUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> UpdateUserUseCase<R> {
    pub async fn execute(&self, id: Uuid, input: UpdateUserInput) -> Result<User, AdminServiceError> {
        if input.email.is_none() && input.nickname.is_none() && input.status.is_none() {
            return Err(AdminServiceError::Invalid("no fields to update"));
        }
        let mut user = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;

        if let Some(email) = input.email {
            if !validate_email(&email) {
                return Err(AdminServiceError::Invalid("email"));
            }
            user.email = email;
        }
        if let Some(nickname) = input.nickname {
            if !non_blank(&nickname, 64) {
                return Err(AdminServiceError::Invalid("nickname"));
            }
            user.nickname = nickname.trim().to_owned();
        }
        if let Some(status) = input.status {
            user.status = status;
        }
        user.updated_at = Utc::now();
        self.repo.update(&user).await?;
        Ok(user)
    }
}

// ── DeleteUser ───────────────────────────────────────────────────────────────

pub struct DeleteUserUseCase<R: UserRepository> {
    pub repo: R,
}

impl<R: UserRepository> DeleteUserUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        if !self.repo.soft_delete(id, Utc::now()).await? {
            return Err(AdminServiceError::UserNotFound);
        }
        tracing::info!(user_id = %id, "user soft-deleted");
        Ok(())
    }
}

// ── User role grants ─────────────────────────────────────────────────────────

pub struct ListUserRolesUseCase<U: UserRepository, R: RoleRepository> {
    pub users: U,
    pub roles: R,
}

impl<U: UserRepository, R: RoleRepository> ListUserRolesUseCase<U, R> {
    pub async fn execute(&self, user_id: Uuid) -> Result<Vec<Role>, AdminServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;
        let mut roles = self.roles.list_for_user(user_id).await?;
        roles.sort_by(|a, b| a.sort.cmp(&b.sort).then_with(|| a.name.cmp(&b.name)));
        Ok(roles)
    }
}

pub struct GrantUserRoleUseCase<U: UserRepository, R: RoleRepository, G: GrantRepository> {
    pub users: U,
    pub roles: R,
    pub grants: G,
}

impl<U: UserRepository, R: RoleRepository, G: GrantRepository> GrantUserRoleUseCase<U, R, G> {
    /// Idempotent: granting a role the user already holds succeeds.
    pub async fn execute(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AdminServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;
        self.roles
            .find_by_id(role_id, false)
            .await?
            .ok_or(AdminServiceError::RoleNotFound)?;
        if self.grants.grant_user_role(user_id, role_id).await? {
            tracing::info!(%user_id, %role_id, "role granted to user");
        }
        Ok(())
    }
}

pub struct RevokeUserRoleUseCase<U: UserRepository, G: GrantRepository> {
    pub users: U,
    pub grants: G,
}

impl<U: UserRepository, G: GrantRepository> RevokeUserRoleUseCase<U, G> {
    /// Idempotent: revoking a role the user does not hold succeeds.
    pub async fn execute(&self, user_id: Uuid, role_id: Uuid) -> Result<(), AdminServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;
        if self.grants.revoke_user_role(user_id, role_id).await? {
            tracing::info!(%user_id, %role_id, "role revoked from user");
        }
        Ok(())
    }
}
