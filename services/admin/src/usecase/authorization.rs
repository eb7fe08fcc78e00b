//! Effective authorization of a user: roles → permission codes and menu forest.

use std::collections::BTreeSet;

use uuid::Uuid;

use backoffice_domain::kind::Toggle;
use backoffice_domain::menu_tree::build_forest;
use backoffice_domain::permission::{Authorization, RoleRef};

use crate::domain::repository::{
    MenuRepository, PermissionRepository, RoleRepository, UserRepository,
};
use crate::error::AdminServiceError;

// ── ResolveAuthorization ─────────────────────────────────────────────────────

/// Resolve what a user can reach through its active, non-deleted roles.
///
/// Read-only. The result depends only on the stored grants, never on the order
/// they were inserted, so callers may cache it until the next grant change.
///
/// - Unknown or soft-deleted user: `UserNotFound`.
/// - No effective roles: an empty [`Authorization`], not an error.
/// - Disabled menus are dropped; a granted menu whose parent is not reachable
///   becomes a root.
pub struct ResolveAuthorizationUseCase<U, R, P, M>
where
    U: UserRepository,
    R: RoleRepository,
    P: PermissionRepository,
    M: MenuRepository,
{
    pub users: U,
    pub roles: R,
    pub permissions: P,
    pub menus: M,
}

impl<U, R, P, M> ResolveAuthorizationUseCase<U, R, P, M>
where
    U: UserRepository,
    R: RoleRepository,
    P: PermissionRepository,
    M: MenuRepository,
{
    pub async fn execute(&self, user_id: Uuid) -> Result<Authorization, AdminServiceError> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or(AdminServiceError::UserNotFound)?;

        let mut roles: Vec<_> = self
            .roles
            .list_for_user(user_id)
            .await?
            .into_iter()
            .filter(|role| role.is_effective())
            .collect();
        if roles.is_empty() {
            return Ok(Authorization::default());
        }
        roles.sort_by(|a, b| a.code.cmp(&b.code).then(a.id.cmp(&b.id)));
        roles.dedup_by_key(|role| role.id);
        let role_ids: Vec<Uuid> = roles.iter().map(|role| role.id).collect();

        let permissions: BTreeSet<String> = self
            .permissions
            .codes_for_roles(&role_ids)
            .await?
            .into_iter()
            .collect();

        let menus = self
            .menus
            .list_for_roles(&role_ids)
            .await?
            .into_iter()
            .filter(|menu| menu.status == Toggle::Enabled)
            .map(|menu| menu.entry());

        Ok(Authorization {
            roles: roles
                .into_iter()
                .map(|role| RoleRef {
                    code: role.code,
                    name: role.name,
                })
                .collect(),
            permissions,
            menus: build_forest(menus),
        })
    }

    /// Resolve and require `code`. A caller whose account no longer exists is
    /// `Unauthorized`; one lacking the code is `Forbidden`.
    pub async fn require(
        &self,
        user_id: Uuid,
        code: &str,
    ) -> Result<Authorization, AdminServiceError> {
        let authorization = match self.execute(user_id).await {
            Ok(authorization) => authorization,
            Err(AdminServiceError::UserNotFound) => return Err(AdminServiceError::Unauthorized),
            Err(e) => return Err(e),
        };
        if !authorization.allows(code) {
            tracing::debug!(%user_id, code, "permission denied");
            return Err(AdminServiceError::Forbidden);
        }
        Ok(authorization)
    }
}
