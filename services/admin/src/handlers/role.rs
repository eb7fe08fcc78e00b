use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::kind::RoleStatus;
use backoffice_domain::permission::codes;

use crate::domain::types::Role;
use crate::error::AdminServiceError;
use crate::handlers::menu::MenuResponse;
use crate::handlers::permission::PermissionResponse;
use crate::handlers::require_permission;
use crate::state::AppState;
use crate::usecase::role::{
    CreateRoleInput, CreateRoleUseCase, DeleteRoleUseCase, GetRoleUseCase, GrantRoleMenuUseCase,
    GrantRolePermissionUseCase, ListRoleMenusUseCase, ListRolePermissionsUseCase,
    ListRolesUseCase, RestoreRoleUseCase, RevokeRoleMenuUseCase, RevokeRolePermissionUseCase,
    SetRoleStatusUseCase, UpdateRoleInput, UpdateRoleUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RoleResponse {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
    pub status: RoleStatus,
    pub sort: i32,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms_opt")]
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<Role> for RoleResponse {
    fn from(role: Role) -> Self {
        Self {
            id: role.id,
            name: role.name,
            code: role.code,
            description: role.description,
            status: role.status,
            sort: role.sort,
            created_at: role.created_at,
            updated_at: role.updated_at,
            deleted_at: role.deleted_at,
        }
    }
}

// ── GET /roles ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RoleListQuery {
    #[serde(default)]
    pub include_deleted: bool,
}

pub async fn get_roles(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<RoleListQuery>,
) -> Result<Json<Vec<RoleResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_READ).await?;
    let usecase = ListRolesUseCase {
        repo: state.role_repo(),
    };
    let roles = usecase.execute(query.include_deleted).await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

// ── POST /roles ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateRoleRequest {
    pub name: String,
    pub code: String,
    pub description: Option<String>,
    pub status: Option<RoleStatus>,
    pub sort: Option<i32>,
}

pub async fn create_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateRoleRequest>,
) -> Result<(StatusCode, Json<RoleResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = CreateRoleUseCase {
        repo: state.role_repo(),
    };
    let role = usecase
        .execute(CreateRoleInput {
            name: body.name,
            code: body.code,
            description: body.description,
            status: body.status,
            sort: body.sort,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(role.into())))
}

// ── GET /roles/{id} ──────────────────────────────────────────────────────────

pub async fn get_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_READ).await?;
    let usecase = GetRoleUseCase {
        repo: state.role_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /roles/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateRoleRequest {
    pub name: Option<String>,
    pub code: Option<String>,
    pub description: Option<String>,
    pub sort: Option<i32>,
}

pub async fn update_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateRoleRequest>,
) -> Result<Json<RoleResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = UpdateRoleUseCase {
        repo: state.role_repo(),
    };
    let role = usecase
        .execute(
            id,
            UpdateRoleInput {
                name: body.name,
                code: body.code,
                description: body.description,
                sort: body.sort,
            },
        )
        .await?;
    Ok(Json(role.into()))
}

// ── PUT /roles/{id}/status ───────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct SetRoleStatusRequest {
    pub status: RoleStatus,
}

pub async fn set_role_status(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SetRoleStatusRequest>,
) -> Result<Json<RoleResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = SetRoleStatusUseCase {
        repo: state.role_repo(),
    };
    Ok(Json(usecase.execute(id, body.status).await?.into()))
}

// ── DELETE /roles/{id} ───────────────────────────────────────────────────────

pub async fn delete_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = DeleteRoleUseCase {
        repo: state.role_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /roles/{id}/restore ─────────────────────────────────────────────────

pub async fn restore_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RoleResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = RestoreRoleUseCase {
        repo: state.role_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── /roles/{id}/permissions ──────────────────────────────────────────────────

pub async fn get_role_permissions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<PermissionResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_READ).await?;
    let usecase = ListRolePermissionsUseCase {
        roles: state.role_repo(),
        permissions: state.permission_repo(),
    };
    let permissions = usecase.execute(id).await?;
    Ok(Json(
        permissions
            .into_iter()
            .map(PermissionResponse::from)
            .collect(),
    ))
}

pub async fn grant_role_permission(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, permission_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = GrantRolePermissionUseCase {
        roles: state.role_repo(),
        permissions: state.permission_repo(),
        grants: state.grant_repo(),
    };
    usecase.execute(id, permission_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_role_permission(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, permission_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = RevokeRolePermissionUseCase {
        roles: state.role_repo(),
        grants: state.grant_repo(),
    };
    usecase.execute(id, permission_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /roles/{id}/menus ────────────────────────────────────────────────────────

pub async fn get_role_menus(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<MenuResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_READ).await?;
    let usecase = ListRoleMenusUseCase {
        roles: state.role_repo(),
        menus: state.menu_repo(),
    };
    let menus = usecase.execute(id).await?;
    Ok(Json(menus.into_iter().map(MenuResponse::from).collect()))
}

pub async fn grant_role_menu(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, menu_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = GrantRoleMenuUseCase {
        roles: state.role_repo(),
        menus: state.menu_repo(),
        grants: state.grant_repo(),
    };
    usecase.execute(id, menu_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn revoke_role_menu(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, menu_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::ROLE_MANAGE).await?;
    let usecase = RevokeRoleMenuUseCase {
        roles: state.role_repo(),
        grants: state.grant_repo(),
    };
    usecase.execute(id, menu_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
