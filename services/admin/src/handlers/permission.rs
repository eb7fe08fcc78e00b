use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::permission::codes;

use crate::domain::types::Permission;
use crate::error::AdminServiceError;
use crate::handlers::require_permission;
use crate::state::AppState;
use crate::usecase::permission::{
    CreatePermissionInput, CreatePermissionUseCase, DeletePermissionUseCase,
    GetPermissionUseCase, ListPermissionsUseCase, UpdatePermissionInput, UpdatePermissionUseCase,
};

#[derive(Serialize)]
pub struct PermissionResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: String,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Permission> for PermissionResponse {
    fn from(permission: Permission) -> Self {
        Self {
            id: permission.id,
            code: permission.code,
            name: permission.name,
            description: permission.description,
            created_at: permission.created_at,
            updated_at: permission.updated_at,
        }
    }
}

// ── GET /permissions ─────────────────────────────────────────────────────────

pub async fn get_permissions(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<PermissionResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::PERMISSION_READ).await?;
    let usecase = ListPermissionsUseCase {
        repo: state.permission_repo(),
    };
    let permissions = usecase.execute().await?;
    Ok(Json(
        permissions
            .into_iter()
            .map(PermissionResponse::from)
            .collect(),
    ))
}

// ── POST /permissions ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreatePermissionRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
}

pub async fn create_permission(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreatePermissionRequest>,
) -> Result<(StatusCode, Json<PermissionResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::PERMISSION_MANAGE).await?;
    let usecase = CreatePermissionUseCase {
        repo: state.permission_repo(),
    };
    let permission = usecase
        .execute(CreatePermissionInput {
            code: body.code,
            name: body.name,
            description: body.description,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(permission.into())))
}

// ── GET /permissions/{id} ────────────────────────────────────────────────────

pub async fn get_permission(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<PermissionResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::PERMISSION_READ).await?;
    let usecase = GetPermissionUseCase {
        repo: state.permission_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /permissions/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdatePermissionRequest {
    pub name: Option<String>,
    pub description: Option<String>,
}

pub async fn update_permission(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdatePermissionRequest>,
) -> Result<Json<PermissionResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::PERMISSION_MANAGE).await?;
    let usecase = UpdatePermissionUseCase {
        repo: state.permission_repo(),
    };
    let permission = usecase
        .execute(
            id,
            UpdatePermissionInput {
                name: body.name,
                description: body.description,
            },
        )
        .await?;
    Ok(Json(permission.into()))
}

// ── DELETE /permissions/{id} ─────────────────────────────────────────────────

pub async fn delete_permission(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::PERMISSION_MANAGE).await?;
    let usecase = DeletePermissionUseCase {
        repo: state.permission_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
