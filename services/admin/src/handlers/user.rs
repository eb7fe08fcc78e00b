use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::kind::UserStatus;
use backoffice_domain::pagination::{Page, PageRequest};
use backoffice_domain::permission::codes;

use crate::domain::types::User;
use crate::error::AdminServiceError;
use crate::handlers::require_permission;
use crate::handlers::role::RoleResponse;
use crate::state::AppState;
use crate::usecase::user::{
    CreateUserInput, CreateUserUseCase, DeleteUserUseCase, GetUserUseCase, GrantUserRoleUseCase,
    ListUserRolesUseCase, ListUsersUseCase, RevokeUserRoleUseCase, UpdateUserInput,
    UpdateUserUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nickname: String,
    pub status: UserStatus,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            nickname: user.nickname,
            status: user.status,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

// ── GET /users ───────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct UserListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub status: Option<UserStatus>,
}

pub async fn get_users(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> Result<Json<Page<UserResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::USER_READ).await?;
    let usecase = ListUsersUseCase {
        repo: state.user_repo(),
    };
    let page = usecase
        .execute(
            query.status,
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(page.map(UserResponse::from)))
}

// ── POST /users ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub nickname: Option<String>,
    pub status: Option<UserStatus>,
}

pub async fn create_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::USER_MANAGE).await?;
    let usecase = CreateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(CreateUserInput {
            username: body.username,
            email: body.email,
            nickname: body.nickname,
            status: body.status,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

// ── GET /users/{id} ──────────────────────────────────────────────────────────

pub async fn get_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::USER_READ).await?;
    let usecase = GetUserUseCase {
        repo: state.user_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /users/{id} ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub status: Option<UserStatus>,
}

pub async fn update_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::USER_MANAGE).await?;
    let usecase = UpdateUserUseCase {
        repo: state.user_repo(),
    };
    let user = usecase
        .execute(
            id,
            UpdateUserInput {
                email: body.email,
                nickname: body.nickname,
                status: body.status,
            },
        )
        .await?;
    Ok(Json(user.into()))
}

// ── DELETE /users/{id} ───────────────────────────────────────────────────────

pub async fn delete_user(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::USER_MANAGE).await?;
    let usecase = DeleteUserUseCase {
        repo: state.user_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── GET /users/{id}/roles ────────────────────────────────────────────────────

pub async fn get_user_roles(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<RoleResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::USER_READ).await?;
    let usecase = ListUserRolesUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
    };
    let roles = usecase.execute(id).await?;
    Ok(Json(roles.into_iter().map(RoleResponse::from).collect()))
}

// ── PUT /users/{id}/roles/{role_id} ──────────────────────────────────────────

pub async fn grant_user_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, role_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::USER_MANAGE).await?;
    let usecase = GrantUserRoleUseCase {
        users: state.user_repo(),
        roles: state.role_repo(),
        grants: state.grant_repo(),
    };
    usecase.execute(id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── DELETE /users/{id}/roles/{role_id} ───────────────────────────────────────

pub async fn revoke_user_role(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path((id, role_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::USER_MANAGE).await?;
    let usecase = RevokeUserRoleUseCase {
        users: state.user_repo(),
        grants: state.grant_repo(),
    };
    usecase.execute(id, role_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
