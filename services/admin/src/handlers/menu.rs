use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::kind::{MenuType, Toggle};
use backoffice_domain::menu_tree::MenuNode;
use backoffice_domain::permission::codes;

use crate::domain::types::Menu;
use crate::error::AdminServiceError;
use crate::handlers::{nullable, require_permission};
use crate::state::AppState;
use crate::usecase::menu::{
    CreateMenuInput, CreateMenuUseCase, DeleteMenuUseCase, GetMenuUseCase, MenuTreeUseCase,
    UpdateMenuInput, UpdateMenuUseCase,
};

#[derive(Serialize)]
pub struct MenuResponse {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub path: String,
    pub component: Option<String>,
    pub icon: String,
    #[serde(rename = "type")]
    pub menu_type: MenuType,
    pub visible: bool,
    pub sort: i32,
    pub status: Toggle,
    pub permission_code: Option<String>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Menu> for MenuResponse {
    fn from(menu: Menu) -> Self {
        Self {
            id: menu.id,
            parent_id: menu.parent_id,
            name: menu.name,
            path: menu.path,
            component: menu.component,
            icon: menu.icon,
            menu_type: menu.menu_type,
            visible: menu.visible,
            sort: menu.sort,
            status: menu.status,
            permission_code: menu.permission_code,
            created_at: menu.created_at,
            updated_at: menu.updated_at,
        }
    }
}

// ── GET /menus ───────────────────────────────────────────────────────────────

/// Full menu tree, every status included.
pub async fn get_menus(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<MenuNode>>, AdminServiceError> {
    require_permission(&state, &identity, codes::MENU_READ).await?;
    let usecase = MenuTreeUseCase {
        repo: state.menu_repo(),
    };
    Ok(Json(usecase.execute().await?))
}

// ── POST /menus ──────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateMenuRequest {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub path: Option<String>,
    pub component: Option<String>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub menu_type: MenuType,
    pub visible: Option<bool>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    pub permission_code: Option<String>,
}

pub async fn create_menu(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateMenuRequest>,
) -> Result<(StatusCode, Json<MenuResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::MENU_MANAGE).await?;
    let usecase = CreateMenuUseCase {
        repo: state.menu_repo(),
    };
    let menu = usecase
        .execute(CreateMenuInput {
            parent_id: body.parent_id,
            name: body.name,
            path: body.path,
            component: body.component,
            icon: body.icon,
            menu_type: body.menu_type,
            visible: body.visible,
            sort: body.sort,
            status: body.status,
            permission_code: body.permission_code,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(menu.into())))
}

// ── GET /menus/{id} ──────────────────────────────────────────────────────────

pub async fn get_menu(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<MenuResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::MENU_READ).await?;
    let usecase = GetMenuUseCase {
        repo: state.menu_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /menus/{id} ────────────────────────────────────────────────────────

/// `parent_id`, `component` and `permission_code` accept `null` to clear.
#[derive(Deserialize)]
pub struct UpdateMenuRequest {
    #[serde(default, deserialize_with = "nullable")]
    pub parent_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub path: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub component: Option<Option<String>>,
    pub icon: Option<String>,
    #[serde(rename = "type")]
    pub menu_type: Option<MenuType>,
    pub visible: Option<bool>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    #[serde(default, deserialize_with = "nullable")]
    pub permission_code: Option<Option<String>>,
}

pub async fn update_menu(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateMenuRequest>,
) -> Result<Json<MenuResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::MENU_MANAGE).await?;
    let usecase = UpdateMenuUseCase {
        repo: state.menu_repo(),
    };
    let menu = usecase
        .execute(
            id,
            UpdateMenuInput {
                parent_id: body.parent_id,
                name: body.name,
                path: body.path,
                component: body.component,
                icon: body.icon,
                menu_type: body.menu_type,
                visible: body.visible,
                sort: body.sort,
                status: body.status,
                permission_code: body.permission_code,
            },
        )
        .await?;
    Ok(Json(menu.into()))
}

// ── DELETE /menus/{id} ───────────────────────────────────────────────────────

pub async fn delete_menu(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::MENU_MANAGE).await?;
    let usecase = DeleteMenuUseCase {
        repo: state.menu_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
