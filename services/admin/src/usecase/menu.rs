use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::kind::{MenuType, Toggle};
use backoffice_domain::menu_tree::{MenuNode, build_forest};

use crate::domain::repository::MenuRepository;
use crate::domain::types::{Menu, fits, fits_opt, non_blank};
use crate::error::AdminServiceError;

fn validate_fields(menu: &Menu) -> Result<(), AdminServiceError> {
    if !non_blank(&menu.name, 64) {
        return Err(AdminServiceError::Invalid("menu name"));
    }
    if !fits(&menu.path, 255) {
        return Err(AdminServiceError::Invalid("menu path"));
    }
    if !fits_opt(menu.component.as_deref(), 255) {
        return Err(AdminServiceError::Invalid("menu component"));
    }
    if !fits(&menu.icon, 64) {
        return Err(AdminServiceError::Invalid("menu icon"));
    }
    if menu
        .permission_code
        .as_deref()
        .is_some_and(|code| !backoffice_domain::permission::validate_code(code))
    {
        return Err(AdminServiceError::Invalid("permission code"));
    }
    Ok(())
}

// ── CreateMenu ───────────────────────────────────────────────────────────────

pub struct CreateMenuInput {
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub path: Option<String>,
    pub component: Option<String>,
    pub icon: Option<String>,
    pub menu_type: MenuType,
    pub visible: Option<bool>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    pub permission_code: Option<String>,
}

pub struct CreateMenuUseCase<R: MenuRepository> {
    pub repo: R,
}

impl<R: MenuRepository> CreateMenuUseCase<R> {
    pub async fn execute(&self, input: CreateMenuInput) -> Result<Menu, AdminServiceError> {
        let now = Utc::now();
        let menu = Menu {
            id: Uuid::now_v7(),
            parent_id: input.parent_id,
            name: input.name.trim().to_owned(),
            path: input.path.unwrap_or_default(),
            component: input.component,
            icon: input.icon.unwrap_or_default(),
            menu_type: input.menu_type,
            visible: input.visible.unwrap_or(true),
            sort: input.sort.unwrap_or(0),
            status: input.status.unwrap_or(Toggle::Enabled),
            permission_code: input.permission_code,
            created_at: now,
            updated_at: now,
        };
        validate_fields(&menu)?;
        self.repo.create(&menu).await?;
        Ok(menu)
    }
}

// ── GetMenu / MenuTree ───────────────────────────────────────────────────────

pub struct GetMenuUseCase<R: MenuRepository> {
    pub repo: R,
}

impl<R: MenuRepository> GetMenuUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Menu, AdminServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::MenuNotFound)
    }
}

/// Full menu forest for the admin view, disabled menus included.
pub struct MenuTreeUseCase<R: MenuRepository> {
    pub repo: R,
}

impl<R: MenuRepository> MenuTreeUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<MenuNode>, AdminServiceError> {
        let menus = self.repo.list().await?;
        Ok(build_forest(menus.iter().map(Menu::entry)))
    }
}

// ── UpdateMenu ───────────────────────────────────────────────────────────────

/// `parent_id`: `None` keeps the parent, `Some(None)` moves the menu to the root.
#[derive(Default)]
pub struct UpdateMenuInput {
    pub parent_id: Option<Option<Uuid>>,
    pub name: Option<String>,
    pub path: Option<String>,
    pub component: Option<Option<String>>,
    pub icon: Option<String>,
    pub menu_type: Option<MenuType>,
    pub visible: Option<bool>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    pub permission_code: Option<Option<String>>,
}

pub struct UpdateMenuUseCase<R: MenuRepository> {
    pub repo: R,
}

impl<R: MenuRepository> UpdateMenuUseCase<R> {
    pub async fn execute(&self, id: Uuid, input: UpdateMenuInput) -> Result<Menu, AdminServiceError> {
        let mut menu = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::MenuNotFound)?;

        if let Some(parent_id) = input.parent_id {
            menu.parent_id = parent_id;
        }
        if let Some(name) = input.name {
            menu.name = name.trim().to_owned();
        }
        if let Some(path) = input.path {
            menu.path = path;
        }
        if let Some(component) = input.component {
            menu.component = component;
        }
        if let Some(icon) = input.icon {
            menu.icon = icon;
        }
        if let Some(menu_type) = input.menu_type {
            menu.menu_type = menu_type;
        }
        if let Some(visible) = input.visible {
            menu.visible = visible;
        }
        if let Some(sort) = input.sort {
            menu.sort = sort;
        }
        if let Some(status) = input.status {
            menu.status = status;
        }
        if let Some(permission_code) = input.permission_code {
            menu.permission_code = permission_code;
        }
        validate_fields(&menu)?;

        menu.updated_at = Utc::now();
        self.repo.update(&menu).await?;
        Ok(menu)
    }
}

// ── DeleteMenu ───────────────────────────────────────────────────────────────

pub struct DeleteMenuUseCase<R: MenuRepository> {
    pub repo: R,
}

impl<R: MenuRepository> DeleteMenuUseCase<R> {
    /// Blocked while children exist; role grants of the menu are removed.
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::MenuNotFound)?;
        if self.repo.has_children(id).await? {
            return Err(AdminServiceError::MenuHasChildren);
        }
        if !self.repo.delete(id).await? {
            return Err(AdminServiceError::MenuNotFound);
        }
        tracing::info!(menu_id = %id, "menu deleted");
        Ok(())
    }
}
