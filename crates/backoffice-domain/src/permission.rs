//! Effective authorization of a principal.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::menu_tree::MenuNode;

/// Permission code that satisfies every check.
pub const WILDCARD: &str = "*";

/// Permission codes checked by the admin endpoints.
pub mod codes {
    pub const USER_READ: &str = "user:read";
    pub const USER_MANAGE: &str = "user:manage";
    pub const ROLE_READ: &str = "role:read";
    pub const ROLE_MANAGE: &str = "role:manage";
    pub const PERMISSION_READ: &str = "permission:read";
    pub const PERMISSION_MANAGE: &str = "permission:manage";
    pub const MENU_READ: &str = "menu:read";
    pub const MENU_MANAGE: &str = "menu:manage";
    pub const DICT_READ: &str = "dict:read";
    pub const DICT_MANAGE: &str = "dict:manage";
    pub const NOTIFICATION_SEND: &str = "notification:send";
    pub const MONITOR_READ: &str = "monitor:read";
    pub const MONITOR_WRITE: &str = "monitor:write";
    pub const ALERT_READ: &str = "alert:read";
    pub const ALERT_MANAGE: &str = "alert:manage";
    pub const TEMPLATE_READ: &str = "template:read";
    pub const TEMPLATE_MANAGE: &str = "template:manage";

    pub const ALL: &[&str] = &[
        USER_READ,
        USER_MANAGE,
        ROLE_READ,
        ROLE_MANAGE,
        PERMISSION_READ,
        PERMISSION_MANAGE,
        MENU_READ,
        MENU_MANAGE,
        DICT_READ,
        DICT_MANAGE,
        NOTIFICATION_SEND,
        MONITOR_READ,
        MONITOR_WRITE,
        ALERT_READ,
        ALERT_MANAGE,
        TEMPLATE_READ,
        TEMPLATE_MANAGE,
    ];
}

/// Role reference carried in the authorization payload.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct RoleRef {
    pub code: String,
    pub name: String,
}

/// Everything a principal can reach through its active roles.
///
/// An empty value is a valid result: authenticated but unauthorized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Authorization {
    pub roles: Vec<RoleRef>,
    pub permissions: BTreeSet<String>,
    pub menus: Vec<MenuNode>,
}

impl Authorization {
    pub fn is_empty(&self) -> bool {
        self.roles.is_empty() && self.permissions.is_empty() && self.menus.is_empty()
    }

    /// `true` if `code` was granted, directly or through [`WILDCARD`].
    pub fn allows(&self, code: &str) -> bool {
        self.permissions.contains(WILDCARD) || self.permissions.contains(code)
    }
}

/// Validate a role or permission code: 1–64 chars of `[a-z0-9_:*-]`.
pub fn validate_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 64
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | ':' | '-' | '*'))
}
