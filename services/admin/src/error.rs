use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use backoffice_core::error::error_response;
use backoffice_domain::menu_tree::ParentError;

/// Admin service error variants.
#[derive(Debug, thiserror::Error)]
pub enum AdminServiceError {
    #[error("user not found")]
    UserNotFound,
    #[error("role not found")]
    RoleNotFound,
    #[error("permission not found")]
    PermissionNotFound,
    #[error("menu not found")]
    MenuNotFound,
    #[error("notification not found")]
    NotificationNotFound,
    #[error("dictionary entry not found")]
    DictionaryNotFound,
    #[error("alert rule not found")]
    AlertRuleNotFound,
    #[error("email template not found")]
    EmailTemplateNotFound,
    #[error("username already taken")]
    UsernameTaken,
    #[error("role name already taken")]
    RoleNameTaken,
    #[error("role code already taken")]
    RoleCodeTaken,
    #[error("permission code already taken")]
    PermissionCodeTaken,
    #[error("dictionary code already taken")]
    DictionaryCodeTaken,
    #[error("email template code already taken")]
    TemplateCodeTaken,
    #[error("menu cannot be its own ancestor")]
    MenuCycle,
    #[error("menu has children")]
    MenuHasChildren,
    #[error("dictionary entry is referenced as a parent")]
    DictionaryInUse,
    #[error("invalid input: {0}")]
    Invalid(&'static str),
    #[error("unauthorized")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl AdminServiceError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UserNotFound => "USER_NOT_FOUND",
            Self::RoleNotFound => "ROLE_NOT_FOUND",
            Self::PermissionNotFound => "PERMISSION_NOT_FOUND",
            Self::MenuNotFound => "MENU_NOT_FOUND",
            Self::NotificationNotFound => "NOTIFICATION_NOT_FOUND",
            Self::DictionaryNotFound => "DICTIONARY_NOT_FOUND",
            Self::AlertRuleNotFound => "ALERT_RULE_NOT_FOUND",
            Self::EmailTemplateNotFound => "EMAIL_TEMPLATE_NOT_FOUND",
            Self::UsernameTaken => "USERNAME_TAKEN",
            Self::RoleNameTaken => "ROLE_NAME_TAKEN",
            Self::RoleCodeTaken => "ROLE_CODE_TAKEN",
            Self::PermissionCodeTaken => "PERMISSION_CODE_TAKEN",
            Self::DictionaryCodeTaken => "DICTIONARY_CODE_TAKEN",
            Self::TemplateCodeTaken => "TEMPLATE_CODE_TAKEN",
            Self::MenuCycle => "MENU_CYCLE",
            Self::MenuHasChildren => "MENU_HAS_CHILDREN",
            Self::DictionaryInUse => "DICTIONARY_IN_USE",
            Self::Invalid(_) => "INVALID_INPUT",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::UserNotFound
            | Self::RoleNotFound
            | Self::PermissionNotFound
            | Self::MenuNotFound
            | Self::NotificationNotFound
            | Self::DictionaryNotFound
            | Self::AlertRuleNotFound
            | Self::EmailTemplateNotFound => StatusCode::NOT_FOUND,
            Self::UsernameTaken
            | Self::RoleNameTaken
            | Self::RoleCodeTaken
            | Self::PermissionCodeTaken
            | Self::DictionaryCodeTaken
            | Self::TemplateCodeTaken
            | Self::MenuCycle
            | Self::MenuHasChildren
            | Self::DictionaryInUse => StatusCode::CONFLICT,
            Self::Invalid(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ParentError> for AdminServiceError {
    fn from(err: ParentError) -> Self {
        match err {
            ParentError::UnknownParent => Self::MenuNotFound,
            ParentError::Cycle => Self::MenuCycle,
        }
    }
}

impl IntoResponse for AdminServiceError {
    fn into_response(self) -> Response {
        if let Self::Internal(ref e) = self {
            tracing::error!(error = %e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), self.to_string())
    }
}
