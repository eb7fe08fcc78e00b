use sea_orm::DatabaseConnection;

use crate::infra::db::{
    DbAlertRuleRepository, DbDictionaryRepository, DbEmailTemplateRepository, DbGrantRepository,
    DbMenuRepository, DbMetricRepository, DbNotificationRepository, DbPermissionRepository,
    DbRoleRepository, DbUserRepository,
};
use crate::usecase::authorization::ResolveAuthorizationUseCase;

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
}

pub type Resolver = ResolveAuthorizationUseCase<
    DbUserRepository,
    DbRoleRepository,
    DbPermissionRepository,
    DbMenuRepository,
>;

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn role_repo(&self) -> DbRoleRepository {
        DbRoleRepository {
            db: self.db.clone(),
        }
    }

    pub fn permission_repo(&self) -> DbPermissionRepository {
        DbPermissionRepository {
            db: self.db.clone(),
        }
    }

    pub fn menu_repo(&self) -> DbMenuRepository {
        DbMenuRepository {
            db: self.db.clone(),
        }
    }

    pub fn grant_repo(&self) -> DbGrantRepository {
        DbGrantRepository {
            db: self.db.clone(),
        }
    }

    pub fn notification_repo(&self) -> DbNotificationRepository {
        DbNotificationRepository {
            db: self.db.clone(),
        }
    }

    pub fn dictionary_repo(&self) -> DbDictionaryRepository {
        DbDictionaryRepository {
            db: self.db.clone(),
        }
    }

    pub fn metric_repo(&self) -> DbMetricRepository {
        DbMetricRepository {
            db: self.db.clone(),
        }
    }

    pub fn alert_rule_repo(&self) -> DbAlertRuleRepository {
        DbAlertRuleRepository {
            db: self.db.clone(),
        }
    }

    pub fn email_template_repo(&self) -> DbEmailTemplateRepository {
        DbEmailTemplateRepository {
            db: self.db.clone(),
        }
    }

    pub fn resolver(&self) -> Resolver {
        ResolveAuthorizationUseCase {
            users: self.user_repo(),
            roles: self.role_repo(),
            permissions: self.permission_repo(),
            menus: self.menu_repo(),
        }
    }
}
