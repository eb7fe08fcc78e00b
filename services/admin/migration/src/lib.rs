use sea_orm_migration::prelude::*;

mod m20261001_000001_create_users;
mod m20261001_000002_create_roles;
mod m20261001_000003_create_permissions;
mod m20261001_000004_create_menus;
mod m20261001_000005_create_user_roles;
mod m20261001_000006_create_role_permissions;
mod m20261001_000007_create_role_menus;
mod m20261001_000008_create_notifications;
mod m20261001_000009_create_dictionaries;
mod m20261001_000010_create_monitor_metrics;
mod m20261001_000011_create_alert_rules;
mod m20261001_000012_create_email_templates;
mod m20261001_000013_seed_access_control;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20261001_000001_create_users::Migration),
            Box::new(m20261001_000002_create_roles::Migration),
            Box::new(m20261001_000003_create_permissions::Migration),
            Box::new(m20261001_000004_create_menus::Migration),
            Box::new(m20261001_000005_create_user_roles::Migration),
            Box::new(m20261001_000006_create_role_permissions::Migration),
            Box::new(m20261001_000007_create_role_menus::Migration),
            Box::new(m20261001_000008_create_notifications::Migration),
            Box::new(m20261001_000009_create_dictionaries::Migration),
            Box::new(m20261001_000010_create_monitor_metrics::Migration),
            Box::new(m20261001_000011_create_alert_rules::Migration),
            Box::new(m20261001_000012_create_email_templates::Migration),
            Box::new(m20261001_000013_seed_access_control::Migration),
        ]
    }
}
