//! Permission catalogue, `super_admin` role, default menu tree and bootstrap
//! `admin` account.

use sea_orm_migration::prelude::*;

use backoffice_domain::permission::{WILDCARD, codes};

#[derive(DeriveMigrationName)]
pub struct Migration;

const CATALOGUE: &[(&str, &str)] = &[
    (WILDCARD, "All permissions"),
    (codes::USER_READ, "View users"),
    (codes::USER_MANAGE, "Manage users"),
    (codes::ROLE_READ, "View roles"),
    (codes::ROLE_MANAGE, "Manage roles"),
    (codes::PERMISSION_READ, "View permissions"),
    (codes::PERMISSION_MANAGE, "Manage permissions"),
    (codes::MENU_READ, "View menus"),
    (codes::MENU_MANAGE, "Manage menus"),
    (codes::DICT_READ, "View dictionaries"),
    (codes::DICT_MANAGE, "Manage dictionaries"),
    (codes::NOTIFICATION_SEND, "Send notifications"),
    (codes::MONITOR_READ, "View metrics"),
    (codes::MONITOR_WRITE, "Report metrics"),
    (codes::ALERT_READ, "View alert rules"),
    (codes::ALERT_MANAGE, "Manage alert rules"),
    (codes::TEMPLATE_READ, "View email templates"),
    (codes::TEMPLATE_MANAGE, "Manage email templates"),
];

const SUPER_ADMIN_ROLE_ID: &str = "0192f000-0000-7000-8000-000000000001";
const ADMIN_USER_ID: &str = "0192f000-0000-7000-8000-000000000002";

const SEED_MENUS: &str = r#"
INSERT INTO menus (id, parent_id, name, path, component, icon, type, visible, sort, status, permission_code) VALUES
  ('0192f000-0000-7000-8000-000000000100', NULL, 'System', '/system', NULL, 'settings', 'directory', true, 1, 'enabled', NULL),
  ('0192f000-0000-7000-8000-000000000101', '0192f000-0000-7000-8000-000000000100', 'Users', '/system/users', 'system/users/index', 'user', 'menu', true, 1, 'enabled', 'user:read'),
  ('0192f000-0000-7000-8000-000000000102', '0192f000-0000-7000-8000-000000000100', 'Roles', '/system/roles', 'system/roles/index', 'team', 'menu', true, 2, 'enabled', 'role:read'),
  ('0192f000-0000-7000-8000-000000000103', '0192f000-0000-7000-8000-000000000100', 'Permissions', '/system/permissions', 'system/permissions/index', 'safety', 'menu', true, 3, 'enabled', 'permission:read'),
  ('0192f000-0000-7000-8000-000000000104', '0192f000-0000-7000-8000-000000000100', 'Menus', '/system/menus', 'system/menus/index', 'menu', 'menu', true, 4, 'enabled', 'menu:read'),
  ('0192f000-0000-7000-8000-000000000105', '0192f000-0000-7000-8000-000000000100', 'Dictionaries', '/system/dictionaries', 'system/dictionaries/index', 'book', 'menu', true, 5, 'enabled', 'dict:read'),
  ('0192f000-0000-7000-8000-000000000200', NULL, 'Monitoring', '/monitor', NULL, 'dashboard', 'directory', true, 2, 'enabled', NULL),
  ('0192f000-0000-7000-8000-000000000201', '0192f000-0000-7000-8000-000000000200', 'Metrics', '/monitor/metrics', 'monitor/metrics/index', 'line-chart', 'menu', true, 1, 'enabled', 'monitor:read'),
  ('0192f000-0000-7000-8000-000000000202', '0192f000-0000-7000-8000-000000000200', 'Alert rules', '/monitor/alert-rules', 'monitor/alert-rules/index', 'alert', 'menu', true, 2, 'enabled', 'alert:read'),
  ('0192f000-0000-7000-8000-000000000300', NULL, 'Messages', '/messages', NULL, 'mail', 'directory', true, 3, 'enabled', NULL),
  ('0192f000-0000-7000-8000-000000000301', '0192f000-0000-7000-8000-000000000300', 'Notifications', '/messages/notifications', 'messages/notifications/index', 'bell', 'menu', true, 1, 'enabled', NULL),
  ('0192f000-0000-7000-8000-000000000302', '0192f000-0000-7000-8000-000000000300', 'Email templates', '/messages/email-templates', 'messages/email-templates/index', 'file-text', 'menu', true, 2, 'enabled', 'template:read')
ON CONFLICT (id) DO NOTHING
"#;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut permissions = Query::insert()
            .into_table(Permissions::Table)
            .columns([
                Permissions::Id,
                Permissions::Code,
                Permissions::Name,
                Permissions::Description,
            ])
            .on_conflict(OnConflict::column(Permissions::Code).do_nothing().to_owned())
            .to_owned();
        for (code, name) in CATALOGUE {
            permissions.values_panic([
                Expr::cust("gen_random_uuid()"),
                (*code).into(),
                (*name).into(),
                "".into(),
            ]);
        }
        manager.exec_stmt(permissions).await?;

        let db = manager.get_connection();
        db.execute_unprepared(&format!(
            "INSERT INTO roles (id, name, code, description, status, sort) \
             VALUES ('{SUPER_ADMIN_ROLE_ID}', 'Super administrator', 'super_admin', \
                     'Holds every permission', 'active', 0) \
             ON CONFLICT (id) DO NOTHING"
        ))
        .await?;
        db.execute_unprepared(&format!(
            "INSERT INTO role_permissions (id, role_id, permission_id) \
             SELECT gen_random_uuid(), '{SUPER_ADMIN_ROLE_ID}', id FROM permissions \
             WHERE code = '{WILDCARD}' \
             ON CONFLICT (role_id, permission_id) DO NOTHING"
        ))
        .await?;

        db.execute_unprepared(SEED_MENUS).await?;
        db.execute_unprepared(&format!(
            "INSERT INTO role_menus (id, role_id, menu_id) \
             SELECT gen_random_uuid(), '{SUPER_ADMIN_ROLE_ID}', id FROM menus \
             ON CONFLICT (role_id, menu_id) DO NOTHING"
        ))
        .await?;

        db.execute_unprepared(&format!(
            "INSERT INTO users (id, username, email, nickname, status) \
             VALUES ('{ADMIN_USER_ID}', 'admin', 'admin@localhost', 'Administrator', 'active') \
             ON CONFLICT (id) DO NOTHING"
        ))
        .await?;
        db.execute_unprepared(&format!(
            "INSERT INTO user_roles (id, user_id, role_id) \
             VALUES (gen_random_uuid(), '{ADMIN_USER_ID}', '{SUPER_ADMIN_ROLE_ID}') \
             ON CONFLICT (user_id, role_id) DO NOTHING"
        ))
        .await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(&format!("DELETE FROM users WHERE id = '{ADMIN_USER_ID}'"))
            .await?;
        db.execute_unprepared(&format!(
            "DELETE FROM roles WHERE id = '{SUPER_ADMIN_ROLE_ID}'"
        ))
        .await?;
        // Children first: the parent FK restricts deletes.
        db.execute_unprepared(
            "DELETE FROM menus WHERE id::text LIKE '0192f000-0000-7000-8000-000000000%' \
             AND parent_id IS NOT NULL",
        )
        .await?;
        db.execute_unprepared(
            "DELETE FROM menus WHERE id::text LIKE '0192f000-0000-7000-8000-000000000%'",
        )
        .await?;

        let mut delete = Query::delete()
            .from_table(Permissions::Table)
            .to_owned();
        delete.and_where(
            Expr::col(Permissions::Code).is_in(CATALOGUE.iter().map(|(code, _)| *code)),
        );
        manager.exec_stmt(delete).await
    }
}

#[derive(Iden)]
enum Permissions {
    Table,
    Id,
    Code,
    Name,
    Description,
}
