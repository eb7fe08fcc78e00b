use axum::{
    Router,
    routing::{delete, get, patch, post, put},
};

use backoffice_core::health::healthz;

use crate::handlers::{
    alert_rule::{
        create_alert_rule, delete_alert_rule, get_alert_rule, get_alert_rules, update_alert_rule,
    },
    auth::get_me,
    dictionary::{
        create_dictionary, delete_dictionary, get_dictionaries, get_dictionary, update_dictionary,
    },
    email_template::{
        create_email_template, delete_email_template, get_email_template, get_email_templates,
        render_email_template, update_email_template,
    },
    health::readyz,
    menu::{create_menu, delete_menu, get_menu, get_menus, update_menu},
    metric::{get_metrics, ingest_metrics},
    notification::{
        delete_my_notification, get_my_notifications, get_my_unread_count,
        mark_all_my_notifications_read, mark_my_notification_read, send_notification,
    },
    permission::{
        create_permission, delete_permission, get_permission, get_permissions, update_permission,
    },
    role::{
        create_role, delete_role, get_role, get_role_menus, get_role_permissions, get_roles,
        grant_role_menu, grant_role_permission, restore_role, revoke_role_menu,
        revoke_role_permission, set_role_status, update_role,
    },
    user::{
        create_user, delete_user, get_user, get_user_roles, get_users, grant_user_role,
        revoke_user_role, update_user,
    },
};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        // Health
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        // Caller
        .route("/auth/me", get(get_me))
        // Users
        .route("/users", get(get_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).patch(update_user).delete(delete_user),
        )
        .route("/users/{id}/roles", get(get_user_roles))
        .route(
            "/users/{id}/roles/{role_id}",
            put(grant_user_role).delete(revoke_user_role),
        )
        // Roles
        .route("/roles", get(get_roles).post(create_role))
        .route(
            "/roles/{id}",
            get(get_role).patch(update_role).delete(delete_role),
        )
        .route("/roles/{id}/status", put(set_role_status))
        .route("/roles/{id}/restore", post(restore_role))
        .route("/roles/{id}/permissions", get(get_role_permissions))
        .route(
            "/roles/{id}/permissions/{permission_id}",
            put(grant_role_permission).delete(revoke_role_permission),
        )
        .route("/roles/{id}/menus", get(get_role_menus))
        .route(
            "/roles/{id}/menus/{menu_id}",
            put(grant_role_menu).delete(revoke_role_menu),
        )
        // Permissions
        .route("/permissions", get(get_permissions).post(create_permission))
        .route(
            "/permissions/{id}",
            get(get_permission)
                .patch(update_permission)
                .delete(delete_permission),
        )
        // Menus
        .route("/menus", get(get_menus).post(create_menu))
        .route(
            "/menus/{id}",
            get(get_menu).patch(update_menu).delete(delete_menu),
        )
        // Dictionaries
        .route("/dictionaries", get(get_dictionaries).post(create_dictionary))
        .route(
            "/dictionaries/{id}",
            get(get_dictionary)
                .patch(update_dictionary)
                .delete(delete_dictionary),
        )
        // Notifications
        .route("/notifications", post(send_notification))
        .route("/notifications/@me", get(get_my_notifications))
        .route("/notifications/@me/unread-count", get(get_my_unread_count))
        .route(
            "/notifications/@me/read-all",
            patch(mark_all_my_notifications_read),
        )
        .route(
            "/notifications/@me/{id}",
            delete(delete_my_notification),
        )
        .route(
            "/notifications/@me/{id}/read",
            patch(mark_my_notification_read),
        )
        // Monitoring
        .route("/metrics", get(get_metrics).post(ingest_metrics))
        .route("/alert-rules", get(get_alert_rules).post(create_alert_rule))
        .route(
            "/alert-rules/{id}",
            get(get_alert_rule)
                .patch(update_alert_rule)
                .delete(delete_alert_rule),
        )
        // Email templates; the render route addresses a template by code.
        .route(
            "/email-templates",
            get(get_email_templates).post(create_email_template),
        )
        .route(
            "/email-templates/{id}",
            get(get_email_template)
                .patch(update_email_template)
                .delete(delete_email_template),
        )
        .route("/email-templates/{id}/render", post(render_email_template))
        .with_state(state)
}
