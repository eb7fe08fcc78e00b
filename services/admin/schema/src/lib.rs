//! sea-orm entities for the admin service tables.

pub mod alert_rules;
pub mod dictionaries;
pub mod email_templates;
pub mod menus;
pub mod monitor_metrics;
pub mod notifications;
pub mod permissions;
pub mod role_menus;
pub mod role_permissions;
pub mod roles;
pub mod user_roles;
pub mod users;
