pub mod alert_rule;
pub mod authorization;
pub mod dictionary;
pub mod email_template;
pub mod menu;
pub mod metric;
pub mod notification;
pub mod permission;
pub mod role;
pub mod user;
