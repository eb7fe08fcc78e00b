use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use backoffice_domain::alert::{AlertOperator, Severity};
use backoffice_domain::kind::{
    MenuType, MetricType, NotificationType, RoleStatus, Toggle, UserStatus,
};
use backoffice_domain::menu_tree::MenuEntry;

// ── Access control ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub nickname: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub description: String,
    pub status: RoleStatus,
    pub sort: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Role {
    /// Active and not soft-deleted: the only roles that contribute grants.
    pub fn is_effective(&self) -> bool {
        self.status == RoleStatus::Active && self.deleted_at.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Permission {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub path: String,
    pub component: Option<String>,
    pub icon: String,
    pub menu_type: MenuType,
    pub visible: bool,
    pub sort: i32,
    pub status: Toggle,
    pub permission_code: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Menu {
    pub fn entry(&self) -> MenuEntry {
        MenuEntry {
            id: self.id,
            parent_id: self.parent_id,
            name: self.name.clone(),
            path: self.path.clone(),
            component: self.component.clone(),
            icon: self.icon.clone(),
            menu_type: self.menu_type,
            visible: self.visible,
            sort: self.sort,
            permission_code: self.permission_code.clone(),
        }
    }
}

// ── Messaging ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
    pub notification_type: NotificationType,
    pub link: Option<String>,
    pub is_read: bool,
    pub read_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailTemplate {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Dictionaries ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    pub id: Uuid,
    pub dict_type: String,
    pub dict_code: String,
    pub dict_name: String,
    pub parent_code: Option<String>,
    pub sort: i32,
    pub status: Toggle,
    pub remark: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ── Monitoring ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct MonitorMetric {
    pub id: Uuid,
    pub metric_type: MetricType,
    pub metric_name: String,
    pub value: Decimal,
    pub unit: String,
    pub tags: serde_json::Map<String, serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

/// Filter for metric range queries. Bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct MetricQuery {
    pub metric_type: Option<MetricType>,
    pub metric_name: Option<String>,
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertRule {
    pub id: Uuid,
    pub name: String,
    pub metric_type: MetricType,
    pub metric_name: String,
    pub operator: AlertOperator,
    pub threshold: Decimal,
    pub severity: Severity,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlertRule {
    /// `Some` if this rule watches `metric` and the value breaches the threshold.
    pub fn evaluate(&self, metric: &MonitorMetric) -> Option<FiredAlert> {
        let watches = self.enabled
            && self.metric_type == metric.metric_type
            && self.metric_name == metric.metric_name;
        (watches && self.operator.breached(metric.value, self.threshold)).then(|| FiredAlert {
            rule_id: self.id,
            rule_name: self.name.clone(),
            severity: self.severity,
            metric_id: metric.id,
            metric_type: metric.metric_type,
            metric_name: metric.metric_name.clone(),
            operator: self.operator,
            threshold: self.threshold,
            value: metric.value,
        })
    }
}

/// An alert rule that tripped on an ingested observation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FiredAlert {
    pub rule_id: Uuid,
    pub rule_name: String,
    pub severity: Severity,
    pub metric_id: Uuid,
    pub metric_type: MetricType,
    pub metric_name: String,
    pub operator: AlertOperator,
    pub threshold: Decimal,
    pub value: Decimal,
}

// ── Validation ───────────────────────────────────────────────────────────────

/// Usernames: 3-64 chars of ASCII alphanumerics, `.`, `_` or `-`.
pub fn validate_username(username: &str) -> bool {
    (3..=64).contains(&username.len())
        && username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
}

/// Minimal shape check; delivery is someone else's problem.
pub fn validate_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty() && !domain.is_empty() && !domain.contains('@') && email.len() <= 255
}

/// Trimmed, non-empty and at most `max` characters.
pub fn non_blank(value: &str, max: usize) -> bool {
    let trimmed = value.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= max
}

/// At most `max` characters; empty is allowed.
pub fn fits(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// `fits` for optional columns.
pub fn fits_opt(value: Option<&str>, max: usize) -> bool {
    value.is_none_or(|v| fits(v, max))
}
