use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use backoffice_domain::alert::{AlertOperator, Severity, storable};
use backoffice_domain::kind::MetricType;

use crate::domain::repository::AlertRuleRepository;
use crate::domain::types::{AlertRule, non_blank};
use crate::error::AdminServiceError;

// ── CreateAlertRule ──────────────────────────────────────────────────────────

pub struct CreateAlertRuleInput {
    pub name: String,
    pub metric_type: MetricType,
    pub metric_name: String,
    pub operator: AlertOperator,
    pub threshold: Decimal,
    pub severity: Option<Severity>,
    pub enabled: Option<bool>,
}

pub struct CreateAlertRuleUseCase<R: AlertRuleRepository> {
    pub repo: R,
}

impl<R: AlertRuleRepository> CreateAlertRuleUseCase<R> {
    pub async fn execute(&self, input: CreateAlertRuleInput) -> Result<AlertRule, AdminServiceError> {
        if !non_blank(&input.name, 128) {
            return Err(AdminServiceError::Invalid("rule name"));
        }
        if !non_blank(&input.metric_name, 128) {
            return Err(AdminServiceError::Invalid("metric name"));
        }
        let threshold =
            storable(input.threshold).ok_or(AdminServiceError::Invalid("threshold"))?;
        let now = Utc::now();
        let rule = AlertRule {
            id: Uuid::now_v7(),
            name: input.name.trim().to_owned(),
            metric_type: input.metric_type,
            metric_name: input.metric_name.trim().to_owned(),
            operator: input.operator,
            threshold,
            severity: input.severity.unwrap_or(Severity::Warning),
            enabled: input.enabled.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&rule).await?;
        Ok(rule)
    }
}

// ── GetAlertRule / ListAlertRules ────────────────────────────────────────────

pub struct GetAlertRuleUseCase<R: AlertRuleRepository> {
    pub repo: R,
}

impl<R: AlertRuleRepository> GetAlertRuleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<AlertRule, AdminServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::AlertRuleNotFound)
    }
}

pub struct ListAlertRulesUseCase<R: AlertRuleRepository> {
    pub repo: R,
}

impl<R: AlertRuleRepository> ListAlertRulesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<AlertRule>, AdminServiceError> {
        self.repo.list().await
    }
}

// ── UpdateAlertRule ──────────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateAlertRuleInput {
    pub name: Option<String>,
    pub metric_type: Option<MetricType>,
    pub metric_name: Option<String>,
    pub operator: Option<AlertOperator>,
    pub threshold: Option<Decimal>,
    pub severity: Option<Severity>,
    pub enabled: Option<bool>,
}

pub struct UpdateAlertRuleUseCase<R: AlertRuleRepository> {
    pub repo: R,
}

impl<R: AlertRuleRepository> UpdateAlertRuleUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateAlertRuleInput,
    ) -> Result<AlertRule, AdminServiceError> {
        let mut rule = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::AlertRuleNotFound)?;
        if let Some(name) = input.name {
            if !non_blank(&name, 128) {
                return Err(AdminServiceError::Invalid("rule name"));
            }
            rule.name = name.trim().to_owned();
        }
        if let Some(metric_type) = input.metric_type {
            rule.metric_type = metric_type;
        }
        if let Some(metric_name) = input.metric_name {
            if !non_blank(&metric_name, 128) {
                return Err(AdminServiceError::Invalid("metric name"));
            }
            rule.metric_name = metric_name.trim().to_owned();
        }
        if let Some(operator) = input.operator {
            rule.operator = operator;
        }
        if let Some(threshold) = input.threshold {
            rule.threshold =
                storable(threshold).ok_or(AdminServiceError::Invalid("threshold"))?;
        }
        if let Some(severity) = input.severity {
            rule.severity = severity;
        }
        if let Some(enabled) = input.enabled {
            rule.enabled = enabled;
        }
        rule.updated_at = Utc::now();
        self.repo.update(&rule).await?;
        Ok(rule)
    }
}

// ── DeleteAlertRule ──────────────────────────────────────────────────────────

pub struct DeleteAlertRuleUseCase<R: AlertRuleRepository> {
    pub repo: R,
}

impl<R: AlertRuleRepository> DeleteAlertRuleUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        if !self.repo.delete(id).await? {
            return Err(AdminServiceError::AlertRuleNotFound);
        }
        Ok(())
    }
}
