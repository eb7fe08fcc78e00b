use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use backoffice_domain::alert::storable;
use backoffice_domain::kind::MetricType;
use backoffice_domain::pagination::{Page, PageRequest};

use crate::domain::repository::{AlertRuleRepository, MetricRepository};
use crate::domain::types::{FiredAlert, MetricQuery, MonitorMetric, fits_opt, non_blank};
use crate::error::AdminServiceError;

/// Largest batch accepted by one ingest call.
pub const MAX_BATCH: usize = 1000;

// ── IngestMetrics ────────────────────────────────────────────────────────────

pub struct MetricInput {
    pub metric_type: MetricType,
    pub metric_name: String,
    pub value: Decimal,
    pub unit: Option<String>,
    pub tags: serde_json::Map<String, serde_json::Value>,
}

pub struct IngestOutput {
    pub metrics: Vec<MonitorMetric>,
    pub alerts: Vec<FiredAlert>,
}

pub struct IngestMetricsUseCase<M: MetricRepository, A: AlertRuleRepository> {
    pub metrics: M,
    pub rules: A,
}

impl<M: MetricRepository, A: AlertRuleRepository> IngestMetricsUseCase<M, A> {
    /// Append a batch, then evaluate enabled alert rules against it.
    ///
    /// The batch is stored as a whole or not at all. Values are rounded to two
    /// decimal places before storage and evaluation.
    pub async fn execute(&self, batch: Vec<MetricInput>) -> Result<IngestOutput, AdminServiceError> {
        if batch.is_empty() {
            return Err(AdminServiceError::Invalid("empty metric batch"));
        }
        if batch.len() > MAX_BATCH {
            return Err(AdminServiceError::Invalid("metric batch too large"));
        }

        let now = Utc::now();
        let mut metrics = Vec::with_capacity(batch.len());
        for input in batch {
            if !non_blank(&input.metric_name, 128) {
                return Err(AdminServiceError::Invalid("metric name"));
            }
            let value = storable(input.value)
                .ok_or(AdminServiceError::Invalid("metric value out of range"))?;
            if !fits_opt(input.unit.as_deref(), 32) {
                return Err(AdminServiceError::Invalid("metric unit"));
            }
            metrics.push(MonitorMetric {
                id: Uuid::now_v7(),
                metric_type: input.metric_type,
                metric_name: input.metric_name.trim().to_owned(),
                value,
                unit: input.unit.unwrap_or_default(),
                tags: input.tags,
                created_at: now,
            });
        }
        self.metrics.insert_batch(&metrics).await?;

        let rules = self.rules.list_enabled().await?;
        let alerts: Vec<FiredAlert> = metrics
            .iter()
            .flat_map(|metric| rules.iter().filter_map(|rule| rule.evaluate(metric)))
            .collect();
        for alert in &alerts {
            tracing::warn!(
                rule_id = %alert.rule_id,
                rule = %alert.rule_name,
                severity = %alert.severity,
                metric_type = %alert.metric_type,
                metric_name = %alert.metric_name,
                value = %alert.value,
                operator = %alert.operator,
                threshold = %alert.threshold,
                "alert rule fired"
            );
        }
        Ok(IngestOutput { metrics, alerts })
    }
}

// ── QueryMetrics ─────────────────────────────────────────────────────────────

pub struct QueryMetricsUseCase<M: MetricRepository> {
    pub repo: M,
}

impl<M: MetricRepository> QueryMetricsUseCase<M> {
    pub async fn execute(
        &self,
        query: MetricQuery,
        page: PageRequest,
    ) -> Result<Page<MonitorMetric>, AdminServiceError> {
        if let (Some(from), Some(to)) = (query.from, query.to) {
            if from > to {
                return Err(AdminServiceError::Invalid("time range"));
            }
        }
        self.repo.query(&query, page.clamped()).await
    }
}
