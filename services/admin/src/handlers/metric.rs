use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::alert::{AlertOperator, Severity};
use backoffice_domain::kind::MetricType;
use backoffice_domain::pagination::{Page, PageRequest};
use backoffice_domain::permission::codes;

use crate::domain::types::{FiredAlert, MetricQuery, MonitorMetric};
use crate::error::AdminServiceError;
use crate::handlers::require_permission;
use crate::state::AppState;
use crate::usecase::metric::{IngestMetricsUseCase, MetricInput, QueryMetricsUseCase};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct MetricResponse {
    pub id: Uuid,
    pub metric_type: MetricType,
    pub metric_name: String,
    pub value: Decimal,
    pub unit: String,
    pub tags: serde_json::Map<String, serde_json::Value>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<MonitorMetric> for MetricResponse {
    fn from(metric: MonitorMetric) -> Self {
        Self {
            id: metric.id,
            metric_type: metric.metric_type,
            metric_name: metric.metric_name,
            value: metric.value,
            unit: metric.unit,
            tags: metric.tags,
            created_at: metric.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct AlertResponse {
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

impl From<FiredAlert> for AlertResponse {
    fn from(alert: FiredAlert) -> Self {
        Self {
            rule_id: alert.rule_id,
            rule_name: alert.rule_name,
            severity: alert.severity,
            metric_id: alert.metric_id,
            metric_type: alert.metric_type,
            metric_name: alert.metric_name,
            operator: alert.operator,
            threshold: alert.threshold,
            value: alert.value,
        }
    }
}

#[derive(Serialize)]
pub struct IngestResponse {
    pub metrics: Vec<MetricResponse>,
    pub alerts: Vec<AlertResponse>,
}

// ── GET /metrics ─────────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct MetricListQuery {
    pub per_page: Option<u32>,
    pub page: Option<u32>,
    pub metric_type: Option<MetricType>,
    pub metric_name: Option<String>,
    pub from: Option<chrono::DateTime<chrono::Utc>>,
    pub to: Option<chrono::DateTime<chrono::Utc>>,
}

pub async fn get_metrics(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<MetricListQuery>,
) -> Result<Json<Page<MetricResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::MONITOR_READ).await?;
    let usecase = QueryMetricsUseCase {
        repo: state.metric_repo(),
    };
    let page = usecase
        .execute(
            MetricQuery {
                metric_type: query.metric_type,
                metric_name: query.metric_name,
                from: query.from,
                to: query.to,
            },
            PageRequest::from_query(query.per_page, query.page),
        )
        .await?;
    Ok(Json(page.map(MetricResponse::from)))
}

// ── POST /metrics ────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct MetricRequest {
    pub metric_type: MetricType,
    pub metric_name: String,
    pub value: Decimal,
    pub unit: Option<String>,
    #[serde(default)]
    pub tags: serde_json::Map<String, serde_json::Value>,
}

#[derive(Deserialize)]
pub struct IngestRequest {
    pub metrics: Vec<MetricRequest>,
}

pub async fn ingest_metrics(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<IngestRequest>,
) -> Result<(StatusCode, Json<IngestResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::MONITOR_WRITE).await?;
    let usecase = IngestMetricsUseCase {
        metrics: state.metric_repo(),
        rules: state.alert_rule_repo(),
    };
    let output = usecase
        .execute(
            body.metrics
                .into_iter()
                .map(|m| MetricInput {
                    metric_type: m.metric_type,
                    metric_name: m.metric_name,
                    value: m.value,
                    unit: m.unit,
                    tags: m.tags,
                })
                .collect(),
        )
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(IngestResponse {
            metrics: output.metrics.into_iter().map(MetricResponse::from).collect(),
            alerts: output.alerts.into_iter().map(AlertResponse::from).collect(),
        }),
    ))
}
