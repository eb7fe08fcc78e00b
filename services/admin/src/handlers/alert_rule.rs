use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::alert::{AlertOperator, Severity};
use backoffice_domain::kind::MetricType;
use backoffice_domain::permission::codes;

use crate::domain::types::AlertRule;
use crate::error::AdminServiceError;
use crate::handlers::require_permission;
use crate::state::AppState;
use crate::usecase::alert_rule::{
    CreateAlertRuleInput, CreateAlertRuleUseCase, DeleteAlertRuleUseCase, GetAlertRuleUseCase,
    ListAlertRulesUseCase, UpdateAlertRuleInput, UpdateAlertRuleUseCase,
};

#[derive(Serialize)]
pub struct AlertRuleResponse {
    pub id: Uuid,
    pub name: String,
    pub metric_type: MetricType,
    pub metric_name: String,
    pub operator: AlertOperator,
    pub threshold: Decimal,
    pub severity: Severity,
    pub enabled: bool,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<AlertRule> for AlertRuleResponse {
    fn from(rule: AlertRule) -> Self {
        Self {
            id: rule.id,
            name: rule.name,
            metric_type: rule.metric_type,
            metric_name: rule.metric_name,
            operator: rule.operator,
            threshold: rule.threshold,
            severity: rule.severity,
            enabled: rule.enabled,
            created_at: rule.created_at,
            updated_at: rule.updated_at,
        }
    }
}

// ── GET /alert-rules ─────────────────────────────────────────────────────────

pub async fn get_alert_rules(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<AlertRuleResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::ALERT_READ).await?;
    let usecase = ListAlertRulesUseCase {
        repo: state.alert_rule_repo(),
    };
    let rules = usecase.execute().await?;
    Ok(Json(rules.into_iter().map(AlertRuleResponse::from).collect()))
}

// ── POST /alert-rules ────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateAlertRuleRequest {
    pub name: String,
    pub metric_type: MetricType,
    pub metric_name: String,
    pub operator: AlertOperator,
    pub threshold: Decimal,
    pub severity: Option<Severity>,
    pub enabled: Option<bool>,
}

pub async fn create_alert_rule(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateAlertRuleRequest>,
) -> Result<(StatusCode, Json<AlertRuleResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::ALERT_MANAGE).await?;
    let usecase = CreateAlertRuleUseCase {
        repo: state.alert_rule_repo(),
    };
    let rule = usecase
        .execute(CreateAlertRuleInput {
            name: body.name,
            metric_type: body.metric_type,
            metric_name: body.metric_name,
            operator: body.operator,
            threshold: body.threshold,
            severity: body.severity,
            enabled: body.enabled,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(rule.into())))
}

// ── GET /alert-rules/{id} ────────────────────────────────────────────────────

pub async fn get_alert_rule(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AlertRuleResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::ALERT_READ).await?;
    let usecase = GetAlertRuleUseCase {
        repo: state.alert_rule_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /alert-rules/{id} ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateAlertRuleRequest {
    pub name: Option<String>,
    pub metric_type: Option<MetricType>,
    pub metric_name: Option<String>,
    pub operator: Option<AlertOperator>,
    pub threshold: Option<Decimal>,
    pub severity: Option<Severity>,
    pub enabled: Option<bool>,
}

pub async fn update_alert_rule(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateAlertRuleRequest>,
) -> Result<Json<AlertRuleResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::ALERT_MANAGE).await?;
    let usecase = UpdateAlertRuleUseCase {
        repo: state.alert_rule_repo(),
    };
    let rule = usecase
        .execute(
            id,
            UpdateAlertRuleInput {
                name: body.name,
                metric_type: body.metric_type,
                metric_name: body.metric_name,
                operator: body.operator,
                threshold: body.threshold,
                severity: body.severity,
                enabled: body.enabled,
            },
        )
        .await?;
    Ok(Json(rule.into()))
}

// ── DELETE /alert-rules/{id} ─────────────────────────────────────────────────

pub async fn delete_alert_rule(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::ALERT_MANAGE).await?;
    let usecase = DeleteAlertRuleUseCase {
        repo: state.alert_rule_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
