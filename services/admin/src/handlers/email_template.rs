use std::collections::HashMap;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::permission::codes;

use crate::domain::types::EmailTemplate;
use crate::error::AdminServiceError;
use crate::handlers::require_permission;
use crate::state::AppState;
use crate::usecase::email_template::{
    CreateEmailTemplateInput, CreateEmailTemplateUseCase, DeleteEmailTemplateUseCase,
    GetEmailTemplateUseCase, ListEmailTemplatesUseCase, RenderEmailTemplateUseCase,
    UpdateEmailTemplateInput, UpdateEmailTemplateUseCase,
};

#[derive(Serialize)]
pub struct EmailTemplateResponse {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub enabled: bool,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<EmailTemplate> for EmailTemplateResponse {
    fn from(template: EmailTemplate) -> Self {
        Self {
            id: template.id,
            code: template.code,
            name: template.name,
            subject: template.subject,
            body: template.body,
            enabled: template.enabled,
            created_at: template.created_at,
            updated_at: template.updated_at,
        }
    }
}

// ── GET /email-templates ─────────────────────────────────────────────────────

pub async fn get_email_templates(
    identity: IdentityHeaders,
    State(state): State<AppState>,
) -> Result<Json<Vec<EmailTemplateResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::TEMPLATE_READ).await?;
    let usecase = ListEmailTemplatesUseCase {
        repo: state.email_template_repo(),
    };
    let templates = usecase.execute().await?;
    Ok(Json(
        templates
            .into_iter()
            .map(EmailTemplateResponse::from)
            .collect(),
    ))
}

// ── POST /email-templates ────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateEmailTemplateRequest {
    pub code: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub enabled: Option<bool>,
}

pub async fn create_email_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateEmailTemplateRequest>,
) -> Result<(StatusCode, Json<EmailTemplateResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::TEMPLATE_MANAGE).await?;
    let usecase = CreateEmailTemplateUseCase {
        repo: state.email_template_repo(),
    };
    let template = usecase
        .execute(CreateEmailTemplateInput {
            code: body.code,
            name: body.name,
            subject: body.subject,
            body: body.body,
            enabled: body.enabled,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(template.into())))
}

// ── GET /email-templates/{id} ────────────────────────────────────────────────

pub async fn get_email_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<EmailTemplateResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::TEMPLATE_READ).await?;
    let usecase = GetEmailTemplateUseCase {
        repo: state.email_template_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /email-templates/{id} ──────────────────────────────────────────────

#[derive(Deserialize)]
pub struct UpdateEmailTemplateRequest {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub enabled: Option<bool>,
}

pub async fn update_email_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateEmailTemplateRequest>,
) -> Result<Json<EmailTemplateResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::TEMPLATE_MANAGE).await?;
    let usecase = UpdateEmailTemplateUseCase {
        repo: state.email_template_repo(),
    };
    let template = usecase
        .execute(
            id,
            UpdateEmailTemplateInput {
                name: body.name,
                subject: body.subject,
                body: body.body,
                enabled: body.enabled,
            },
        )
        .await?;
    Ok(Json(template.into()))
}

// ── DELETE /email-templates/{id} ─────────────────────────────────────────────

pub async fn delete_email_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::TEMPLATE_MANAGE).await?;
    let usecase = DeleteEmailTemplateUseCase {
        repo: state.email_template_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── POST /email-templates/{code}/render ──────────────────────────────────────

#[derive(Deserialize)]
pub struct RenderRequest {
    #[serde(default)]
    pub variables: HashMap<String, String>,
}

#[derive(Serialize)]
pub struct RenderResponse {
    pub subject: String,
    pub body: String,
    pub missing: Vec<String>,
}

pub async fn render_email_template(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(code): Path<String>,
    Json(body): Json<RenderRequest>,
) -> Result<Json<RenderResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::TEMPLATE_READ).await?;
    let usecase = RenderEmailTemplateUseCase {
        repo: state.email_template_repo(),
    };
    let rendered = usecase.execute(&code, &body.variables).await?;
    Ok(Json(RenderResponse {
        subject: rendered.subject,
        body: rendered.body,
        missing: rendered.missing,
    }))
}
