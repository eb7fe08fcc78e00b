use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::template::{placeholders, render};

use crate::domain::repository::EmailTemplateRepository;
use crate::domain::types::{EmailTemplate, non_blank};
use crate::error::AdminServiceError;

fn validate_template_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= 64
        && code
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || matches!(c, '_' | '-' | '.'))
}

// ── CreateEmailTemplate ──────────────────────────────────────────────────────

pub struct CreateEmailTemplateInput {
    pub code: String,
    pub name: String,
    pub subject: String,
    pub body: String,
    pub enabled: Option<bool>,
}

pub struct CreateEmailTemplateUseCase<R: EmailTemplateRepository> {
    pub repo: R,
}

impl<R: EmailTemplateRepository> CreateEmailTemplateUseCase<R> {
    pub async fn execute(
        &self,
        input: CreateEmailTemplateInput,
    ) -> Result<EmailTemplate, AdminServiceError> {
        if !validate_template_code(&input.code) {
            return Err(AdminServiceError::Invalid("template code"));
        }
        if !non_blank(&input.name, 128) {
            return Err(AdminServiceError::Invalid("template name"));
        }
        if !non_blank(&input.subject, 255) {
            return Err(AdminServiceError::Invalid("subject"));
        }
        if self.repo.find_by_code(&input.code).await?.is_some() {
            return Err(AdminServiceError::TemplateCodeTaken);
        }
        let now = Utc::now();
        let template = EmailTemplate {
            id: Uuid::now_v7(),
            code: input.code,
            name: input.name.trim().to_owned(),
            subject: input.subject,
            body: input.body,
            enabled: input.enabled.unwrap_or(true),
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&template).await?;
        Ok(template)
    }
}

// ── GetEmailTemplate / ListEmailTemplates ────────────────────────────────────

pub struct GetEmailTemplateUseCase<R: EmailTemplateRepository> {
    pub repo: R,
}

impl<R: EmailTemplateRepository> GetEmailTemplateUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<EmailTemplate, AdminServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::EmailTemplateNotFound)
    }
}

pub struct ListEmailTemplatesUseCase<R: EmailTemplateRepository> {
    pub repo: R,
}

impl<R: EmailTemplateRepository> ListEmailTemplatesUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<EmailTemplate>, AdminServiceError> {
        self.repo.list().await
    }
}

// ── UpdateEmailTemplate ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdateEmailTemplateInput {
    pub name: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub enabled: Option<bool>,
}

pub struct UpdateEmailTemplateUseCase<R: EmailTemplateRepository> {
    pub repo: R,
}

impl<R: EmailTemplateRepository> UpdateEmailTemplateUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateEmailTemplateInput,
    ) -> Result<EmailTemplate, AdminServiceError> {
        let mut template = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::EmailTemplateNotFound)?;
        if let Some(name) = input.name {
            if !non_blank(&name, 128) {
                return Err(AdminServiceError::Invalid("template name"));
            }
            template.name = name.trim().to_owned();
        }
        if let Some(subject) = input.subject {
            if !non_blank(&subject, 255) {
                return Err(AdminServiceError::Invalid("subject"));
            }
            template.subject = subject;
        }
        if let Some(body) = input.body {
            template.body = body;
        }
        if let Some(enabled) = input.enabled {
            template.enabled = enabled;
        }
        template.updated_at = Utc::now();
        self.repo.update(&template).await?;
        Ok(template)
    }
}

// ── DeleteEmailTemplate ──────────────────────────────────────────────────────

pub struct DeleteEmailTemplateUseCase<R: EmailTemplateRepository> {
    pub repo: R,
}

impl<R: EmailTemplateRepository> DeleteEmailTemplateUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        if !self.repo.delete(id).await? {
            return Err(AdminServiceError::EmailTemplateNotFound);
        }
        Ok(())
    }
}

// ── RenderEmailTemplate ──────────────────────────────────────────────────────

#[derive(Debug, PartialEq, Eq)]
pub struct RenderedEmail {
    pub subject: String,
    pub body: String,
    /// Placeholders left in the output because no variable was supplied.
    pub missing: Vec<String>,
}

pub struct RenderEmailTemplateUseCase<R: EmailTemplateRepository> {
    pub repo: R,
}

impl<R: EmailTemplateRepository> RenderEmailTemplateUseCase<R> {
    pub async fn execute(
        &self,
        code: &str,
        vars: &HashMap<String, String>,
    ) -> Result<RenderedEmail, AdminServiceError> {
        let template = self
            .repo
            .find_by_code(code)
            .await?
            .ok_or(AdminServiceError::EmailTemplateNotFound)?;
        if !template.enabled {
            return Err(AdminServiceError::Invalid("template disabled"));
        }
        let mut missing: Vec<String> = Vec::new();
        for name in placeholders(&template.subject)
            .into_iter()
            .chain(placeholders(&template.body))
        {
            if !vars.contains_key(&name) && !missing.contains(&name) {
                missing.push(name);
            }
        }
        Ok(RenderedEmail {
            subject: render(&template.subject, vars),
            body: render(&template.body, vars),
            missing,
        })
    }
}
