use std::collections::HashMap;

use chrono::Utc;
use uuid::Uuid;

use backoffice_domain::kind::Toggle;

use crate::domain::repository::DictionaryRepository;
use crate::domain::types::{Dictionary, fits_opt, non_blank};
use crate::error::AdminServiceError;

fn validate_key(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= 64
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'))
}

/// Whether following `parent_code` links up from `parent` reaches `dict_code`.
fn closes_cycle(dict_code: &str, parent: &str, parents: &HashMap<String, Option<String>>) -> bool {
    let mut cursor = Some(parent);
    let mut steps = 0usize;
    while let Some(current) = cursor {
        if current == dict_code || steps > parents.len() {
            return true;
        }
        steps += 1;
        cursor = parents.get(current).and_then(|p| p.as_deref());
    }
    false
}

/// `parent_code` must name another entry of the same type that does not
/// descend from this one.
async fn validate_parent<R: DictionaryRepository>(
    repo: &R,
    dict_type: &str,
    dict_code: &str,
    parent_code: &str,
) -> Result<(), AdminServiceError> {
    if parent_code == dict_code {
        return Err(AdminServiceError::Invalid("parent code"));
    }
    repo.find_by_code(dict_type, parent_code)
        .await?
        .ok_or(AdminServiceError::DictionaryNotFound)?;
    let parents: HashMap<String, Option<String>> = repo
        .list(Some(dict_type))
        .await?
        .into_iter()
        .map(|e| (e.dict_code, e.parent_code))
        .collect();
    if closes_cycle(dict_code, parent_code, &parents) {
        return Err(AdminServiceError::Invalid("parent code"));
    }
    Ok(())
}

// ── CreateDictionary ─────────────────────────────────────────────────────────

pub struct CreateDictionaryInput {
    pub dict_type: String,
    pub dict_code: String,
    pub dict_name: String,
    pub parent_code: Option<String>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    pub remark: Option<String>,
}

pub struct CreateDictionaryUseCase<R: DictionaryRepository> {
    pub repo: R,
}

impl<R: DictionaryRepository> CreateDictionaryUseCase<R> {
    pub async fn execute(&self, input: CreateDictionaryInput) -> Result<Dictionary, AdminServiceError> {
        if !validate_key(&input.dict_type) {
            return Err(AdminServiceError::Invalid("dictionary type"));
        }
        if !validate_key(&input.dict_code) {
            return Err(AdminServiceError::Invalid("dictionary code"));
        }
        if !non_blank(&input.dict_name, 128) {
            return Err(AdminServiceError::Invalid("dictionary name"));
        }
        if !fits_opt(input.remark.as_deref(), 255) {
            return Err(AdminServiceError::Invalid("remark"));
        }
        if self
            .repo
            .find_by_code(&input.dict_type, &input.dict_code)
            .await?
            .is_some()
        {
            return Err(AdminServiceError::DictionaryCodeTaken);
        }
        if let Some(parent) = input.parent_code.as_deref() {
            validate_parent(&self.repo, &input.dict_type, &input.dict_code, parent).await?;
        }

        let now = Utc::now();
        let entry = Dictionary {
            id: Uuid::now_v7(),
            dict_type: input.dict_type,
            dict_code: input.dict_code,
            dict_name: input.dict_name.trim().to_owned(),
            parent_code: input.parent_code,
            sort: input.sort.unwrap_or(0),
            status: input.status.unwrap_or(Toggle::Enabled),
            remark: input.remark,
            created_at: now,
            updated_at: now,
        };
        self.repo.create(&entry).await?;
        Ok(entry)
    }
}

// ── GetDictionary / ListDictionaries ─────────────────────────────────────────

pub struct GetDictionaryUseCase<R: DictionaryRepository> {
    pub repo: R,
}

impl<R: DictionaryRepository> GetDictionaryUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<Dictionary, AdminServiceError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::DictionaryNotFound)
    }
}

pub struct ListDictionariesUseCase<R: DictionaryRepository> {
    pub repo: R,
}

impl<R: DictionaryRepository> ListDictionariesUseCase<R> {
    pub async fn execute(&self, dict_type: Option<&str>) -> Result<Vec<Dictionary>, AdminServiceError> {
        self.repo.list(dict_type).await
    }
}

// ── UpdateDictionary ─────────────────────────────────────────────────────────

/// Type and code are the entry's key and cannot change.
#[derive(Default)]
pub struct UpdateDictionaryInput {
    pub dict_name: Option<String>,
    pub parent_code: Option<Option<String>>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    pub remark: Option<Option<String>>,
}

pub struct UpdateDictionaryUseCase<R: DictionaryRepository> {
    pub repo: R,
}

impl<R: DictionaryRepository> UpdateDictionaryUseCase<R> {
    pub async fn execute(
        &self,
        id: Uuid,
        input: UpdateDictionaryInput,
    ) -> Result<Dictionary, AdminServiceError> {
        let mut entry = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::DictionaryNotFound)?;
        if let Some(name) = input.dict_name {
            if !non_blank(&name, 128) {
                return Err(AdminServiceError::Invalid("dictionary name"));
            }
            entry.dict_name = name.trim().to_owned();
        }
        if let Some(parent_code) = input.parent_code {
            if let Some(parent) = parent_code.as_deref() {
                validate_parent(&self.repo, &entry.dict_type, &entry.dict_code, parent).await?;
            }
            entry.parent_code = parent_code;
        }
        if let Some(sort) = input.sort {
            entry.sort = sort;
        }
        if let Some(status) = input.status {
            entry.status = status;
        }
        if let Some(remark) = input.remark {
            if !fits_opt(remark.as_deref(), 255) {
                return Err(AdminServiceError::Invalid("remark"));
            }
            entry.remark = remark;
        }
        entry.updated_at = Utc::now();
        self.repo.update(&entry).await?;
        Ok(entry)
    }
}

// ── DeleteDictionary ─────────────────────────────────────────────────────────

pub struct DeleteDictionaryUseCase<R: DictionaryRepository> {
    pub repo: R,
}

impl<R: DictionaryRepository> DeleteDictionaryUseCase<R> {
    pub async fn execute(&self, id: Uuid) -> Result<(), AdminServiceError> {
        let entry = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or(AdminServiceError::DictionaryNotFound)?;
        if self.repo.is_parent(&entry.dict_type, &entry.dict_code).await? {
            return Err(AdminServiceError::DictionaryInUse);
        }
        self.repo.delete(id).await?;
        Ok(())
    }
}
