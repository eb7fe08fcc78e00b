use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use backoffice_auth_types::identity::IdentityHeaders;
use backoffice_domain::kind::Toggle;
use backoffice_domain::permission::codes;

use crate::domain::types::Dictionary;
use crate::error::AdminServiceError;
use crate::handlers::{nullable, require_permission};
use crate::state::AppState;
use crate::usecase::dictionary::{
    CreateDictionaryInput, CreateDictionaryUseCase, DeleteDictionaryUseCase,
    GetDictionaryUseCase, ListDictionariesUseCase, UpdateDictionaryInput, UpdateDictionaryUseCase,
};

#[derive(Serialize)]
pub struct DictionaryResponse {
    pub id: Uuid,
    pub dict_type: String,
    pub dict_code: String,
    pub dict_name: String,
    pub parent_code: Option<String>,
    pub sort: i32,
    pub status: Toggle,
    pub remark: Option<String>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
    #[serde(serialize_with = "backoffice_core::serde::to_rfc3339_ms")]
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Dictionary> for DictionaryResponse {
    fn from(entry: Dictionary) -> Self {
        Self {
            id: entry.id,
            dict_type: entry.dict_type,
            dict_code: entry.dict_code,
            dict_name: entry.dict_name,
            parent_code: entry.parent_code,
            sort: entry.sort,
            status: entry.status,
            remark: entry.remark,
            created_at: entry.created_at,
            updated_at: entry.updated_at,
        }
    }
}

// ── GET /dictionaries ────────────────────────────────────────────────────────

#[derive(Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub struct DictionaryListQuery {
    pub dict_type: Option<String>,
}

pub async fn get_dictionaries(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Query(query): Query<DictionaryListQuery>,
) -> Result<Json<Vec<DictionaryResponse>>, AdminServiceError> {
    require_permission(&state, &identity, codes::DICT_READ).await?;
    let usecase = ListDictionariesUseCase {
        repo: state.dictionary_repo(),
    };
    let entries = usecase.execute(query.dict_type.as_deref()).await?;
    Ok(Json(
        entries.into_iter().map(DictionaryResponse::from).collect(),
    ))
}

// ── POST /dictionaries ───────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct CreateDictionaryRequest {
    pub dict_type: String,
    pub dict_code: String,
    pub dict_name: String,
    pub parent_code: Option<String>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    pub remark: Option<String>,
}

pub async fn create_dictionary(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<CreateDictionaryRequest>,
) -> Result<(StatusCode, Json<DictionaryResponse>), AdminServiceError> {
    require_permission(&state, &identity, codes::DICT_MANAGE).await?;
    let usecase = CreateDictionaryUseCase {
        repo: state.dictionary_repo(),
    };
    let entry = usecase
        .execute(CreateDictionaryInput {
            dict_type: body.dict_type,
            dict_code: body.dict_code,
            dict_name: body.dict_name,
            parent_code: body.parent_code,
            sort: body.sort,
            status: body.status,
            remark: body.remark,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

// ── GET /dictionaries/{id} ───────────────────────────────────────────────────

pub async fn get_dictionary(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<DictionaryResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::DICT_READ).await?;
    let usecase = GetDictionaryUseCase {
        repo: state.dictionary_repo(),
    };
    Ok(Json(usecase.execute(id).await?.into()))
}

// ── PATCH /dictionaries/{id} ─────────────────────────────────────────────────

/// `dict_type` and `dict_code` are fixed at creation.
#[derive(Deserialize)]
pub struct UpdateDictionaryRequest {
    pub dict_name: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub parent_code: Option<Option<String>>,
    pub sort: Option<i32>,
    pub status: Option<Toggle>,
    #[serde(default, deserialize_with = "nullable")]
    pub remark: Option<Option<String>>,
}

pub async fn update_dictionary(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<UpdateDictionaryRequest>,
) -> Result<Json<DictionaryResponse>, AdminServiceError> {
    require_permission(&state, &identity, codes::DICT_MANAGE).await?;
    let usecase = UpdateDictionaryUseCase {
        repo: state.dictionary_repo(),
    };
    let entry = usecase
        .execute(
            id,
            UpdateDictionaryInput {
                dict_name: body.dict_name,
                parent_code: body.parent_code,
                sort: body.sort,
                status: body.status,
                remark: body.remark,
            },
        )
        .await?;
    Ok(Json(entry.into()))
}

// ── DELETE /dictionaries/{id} ────────────────────────────────────────────────

pub async fn delete_dictionary(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AdminServiceError> {
    require_permission(&state, &identity, codes::DICT_MANAGE).await?;
    let usecase = DeleteDictionaryUseCase {
        repo: state.dictionary_repo(),
    };
    usecase.execute(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
