//! Manuscript management handlers

use super::MutationResponse;
use crate::api::rest::auth::CallerAuthor;
use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::storage::StatusUpdate;
use axum::{
    extract::{Path, State},
    Json,
};
use quill_types::{Manuscript, ManuscriptEdit, ManuscriptId, ManuscriptStatus};
use serde::{Deserialize, Serialize};

/// Manuscript list item
#[derive(Debug, Serialize)]
pub struct ManuscriptSummary {
    pub id: ManuscriptId,
    pub title: String,
    pub status: ManuscriptStatus,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl From<Manuscript> for ManuscriptSummary {
    fn from(m: Manuscript) -> Self {
        Self {
            id: m.id,
            title: m.title,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

/// Create manuscript request
#[derive(Debug, Deserialize)]
pub struct CreateManuscriptRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
}

/// Edit manuscript request
#[derive(Debug, Deserialize)]
pub struct EditManuscriptRequest {
    pub id: ManuscriptId,
    pub title: String,
    #[serde(default)]
    pub content: String,
}

pub(crate) fn parse_manuscript_id(raw: &str) -> ApiResult<ManuscriptId> {
    raw.parse()
        .map_err(|_| ApiError::BadRequest(format!("Invalid manuscript id: {}", raw)))
}

fn require_title(title: &str) -> ApiResult<()> {
    if title.trim().is_empty() {
        return Err(ApiError::BadRequest("Title must not be empty".to_string()));
    }
    Ok(())
}

/// Load a manuscript the caller owns
async fn load_owned(
    state: &AppState,
    caller: &CallerAuthor,
    id: ManuscriptId,
) -> ApiResult<Manuscript> {
    let manuscript = state
        .store
        .get_manuscript(&id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Manuscript {} not found", id)))?;

    if !manuscript.is_owned_by(&caller.identity.id) {
        return Err(ApiError::Forbidden(format!(
            "Manuscript {} belongs to another author",
            id
        )));
    }

    Ok(manuscript)
}

fn expect_applied(id: ManuscriptId, update: StatusUpdate) -> ApiResult<Manuscript> {
    match update {
        StatusUpdate::Applied(m) => Ok(m),
        StatusUpdate::Missing => Err(ApiError::NotFound(format!("Manuscript {} not found", id))),
        StatusUpdate::Conflict { current } => Err(ApiError::InvalidState(format!(
            "Manuscript {} changed concurrently and is now {}",
            id, current
        ))),
    }
}

/// List the caller's manuscripts
pub async fn list_my_manuscripts(
    State(state): State<AppState>,
    caller: CallerAuthor,
) -> ApiResult<Json<Vec<ManuscriptSummary>>> {
    let manuscripts = state
        .store
        .list_manuscripts_for_author(&caller.identity.id)
        .await?;

    Ok(Json(manuscripts.into_iter().map(Into::into).collect()))
}

/// Create a manuscript in DRAFT
pub async fn create_manuscript(
    State(state): State<AppState>,
    caller: CallerAuthor,
    Json(request): Json<CreateManuscriptRequest>,
) -> ApiResult<Json<MutationResponse>> {
    require_title(&request.title)?;

    let manuscript = Manuscript::draft(caller.identity.id, request.title, request.content);
    let id = manuscript.id;
    state.store.upsert_manuscript(manuscript).await?;

    tracing::info!(manuscript_id = %id, author_id = %caller.identity.id, "Created manuscript");

    Ok(Json(MutationResponse::ok(id, "Manuscript created")))
}

/// Get one of the caller's manuscripts
pub async fn get_manuscript(
    State(state): State<AppState>,
    caller: CallerAuthor,
    Path(id): Path<String>,
) -> ApiResult<Json<Manuscript>> {
    let id = parse_manuscript_id(&id)?;
    let manuscript = load_owned(&state, &caller, id).await?;
    Ok(Json(manuscript))
}

/// Replace title and content of a DRAFT or SUBMITTED manuscript
pub async fn edit_manuscript(
    State(state): State<AppState>,
    caller: CallerAuthor,
    Json(request): Json<EditManuscriptRequest>,
) -> ApiResult<Json<MutationResponse>> {
    require_title(&request.title)?;

    let mut manuscript = load_owned(&state, &caller, request.id).await?;
    let read_status = manuscript.status;
    manuscript.apply_edit(ManuscriptEdit {
        title: request.title,
        content: request.content,
    })?;

    let update = state
        .store
        .update_manuscript(manuscript, read_status)
        .await?;
    expect_applied(request.id, update)?;

    tracing::info!(manuscript_id = %request.id, "Edited manuscript");

    Ok(Json(MutationResponse::ok(request.id, "Manuscript updated")))
}

/// Delete one of the caller's manuscripts
pub async fn delete_manuscript(
    State(state): State<AppState>,
    caller: CallerAuthor,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    let id = parse_manuscript_id(&id)?;
    let manuscript = load_owned(&state, &caller, id).await?;

    if !manuscript.status.is_deletable() {
        return Err(ApiError::InvalidState(format!(
            "Manuscript {} cannot be deleted while {}",
            id, manuscript.status
        )));
    }

    let update = state
        .store
        .delete_manuscript(&id, &ManuscriptStatus::DELETABLE)
        .await?;
    expect_applied(id, update)?;

    tracing::info!(manuscript_id = %id, "Deleted manuscript");

    Ok(Json(MutationResponse::ok(id, "Manuscript deleted")))
}

/// Move a DRAFT manuscript to SUBMITTED
pub async fn submit_manuscript(
    State(state): State<AppState>,
    caller: CallerAuthor,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    let id = parse_manuscript_id(&id)?;
    let manuscript = load_owned(&state, &caller, id).await?;

    if manuscript.status != ManuscriptStatus::Draft {
        return Err(ApiError::InvalidState(format!(
            "Manuscript {} cannot be submitted while {}",
            id, manuscript.status
        )));
    }

    let update = state
        .store
        .transition_status(&id, &[ManuscriptStatus::Draft], ManuscriptStatus::Submitted)
        .await?;
    expect_applied(id, update)?;

    tracing::info!(manuscript_id = %id, "Submitted manuscript");

    Ok(Json(MutationResponse::ok(id, "Manuscript submitted")))
}
