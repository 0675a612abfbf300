//! Publish handler

use super::manuscripts::parse_manuscript_id;
use super::MutationResponse;
use crate::api::rest::auth::CallerAuthor;
use crate::api::rest::state::AppState;
use crate::error::ApiResult;
use axum::{
    extract::{Path, State},
    Json,
};

/// Request publication; the result arrives later as the manuscript status
pub async fn publish_manuscript(
    State(state): State<AppState>,
    caller: CallerAuthor,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationResponse>> {
    let id = parse_manuscript_id(&id)?;
    let CallerAuthor {
        identity,
        credential,
    } = caller;

    let accepted = state
        .publisher
        .request_publish(id, identity, credential)
        .await?;

    Ok(Json(MutationResponse::ok(
        accepted.manuscript_id,
        "Publish request accepted; the manuscript is under review",
    )))
}
