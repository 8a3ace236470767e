//! Administrative share management.
//!
//! Mutating the share list commits by rebuilding the whole catalog;
//! there is no in-place splice, so browsers always see either the old
//! complete generation or the new one.

use crate::server::{error_response, AppContext};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use dircast_common::Error;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub fn admin_routes() -> Router<AppContext> {
    Router::new()
        .route("/shares", get(list_shares).post(add_share))
        .route("/shares/:index", delete(remove_share))
        .route("/rebuild", post(rebuild))
}

#[derive(Debug, Serialize)]
struct ShareInfo {
    name: String,
    path: PathBuf,
}

#[derive(Debug, Deserialize)]
struct AddShareRequest {
    #[serde(default)]
    name: Option<String>,
    path: PathBuf,
}

async fn list_shares(State(ctx): State<AppContext>) -> Json<Vec<ShareInfo>> {
    let shares = ctx
        .state
        .shares()
        .into_iter()
        .map(|s| ShareInfo {
            name: s.name,
            path: s.path,
        })
        .collect();
    Json(shares)
}

async fn add_share(
    State(ctx): State<AppContext>,
    Json(req): Json<AddShareRequest>,
) -> std::result::Result<(StatusCode, Json<ShareInfo>), (StatusCode, String)> {
    let state = ctx.state.clone();
    let share = tokio::task::spawn_blocking(move || state.add_share(req.name, req.path))
        .await
        .map_err(|e| error_response(Error::internal(e.to_string())))?
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ShareInfo {
            name: share.name,
            path: share.path,
        }),
    ))
}

async fn remove_share(
    State(ctx): State<AppContext>,
    Path(index): Path<usize>,
) -> std::result::Result<Json<ShareInfo>, (StatusCode, String)> {
    let state = ctx.state.clone();
    let share = tokio::task::spawn_blocking(move || state.remove_share(index))
        .await
        .map_err(|e| error_response(Error::internal(e.to_string())))?
        .map_err(error_response)?;

    Ok(Json(ShareInfo {
        name: share.name,
        path: share.path,
    }))
}

#[derive(Debug, Serialize)]
struct RebuildResponse {
    entries: usize,
}

async fn rebuild(
    State(ctx): State<AppContext>,
) -> std::result::Result<Json<RebuildResponse>, (StatusCode, String)> {
    let state = ctx.state.clone();
    let entries = tokio::task::spawn_blocking(move || state.rebuild())
        .await
        .map_err(|e| error_response(Error::internal(e.to_string())))?;

    Ok(Json(RebuildResponse { entries }))
}
