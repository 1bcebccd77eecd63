//! Resource status endpoint

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Extension, Json,
};
use ctrack_common::db::{Resource, ResourceStatus};
use serde::Deserialize;

use super::{rejected, CurrentUser};
use crate::error::Result;
use crate::{store, AppState};

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// POST /api/resource/:id/status
///
/// Body: `{"status": "not_started" | "in_progress" | "complete" | "skipped"}`
pub async fn set_status(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<StatusRequest>, JsonRejection>,
) -> Result<Json<Resource>> {
    let Path(id) = path.map_err(rejected)?;
    let Json(body) = payload.map_err(rejected)?;
    let status: ResourceStatus = body.status.trim().parse()?;

    let resource = store::set_resource_status(&state.db, &state.retry, user, id, status).await?;
    Ok(Json(resource))
}
