//! Activity log endpoint

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    Extension, Json,
};
use serde::Deserialize;

use super::{rejected, CurrentUser};
use crate::activity::{self, ActivityRecord};
use crate::error::Result;
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ActivityQuery {
    pub limit: Option<i64>,
}

/// GET /api/activity?limit=N
///
/// Newest records first; `limit` defaults to and is capped at 100.
pub async fn list_activity(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: std::result::Result<Query<ActivityQuery>, QueryRejection>,
) -> Result<Json<Vec<ActivityRecord>>> {
    let Query(query) = query.map_err(rejected)?;
    let records = activity::recent(&state.db, user, query.limit).await?;
    Ok(Json(records))
}
