//! Structure endpoints: tree read, reorder, create, rename, delete

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use super::{rejected, CurrentUser};
use crate::error::Result;
use crate::kind::NodeKind;
use crate::reader::{self, StructureTree};
use crate::reorder::{self, ReorderRequest};
use crate::store::{self, NewNode, NodeView};
use crate::AppState;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;

#[derive(Debug, Default, Deserialize)]
pub struct StructureQuery {
    pub include_resources: Option<String>,
}

impl StructureQuery {
    /// `true`/`1`/`yes` in any case; anything else (or absent) is false
    fn include_resources(&self) -> bool {
        self.include_resources
            .as_deref()
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RenameRequest {
    pub title: Option<String>,
    pub color: Option<String>,
}

/// GET /api/structure?include_resources=true
pub async fn get_structure(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    query: std::result::Result<Query<StructureQuery>, QueryRejection>,
) -> Result<Json<StructureTree>> {
    let Query(query) = query.map_err(rejected)?;
    let tree = reader::get_tree(&state.db, user, query.include_resources()).await?;
    Ok(Json(tree))
}

/// PUT /api/structure/reorder
///
/// Body: `{"type": "week", "id": 5, "new_parent_id": 2, "new_index": 0}`
pub async fn reorder_node(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    payload: JsonBody<ReorderRequest>,
) -> Result<Json<NodeView>> {
    let Json(request) = payload.map_err(rejected)?;
    let moved = reorder::reorder(&state.db, &state.retry, user, &request).await?;
    Ok(Json(moved))
}

/// POST /api/structure/:type
pub async fn create_node(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: std::result::Result<Path<String>, PathRejection>,
    payload: JsonBody<NewNode>,
) -> Result<(StatusCode, Json<NodeView>)> {
    let Path(kind) = path.map_err(rejected)?;
    let kind: NodeKind = kind.parse()?;
    let Json(node) = payload.map_err(rejected)?;

    let created = store::create_node(&state.db, &state.retry, user, kind, &node).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// PUT /api/structure/:type/:id
///
/// Body: `{"title": "...", "color": "#rrggbb"}`; color applies to phases only.
pub async fn rename_node(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: std::result::Result<Path<(String, i64)>, PathRejection>,
    payload: JsonBody<RenameRequest>,
) -> Result<Json<NodeView>> {
    let Path((kind, id)) = path.map_err(rejected)?;
    let kind: NodeKind = kind.parse()?;
    let Json(body) = payload.map_err(rejected)?;

    let renamed = store::rename_node(
        &state.db,
        &state.retry,
        user,
        kind,
        id,
        body.title.as_deref(),
        body.color.as_deref(),
    )
    .await?;
    Ok(Json(renamed))
}

/// DELETE /api/structure/:type/:id
pub async fn delete_node(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    path: std::result::Result<Path<(String, i64)>, PathRejection>,
) -> Result<Json<Value>> {
    let Path((kind, id)) = path.map_err(rejected)?;
    let kind: NodeKind = kind.parse()?;

    let outcome = store::delete_node(&state.db, &state.retry, user, kind, id).await?;
    Ok(Json(json!({
        "success": true,
        "moved_to_inbox": outcome.moved_to_inbox,
    })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_resources_is_lenient() {
        let query = |value: Option<&str>| StructureQuery {
            include_resources: value.map(str::to_string),
        };
        assert!(query(Some("true")).include_resources());
        assert!(query(Some("TRUE")).include_resources());
        assert!(query(Some("1")).include_resources());
        assert!(!query(Some("false")).include_resources());
        assert!(!query(Some("nope")).include_resources());
        assert!(!query(None).include_resources());
    }
}
