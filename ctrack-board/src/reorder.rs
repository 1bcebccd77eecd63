//! Reorder service
//!
//! Moves one node to a new position, optionally under a new parent, and
//! renumbers every affected sibling set in the same transaction.

use serde::Deserialize;
use serde_json::json;
use sqlx::SqlitePool;
use tracing::{debug, info};
use uuid::Uuid;

use crate::activity::{self, Action};
use crate::error::{Result, StructureError};
use crate::kind::NodeKind;
use crate::retry::{with_retry, RetryPolicy};
use crate::store::{
    load_node, lock_node, lock_siblings, parent_exists, sibling_ids, write_sibling_order, NodeView,
};

/// Body of `PUT /api/structure/reorder`
#[derive(Debug, Clone, Deserialize)]
pub struct ReorderRequest {
    #[serde(rename = "type")]
    pub kind: NodeKind,
    pub id: i64,
    /// Destination container; absent means "stay under the current parent".
    /// Ignored for phases.
    #[serde(default)]
    pub new_parent_id: Option<i64>,
    pub new_index: i64,
}

/// Clamp a requested position into `[0, len]`
pub fn clamp_index(new_index: i64, len: usize) -> usize {
    usize::try_from(new_index).map_or(0, |index| index.min(len))
}

/// `siblings` with `id` inserted at the clamped `new_index`.
/// `id` must not already be in `siblings`.
pub fn insert_at(siblings: &[i64], id: i64, new_index: i64) -> Vec<i64> {
    let mut ordered = siblings.to_vec();
    ordered.insert(clamp_index(new_index, siblings.len()), id);
    ordered
}

fn without(siblings: &[i64], id: i64) -> Vec<i64> {
    siblings.iter().copied().filter(|&sibling| sibling != id).collect()
}

/// Apply a reorder request for `user`, retrying on write contention
pub async fn reorder(
    pool: &SqlitePool,
    policy: &RetryPolicy,
    user: Uuid,
    request: &ReorderRequest,
) -> Result<NodeView> {
    let view = with_retry(policy, "reorder", move || reorder_once(pool, user, request)).await?;
    info!(
        "Reordered {} {} to parent {:?} index {}",
        view.kind, view.id, view.parent_id, view.order_index
    );
    Ok(view)
}

async fn reorder_once(pool: &SqlitePool, user: Uuid, request: &ReorderRequest) -> Result<NodeView> {
    let kind = request.kind;
    let id = request.id;
    let user_key = user.to_string();
    let mut tx = pool.begin().await?;

    lock_node(&mut tx, &user_key, kind, id).await?;
    let node = load_node(&mut tx, &user_key, kind, id).await?;

    let target_parent = match kind {
        NodeKind::Phase => None,
        _ => request.new_parent_id.or(node.parent_id),
    };
    let moving = target_parent != node.parent_id;

    if let (true, Some(parent_id), Some(parent_kind)) = (moving, target_parent, kind.parent_kind()) {
        lock_siblings(&mut tx, &user_key, kind, target_parent).await?;
        // The target may have been deleted since the client last read the tree
        if !parent_exists(&mut tx, &user_key, parent_kind, parent_id).await? {
            return Err(StructureError::NotFound(format!(
                "{} {} not found",
                parent_kind, parent_id
            )));
        }
    }

    let source = sibling_ids(&mut tx, &user_key, kind, node.parent_id).await?;

    if moving {
        let target = sibling_ids(&mut tx, &user_key, kind, target_parent).await?;
        let target_after = insert_at(&target, id, request.new_index);
        let source_after = without(&source, id);

        // Target first: the moved row must leave its old slot before the
        // source list is compacted over it
        write_sibling_order(&mut tx, &user_key, kind, target_parent, &target_after).await?;
        write_sibling_order(&mut tx, &user_key, kind, node.parent_id, &source_after).await?;
    } else {
        let reordered = insert_at(&without(&source, id), id, request.new_index);
        if reordered == source {
            debug!("{} {} already at index {}, nothing to do", kind, id, node.order_index);
            return Ok(node);
        }
        write_sibling_order(&mut tx, &user_key, kind, node.parent_id, &reordered).await?;
    }

    let moved = load_node(&mut tx, &user_key, kind, id).await?;

    activity::record(
        &mut tx,
        user,
        Action::Reorder,
        kind,
        id,
        json!({
            "from_parent_id": node.parent_id,
            "from_index": node.order_index,
            "to_parent_id": moved.parent_id,
            "to_index": moved.order_index,
        }),
    )
    .await?;

    tx.commit().await?;
    Ok(moved)
}
