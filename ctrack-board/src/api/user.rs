//! Acting-user resolution
//!
//! Every `/api` request acts as one user, named by the `X-User-Id` header.
//! A request without the header acts as the Anonymous user. A header that
//! is not a UUID, or names no known user, is rejected with 401.

use axum::{
    extract::{Request, State},
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use sqlx::SqlitePool;
use tracing::warn;
use uuid::Uuid;

use crate::error::{Result, StructureError};
use crate::AppState;

/// Header carrying the acting user's guid
pub const USER_HEADER: &str = "x-user-id";

/// Guid of the well-known Anonymous user
pub const ANONYMOUS_USER: Uuid = Uuid::from_u128(1);

/// The acting user, inserted into request extensions by [`user_middleware`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CurrentUser(pub Uuid);

/// Resolve the acting user and attach it to the request
pub async fn user_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response> {
    let user = resolve_user(&state.db, request.headers().get(USER_HEADER)).await?;
    request.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(request).await)
}

async fn resolve_user(pool: &SqlitePool, header: Option<&HeaderValue>) -> Result<Uuid> {
    let Some(value) = header else {
        return Ok(ANONYMOUS_USER);
    };

    let guid = value
        .to_str()
        .ok()
        .and_then(|text| Uuid::parse_str(text.trim()).ok())
        .ok_or_else(|| StructureError::Unauthorized("Malformed user id".to_string()))?;

    if !ctrack_common::db::user_exists(pool, guid).await? {
        warn!("Request for unknown user {}", guid);
        return Err(StructureError::Unauthorized("Unknown user".to_string()));
    }

    Ok(guid)
}
