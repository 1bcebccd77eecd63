//! User rows
//!
//! Accounts are not managed here beyond the lookup every request needs and a
//! way to register additional users.

use crate::{Error, Result};
use sqlx::SqlitePool;
use uuid::Uuid;

/// Returns true if a user with this guid exists
pub async fn user_exists(pool: &SqlitePool, guid: Uuid) -> Result<bool> {
    let found: Option<String> = sqlx::query_scalar("SELECT guid FROM users WHERE guid = ?")
        .bind(guid.to_string())
        .fetch_optional(pool)
        .await?;

    Ok(found.is_some())
}

/// Insert a user if the guid is not already present
pub async fn ensure_user(pool: &SqlitePool, guid: Uuid, username: &str) -> Result<()> {
    let username = username.trim();
    if username.is_empty() {
        return Err(Error::InvalidInput("Username is required".to_string()));
    }

    sqlx::query("INSERT OR IGNORE INTO users (guid, username) VALUES (?, ?)")
        .bind(guid.to_string())
        .bind(username)
        .execute(pool)
        .await?;

    Ok(())
}
