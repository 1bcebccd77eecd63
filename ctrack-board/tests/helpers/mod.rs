//! Shared fixtures for ctrack-board integration tests

#![allow(dead_code)]

use std::collections::HashMap;
use std::time::Duration;

use ctrack_board::api::user::ANONYMOUS_USER;
use ctrack_board::store::{self, NewNode, NodeView};
use ctrack_board::{NodeKind, RetryPolicy};
use ctrack_common::config::DatabaseConfig;
use ctrack_common::db::{ensure_user, init_database};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tempfile::TempDir;
use uuid::Uuid;

/// A fresh database in a temp dir; the dir lives as long as this value
pub struct TestDb {
    pub pool: SqlitePool,
    pub policy: RetryPolicy,
    pub user: Uuid,
    _dir: TempDir,
}

pub async fn setup() -> TestDb {
    setup_with(&DatabaseConfig::default()).await
}

/// Database whose writers fail at once instead of waiting for the lock
pub async fn setup_no_wait() -> TestDb {
    let config = DatabaseConfig {
        busy_timeout_ms: 0,
        ..DatabaseConfig::default()
    };
    setup_with(&config).await
}

pub async fn setup_with(config: &DatabaseConfig) -> TestDb {
    let dir = TempDir::new().unwrap();
    let pool = init_database(&dir.path().join("ctrack.db"), config)
        .await
        .unwrap();

    TestDb {
        pool,
        policy: fast_policy(),
        user: ANONYMOUS_USER,
        _dir: dir,
    }
}

pub fn fast_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 5,
        backoff: Duration::from_millis(5),
    }
}

impl TestDb {
    /// Register another user and return its guid
    pub async fn add_user(&self, name: &str) -> Uuid {
        let guid = Uuid::new_v4();
        ensure_user(&self.pool, guid, name).await.unwrap();
        guid
    }

    pub async fn create(&self, kind: NodeKind, parent_id: Option<i64>, title: &str) -> NodeView {
        self.create_as(self.user, kind, parent_id, title).await
    }

    pub async fn create_as(
        &self,
        user: Uuid,
        kind: NodeKind,
        parent_id: Option<i64>,
        title: &str,
    ) -> NodeView {
        let node = NewNode {
            parent_id,
            title: title.to_string(),
            ..NewNode::default()
        };
        store::create_node(&self.pool, &self.policy, user, kind, &node)
            .await
            .unwrap()
    }

    /// Phase → week → day chain, returned as (phase, week, day) ids
    pub async fn chain(&self, prefix: &str) -> (i64, i64, i64) {
        let phase = self.create(NodeKind::Phase, None, &format!("{} phase", prefix)).await;
        let week = self.create(NodeKind::Week, Some(phase.id), &format!("{} week", prefix)).await;
        let day = self.create(NodeKind::Day, Some(week.id), &format!("{} day", prefix)).await;
        (phase.id, week.id, day.id)
    }

    /// Titles of a sibling set in display order
    pub async fn titles(&self, kind: NodeKind, parent: Option<i64>) -> Vec<String> {
        let sql = match kind.parent_column() {
            Some(column) => format!(
                "SELECT title FROM {} WHERE user_id = ? AND {} = ? ORDER BY order_index",
                kind.table(),
                column
            ),
            None => format!(
                "SELECT title FROM {} WHERE user_id = ? AND ? IS NULL ORDER BY order_index",
                kind.table()
            ),
        };
        sqlx::query_scalar(&sql)
            .bind(self.user.to_string())
            .bind(parent)
            .fetch_all(&self.pool)
            .await
            .unwrap()
    }

    /// Open a transaction on another pooled connection that holds the
    /// write lock until it is committed or dropped
    pub async fn hold_write_lock(&self) -> Transaction<'static, Sqlite> {
        let mut tx = self.pool.begin().await.unwrap();
        sqlx::query("UPDATE phases SET order_index = order_index")
            .execute(&mut *tx)
            .await
            .unwrap();
        tx
    }

    pub async fn activity_count(&self) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM activity_log")
            .fetch_one(&self.pool)
            .await
            .unwrap()
    }

    /// Id of the Inbox day, if it exists yet
    pub async fn inbox_day(&self) -> Option<i64> {
        sqlx::query_scalar("SELECT id FROM days WHERE user_id = ? AND is_inbox = 1")
            .bind(self.user.to_string())
            .fetch_optional(&self.pool)
            .await
            .unwrap()
    }

    /// Panics unless every sibling set of every user is positioned exactly 0..n-1
    pub async fn assert_contiguous(&self) {
        for kind in NodeKind::ALL {
            let sql = format!(
                "SELECT user_id, {} AS parent, order_index FROM {} ORDER BY user_id, parent, order_index",
                kind.parent_column().unwrap_or("0"),
                kind.table()
            );
            let rows: Vec<(String, i64, i64)> =
                sqlx::query_as(&sql).fetch_all(&self.pool).await.unwrap();

            let mut sets: HashMap<(String, i64), Vec<i64>> = HashMap::new();
            for (user, parent, order_index) in rows {
                sets.entry((user, parent)).or_default().push(order_index);
            }

            for ((user, parent), positions) in sets {
                let expected: Vec<i64> = (0..positions.len() as i64).collect();
                assert_eq!(
                    positions, expected,
                    "{} siblings of parent {} (user {}) are not contiguous",
                    kind, parent, user
                );
            }
        }
    }
}
