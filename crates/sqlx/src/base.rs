//! Base generic SQLx implementation

use async_trait::async_trait;
use rowguard_core::access::{BizId, BizType, GrantLookup, PermissionGrant};
use rowguard_core::{Error, Result};
use sqlx::{Database, Executor, FromRow, IntoArguments, Pool};
use std::marker::PhantomData;
use tracing::instrument;

use crate::common::{GrantRow, rows_to_grants};

/// Generic SQLx implementation of GrantLookup
pub struct SqlxGrantStore<DB: Database> {
    pool: Pool<DB>,
    _phantom: PhantomData<DB>,
}

impl<DB: Database> SqlxGrantStore<DB> {
    pub fn from_pool(pool: Pool<DB>) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    /// Get the underlying pool (for running migrations externally)
    pub fn pool(&self) -> &Pool<DB> {
        &self.pool
    }
}

#[async_trait]
impl<DB> GrantLookup for SqlxGrantStore<DB>
where
    DB: Database,
    for<'c> &'c mut <DB as Database>::Connection: Executor<'c, Database = DB>,
    for<'r> GrantRow: FromRow<'r, DB::Row>,
    // Required for async_trait with generic parameters
    DB: Send + Sync,
    DB::Connection: Send,
    // Required for parameter binding
    for<'q> i64: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
    for<'q> i32: sqlx::Encode<'q, DB> + sqlx::Type<DB>,
    // Required for queries
    for<'q> <DB as Database>::Arguments<'q>: IntoArguments<'q, DB>,
{
    #[instrument(name = "db.get_grants", skip(self, biz_type), fields(biz_type = %biz_type))]
    async fn get_grants(&self, biz_type: BizType, biz_id: BizId) -> Result<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            "SELECT biz_type, biz_id, user_id, level FROM crm_permission \
             WHERE biz_type = $1 AND biz_id = $2 ORDER BY id",
        )
        .bind(biz_type.tag())
        .bind(biz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::StateError(format!("Failed to get grants: {e}")))?;

        rows_to_grants(rows)
    }
}
