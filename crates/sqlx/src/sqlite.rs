use crate::common::{GrantRow, datetime_to_string, rows_to_grants};
use async_trait::async_trait;
use rowguard_core::access::{BizId, BizType, GrantLookup, PermissionGrant};
use rowguard_core::{Error, Result};
use sqlx::{Pool, Sqlite};
use tracing::instrument;

pub struct SqliteGrantStore {
    pool: Pool<Sqlite>,
}

impl SqliteGrantStore {
    pub async fn new(database_url: &str) -> Result<Self> {
        use sqlx::sqlite::SqliteConnectOptions;
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| Error::StateError(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        let pool = sqlx::SqlitePool::connect_with(options)
            .await
            .map_err(|e| Error::StateError(format!("Failed to connect to database: {e}")))?;

        sqlx::migrate!("./migrations/sqlite")
            .run(&pool)
            .await
            .map_err(|e| Error::StateError(format!("Failed to run migrations: {e}")))?;

        Ok(Self { pool })
    }

    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &Pool<Sqlite> {
        &self.pool
    }

    /// Record a grant. Grants are read back in id order, which decides
    /// precedence when a user holds more than one grant on an object.
    pub async fn insert_grant(&self, grant: &PermissionGrant) -> Result<()> {
        let created_at = datetime_to_string(chrono::Utc::now());

        sqlx::query(
            "INSERT INTO crm_permission (biz_type, biz_id, user_id, level, created_at) VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(grant.biz_type.tag())
        .bind(grant.biz_id)
        .bind(grant.user_id)
        .bind(grant.level.tag())
        .bind(&created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| Error::StateError(format!("Failed to insert grant: {e}")))?;

        Ok(())
    }
}

#[async_trait]
impl GrantLookup for SqliteGrantStore {
    #[instrument(name = "db.get_grants", skip(self, biz_type), fields(biz_type = %biz_type))]
    async fn get_grants(&self, biz_type: BizType, biz_id: BizId) -> Result<Vec<PermissionGrant>> {
        let rows = sqlx::query_as::<_, GrantRow>(
            "SELECT biz_type, biz_id, user_id, level FROM crm_permission WHERE biz_type = ?1 AND biz_id = ?2 ORDER BY id",
        )
        .bind(biz_type.tag())
        .bind(biz_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| Error::StateError(format!("Failed to get grants: {e}")))?;

        rows_to_grants(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rowguard_core::access::{PermissionEvaluator, PermissionLevel, PolicyDecision};
    use rowguard_core::tests::grants::{GrantLookupTestSuite, SeedGrants};
    use std::sync::Arc;

    #[async_trait]
    impl SeedGrants for SqliteGrantStore {
        async fn seed(&self, grants: &[PermissionGrant]) -> Result<()> {
            for grant in grants {
                self.insert_grant(grant).await?;
            }
            Ok(())
        }
    }

    async fn memory_store() -> SqliteGrantStore {
        SqliteGrantStore::new(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn test_sqlite_compliance() {
        let suite = GrantLookupTestSuite::new(memory_store().await);
        suite.run_all_tests().await.expect("All tests should pass");
    }

    #[tokio::test]
    async fn test_unknown_level_is_reported() {
        let store = memory_store().await;
        sqlx::query(
            "INSERT INTO crm_permission (biz_type, biz_id, user_id, level, created_at) VALUES (1, 1, 7, 9, 'now')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let result = store.get_grants(BizType::Leads, 1).await;
        assert!(matches!(result, Err(Error::UnknownPermissionLevel(9))));
    }

    #[tokio::test]
    async fn test_first_inserted_grant_decides() {
        let store = memory_store().await;
        store
            .seed(&[
                PermissionGrant::new(BizType::Business, 5, 7, PermissionLevel::Owner),
                PermissionGrant::new(BizType::Business, 5, 9, PermissionLevel::Read),
                PermissionGrant::new(BizType::Business, 5, 9, PermissionLevel::Write),
            ])
            .await
            .unwrap();

        let evaluator = PermissionEvaluator::new(Arc::new(store));
        let read = evaluator
            .check_access(9, BizType::Business, Some(5), PermissionLevel::Read)
            .await
            .unwrap();
        assert!(read.is_allowed());

        let write = evaluator
            .check_access(9, BizType::Business, Some(5), PermissionLevel::Write)
            .await
            .unwrap();
        assert_eq!(write, PolicyDecision::Deny);
    }
}
