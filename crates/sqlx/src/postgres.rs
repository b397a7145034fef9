//! PostgreSQL-specific implementation

use crate::base::SqlxGrantStore;

/// PostgreSQL implementation of GrantLookup
pub type PostgresGrantStore = SqlxGrantStore<sqlx::Postgres>;

#[cfg(all(test, feature = "postgres"))]
mod tests {
    use super::*;
    use crate::common::datetime_to_string;
    use async_trait::async_trait;
    use rowguard_core::access::{BizType, GrantLookup, PermissionGrant, PermissionLevel};
    use rowguard_core::tests::grants::{GrantLookupTestSuite, SeedGrants};
    use rowguard_core::{Error, Result};

    #[async_trait]
    impl SeedGrants for PostgresGrantStore {
        async fn seed(&self, grants: &[PermissionGrant]) -> Result<()> {
            for grant in grants {
                sqlx::query(
                    "INSERT INTO crm_permission (biz_type, biz_id, user_id, level, created_at) \
                     VALUES ($1, $2, $3, $4, $5)",
                )
                .bind(grant.biz_type.tag())
                .bind(grant.biz_id)
                .bind(grant.user_id)
                .bind(grant.level.tag())
                .bind(datetime_to_string(chrono::Utc::now()))
                .execute(self.pool())
                .await
                .map_err(|e| Error::StateError(format!("Failed to seed grant: {e}")))?;
            }
            Ok(())
        }
    }

    async fn setup_postgres_store() -> PostgresGrantStore {
        // This test requires DATABASE_URL to be set to a PostgreSQL instance
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "postgres://localhost/rowguard_test".to_string());

        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect(&database_url)
            .await
            .unwrap();

        let store = PostgresGrantStore::from_pool(pool);

        // Clean up any existing data
        let _ = sqlx::query("DROP TABLE IF EXISTS crm_permission CASCADE")
            .execute(store.pool())
            .await;

        // Run migrations
        sqlx::raw_sql(include_str!("../migrations/postgres/0001_initial_schema.sql"))
            .execute(store.pool())
            .await
            .unwrap();

        store
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL to be running
    async fn test_postgres_compliance() {
        let store = setup_postgres_store().await;
        GrantLookupTestSuite::new(store)
            .run_all_tests()
            .await
            .expect("PostgreSQL store should pass all tests");
    }

    #[tokio::test]
    #[ignore] // Requires PostgreSQL to be running
    async fn test_postgres_rejects_unknown_level() {
        let store = setup_postgres_store().await;
        sqlx::query(
            "INSERT INTO crm_permission (biz_type, biz_id, user_id, level, created_at) \
             VALUES (1, 42, 7, 9, 'now')",
        )
        .execute(store.pool())
        .await
        .unwrap();

        let result = store.get_grants(BizType::Leads, 42).await;
        assert!(matches!(result, Err(Error::UnknownPermissionLevel(9))));

        let owned = PermissionGrant::new(BizType::Leads, 43, 7, PermissionLevel::Owner);
        store.seed(std::slice::from_ref(&owned)).await.unwrap();
        assert_eq!(
            store.get_grants(BizType::Leads, 43).await.unwrap(),
            vec![owned]
        );
    }
}
