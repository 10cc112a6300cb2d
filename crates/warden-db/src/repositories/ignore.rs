//! PostgreSQL implementation of IgnoreRepository

use async_trait::async_trait;
use sqlx::PgPool;
use std::collections::HashSet;
use tracing::instrument;

use warden_core::entities::IgnoreCategory;
use warden_core::traits::{IgnoreRepository, RepoResult};
use warden_core::value_objects::Snowflake;

use super::error::{ids_to_db, map_db_error};

/// Table and id column of an ignore category
fn ignore_table(category: IgnoreCategory) -> (&'static str, &'static str) {
    match category {
        IgnoreCategory::Member => ("ignored_members", "user_id"),
        IgnoreCategory::Channel => ("ignored_channels", "channel_id"),
        IgnoreCategory::Role => ("ignored_roles", "role_id"),
    }
}

/// PostgreSQL implementation of IgnoreRepository
#[derive(Clone)]
pub struct PgIgnoreRepository {
    pool: PgPool,
}

impl PgIgnoreRepository {
    /// Create a new PgIgnoreRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IgnoreRepository for PgIgnoreRepository {
    #[instrument(skip(self))]
    async fn find_ids(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
    ) -> RepoResult<HashSet<Snowflake>> {
        let (table, column) = ignore_table(category);
        let sql = format!("SELECT {column} FROM {table} WHERE guild_id = $1");

        let ids = sqlx::query_scalar::<_, i64>(&sql)
            .bind(guild_id.to_db())
            .fetch_all(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(ids.into_iter().map(Snowflake::from_db).collect())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn insert_many(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
        ids: &[Snowflake],
    ) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let (table, column) = ignore_table(category);
        let sql = format!(
            r"
            INSERT INTO {table} ({column}, guild_id)
            SELECT id, $2 FROM UNNEST($1::BIGINT[]) AS t(id)
            ON CONFLICT DO NOTHING
            "
        );

        sqlx::query(&sql)
            .bind(ids_to_db(ids))
            .bind(guild_id.to_db())
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self, ids), fields(count = ids.len()))]
    async fn delete_many(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
        ids: &[Snowflake],
    ) -> RepoResult<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let (table, column) = ignore_table(category);
        let sql = format!("DELETE FROM {table} WHERE guild_id = $1 AND {column} = ANY($2)");

        sqlx::query(&sql)
            .bind(guild_id.to_db())
            .bind(ids_to_db(ids))
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(())
    }
}
