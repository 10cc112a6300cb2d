//! PostgreSQL implementation of RewardRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use warden_core::entities::Reward;
use warden_core::traits::{RepoResult, RewardRepository};
use warden_core::value_objects::Snowflake;

use crate::models::RewardModel;

use super::error::map_db_error;

/// PostgreSQL implementation of RewardRepository
#[derive(Clone)]
pub struct PgRewardRepository {
    pool: PgPool,
}

impl PgRewardRepository {
    /// Create a new PgRewardRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RewardRepository for PgRewardRepository {
    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Reward>> {
        let results = sqlx::query_as::<_, RewardModel>(
            r"
            SELECT role_id, guild_id, reward_level, reward_message
            FROM rewards
            WHERE guild_id = $1
            ORDER BY reward_level, role_id
            ",
        )
        .bind(guild_id.to_db())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Reward::from).collect())
    }

    #[instrument(skip(self), fields(guild_id = %reward.guild_id, role_id = %reward.role_id))]
    async fn upsert(&self, reward: &Reward) -> RepoResult<()> {
        sqlx::query(
            r"
            INSERT INTO rewards (role_id, guild_id, reward_level, reward_message)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (role_id, guild_id) DO UPDATE
            SET reward_level = EXCLUDED.reward_level,
                reward_message = EXCLUDED.reward_message
            ",
        )
        .bind(reward.role_id.to_db())
        .bind(reward.guild_id.to_db())
        .bind(reward.level)
        .bind(reward.message.as_deref())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        let result = sqlx::query(
            r"
            DELETE FROM rewards
            WHERE role_id = $1 AND guild_id = $2
            ",
        )
        .bind(role_id.to_db())
        .bind(guild_id.to_db())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }
}
