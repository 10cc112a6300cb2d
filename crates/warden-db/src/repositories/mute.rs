//! PostgreSQL implementation of MuteRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use warden_core::entities::Mute;
use warden_core::traits::{MuteRepository, RepoResult};
use warden_core::value_objects::Snowflake;

use crate::models::MuteModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MuteRepository
#[derive(Clone)]
pub struct PgMuteRepository {
    pool: PgPool,
}

impl PgMuteRepository {
    /// Create a new PgMuteRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MuteRepository for PgMuteRepository {
    #[instrument(skip(self))]
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Mute>> {
        let result = sqlx::query_as::<_, MuteModel>(
            r"
            SELECT user_id, guild_id, sin_id, end_time
            FROM mutes
            WHERE guild_id = $1 AND user_id = $2
            ",
        )
        .bind(guild_id.to_db())
        .bind(user_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Mute::from))
    }

    #[instrument(skip(self))]
    async fn find_active(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Mute>> {
        let result = sqlx::query_as::<_, MuteModel>(
            r"
            SELECT user_id, guild_id, sin_id, end_time
            FROM mutes
            WHERE guild_id = $1 AND user_id = $2 AND end_time > $3
            ",
        )
        .bind(guild_id.to_db())
        .bind(user_id.to_db())
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Mute::from))
    }

    #[instrument(skip(self))]
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Mute>> {
        let results = sqlx::query_as::<_, MuteModel>(
            r"
            SELECT user_id, guild_id, sin_id, end_time
            FROM mutes
            WHERE guild_id = $1
            ORDER BY end_time
            ",
        )
        .bind(guild_id.to_db())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Mute::from).collect())
    }

    #[instrument(skip(self), fields(guild_id = %mute.guild_id, user_id = %mute.user_id))]
    async fn replace(&self, mute: &Mute) -> RepoResult<Option<Mute>> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let replaced = sqlx::query_as::<_, MuteModel>(
            r"
            DELETE FROM mutes
            WHERE guild_id = $1 AND user_id = $2
            RETURNING user_id, guild_id, sin_id, end_time
            ",
        )
        .bind(mute.guild_id.to_db())
        .bind(mute.user_id.to_db())
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r"
            INSERT INTO mutes (user_id, guild_id, sin_id, end_time)
            VALUES ($1, $2, $3, $4)
            ",
        )
        .bind(mute.user_id.to_db())
        .bind(mute.guild_id.to_db())
        .bind(mute.sin_id)
        .bind(mute.end_time)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        Ok(replaced.map(Mute::from))
    }

    #[instrument(skip(self))]
    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Mute>> {
        let result = sqlx::query_as::<_, MuteModel>(
            r"
            DELETE FROM mutes
            WHERE guild_id = $1 AND user_id = $2
            RETURNING user_id, guild_id, sin_id, end_time
            ",
        )
        .bind(guild_id.to_db())
        .bind(user_id.to_db())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Mute::from))
    }

    #[instrument(skip(self))]
    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Mute>> {
        let results = sqlx::query_as::<_, MuteModel>(
            r"
            DELETE FROM mutes
            WHERE end_time <= $1
            RETURNING user_id, guild_id, sin_id, end_time
            ",
        )
        .bind(now)
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Mute::from).collect())
    }
}
