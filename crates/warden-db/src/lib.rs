//! # warden-db
//!
//! Database layer implementing repository traits with PostgreSQL via SQLx.
//!
//! ## Overview
//!
//! This crate provides PostgreSQL implementations for all repository traits
//! defined in `warden-core`. It handles:
//!
//! - Connection pool management and schema migrations
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations
//!
//! ## Usage
//!
//! ```rust,ignore
//! use warden_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use warden_db::repositories::PgModuleSettingsRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let modules = PgModuleSettingsRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use pool::{
    bundled_migrations_dir, create_pool, create_pool_from_env, run_migrations, run_migrations_from,
    DatabaseConfig, PgPool,
};
pub use repositories::{
    PgGuildSettingsRepository, PgIgnoreRepository, PgLockRepository, PgLogOverrideRepository,
    PgModuleSettingsRepository, PgMuteRepository, PgRewardRepository, PgTrackerRepository,
};
