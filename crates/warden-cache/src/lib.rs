//! # warden-cache
//!
//! In-process cache-aside layer for guild settings and moderation state.
//!
//! ## Features
//!
//! - **Typed keys**: a [`CacheKey<T>`] can only ever hold a `T`
//! - **Sliding TTL**: every hit restarts the entry's time-to-live
//! - **Invalidation generations**: a load that raced a write never installs
//!   the value it read before the write
//! - **Background sweeper**: periodic eviction of expired entries
//!
//! ## Example
//!
//! ```ignore
//! use warden_cache::{keys, CacheConfig, SettingsCache};
//!
//! let cache = Arc::new(SettingsCache::new(CacheConfig::default()));
//! cache.spawn_sweeper();
//!
//! let enabled = cache
//!     .get_or_load(&keys::module_enabled(module, guild_id), || async {
//!         repo.find_module_enabled(module, guild_id).await.map(|row| row.unwrap_or(false))
//!     })
//!     .await?;
//!
//! // After a committed write:
//! cache.invalidate(&keys::module_enabled(module, guild_id));
//! ```

pub mod config;
pub mod key;
pub mod store;

pub use config::CacheConfig;
pub use key::{keys, CacheKey};
pub use store::SettingsCache;
