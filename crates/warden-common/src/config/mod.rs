//! Configuration structs

mod app_config;

pub use app_config::{
    AppConfig, AppSettings, CacheSettings, ConfigError, DatabaseSettings, Environment,
};
