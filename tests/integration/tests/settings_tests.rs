//! Module gate, leveling and log channel tests against the in-memory store
//!
//! Run with: cargo test -p integration-tests --test settings_tests

use std::time::Duration;

use integration_tests::{unique_id, TestContext};
use warden_core::entities::{LogType, ModuleKind};
use warden_core::{DomainError, Snowflake};
use warden_service::dto::{SetRewardRequest, UpdateLevelingSettingsRequest};
use warden_service::{LevelingService, LogChannelService, ModuleService, ServiceError};

// ============================================================================
// Module Gate Tests
// ============================================================================

#[tokio::test]
async fn test_modules_start_disabled() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    for module in ModuleKind::CONFIGURABLE {
        assert!(!modules.is_module_enabled(module, guild).await.unwrap());
    }
}

#[tokio::test]
async fn test_general_bypasses_store() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    assert!(modules.is_module_enabled(ModuleKind::General, guild).await.unwrap());
    modules
        .set_module_state(ModuleKind::General, guild, false)
        .await
        .unwrap();
    assert!(modules.is_module_enabled(ModuleKind::General, guild).await.unwrap());
    assert_eq!(t.store.reads(), 0);
}

#[tokio::test]
async fn test_write_then_read_with_warm_cache() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    assert!(!modules.is_module_enabled(ModuleKind::Moderation, guild).await.unwrap());
    modules
        .set_module_state(ModuleKind::Moderation, guild, true)
        .await
        .unwrap();
    assert!(modules.is_module_enabled(ModuleKind::Moderation, guild).await.unwrap());

    modules
        .set_module_state(ModuleKind::Moderation, guild, false)
        .await
        .unwrap();
    assert!(!modules.is_module_enabled(ModuleKind::Moderation, guild).await.unwrap());
}

#[tokio::test]
async fn test_write_then_read_with_cold_cache() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    modules
        .set_module_state(ModuleKind::UserLog, guild, true)
        .await
        .unwrap();
    t.cold_cache();

    assert!(modules.is_module_enabled(ModuleKind::UserLog, guild).await.unwrap());
}

#[tokio::test]
async fn test_repeated_reads_hit_cache() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    assert!(!modules.is_module_enabled(ModuleKind::Commands, guild).await.unwrap());
    let reads = t.store.reads();

    for _ in 0..5 {
        assert!(!modules.is_module_enabled(ModuleKind::Commands, guild).await.unwrap());
    }
    assert_eq!(t.store.reads(), reads);
}

#[tokio::test]
async fn test_modules_are_independent() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    modules
        .set_module_state(ModuleKind::MessageLog, guild, true)
        .await
        .unwrap();

    let states = modules.get_all_module_states(guild).await.unwrap();
    assert_eq!(states.len(), ModuleKind::CONFIGURABLE.len() + 1);
    for (module, enabled) in states {
        let expected = matches!(module, ModuleKind::General | ModuleKind::MessageLog);
        assert_eq!(enabled, expected, "{module}");
    }
}

#[tokio::test]
async fn test_loader_error_is_not_cached() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    t.store.set_fail_reads(true);
    let err = modules
        .is_module_enabled(ModuleKind::Leveling, guild)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Domain(DomainError::DatabaseError(_))
    ));
    assert!(t.ctx.cache().is_empty());

    t.store.set_fail_reads(false);
    assert!(!modules.is_module_enabled(ModuleKind::Leveling, guild).await.unwrap());
    assert_eq!(t.ctx.cache().len(), 1);
}

#[tokio::test]
async fn test_cancelled_write_leaves_cache_untouched() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let guild = unique_id();

    assert!(!modules.is_module_enabled(ModuleKind::Leveling, guild).await.unwrap());
    let reads = t.store.reads();

    t.store.set_stall_writes(true);
    let result = tokio::time::timeout(
        Duration::from_millis(50),
        modules.set_module_state(ModuleKind::Leveling, guild, true),
    )
    .await;
    assert!(result.is_err());
    t.store.set_stall_writes(false);

    // Still the cached value, and nothing reached the store
    assert!(!modules.is_module_enabled(ModuleKind::Leveling, guild).await.unwrap());
    assert_eq!(t.store.reads(), reads);
    t.cold_cache();
    assert!(!modules.is_module_enabled(ModuleKind::Leveling, guild).await.unwrap());
}

// ============================================================================
// Leveling Tests
// ============================================================================

#[tokio::test]
async fn test_guild_scenario_curve() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let leveling = LevelingService::new(&t.ctx);
    let guild = Snowflake::new(100);

    modules
        .set_module_state(ModuleKind::Leveling, guild, true)
        .await
        .unwrap();
    let settings = leveling
        .update_leveling_settings(
            guild,
            UpdateLevelingSettingsRequest {
                base: Some(15),
                modifier: Some(50),
                amount: Some(5),
                text_time: None,
            },
        )
        .await
        .unwrap();
    assert!(settings.module_enabled);
    assert_eq!(settings.amount, 5);

    assert_eq!(leveling.get_level_from_xp(guild, 0).await.unwrap(), 1);
    assert_eq!(leveling.get_xp_needed_for_level(guild, 2, 0).await.unwrap(), 15);
    assert_eq!(leveling.get_xp_needed_for_level(guild, 2, 1).await.unwrap(), 23);
    assert_eq!(leveling.xp_to_next_level(guild, 20).await.unwrap(), Some(3));
}

#[tokio::test]
async fn test_unconfigured_guild_uses_defaults() {
    let t = TestContext::new();
    let leveling = LevelingService::new(&t.ctx);
    let guild = unique_id();

    let settings = leveling.get_leveling_settings(guild).await.unwrap();
    assert!(!settings.module_enabled);
    assert_eq!(settings.base, 15);
    assert_eq!(settings.modifier, 50);
}

#[tokio::test]
async fn test_update_keeps_unset_fields_and_enabled_flag() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let leveling = LevelingService::new(&t.ctx);
    let guild = unique_id();

    modules
        .set_module_state(ModuleKind::Leveling, guild, true)
        .await
        .unwrap();
    leveling
        .update_leveling_settings(
            guild,
            UpdateLevelingSettingsRequest {
                modifier: Some(100),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    t.cold_cache();

    let settings = leveling.get_leveling_settings(guild).await.unwrap();
    assert!(settings.module_enabled);
    assert_eq!(settings.base, 15);
    assert_eq!(settings.modifier, 100);
    assert!(modules.is_module_enabled(ModuleKind::Leveling, guild).await.unwrap());
}

#[tokio::test]
async fn test_invalid_leveling_update_is_rejected() {
    let t = TestContext::new();
    let leveling = LevelingService::new(&t.ctx);
    let guild = unique_id();

    let err = leveling
        .update_leveling_settings(
            guild,
            UpdateLevelingSettingsRequest {
                base: Some(0),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Validation(_)));

    let settings = leveling.get_leveling_settings(guild).await.unwrap();
    assert_eq!(settings.base, 15);
}

#[tokio::test]
async fn test_rewards_round_trip() {
    let t = TestContext::new();
    let leveling = LevelingService::new(&t.ctx);
    let guild = unique_id();
    let (bronze, silver) = (unique_id(), unique_id());

    assert!(leveling.get_leveling_rewards(guild).await.unwrap().is_empty());

    leveling
        .set_leveling_reward(
            guild,
            SetRewardRequest {
                role_id: bronze,
                level: 5,
                message: None,
            },
        )
        .await
        .unwrap();
    leveling
        .set_leveling_reward(
            guild,
            SetRewardRequest {
                role_id: silver,
                level: 10,
                message: Some("Silver!".to_string()),
            },
        )
        .await
        .unwrap();

    let rewards = leveling.get_leveling_rewards(guild).await.unwrap();
    assert_eq!(rewards.len(), 2);
    assert_eq!(rewards.get(silver).unwrap().message.as_deref(), Some("Silver!"));

    let earned = leveling.rewards_for_level(guild, 7).await.unwrap();
    assert_eq!(earned.len(), 1);
    assert_eq!(earned[0].role_id, bronze);
    assert_eq!(
        leveling.next_reward(guild, 7).await.unwrap().map(|r| r.role_id),
        Some(silver)
    );

    assert!(leveling.remove_leveling_reward(guild, bronze).await.unwrap());
    assert!(!leveling.remove_leveling_reward(guild, bronze).await.unwrap());
    assert!(leveling.rewards_for_level(guild, 7).await.unwrap().is_empty());
}

// ============================================================================
// Log Channel Tests
// ============================================================================

#[tokio::test]
async fn test_general_log_channel() {
    let t = TestContext::new();
    let log_channels = LogChannelService::new(&t.ctx);
    let guild = unique_id();
    let channel = unique_id();

    assert_eq!(
        log_channels.get_log_channel(LogType::General, guild).await.unwrap(),
        None
    );
    log_channels
        .set_log_channel(LogType::General, guild, Some(channel))
        .await
        .unwrap();
    assert_eq!(
        log_channels.get_log_channel(LogType::General, guild).await.unwrap(),
        Some(channel)
    );
}

#[tokio::test]
async fn test_module_log_channel_follows_module_state() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let log_channels = LogChannelService::new(&t.ctx);
    let guild = unique_id();
    let channel = unique_id();

    log_channels
        .set_log_channel(LogType::Moderation, guild, Some(channel))
        .await
        .unwrap();
    assert_eq!(
        log_channels.get_log_channel(LogType::Moderation, guild).await.unwrap(),
        None
    );

    modules
        .set_module_state(ModuleKind::Moderation, guild, true)
        .await
        .unwrap();
    assert_eq!(
        log_channels.get_log_channel(LogType::Moderation, guild).await.unwrap(),
        Some(channel)
    );
    assert_eq!(
        log_channels.get_log_channel(LogType::UserLog, guild).await.unwrap(),
        None
    );
}

#[tokio::test]
async fn test_leveling_log_channel_keeps_curve() {
    let t = TestContext::new();
    let modules = ModuleService::new(&t.ctx);
    let leveling = LevelingService::new(&t.ctx);
    let log_channels = LogChannelService::new(&t.ctx);
    let guild = unique_id();
    let channel = unique_id();

    modules
        .set_module_state(ModuleKind::Leveling, guild, true)
        .await
        .unwrap();
    leveling
        .update_leveling_settings(
            guild,
            UpdateLevelingSettingsRequest {
                base: Some(40),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    log_channels
        .set_log_channel(LogType::Leveling, guild, Some(channel))
        .await
        .unwrap();

    assert_eq!(
        log_channels.get_log_channel(LogType::Leveling, guild).await.unwrap(),
        Some(channel)
    );
    assert_eq!(leveling.get_leveling_settings(guild).await.unwrap().base, 40);
}
