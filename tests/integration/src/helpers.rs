//! Test helpers for integration tests
//!
//! [`InMemoryStore`] implements every repository trait over plain maps so
//! the services can be exercised without PostgreSQL. It mirrors the schema's
//! foreign keys (rows need their guild) and counts store reads so tests can
//! tell cache hits from misses.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use warden_cache::{CacheConfig, SettingsCache};
use warden_core::entities::{
    ChannelLogOverride, CommandSettings, GuildSettings, IgnoreCategory, LevelingSettings, Lock,
    MessageLogSettings, ModerationSettings, ModuleKind, ModuleSettings, Mute, Reward, Tracker,
    UserLogSettings,
};
use warden_core::traits::{
    GuildSettingsRepository, IgnoreRepository, LockRepository, LogOverrideRepository,
    ModuleSettingsRepository, MuteRepository, RepoResult, RewardRepository, TrackerRepository,
};
use warden_core::{DomainError, Snowflake};
use warden_service::ServiceContext;

#[derive(Default)]
struct State {
    guilds: HashMap<Snowflake, GuildSettings>,
    leveling: HashMap<Snowflake, LevelingSettings>,
    moderation: HashMap<Snowflake, ModerationSettings>,
    message_log: HashMap<Snowflake, MessageLogSettings>,
    user_log: HashMap<Snowflake, UserLogSettings>,
    commands: HashMap<Snowflake, CommandSettings>,
    ignored: HashMap<(IgnoreCategory, Snowflake), HashSet<Snowflake>>,
    overrides: HashMap<Snowflake, ChannelLogOverride>,
    rewards: HashMap<(Snowflake, Snowflake), Reward>,
    mutes: HashMap<(Snowflake, Snowflake), Mute>,
    locks: HashMap<(Snowflake, Snowflake), Lock>,
    trackers: HashMap<(Snowflake, Snowflake), Tracker>,
}

impl State {
    fn require_guild(&self, guild_id: Snowflake) -> RepoResult<()> {
        if self.guilds.contains_key(&guild_id) {
            Ok(())
        } else {
            Err(DomainError::DatabaseError(format!(
                "foreign key violation: guild {guild_id} does not exist"
            )))
        }
    }
}

/// In-memory implementation of every repository trait
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<State>,
    reads: AtomicUsize,
    fail_reads: AtomicBool,
    stall_writes: AtomicBool,
    fail_mute_inserts: AtomicBool,
    sweep_after_find: AtomicBool,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Number of read queries served so far
    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    /// Make every read fail until switched off again
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Make every write hang before it touches the maps
    pub fn set_stall_writes(&self, stall: bool) {
        self.stall_writes.store(stall, Ordering::SeqCst);
    }

    /// Make the insert half of a mute replacement fail
    pub fn set_fail_mute_inserts(&self, fail: bool) {
        self.fail_mute_inserts.store(fail, Ordering::SeqCst);
    }

    /// Drop each lock or tracker row right after a lookup returns it, as a
    /// sweep running between a read and the following write would
    pub fn set_sweep_after_find(&self, sweep: bool) {
        self.sweep_after_find.store(sweep, Ordering::SeqCst);
    }

    /// Number of ids stored for an ignore category
    pub fn ignored_count(&self, category: IgnoreCategory, guild_id: Snowflake) -> usize {
        self.state
            .lock()
            .ignored
            .get(&(category, guild_id))
            .map_or(0, HashSet::len)
    }

    /// Number of tracker rows of a member
    pub fn tracker_count(&self, guild_id: Snowflake, user_id: Snowflake) -> usize {
        self.state
            .lock()
            .trackers
            .values()
            .filter(|t| t.guild_id == guild_id && t.user_id == user_id)
            .count()
    }

    fn read(&self) -> RepoResult<()> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("store unavailable".to_string()));
        }
        Ok(())
    }

    async fn write(&self) {
        if self.stall_writes.load(Ordering::SeqCst) {
            std::future::pending::<()>().await;
        }
    }
}

/// Drain rows whose end time is at or before `now`
fn drain_expired<K, V>(rows: &mut HashMap<K, V>, now: DateTime<Utc>, end: impl Fn(&V) -> DateTime<Utc>) -> Vec<V>
where
    K: Clone + Eq + std::hash::Hash,
{
    let expired: Vec<K> = rows
        .iter()
        .filter(|(_, row)| end(row) <= now)
        .map(|(key, _)| key.clone())
        .collect();
    expired
        .into_iter()
        .filter_map(|key| rows.remove(&key))
        .collect()
}

#[async_trait]
impl GuildSettingsRepository for InMemoryStore {
    async fn find(&self, guild_id: Snowflake) -> RepoResult<Option<GuildSettings>> {
        self.read()?;
        Ok(self.state.lock().guilds.get(&guild_id).cloned())
    }

    async fn ensure(&self, guild_id: Snowflake) -> RepoResult<()> {
        self.write().await;
        self.state
            .lock()
            .guilds
            .entry(guild_id)
            .or_insert_with(|| GuildSettings::new(guild_id));
        Ok(())
    }

    async fn set_log_channel(
        &self,
        guild_id: Snowflake,
        channel_id: Option<Snowflake>,
    ) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(guild_id)?;
        if let Some(guild) = state.guilds.get_mut(&guild_id) {
            guild.log_channel_id = channel_id;
        }
        Ok(())
    }
}

#[async_trait]
impl ModuleSettingsRepository for InMemoryStore {
    async fn find_module_enabled(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
    ) -> RepoResult<Option<bool>> {
        self.read()?;
        let state = self.state.lock();
        let enabled = match module {
            ModuleKind::General => return Err(DomainError::ModuleWithoutSettings(module.as_str())),
            ModuleKind::Leveling => state.leveling.get(&guild_id).map(|s| s.module_enabled),
            ModuleKind::Moderation => state.moderation.get(&guild_id).map(|s| s.module_enabled),
            ModuleKind::MessageLog => state.message_log.get(&guild_id).map(|s| s.module_enabled),
            ModuleKind::UserLog => state.user_log.get(&guild_id).map(|s| s.module_enabled),
            ModuleKind::Commands => state.commands.get(&guild_id).map(|s| s.module_enabled),
        };
        Ok(enabled)
    }

    async fn set_module_enabled(
        &self,
        module: ModuleKind,
        guild_id: Snowflake,
        enabled: bool,
    ) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(guild_id)?;
        match module {
            ModuleKind::General => return Err(DomainError::ModuleWithoutSettings(module.as_str())),
            ModuleKind::Leveling => {
                state
                    .leveling
                    .entry(guild_id)
                    .or_insert_with(|| LevelingSettings::default_for(guild_id))
                    .module_enabled = enabled;
            }
            ModuleKind::Moderation => {
                state
                    .moderation
                    .entry(guild_id)
                    .or_insert_with(|| ModerationSettings::default_for(guild_id))
                    .module_enabled = enabled;
            }
            ModuleKind::MessageLog => {
                state
                    .message_log
                    .entry(guild_id)
                    .or_insert_with(|| MessageLogSettings::default_for(guild_id))
                    .module_enabled = enabled;
            }
            ModuleKind::UserLog => {
                state
                    .user_log
                    .entry(guild_id)
                    .or_insert_with(|| UserLogSettings::default_for(guild_id))
                    .module_enabled = enabled;
            }
            ModuleKind::Commands => {
                state
                    .commands
                    .entry(guild_id)
                    .or_insert_with(|| CommandSettings::default_for(guild_id))
                    .module_enabled = enabled;
            }
        }
        Ok(())
    }

    async fn find_leveling(&self, guild_id: Snowflake) -> RepoResult<Option<LevelingSettings>> {
        self.read()?;
        Ok(self.state.lock().leveling.get(&guild_id).cloned())
    }

    async fn save_leveling(&self, settings: &LevelingSettings) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(settings.guild_id)?;
        state.leveling.insert(settings.guild_id, settings.clone());
        Ok(())
    }

    async fn find_moderation(&self, guild_id: Snowflake) -> RepoResult<Option<ModerationSettings>> {
        self.read()?;
        Ok(self.state.lock().moderation.get(&guild_id).cloned())
    }

    async fn save_moderation(&self, settings: &ModerationSettings) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(settings.guild_id)?;
        state.moderation.insert(settings.guild_id, settings.clone());
        Ok(())
    }

    async fn find_message_log(&self, guild_id: Snowflake) -> RepoResult<Option<MessageLogSettings>> {
        self.read()?;
        Ok(self.state.lock().message_log.get(&guild_id).cloned())
    }

    async fn save_message_log(&self, settings: &MessageLogSettings) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(settings.guild_id)?;
        state.message_log.insert(settings.guild_id, settings.clone());
        Ok(())
    }

    async fn find_user_log(&self, guild_id: Snowflake) -> RepoResult<Option<UserLogSettings>> {
        self.read()?;
        Ok(self.state.lock().user_log.get(&guild_id).cloned())
    }

    async fn save_user_log(&self, settings: &UserLogSettings) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(settings.guild_id)?;
        state.user_log.insert(settings.guild_id, settings.clone());
        Ok(())
    }

    async fn find_commands(&self, guild_id: Snowflake) -> RepoResult<Option<CommandSettings>> {
        self.read()?;
        Ok(self.state.lock().commands.get(&guild_id).cloned())
    }

    async fn save_commands(&self, settings: &CommandSettings) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(settings.guild_id)?;
        state.commands.insert(settings.guild_id, settings.clone());
        Ok(())
    }
}

#[async_trait]
impl IgnoreRepository for InMemoryStore {
    async fn find_ids(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
    ) -> RepoResult<HashSet<Snowflake>> {
        self.read()?;
        Ok(self
            .state
            .lock()
            .ignored
            .get(&(category, guild_id))
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_many(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
        ids: &[Snowflake],
    ) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(guild_id)?;
        state
            .ignored
            .entry((category, guild_id))
            .or_default()
            .extend(ids.iter().copied());
        Ok(())
    }

    async fn delete_many(
        &self,
        category: IgnoreCategory,
        guild_id: Snowflake,
        ids: &[Snowflake],
    ) -> RepoResult<()> {
        self.write().await;
        if let Some(set) = self.state.lock().ignored.get_mut(&(category, guild_id)) {
            for id in ids {
                set.remove(id);
            }
        }
        Ok(())
    }
}

#[async_trait]
impl LogOverrideRepository for InMemoryStore {
    async fn find(&self, channel_id: Snowflake) -> RepoResult<Option<ChannelLogOverride>> {
        self.read()?;
        Ok(self.state.lock().overrides.get(&channel_id).cloned())
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<ChannelLogOverride>> {
        self.read()?;
        let mut rows: Vec<_> = self
            .state
            .lock()
            .overrides
            .values()
            .filter(|row| row.guild_id == guild_id)
            .cloned()
            .collect();
        rows.sort_by_key(|row| row.channel_id);
        Ok(rows)
    }

    async fn upsert(&self, row: &ChannelLogOverride) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(row.guild_id)?;
        state.overrides.insert(row.channel_id, row.clone());
        Ok(())
    }

    async fn delete(&self, channel_id: Snowflake, guild_id: Snowflake) -> RepoResult<bool> {
        self.write().await;
        let mut state = self.state.lock();
        let owned = state
            .overrides
            .get(&channel_id)
            .is_some_and(|row| row.guild_id == guild_id);
        if owned {
            state.overrides.remove(&channel_id);
        }
        Ok(owned)
    }
}

#[async_trait]
impl RewardRepository for InMemoryStore {
    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Reward>> {
        self.read()?;
        Ok(self
            .state
            .lock()
            .rewards
            .values()
            .filter(|reward| reward.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, reward: &Reward) -> RepoResult<()> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(reward.guild_id)?;
        state
            .rewards
            .insert((reward.guild_id, reward.role_id), reward.clone());
        Ok(())
    }

    async fn delete(&self, guild_id: Snowflake, role_id: Snowflake) -> RepoResult<bool> {
        self.write().await;
        Ok(self.state.lock().rewards.remove(&(guild_id, role_id)).is_some())
    }
}

#[async_trait]
impl MuteRepository for InMemoryStore {
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Mute>> {
        self.read()?;
        Ok(self.state.lock().mutes.get(&(guild_id, user_id)).cloned())
    }

    async fn find_active(
        &self,
        guild_id: Snowflake,
        user_id: Snowflake,
        now: DateTime<Utc>,
    ) -> RepoResult<Option<Mute>> {
        self.read()?;
        Ok(self
            .state
            .lock()
            .mutes
            .get(&(guild_id, user_id))
            .filter(|mute| mute.end_time > now)
            .cloned())
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Mute>> {
        self.read()?;
        Ok(self
            .state
            .lock()
            .mutes
            .values()
            .filter(|mute| mute.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn replace(&self, mute: &Mute) -> RepoResult<Option<Mute>> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(mute.guild_id)?;
        if self.fail_mute_inserts.load(Ordering::SeqCst) {
            return Err(DomainError::DatabaseError("insert into mutes failed".to_string()));
        }
        Ok(state.mutes.insert((mute.guild_id, mute.user_id), mute.clone()))
    }

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Mute>> {
        self.write().await;
        Ok(self.state.lock().mutes.remove(&(guild_id, user_id)))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Mute>> {
        self.write().await;
        Ok(drain_expired(&mut self.state.lock().mutes, now, |m| m.end_time))
    }
}

#[async_trait]
impl LockRepository for InMemoryStore {
    async fn find(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<Option<Lock>> {
        self.read()?;
        let mut state = self.state.lock();
        if self.sweep_after_find.load(Ordering::SeqCst) {
            return Ok(state.locks.remove(&(guild_id, channel_id)));
        }
        Ok(state.locks.get(&(guild_id, channel_id)).cloned())
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Lock>> {
        self.read()?;
        Ok(self
            .state
            .lock()
            .locks
            .values()
            .filter(|lock| lock.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, lock: &Lock) -> RepoResult<Lock> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(lock.guild_id)?;
        let row = state
            .locks
            .entry((lock.guild_id, lock.channel_id))
            .and_modify(|row| {
                row.moderator_id = lock.moderator_id;
                row.end_time = lock.end_time;
                row.reason.clone_from(&lock.reason);
            })
            .or_insert_with(|| lock.clone());
        Ok(row.clone())
    }

    async fn delete(&self, guild_id: Snowflake, channel_id: Snowflake) -> RepoResult<Option<Lock>> {
        self.write().await;
        Ok(self.state.lock().locks.remove(&(guild_id, channel_id)))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Lock>> {
        self.write().await;
        Ok(drain_expired(&mut self.state.lock().locks, now, |l| l.end_time))
    }
}

#[async_trait]
impl TrackerRepository for InMemoryStore {
    async fn find(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Tracker>> {
        self.read()?;
        let mut state = self.state.lock();
        if self.sweep_after_find.load(Ordering::SeqCst) {
            return Ok(state.trackers.remove(&(guild_id, user_id)));
        }
        Ok(state.trackers.get(&(guild_id, user_id)).cloned())
    }

    async fn find_by_guild(&self, guild_id: Snowflake) -> RepoResult<Vec<Tracker>> {
        self.read()?;
        Ok(self
            .state
            .lock()
            .trackers
            .values()
            .filter(|tracker| tracker.guild_id == guild_id)
            .cloned()
            .collect())
    }

    async fn upsert(&self, tracker: &Tracker) -> RepoResult<Tracker> {
        self.write().await;
        let mut state = self.state.lock();
        state.require_guild(tracker.guild_id)?;
        state
            .trackers
            .insert((tracker.guild_id, tracker.user_id), tracker.clone());
        Ok(tracker.clone())
    }

    async fn delete(&self, guild_id: Snowflake, user_id: Snowflake) -> RepoResult<Option<Tracker>> {
        self.write().await;
        Ok(self.state.lock().trackers.remove(&(guild_id, user_id)))
    }

    async fn delete_expired(&self, now: DateTime<Utc>) -> RepoResult<Vec<Tracker>> {
        self.write().await;
        Ok(drain_expired(&mut self.state.lock().trackers, now, |t| t.end_time))
    }
}

/// Services wired to one in-memory store and a fresh cache
pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub ctx: ServiceContext,
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_cache(CacheConfig::default())
    }

    pub fn with_cache(config: CacheConfig) -> Self {
        let store = InMemoryStore::new();
        let ctx = ServiceContext::builder()
            .guild_settings_repo(store.clone())
            .module_settings_repo(store.clone())
            .ignore_repo(store.clone())
            .log_override_repo(store.clone())
            .reward_repo(store.clone())
            .mute_repo(store.clone())
            .lock_repo(store.clone())
            .tracker_repo(store.clone())
            .cache(Arc::new(SettingsCache::new(config)))
            .build()
            .expect("every repository is set");

        Self { store, ctx }
    }

    /// Drop every cached entry, as after a restart
    pub fn cold_cache(&self) {
        self.ctx.cache().clear();
    }
}

impl Default for TestContext {
    fn default() -> Self {
        Self::new()
    }
}
