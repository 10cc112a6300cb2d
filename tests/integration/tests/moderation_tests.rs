//! Mute, lock and tracker state tests
//!
//! Run with: cargo test -p integration-tests --test moderation_tests

use chrono::Utc;
use integration_tests::{lock, minutes_from_now, mute, tracker, unique_id, TestContext};
use warden_core::Permissions;
use warden_service::{LockService, MuteService, TrackerService};

// ============================================================================
// Mute Tests
// ============================================================================

#[tokio::test]
async fn test_mute_replaces_previous_mute() {
    let t = TestContext::new();
    let mutes = MuteService::new(&t.ctx);
    let (guild, user) = (unique_id(), unique_id());

    let replaced = mutes
        .add_mute(mute(guild, user, 1, minutes_from_now(10)))
        .await
        .unwrap();
    assert!(replaced.is_none());

    let replaced = mutes
        .add_mute(mute(guild, user, 2, minutes_from_now(60)))
        .await
        .unwrap();
    assert_eq!(replaced.map(|m| m.sin_id), Some(1));

    let current = mutes.get_mute(guild, user).await.unwrap().unwrap();
    assert_eq!(current.sin_id, 2);
    assert_eq!(mutes.get_active_mutes(guild).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_is_member_muted_ignores_ended_rows() {
    let t = TestContext::new();
    let mutes = MuteService::new(&t.ctx);
    let guild = unique_id();
    let (active, ended) = (unique_id(), unique_id());

    mutes
        .add_mute(mute(guild, active, 1, minutes_from_now(10)))
        .await
        .unwrap();
    mutes
        .add_mute(mute(guild, ended, 2, minutes_from_now(-1)))
        .await
        .unwrap();

    assert!(mutes.is_member_muted(guild, active).await.unwrap());
    assert!(!mutes.is_member_muted(guild, ended).await.unwrap());
    assert!(!mutes.is_member_muted(guild, unique_id()).await.unwrap());

    // Ended but not yet swept: still visible to get_mute
    assert!(mutes.get_mute(guild, ended).await.unwrap().is_some());
    assert_eq!(mutes.get_active_mutes(guild).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_remove_mute() {
    let t = TestContext::new();
    let mutes = MuteService::new(&t.ctx);
    let (guild, user) = (unique_id(), unique_id());

    mutes
        .add_mute(mute(guild, user, 7, minutes_from_now(10)))
        .await
        .unwrap();

    let removed = mutes.remove_mute(guild, user).await.unwrap();
    assert_eq!(removed.map(|m| m.sin_id), Some(7));
    assert!(mutes.remove_mute(guild, user).await.unwrap().is_none());
    assert!(!mutes.is_member_muted(guild, user).await.unwrap());
}

#[tokio::test]
async fn test_mute_sweep_is_idempotent() {
    let t = TestContext::new();
    let mutes = MuteService::new(&t.ctx);
    let guild = unique_id();
    let (ended, active) = (unique_id(), unique_id());

    mutes
        .add_mute(mute(guild, ended, 1, minutes_from_now(-5)))
        .await
        .unwrap();
    mutes
        .add_mute(mute(guild, active, 2, minutes_from_now(5)))
        .await
        .unwrap();

    let now = Utc::now();
    let swept = mutes.remove_expired_mutes(now).await.unwrap();
    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].user_id, ended);

    assert!(mutes.remove_expired_mutes(now).await.unwrap().is_empty());
    assert!(mutes.get_mute(guild, active).await.unwrap().is_some());
}

#[tokio::test]
async fn test_mute_ending_exactly_now_is_swept() {
    let t = TestContext::new();
    let mutes = MuteService::new(&t.ctx);
    let (guild, user) = (unique_id(), unique_id());
    let end = minutes_from_now(0);

    mutes.add_mute(mute(guild, user, 1, end)).await.unwrap();
    assert_eq!(mutes.remove_expired_mutes(end).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_failed_replace_keeps_current_mute() {
    let t = TestContext::new();
    let mutes = MuteService::new(&t.ctx);
    let (guild, user) = (unique_id(), unique_id());

    mutes
        .add_mute(mute(guild, user, 1, minutes_from_now(30)))
        .await
        .unwrap();

    t.store.set_fail_mute_inserts(true);
    assert!(mutes
        .add_mute(mute(guild, user, 2, minutes_from_now(60)))
        .await
        .is_err());
    t.store.set_fail_mute_inserts(false);

    assert!(mutes.is_member_muted(guild, user).await.unwrap());
    assert_eq!(mutes.get_mute(guild, user).await.unwrap().unwrap().sin_id, 1);
}

// ============================================================================
// Lock Tests
// ============================================================================

#[tokio::test]
async fn test_lock_and_unlock() {
    let t = TestContext::new();
    let locks = LockService::new(&t.ctx);
    let (guild, channel) = (unique_id(), unique_id());

    assert!(!locks.is_channel_locked(guild, channel).await.unwrap());

    locks
        .add_lock(lock(guild, channel, minutes_from_now(30)))
        .await
        .unwrap();
    assert!(locks.is_channel_locked(guild, channel).await.unwrap());
    assert_eq!(locks.get_active_locks(guild).await.unwrap().len(), 1);

    let removed = locks.remove_lock(guild, channel).await.unwrap().unwrap();
    assert_eq!(removed.previously_allowed, Permissions::SEND_MESSAGES);
    assert!(!locks.is_channel_locked(guild, channel).await.unwrap());
    assert!(locks.remove_lock(guild, channel).await.unwrap().is_none());
}

#[tokio::test]
async fn test_relock_keeps_original_snapshot() {
    let t = TestContext::new();
    let locks = LockService::new(&t.ctx);
    let (guild, channel) = (unique_id(), unique_id());

    let first = lock(guild, channel, minutes_from_now(10));
    locks.add_lock(first.clone()).await.unwrap();

    // The second lock observes the overwrite the first one installed
    let mut second = lock(guild, channel, minutes_from_now(120));
    second.previously_allowed = Permissions::VIEW_CHANNEL;
    second.previously_denied = Permissions::SEND_MESSAGES | Permissions::ADD_REACTIONS;
    second.reason = Some("extended".to_string());

    let stored = locks.add_lock(second.clone()).await.unwrap();
    assert_eq!(stored.previously_allowed, first.previously_allowed);
    assert_eq!(stored.previously_denied, first.previously_denied);
    assert_eq!(stored.end_time, second.end_time);
    assert_eq!(stored.moderator_id, second.moderator_id);

    let row = locks.get_lock(guild, channel).await.unwrap().unwrap();
    assert_eq!(row, stored);
}

#[tokio::test]
async fn test_lock_sweep_invalidates_locked_set() {
    let t = TestContext::new();
    let locks = LockService::new(&t.ctx);
    let guild = unique_id();
    let (ended, active) = (unique_id(), unique_id());

    locks
        .add_lock(lock(guild, ended, minutes_from_now(-1)))
        .await
        .unwrap();
    locks
        .add_lock(lock(guild, active, minutes_from_now(60)))
        .await
        .unwrap();
    assert!(locks.is_channel_locked(guild, ended).await.unwrap());

    let now = Utc::now();
    let swept = locks.remove_expired_locks(now).await.unwrap();
    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].channel_id, ended);
    assert!(locks.remove_expired_locks(now).await.unwrap().is_empty());

    assert!(!locks.is_channel_locked(guild, ended).await.unwrap());
    assert!(locks.is_channel_locked(guild, active).await.unwrap());
}

#[tokio::test]
async fn test_relock_after_concurrent_sweep_stores_lock() {
    let t = TestContext::new();
    let locks = LockService::new(&t.ctx);
    let (guild, channel) = (unique_id(), unique_id());

    locks
        .add_lock(lock(guild, channel, minutes_from_now(10)))
        .await
        .unwrap();

    t.store.set_sweep_after_find(true);
    let renewed = lock(guild, channel, minutes_from_now(60));
    let stored = locks.add_lock(renewed.clone()).await.unwrap();
    t.store.set_sweep_after_find(false);

    assert_eq!(stored, renewed);
    assert_eq!(locks.get_lock(guild, channel).await.unwrap(), Some(renewed));
    assert!(locks.is_channel_locked(guild, channel).await.unwrap());
}

// ============================================================================
// Tracker Tests
// ============================================================================

#[tokio::test]
async fn test_single_active_tracker_per_member() {
    let t = TestContext::new();
    let trackers = TrackerService::new(&t.ctx);
    let (guild, user) = (unique_id(), unique_id());
    let (first_channel, second_channel) = (unique_id(), unique_id());
    let second_end = minutes_from_now(90);

    trackers
        .add_tracker(tracker(guild, user, first_channel, minutes_from_now(30)))
        .await
        .unwrap();
    trackers
        .add_tracker(tracker(guild, user, second_channel, second_end))
        .await
        .unwrap();

    assert_eq!(t.store.tracker_count(guild, user), 1);
    let row = trackers.get_tracker(guild, user).await.unwrap().unwrap();
    assert_eq!(row.log_channel_id, second_channel);
    assert_eq!(row.end_time, second_end);
    assert_eq!(trackers.get_active_trackers(guild).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_tracked_set_follows_writes() {
    let t = TestContext::new();
    let trackers = TrackerService::new(&t.ctx);
    let (guild, user) = (unique_id(), unique_id());

    assert!(!trackers.is_member_tracked(guild, user).await.unwrap());

    trackers
        .add_tracker(tracker(guild, user, unique_id(), minutes_from_now(30)))
        .await
        .unwrap();
    assert!(trackers.is_member_tracked(guild, user).await.unwrap());

    assert!(trackers.remove_tracker(guild, user).await.unwrap().is_some());
    assert!(!trackers.is_member_tracked(guild, user).await.unwrap());
    assert!(trackers.remove_tracker(guild, user).await.unwrap().is_none());
}

#[tokio::test]
async fn test_tracker_sweep_is_idempotent() {
    let t = TestContext::new();
    let trackers = TrackerService::new(&t.ctx);
    let guild = unique_id();
    let (ended, active) = (unique_id(), unique_id());

    trackers
        .add_tracker(tracker(guild, ended, unique_id(), minutes_from_now(-10)))
        .await
        .unwrap();
    trackers
        .add_tracker(tracker(guild, active, unique_id(), minutes_from_now(10)))
        .await
        .unwrap();
    assert!(trackers.is_member_tracked(guild, ended).await.unwrap());

    let now = Utc::now();
    let swept = trackers.remove_expired_trackers(now).await.unwrap();
    assert_eq!(swept.len(), 1);
    assert_eq!(swept[0].user_id, ended);
    assert!(trackers.remove_expired_trackers(now).await.unwrap().is_empty());

    assert!(!trackers.is_member_tracked(guild, ended).await.unwrap());
    assert!(trackers.is_member_tracked(guild, active).await.unwrap());
}

#[tokio::test]
async fn test_retrack_after_concurrent_sweep_stores_tracker() {
    let t = TestContext::new();
    let trackers = TrackerService::new(&t.ctx);
    let (guild, user) = (unique_id(), unique_id());

    trackers
        .add_tracker(tracker(guild, user, unique_id(), minutes_from_now(10)))
        .await
        .unwrap();

    t.store.set_sweep_after_find(true);
    let retargeted = tracker(guild, user, unique_id(), minutes_from_now(45));
    let stored = trackers.add_tracker(retargeted.clone()).await.unwrap();
    t.store.set_sweep_after_find(false);

    assert_eq!(stored, retargeted);
    assert_eq!(t.store.tracker_count(guild, user), 1);
    assert!(trackers.is_member_tracked(guild, user).await.unwrap());
}
