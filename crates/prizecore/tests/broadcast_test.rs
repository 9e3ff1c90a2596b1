//! Integration tests for the broadcast cycle
//!
//! Uses a recording `TeaserSink` instead of Telegram.

mod common;

use async_trait::async_trait;
use common::TestEnv;
use pretty_assertions::assert_eq;
use prizecore::{run_broadcast_cycle, AppError, AppResult, Prize, TeaserSink};
use std::collections::HashSet;
use std::sync::Mutex;
use std::time::Duration;

#[derive(Default)]
struct RecordingSink {
    sent: Mutex<Vec<(i64, i64, usize)>>,
    failing_users: HashSet<i64>,
}

impl RecordingSink {
    fn failing(users: &[i64]) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_users: users.iter().copied().collect(),
        }
    }

    fn sent(&self) -> Vec<(i64, i64, usize)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl TeaserSink for RecordingSink {
    async fn send_teaser(&self, user_id: i64, prize: &Prize, teaser: &[u8]) -> AppResult<()> {
        if self.failing_users.contains(&user_id) {
            return Err(AppError::Validation(format!("chat {} blocked the bot", user_id)));
        }
        self.sent.lock().unwrap().push((user_id, prize.prize_id, teaser.len()));
        Ok(())
    }
}

#[tokio::test]
async fn broadcast_sends_teaser_to_every_user_and_retires_prize() {
    let env = TestEnv::new();
    env.seed_images(&["a.png"]);
    for user in [1, 2, 3] {
        env.manager.register_user(user, &format!("user_{user}")).unwrap();
    }
    let sink = RecordingSink::default();

    let report = run_broadcast_cycle(&env.manager, &env.assets, &sink, Duration::ZERO)
        .await
        .unwrap()
        .expect("a prize should have been broadcast");

    assert_eq!(report.prize.image, "a.png");
    assert_eq!((report.delivered, report.failed), (3, 0));

    let sent = sink.sent();
    assert_eq!(sent.iter().map(|s| s.0).collect::<Vec<_>>(), vec![1, 2, 3]);
    assert!(sent.iter().all(|s| s.1 == report.prize.prize_id && s.2 > 0));

    assert!(env.assets.has_teaser("a.png"), "teaser must exist after broadcast");
    assert!(env.manager.pick_unclaimed_prize().unwrap().is_none(), "prize must be marked used");
}

#[tokio::test]
async fn failed_recipient_does_not_abort_broadcast() {
    let env = TestEnv::new();
    env.seed_images(&["a.png"]);
    for user in [1, 2, 3] {
        env.manager.register_user(user, "x").unwrap();
    }
    let sink = RecordingSink::failing(&[2]);

    let report = run_broadcast_cycle(&env.manager, &env.assets, &sink, Duration::from_millis(1))
        .await
        .unwrap()
        .unwrap();

    assert_eq!((report.delivered, report.failed), (2, 1));
    assert_eq!(sink.sent().iter().map(|s| s.0).collect::<Vec<_>>(), vec![1, 3]);
}

#[tokio::test]
async fn exhausted_pool_broadcasts_nothing() {
    let env = TestEnv::new();
    env.seed_images(&["a.png", "b.png"]);
    env.manager.register_user(1, "x").unwrap();
    let sink = RecordingSink::default();

    for _ in 0..2 {
        assert!(run_broadcast_cycle(&env.manager, &env.assets, &sink, Duration::ZERO)
            .await
            .unwrap()
            .is_some());
    }
    let third = run_broadcast_cycle(&env.manager, &env.assets, &sink, Duration::ZERO)
        .await
        .unwrap();

    assert!(third.is_none());
    let prizes: HashSet<i64> = sink.sent().iter().map(|s| s.1).collect();
    assert_eq!(prizes.len(), 2, "each prize is broadcast exactly once");
}

#[tokio::test]
async fn missing_original_fails_cycle_but_retires_prize() {
    let env = TestEnv::new();
    env.manager.seed_prizes(&["ghost.png".to_string()]).unwrap();
    env.manager.register_user(1, "x").unwrap();
    let sink = RecordingSink::default();

    let err = run_broadcast_cycle(&env.manager, &env.assets, &sink, Duration::ZERO)
        .await
        .unwrap_err();

    assert!(err.is_asset_error(), "unexpected error: {err}");
    assert!(sink.sent().is_empty());
    assert!(env.manager.pick_unclaimed_prize().unwrap().is_none());
}
