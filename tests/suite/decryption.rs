//! Plain decryption sessions end to end.

use std::time::Duration;

use decryptor_engine::{ScriptedInput, SessionRequest, start_session};
use decryptor_types::{OutcomeReason, SessionPhase, VariantFlag};
use tokio::time::{Instant, advance};

use crate::common::Player;

#[tokio::test(start_paused = true)]
async fn every_variant_combination_is_winnable() {
    let flags = [
        VariantFlag::Blink,
        VariantFlag::AleaBlink,
        VariantFlag::ScreenShuffle,
        VariantFlag::ActionShuffle,
    ];
    for mask in 0u8..16 {
        let variants: Vec<VariantFlag> = flags
            .iter()
            .enumerate()
            .filter(|(bit, _)| mask & (1 << bit) != 0)
            .map(|(_, flag)| *flag)
            .collect();
        let mut player = Player::start(SessionRequest::decryption(variants.clone(), 30));
        let last = player.hit_until_done(8).await;
        assert_eq!(
            last.outcome,
            Some(OutcomeReason::Decrypted),
            "variants {variants:?}"
        );
        assert!(player.session.outcome().await);
    }
}

#[tokio::test(start_paused = true)]
async fn misses_then_recovery_still_win() {
    let mut player = Player::start(SessionRequest::decryption([], 30));
    let after_miss = player.miss().await;
    assert_eq!(after_miss.remaining_ms, 25_000);
    let after_miss = player.miss().await;
    assert_eq!(after_miss.remaining_ms, 20_000);

    let last = player.hit_until_done(8).await;
    assert_eq!(last.outcome, Some(OutcomeReason::Decrypted));
    assert!(player.session.outcome().await);
}

#[tokio::test(start_paused = true)]
async fn six_misses_exhaust_a_thirty_second_clock() {
    let mut player = Player::start(SessionRequest::decryption([], 30));
    for expected in [25_000, 20_000, 15_000, 10_000, 5_000] {
        assert_eq!(player.miss().await.remaining_ms, expected);
    }
    // Five seconds left: the penalty lands on zero.
    let last = player.miss().await;
    assert_ne!(last.phase, SessionPhase::Active);
    assert!(!player.session.outcome().await);
    assert_eq!(
        player.session.snapshot().outcome,
        Some(OutcomeReason::TimeExpired)
    );
}

#[tokio::test(start_paused = true)]
async fn elapsed_time_counts_against_the_clock() {
    let mut player = Player::start(SessionRequest::decryption([], 30));
    advance(Duration::from_secs(10)).await;
    let snapshot = player.hit().await;
    assert_eq!(snapshot.remaining_ms, 20_000);
    assert_eq!(snapshot.cursor, 1);
}

#[tokio::test(start_paused = true)]
async fn short_session_expires_on_time() {
    let start = Instant::now();
    let mut session =
        start_session(SessionRequest::decryption([], 3), ScriptedInput::idle()).unwrap();
    assert!(!session.outcome().await);
    assert_eq!(start.elapsed(), Duration::from_secs(3));
}
