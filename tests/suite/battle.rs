//! Battle sessions end to end.

use std::time::Duration;

use decryptor_engine::SessionRequest;
use decryptor_types::{OutcomeReason, PotionEffects, SessionPhase};

use tokio::time::Instant;

use crate::common::Player;

#[tokio::test(start_paused = true)]
async fn default_fight_is_won_in_one_round() {
    let mut player = Player::start(SessionRequest::fight("Cultist"));
    let last = player.hit_until_done(20).await;
    assert_eq!(last.outcome, Some(OutcomeReason::EnemyDefeated));
    assert_eq!(last.round, 1);
    assert!(player.session.outcome().await);
}

#[tokio::test(start_paused = true)]
async fn long_fight_spans_rounds() {
    let mut player = Player::start(SessionRequest::fight("Tindalos").with_hits(3, 20));
    let mut rounds_seen = vec![player.snapshot().round];
    for _ in 0..20 {
        let snapshot = player.hit().await;
        if snapshot.phase != SessionPhase::Active {
            break;
        }
        rounds_seen.push(snapshot.round);
    }
    assert_eq!(rounds_seen.first(), Some(&1));
    assert_eq!(rounds_seen.last(), Some(&3));
    assert!(player.session.outcome().await);
    assert_eq!(
        player.session.snapshot().outcome,
        Some(OutcomeReason::EnemyDefeated)
    );
}

#[tokio::test(start_paused = true)]
async fn low_lucidity_player_falls_after_two_deadlines() {
    let start = Instant::now();
    let mut player = Player::start(SessionRequest::fight("Cultist").with_lucidity(0));
    let battle = player.snapshot().battle.unwrap();
    assert!((battle.player_health.display() - 50.0).abs() < f64::EPSILON);

    assert!(!player.session.outcome().await);
    assert_eq!(start.elapsed(), Duration::from_secs(60));
    assert_eq!(
        player.session.snapshot().outcome,
        Some(OutcomeReason::HealthDepleted)
    );
}

#[tokio::test(start_paused = true)]
async fn protection_potion_buys_a_fourth_deadline() {
    let start = Instant::now();
    let potions = PotionEffects {
        protection: true,
        ..PotionEffects::none()
    };
    let mut player = Player::start(SessionRequest::fight("Cultist").with_potions(potions));
    assert!(player.snapshot().consumed_potions.protection);
    assert!(!player.session.outcome().await);
    assert_eq!(start.elapsed(), Duration::from_secs(120));
}

#[tokio::test(start_paused = true)]
async fn enemy_health_tracks_hits() {
    let mut player = Player::start(SessionRequest::fight("Cultist"));
    let snapshot = player.hit().await;
    let enemy = snapshot.battle.unwrap().enemy_health;
    assert!((enemy.display() - 87.5).abs() < 1e-9);

    let snapshot = player.miss().await;
    let battle = snapshot.battle.unwrap();
    assert!((battle.enemy_health.display() - 87.5).abs() < 1e-9);
    assert!((battle.player_health.display() - 100.0).abs() < f64::EPSILON);
    assert_eq!(snapshot.remaining_ms, 25_000);
}
