//! Config file to running session.

use std::fs;

use decryptor_config::DecryptorConfig;
use decryptor_types::{OutcomeReason, VariantFlag};

use crate::common::Player;

#[tokio::test(start_paused = true)]
async fn config_file_drives_a_fight() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        r#"
[session]
duration_seconds = 20
variants = ["action_shuffle"]

[battle]
enemy_name = "Cultist"
nb_player_hits_to_win = 5

[potions]
strength = true
"#,
    )
    .unwrap();

    let config = DecryptorConfig::load_from(&path).unwrap().unwrap();
    let request = config.request();
    assert_eq!(
        request.variants,
        vec![VariantFlag::ActionShuffle, VariantFlag::Battle]
    );

    let mut player = Player::start(request);
    assert_eq!(player.snapshot().duration_ms, 20_000);
    let mut hits = 0;
    while player.snapshot().outcome.is_none() && hits < 10 {
        player.hit().await;
        hits += 1;
    }
    // Strength turns five hits into four.
    assert_eq!(hits, 4);
    assert_eq!(
        player.session.snapshot().outcome,
        Some(OutcomeReason::EnemyDefeated)
    );
    assert!(player.session.outcome().await);
}

#[test]
fn broken_config_reports_its_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    fs::write(&path, "[battle]\nnb_player_hits_to_win = \"many\"\n").unwrap();
    let err = DecryptorConfig::load_from(&path).unwrap_err();
    assert_eq!(err.path(), Some(path.as_path()));
    assert!(err.to_string().contains("config.toml"));
}
