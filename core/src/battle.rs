//! Health pools for battle sessions.

use decryptor_types::{BattleConfig, BattleView, Health};

#[derive(Debug, Clone)]
pub struct BattleResolver {
    enemy_name: String,
    player: Health,
    enemy: Health,
    player_hit_damage: f64,
    enemy_hit_damage: f64,
}

impl BattleResolver {
    #[must_use]
    pub fn new(config: &BattleConfig) -> Self {
        Self {
            enemy_name: config.enemy_name().to_string(),
            player: config.player_start_health(),
            enemy: Health::full(),
            player_hit_damage: config.player_hit_damage(),
            enemy_hit_damage: config.enemy_hit_damage(),
        }
    }

    /// The player matched a glyph. Returns `true` when the enemy is down.
    pub fn player_strikes(&mut self) -> bool {
        self.enemy.take(self.player_hit_damage);
        self.enemy.is_depleted()
    }

    /// The player missed a deadline. Returns `true` when the player is down.
    pub fn enemy_strikes(&mut self) -> bool {
        self.player.take(self.enemy_hit_damage);
        self.player.is_depleted()
    }

    #[must_use]
    pub fn player_health(&self) -> Health {
        self.player
    }

    #[must_use]
    pub fn enemy_name(&self) -> &str {
        &self.enemy_name
    }

    #[must_use]
    pub fn view(&self) -> BattleView {
        BattleView {
            enemy_name: self.enemy_name.clone(),
            player_health: self.player,
            enemy_health: self.enemy,
        }
    }
}
