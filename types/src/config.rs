//! Session request and its validated form.
//!
//! [`SessionRequest`] is what callers fill in (every field defaulted, nothing
//! checked). [`SessionConfig`] is the resolved configuration the controller
//! runs on: existence of a value is the proof that it passed validation and that
//! potion modifiers were applied.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::health::{Health, MAX_HEALTH};
use crate::symbols::PRIMARY_COUNT;
use crate::variants::{VariantFlag, Variants};

pub const DEFAULT_DURATION_SECS: u64 = 30;
pub const DEFAULT_ENEMY_HITS_TO_LOSE: u32 = 3;
pub const DEFAULT_PLAYER_HITS_TO_WIN: u32 = PRIMARY_COUNT as u32;

/// Upper bound of the lucidity gauge kept in the caller's save data.
pub const MAX_LUCIDITY: u8 = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("session duration must be positive")]
    NonPositiveDuration,
    #[error("battle sessions need an enemy name")]
    MissingEnemyName,
    #[error("{field} must be positive")]
    NonPositiveHitCount { field: &'static str },
    #[error("lucidity {value} is out of range (0..=16)")]
    LucidityOutOfRange { value: u8 },
}

/// Potion flags read from the caller's inventory before a session starts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotionEffects {
    /// The enemy needs one more hit to beat the player.
    pub protection: bool,
    /// The player needs fewer hits to beat the enemy (x0.8, rounded up).
    pub strength: bool,
}

impl PotionEffects {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            protection: false,
            strength: false,
        }
    }

    #[must_use]
    pub const fn any(self) -> bool {
        self.protection || self.strength
    }

    #[must_use]
    pub const fn adjust_enemy_hits_to_lose(self, hits: u32) -> u32 {
        if self.protection {
            hits.saturating_add(1)
        } else {
            hits
        }
    }

    /// `ceil(hits * 0.8)`: 8 becomes 7, 5 becomes 4, 1 stays 1.
    #[must_use]
    pub const fn adjust_player_hits_to_win(self, hits: u32) -> u32 {
        if self.strength {
            (hits.saturating_mul(4)).div_ceil(5)
        } else {
            hits
        }
    }
}

/// Battle starting health derived from lucidity: half a pool at 0, a full pool at
/// [`MAX_LUCIDITY`].
#[must_use]
pub fn start_health_for_lucidity(lucidity: u8) -> Health {
    let fraction = 0.5 + 0.5 * f64::from(lucidity.min(MAX_LUCIDITY)) / f64::from(MAX_LUCIDITY);
    Health::new((MAX_HEALTH * fraction).round())
}

/// Caller-facing session parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionRequest {
    pub variants: Vec<VariantFlag>,
    pub duration_seconds: u64,
    pub enemy_name: Option<String>,
    pub nb_enemy_hits_to_lose: u32,
    pub nb_player_hits_to_win: u32,
    pub potions: PotionEffects,
    /// Lucidity at the start of a battle; `None` starts at full health.
    pub lucidity: Option<u8>,
}

impl Default for SessionRequest {
    fn default() -> Self {
        Self {
            variants: Vec::new(),
            duration_seconds: DEFAULT_DURATION_SECS,
            enemy_name: None,
            nb_enemy_hits_to_lose: DEFAULT_ENEMY_HITS_TO_LOSE,
            nb_player_hits_to_win: DEFAULT_PLAYER_HITS_TO_WIN,
            potions: PotionEffects::none(),
            lucidity: None,
        }
    }
}

impl SessionRequest {
    /// A plain decryption puzzle.
    #[must_use]
    pub fn decryption(variants: impl IntoIterator<Item = VariantFlag>, duration_seconds: u64) -> Self {
        Self {
            variants: variants.into_iter().collect(),
            duration_seconds,
            ..Self::default()
        }
    }

    /// A fight against `enemy_name` with default difficulty.
    #[must_use]
    pub fn fight(enemy_name: impl Into<String>) -> Self {
        Self {
            variants: vec![VariantFlag::Battle],
            enemy_name: Some(enemy_name.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_potions(mut self, potions: PotionEffects) -> Self {
        self.potions = potions;
        self
    }

    #[must_use]
    pub fn with_lucidity(mut self, lucidity: u8) -> Self {
        self.lucidity = Some(lucidity);
        self
    }

    #[must_use]
    pub fn with_hits(mut self, enemy_hits_to_lose: u32, player_hits_to_win: u32) -> Self {
        self.nb_enemy_hits_to_lose = enemy_hits_to_lose;
        self.nb_player_hits_to_win = player_hits_to_win;
        self
    }

    pub fn validate(self) -> Result<SessionConfig, ConfigurationError> {
        SessionConfig::try_from(self)
    }
}

/// Validated battle parameters, potion modifiers already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BattleConfig {
    enemy_name: String,
    nb_enemy_hits_to_lose: u32,
    nb_player_hits_to_win: u32,
    player_start_health: Health,
}

impl BattleConfig {
    #[must_use]
    pub fn enemy_name(&self) -> &str {
        &self.enemy_name
    }

    #[must_use]
    pub const fn nb_enemy_hits_to_lose(&self) -> u32 {
        self.nb_enemy_hits_to_lose
    }

    #[must_use]
    pub const fn nb_player_hits_to_win(&self) -> u32 {
        self.nb_player_hits_to_win
    }

    #[must_use]
    pub const fn player_start_health(&self) -> Health {
        self.player_start_health
    }

    /// Enemy health lost per correct input.
    #[must_use]
    pub fn player_hit_damage(&self) -> f64 {
        MAX_HEALTH / f64::from(self.nb_player_hits_to_win)
    }

    /// Player health lost per missed deadline.
    #[must_use]
    pub fn enemy_hit_damage(&self) -> f64 {
        MAX_HEALTH / f64::from(self.nb_enemy_hits_to_lose)
    }
}

/// Resolved, immutable configuration of one session.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionConfig {
    variants: Variants,
    duration: Duration,
    battle: Option<BattleConfig>,
    consumed_potions: PotionEffects,
}

impl SessionConfig {
    #[must_use]
    pub const fn variants(&self) -> Variants {
        self.variants
    }

    #[must_use]
    pub const fn duration(&self) -> Duration {
        self.duration
    }

    /// Present exactly when the BATTLE variant is set.
    #[must_use]
    pub fn battle(&self) -> Option<&BattleConfig> {
        self.battle.as_ref()
    }

    /// Potions that were active when the session started. The caller clears
    /// them from its save data.
    #[must_use]
    pub const fn consumed_potions(&self) -> PotionEffects {
        self.consumed_potions
    }
}

impl TryFrom<SessionRequest> for SessionConfig {
    type Error = ConfigurationError;

    fn try_from(request: SessionRequest) -> Result<Self, Self::Error> {
        if request.duration_seconds == 0 {
            return Err(ConfigurationError::NonPositiveDuration);
        }

        let variants: Variants = request.variants.into_iter().collect();

        let battle = if variants.is_battle() {
            let enemy_name = request
                .enemy_name
                .map(|name| name.trim().to_string())
                .filter(|name| !name.is_empty())
                .ok_or(ConfigurationError::MissingEnemyName)?;
            if request.nb_enemy_hits_to_lose == 0 {
                return Err(ConfigurationError::NonPositiveHitCount {
                    field: "nb_enemy_hits_to_lose",
                });
            }
            if request.nb_player_hits_to_win == 0 {
                return Err(ConfigurationError::NonPositiveHitCount {
                    field: "nb_player_hits_to_win",
                });
            }
            let player_start_health = match request.lucidity {
                Some(value) if value > MAX_LUCIDITY => {
                    return Err(ConfigurationError::LucidityOutOfRange { value });
                }
                Some(value) => start_health_for_lucidity(value),
                None => Health::full(),
            };

            Some(BattleConfig {
                enemy_name,
                nb_enemy_hits_to_lose: request
                    .potions
                    .adjust_enemy_hits_to_lose(request.nb_enemy_hits_to_lose),
                nb_player_hits_to_win: request
                    .potions
                    .adjust_player_hits_to_win(request.nb_player_hits_to_win),
                player_start_health,
            })
        } else {
            None
        };

        Ok(Self {
            variants,
            duration: Duration::from_secs(request.duration_seconds),
            battle,
            consumed_potions: request.potions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_game() {
        let request = SessionRequest::default();
        assert_eq!(request.duration_seconds, 30);
        assert_eq!(request.nb_enemy_hits_to_lose, 3);
        assert_eq!(request.nb_player_hits_to_win, 8);
        let config = request.validate().unwrap();
        assert!(config.battle().is_none());
        assert_eq!(config.duration(), Duration::from_secs(30));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let err = SessionRequest::decryption([], 0).validate().unwrap_err();
        assert_eq!(err, ConfigurationError::NonPositiveDuration);
    }

    #[test]
    fn battle_requires_enemy_name() {
        let request = SessionRequest::decryption([VariantFlag::Battle], 30);
        assert_eq!(
            request.validate().unwrap_err(),
            ConfigurationError::MissingEnemyName
        );

        let blank = SessionRequest::fight("   ");
        assert_eq!(
            blank.validate().unwrap_err(),
            ConfigurationError::MissingEnemyName
        );
    }

    #[test]
    fn zero_hit_counts_are_rejected() {
        let err = SessionRequest::fight("Cultist")
            .with_hits(0, 8)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NonPositiveHitCount {
                field: "nb_enemy_hits_to_lose"
            }
        );
        let err = SessionRequest::fight("Cultist")
            .with_hits(3, 0)
            .validate()
            .unwrap_err();
        assert_eq!(
            err,
            ConfigurationError::NonPositiveHitCount {
                field: "nb_player_hits_to_win"
            }
        );
    }

    #[test]
    fn potions_adjust_hit_counts() {
        let potions = PotionEffects {
            protection: true,
            strength: true,
        };
        let config = SessionRequest::fight("Cultist")
            .with_potions(potions)
            .validate()
            .unwrap();
        let battle = config.battle().unwrap();
        assert_eq!(battle.nb_enemy_hits_to_lose(), 4);
        assert_eq!(battle.nb_player_hits_to_win(), 7);
        assert_eq!(config.consumed_potions(), potions);
    }

    #[test]
    fn strength_rounds_up() {
        let strength = PotionEffects {
            strength: true,
            ..PotionEffects::none()
        };
        assert_eq!(strength.adjust_player_hits_to_win(8), 7);
        assert_eq!(strength.adjust_player_hits_to_win(5), 4);
        assert_eq!(strength.adjust_player_hits_to_win(1), 1);
        assert_eq!(strength.adjust_player_hits_to_win(10), 8);
        assert_eq!(PotionEffects::none().adjust_player_hits_to_win(8), 8);
    }

    #[test]
    fn lucidity_sets_start_health() {
        assert!((start_health_for_lucidity(16).raw() - 100.0).abs() < f64::EPSILON);
        assert!((start_health_for_lucidity(0).raw() - 50.0).abs() < f64::EPSILON);
        assert!((start_health_for_lucidity(8).raw() - 75.0).abs() < f64::EPSILON);

        let err = SessionRequest::fight("Cultist")
            .with_lucidity(17)
            .validate()
            .unwrap_err();
        assert_eq!(err, ConfigurationError::LucidityOutOfRange { value: 17 });
    }

    #[test]
    fn enemy_name_is_ignored_outside_battle() {
        let request = SessionRequest {
            enemy_name: Some("Cultist".to_string()),
            ..SessionRequest::default()
        };
        assert!(request.validate().unwrap().battle().is_none());
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let request: SessionRequest =
            serde_json::from_str(r#"{"variants":["battle"],"enemy_name":"Cultist"}"#).unwrap();
        assert_eq!(request.duration_seconds, 30);
        let config = request.validate().unwrap();
        assert_eq!(config.battle().unwrap().enemy_name(), "Cultist");
    }
}
