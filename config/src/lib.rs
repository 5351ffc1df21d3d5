//! Session defaults read from `~/.decryptor/config.toml`.
//!
//! ```toml
//! [session]
//! duration_seconds = 30
//! variants = ["blink", "action_shuffle"]
//!
//! [battle]
//! enemy_name = "Cultist"
//! nb_enemy_hits_to_lose = 3
//! nb_player_hits_to_win = 8
//! lucidity = 12
//!
//! [potions]
//! protection = false
//! strength = true
//! ```
//!
//! Every section and key is optional. A `[battle]` section with an enemy name
//! turns the session into a fight. `DECRYPTOR_VARIANTS` (comma-separated)
//! replaces the variant list from the file.

use std::path::{Path, PathBuf};
use std::{env, fs, io};

use serde::Deserialize;
use thiserror::Error;

use decryptor_types::{PotionEffects, SessionRequest, UnknownVariantError, VariantFlag};

pub const VARIANTS_ENV: &str = "DECRYPTOR_VARIANTS";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
    #[error("invalid DECRYPTOR_VARIANTS value {value:?}: {source}")]
    Variants {
        value: String,
        source: UnknownVariantError,
    },
}

impl ConfigError {
    /// File the error came from, when it came from a file.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            ConfigError::Read { path, .. } | ConfigError::Parse { path, .. } => Some(path),
            ConfigError::Variants { .. } => None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct DecryptorConfig {
    pub session: Option<SessionSection>,
    pub battle: Option<BattleSection>,
    pub potions: Option<PotionEffects>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SessionSection {
    pub duration_seconds: Option<u64>,
    pub variants: Option<Vec<VariantFlag>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct BattleSection {
    pub enemy_name: Option<String>,
    pub nb_enemy_hits_to_lose: Option<u32>,
    pub nb_player_hits_to_win: Option<u32>,
    pub lucidity: Option<u8>,
}

impl DecryptorConfig {
    /// Load the user config. `Ok(None)` when there is no home directory or no
    /// file.
    pub fn load() -> Result<Option<Self>, ConfigError> {
        match config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(None),
        }
    }

    pub fn load_from(path: &Path) -> Result<Option<Self>, ConfigError> {
        if !path.exists() {
            return Ok(None);
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                tracing::warn!("Failed to read config at {:?}: {}", path, err);
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source: err,
                });
            }
        };

        match toml::from_str(&content) {
            Ok(config) => Ok(Some(config)),
            Err(err) => {
                tracing::warn!("Failed to parse config at {:?}: {}", path, err);
                Err(ConfigError::Parse {
                    path: path.to_path_buf(),
                    source: err,
                })
            }
        }
    }

    #[must_use]
    pub fn path() -> Option<PathBuf> {
        config_path()
    }

    /// Session request built from the file, defaults filling the gaps.
    #[must_use]
    pub fn request(&self) -> SessionRequest {
        let mut request = SessionRequest::default();

        if let Some(session) = &self.session {
            if let Some(secs) = session.duration_seconds {
                request.duration_seconds = secs;
            }
            if let Some(variants) = &session.variants {
                request.variants.clone_from(variants);
            }
        }

        if let Some(battle) = &self.battle {
            if let Some(name) = &battle.enemy_name {
                request.enemy_name = Some(name.clone());
                if !request.variants.contains(&VariantFlag::Battle) {
                    request.variants.push(VariantFlag::Battle);
                }
            }
            if let Some(hits) = battle.nb_enemy_hits_to_lose {
                request.nb_enemy_hits_to_lose = hits;
            }
            if let Some(hits) = battle.nb_player_hits_to_win {
                request.nb_player_hits_to_win = hits;
            }
            request.lucidity = battle.lucidity;
        }

        if let Some(potions) = self.potions {
            request.potions = potions;
        }

        request
    }
}

/// Apply `DECRYPTOR_VARIANTS` on top of `request`.
pub fn apply_env_overrides(mut request: SessionRequest) -> Result<SessionRequest, ConfigError> {
    if let Ok(value) = env::var(VARIANTS_ENV) {
        request.variants = parse_variant_list(&value)?;
        tracing::debug!(variants = %value, "Variants overridden from environment");
    }
    Ok(request)
}

/// Parse `"blink, battle"`. Empty items are skipped, so `""` means no variants.
pub fn parse_variant_list(value: &str) -> Result<Vec<VariantFlag>, ConfigError> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(|item| {
            item.parse().map_err(|source| ConfigError::Variants {
                value: value.to_string(),
                source,
            })
        })
        .collect()
}

pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".decryptor").join("config.toml"))
}
