//! Behavioral variants of a session.
//!
//! Variants are independent flags stored as a small bit set. Lookups go through
//! typed accessors so no caller ever dispatches on raw strings.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariantFlag {
    /// Hint glyphs fade in and out on a fixed period.
    Blink,
    /// Hint glyphs fade in and out, each on its own random period.
    AleaBlink,
    /// Hint tiles move to new screen positions after every hit.
    ScreenShuffle,
    /// The action/glyph pairing is reshuffled after every hit.
    ActionShuffle,
    /// Two-sided fight with health pools.
    Battle,
}

impl VariantFlag {
    pub const ALL: [VariantFlag; 5] = [
        VariantFlag::Blink,
        VariantFlag::AleaBlink,
        VariantFlag::ScreenShuffle,
        VariantFlag::ActionShuffle,
        VariantFlag::Battle,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            VariantFlag::Blink => "blink",
            VariantFlag::AleaBlink => "alea_blink",
            VariantFlag::ScreenShuffle => "screen_shuffle",
            VariantFlag::ActionShuffle => "action_shuffle",
            VariantFlag::Battle => "battle",
        }
    }

    const fn bit(self) -> u8 {
        1 << (self as u8)
    }
}

impl fmt::Display for VariantFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown variant: {0:?}")]
pub struct UnknownVariantError(pub String);

impl FromStr for VariantFlag {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_ascii_lowercase();
        VariantFlag::ALL
            .into_iter()
            .find(|flag| flag.as_str() == name)
            .ok_or(UnknownVariantError(name))
    }
}

/// How hint glyphs blink, if at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BlinkMode {
    Fixed,
    Random,
}

/// Set of active variant flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<VariantFlag>", into = "Vec<VariantFlag>")]
pub struct Variants(u8);

impl Variants {
    #[must_use]
    pub const fn empty() -> Self {
        Self(0)
    }

    #[must_use]
    pub fn with(mut self, flag: VariantFlag) -> Self {
        self.insert(flag);
        self
    }

    pub fn insert(&mut self, flag: VariantFlag) {
        self.0 |= flag.bit();
    }

    #[must_use]
    pub const fn contains(self, flag: VariantFlag) -> bool {
        self.0 & flag.bit() != 0
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    #[must_use]
    pub const fn is_battle(self) -> bool {
        self.contains(VariantFlag::Battle)
    }

    /// ALEA_BLINK wins when both blink flags are present.
    #[must_use]
    pub const fn blink_mode(self) -> Option<BlinkMode> {
        if self.contains(VariantFlag::AleaBlink) {
            Some(BlinkMode::Random)
        } else if self.contains(VariantFlag::Blink) {
            Some(BlinkMode::Fixed)
        } else {
            None
        }
    }

    pub fn iter(self) -> impl Iterator<Item = VariantFlag> {
        VariantFlag::ALL
            .into_iter()
            .filter(move |flag| self.contains(*flag))
    }
}

impl FromIterator<VariantFlag> for Variants {
    fn from_iter<I: IntoIterator<Item = VariantFlag>>(iter: I) -> Self {
        let mut variants = Variants::empty();
        for flag in iter {
            variants.insert(flag);
        }
        variants
    }
}

impl From<Vec<VariantFlag>> for Variants {
    fn from(flags: Vec<VariantFlag>) -> Self {
        flags.into_iter().collect()
    }
}

impl From<Variants> for Vec<VariantFlag> {
    fn from(variants: Variants) -> Self {
        variants.iter().collect()
    }
}

impl fmt::Display for Variants {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(VariantFlag::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_are_independent() {
        let variants = Variants::empty()
            .with(VariantFlag::Battle)
            .with(VariantFlag::ActionShuffle);
        assert!(variants.is_battle());
        assert!(variants.contains(VariantFlag::ActionShuffle));
        assert!(!variants.contains(VariantFlag::ScreenShuffle));
        assert_eq!(variants.iter().count(), 2);
    }

    #[test]
    fn alea_blink_takes_precedence() {
        let both: Variants = [VariantFlag::Blink, VariantFlag::AleaBlink]
            .into_iter()
            .collect();
        assert_eq!(both.blink_mode(), Some(BlinkMode::Random));
        assert_eq!(
            Variants::empty().with(VariantFlag::Blink).blink_mode(),
            Some(BlinkMode::Fixed)
        );
        assert_eq!(Variants::empty().blink_mode(), None);
    }

    #[test]
    fn serializes_as_flag_list() {
        let variants = Variants::empty()
            .with(VariantFlag::Blink)
            .with(VariantFlag::Battle);
        let json = serde_json::to_string(&variants).unwrap();
        assert_eq!(json, r#"["blink","battle"]"#);
        let back: Variants = serde_json::from_str(&json).unwrap();
        assert_eq!(back, variants);
    }

    #[test]
    fn parses_names_case_insensitively() {
        assert_eq!(
            " Screen_Shuffle".parse::<VariantFlag>().unwrap(),
            VariantFlag::ScreenShuffle
        );
        assert!("shuffle".parse::<VariantFlag>().is_err());
    }
}
