//! Input tokens and the glyphs they get bound to.
//!
//! Both enumerations are closed: the twelve values are fixed at compile time and
//! never created or destroyed at runtime. Each value has a stable index in
//! `0..12` so tables keyed by symbol can be plain arrays.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use thiserror::Error;

/// Number of action symbols (and of glyphs).
pub const SYMBOL_COUNT: usize = 12;

/// Number of primary action symbols. Challenges only ever reference these.
pub const PRIMARY_COUNT: usize = 8;

// ============================================================================
// ActionSymbol
// ============================================================================

/// One discrete input token the player can press.
///
/// The eight primary tokens (four directions, four face buttons) are the only
/// inputs a challenge can ask for. The four trick tokens are diagonals shown on
/// the hint board as decoys.
///
/// Serialized as its short token, the same text [`fmt::Display`] writes and
/// [`FromStr`] reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionSymbol {
    Up,
    Down,
    Left,
    Right,
    Button1,
    Button2,
    Button3,
    Button4,
    UpLeft,
    UpRight,
    DownLeft,
    DownRight,
}

impl ActionSymbol {
    pub const ALL: [ActionSymbol; SYMBOL_COUNT] = [
        ActionSymbol::Up,
        ActionSymbol::Down,
        ActionSymbol::Left,
        ActionSymbol::Right,
        ActionSymbol::Button1,
        ActionSymbol::Button2,
        ActionSymbol::Button3,
        ActionSymbol::Button4,
        ActionSymbol::UpLeft,
        ActionSymbol::UpRight,
        ActionSymbol::DownLeft,
        ActionSymbol::DownRight,
    ];

    pub const PRIMARY: [ActionSymbol; PRIMARY_COUNT] = [
        ActionSymbol::Up,
        ActionSymbol::Down,
        ActionSymbol::Left,
        ActionSymbol::Right,
        ActionSymbol::Button1,
        ActionSymbol::Button2,
        ActionSymbol::Button3,
        ActionSymbol::Button4,
    ];

    pub const TRICKS: [ActionSymbol; SYMBOL_COUNT - PRIMARY_COUNT] = [
        ActionSymbol::UpLeft,
        ActionSymbol::UpRight,
        ActionSymbol::DownLeft,
        ActionSymbol::DownRight,
    ];

    /// Stable position in [`ActionSymbol::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn is_primary(self) -> bool {
        self.index() < PRIMARY_COUNT
    }

    /// Short token used in config files, logs and scripted input.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ActionSymbol::Up => "u",
            ActionSymbol::Down => "d",
            ActionSymbol::Left => "l",
            ActionSymbol::Right => "r",
            ActionSymbol::Button1 => "1",
            ActionSymbol::Button2 => "2",
            ActionSymbol::Button3 => "3",
            ActionSymbol::Button4 => "4",
            ActionSymbol::UpLeft => "lt",
            ActionSymbol::UpRight => "rt",
            ActionSymbol::DownLeft => "lb",
            ActionSymbol::DownRight => "rb",
        }
    }

    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            ActionSymbol::Up => "Up",
            ActionSymbol::Down => "Down",
            ActionSymbol::Left => "Left",
            ActionSymbol::Right => "Right",
            ActionSymbol::Button1 => "A",
            ActionSymbol::Button2 => "B",
            ActionSymbol::Button3 => "X",
            ActionSymbol::Button4 => "Y",
            ActionSymbol::UpLeft => "Up-Left",
            ActionSymbol::UpRight => "Up-Right",
            ActionSymbol::DownLeft => "Down-Left",
            ActionSymbol::DownRight => "Down-Right",
        }
    }
}

impl fmt::Display for ActionSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown action token: {0:?}")]
pub struct UnknownActionError(pub String);

impl FromStr for ActionSymbol {
    type Err = UnknownActionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let token = s.trim().to_ascii_lowercase();
        ActionSymbol::ALL
            .into_iter()
            .find(|action| action.as_str() == token)
            .ok_or(UnknownActionError(token))
    }
}

impl Serialize for ActionSymbol {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ActionSymbol {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(de::Error::custom)
    }
}

// ============================================================================
// Glyph
// ============================================================================

/// One of the twelve visual symbols the player must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    Aquarius,
    Aries,
    Cancer,
    Capricorn,
    Gemini,
    Leo,
    Libra,
    Pisces,
    Sagittarius,
    Scorpio,
    Taurus,
    Virgo,
}

impl Glyph {
    pub const ALL: [Glyph; SYMBOL_COUNT] = [
        Glyph::Aquarius,
        Glyph::Aries,
        Glyph::Cancer,
        Glyph::Capricorn,
        Glyph::Gemini,
        Glyph::Leo,
        Glyph::Libra,
        Glyph::Pisces,
        Glyph::Sagittarius,
        Glyph::Scorpio,
        Glyph::Taurus,
        Glyph::Virgo,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Glyph::Aquarius => "aquarius",
            Glyph::Aries => "aries",
            Glyph::Cancer => "cancer",
            Glyph::Capricorn => "capricorn",
            Glyph::Gemini => "gemini",
            Glyph::Leo => "leo",
            Glyph::Libra => "libra",
            Glyph::Pisces => "pisces",
            Glyph::Sagittarius => "sagittarius",
            Glyph::Scorpio => "scorpio",
            Glyph::Taurus => "taurus",
            Glyph::Virgo => "virgo",
        }
    }

    /// Unicode zodiac sign, for terminal front-ends.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Glyph::Aquarius => '\u{2652}',
            Glyph::Aries => '\u{2648}',
            Glyph::Cancer => '\u{264B}',
            Glyph::Capricorn => '\u{2651}',
            Glyph::Gemini => '\u{264A}',
            Glyph::Leo => '\u{264C}',
            Glyph::Libra => '\u{264E}',
            Glyph::Pisces => '\u{2653}',
            Glyph::Sagittarius => '\u{2650}',
            Glyph::Scorpio => '\u{264F}',
            Glyph::Taurus => '\u{2649}',
            Glyph::Virgo => '\u{264D}',
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_match_table_positions() {
        for (i, action) in ActionSymbol::ALL.iter().enumerate() {
            assert_eq!(action.index(), i);
        }
        for (i, glyph) in Glyph::ALL.iter().enumerate() {
            assert_eq!(glyph.index(), i);
        }
    }

    #[test]
    fn primary_and_tricks_partition_all() {
        assert!(ActionSymbol::PRIMARY.iter().all(|a| a.is_primary()));
        assert!(ActionSymbol::TRICKS.iter().all(|a| !a.is_primary()));
        assert_eq!(
            ActionSymbol::PRIMARY.len() + ActionSymbol::TRICKS.len(),
            ActionSymbol::ALL.len()
        );
    }

    #[test]
    fn action_tokens_parse_back() {
        for action in ActionSymbol::ALL {
            assert_eq!(action.as_str().parse::<ActionSymbol>().unwrap(), action);
        }
        assert_eq!(" LT ".parse::<ActionSymbol>().unwrap(), ActionSymbol::UpLeft);
    }

    #[test]
    fn unknown_action_token_is_rejected() {
        let err = "up".parse::<ActionSymbol>().unwrap_err();
        assert_eq!(err, UnknownActionError("up".to_string()));
    }

    #[test]
    fn json_uses_the_short_token() {
        let json = serde_json::to_string(&ActionSymbol::Button1).unwrap();
        assert_eq!(json, r#""1""#);
        for action in ActionSymbol::ALL {
            let json = serde_json::to_string(&action).unwrap();
            assert_eq!(json, format!("\"{action}\""));
            assert_eq!(serde_json::from_str::<ActionSymbol>(&json).unwrap(), action);
        }
        assert!(serde_json::from_str::<ActionSymbol>(r#""button1""#).is_err());
    }
}
