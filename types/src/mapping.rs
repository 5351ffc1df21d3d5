//! The action/glyph bijection.
//!
//! [`ActionGlyphMapping`] is a proof type: the only constructors validate that
//! every action gets exactly one glyph and every glyph exactly one action. Once
//! you hold a mapping, both lookup directions are total.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::symbols::{ActionSymbol, Glyph, SYMBOL_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum MappingError {
    #[error("action {0} is bound more than once")]
    DuplicateAction(ActionSymbol),
    #[error("glyph {0} is bound more than once")]
    DuplicateGlyph(Glyph),
    #[error("expected 12 pairs, got {0}")]
    WrongSize(usize),
}

/// Total bijection between the twelve action symbols and the twelve glyphs.
///
/// # Invariants
///
/// - `glyph_for(a)` is defined for every action
/// - `action_for(g)` is defined for every glyph
/// - `action_for(glyph_for(a)) == a`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<(ActionSymbol, Glyph)>", into = "Vec<(ActionSymbol, Glyph)>")]
pub struct ActionGlyphMapping {
    by_action: [Glyph; SYMBOL_COUNT],
    by_glyph: [ActionSymbol; SYMBOL_COUNT],
}

impl ActionGlyphMapping {
    /// Build from exactly twelve `(action, glyph)` pairs.
    pub fn from_pairs(
        pairs: impl IntoIterator<Item = (ActionSymbol, Glyph)>,
    ) -> Result<Self, MappingError> {
        let mut by_action: [Option<Glyph>; SYMBOL_COUNT] = [None; SYMBOL_COUNT];
        let mut by_glyph: [Option<ActionSymbol>; SYMBOL_COUNT] = [None; SYMBOL_COUNT];
        let mut count = 0usize;

        for (action, glyph) in pairs {
            count += 1;
            if by_action[action.index()].replace(glyph).is_some() {
                return Err(MappingError::DuplicateAction(action));
            }
            if by_glyph[glyph.index()].replace(action).is_some() {
                return Err(MappingError::DuplicateGlyph(glyph));
            }
        }

        if count != SYMBOL_COUNT {
            return Err(MappingError::WrongSize(count));
        }

        // Twelve distinct actions and twelve distinct glyphs fill both tables.
        Ok(Self {
            by_action: by_action.map(|g| g.expect("every action bound after size check")),
            by_glyph: by_glyph.map(|a| a.expect("every glyph bound after size check")),
        })
    }

    /// Bind `glyphs[i]` to `ActionSymbol::ALL[i]`.
    ///
    /// Fails if `glyphs` repeats a glyph.
    pub fn from_glyph_order(glyphs: [Glyph; SYMBOL_COUNT]) -> Result<Self, MappingError> {
        Self::from_pairs(ActionSymbol::ALL.into_iter().zip(glyphs))
    }

    #[must_use]
    pub fn glyph_for(&self, action: ActionSymbol) -> Glyph {
        self.by_action[action.index()]
    }

    #[must_use]
    pub fn action_for(&self, glyph: Glyph) -> ActionSymbol {
        self.by_glyph[glyph.index()]
    }

    /// Pairs in [`ActionSymbol::ALL`] order.
    pub fn pairs(&self) -> impl Iterator<Item = (ActionSymbol, Glyph)> + '_ {
        ActionSymbol::ALL
            .into_iter()
            .map(|action| (action, self.glyph_for(action)))
    }

    /// Glyphs currently bound to primary actions.
    pub fn primary_glyphs(&self) -> impl Iterator<Item = Glyph> + '_ {
        ActionSymbol::PRIMARY
            .into_iter()
            .map(|action| self.glyph_for(action))
    }
}

impl TryFrom<Vec<(ActionSymbol, Glyph)>> for ActionGlyphMapping {
    type Error = MappingError;

    fn try_from(pairs: Vec<(ActionSymbol, Glyph)>) -> Result<Self, Self::Error> {
        Self::from_pairs(pairs)
    }
}

impl From<ActionGlyphMapping> for Vec<(ActionSymbol, Glyph)> {
    fn from(mapping: ActionGlyphMapping) -> Self {
        mapping.pairs().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity() -> ActionGlyphMapping {
        ActionGlyphMapping::from_glyph_order(Glyph::ALL).unwrap()
    }

    #[test]
    fn lookups_are_inverse() {
        let mapping = identity();
        for action in ActionSymbol::ALL {
            assert_eq!(mapping.action_for(mapping.glyph_for(action)), action);
        }
        for glyph in Glyph::ALL {
            assert_eq!(mapping.glyph_for(mapping.action_for(glyph)), glyph);
        }
    }

    #[test]
    fn duplicate_glyph_is_rejected() {
        let mut glyphs = Glyph::ALL;
        glyphs[11] = Glyph::Aquarius;
        assert_eq!(
            ActionGlyphMapping::from_glyph_order(glyphs),
            Err(MappingError::DuplicateGlyph(Glyph::Aquarius))
        );
    }

    #[test]
    fn duplicate_action_is_rejected() {
        let pairs = vec![
            (ActionSymbol::Up, Glyph::Aries),
            (ActionSymbol::Up, Glyph::Leo),
        ];
        assert_eq!(
            ActionGlyphMapping::from_pairs(pairs),
            Err(MappingError::DuplicateAction(ActionSymbol::Up))
        );
    }

    #[test]
    fn partial_mapping_is_rejected() {
        let pairs: Vec<_> = ActionSymbol::ALL
            .into_iter()
            .zip(Glyph::ALL)
            .take(11)
            .collect();
        assert_eq!(
            ActionGlyphMapping::from_pairs(pairs),
            Err(MappingError::WrongSize(11))
        );
    }

    #[test]
    fn serde_validates_on_the_way_in() {
        let json = serde_json::to_string(&identity()).unwrap();
        let back: ActionGlyphMapping = serde_json::from_str(&json).unwrap();
        assert_eq!(back, identity());

        let bad = r#"[["u","aries"]]"#;
        assert!(serde_json::from_str::<ActionGlyphMapping>(bad).is_err());
    }
}
