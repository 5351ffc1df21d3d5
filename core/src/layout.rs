//! Placement of the twelve hint tiles on the board.
//!
//! Each tile pairs an action with its current glyph. The layout only decides
//! which grid slot shows which action and how fast it blinks; glyphs are looked
//! up from the live mapping when a snapshot is taken.

use std::array;
use std::ops::Range;

use rand::Rng;
use rand::seq::{IteratorRandom, SliceRandom};

use decryptor_types::{ActionGlyphMapping, ActionSymbol, BlinkMode, SYMBOL_COUNT, TipView};

pub const BOARD_COLUMNS: usize = 4;
pub const BOARD_ROWS: usize = 3;

const FIXED_BLINK_MS: u64 = 800;
const RANDOM_BLINK_MS: Range<u64> = 100..900;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TipLayout {
    /// `slots[i]` is the action shown in grid slot `i`.
    slots: [ActionSymbol; SYMBOL_COUNT],
    blink_ms: [Option<u64>; SYMBOL_COUNT],
}

impl TipLayout {
    pub fn generate<R: Rng + ?Sized>(blink: Option<BlinkMode>, rng: &mut R) -> Self {
        let mut slots = ActionSymbol::ALL;
        slots.shuffle(rng);
        let blink_ms = array::from_fn(|_| match blink {
            None => None,
            Some(BlinkMode::Fixed) => Some(FIXED_BLINK_MS),
            Some(BlinkMode::Random) => RANDOM_BLINK_MS.choose(rng),
        });
        Self { slots, blink_ms }
    }

    #[must_use]
    pub fn views(&self, mapping: &ActionGlyphMapping) -> Vec<TipView> {
        self.slots
            .iter()
            .zip(self.blink_ms)
            .enumerate()
            .map(|(slot, (action, blink_period_ms))| TipView {
                slot: slot as u8,
                action: *action,
                glyph: mapping.glyph_for(*action),
                blink_period_ms,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;
    use crate::mapping;

    #[test]
    fn every_action_gets_one_slot() {
        let mut rng = StdRng::seed_from_u64(1);
        let layout = TipLayout::generate(None, &mut rng);
        let actions: HashSet<ActionSymbol> = layout.slots.iter().copied().collect();
        assert_eq!(actions.len(), SYMBOL_COUNT);
        assert_eq!(BOARD_COLUMNS * BOARD_ROWS, SYMBOL_COUNT);
    }

    #[test]
    fn blink_periods_follow_mode() {
        let mut rng = StdRng::seed_from_u64(2);
        let still = TipLayout::generate(None, &mut rng);
        assert!(still.blink_ms.iter().all(Option::is_none));

        let fixed = TipLayout::generate(Some(BlinkMode::Fixed), &mut rng);
        assert!(fixed.blink_ms.iter().all(|ms| *ms == Some(FIXED_BLINK_MS)));

        let random = TipLayout::generate(Some(BlinkMode::Random), &mut rng);
        assert!(
            random
                .blink_ms
                .iter()
                .all(|ms| ms.is_some_and(|ms| RANDOM_BLINK_MS.contains(&ms)))
        );
    }

    #[test]
    fn views_read_glyphs_from_the_mapping() {
        let mut rng = StdRng::seed_from_u64(3);
        let mapping = mapping::generate(&mut rng);
        let layout = TipLayout::generate(None, &mut rng);
        for tip in layout.views(&mapping) {
            assert_eq!(mapping.glyph_for(tip.action), tip.glyph);
            assert_eq!(layout.slots[tip.slot as usize], tip.action);
        }
    }
}
