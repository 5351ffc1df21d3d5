//! Random action/glyph bijections.

use rand::Rng;
use rand::seq::SliceRandom;

use decryptor_types::{ActionGlyphMapping, ActionSymbol, Glyph, PRIMARY_COUNT};

/// Fresh uniformly random bijection.
///
/// The shuffle draws every glyph with a fair uniform index from the glyphs not
/// yet drawn. Glyphs are handed out to primary actions first, tricks take the
/// overflow.
pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> ActionGlyphMapping {
    let mut glyphs = Glyph::ALL;
    glyphs.shuffle(rng);
    ActionGlyphMapping::from_glyph_order(glyphs)
        .expect("a permutation of Glyph::ALL is a bijection")
}

/// New pairing over the same glyph set.
///
/// Glyphs held by primary actions are redistributed among primary actions and
/// trick glyphs among trick actions, so a glyph that a challenge can ask for
/// always stays reachable with a primary input. A glyph may land on the action
/// it already had.
pub fn reshuffle<R: Rng + ?Sized>(mapping: &ActionGlyphMapping, rng: &mut R) -> ActionGlyphMapping {
    let mut glyphs: [Glyph; 12] = ActionSymbol::ALL.map(|action| mapping.glyph_for(action));
    let (primary, tricks) = glyphs.split_at_mut(PRIMARY_COUNT);
    primary.shuffle(rng);
    tricks.shuffle(rng);
    ActionGlyphMapping::from_glyph_order(glyphs)
        .expect("permuting within classes keeps the bijection")
}
