//! The ordered set of challenges for one round.

use rand::Rng;
use rand::seq::IndexedRandom;

use decryptor_types::{ActionGlyphMapping, ActionSymbol, ChallengeView, Glyph, PRIMARY_COUNT};

/// Challenges per round.
pub const QUEUE_LEN: usize = PRIMARY_COUNT;

/// "Press the action bound to `glyph`."
///
/// Invariant: `action == mapping.action_for(glyph)` for the mapping currently
/// owned by the controller. [`ChallengeQueue::refresh_actions`] restores it
/// after a reshuffle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Challenge {
    pub glyph: Glyph,
    pub action: ActionSymbol,
    pub resolved: bool,
}

/// Result of moving the cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    Next(Challenge),
    End,
}

#[derive(Debug, Clone)]
pub struct ChallengeQueue {
    challenges: Vec<Challenge>,
    cursor: usize,
}

impl ChallengeQueue {
    /// Sample `len` primary actions with replacement and look up their glyphs.
    pub fn build<R: Rng + ?Sized>(mapping: &ActionGlyphMapping, len: usize, rng: &mut R) -> Self {
        let challenges = (0..len)
            .map(|_| {
                let action = *ActionSymbol::PRIMARY
                    .choose(rng)
                    .expect("primary pool is non-empty");
                Challenge {
                    glyph: mapping.glyph_for(action),
                    action,
                    resolved: false,
                }
            })
            .collect();
        Self {
            challenges,
            cursor: 0,
        }
    }

    #[must_use]
    pub fn current(&self) -> Option<&Challenge> {
        self.challenges.get(self.cursor)
    }

    /// Resolve the current challenge and move to the next one.
    pub fn advance(&mut self) -> Advance {
        if let Some(challenge) = self.challenges.get_mut(self.cursor) {
            challenge.resolved = true;
            self.cursor += 1;
        }
        match self.challenges.get(self.cursor) {
            Some(next) => Advance::Next(*next),
            None => Advance::End,
        }
    }

    /// Re-derive every challenge's action after the mapping changed.
    pub fn refresh_actions(&mut self, mapping: &ActionGlyphMapping) {
        for challenge in &mut self.challenges {
            challenge.action = mapping.action_for(challenge.glyph);
        }
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.challenges.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.challenges.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Challenge> {
        self.challenges.iter()
    }

    #[must_use]
    pub fn views(&self) -> Vec<ChallengeView> {
        self.challenges
            .iter()
            .enumerate()
            .map(|(i, challenge)| ChallengeView {
                glyph: challenge.glyph,
                resolved: challenge.resolved,
                active: i == self.cursor,
            })
            .collect()
    }
}
