//! Health pools on a fixed 0-100 scale.

use serde::{Deserialize, Serialize};

pub const MAX_HEALTH: f64 = 100.0;

/// Slack for accumulated float error: twelve hits of `100 / 12` leave a few
/// ulps above zero and must still count as a defeat.
const DEPLETION_EPSILON: f64 = 1e-9;

/// A health value that may dip below zero internally.
///
/// Damage is applied without clamping so the defeat check can read the raw
/// sign; [`Health::display`] is the clamped value presentation should use.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Health(f64);

impl Health {
    #[must_use]
    pub const fn full() -> Self {
        Self(MAX_HEALTH)
    }

    /// Starting health clamped into `0..=MAX_HEALTH`.
    #[must_use]
    pub fn new(value: f64) -> Self {
        Self(value.clamp(0.0, MAX_HEALTH))
    }

    #[must_use]
    pub const fn raw(self) -> f64 {
        self.0
    }

    /// Clamped at zero, for display. A depleted pool reads exactly zero.
    #[must_use]
    pub fn display(self) -> f64 {
        if self.is_depleted() { 0.0 } else { self.0 }
    }

    /// Fraction of the full pool left, in `0.0..=1.0`.
    #[must_use]
    pub fn ratio(self) -> f64 {
        self.display() / MAX_HEALTH
    }

    #[must_use]
    pub fn is_depleted(self) -> bool {
        self.0 <= DEPLETION_EPSILON
    }

    pub fn take(&mut self, damage: f64) {
        self.0 -= damage;
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::full()
    }
}
