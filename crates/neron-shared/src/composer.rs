//! Response composer.
//!
//! Picks a phrase for a category without repeating the previous pick, then
//! applies mood decoration: an optional micro reaction in front and an
//! optional emoji at the end.

use crate::emotion;
use crate::phrases::{self, MICRO_REACTIONS};
use crate::tags::{Category, Mood};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Upper bound on rejection sampling before the candidate is accepted.
pub const MAX_RESAMPLES: usize = 20;

/// Decoration probabilities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Decoration {
    /// Chance of a leading micro reaction.
    #[serde(default = "default_prefix_chance")]
    pub prefix_chance: f64,
    /// Chance of a trailing emoji (skipped when the text has a `?`).
    #[serde(default = "default_emoji_chance")]
    pub emoji_chance: f64,
}

fn default_prefix_chance() -> f64 {
    0.25
}

fn default_emoji_chance() -> f64 {
    0.15
}

impl Default for Decoration {
    fn default() -> Self {
        Self {
            prefix_chance: default_prefix_chance(),
            emoji_chance: default_emoji_chance(),
        }
    }
}

impl Decoration {
    /// No decoration at all.
    pub fn none() -> Self {
        Self {
            prefix_chance: 0.0,
            emoji_chance: 0.0,
        }
    }

    /// Decorate every reply where allowed.
    pub fn always() -> Self {
        Self {
            prefix_chance: 1.0,
            emoji_chance: 1.0,
        }
    }

    fn clamped(p: f64) -> f64 {
        if p.is_nan() {
            0.0
        } else {
            p.clamp(0.0, 1.0)
        }
    }

    /// Apply decoration to `base` for the given mood.
    pub fn apply<R: Rng + ?Sized>(&self, base: &str, mood: Mood, rng: &mut R) -> String {
        // Both draws happen up front so they stay independent.
        let add_prefix = rng.gen_bool(Self::clamped(self.prefix_chance));
        let add_emoji = rng.gen_bool(Self::clamped(self.emoji_chance)) && !base.contains('?');

        let mut text = base.to_string();

        if add_prefix {
            if let Some(prefix) = MICRO_REACTIONS.choose(rng) {
                text = format!("{} {}", prefix, text);
            }
        }

        if add_emoji {
            if let Some(emoji) = emotion::profile(mood).emojis().choose(rng) {
                text = format!("{} {}", text, emoji);
            }
        }

        text
    }
}

/// A composed reply and the phrase index it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Composed {
    pub text: String,
    pub index: usize,
}

/// Pick an index into a list of `len` items, avoiding `last` when possible.
pub fn pick_index<R: Rng + ?Sized>(len: usize, last: Option<usize>, rng: &mut R) -> usize {
    if len <= 1 {
        return 0;
    }

    let mut candidate = rng.gen_range(0..len);
    let mut resamples = 0;
    while Some(candidate) == last && resamples < MAX_RESAMPLES {
        candidate = rng.gen_range(0..len);
        resamples += 1;
    }
    candidate
}

pub fn compose<R: Rng + ?Sized>(
    category: Category,
    mood: Mood,
    last_index: Option<usize>,
    decoration: &Decoration,
    rng: &mut R,
) -> Composed {
    let list = phrases::phrases(category);
    let index = pick_index(list.len(), last_index, rng);
    let base = list.get(index).copied().unwrap_or_default();

    Composed {
        text: decoration.apply(base, mood, rng),
        index,
    }
}
