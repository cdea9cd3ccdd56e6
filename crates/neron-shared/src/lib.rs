//! Shared tables and pure reply logic for Neron.
//!
//! Nothing in this crate performs I/O or keeps state between calls.
//! Randomness is always passed in by the caller.

pub mod composer;
pub mod emotion;
pub mod error;
pub mod intent;
pub mod mouth;
pub mod overrides;
pub mod phrases;
pub mod tags;

pub use composer::{compose, Composed, Decoration};
pub use emotion::{select_emotion, EmotionProfile};
pub use error::NeronError;
pub use intent::{classify, classify_explained, normalize, Classification, ClassifyRule};
pub use mouth::{MouthShape, Viseme, LIP_SYNC_CYCLE};
pub use overrides::{OverrideEffect, OverrideReply, OverrideRule, OverrideTable};
pub use tags::{Category, Mood};

/// Persona display name.
pub const PERSONA_NAME: &str = "НейронЭксперт";
