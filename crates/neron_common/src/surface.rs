//! Rendering surface seam.
//!
//! The controller never draws anything itself. It tells a surface which
//! animation cue is active, which mouth shape to show and which text to
//! display. Calls are fire-and-forget and must not block.

use neron_shared::{MouthShape, Viseme};
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

/// Animation class driven by the current avatar state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnimationCue {
    /// Idle breathing loop
    Breathing,
    Thinking,
    Speaking,
}

impl AnimationCue {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Breathing => "breathing",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
        }
    }
}

pub trait AvatarSurface: Send + Sync {
    /// Replace the active cue; `None` clears all cues.
    fn set_cue(&self, cue: Option<AnimationCue>);

    fn set_mouth(&self, shape: &MouthShape);

    /// Show reply text, hidden again after `auto_hide`.
    fn show_text(&self, text: &str, auto_hide: Duration);

    /// Brief glow around the avatar.
    fn halo(&self, _duration: Duration) {}
}

/// Surface that renders nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSurface;

impl AvatarSurface for NullSurface {
    fn set_cue(&self, _cue: Option<AnimationCue>) {}
    fn set_mouth(&self, _shape: &MouthShape) {}
    fn show_text(&self, _text: &str, _auto_hide: Duration) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceEvent {
    Cue(Option<AnimationCue>),
    Mouth(Viseme),
    Text(String),
    Halo,
}

/// Surface that records every call in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    events: Mutex<Vec<SurfaceEvent>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SurfaceEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cue changes only, in order.
    pub fn cues(&self) -> Vec<Option<AnimationCue>> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Cue(cue) => Some(cue),
                _ => None,
            })
            .collect()
    }

    pub fn texts(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                SurfaceEvent::Text(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&self) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn push(&self, event: SurfaceEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

impl AvatarSurface for RecordingSurface {
    fn set_cue(&self, cue: Option<AnimationCue>) {
        self.push(SurfaceEvent::Cue(cue));
    }

    fn set_mouth(&self, shape: &MouthShape) {
        self.push(SurfaceEvent::Mouth(shape.viseme));
    }

    fn show_text(&self, text: &str, _auto_hide: Duration) {
        self.push(SurfaceEvent::Text(text.to_string()));
    }

    fn halo(&self, _duration: Duration) {
        self.push(SurfaceEvent::Halo);
    }
}
