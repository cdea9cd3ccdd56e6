//! Terminal rendering of the avatar
//!
//! Thinking shows a spinner, speaking shows a mouth that moves with the
//! lip-sync timer, replies are printed with the persona tag. Animations are
//! only drawn on a TTY with NO_COLOR unset; otherwise output is plain text.

use indicatif::{ProgressBar, ProgressStyle};
use neron_common::surface::{AnimationCue, AvatarSurface};
use neron_shared::{MouthShape, Viseme, PERSONA_NAME};
use owo_colors::OwoColorize;
use std::io::IsTerminal;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// One-character mouth for the terminal.
pub fn mouth_glyph(viseme: Viseme) -> &'static str {
    match viseme {
        Viseme::Closed => "‿",
        Viseme::Small => "o",
        Viseme::Medium => "○",
        Viseme::Large => "O",
        Viseme::Wide => "◯",
    }
}

pub struct TerminalSurface {
    animated: bool,
    bar: Mutex<Option<ProgressBar>>,
}

impl TerminalSurface {
    /// Animated when stdout is a TTY and NO_COLOR is not set.
    pub fn detect() -> Self {
        let animated = std::io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err();
        Self::new(animated)
    }

    pub fn new(animated: bool) -> Self {
        Self {
            animated,
            bar: Mutex::new(None),
        }
    }

    pub fn is_animated(&self) -> bool {
        self.animated
    }

    fn tag(&self) -> String {
        let tag = format!("[{}]", PERSONA_NAME);
        if self.animated {
            tag.bright_cyan().to_string()
        } else {
            tag
        }
    }

    fn replace_bar(&self, next: Option<ProgressBar>) {
        let mut slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.take() {
            previous.finish_and_clear();
        }
        *slot = next;
    }

    /// Print a line without tearing an active animation.
    fn print_line(&self, line: &str) {
        let slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        match slot.as_ref() {
            Some(bar) => bar.suspend(|| println!("{}", line)),
            None => println!("{}", line),
        }
    }

    fn spinner(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner()
            .tick_strings(SPINNER_FRAMES)
            .template("{spinner} {msg}")
        {
            pb.set_style(style);
        }
        pb.set_message(message.to_string());
        pb.enable_steady_tick(Duration::from_millis(80));
        pb
    }

    fn mouth_bar() -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        if let Ok(style) = ProgressStyle::default_spinner().template("{msg}") {
            pb.set_style(style);
        }
        pb.set_message(format!("({})", mouth_glyph(Viseme::Closed)));
        pb
    }
}

impl AvatarSurface for TerminalSurface {
    fn set_cue(&self, cue: Option<AnimationCue>) {
        if !self.animated {
            return;
        }
        let next = match cue {
            Some(AnimationCue::Thinking) => {
                Some(Self::spinner(&format!("{} думает...", PERSONA_NAME).dimmed().to_string()))
            }
            Some(AnimationCue::Speaking) => Some(Self::mouth_bar()),
            Some(AnimationCue::Breathing) | None => None,
        };
        self.replace_bar(next);
    }

    fn set_mouth(&self, shape: &MouthShape) {
        let slot = self.bar.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(bar) = slot.as_ref() {
            bar.set_message(format!("({})", mouth_glyph(shape.viseme).bright_magenta()));
        }
    }

    /// The terminal keeps scrollback, so `auto_hide` is not applied.
    fn show_text(&self, text: &str, _auto_hide: Duration) {
        self.print_line(&format!("{} {}", self.tag(), text));
    }

    fn halo(&self, _duration: Duration) {
        let glow = "✦ ✦ ✦";
        if self.animated {
            self.print_line(&glow.bright_yellow().to_string());
        } else {
            self.print_line(glow);
        }
    }
}
