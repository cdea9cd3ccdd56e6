//! Avatar state machine and reply pipeline.
//!
//! ```text
//! idle --(input accepted)--> thinking --(speech started)--> speaking
//!   ^                                                          |
//!   +------(silent delay)------ silent <---(ended | failed)----+
//! ```
//!
//! One `AvatarController` owns the whole session: current state, last
//! detected mood, per-category repetition memory, the processing guard and
//! the RNG. At most one input is in flight; anything arriving while the
//! avatar is busy is dropped, not queued.
//!
//! Session state sits behind a std mutex that is only held for bookkeeping,
//! never across a timed wait or a speech event.

use crate::config::{NeronConfig, TimingConfig, VoiceConfig};
use crate::lipsync::LipSync;
use crate::session::SessionStore;
use crate::speech::{select_voice, SpeechEngine, SpeechError, SpeechEvent, Utterance};
use crate::surface::{AnimationCue, AvatarSurface};
use anyhow::Result;
use neron_shared::emotion::random_mood;
use neron_shared::phrases::{click_phrases, session_greetings};
use neron_shared::{
    classify_explained, compose, composer::pick_index, normalize, select_emotion, Category,
    ClassifyRule, Decoration, Mood, OverrideEffect, OverrideTable,
};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Presentation state of the avatar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiState {
    Idle,
    Thinking,
    Speaking,
    /// Transient; falls back to idle after the silent delay.
    Silent,
}

impl AiState {
    /// States in which new input is refused.
    pub fn is_busy(&self) -> bool {
        matches!(self, Self::Thinking | Self::Speaking)
    }

    pub fn cue(&self) -> Option<AnimationCue> {
        match self {
            Self::Idle => Some(AnimationCue::Breathing),
            Self::Thinking => Some(AnimationCue::Thinking),
            Self::Speaking => Some(AnimationCue::Speaking),
            Self::Silent => None,
        }
    }
}

impl std::fmt::Display for AiState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Idle => "idle",
            Self::Thinking => "thinking",
            Self::Speaking => "speaking",
            Self::Silent => "silent",
        };
        write!(f, "{}", s)
    }
}

/// Where a reply's text came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplySource {
    /// Category phrase table, with the index that was used.
    Composed { index: usize },
    /// Special-case table entry.
    Override { rule: String },
    /// Avatar click phrase.
    Click,
    /// Session greeting.
    Greeting { index: usize },
}

/// How playback of a reply ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    Completed,
    Unsupported(String),
    Failed(String),
}

impl SpeechOutcome {
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub mood: Mood,
    /// Absent for click and greeting replies.
    pub category: Option<Category>,
    pub rule: Option<ClassifyRule>,
    pub source: ReplySource,
    pub speech: SpeechOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputOutcome {
    /// Empty or whitespace-only input; nothing happened.
    Ignored,
    /// Avatar busy; nothing happened.
    Rejected,
    Replied(Reply),
}

impl InputOutcome {
    pub fn reply(&self) -> Option<&Reply> {
        match self {
            Self::Replied(reply) => Some(reply),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GreetingOutcome {
    AlreadyPlayed,
    Rejected,
    Played(Reply),
}

/// Mutable session state.
struct Session {
    processing: bool,
    current_emotion: Mood,
    last_index: HashMap<Category, usize>,
    last_greeting: Option<usize>,
    rng: StdRng,
}

/// Clears the processing flag and settles the avatar in idle when a cycle
/// ends, including when the driving future is dropped mid-cycle.
struct CycleGuard<'a> {
    controller: &'a AvatarController,
}

impl Drop for CycleGuard<'_> {
    fn drop(&mut self) {
        let controller = self.controller;
        let state = controller.state();
        if state.is_busy() {
            controller.speech.cancel();
        }
        if state != AiState::Idle {
            controller.set_state(AiState::Idle);
        }
        controller.session().processing = false;
    }
}

pub struct AvatarController {
    session: Mutex<Session>,
    state_tx: watch::Sender<AiState>,
    speech: Arc<dyn SpeechEngine>,
    surface: Arc<dyn AvatarSurface>,
    overrides: OverrideTable,
    decoration: Decoration,
    timing: TimingConfig,
    voice: VoiceConfig,
}

impl AvatarController {
    pub fn new(
        config: &NeronConfig,
        speech: Arc<dyn SpeechEngine>,
        surface: Arc<dyn AvatarSurface>,
    ) -> Result<Self> {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let (state_tx, _) = watch::channel(AiState::Idle);

        let controller = Self {
            session: Mutex::new(Session {
                processing: false,
                current_emotion: Mood::default(),
                last_index: HashMap::new(),
                last_greeting: None,
                rng,
            }),
            state_tx,
            speech,
            surface,
            overrides: config.overrides.table()?,
            decoration: config.decoration,
            timing: config.timing.clone(),
            voice: config.voice.clone(),
        };
        controller.surface.set_cue(AiState::Idle.cue());
        Ok(controller)
    }

    pub fn state(&self) -> AiState {
        *self.state_tx.borrow()
    }

    /// Watch state transitions.
    pub fn subscribe(&self) -> watch::Receiver<AiState> {
        self.state_tx.subscribe()
    }

    pub fn current_emotion(&self) -> Mood {
        self.session().current_emotion
    }

    pub fn last_index(&self, category: Category) -> Option<usize> {
        self.session().last_index.get(&category).copied()
    }

    pub fn is_processing(&self) -> bool {
        self.session().processing
    }

    fn session(&self) -> MutexGuard<'_, Session> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: AiState) {
        let previous = self.state_tx.send_replace(state);
        if previous != state {
            debug!(from = %previous, to = %state, "avatar state");
        }
        self.surface.set_cue(state.cue());
    }

    /// Take the processing guard if the avatar is free.
    fn try_begin(&self) -> Option<CycleGuard<'_>> {
        let mut session = self.session();
        if session.processing || self.state().is_busy() {
            return None;
        }
        session.processing = true;
        drop(session);
        Some(CycleGuard { controller: self })
    }

    /// Handle one line of user input.
    pub async fn handle_input(&self, input: &str) -> InputOutcome {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return InputOutcome::Ignored;
        }

        let Some(_guard) = self.try_begin() else {
            debug!("input dropped, avatar busy");
            return InputOutcome::Rejected;
        };

        self.set_state(AiState::Thinking);
        tokio::time::sleep(self.timing.thinking()).await;

        let (text, mood, classification, source, effect) = {
            let mut session = self.session();
            let Session {
                rng,
                last_index,
                current_emotion,
                ..
            } = &mut *session;

            let mood = select_emotion(trimmed, rng);
            *current_emotion = mood;
            let classification = classify_explained(trimmed, rng);

            match self.overrides.resolve(&normalize(trimmed), rng) {
                Some(special) => (
                    special.text,
                    mood,
                    classification,
                    ReplySource::Override { rule: special.rule },
                    special.effect,
                ),
                None => {
                    let category = classification.category;
                    let composed = compose(
                        category,
                        mood,
                        last_index.get(&category).copied(),
                        &self.decoration,
                        rng,
                    );
                    last_index.insert(category, composed.index);
                    (
                        composed.text,
                        mood,
                        classification,
                        ReplySource::Composed {
                            index: composed.index,
                        },
                        None,
                    )
                }
            }
        };

        info!(
            category = %classification.category,
            rule = ?classification.rule,
            mood = %mood,
            "reply resolved"
        );

        if effect == Some(OverrideEffect::Halo) {
            self.surface.halo(self.timing.halo());
        }

        let speech = self.speak(&text).await;

        InputOutcome::Replied(Reply {
            text,
            mood,
            category: Some(classification.category),
            rule: Some(classification.rule),
            source,
            speech,
        })
    }

    /// Poke the avatar: it picks a mood and says one of that mood's lines.
    pub async fn handle_avatar_click(&self) -> InputOutcome {
        let Some(_guard) = self.try_begin() else {
            return InputOutcome::Rejected;
        };

        self.set_state(AiState::Thinking);

        let (mood, text, pause) = {
            let mut session = self.session();
            let rng = &mut session.rng;
            let mood = random_mood(rng);
            let text = click_phrases(mood).choose(rng).copied().unwrap_or_default();
            let (min, max) = self.timing.click_thinking_range();
            let pause = Duration::from_millis(rng.gen_range(min..=max));
            (mood, text.to_string(), pause)
        };

        tokio::time::sleep(pause).await;
        self.session().current_emotion = mood;

        let speech = self.speak(&text).await;

        InputOutcome::Replied(Reply {
            text,
            mood,
            category: None,
            rule: None,
            source: ReplySource::Click,
            speech,
        })
    }

    /// Play the session greeting once per session store.
    pub async fn play_greeting(&self, store: &dyn SessionStore) -> GreetingOutcome {
        let Some(_guard) = self.try_begin() else {
            return GreetingOutcome::Rejected;
        };

        match store.greeted() {
            Ok(true) => return GreetingOutcome::AlreadyPlayed,
            Ok(false) => {}
            Err(e) => warn!("Failed to read session greeting flag: {}", e),
        }

        self.set_state(AiState::Thinking);
        tokio::time::sleep(self.timing.greeting_delay()).await;

        if let Err(e) = store.mark_greeted() {
            warn!("Failed to persist session greeting flag: {}", e);
        }

        let (text, index, mood) = {
            let mut session = self.session();
            let greetings = session_greetings();
            let index = pick_index(greetings.len(), session.last_greeting, &mut session.rng);
            session.last_greeting = Some(index);
            (
                greetings.get(index).copied().unwrap_or_default().to_string(),
                index,
                session.current_emotion,
            )
        };

        let speech = self.speak(&text).await;

        GreetingOutcome::Played(Reply {
            text,
            mood,
            category: None,
            rule: None,
            source: ReplySource::Greeting { index },
            speech,
        })
    }

    /// Show the text, speak it and walk the state machine back to idle.
    async fn speak(&self, text: &str) -> SpeechOutcome {
        // Text goes up first so it is visible even if audio never plays
        self.surface.show_text(text, self.timing.text_visible());

        // Last write wins: interrupt anything still playing
        self.speech.cancel();

        let voice = select_voice(
            &self.speech.voices(),
            &self.voice.lang,
            self.voice.preferred_voice.as_deref(),
        );
        let utterance = Utterance::new(text, &self.voice).with_voice(voice);

        let mut stream = match self.speech.speak(utterance).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!("Speech unavailable: {}", e);
                self.set_state(AiState::Idle);
                return match e {
                    SpeechError::Unsupported(reason) => SpeechOutcome::Unsupported(reason),
                    other => SpeechOutcome::Failed(other.to_string()),
                };
            }
        };

        let mut lip_sync: Option<LipSync> = None;
        let outcome = loop {
            match stream.next().await {
                Some(SpeechEvent::Started) => {
                    if lip_sync.is_none() {
                        self.set_state(AiState::Speaking);
                        let seed = self.session().rng.gen();
                        lip_sync = Some(LipSync::start(
                            Arc::clone(&self.surface),
                            self.timing.lip_sync_interval(),
                            seed,
                        ));
                    }
                }
                Some(SpeechEvent::Ended) => break SpeechOutcome::Completed,
                Some(SpeechEvent::Failed(reason)) => break SpeechOutcome::Failed(reason),
                None => break SpeechOutcome::Failed("speech stream closed".to_string()),
            }
        };

        if let SpeechOutcome::Failed(reason) = &outcome {
            warn!("Speech error: {}", reason);
        }

        match lip_sync {
            Some(lip) => {
                lip.stop();
                self.set_state(AiState::Silent);
                tokio::time::sleep(self.timing.silent()).await;
            }
            None => debug!("speech finished without starting"),
        }
        self.set_state(AiState::Idle);

        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::{MuteSpeech, Script, ScriptedSpeech};
    use crate::surface::{NullSurface, RecordingSurface};

    fn config() -> NeronConfig {
        NeronConfig {
            seed: Some(17),
            decoration: Decoration::none(),
            ..NeronConfig::default()
        }
    }

    #[test]
    fn test_busy_states() {
        assert!(AiState::Thinking.is_busy());
        assert!(AiState::Speaking.is_busy());
        assert!(!AiState::Idle.is_busy());
        assert!(!AiState::Silent.is_busy());
        assert_eq!(AiState::Silent.cue(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_input_is_ignored() {
        let controller =
            AvatarController::new(&config(), Arc::new(MuteSpeech), Arc::new(NullSurface))
                .unwrap();
        assert_eq!(controller.handle_input("   ").await, InputOutcome::Ignored);
        assert_eq!(controller.state(), AiState::Idle);
        assert!(!controller.is_processing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_override_skips_composer() {
        let speech = Arc::new(ScriptedSpeech::new(Script::Succeed(Duration::from_millis(200))));
        let surface = Arc::new(RecordingSurface::new());
        let controller = AvatarController::new(&config(), speech, surface.clone()).unwrap();

        let outcome = controller.handle_input("Салам!").await;
        let reply = outcome.reply().unwrap();
        assert_eq!(
            reply.source,
            ReplySource::Override {
                rule: "kazakh-greeting".to_string()
            }
        );
        assert!(reply.speech.is_completed());
        // Composer memory untouched
        assert_eq!(controller.last_index(reply.category.unwrap()), None);
        assert!(surface
            .events()
            .contains(&crate::surface::SurfaceEvent::Halo));
    }

    #[tokio::test(start_paused = true)]
    async fn test_unsupported_speech_returns_to_idle() {
        let surface = Arc::new(RecordingSurface::new());
        let controller =
            AvatarController::new(&config(), Arc::new(MuteSpeech), surface.clone()).unwrap();

        let outcome = controller.handle_input("дай совет").await;
        let reply = outcome.reply().unwrap();
        assert!(matches!(reply.speech, SpeechOutcome::Unsupported(_)));
        assert_eq!(controller.state(), AiState::Idle);
        assert_eq!(surface.texts(), vec![reply.text.clone()]);
        assert!(!controller.is_processing());
    }

    #[tokio::test(start_paused = true)]
    async fn test_dropped_cycle_releases_guard() {
        let speech = Arc::new(ScriptedSpeech::new(Script::Succeed(Duration::from_secs(5))));
        let controller = AvatarController::new(&config(), speech, Arc::new(NullSurface)).unwrap();

        let result =
            tokio::time::timeout(Duration::from_millis(100), controller.handle_input("привет"))
                .await;
        assert!(result.is_err());
        assert_eq!(controller.state(), AiState::Idle);
        assert!(!controller.is_processing());
    }
}
