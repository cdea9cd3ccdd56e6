//! Speech synthesis seam.
//!
//! An engine accepts an utterance and returns a stream of lifecycle events.
//! The avatar controller drives its state machine from those events, so an
//! engine must always end a stream with `Ended` or `Failed`, or close it
//! (which the controller treats as a failure).
//!
//! Engines:
//! - `CommandSpeech`: external TTS program such as espeak-ng
//! - `PacedSpeech`: no audio, reports start and end paced by text length
//! - `MuteSpeech`: speech unsupported
//! - `ScriptedSpeech`: scripted events for tests and demos

use crate::config::VoiceConfig;
use async_trait::async_trait;
use std::process::Stdio;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SpeechError {
    #[error("Speech synthesis is not supported: {0}")]
    Unsupported(String),

    #[error("Failed to start speech: {0}")]
    Spawn(String),

    #[error("Speech playback failed: {0}")]
    Playback(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Voice {
    pub name: String,
    pub lang: String,
}

impl Voice {
    pub fn new(name: &str, lang: &str) -> Self {
        Self {
            name: name.to_string(),
            lang: lang.to_string(),
        }
    }
}

/// Pick a voice: preferred name, then exact language, then language
/// prefix, then whatever comes first.
pub fn select_voice(voices: &[Voice], lang: &str, preferred: Option<&str>) -> Option<Voice> {
    if let Some(name) = preferred {
        if let Some(voice) = voices.iter().find(|v| v.name.eq_ignore_ascii_case(name)) {
            return Some(voice.clone());
        }
    }

    let prefix = language_prefix(lang);
    voices
        .iter()
        .find(|v| v.lang.eq_ignore_ascii_case(lang))
        .or_else(|| {
            voices
                .iter()
                .find(|v| language_prefix(&v.lang).eq_ignore_ascii_case(prefix))
        })
        .or_else(|| voices.first())
        .cloned()
}

/// "ru-RU" -> "ru"
pub fn language_prefix(lang: &str) -> &str {
    lang.split(['-', '_']).next().unwrap_or(lang)
}

/// One utterance and its playback parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Utterance {
    pub text: String,
    pub lang: String,
    pub rate: f32,
    pub pitch: f32,
    pub volume: f32,
    pub voice: Option<Voice>,
}

impl Utterance {
    pub fn new(text: &str, voice: &VoiceConfig) -> Self {
        Self {
            text: text.to_string(),
            lang: voice.lang.clone(),
            rate: voice.rate,
            pitch: voice.pitch,
            volume: voice.volume,
            voice: None,
        }
    }

    pub fn with_voice(mut self, voice: Option<Voice>) -> Self {
        self.voice = voice;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechEvent {
    Started,
    Ended,
    Failed(String),
}

/// Receiving side of an utterance's lifecycle events.
pub struct SpeechStream {
    rx: mpsc::UnboundedReceiver<SpeechEvent>,
}

impl SpeechStream {
    /// A connected (sender, stream) pair for engine implementations.
    pub fn channel() -> (mpsc::UnboundedSender<SpeechEvent>, SpeechStream) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, SpeechStream { rx })
    }

    /// Next event, `None` once the engine dropped its sender.
    pub async fn next(&mut self) -> Option<SpeechEvent> {
        self.rx.recv().await
    }
}

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    /// Installed voices, possibly empty.
    fn voices(&self) -> Vec<Voice> {
        Vec::new()
    }

    /// Begin speaking. Returns once playback has been handed off.
    async fn speak(&self, utterance: Utterance) -> Result<SpeechStream, SpeechError>;

    /// Interrupt whatever is playing. Safe to call when idle.
    fn cancel(&self);
}

/// Slot holding the task that owns the current utterance.
#[derive(Default)]
struct Playback {
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Playback {
    fn replace(&self, handle: JoinHandle<()>) {
        let mut slot = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = slot.replace(handle) {
            previous.abort();
        }
    }

    fn abort(&self) {
        let mut slot = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = slot.take() {
            handle.abort();
        }
    }
}

/// Speech is not available on this system.
#[derive(Debug, Default, Clone)]
pub struct MuteSpeech;

#[async_trait]
impl SpeechEngine for MuteSpeech {
    async fn speak(&self, _utterance: Utterance) -> Result<SpeechStream, SpeechError> {
        Err(SpeechError::Unsupported("speech is muted".to_string()))
    }

    fn cancel(&self) {}
}

/// Silent engine that takes as long as reading the text aloud would.
#[derive(Default)]
pub struct PacedSpeech {
    per_char: Duration,
    playback: Playback,
}

impl PacedSpeech {
    pub fn new(per_char: Duration) -> Self {
        Self {
            per_char,
            playback: Playback::default(),
        }
    }

    /// Roughly conversational pace.
    pub fn conversational() -> Self {
        Self::new(Duration::from_millis(55))
    }

    pub fn duration_for(&self, utterance: &Utterance) -> Duration {
        let chars = utterance.text.chars().count() as f64;
        let rate = if utterance.rate > 0.0 { utterance.rate as f64 } else { 1.0 };
        Duration::try_from_secs_f64(self.per_char.as_secs_f64() * chars / rate)
            .unwrap_or(Duration::ZERO)
    }
}

#[async_trait]
impl SpeechEngine for PacedSpeech {
    async fn speak(&self, utterance: Utterance) -> Result<SpeechStream, SpeechError> {
        let (tx, stream) = SpeechStream::channel();
        let duration = self.duration_for(&utterance);

        let handle = tokio::spawn(async move {
            let _ = tx.send(SpeechEvent::Started);
            tokio::time::sleep(duration).await;
            let _ = tx.send(SpeechEvent::Ended);
        });
        self.playback.replace(handle);
        Ok(stream)
    }

    fn cancel(&self) {
        self.playback.abort();
    }
}

/// External TTS program, espeak-ng compatible flags.
pub struct CommandSpeech {
    program: String,
    voices: Vec<Voice>,
    playback: Playback,
}

impl CommandSpeech {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
            voices: Vec::new(),
            playback: Playback::default(),
        }
    }

    pub fn with_voices(mut self, voices: Vec<Voice>) -> Self {
        self.voices = voices;
        self
    }

    /// Command-line arguments for an utterance.
    pub fn args(utterance: &Utterance) -> Vec<String> {
        let voice = utterance
            .voice
            .as_ref()
            .map(|v| v.name.clone())
            .unwrap_or_else(|| language_prefix(&utterance.lang).to_string());
        let words_per_minute = (175.0 * utterance.rate).round().clamp(80.0, 450.0) as u32;
        let pitch = (50.0 * utterance.pitch).round().clamp(0.0, 99.0) as u32;
        let amplitude = (100.0 * utterance.volume).round().clamp(0.0, 200.0) as u32;

        vec![
            "-v".to_string(),
            voice,
            "-s".to_string(),
            words_per_minute.to_string(),
            "-p".to_string(),
            pitch.to_string(),
            "-a".to_string(),
            amplitude.to_string(),
            "--".to_string(),
            utterance.text.clone(),
        ]
    }
}

#[async_trait]
impl SpeechEngine for CommandSpeech {
    fn voices(&self) -> Vec<Voice> {
        self.voices.clone()
    }

    async fn speak(&self, utterance: Utterance) -> Result<SpeechStream, SpeechError> {
        let mut child = tokio::process::Command::new(&self.program)
            .args(Self::args(&utterance))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => {
                    SpeechError::Unsupported(format!("{} not found", self.program))
                }
                _ => SpeechError::Spawn(e.to_string()),
            })?;

        debug!(program = %self.program, "speech process started");
        let (tx, stream) = SpeechStream::channel();

        let handle = tokio::spawn(async move {
            let _ = tx.send(SpeechEvent::Started);
            let event = match child.wait().await {
                Ok(status) if status.success() => SpeechEvent::Ended,
                Ok(status) => SpeechEvent::Failed(format!("exited with {}", status)),
                Err(e) => SpeechEvent::Failed(e.to_string()),
            };
            if let SpeechEvent::Failed(reason) = &event {
                warn!("speech process failed: {}", reason);
            }
            let _ = tx.send(event);
        });
        self.playback.replace(handle);
        Ok(stream)
    }

    fn cancel(&self) {
        // Aborting drops the child, and kill_on_drop stops the process
        self.playback.abort();
    }
}

/// How a scripted utterance plays out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Script {
    /// Start, hold for the duration, end.
    Succeed(Duration),
    /// Start, hold for the duration, then fail.
    FailAfterStart(Duration, String),
    /// Fail without ever starting.
    FailBeforeStart(String),
    /// `speak` itself is rejected.
    Unsupported,
}

/// Engine that plays back a fixed script; records every utterance.
pub struct ScriptedSpeech {
    script: Script,
    spoken: Arc<Mutex<Vec<Utterance>>>,
    cancels: Arc<Mutex<usize>>,
    playback: Playback,
}

impl ScriptedSpeech {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            spoken: Arc::new(Mutex::new(Vec::new())),
            cancels: Arc::new(Mutex::new(0)),
            playback: Playback::default(),
        }
    }

    pub fn spoken(&self) -> Vec<Utterance> {
        self.spoken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn cancel_count(&self) -> usize {
        *self.cancels.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SpeechEngine for ScriptedSpeech {
    fn voices(&self) -> Vec<Voice> {
        vec![Voice::new("english", "en-US"), Voice::new("russian", "ru-RU")]
    }

    async fn speak(&self, utterance: Utterance) -> Result<SpeechStream, SpeechError> {
        if self.script == Script::Unsupported {
            return Err(SpeechError::Unsupported("scripted".to_string()));
        }
        self.spoken
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(utterance);

        let (tx, stream) = SpeechStream::channel();
        let script = self.script.clone();
        let handle = tokio::spawn(async move {
            match script {
                Script::Succeed(hold) => {
                    let _ = tx.send(SpeechEvent::Started);
                    tokio::time::sleep(hold).await;
                    let _ = tx.send(SpeechEvent::Ended);
                }
                Script::FailAfterStart(hold, reason) => {
                    let _ = tx.send(SpeechEvent::Started);
                    tokio::time::sleep(hold).await;
                    let _ = tx.send(SpeechEvent::Failed(reason));
                }
                Script::FailBeforeStart(reason) => {
                    let _ = tx.send(SpeechEvent::Failed(reason));
                }
                Script::Unsupported => {}
            }
        });
        self.playback.replace(handle);
        Ok(stream)
    }

    fn cancel(&self) {
        *self.cancels.lock().unwrap_or_else(PoisonError::into_inner) += 1;
        self.playback.abort();
    }
}

/// Engine for a voice configuration: external program when configured,
/// paced silence otherwise.
///
/// A configured `preferred_voice` is registered as the program's voice so
/// voice selection hands it to the command line.
pub fn engine_for(voice: &VoiceConfig, mute: bool) -> Arc<dyn SpeechEngine> {
    if mute {
        return Arc::new(MuteSpeech);
    }
    match voice.command.as_deref() {
        Some(program) if !program.trim().is_empty() => {
            let voices = voice
                .preferred_voice
                .as_deref()
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(|name| vec![Voice::new(name, &voice.lang)])
                .unwrap_or_default();
            Arc::new(CommandSpeech::new(program).with_voices(voices))
        }
        _ => Arc::new(PacedSpeech::conversational()),
    }
}
