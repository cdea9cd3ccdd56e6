//! Neron Common - runtime for the NeronExpert avatar
//!
//! Avatar state machine, speech and rendering seams, session store,
//! configuration and contact delivery. Pure reply rules live in
//! `neron-shared`.

pub mod avatar;
pub mod config;
pub mod contact;
pub mod lipsync;
pub mod session;
pub mod speech;
pub mod surface;

pub use avatar::{
    AiState, AvatarController, GreetingOutcome, InputOutcome, Reply, ReplySource, SpeechOutcome,
};
pub use config::NeronConfig;
pub use contact::{ContactError, ContactForm, ContactMessage, Delivery};
pub use session::{MemorySessionStore, RuntimeSessionStore, SessionStore};
pub use speech::{engine_for, SpeechEngine, SpeechError};
pub use surface::{AnimationCue, AvatarSurface};
