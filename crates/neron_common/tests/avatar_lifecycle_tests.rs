//! Avatar lifecycle tests
//!
//! Tests verify:
//! - A successful cycle walks idle -> thinking -> speaking -> silent -> idle
//! - Lip sync only runs while speaking and leaves the mouth closed
//! - Speech failures still end in idle with the text already shown
//! - Input arriving while busy changes nothing
//! - A cycle cut short, even during the silent pause, still ends in idle
//! - The session greeting plays once per store
//!
//! All tests run on paused tokio time, so the configured delays cost nothing.

use neron_common::config::NeronConfig;
use neron_common::session::{MemorySessionStore, RuntimeSessionStore};
use neron_common::speech::{Script, ScriptedSpeech};
use neron_common::surface::{AnimationCue, RecordingSurface, SurfaceEvent};
use neron_common::{
    AiState, AvatarController, GreetingOutcome, InputOutcome, ReplySource, SpeechOutcome,
};
use neron_shared::{Category, Decoration, Mood, Viseme};
use std::sync::Arc;
use std::time::Duration;

fn quiet_config() -> NeronConfig {
    NeronConfig {
        seed: Some(42),
        decoration: Decoration::none(),
        ..NeronConfig::default()
    }
}

fn controller(script: Script) -> (Arc<AvatarController>, Arc<ScriptedSpeech>, Arc<RecordingSurface>) {
    let speech = Arc::new(ScriptedSpeech::new(script));
    let surface = Arc::new(RecordingSurface::new());
    let controller =
        AvatarController::new(&quiet_config(), speech.clone(), surface.clone()).unwrap();
    (Arc::new(controller), speech, surface)
}

/// Index of the first event matching `pred`.
fn position(events: &[SurfaceEvent], pred: impl Fn(&SurfaceEvent) -> bool) -> usize {
    events.iter().position(pred).expect("event present")
}

// ============================================================================
// Full cycle
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_successful_cycle_order() {
    let (controller, speech, surface) = controller(Script::Succeed(Duration::from_millis(350)));

    let outcome = controller.handle_input("Почему небо синее?").await;
    let reply = outcome.reply().expect("replied").clone();

    assert_eq!(reply.category, Some(Category::Questions));
    assert_eq!(reply.mood, Mood::Curious);
    assert_eq!(reply.speech, SpeechOutcome::Completed);
    assert_eq!(controller.state(), AiState::Idle);
    assert_eq!(controller.current_emotion(), Mood::Curious);

    assert_eq!(
        surface.cues(),
        vec![
            Some(AnimationCue::Breathing),
            Some(AnimationCue::Thinking),
            Some(AnimationCue::Speaking),
            None,
            Some(AnimationCue::Breathing),
        ]
    );

    let events = surface.events();
    let text_at = position(&events, |e| matches!(e, SurfaceEvent::Text(_)));
    let speaking_at = position(&events, |e| {
        *e == SurfaceEvent::Cue(Some(AnimationCue::Speaking))
    });
    let silent_at = position(&events, |e| *e == SurfaceEvent::Cue(None));
    assert!(text_at < speaking_at);

    // Mouth movement only between speaking and silent
    for (i, event) in events.iter().enumerate() {
        if matches!(event, SurfaceEvent::Mouth(_)) {
            assert!(i > speaking_at && i < silent_at, "mouth event at {}", i);
        }
    }
    let mouths = events
        .iter()
        .filter(|e| matches!(e, SurfaceEvent::Mouth(_)))
        .count();
    assert!(mouths >= 2);
    assert_eq!(events[silent_at - 1], SurfaceEvent::Mouth(Viseme::Closed));

    // Russian voice picked for the default language
    let spoken = speech.spoken();
    assert_eq!(spoken.len(), 1);
    assert_eq!(spoken[0].text, reply.text);
    assert_eq!(spoken[0].voice.as_ref().map(|v| v.name.as_str()), Some("russian"));
}

#[tokio::test(start_paused = true)]
async fn test_composed_reply_updates_last_index() {
    let (controller, _speech, _surface) = controller(Script::Succeed(Duration::from_millis(50)));

    let outcome = controller.handle_input("дай мотивацию").await;
    let reply = outcome.reply().expect("replied");
    let category = reply.category.expect("category");
    match reply.source {
        ReplySource::Composed { index } => {
            assert_eq!(controller.last_index(category), Some(index));
        }
        ref other => panic!("expected composed reply, got {:?}", other),
    }
}

// ============================================================================
// Speech failures
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_failure_after_start_still_reaches_idle() {
    let (controller, _speech, surface) = controller(Script::FailAfterStart(
        Duration::from_millis(200),
        "audio device lost".to_string(),
    ));

    let outcome = controller.handle_input("привет").await;
    let reply = outcome.reply().expect("replied");

    assert_eq!(reply.speech, SpeechOutcome::Failed("audio device lost".to_string()));
    assert_eq!(controller.state(), AiState::Idle);
    assert_eq!(surface.texts(), vec![reply.text.clone()]);
    assert_eq!(surface.cues().last(), Some(&Some(AnimationCue::Breathing)));
    assert!(surface.cues().contains(&None));
}

#[tokio::test(start_paused = true)]
async fn test_failure_before_start_skips_speaking() {
    let (controller, _speech, surface) =
        controller(Script::FailBeforeStart("no audio".to_string()));

    let outcome = controller.handle_input("привет").await;
    assert!(matches!(
        outcome.reply().map(|r| &r.speech),
        Some(SpeechOutcome::Failed(_))
    ));
    assert_eq!(
        surface.cues(),
        vec![
            Some(AnimationCue::Breathing),
            Some(AnimationCue::Thinking),
            Some(AnimationCue::Breathing),
        ]
    );
    assert!(!surface
        .events()
        .iter()
        .any(|e| matches!(e, SurfaceEvent::Mouth(_))));
    assert_eq!(surface.texts().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_unsupported_speech_shows_text() {
    let (controller, _speech, surface) = controller(Script::Unsupported);

    let outcome = controller.handle_input("расскажи шутку").await;
    let reply = outcome.reply().expect("replied");
    assert!(matches!(reply.speech, SpeechOutcome::Unsupported(_)));
    assert_eq!(surface.texts(), vec![reply.text.clone()]);
    assert_eq!(controller.state(), AiState::Idle);
}

// ============================================================================
// Busy guard
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_input_while_thinking_is_rejected() {
    let (controller, speech, _surface) = controller(Script::Succeed(Duration::from_millis(300)));

    let first = {
        let controller = Arc::clone(&controller);
        tokio::spawn(async move { controller.handle_input("почему?").await })
    };

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(controller.state(), AiState::Thinking);

    assert_eq!(
        controller.handle_input("расскажи шутку").await,
        InputOutcome::Rejected
    );
    assert_eq!(controller.handle_avatar_click().await, InputOutcome::Rejected);

    // Nothing about the session moved
    assert_eq!(controller.state(), AiState::Thinking);
    assert_eq!(controller.current_emotion(), Mood::Friendly);
    for category in Category::ALL {
        assert_eq!(controller.last_index(category), None);
    }

    let outcome = first.await.unwrap();
    assert!(outcome.reply().is_some());
    assert_eq!(speech.spoken().len(), 1);
    assert_eq!(controller.state(), AiState::Idle);

    // Free again once the cycle is over
    let next = controller.handle_input("расскажи шутку").await;
    assert!(next.reply().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_cycle_dropped_while_silent_returns_to_idle() {
    let (controller, _speech, surface) = controller(Script::Succeed(Duration::from_millis(100)));

    // Thinking ends at 800 ms, speech at 900 ms, silent runs until 1200 ms
    let result =
        tokio::time::timeout(Duration::from_millis(1000), controller.handle_input("привет")).await;
    assert!(result.is_err());

    assert_eq!(controller.state(), AiState::Idle);
    assert!(!controller.is_processing());
    assert_eq!(surface.cues().last(), Some(&Some(AnimationCue::Breathing)));

    tokio::time::sleep(Duration::from_secs(5)).await;
    assert_eq!(controller.state(), AiState::Idle);
    assert!(controller.handle_input("привет").await.reply().is_some());
}

#[tokio::test(start_paused = true)]
async fn test_click_reply_uses_click_phrase() {
    let (controller, _speech, _surface) = controller(Script::Succeed(Duration::from_millis(50)));

    let outcome = controller.handle_avatar_click().await;
    let reply = outcome.reply().expect("replied");
    assert_eq!(reply.source, ReplySource::Click);
    assert_eq!(reply.category, None);
    assert!(neron_shared::phrases::click_phrases(reply.mood).contains(&reply.text.as_str()));
    assert_eq!(controller.current_emotion(), reply.mood);
}

// ============================================================================
// Session greeting
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_greeting_plays_once() {
    let (controller, speech, _surface) = controller(Script::Succeed(Duration::from_millis(100)));
    let store = MemorySessionStore::new();

    match controller.play_greeting(&store).await {
        GreetingOutcome::Played(reply) => {
            assert!(matches!(reply.source, ReplySource::Greeting { .. }));
            assert!(neron_shared::phrases::session_greetings().contains(&reply.text.as_str()));
        }
        other => panic!("expected greeting, got {:?}", other),
    }
    assert_eq!(
        controller.play_greeting(&store).await,
        GreetingOutcome::AlreadyPlayed
    );
    assert_eq!(speech.spoken().len(), 1);
    assert_eq!(controller.state(), AiState::Idle);
}

#[tokio::test(start_paused = true)]
async fn test_greeting_flag_shared_through_runtime_store() {
    let tmp = tempfile::tempdir().unwrap();
    let store = RuntimeSessionStore::in_dir(tmp.path());

    let (first, _, _) = controller(Script::Succeed(Duration::from_millis(10)));
    assert!(matches!(
        first.play_greeting(&store).await,
        GreetingOutcome::Played(_)
    ));

    let (second, speech, _) = controller(Script::Succeed(Duration::from_millis(10)));
    assert_eq!(
        second.play_greeting(&store).await,
        GreetingOutcome::AlreadyPlayed
    );
    assert!(speech.spoken().is_empty());
}
