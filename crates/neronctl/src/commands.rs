//! Command implementations for neronctl

use crate::cli::{Cli, Commands};
use crate::repl;
use crate::surface::TerminalSurface;
use anyhow::{bail, Context, Result};
use neron_common::contact::{ContactForm, ContactMessage, Delivery};
use neron_common::session::RuntimeSessionStore;
use neron_common::{engine_for, AvatarController, InputOutcome, NeronConfig, Reply, SpeechOutcome};
use neron_shared::{classify_explained, select_emotion};
use owo_colors::OwoColorize;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use tracing::{debug, info};

/// Load configuration and dispatch the subcommand.
pub async fn run(cli: Cli) -> Result<()> {
    let mut config = NeronConfig::load(cli.config.as_deref())?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }

    match cli.command_or_chat() {
        Commands::Chat {
            no_greeting,
            new_session,
        } => chat(&config, cli.mute, !no_greeting, new_session).await,
        Commands::Say { text } => say(&config, cli.mute, &text.join(" ")).await,
        Commands::Click => click(&config, cli.mute).await,
        Commands::Classify { text, json } => classify(&config, &text.join(" "), json),
        Commands::Contact {
            name,
            email,
            message,
        } => contact(&config, &name, &email, &message).await,
        Commands::Config { path } => show_config(&config, cli.config.as_deref(), path),
    }
}

fn controller(config: &NeronConfig, mute: bool, surface: Arc<TerminalSurface>) -> Result<AvatarController> {
    let speech = engine_for(&config.voice, mute);
    AvatarController::new(config, speech, surface).context("Failed to set up the avatar")
}

fn report_speech(reply: &Reply) {
    match &reply.speech {
        SpeechOutcome::Completed => debug!("speech completed"),
        SpeechOutcome::Unsupported(reason) => info!("Reply not spoken: {}", reason),
        SpeechOutcome::Failed(reason) => info!("Speech failed: {}", reason),
    }
}

async fn chat(config: &NeronConfig, mute: bool, greeting: bool, new_session: bool) -> Result<()> {
    let surface = Arc::new(TerminalSurface::detect());
    let styled = surface.is_animated();
    let controller = controller(config, mute, surface)?;

    let store = RuntimeSessionStore::discover();
    if new_session {
        store
            .reset()
            .with_context(|| format!("Failed to reset session in {}", store.dir().display()))?;
    }

    repl::run(&controller, &store, greeting, styled).await
}

async fn say(config: &NeronConfig, mute: bool, text: &str) -> Result<()> {
    let controller = controller(config, mute, Arc::new(TerminalSurface::detect()))?;
    match controller.handle_input(text).await {
        InputOutcome::Replied(reply) => {
            report_speech(&reply);
            Ok(())
        }
        InputOutcome::Ignored => bail!("Nothing to say: the message is empty"),
        InputOutcome::Rejected => bail!("Avatar is busy"),
    }
}

async fn click(config: &NeronConfig, mute: bool) -> Result<()> {
    let controller = controller(config, mute, Arc::new(TerminalSurface::detect()))?;
    if let Some(reply) = controller.handle_avatar_click().await.reply() {
        report_speech(reply);
    }
    Ok(())
}

fn classify(config: &NeronConfig, text: &str, json: bool) -> Result<()> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let classification = classify_explained(text, &mut rng);
    let mood = select_emotion(text, &mut rng);
    let special = config
        .overrides
        .table()?
        .find(&neron_shared::normalize(text))
        .map(|rule| rule.name.clone());

    if json {
        let value = serde_json::json!({
            "category": classification.category,
            "rule": classification.rule,
            "mood": mood,
            "override": special,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
        return Ok(());
    }

    println!("category: {} ({:?})", classification.category, classification.rule);
    println!("mood:     {}", mood);
    if let Some(rule) = special {
        println!("override: {}", rule);
    }
    Ok(())
}

async fn contact(config: &NeronConfig, name: &str, email: &str, message: &str) -> Result<()> {
    let form = ContactForm::from_config(&config.contact)?;
    let message = ContactMessage::new(name, email, message);

    match form.submit(&message).await? {
        Delivery::Sent { via } => {
            println!("{} Сообщение отправлено ({})", "✓".green(), via);
        }
        Delivery::Mailto { link, failures } => {
            for failure in &failures {
                debug!("{}", failure);
            }
            println!("Не удалось отправить автоматически. Откройте ссылку в почтовом клиенте:");
            println!("{}", link);
        }
    }
    Ok(())
}

fn show_config(config: &NeronConfig, explicit: Option<&std::path::Path>, path_only: bool) -> Result<()> {
    if path_only {
        match NeronConfig::discover(explicit) {
            Some(path) => println!("{}", path.display()),
            None => println!("(built-in defaults)"),
        }
        return Ok(());
    }
    print!("{}", config.to_toml()?);
    Ok(())
}
