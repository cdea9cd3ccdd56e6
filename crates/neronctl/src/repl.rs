//! REPL - conversation with the avatar
//!
//! Reads lines from stdin until EOF or an exit word. `/click` pokes the
//! avatar instead of sending text.

use anyhow::Result;
use neron_common::session::SessionStore;
use neron_common::{AvatarController, GreetingOutcome, InputOutcome};
use neron_shared::PERSONA_NAME;
use owo_colors::OwoColorize;
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

const EXIT_WORDS: &[&str] = &["exit", "quit", "/exit", "/quit", "выход"];
const CLICK_COMMAND: &str = "/click";

/// What a line of input asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    Exit,
    Click,
    Say(String),
    Skip,
}

pub fn parse_line(line: &str) -> ReplCommand {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return ReplCommand::Skip;
    }
    let lowered = trimmed.to_lowercase();
    if EXIT_WORDS.contains(&lowered.as_str()) {
        ReplCommand::Exit
    } else if lowered == CLICK_COMMAND {
        ReplCommand::Click
    } else {
        ReplCommand::Say(trimmed.to_string())
    }
}

fn print_welcome(styled: bool) {
    let title = format!("{} - чат", PERSONA_NAME);
    if styled {
        println!("{}", title.bright_cyan().bold());
        println!("{}", "/click - ткнуть аватара, exit - выйти".dimmed());
    } else {
        println!("{}", title);
        println!("/click - ткнуть аватара, exit - выйти");
    }
    println!();
}

fn print_prompt() {
    print!("> ");
    let _ = std::io::stdout().flush();
}

/// Run the chat loop until stdin closes or the user leaves.
pub async fn run(
    controller: &AvatarController,
    store: &dyn SessionStore,
    greeting: bool,
    styled: bool,
) -> Result<()> {
    print_welcome(styled);

    if greeting {
        match controller.play_greeting(store).await {
            GreetingOutcome::Played(reply) => debug!(text = %reply.text, "greeting played"),
            other => debug!(?other, "greeting skipped"),
        }
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print_prompt();
        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };

        let outcome = match parse_line(&line) {
            ReplCommand::Exit => break,
            ReplCommand::Skip => continue,
            ReplCommand::Click => controller.handle_avatar_click().await,
            ReplCommand::Say(text) => controller.handle_input(&text).await,
        };

        if outcome == InputOutcome::Rejected {
            let busy = "(занят, подожди секунду)";
            if styled {
                println!("{}", busy.dimmed());
            } else {
                println!("{}", busy);
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line() {
        assert_eq!(parse_line("   "), ReplCommand::Skip);
        assert_eq!(parse_line("EXIT"), ReplCommand::Exit);
        assert_eq!(parse_line("выход"), ReplCommand::Exit);
        assert_eq!(parse_line(" /click "), ReplCommand::Click);
        assert_eq!(
            parse_line("  привет  "),
            ReplCommand::Say("привет".to_string())
        );
    }
}
