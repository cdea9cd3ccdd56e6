//! Command-line definition for neronctl

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

// Version is embedded at build time
pub const VERSION: &str = env!("NERON_VERSION");

#[derive(Parser, Debug)]
#[command(name = "neronctl")]
#[command(about = "NeronExpert - talking AI avatar in your terminal", long_about = None)]
#[command(version = VERSION)]
pub struct Cli {
    /// Configuration file (overrides $NERON_CONFIG and the default locations)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Fixed RNG seed for reproducible replies
    #[arg(long, global = true)]
    pub seed: Option<u64>,

    /// Never speak, only show text
    #[arg(long, global = true)]
    pub mute: bool,

    /// More log output on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Interactive conversation (default)
    Chat {
        /// Skip the session greeting
        #[arg(long)]
        no_greeting: bool,

        /// Forget that the greeting already played this session
        #[arg(long)]
        new_session: bool,
    },

    /// Send one message and print the reply
    Say {
        #[arg(required = true)]
        text: Vec<String>,
    },

    /// Poke the avatar
    Click,

    /// Show how a message is classified, without replying
    Classify {
        #[arg(required = true)]
        text: Vec<String>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Send a message through the contact form
    Contact {
        #[arg(long, default_value = "")]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        message: String,
    },

    /// Print the effective configuration
    Config {
        /// Only print which file was loaded
        #[arg(long)]
        path: bool,
    },
}

impl Cli {
    /// Subcommand to run, chat when none was given.
    pub fn command_or_chat(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat {
            no_greeting: false,
            new_session: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_subcommand_means_chat() {
        let cli = Cli::try_parse_from(["neronctl"]).unwrap();
        assert!(matches!(cli.command_or_chat(), Commands::Chat { no_greeting: false, .. }));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["neronctl", "say", "привет", "мир", "--mute", "--seed", "7", "-vv"])
            .unwrap();
        assert!(cli.mute);
        assert_eq!(cli.seed, Some(7));
        assert_eq!(cli.verbose, 2);
        assert_eq!(
            cli.command_or_chat(),
            Commands::Say {
                text: vec!["привет".to_string(), "мир".to_string()]
            }
        );
    }

    #[test]
    fn test_contact_requires_email() {
        assert!(Cli::try_parse_from(["neronctl", "contact", "--message", "hi"]).is_err());
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        <Cli as CommandFactory>::command().debug_assert();
    }
}
