//! CLI commands

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use studybreak_protocol::{BreakBias, FatigueSensitivity};

/// Studybreak - study/break coaching from the terminal
#[derive(Parser, Debug)]
#[command(name = "studybreak")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file (default: discovered studybreak.{jsonc,json,yml,yaml})
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory holding ui-state.json (default: ~/.studybreak)
    #[arg(long, global = true)]
    pub state_dir: Option<PathBuf>,

    /// Decision service base URL, overrides config and STUDYBREAK_URL
    #[arg(long, global = true)]
    pub url: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn is_interactive(&self) -> bool {
        matches!(self.command, None | Some(Commands::Monitor))
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Interactive session monitor (default)
    Monitor,

    /// Show study time, fatigue and goal progress
    Status,

    /// Show the current recommendation
    Recommend,

    /// Take the recommended action once
    ///
    /// Each call starts a fresh session, so a completion reward only covers
    /// the final step. Cumulative reward is tracked inside `monitor`.
    Act,

    /// Reset the study session
    Reset,

    /// Session goal
    Goal {
        #[command(subcommand)]
        command: GoalCommands,
    },

    /// Break preferences
    Prefs {
        #[command(subcommand)]
        command: PrefsCommands,
    },

    /// Train the agent
    Train {
        /// Number of episodes (default from config)
        #[arg(short, long)]
        episodes: Option<u32>,
    },

    /// Training statistics
    Stats,

    /// Learning statistics and recent sessions
    History,

    /// Desktop notification permission
    Notifications {
        #[command(subcommand)]
        command: NotificationCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum GoalCommands {
    /// Show the current goal
    Show,
    /// Set the goal in minutes (1-480)
    Set {
        #[arg(allow_negative_numbers = true)]
        minutes: i64,
    },
}

#[derive(Subcommand, Debug)]
pub enum PrefsCommands {
    /// Show saved preferences
    Show,
    /// Save preferences
    Set {
        /// low, medium or high
        #[arg(long)]
        fatigue: FatigueSensitivity,
        /// study, short or long
        #[arg(long)]
        bias: BreakBias,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationCommands {
    /// Allow desktop notifications
    Allow,
    /// Disable desktop notifications
    Deny,
    /// Show the current permission
    Status,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the resolved configuration
    Show,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_default_is_interactive() {
        let cli = Cli::parse_from(["studybreak"]);
        assert!(cli.is_interactive());

        let cli = Cli::parse_from(["studybreak", "status"]);
        assert!(!cli.is_interactive());
    }

    #[test]
    fn test_prefs_values_are_validated() {
        let cli = Cli::try_parse_from([
            "studybreak", "prefs", "set", "--fatigue", "high", "--bias", "long",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Prefs {
                command: PrefsCommands::Set { fatigue, bias },
            }) => {
                assert_eq!(fatigue, FatigueSensitivity::High);
                assert_eq!(bias, BreakBias::Long);
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Cli::try_parse_from([
            "studybreak", "prefs", "set", "--fatigue", "extreme", "--bias", "long",
        ])
        .is_err());
    }

    #[test]
    fn test_negative_goal_reaches_validation() {
        let cli = Cli::try_parse_from(["studybreak", "goal", "set", "-5"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Commands::Goal {
                command: GoalCommands::Set { minutes: -5 }
            })
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["studybreak", "status", "--url", "http://localhost:9000"]).unwrap();
        assert_eq!(cli.url.as_deref(), Some("http://localhost:9000"));
    }
}
