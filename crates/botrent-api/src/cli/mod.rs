//! CLI command definitions for the `botrent` binary.
//!
//! Uses clap derive macros for argument parsing. Trial commands follow a
//! noun-verb pattern (`botrent trial activate`, `botrent trial list`).

pub mod status;
pub mod trial;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Track marketplace bot trials.
#[derive(Parser)]
#[command(name = "botrent", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "BOTRENT_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Manage bot trials.
    Trial {
        #[command(subcommand)]
        action: TrialCommand,
    },

    /// Show tracker status (counts, storage backend, data directory).
    Status,

    /// Start the REST API server with the background sweeper.
    Serve {
        /// Port to listen on.
        #[arg(long, default_value_t = 3000)]
        port: u16,

        /// Host address to bind.
        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum TrialCommand {
    /// Start (or restart) a 3-day trial for a bot.
    Activate {
        /// Marketplace bot id.
        bot_id: i64,

        /// Display name stored with the trial.
        name: String,
    },

    /// Remove a bot's trial record.
    #[command(alias = "rm")]
    Deactivate {
        /// Marketplace bot id.
        bot_id: i64,

        /// Skip the confirmation prompt.
        #[arg(long, short)]
        force: bool,
    },

    /// Show one bot's trial.
    Status {
        /// Marketplace bot id.
        bot_id: i64,
    },

    /// List all trials with their countdown.
    #[command(alias = "ls")]
    List,

    /// Recompute statuses now and persist any expirations.
    Sweep,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_activate() {
        let cli = Cli::try_parse_from(["botrent", "trial", "activate", "42", "Sales Bot"]).unwrap();
        match cli.command {
            Commands::Trial {
                action: TrialCommand::Activate { bot_id, name },
            } => {
                assert_eq!(bot_id, 42);
                assert_eq!(name, "Sales Bot");
            }
            _ => panic!("expected trial activate"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["botrent", "trial", "list", "--json", "-vv"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(
            cli.command,
            Commands::Trial {
                action: TrialCommand::List
            }
        ));
    }

    #[test]
    fn test_non_numeric_bot_id_rejected() {
        assert!(Cli::try_parse_from(["botrent", "trial", "status", "abc"]).is_err());
    }

    #[test]
    fn test_serve_defaults() {
        let cli = Cli::try_parse_from(["botrent", "serve"]).unwrap();
        match cli.command {
            Commands::Serve { port, host } => {
                assert_eq!(port, 3000);
                assert_eq!(host, "127.0.0.1");
            }
            _ => panic!("expected serve"),
        }
    }
}
