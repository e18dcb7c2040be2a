// SPDX-License-Identifier: LGPL-3.0-only
//
// This file is provided WITHOUT ANY WARRANTY;
// without even the implied warranty of MERCHANTABILITY
// or FITNESS FOR A PARTICULAR PURPOSE.

use crate::helpers::{load_wallet, telemetry::setup_simple_tracing};
use crate::session::Session;
use crate::{
    answers, balance, decrypt, leaderboard, questions, reset_daily_limit, stats, submit, verify,
};
use anyhow::Result;
use clap::{command, ArgAction, Parser, Subcommand};
use quiz_config::load_config;
use tracing::{info, instrument, Level};

#[derive(Parser, Debug)]
#[command(name = "quiz")]
#[command(about = "Answer quiz questions with encrypted answers and earn token rewards", long_about = None)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Chain id to play on. Defaults to `default_chain` from the config
    #[arg(long, global = true)]
    chain: Option<u64>,

    /// Print results as json
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,

    /// Indicate error levels by adding additional `-v` arguments. Eg. `quiz -vvv` will give you
    /// trace level output
    #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true
    )]
    pub verbose: u8,

    /// Silence all output. This argument cannot be used alongside `-v`
    #[arg(
        short,
        long,
        action = ArgAction::SetTrue,
        conflicts_with = "verbose",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    pub fn log_level(&self) -> Level {
        if self.quiet {
            Level::ERROR
        } else {
            match self.verbose {
                0 => Level::WARN,  //
                1 => Level::INFO,  // -v
                2 => Level::DEBUG, // -vv
                _ => Level::TRACE, // -vvv
            }
        }
    }

    #[instrument(skip_all)]
    pub async fn execute(self) -> Result<()> {
        setup_simple_tracing(self.log_level());

        // Must run before load_config, whose env provider also reads QUIZ_ variables
        let wallet = load_wallet()?;
        let config = load_config(self.config.clone())?;
        info!("Config loaded from: {:?}", config.config_file());

        if self.command.needs_wallet() && wallet.is_none() {
            anyhow::bail!(
                "`quiz {}` needs a wallet. Set {} to a 0x prefixed private key.",
                self.command.name(),
                crate::helpers::PRIVATE_KEY_ENV
            );
        }

        let session = Session::connect(&config, self.chain, wallet).await?;
        let game = session.game();
        let json = self.json;

        let result = match self.command {
            Commands::Questions => questions::execute(game, json).await,
            Commands::Leaderboard => leaderboard::execute(game, json).await,
            Commands::Stats => stats::execute(game, json).await,
            Commands::Answers => answers::execute(game, json).await,
            Commands::Balance => balance::execute(game, json).await,
            Commands::Submit {
                question_id,
                answer,
                no_wait,
            } => submit::execute(game, question_id, answer, !no_wait, json).await,
            Commands::Decrypt { answer_index } => decrypt::execute(game, answer_index, json).await,
            Commands::Verify {
                answer_index,
                answer,
            } => verify::execute(game, answer_index, answer, json).await,
            Commands::ResetDailyLimit => reset_daily_limit::execute(game, json).await,
        };

        session.close();
        result
    }
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// List the active questions
    Questions,

    /// Show the current ranking
    Leaderboard,

    /// Show answer statistics for the wallet
    Stats,

    /// List the answers the wallet has submitted
    Answers,

    /// Show the wallet's reward token balance
    Balance,

    /// Encrypt an answer and submit it
    Submit {
        /// Question to answer
        question_id: u64,

        /// Index of the chosen option
        answer: u32,

        /// Return once the answer is on chain instead of waiting for its verification
        #[arg(long)]
        no_wait: bool,
    },

    /// Decrypt a stored answer and send it to the contract for verification
    Decrypt {
        /// Position of the answer in the wallet's answer list
        answer_index: u64,
    },

    /// Send an already decrypted answer for verification
    Verify {
        /// Position of the answer in the wallet's answer list
        answer_index: u64,

        /// Decrypted option index
        answer: u32,
    },

    /// Reset the wallet's daily answer count
    ResetDailyLimit,
}

impl Commands {
    pub fn needs_wallet(&self) -> bool {
        !matches!(self, Commands::Questions | Commands::Leaderboard)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Commands::Questions => "questions",
            Commands::Leaderboard => "leaderboard",
            Commands::Stats => "stats",
            Commands::Answers => "answers",
            Commands::Balance => "balance",
            Commands::Submit { .. } => "submit",
            Commands::Decrypt { .. } => "decrypt",
            Commands::Verify { .. } => "verify",
            Commands::ResetDailyLimit => "reset-daily-limit",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_submit_arguments() -> Result<()> {
        let cli = Cli::try_parse_from(["quiz", "--chain", "31337", "submit", "3", "2", "--no-wait"])?;
        assert_eq!(cli.chain, Some(31337));
        assert_eq!(
            cli.command,
            Commands::Submit {
                question_id: 3,
                answer: 2,
                no_wait: true
            }
        );
        assert!(cli.command.needs_wallet());
        Ok(())
    }

    #[test]
    fn test_read_commands_need_no_wallet() -> Result<()> {
        for name in ["questions", "leaderboard"] {
            let cli = Cli::try_parse_from(["quiz", name])?;
            assert!(!cli.command.needs_wallet());
            assert_eq!(cli.command.name(), name);
        }
        Ok(())
    }

    #[test]
    fn test_log_levels() -> Result<()> {
        assert_eq!(Cli::try_parse_from(["quiz", "stats"])?.log_level(), Level::WARN);
        assert_eq!(Cli::try_parse_from(["quiz", "-vv", "stats"])?.log_level(), Level::DEBUG);
        assert_eq!(Cli::try_parse_from(["quiz", "-q", "stats"])?.log_level(), Level::ERROR);
        assert!(Cli::try_parse_from(["quiz", "-q", "-v", "stats"]).is_err());
        Ok(())
    }

    #[test]
    fn test_kebab_case_subcommand() -> Result<()> {
        let cli = Cli::try_parse_from(["quiz", "reset-daily-limit", "--json"])?;
        assert_eq!(cli.command, Commands::ResetDailyLimit);
        assert!(cli.json);
        Ok(())
    }
}
