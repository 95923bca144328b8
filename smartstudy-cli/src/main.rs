//! SmartStudy CLI - study notes and quizzes in your terminal

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod output;

use commands::{auth, config, doctor, logs, notes, quiz};

/// SmartStudy - study notes and quizzes in your terminal
#[derive(Parser)]
#[command(name = "study", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new account
    Register {
        /// Full name
        #[arg(long)]
        name: Option<String>,
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Password
        #[arg(long)]
        password: Option<String>,
        /// Don't log in after registering
        #[arg(long)]
        no_login: bool,
    },

    /// Log in to an existing account
    Login {
        /// Email address
        #[arg(long)]
        email: Option<String>,
        /// Password
        #[arg(long)]
        password: Option<String>,
    },

    /// End the current session
    Logout,

    /// Show the logged-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Manage your study notes
    Notes {
        #[command(subcommand)]
        command: notes::NotesCommands,
    },

    /// Take the study skills quiz
    Quiz,

    /// Run store health checks
    Doctor {
        /// Show verbose output
        #[arg(long, short)]
        verbose: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: config::ConfigCommands,
    },

    /// View and manage application logs
    Logs {
        #[command(subcommand)]
        command: logs::LogsCommands,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Register { name, email, password, no_login } => {
            auth::register(name, email, password, no_login)
        }
        Commands::Login { email, password } => auth::login(email, password),
        Commands::Logout => auth::logout(),
        Commands::Whoami { json } => auth::whoami(json),
        Commands::Notes { command } => notes::run(command),
        Commands::Quiz => quiz::run(),
        Commands::Doctor { verbose, json } => doctor::run(verbose, json),
        Commands::Config { command } => config::run(command),
        Commands::Logs { command } => logs::run(command),
    }
}
