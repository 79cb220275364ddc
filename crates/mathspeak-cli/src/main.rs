//! mathspeak CLI entry point.
//!
//! Command-line tools for the speech engine:
//! - `mathspeak speak` - Turn an expression into speech
//! - `mathspeak analyze` - Show domain, category and complexity
//! - `mathspeak check` - Validate rule files
//! - `mathspeak rules` - Summarize a rule set

mod commands;
mod output;

use std::io;
use std::process::exit;

use clap::{Parser, Subcommand, ValueEnum};
use commands::{
    AnalyzeArgs, CheckArgs, RulesArgs, SpeakArgs, run_analyze, run_check, run_rules, run_speak,
};
use tracing_subscriber::EnvFilter;

/// Speech for mathematical notation.
#[derive(Debug, Parser)]
#[command(name = "mathspeak")]
#[command(about = "Turn LaTeX-style math into speakable English", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Color output control
    #[arg(long, value_enum, default_value_t = ColorWhen::Auto, global = true)]
    pub color: ColorWhen,

    /// Log engine activity to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// When to use colored output.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorWhen {
    Auto,
    Always,
    Never,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Convert an expression to speech
    Speak(SpeakArgs),
    /// Show the analysis of an expression without converting it
    Analyze(AnalyzeArgs),
    /// Validate rule files
    Check(CheckArgs),
    /// Summarize the loaded rule set
    Rules(RulesArgs),
}

/// Set up color output based on user preference.
fn setup_colors(color_when: ColorWhen) {
    match color_when {
        ColorWhen::Auto => {
            // owo-colors checks TTY, NO_COLOR and FORCE_COLOR itself
        }
        ColorWhen::Always => owo_colors::set_override(true),
        ColorWhen::Never => owo_colors::set_override(false),
    }
}

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
fn setup_logging(verbose: bool) {
    let default_level = if verbose { "mathspeak=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    if let Err(e) = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init()
    {
        eprintln!("logging disabled: {e}");
    }
}

fn main() -> miette::Result<()> {
    let cli = Cli::parse();
    setup_colors(cli.color);
    setup_logging(cli.verbose);

    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let result = match cli.command {
        Commands::Speak(args) => run_speak(args),
        Commands::Analyze(args) => run_analyze(args),
        Commands::Check(args) => run_check(args),
        Commands::Rules(args) => run_rules(args),
    };

    match result {
        Ok(code) => exit(code),
        Err(e) => {
            eprintln!("{e:?}");
            exit(exitcode::SOFTWARE);
        }
    }
}
