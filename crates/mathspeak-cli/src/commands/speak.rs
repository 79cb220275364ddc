//! Implementation of the `mathspeak speak` command.

use std::time::Duration;

use mathspeak::{
    AudienceLevel, Domain, Engine, EngineConfig, ErrorKind, SpeechError, SpeechRequest,
};
use owo_colors::OwoColorize;

use super::StoreArgs;

/// Arguments for the speak command.
#[derive(Debug, clap::Args)]
pub struct SpeakArgs {
    /// Expression to convert, e.g. '\frac{1}{2}'
    pub expression: String,

    #[command(flatten)]
    pub store: StoreArgs,

    /// Syntactic context compared against rule contexts (e.g. inline, display)
    #[arg(long, default_value = "general")]
    pub context: String,

    /// Target audience (elementary, undergraduate, graduate, research)
    #[arg(long, default_value = "undergraduate")]
    pub audience: AudienceLevel,

    /// Skip domain detection and use this domain
    #[arg(long)]
    pub domain: Option<Domain>,

    /// Output the full result as JSON
    #[arg(long)]
    pub json: bool,

    /// Deepest brace nesting accepted
    #[arg(long, env = "MATHSPEAK_MAX_DEPTH")]
    pub max_depth: Option<usize>,

    /// Highest complexity score accepted
    #[arg(long, env = "MATHSPEAK_MAX_SCORE")]
    pub max_score: Option<f64>,

    /// Time budget for the conversion, in milliseconds
    #[arg(long, env = "MATHSPEAK_TIMEOUT_MS")]
    pub timeout_ms: Option<u64>,

    /// Passes over the text before giving up on a fixed point
    #[arg(long, env = "MATHSPEAK_MAX_PASSES")]
    pub max_passes: Option<usize>,
}

impl SpeakArgs {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig::builder()
            .maybe_max_nesting_depth(self.max_depth)
            .maybe_max_complexity_score(self.max_score)
            .maybe_timeout(self.timeout_ms.map(Duration::from_millis))
            .maybe_max_passes(self.max_passes)
            .cache_enabled(false)
            .build()
    }
}

/// Exit code for a failed conversion.
pub(super) fn exit_code_for(error: &SpeechError) -> i32 {
    match error.kind() {
        ErrorKind::Validation | ErrorKind::Complexity => exitcode::DATAERR,
        ErrorKind::Timeout => exitcode::TEMPFAIL,
    }
}

/// Report a conversion failure on stderr.
pub(super) fn report_error(error: &SpeechError, json: bool) {
    if json {
        let output = serde_json::json!({
            "error": error.to_string(),
            "kind": error.kind(),
        });
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&output).expect("JSON serialization should not fail")
        );
    } else {
        eprintln!("{} {error}", "error:".red().bold());
    }
}

/// Run the speak command.
pub fn run_speak(args: SpeakArgs) -> miette::Result<i32> {
    let store = args.store.build_store()?;
    let engine = Engine::builder()
        .store(store)
        .config(args.engine_config())
        .build();

    let request = SpeechRequest::builder()
        .expression(args.expression.as_str())
        .audience(args.audience)
        .context(args.context.as_str())
        .maybe_domain_hint(args.domain)
        .build();

    match engine.speak(&request) {
        Ok(speech) => {
            if args.json {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&speech)
                        .expect("JSON serialization should not fail")
                );
            } else {
                println!("{}", speech.text);
                for warning in &speech.metadata.warnings {
                    eprintln!("{} {warning}", "warning:".yellow().bold());
                }
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            report_error(&e, args.json);
            Ok(exit_code_for(&e))
        }
    }
}
