// CLI front end (spec §6): two positional schema files, prints
// `True`/`False`, exit code 0 on a clean decision. Any failure writes a
// diagnostic to stderr and exits non-zero. Grounded on the teacher
// crate's own `examples/regorus.rs`: `clap::Parser` for argument parsing,
// `anyhow::Result` at the binary boundary converting a typed error into
// a process exit code.

use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;

use subschema::DecisionOptions;

#[derive(Parser)]
#[command(author, version, about = "Decides whether lhs.json is a subschema of rhs.json", long_about = None)]
struct Cli {
    /// The candidate subschema.
    lhs: String,

    /// The candidate superschema.
    rhs: String,

    /// Ceiling on states explored by the regex adapter's product
    /// automaton before giving up (`RegexUnsupported`).
    #[arg(long, value_name = "N")]
    dfa_state_cap: Option<usize>,

    /// Abort the decision after this many milliseconds, returning
    /// `Undecided`.
    #[arg(long, value_name = "MS")]
    timeout_ms: Option<u64>,

    /// Verbose logging (RUST_LOG also controls this).
    #[arg(long, short)]
    verbose: bool,
}

fn read_schema(path: &str) -> Result<serde_json::Value> {
    let text = std::fs::read_to_string(path).with_context(|| format!("could not read {path}"))?;
    serde_json::from_str(&text).with_context(|| format!("{path} does not parse as JSON"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "debug"
    } else {
        "warn"
    };
    tracing_subscriber_init(filter);

    let lhs = read_schema(&cli.lhs)?;
    let rhs = read_schema(&cli.rhs)?;

    let mut opts = DecisionOptions::default();
    if let Some(cap) = cli.dfa_state_cap {
        opts.dfa_state_cap = cap;
    }
    if let Some(ms) = cli.timeout_ms {
        opts.deadline = Some(Instant::now() + Duration::from_millis(ms));
    }

    match subschema::is_subschema_with_options(&lhs, &rhs, &opts) {
        Ok(true) => {
            println!("True");
            Ok(())
        }
        Ok(false) => {
            println!("False");
            Ok(())
        }
        Err(e) => bail!("{e}"),
    }
}

/// Installs a `tracing-subscriber` `fmt` subscriber honoring `RUST_LOG`,
/// falling back to `default_level` when unset -- the same
/// `EnvFilter`-driven setup `estuary-flow` uses for its own CLI entry
/// points.
fn tracing_subscriber_init(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
