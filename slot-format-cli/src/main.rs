use clap::{Parser, Subcommand, ValueEnum};
use slot_format::Slot;
use std::env;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

mod script;

use script::Script;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replays an edit script and prints the resulting slot
    Replay {
        script: PathBuf,
        #[arg(long, value_enum, default_value_t = Output::Json)]
        output: Output,
        #[arg(long)]
        pretty: bool,
    },
    /// Checks that an edit script loads and replays
    Check { script: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Output {
    /// Content and formats keyed by formatter name
    Json,
    /// Flat list of ranges with their formatter
    Array,
    /// Format tree over the whole slot
    Tree,
    /// Cut points between uniformly formatted runs
    Grid,
}

fn main() {
    init_logging();
    let cli = Cli::parse();

    match &cli.command {
        Commands::Replay {
            script,
            output,
            pretty,
        } => replay_command(script, *output, *pretty),
        Commands::Check { script } => check_command(script),
    }
}

/// `SLOT_FORMAT_LOG` wins over `RUST_LOG`; the default is `warn`.
fn init_logging() {
    let directives = env::var("SLOT_FORMAT_LOG")
        .or_else(|_| env::var("RUST_LOG"))
        .unwrap_or_else(|_| "warn".to_string());
    let filter = EnvFilter::try_new(directives).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn load_and_replay(path: &Path) -> Slot {
    let result = Script::load(path).and_then(|script| script.replay());
    match result {
        Ok(slot) => slot,
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn replay_command(path: &Path, output: Output, pretty: bool) {
    let slot = load_and_replay(path);
    let value = match output {
        Output::Json => serde_json::to_value(slot.to_json()),
        Output::Array => serde_json::to_value(slot.format().to_array()),
        Output::Tree => serde_json::to_value(slot.to_tree()),
        Output::Grid => serde_json::to_value(slot.format().to_grid()),
    };
    let rendered = value.and_then(|value| {
        if pretty {
            serde_json::to_string_pretty(&value)
        } else {
            serde_json::to_string(&value)
        }
    });
    match rendered {
        Ok(text) => println!("{text}"),
        Err(err) => {
            eprintln!("Error: {err}");
            std::process::exit(1);
        }
    }
}

fn check_command(path: &Path) {
    let slot = load_and_replay(path);
    println!(
        "Script OK: {} units, {} formatters",
        slot.len(),
        slot.format().formatters().count()
    );
}
