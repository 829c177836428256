use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use timever::cli::orchestration::{run_timever_workflow, TimeverArgs};
use timever::clock::SystemClock;
use timever::{config, ui};

#[derive(clap::Parser)]
#[command(
    name = "timever",
    about = "Convert an application to timestamp versioning"
)]
struct Args {
    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(short, long, default_value = ".", help = "Application root directory")]
    root: PathBuf,

    #[arg(long, help = "Use this version verbatim instead of deriving one")]
    change: Option<String>,

    #[arg(long, help = "Reject a --change value that is not a recognised version")]
    strict: bool,

    #[arg(long, help = "Preview what would happen without making changes")]
    dry_run: bool,

    #[arg(long, help = "Log each step to stderr")]
    verbose: bool,

    #[arg(short, long, help = "Print version information")]
    version: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .without_time(),
        )
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    if args.version {
        println!("timever {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    init_tracing(args.verbose);

    let config = match config::load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            ui::display_error(&format!("Error loading config: {}", e));
            std::process::exit(1);
        }
    };

    let workflow_args = TimeverArgs {
        root: args.root,
        change: args.change,
        strict: args.strict,
        dry_run: args.dry_run,
    };

    // hold the report back so it is the last thing printed
    let mut report = Vec::new();
    let outcome =
        match run_timever_workflow(&workflow_args, &config, SystemClock::new(), &mut report) {
            Ok(outcome) => outcome,
            Err(e) => {
                ui::display_error(&format!("{:#}", e));
                std::process::exit(1);
            }
        };

    ui::display_outcome(&outcome);

    let mut stdout = io::stdout().lock();
    stdout.write_all(&report)?;
    stdout.flush()?;

    Ok(())
}
