//! Main workflow orchestration logic
//!
//! Keeps the conversion workflow separate from CLI argument parsing so it
//! can be driven programmatically without depending on clap.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::clock::Clock;
use crate::config::{Config, GeneratorConfig};
use crate::generator::{GeneratorOutcome, VersionFileGenerator};

/// Arguments for the conversion workflow
///
/// Mirrors the CLI Args in a form suitable for orchestration logic.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeverArgs {
    /// Root directory of the application to convert
    pub root: PathBuf,

    /// Version to use verbatim instead of deriving one
    pub change: Option<String>,

    /// Reject an unrecognised `change` before touching any file
    pub strict: bool,

    /// Preview mode - don't write any file
    pub dry_run: bool,
}

impl Default for TimeverArgs {
    fn default() -> Self {
        TimeverArgs {
            root: PathBuf::from("."),
            change: None,
            strict: false,
            dry_run: false,
        }
    }
}

/// Command-line values take precedence over the configuration file
pub fn merge_generator_config(args: &TimeverArgs, config: &Config) -> GeneratorConfig {
    GeneratorConfig {
        change: args
            .change
            .clone()
            .or_else(|| config.generator.change.clone()),
        strict: args.strict || config.generator.strict,
    }
}

/// Convert the application at `args.root` to timestamp versioning.
///
/// 1. Open the application context
/// 2. Select the new version
/// 3. Write the version file and disable semantic versioning (skipped for a dry run)
/// 4. Report the resulting version to `out`
pub fn run_timever_workflow<C: Clock>(
    args: &TimeverArgs,
    config: &Config,
    clock: C,
    out: &mut dyn Write,
) -> Result<GeneratorOutcome> {
    let mut app = AppContext::open(&args.root, config)
        .with_context(|| format!("Failed to open application at {}", args.root.display()))?;

    let generator_config = merge_generator_config(args, config);
    let generator = VersionFileGenerator::with_clock(clock)
        .legacy_report_message(config.behavior.legacy_report_message);

    let outcome = if args.dry_run {
        generator.preview(&mut app, &generator_config, out)?
    } else {
        generator.run(&mut app, &generator_config, out)?
    };

    Ok(outcome)
}
