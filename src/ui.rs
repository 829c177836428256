//! Formatting of user-facing output.
//!
//! Status lines go to stdout, errors and warnings to stderr. The version
//! report itself is written by the generator, not here.

use console::style;

use crate::domain::VersionString;
use crate::generator::GeneratorOutcome;
use crate::warning::GeneratorWarning;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display a generator warning to the user.
pub fn display_warning(warning: &GeneratorWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Describe a version change as a single line.
///
/// Shows either "from -> to", "unchanged" when both are equal, or just the
/// new version when the application had none.
pub fn format_version_change(previous: Option<&VersionString>, version: &VersionString) -> String {
    match previous {
        Some(old) if old == version => format!("{} (unchanged)", version),
        Some(old) => format!("{} -> {}", old, version),
        None => format!("{} (new)", version),
    }
}

/// Summarise what a generator run did (or would do, for a dry run).
pub fn display_outcome(outcome: &GeneratorOutcome) {
    for warning in &outcome.warnings {
        display_warning(warning);
    }

    let change = format_version_change(outcome.previous.as_ref(), &outcome.version);
    let file = outcome.version_file.display();

    if outcome.written {
        display_success(&format!("Version: {}", change));
        display_success(&format!("Wrote {}", file));
        if outcome.flag_migrated {
            display_success("Disabled semantically_version");
        }
    } else {
        display_status("Dry run:");
        display_status(&format!("  Version: {}", change));
        display_status(&format!("  Would write {}", file));
        if outcome.flag_migrated {
            display_status("  Would disable semantically_version");
        }
    }
}
