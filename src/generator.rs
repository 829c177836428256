//! Converts an application to timestamp versioning
//!
//! The generator runs three steps once, in order, with no retry or rollback:
//!
//! 1. pick the new version ([`VersionFileGenerator::select_version`])
//! 2. rewrite the version file ([`write_version_file`])
//! 3. turn off `semantically_version` in the application config
//!    ([`migrate_semantic_flag`])
//!
//! and then reports the version the application now has.

use crate::app::AppContext;
use crate::app_config::AppConfigFile;
use crate::clock::{Clock, SystemClock};
use crate::config::GeneratorConfig;
use crate::domain::VersionString;
use crate::error::{Result, TimeverError};
use crate::fs_util;
use crate::version_file;
use crate::warning::GeneratorWarning;
use std::io::Write;
use std::path::{Path, PathBuf};

const SEMANTIC_FLAG: &str = "semantically_version";
const REPORT_MESSAGE: &str = "Your new app version is:";
const LEGACY_REPORT_MESSAGE: &str = "You're new app version is:";

/// What a generator run did
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOutcome {
    /// Version before the run, if the application had one
    pub previous: Option<VersionString>,
    pub version: VersionString,
    pub version_file: PathBuf,
    /// False for a dry run
    pub written: bool,
    /// Whether `semantically_version` was (or in a dry run, would be) turned off
    pub flag_migrated: bool,
    pub warnings: Vec<GeneratorWarning>,
}

/// Render the version file for `namespace` and replace whatever is at `path`
pub fn write_version_file(path: &Path, namespace: &str, version: &VersionString) -> Result<()> {
    let contents = version_file::render(namespace, version)?;
    fs_util::replace_file(path, &contents)?;
    tracing::info!(path = %path.display(), %version, "wrote version file");
    Ok(())
}

/// Turn `semantically_version` off, keeping the old setting as a comment.
///
/// Returns whether anything changed. The file is left untouched when the
/// flag is already absent or false.
pub fn migrate_semantic_flag(config: &mut AppConfigFile) -> Result<bool> {
    if !config.semantically_version() {
        tracing::debug!("semantically_version already off");
        return Ok(false);
    }

    config.comment_config(SEMANTIC_FLAG);
    config.add_config(SEMANTIC_FLAG, "false");
    config.save()?;
    tracing::info!(path = %config.path().display(), "disabled semantically_version");
    Ok(true)
}

pub struct VersionFileGenerator<C: Clock = SystemClock> {
    clock: C,
    legacy_report_message: bool,
}

impl VersionFileGenerator<SystemClock> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock::new())
    }
}

impl Default for VersionFileGenerator<SystemClock> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Clock> VersionFileGenerator<C> {
    pub fn with_clock(clock: C) -> Self {
        VersionFileGenerator {
            clock,
            legacy_report_message: false,
        }
    }

    /// Use the historical "You're new app version is:" report wording
    pub fn legacy_report_message(mut self, enabled: bool) -> Self {
        self.legacy_report_message = enabled;
        self
    }

    /// Decide the version the application should have.
    ///
    /// An explicit `change` wins and is returned as given (validated only in
    /// strict mode). Otherwise a timestamp version is kept, and anything else
    /// becomes a fresh production or development timestamp.
    pub fn select_version(
        &self,
        config: &GeneratorConfig,
        current: Option<&VersionString>,
    ) -> Result<VersionString> {
        if let Some(change) = &config.change {
            if config.strict {
                return VersionString::validate(change);
            }
            return Ok(VersionString::parse(change));
        }

        let current = current.ok_or_else(|| {
            TimeverError::precondition(
                "the application has no current version; supply one with --change",
            )
        })?;

        if current.is_timestamp() {
            Ok(current.clone())
        } else if current.is_production() {
            Ok(VersionString::production_timestamp(&self.clock))
        } else {
            Ok(VersionString::development_timestamp(&self.clock))
        }
    }

    /// Re-read the application's version and print it to `out`
    pub fn report_version(&self, app: &mut AppContext, out: &mut dyn Write) -> Result<VersionString> {
        let version = app.version(true)?.ok_or_else(|| {
            TimeverError::precondition(format!(
                "no version found in {}",
                app.version_file().display()
            ))
        })?;
        self.print_report(&version, out)?;
        Ok(version)
    }

    fn print_report(&self, version: &VersionString, out: &mut dyn Write) -> Result<()> {
        let message = if self.legacy_report_message {
            LEGACY_REPORT_MESSAGE
        } else {
            REPORT_MESSAGE
        };
        writeln!(out)?;
        writeln!(out, "{} {}", message, version)?;
        Ok(())
    }

    /// Run every step against `app` and report the result to `out`
    pub fn run(
        &self,
        app: &mut AppContext,
        config: &GeneratorConfig,
        out: &mut dyn Write,
    ) -> Result<GeneratorOutcome> {
        let (previous, version, warnings) = self.plan(app, config)?;

        write_version_file(app.version_file(), app.namespace(), &version)?;

        let flag_migrated = migrate_semantic_flag(app.config_mut())?;

        let version = self.report_version(app, out)?;

        Ok(GeneratorOutcome {
            previous,
            version,
            version_file: app.version_file().to_path_buf(),
            written: true,
            flag_migrated,
            warnings,
        })
    }

    /// Work out what [`run`](Self::run) would do without touching any file
    pub fn preview(
        &self,
        app: &mut AppContext,
        config: &GeneratorConfig,
        out: &mut dyn Write,
    ) -> Result<GeneratorOutcome> {
        let (previous, version, warnings) = self.plan(app, config)?;
        // fail the same way a real run would
        version_file::render(app.namespace(), &version)?;
        self.print_report(&version, out)?;

        Ok(GeneratorOutcome {
            previous,
            version,
            version_file: app.version_file().to_path_buf(),
            written: false,
            flag_migrated: app.config().semantically_version(),
            warnings,
        })
    }

    fn plan(
        &self,
        app: &mut AppContext,
        config: &GeneratorConfig,
    ) -> Result<(Option<VersionString>, VersionString, Vec<GeneratorWarning>)> {
        let mut warnings = Vec::new();

        let previous = if config.change.is_some() {
            // the current version is only informational here
            app.version(false).ok().flatten()
        } else {
            app.version(false)?
        };

        if let Some(current) = &previous {
            if config.change.is_none() && !current.is_recognised() {
                warnings.push(GeneratorWarning::UnrecognisedCurrentVersion {
                    version: current.to_string(),
                });
            }
        }
        if !app.config().exists() {
            warnings.push(GeneratorWarning::ApplicationConfigMissing {
                path: app.config().path().to_path_buf(),
            });
        }
        if app.has_legacy_version_file() {
            warnings.push(GeneratorWarning::LegacyVersionFile {
                path: app.version_file().to_path_buf(),
            });
        }

        let version = self.select_version(config, previous.as_ref())?;
        if !version.is_recognised() {
            warnings.push(GeneratorWarning::UnvalidatedChange {
                value: version.to_string(),
            });
        }
        tracing::debug!(
            previous = ?previous.as_ref().map(VersionString::as_str),
            selected = %version,
            "selected version"
        );

        Ok((previous, version, warnings))
    }
}
