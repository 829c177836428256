//! Application context passed explicitly through the generator

use crate::app_config::AppConfigFile;
use crate::config::Config;
use crate::domain::VersionString;
use crate::error::{Result, TimeverError};
use crate::version_file;
use std::path::{Path, PathBuf};

/// Everything the generator needs to know about the application it is
/// converting: where it lives, what its version file wraps the version in,
/// and its mutable configuration file.
#[derive(Debug)]
pub struct AppContext {
    namespace: String,
    version_file: PathBuf,
    config: AppConfigFile,
    legacy_version_file: bool,
    cached_version: Option<Option<VersionString>>,
}

impl AppContext {
    /// Open the application rooted at `root`
    pub fn open(root: impl AsRef<Path>, settings: &Config) -> Result<Self> {
        let root = root.as_ref().canonicalize().map_err(|e| {
            TimeverError::precondition(format!(
                "application root {} is not accessible: {}",
                root.as_ref().display(),
                e
            ))
        })?;
        if !root.is_dir() {
            return Err(TimeverError::precondition(format!(
                "application root {} is not a directory",
                root.display()
            )));
        }

        let version_file = root.join(&settings.paths.version_file);
        let config = AppConfigFile::load(root.join(&settings.paths.application_file))?;

        let existing = match version_file::read(&version_file) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(path = %version_file.display(), error = %e, "could not parse version file");
                None
            }
        };

        let namespace = match settings
            .app
            .namespace
            .clone()
            .or_else(|| existing.as_ref().and_then(|parsed| parsed.namespace.clone()))
        {
            Some(namespace) => namespace,
            None => namespace_from_root(&root)?,
        };
        tracing::debug!(root = %root.display(), %namespace, "opened application");

        Ok(AppContext {
            namespace,
            version_file,
            config,
            legacy_version_file: existing.as_ref().is_some_and(|parsed| parsed.legacy),
            cached_version: existing.map(|parsed| Some(parsed.version)),
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn version_file(&self) -> &Path {
        &self.version_file
    }

    /// Whether the version file still uses the MAJOR/MINOR/BUGFIX layout
    pub fn has_legacy_version_file(&self) -> bool {
        self.legacy_version_file
    }

    pub fn config(&self) -> &AppConfigFile {
        &self.config
    }

    pub fn config_mut(&mut self) -> &mut AppConfigFile {
        &mut self.config
    }

    /// The application's current version.
    ///
    /// The value is cached after the first read; `refresh` re-reads the
    /// version file. `Ok(None)` means there is no version file yet.
    pub fn version(&mut self, refresh: bool) -> Result<Option<VersionString>> {
        if refresh {
            self.cached_version = None;
        }
        if let Some(version) = &self.cached_version {
            return Ok(version.clone());
        }

        let version = version_file::read(&self.version_file)?.map(|parsed| parsed.version);
        self.cached_version = Some(version.clone());
        Ok(version)
    }
}

/// `my_app` / `my-app` -> `MyApp`
fn camelize(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect()
}

fn namespace_from_root(root: &Path) -> Result<String> {
    let name = root
        .file_name()
        .map(|name| camelize(&name.to_string_lossy()))
        .unwrap_or_default();

    match name.chars().next() {
        Some(first) if first.is_ascii_alphabetic() => Ok(name),
        Some(_) => Ok(format!("App{}", name)),
        None => Err(TimeverError::precondition(format!(
            "cannot derive a module name from {}; set app.namespace",
            root.display()
        ))),
    }
}
