use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while converting an application.
/// These should be reported to the user but never stop the generator.
#[derive(Debug, Clone, PartialEq)]
pub enum GeneratorWarning {
    /// The `change` override matches no known version shape and is written as given
    UnvalidatedChange { value: String },
    /// The current version matches no known shape and is treated as development
    UnrecognisedCurrentVersion { version: String },
    /// The version file used the MAJOR/MINOR/BUGFIX layout and was rewritten
    LegacyVersionFile { path: PathBuf },
    /// There is no application config file, so the semantic flag was not checked
    ApplicationConfigMissing { path: PathBuf },
}

impl fmt::Display for GeneratorWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeneratorWarning::UnvalidatedChange { value } => {
                write!(
                    f,
                    "Version '{}' is not a recognised format; writing it as given",
                    value
                )
            }
            GeneratorWarning::UnrecognisedCurrentVersion { version } => {
                write!(
                    f,
                    "Current version '{}' is not recognised; treating it as a development version",
                    version
                )
            }
            GeneratorWarning::LegacyVersionFile { path } => {
                write!(f, "Upgrading legacy version file {}", path.display())
            }
            GeneratorWarning::ApplicationConfigMissing { path } => {
                write!(
                    f,
                    "No application config at {}; semantically_version left untouched",
                    path.display()
                )
            }
        }
    }
}
