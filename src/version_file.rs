//! Rendering and parsing of the application's `config/version.rb`
//!
//! Two layouts are understood when reading:
//!
//! ```ruby
//! module MyApp
//!   VERSION = 'Rel20200101'
//! end
//! ```
//!
//! and the legacy semantic layout built from `MAJOR`, `MINOR`, `BUGFIX` and
//! `DEV` constants. Only the first layout is ever written.

use crate::domain::VersionString;
use crate::error::{Result, TimeverError};
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::OnceLock;

/// Contents recovered from an existing version file
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedVersionFile {
    /// Name of the enclosing `module`, if one was found
    pub namespace: Option<String>,
    pub version: VersionString,
    /// True when the version came from the MAJOR/MINOR/BUGFIX constants
    pub legacy: bool,
}

fn namespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?m)^\s*module\s+([A-Z][A-Za-z0-9_:]*)").expect("valid regex"))
}

fn assignment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"(?m)^\s*VERSION\s*=\s*(?:'([^']*)'|"([^"]*)")"#).expect("valid regex")
    })
}

fn constant_re(name: &str) -> Regex {
    Regex::new(&format!(r"(?m)^\s*{}\s*=\s*(nil|\d+)\b", name)).expect("valid regex")
}

fn valid_namespace(namespace: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[A-Z][A-Za-z0-9_]*(::[A-Z][A-Za-z0-9_]*)*$").expect("valid regex")
    })
    .is_match(namespace)
}

/// Render the version file for `namespace` pinned at `version`
pub fn render(namespace: &str, version: &VersionString) -> Result<String> {
    if !valid_namespace(namespace) {
        return Err(TimeverError::template(format!(
            "'{}' is not a valid module name",
            namespace
        )));
    }

    let value = version.as_str();
    if value.is_empty() || value.contains(['\'', '\\', '\n', '\r']) {
        return Err(TimeverError::template(format!(
            "version {:?} cannot be embedded in a quoted assignment",
            value
        )));
    }

    Ok(format!(
        "module {}\n  VERSION = '{}'\nend\n",
        namespace, value
    ))
}

/// Extract the namespace and version from version file contents
pub fn parse(contents: &str) -> Result<ParsedVersionFile> {
    let namespace = namespace_re()
        .captures(contents)
        .map(|caps| caps[1].to_string());

    if let Some(caps) = assignment_re().captures(contents) {
        let value = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
        return Ok(ParsedVersionFile {
            namespace,
            version: VersionString::parse(value),
            legacy: false,
        });
    }

    let constant = |name: &str| {
        constant_re(name)
            .captures(contents)
            .map(|caps| caps[1].to_string())
    };

    match (constant("MAJOR"), constant("MINOR"), constant("BUGFIX")) {
        (Some(major), Some(minor), Some(bugfix)) => {
            let mut raw = format!("{}.{}.{}", major, minor, bugfix);
            if let Some(dev) = constant("DEV").filter(|dev| dev != "nil") {
                raw.push_str(&format!(".pre{}", dev));
            }
            Ok(ParsedVersionFile {
                namespace,
                version: VersionString::parse(&raw),
                legacy: true,
            })
        }
        _ => Err(TimeverError::version(
            "version file has neither a VERSION assignment nor MAJOR/MINOR/BUGFIX constants",
        )),
    }
}

/// Read and parse a version file; `Ok(None)` when it does not exist
pub fn read(path: &Path) -> Result<Option<ParsedVersionFile>> {
    match fs::read_to_string(path) {
        Ok(contents) => parse(&contents).map(Some),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}
