//! Line-level editing of the application's `config/application.rb`
//!
//! Settings live in the file as `config.<key> = <value>` lines. Edits keep
//! every other line intact, including its indentation and comments.

use crate::error::{Result, TimeverError};
use crate::fs_util;
use regex::Regex;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// The application configuration file, held in memory until [`save`](Self::save)
#[derive(Debug, Clone)]
pub struct AppConfigFile {
    path: PathBuf,
    lines: Vec<String>,
    /// `\r\n` when the file was read with CRLF endings
    line_ending: &'static str,
    exists: bool,
    dirty: bool,
}

/// An active (uncommented) `config.<key> = <value>` line
#[derive(Debug, Clone, PartialEq)]
struct Setting<'a> {
    indent: &'a str,
    key: &'a str,
    value: &'a str,
}

fn setting_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\s*)config\.([A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*?)\s*$").expect("valid regex")
    })
}

fn class_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\s*)class\s+\S+\s*<").expect("valid regex"))
}

fn parse_setting(line: &str) -> Option<Setting<'_>> {
    let caps = setting_re().captures(line)?;
    Some(Setting {
        indent: caps.get(1)?.as_str(),
        key: caps.get(2)?.as_str(),
        value: caps.get(3)?.as_str(),
    })
}

/// Ruby truthiness of a literal: only `false` and `nil` are false
fn is_truthy(value: &str) -> bool {
    let value = value.split('#').next().unwrap_or("").trim();
    !matches!(value, "false" | "nil" | "")
}

impl AppConfigFile {
    /// Load the file at `path`. A missing file loads as empty.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (contents, exists) = match fs::read_to_string(&path) {
            Ok(contents) => (contents, true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => (String::new(), false),
            Err(e) => return Err(e.into()),
        };

        let line_ending = if contents.contains("\r\n") { "\r\n" } else { "\n" };

        Ok(AppConfigFile {
            path,
            lines: contents.lines().map(str::to_string).collect(),
            line_ending,
            exists,
            dirty: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Raw value of the last active assignment to `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.lines
            .iter()
            .filter_map(|line| parse_setting(line))
            .filter(|setting| setting.key == key)
            .last()
            .map(|setting| setting.value)
    }

    /// Whether `key` is set to anything other than `false` or `nil`
    pub fn enabled(&self, key: &str) -> bool {
        self.get(key).is_some_and(is_truthy)
    }

    pub fn semantically_version(&self) -> bool {
        self.enabled("semantically_version")
    }

    /// Comment out every active assignment to `key`, returning how many
    /// lines were changed.
    pub fn comment_config(&mut self, key: &str) -> usize {
        let mut count = 0;
        for line in self.lines.iter_mut() {
            let commented = match parse_setting(line) {
                Some(setting) if setting.key == key => {
                    format!("{}# {}", setting.indent, line[setting.indent.len()..].trim_end())
                }
                _ => continue,
            };
            *line = commented;
            count += 1;
        }
        if count > 0 {
            self.dirty = true;
        }
        count
    }

    /// Add `config.<key> = <value>`.
    ///
    /// The line goes directly after the last line mentioning the key (active
    /// or commented out), else at the top of the application class body,
    /// else at the end of the file.
    pub fn add_config(&mut self, key: &str, value: &str) {
        let needle = format!("config.{}", key);
        let mention = self
            .lines
            .iter()
            .rposition(|line| mentions_setting(line, &needle));

        let (index, indent) = if let Some(i) = mention {
            (i + 1, leading_whitespace(&self.lines[i]).to_string())
        } else if let Some(i) = self.lines.iter().position(|line| class_re().is_match(line)) {
            (i + 1, format!("{}  ", leading_whitespace(&self.lines[i])))
        } else {
            (self.lines.len(), String::new())
        };

        self.lines
            .insert(index, format!("{}config.{} = {}", indent, key, value));
        self.dirty = true;
    }

    /// Write pending edits back to disk. Does nothing when unchanged.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if !self.exists {
            return Err(TimeverError::config(format!(
                "application config {} does not exist",
                self.path.display()
            )));
        }

        fs_util::replace_file(&self.path, &self.contents())?;
        self.dirty = false;
        Ok(())
    }

    /// Current contents as they would be saved
    pub fn contents(&self) -> String {
        let mut contents = self.lines.join(self.line_ending);
        if !contents.is_empty() {
            contents.push_str(self.line_ending);
        }
        contents
    }
}

fn leading_whitespace(line: &str) -> &str {
    &line[..line.len() - line.trim_start().len()]
}

fn mentions_setting(line: &str, needle: &str) -> bool {
    let body = line.trim_start().trim_start_matches('#').trim_start();
    body.strip_prefix(needle)
        .is_some_and(|rest| rest.trim_start().starts_with('='))
}
