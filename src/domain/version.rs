use crate::clock::Clock;
use crate::error::{Result, TimeverError};
use chrono::{NaiveDate, NaiveDateTime};
use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

const PRODUCTION_PREFIX: &str = "Rel";
const DEVELOPMENT_PREFIX: &str = "dev";

/// What a version string was recognised as
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VersionKind {
    /// `Rel20200101`
    ProductionTimestamp(NaiveDate),
    /// `dev202001011230`, or the legacy `sm_2020_01_01_12_30` form
    DevelopmentTimestamp(NaiveDateTime),
    /// `1.2.3`, `v1.2.3`, `1.2.3.pre4`, `1.2.3.dev4`
    Semantic {
        version: semver::Version,
        dev: Option<u64>,
    },
    Unrecognised,
}

/// An application version as it appears in the version file.
///
/// The original text is always preserved, so a descriptor written back to
/// disk is byte-identical to the one that was read or supplied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionString {
    raw: String,
    kind: VersionKind,
}

fn production_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^Rel(\d{8})$").expect("valid regex"))
}

fn development_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^dev(\d{12})$").expect("valid regex"))
}

fn legacy_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[a-z]+_(\d{4})_(\d{2})_(\d{2})_(\d{2})_(\d{2})$").expect("valid regex")
    })
}

fn semantic_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^[vV]?(\d+\.\d+\.\d+)(?:\.(?:dev|pre)(\d+))?$").expect("valid regex")
    })
}

impl VersionString {
    /// Classify a version string. Never fails: anything that matches no
    /// known shape is kept as [`VersionKind::Unrecognised`].
    ///
    /// Surrounding whitespace is ignored for classification only; the text
    /// itself is kept exactly as given.
    pub fn parse(raw: &str) -> Self {
        VersionString {
            raw: raw.to_string(),
            kind: classify(raw.trim()),
        }
    }

    /// Parse and reject anything that is not a recognised version
    pub fn validate(raw: &str) -> Result<Self> {
        let version = Self::parse(raw);
        if version.kind == VersionKind::Unrecognised {
            return Err(TimeverError::version(format!(
                "'{}' - expected Rel<YYYYMMDD>, dev<YYYYMMDDHHMM> or X.Y.Z[.preN]",
                raw
            )));
        }
        Ok(version)
    }

    /// A new production timestamp for the clock's current date
    pub fn production_timestamp(clock: &dyn Clock) -> Self {
        let now = clock.now();
        VersionString {
            raw: format!("{}{}", PRODUCTION_PREFIX, now.format("%Y%m%d")),
            kind: VersionKind::ProductionTimestamp(now.date()),
        }
    }

    /// A new development timestamp for the clock's current minute
    pub fn development_timestamp(clock: &dyn Clock) -> Self {
        let now = clock.now();
        let raw = format!("{}{}", DEVELOPMENT_PREFIX, now.format("%Y%m%d%H%M"));
        let kind = classify(&raw);
        VersionString { raw, kind }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn kind(&self) -> &VersionKind {
        &self.kind
    }

    pub fn is_timestamp(&self) -> bool {
        matches!(
            self.kind,
            VersionKind::ProductionTimestamp(_) | VersionKind::DevelopmentTimestamp(_)
        )
    }

    /// Production timestamps, and semantic releases with no dev suffix once
    /// the major version has reached 1.
    pub fn is_production(&self) -> bool {
        match &self.kind {
            VersionKind::ProductionTimestamp(_) => true,
            VersionKind::Semantic { version, dev } => dev.is_none() && version.major >= 1,
            VersionKind::DevelopmentTimestamp(_) | VersionKind::Unrecognised => false,
        }
    }

    pub fn is_development(&self) -> bool {
        self.kind != VersionKind::Unrecognised && !self.is_production()
    }

    pub fn is_recognised(&self) -> bool {
        self.kind != VersionKind::Unrecognised
    }

    /// The semantic `major.minor.patch` part, if this is a semantic version
    pub fn semver(&self) -> Option<&semver::Version> {
        match &self.kind {
            VersionKind::Semantic { version, .. } => Some(version),
            _ => None,
        }
    }
}

fn classify(raw: &str) -> VersionKind {
    if let Some(caps) = production_re().captures(raw) {
        return NaiveDate::parse_from_str(&caps[1], "%Y%m%d")
            .map(VersionKind::ProductionTimestamp)
            .unwrap_or(VersionKind::Unrecognised);
    }

    if let Some(caps) = development_re().captures(raw) {
        return NaiveDateTime::parse_from_str(&caps[1], "%Y%m%d%H%M")
            .map(VersionKind::DevelopmentTimestamp)
            .unwrap_or(VersionKind::Unrecognised);
    }

    if let Some(caps) = legacy_re().captures(raw) {
        let field = |i: usize| caps[i].parse::<u32>().unwrap_or(u32::MAX);
        return NaiveDate::from_ymd_opt(field(1) as i32, field(2), field(3))
            .and_then(|date| date.and_hms_opt(field(4), field(5), 0))
            .map(VersionKind::DevelopmentTimestamp)
            .unwrap_or(VersionKind::Unrecognised);
    }

    if let Some(caps) = semantic_re().captures(raw) {
        let Ok(version) = semver::Version::parse(&caps[1]) else {
            return VersionKind::Unrecognised;
        };
        let dev = match caps.get(2) {
            Some(m) => match m.as_str().parse::<u64>() {
                Ok(n) => Some(n),
                Err(_) => return VersionKind::Unrecognised,
            },
            None => None,
        };
        return VersionKind::Semantic { version, dev };
    }

    VersionKind::Unrecognised
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionString {
    type Err = TimeverError;

    fn from_str(s: &str) -> Result<Self> {
        Self::validate(s)
    }
}
