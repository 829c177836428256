// tests/generator_test.rs
use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use timever::app::AppContext;
use timever::app_config::AppConfigFile;
use timever::cli::orchestration::{run_timever_workflow, TimeverArgs};
use timever::clock::FixedClock;
use timever::config::{Config, GeneratorConfig};
use timever::domain::VersionString;
use timever::generator::{migrate_semantic_flag, write_version_file, VersionFileGenerator};
use timever::warning::GeneratorWarning;
use timever::TimeverError;

const APPLICATION: &str = "\
class MyAppApplication < Origen::Application
  config.name = 'My App'
  config.semantically_version = true
end
";

const LEGACY_VERSION: &str = r#"module MyApp
  MAJOR = 0
  MINOR = 1
  BUGFIX = 0
  DEV = nil

  VERSION = [MAJOR, MINOR, BUGFIX].join(".") + (DEV ? ".pre#{DEV}" : '')
end
"#;

fn clock() -> FixedClock {
    FixedClock::new(
        NaiveDate::from_ymd_opt(2021, 11, 5)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap(),
    )
}

/// Create `<tmp>/my_app/config/` with the given version and application files
fn setup_app(version: Option<&str>, application: Option<&str>) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("my_app");
    fs::create_dir_all(root.join("config")).unwrap();
    if let Some(contents) = version {
        fs::write(root.join("config/version.rb"), contents).unwrap();
    }
    if let Some(contents) = application {
        fs::write(root.join("config/application.rb"), contents).unwrap();
    }
    (dir, root)
}

fn version_file_of(root: &Path) -> String {
    fs::read_to_string(root.join("config/version.rb")).unwrap()
}

fn run(root: &Path, change: Option<&str>) -> (timever::generator::GeneratorOutcome, String) {
    let args = TimeverArgs {
        root: root.to_path_buf(),
        change: change.map(str::to_string),
        ..Default::default()
    };
    let mut out = Vec::new();
    let outcome = run_timever_workflow(&args, &Config::default(), clock(), &mut out).unwrap();
    (outcome, String::from_utf8(out).unwrap())
}

#[test]
fn test_end_to_end_development_version() {
    let (_dir, root) = setup_app(Some(LEGACY_VERSION), Some(APPLICATION));

    let (outcome, report) = run(&root, None);

    assert_eq!(outcome.version.as_str(), "dev202111051430");
    assert_eq!(outcome.previous.as_ref().map(|v| v.as_str()), Some("0.1.0"));
    assert!(outcome.written);
    assert!(outcome.flag_migrated);
    assert_eq!(
        version_file_of(&root),
        "module MyApp\n  VERSION = 'dev202111051430'\nend\n"
    );
    assert_eq!(report, "\nYour new app version is: dev202111051430\n");
    assert!(outcome.warnings.contains(&GeneratorWarning::LegacyVersionFile {
        path: outcome.version_file.clone()
    }));
}

#[test]
fn test_end_to_end_production_version() {
    let (_dir, root) = setup_app(Some("module MyApp\n  VERSION = 'v1.4.0'\nend\n"), None);

    let (outcome, report) = run(&root, None);

    assert_eq!(outcome.version.as_str(), "Rel20211105");
    assert!(!outcome.flag_migrated);
    assert!(version_file_of(&root).contains("VERSION = 'Rel20211105'"));
    assert!(report.ends_with("Rel20211105\n"));
}

#[test]
fn test_timestamp_version_is_rewritten_unchanged() {
    let (_dir, root) = setup_app(Some("module MyApp\nVERSION = \"Rel20140101\"\nend"), None);

    let (outcome, _) = run(&root, None);

    assert_eq!(outcome.version.as_str(), "Rel20140101");
    assert_eq!(outcome.previous, Some(outcome.version.clone()));
    // brought up to date with the current layout
    assert_eq!(
        version_file_of(&root),
        "module MyApp\n  VERSION = 'Rel20140101'\nend\n"
    );
}

#[test]
fn test_change_override_without_version_file() {
    let (_dir, root) = setup_app(None, Some(APPLICATION));

    let (outcome, report) = run(&root, Some("sm_2020_01_01_00_00"));

    assert_eq!(outcome.previous, None);
    assert_eq!(outcome.version.as_str(), "sm_2020_01_01_00_00");
    assert!(version_file_of(&root).contains("VERSION = 'sm_2020_01_01_00_00'"));
    assert!(report.contains("sm_2020_01_01_00_00"));
}

#[test]
fn test_unrecognised_change_is_written_with_warning() {
    let (_dir, root) = setup_app(None, None);

    let (outcome, _) = run(&root, Some("nightly"));

    assert!(version_file_of(&root).contains("VERSION = 'nightly'"));
    assert!(outcome
        .warnings
        .contains(&GeneratorWarning::UnvalidatedChange {
            value: "nightly".to_string()
        }));
}

#[test]
fn test_strict_change_fails_before_writing() {
    let (_dir, root) = setup_app(Some("module MyApp\n  VERSION = '1.0.0'\nend\n"), Some(APPLICATION));
    let args = TimeverArgs {
        root: root.clone(),
        change: Some("nightly".to_string()),
        strict: true,
        dry_run: false,
    };

    let err = run_timever_workflow(&args, &Config::default(), clock(), &mut Vec::new()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TimeverError>(),
        Some(TimeverError::InvalidVersionFormat(_))
    ));
    assert_eq!(version_file_of(&root), "module MyApp\n  VERSION = '1.0.0'\nend\n");
    assert_eq!(
        fs::read_to_string(root.join("config/application.rb")).unwrap(),
        APPLICATION
    );
}

#[test]
fn test_missing_version_without_change_is_precondition_error() {
    let (_dir, root) = setup_app(None, Some(APPLICATION));
    let args = TimeverArgs {
        root: root.clone(),
        ..Default::default()
    };

    let err = run_timever_workflow(&args, &Config::default(), clock(), &mut Vec::new()).unwrap_err();

    assert!(matches!(
        err.downcast_ref::<TimeverError>(),
        Some(TimeverError::Precondition(_))
    ));
    assert!(!root.join("config/version.rb").exists());
}

#[test]
fn test_dry_run_touches_nothing() {
    let (_dir, root) = setup_app(Some(LEGACY_VERSION), Some(APPLICATION));
    let args = TimeverArgs {
        root: root.clone(),
        dry_run: true,
        ..Default::default()
    };
    let mut out = Vec::new();

    let outcome = run_timever_workflow(&args, &Config::default(), clock(), &mut out).unwrap();

    assert!(!outcome.written);
    assert!(outcome.flag_migrated);
    assert_eq!(outcome.version.as_str(), "dev202111051430");
    assert_eq!(version_file_of(&root), LEGACY_VERSION);
    assert_eq!(
        fs::read_to_string(root.join("config/application.rb")).unwrap(),
        APPLICATION
    );
    assert!(String::from_utf8(out).unwrap().contains("dev202111051430"));
}

#[test]
fn test_dry_run_reports_missing_application_config() {
    let (_dir, root) = setup_app(Some("module MyApp\n  VERSION = '1.0.0'\n\nend\n"), None);
    let args = TimeverArgs {
        root: root.clone(),
        dry_run: true,
        ..Default::default()
    };

    let preview = run_timever_workflow(&args, &Config::default(), clock(), &mut Vec::new()).unwrap();
    let (real, _) = run(&root, None);

    let missing = GeneratorWarning::ApplicationConfigMissing {
        path: root.canonicalize().unwrap().join("config/application.rb"),
    };
    assert!(preview.warnings.contains(&missing));
    assert!(real.warnings.contains(&missing));
    assert!(!preview.flag_migrated);
}

#[test]
fn test_change_with_whitespace_is_written_as_given() {
    let (_dir, root) = setup_app(None, None);

    let (outcome, _) = run(&root, Some(" Rel20200101 "));

    assert_eq!(outcome.version.as_str(), " Rel20200101 ");
    assert!(version_file_of(&root).contains("VERSION = ' Rel20200101 '"));
}

#[test]
fn test_write_version_file_overwrites() {
    let (_dir, root) = setup_app(None, None);
    let path = root.join("config/version.rb");

    write_version_file(&path, "MyApp", &VersionString::parse("Rel20200101")).unwrap();
    write_version_file(&path, "MyApp", &VersionString::parse("dev202001011200")).unwrap();

    let contents = version_file_of(&root);
    assert_eq!(contents, "module MyApp\n  VERSION = 'dev202001011200'\nend\n");
    assert!(!contents.contains("Rel20200101"));
}

#[test]
fn test_write_version_file_missing_directory() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config/version.rb");

    let err = write_version_file(&path, "MyApp", &VersionString::parse("Rel20200101")).unwrap_err();

    assert!(matches!(err, TimeverError::Io(_)));
}

#[test]
fn test_migrate_semantic_flag() {
    let (_dir, root) = setup_app(None, Some(APPLICATION));
    let path = root.join("config/application.rb");

    let mut config = AppConfigFile::load(&path).unwrap();
    assert!(migrate_semantic_flag(&mut config).unwrap());

    let contents = fs::read_to_string(&path).unwrap();
    assert!(contents.contains("# config.semantically_version = true"));
    assert!(contents.contains("\n  config.semantically_version = false\n"));
    assert!(!AppConfigFile::load(&path).unwrap().semantically_version());

    // already migrated: second pass changes nothing
    let mut config = AppConfigFile::load(&path).unwrap();
    assert!(!migrate_semantic_flag(&mut config).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn test_migrate_semantic_flag_when_disabled() {
    let original = "class App < Origen::Application\n  config.semantically_version = false\nend\n";
    let (_dir, root) = setup_app(None, Some(original));
    let path = root.join("config/application.rb");

    let mut config = AppConfigFile::load(&path).unwrap();
    assert!(!migrate_semantic_flag(&mut config).unwrap());
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
}

#[test]
fn test_report_version_refreshes_cache() {
    let (_dir, root) = setup_app(Some("module MyApp\n  VERSION = '1.0.0'\nend\n"), None);
    let mut app = AppContext::open(&root, &Config::default()).unwrap();
    assert_eq!(app.version(false).unwrap().unwrap().as_str(), "1.0.0");

    fs::write(
        root.join("config/version.rb"),
        "module MyApp\n  VERSION = 'Rel20210101'\nend\n",
    )
    .unwrap();

    let generator = VersionFileGenerator::with_clock(clock()).legacy_report_message(true);
    let mut out = Vec::new();
    let version = generator.report_version(&mut app, &mut out).unwrap();

    assert_eq!(version.as_str(), "Rel20210101");
    assert_eq!(
        String::from_utf8(out).unwrap(),
        "\nYou're new app version is: Rel20210101\n"
    );
}

#[test]
fn test_select_version_with_change_ignores_current() {
    let generator = VersionFileGenerator::with_clock(clock());
    let config = GeneratorConfig::with_change("sm_2020_01_01_00_00");

    for current in ["1.0.0", "0.1.0", "Rel20200101", "dev202001010000"] {
        let current = VersionString::parse(current);
        let selected = generator.select_version(&config, Some(&current)).unwrap();
        assert_eq!(selected.as_str(), "sm_2020_01_01_00_00");
    }
}
