// tests/config_loading.rs

use std::io::Write;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use tempfile::NamedTempFile;

use pagecheck::cli::CliArgs;
use pagecheck::config::{ConfigFile, RawConfigFile, load_and_validate};
use pagecheck::errors::PagecheckError;
use pagecheck::resolve_config;
use pagecheck::types::{HashAlgorithm, NotifierKind};

fn config_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    write!(file, "{contents}").unwrap();
    file
}

#[test]
fn defaults_apply_without_a_config_file() {
    let cfg = ConfigFile::try_from(RawConfigFile::default()).unwrap();

    assert_eq!(cfg.state_file, PathBuf::from("checklist.json"));
    assert_eq!(cfg.algorithm, HashAlgorithm::Sha512);
    assert_eq!(cfg.notify, NotifierKind::None);
    assert_eq!(cfg.engine.workers, 4);
    assert_eq!(cfg.engine.fetch_timeout, Duration::from_secs(30));
    assert!(cfg.mail.is_none());
}

#[test]
fn full_config_file_is_parsed() {
    let file = config_file(
        r#"
[check]
state_file = "pages.json"
workers = 8
timeout = "1500ms"
algorithm = "blake3"

[mail]
server = "smtp.example.com:2525"
user = "me@example.com"
password = "secret"
"#,
    );

    let cfg = load_and_validate(file.path()).unwrap();

    assert_eq!(cfg.state_file, PathBuf::from("pages.json"));
    assert_eq!(cfg.engine.workers, 8);
    assert_eq!(cfg.engine.fetch_timeout, Duration::from_millis(1500));
    assert_eq!(cfg.algorithm, HashAlgorithm::Blake3);
    // A [mail] section turns mail on unless notify says otherwise.
    assert_eq!(cfg.notify, NotifierKind::Mail);

    let mail = cfg.mail.unwrap();
    assert_eq!(mail.subject, "Updated Websites");
    assert_eq!(mail.effective_target(), "me@example.com");
}

#[test]
fn zero_workers_is_rejected() {
    let file = config_file("[check]\nworkers = 0\n");

    match load_and_validate(file.path()) {
        Err(PagecheckError::ConfigError(msg)) => assert!(msg.contains("workers")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn bad_timeout_is_rejected() {
    let file = config_file("[check]\ntimeout = \"soon\"\n");

    match load_and_validate(file.path()) {
        Err(PagecheckError::ConfigError(msg)) => assert!(msg.contains("timeout")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn oversized_timeout_is_rejected() {
    let file = config_file("[check]\ntimeout = \"6000000000000000000h\"\n");

    match load_and_validate(file.path()) {
        Err(PagecheckError::ConfigError(msg)) => assert!(msg.contains("too large")),
        other => panic!("Expected ConfigError, got: {:?}", other),
    }
}

#[test]
fn unknown_algorithm_is_a_toml_error() {
    let file = config_file("[check]\nalgorithm = \"md5\"\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(PagecheckError::TomlError(_))
    ));
}

#[test]
fn mail_notifier_without_mail_section_is_rejected() {
    let file = config_file("[check]\nnotify = \"mail\"\n");

    assert!(matches!(
        load_and_validate(file.path()),
        Err(PagecheckError::ConfigError(_))
    ));
}

#[test]
fn cli_flags_override_the_config_file() {
    let file = config_file("[check]\nworkers = 8\nalgorithm = \"sha256\"\n");
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::parse_from([
        "pagecheck",
        "--config",
        path.as_str(),
        "--workers",
        "1",
        "-f",
        "other.json",
        "--notify",
        "print",
    ]);
    let cfg = resolve_config(&args).unwrap();

    assert_eq!(cfg.engine.workers, 1);
    assert_eq!(cfg.algorithm, HashAlgorithm::Sha256);
    assert_eq!(cfg.state_file, PathBuf::from("other.json"));
    assert_eq!(cfg.notify, NotifierKind::Print);
}

#[test]
fn mail_flag_enables_smtp_with_target_defaulting_to_user() {
    let file = config_file("");
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::parse_from([
        "pagecheck",
        "--config",
        path.as_str(),
        "-m",
        "smtp.example.com:587",
        "-u",
        "me@example.com",
        "-p",
        "secret",
        "-s",
        "Pages moved",
    ]);
    let cfg = resolve_config(&args).unwrap();

    assert_eq!(cfg.notify, NotifierKind::Mail);
    let mail = cfg.mail.unwrap();
    assert_eq!(mail.server, "smtp.example.com:587");
    assert_eq!(mail.subject, "Pages moved");
    assert_eq!(mail.effective_target(), "me@example.com");
}

#[test]
fn mail_credentials_without_server_are_ignored() {
    let file = config_file("");
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::parse_from(["pagecheck", "--config", path.as_str(), "-u", "me@example.com"]);
    let cfg = resolve_config(&args).unwrap();

    assert_eq!(cfg.notify, NotifierKind::None);
    assert!(cfg.mail.is_none());
}

#[test]
fn invalid_algorithm_flag_is_a_config_error() {
    let file = config_file("");
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::parse_from(["pagecheck", "--config", path.as_str(), "--algorithm", "crc32"]);

    assert!(matches!(
        resolve_config(&args),
        Err(PagecheckError::ConfigError(_))
    ));
}

#[test]
fn mail_flag_beats_notify_from_the_file() {
    let file = config_file("[check]\nnotify = \"print\"\n");
    let path = file.path().to_string_lossy().into_owned();

    let args = CliArgs::parse_from([
        "pagecheck",
        "--config",
        path.as_str(),
        "-m",
        "smtp.example.com",
        "-u",
        "me@example.com",
    ]);
    let cfg = resolve_config(&args).unwrap();

    assert_eq!(cfg.notify, NotifierKind::Mail);
    assert_eq!(cfg.mail.unwrap().server, "smtp.example.com");
}
