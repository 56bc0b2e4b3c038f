//! Integration tests for routers built from JSON settings.

use std::fs;

use logging::{LogCategory, LogRouter, LogSink, LoggingSettings, require_categories};

#[test]
fn file_only_settings_write_enabled_categories() {
    let temp = tempfile::tempdir().expect("tempdir");
    let log_path = temp.path().join("merge.log");
    let json = format!(
        r#"{{
            "console": {{ "enable": false }},
            "file": {{ "enable": true, "clear": true, "output_filename": {path:?} }},
            "types": {{ "general": true, "copy": false, "conflict": true }},
            "do_timestamp": false,
            "do_type": true
        }}"#,
        path = log_path.to_str().expect("utf-8 path"),
    );
    let settings = LoggingSettings::from_json_str(&json).expect("parse");
    let mut router = LogRouter::from_settings(&settings).expect("router");

    require_categories(
        &router,
        &[LogCategory::General, LogCategory::Copy, LogCategory::Conflict],
    )
    .expect("all merge categories registered");

    router.log(LogCategory::General, "planning");
    router.log(LogCategory::Copy, "copying a -> b");
    router.log(LogCategory::Conflict, "file and directory share a name");

    let contents = fs::read_to_string(&log_path).expect("read log");
    assert_eq!(
        contents,
        "(general) planning\n(conflict) file and directory share a name\n"
    );
}

#[test]
fn settings_file_is_loaded_from_disk() {
    let temp = tempfile::tempdir().expect("tempdir");
    let settings_path = temp.path().join("logging.json");
    fs::write(
        &settings_path,
        r#"{"do_logging": false, "types": {"general": true, "copy": true, "conflict": true}}"#,
    )
    .expect("write settings");

    let settings = LoggingSettings::load(&settings_path).expect("load");
    assert!(!settings.do_logging);
    assert_eq!(settings.categories().expect("categories").len(), 3);
}

#[test]
fn missing_settings_file_reports_path() {
    let temp = tempfile::tempdir().expect("tempdir");
    let missing = temp.path().join("absent.json");

    let error = LoggingSettings::load(&missing).unwrap_err();
    assert!(error.to_string().contains("absent.json"));
}

#[test]
fn missing_categories_are_listed_in_error_message() {
    let settings =
        LoggingSettings::from_json_str(r#"{"do_logging": false, "types": {"general": true}}"#)
            .expect("parse");
    let router = LogRouter::from_settings(&settings).expect("router");

    let error = require_categories(&router, &[LogCategory::Copy, LogCategory::Conflict])
        .expect_err("copy and conflict are missing");
    assert_eq!(
        error.to_string(),
        "log sink is missing required categories: copy, conflict"
    );
}
