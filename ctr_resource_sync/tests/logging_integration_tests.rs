//! Integration tests for the logging system
//!
//! Checks what the lifecycle reports through a custom logger.
//!
//! Run with: cargo test --test logging_integration_tests


use ctr_resource_sync::ctr::Runtime;
use ctr_resource_sync::ctr::compositor::EditMode;
use ctr_resource_sync::ctr::lifecycle::ImportRequest;
use ctr_resource_sync::ctr::log::{LogEntry, LogSeverity, Logger};
use recording_test_utils::{fresh_runtime, open_textures, solid};
use serial_test::serial;
use std::sync::{Arc, Mutex};

// ============================================================================
// TEST LOGGER IMPLEMENTATION
// ============================================================================

/// Test logger that captures log entries for verification
struct TestLogger {
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl TestLogger {
    fn new() -> (Self, Arc<Mutex<Vec<LogEntry>>>) {
        let entries = Arc::new(Mutex::new(Vec::new()));
        (Self { entries: entries.clone() }, entries)
    }
}

impl Logger for TestLogger {
    fn log(&self, entry: &LogEntry) {
        self.entries.lock().unwrap().push(entry.clone());
    }
}

// ============================================================================
// LOGGING TESTS
// ============================================================================

#[test]
#[serial]
fn test_integration_custom_logger() {
    let (logger, entries) = TestLogger::new();
    Runtime::set_logger(logger);

    Runtime::log(LogSeverity::Info, "test::module", "Test info message".to_string());
    Runtime::log(LogSeverity::Warn, "test::module", "Test warning message".to_string());

    let captured = entries.lock().unwrap().clone();
    Runtime::reset_logger();

    assert_eq!(captured.len(), 2);
    assert_eq!(captured[0].severity, LogSeverity::Info);
    assert_eq!(captured[0].source, "test::module");
    assert_eq!(captured[0].message, "Test info message");
    assert_eq!(captured[1].severity, LogSeverity::Warn);
    assert!(captured[1].file.is_none());
}

#[test]
#[serial]
fn test_integration_successful_edits_log_info() {
    fresh_runtime();
    let (mut textures, _renderer, _thumbs) = open_textures();

    let (logger, entries) = TestLogger::new();
    Runtime::set_logger(logger);
    textures.import(ImportRequest::new("rock", solid(8, 8, [0; 4]))).unwrap();
    textures.rename("rock", "stone").unwrap();
    let captured = entries.lock().unwrap().clone();
    Runtime::reset_logger();

    let infos: Vec<&str> = captured
        .iter()
        .filter(|e| e.severity == LogSeverity::Info && e.source == "ctr::TextureFolder")
        .map(|e| e.message.as_str())
        .collect();
    assert_eq!(infos, vec!["Imported 'rock'", "Renamed 'rock' -> 'stone'"]);
    assert!(captured.iter().all(|e| e.severity != LogSeverity::Error));
}

#[test]
#[serial]
fn test_integration_failed_edit_logs_error_with_location() {
    fresh_runtime();
    let (mut textures, _renderer, _thumbs) = open_textures();
    textures.import(ImportRequest::new("rock", solid(8, 8, [0; 4]))).unwrap();

    let (logger, entries) = TestLogger::new();
    Runtime::set_logger(logger);
    let result = textures.replace(ImportRequest::new("rock", solid(16, 16, [0; 4])).with_mode(EditMode::ColorOnly));
    let captured = entries.lock().unwrap().clone();
    Runtime::reset_logger();

    assert!(result.is_err());
    let errors: Vec<&LogEntry> = captured.iter().filter(|e| e.severity == LogSeverity::Error).collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].source, "ctr::TextureFolder");
    assert!(errors[0].file.is_some());
    assert!(errors[0].line.is_some());
}
