use crate::logger::{LOG_FILE_NAME, initialize, initialize_internal};

use std::path::PathBuf;

use log::LevelFilter;
use tempfile::TempDir;

/// **VALUE**: Verifies a failed initialization can be retried, and that calling
/// initialize() again after success doesn't fail.
///
/// **WHY THIS MATTERS**: Write-through failures are only reported through the
/// log. A first attempt against an unusable directory must not leave logging
/// switched off for the rest of the process.
///
/// **BUG THIS CATCHES**: Would catch the "already initialized" guard being set
/// before the attempt, so a retry returns Ok with no logger installed. Also
/// catches the guard being removed, making fern fail on a second global logger.
///
/// Both steps live in one test because the logger is process-global.
#[test]
fn given_failed_initialization_when_retried_then_logger_is_installed_once() {
    // GIVEN: A path below a file, never creatable
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");
    let dir = TempDir::new().unwrap();

    // WHEN
    let failed = initialize(&invalid_dir);
    let retried = initialize(dir.path());
    let repeated = initialize(dir.path());

    // THEN
    assert!(failed.is_err(), "Unusable directory should be reported");
    assert!(retried.is_ok(), "Retry should install the logger: {retried:?}");
    assert!(repeated.is_ok(), "Second initialization should be a no-op");
    assert_ne!(log::max_level(), LevelFilter::Off, "A logger must be active");
    assert!(dir.path().join(LOG_FILE_NAME).exists());
}

/// **VALUE**: Verifies an unusable log directory yields an error instead of a panic.
///
/// **BUG THIS CATCHES**: Would catch `fern::log_file()` being unwrapped.
#[test]
fn given_invalid_log_dir_when_initializing_then_returns_error() {
    // GIVEN: A path below a file, never creatable
    let invalid_dir = PathBuf::from("/dev/null/invalid-path");

    // WHEN: The file dispatch is built (fails before any global logger is set)
    let result = initialize_internal(&invalid_dir);

    // THEN
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Failed to create log file"), "{message}");
}
