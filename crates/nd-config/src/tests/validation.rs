use crate::SupervisorConfig;

use googletest::assert_that;
use googletest::prelude::{anything, err, ok};

#[test]
fn given_defaults_when_validate_then_ok() {
    let config = SupervisorConfig::default();

    assert_that!(config.validate(), ok(anything()));
}

#[test]
fn given_empty_executable_when_validate_then_error() {
    let mut config = SupervisorConfig::default();
    config.tool.executable = "   ".into();

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_zero_start_timeout_when_validate_then_error() {
    let mut config = SupervisorConfig::default();
    config.timeouts.start_timeout_ms = 0;

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_zero_stop_timeout_when_validate_then_error() {
    let mut config = SupervisorConfig::default();
    config.timeouts.stop_timeout_ms = 0;

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_zero_restart_delay_when_validate_then_ok() {
    let mut config = SupervisorConfig::default();
    config.timeouts.restart_delay_ms = 0;

    assert_that!(config.validate(), ok(anything()));
}

#[test]
fn given_probe_start_longer_than_exec_when_validate_then_error() {
    let mut config = SupervisorConfig::default();
    config.timeouts.probe_start_timeout_ms = 6_000;
    config.timeouts.probe_exec_timeout_ms = 5_000;

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_tiny_line_buffer_when_validate_then_error() {
    let mut config = SupervisorConfig::default();
    config.timeouts.max_line_bytes = 16;

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_future_version_when_validate_then_error() {
    let mut config = SupervisorConfig::default();
    config.version = crate::CONFIG_VERSION + 1;

    assert_that!(config.validate(), err(anything()));
}

#[test]
fn given_missing_search_dir_when_validate_then_error() {
    let mut config = SupervisorConfig::default();
    config.tool.search_dir = Some("/definitely/not/a/real/dir".into());

    assert_that!(config.validate(), err(anything()));
}
