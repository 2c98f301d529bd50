use crate::SupervisorError;

use std::io;

use googletest::assert_that;
use googletest::prelude::{contains_substring, eq};

#[test]
fn given_not_found_spawn_error_when_launch_io_then_message_names_cause() {
    let source = io::Error::from(io::ErrorKind::NotFound);

    let err = SupervisorError::launch_io("netter --version", &source);

    assert_that!(err.summary(), contains_substring("netter --version"));
    assert_that!(err.summary(), contains_substring("executable not found"));
}

#[test]
fn given_permission_denied_when_launch_io_then_insufficient_permissions() {
    let source = io::Error::from(io::ErrorKind::PermissionDenied);

    let err = SupervisorError::launch_io("netter", &source);

    assert_that!(err.summary(), contains_substring("insufficient permissions"));
}

#[test]
fn given_error_when_summary_then_plain_message() {
    let err = SupervisorError::input_missing("/tmp/routes.rd");

    assert_that!(err.to_string(), contains_substring("/tmp/routes.rd"));
    assert_that!(
        err.summary(),
        eq("Input file does not exist: /tmp/routes.rd")
    );
}

#[test]
fn given_crash_by_signal_when_summary_then_mentions_signal() {
    assert_that!(
        SupervisorError::crash(None).summary(),
        contains_substring("signal")
    );
    assert_that!(
        SupervisorError::crash(Some(3)).summary(),
        eq("Server exited unexpectedly with exit code 3")
    );
}

#[test]
fn given_errors_when_recovery_hint_then_not_empty() {
    let errors = [
        SupervisorError::launch("netter", "missing"),
        SupervisorError::timeout("netter", 300),
        SupervisorError::crash(None),
        SupervisorError::probe_unavailable("exit 1"),
        SupervisorError::execution(Some(2), "oops"),
        SupervisorError::input_missing("/a"),
        SupervisorError::from(io::Error::other("boom")),
    ];

    for err in errors {
        assert!(!err.recovery_hint().is_empty(), "{err}");
    }
}
