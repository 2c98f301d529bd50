use crate::handlers::exit_code;

use std::process::ExitCode;

#[test]
fn given_tool_exit_codes_when_mapped_then_mirrored() {
    assert_eq!(exit_code(Some(0)), ExitCode::SUCCESS);
    assert_eq!(exit_code(Some(3)), ExitCode::from(3));
    assert_eq!(exit_code(Some(255)), ExitCode::from(255));
}

#[test]
fn given_signal_or_out_of_range_when_mapped_then_failure() {
    assert_eq!(exit_code(None), ExitCode::FAILURE);
    assert_eq!(exit_code(Some(-1)), ExitCode::FAILURE);
    assert_eq!(exit_code(Some(300)), ExitCode::FAILURE);
}

#[cfg(unix)]
mod with_fake_tool {
    use crate::handlers;

    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use std::process::ExitCode;

    use googletest::assert_that;
    use googletest::prelude::{contains_substring, eq};
    use nd_config::SupervisorConfig;
    use nd_supervisor::Supervisor;
    use serial_test::serial;
    use tempfile::TempDir;

    fn supervisor_with(script: &str) -> (TempDir, Supervisor) {
        let dir = TempDir::new().unwrap();
        let tool = dir.path().join("netter");
        fs::write(&tool, format!("#!/bin/sh\n{script}\n")).unwrap();
        fs::set_permissions(&tool, fs::Permissions::from_mode(0o755)).unwrap();

        let mut config = SupervisorConfig::default();
        config.tool.executable = tool.to_string_lossy().into_owned();
        (dir, Supervisor::new(config))
    }

    #[tokio::test]
    #[serial]
    async fn given_available_tool_when_check_then_success_with_version() {
        let (_dir, supervisor) = supervisor_with("echo 'netter 0.4.1'");
        let mut out = Vec::new();

        let code = handlers::check(&supervisor, &mut out).await.unwrap();

        assert_eq!(code, ExitCode::SUCCESS);
        assert_that!(
            String::from_utf8(out).unwrap(),
            contains_substring("is available: netter 0.4.1")
        );
    }

    #[tokio::test]
    #[serial]
    async fn given_failing_tool_when_run_then_exit_code_and_streams_mirrored() {
        let (_dir, supervisor) = supervisor_with("echo out\necho err >&2\nexit 7");
        let mut out = Vec::new();
        let mut err = Vec::new();

        let code = handlers::run(&supervisor, &["x".into()], &mut out, &mut err)
            .await
            .unwrap();

        assert_eq!(code, ExitCode::from(7));
        assert_that!(String::from_utf8(out).unwrap(), eq("out\n"));
        assert_that!(String::from_utf8(err).unwrap(), eq("err\n"));
    }
}
