use crate::ToolSettings;

use std::path::PathBuf;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};
use tempfile::TempDir;

#[test]
fn given_bare_name_without_search_dir_when_program_then_name_returned() {
    let tool = ToolSettings::default();

    assert_that!(tool.program(), eq(&PathBuf::from("netter")));
}

#[test]
fn given_executable_in_search_dir_when_program_then_full_path_returned() {
    // Given
    let temp = TempDir::new().unwrap();
    let exe = temp.path().join("netter");
    std::fs::write(&exe, "").unwrap();
    let tool = ToolSettings {
        search_dir: Some(temp.path().to_path_buf()),
        ..ToolSettings::default()
    };

    // When
    let program = tool.program();

    // Then
    assert_that!(program, eq(&exe));
}

#[test]
fn given_executable_missing_from_search_dir_when_program_then_name_returned() {
    let temp = TempDir::new().unwrap();
    let tool = ToolSettings {
        search_dir: Some(temp.path().to_path_buf()),
        ..ToolSettings::default()
    };

    assert_that!(tool.program(), eq(&PathBuf::from("netter")));
}

#[test]
fn given_explicit_path_when_program_then_unchanged() {
    let tool = ToolSettings {
        executable: "/opt/netter/bin/netter".into(),
        ..ToolSettings::default()
    };

    assert_that!(tool.program(), eq(&PathBuf::from("/opt/netter/bin/netter")));
}

#[test]
fn given_no_search_dir_when_child_path_then_none() {
    let tool = ToolSettings::default();

    assert_that!(tool.child_path(), none());
}

#[test]
fn given_search_dir_when_child_path_then_dir_comes_first() {
    // Given
    let temp = TempDir::new().unwrap();
    let tool = ToolSettings {
        search_dir: Some(temp.path().to_path_buf()),
        ..ToolSettings::default()
    };

    // When
    let path = tool.child_path();

    // Then
    assert_that!(path, some(googletest::prelude::anything()));
    let first = std::env::split_paths(&path.unwrap()).next().unwrap();
    assert_that!(first, eq(&temp.path().to_path_buf()));
}
