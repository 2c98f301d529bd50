use crate::cli::Cli;
use crate::commands::Commands;

use std::ffi::OsString;
use std::path::PathBuf;

use clap::Parser;
use googletest::assert_that;
use googletest::prelude::{eq, is_false, is_true, none, some};

#[test]
fn given_start_with_json_when_parsed_then_path_and_flag_set() {
    let cli = Cli::try_parse_from(["nd", "start", "routes.rd", "--json"]).unwrap();

    let Commands::Start { path, json } = cli.command else {
        panic!("expected start");
    };
    assert_eq!(path, PathBuf::from("routes.rd"));
    assert_that!(json, is_true());
    assert_that!(cli.config_dir, none());
}

#[test]
fn given_global_config_dir_after_subcommand_when_parsed_then_applied() {
    let cli = Cli::try_parse_from(["nd", "check", "--config-dir", "/tmp/nd"]).unwrap();

    assert!(matches!(cli.command, Commands::Check));
    assert_that!(cli.config_dir, some(eq(&PathBuf::from("/tmp/nd"))));
}

#[test]
fn given_run_with_hyphen_args_when_parsed_then_passed_through() {
    let cli = Cli::try_parse_from(["nd", "run", "--", "parse", "--path", "a.rd"]).unwrap();

    let Commands::Run { args } = cli.command else {
        panic!("expected run");
    };
    assert_eq!(
        args,
        vec![
            OsString::from("parse"),
            OsString::from("--path"),
            OsString::from("a.rd")
        ]
    );
}

#[test]
fn given_run_without_args_when_parsed_then_error() {
    let result = Cli::try_parse_from(["nd", "run"]);

    assert_that!(result.is_ok(), is_false());
}

#[test]
fn given_parse_when_parsed_then_path_set() {
    let cli = Cli::try_parse_from(["nd", "parse", "routes.rd"]).unwrap();

    let Commands::Parse { path } = cli.command else {
        panic!("expected parse");
    };
    assert_eq!(path, PathBuf::from("routes.rd"));
}
