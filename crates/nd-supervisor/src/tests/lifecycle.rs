use crate::lifecycle::Lifecycle;
use crate::{EventEmitter, Invocation, LifecycleState, SupervisorEvent};

use std::path::PathBuf;

use googletest::assert_that;
use googletest::prelude::{eq, none, some};

fn begin(lifecycle: &Lifecycle) -> u64 {
    lifecycle.begin_generation(
        Invocation::new("netter").arg("parse"),
        PathBuf::from("/tmp/routes.rd"),
        Some(100),
    )
}

#[test]
fn given_new_lifecycle_when_queried_then_idle() {
    let lifecycle = Lifecycle::new(EventEmitter::new());

    assert_that!(lifecycle.state(), eq(LifecycleState::Idle));
    assert_that!(lifecycle.endpoint(), none());
    assert_that!(lifecycle.pid(), none());
    assert_that!(lifecycle.invocation(), none());
}

#[test]
fn given_generations_when_begun_then_counter_increases() {
    let lifecycle = Lifecycle::new(EventEmitter::new());

    let first = begin(&lifecycle);
    lifecycle.begin_stop();
    lifecycle.finish_stop(first);
    let second = begin(&lifecycle);

    assert_that!(first, eq(1));
    assert_that!(second, eq(2));
    assert_that!(lifecycle.config_path(), some(eq(&PathBuf::from("/tmp/routes.rd"))));
}

#[tokio::test]
async fn given_running_when_process_exits_then_crash_then_stopped() {
    // Given
    let lifecycle = Lifecycle::new(EventEmitter::new());
    let mut rx = lifecycle.emitter().subscribe();
    let mut states = lifecycle.subscribe_state();
    let generation = begin(&lifecycle);
    lifecycle.mark_ready(generation, "127.0.0.1:8080");
    super::drain(&mut rx);

    // When
    lifecycle.process_exited(generation, Some(3));

    // Then
    let events = super::drain(&mut rx);
    assert_eq!(
        events,
        vec![
            SupervisorEvent::process_error("Server exited unexpectedly with exit code 3"),
            SupervisorEvent::ServerStopped,
        ]
    );
    assert_that!(lifecycle.state(), eq(LifecycleState::Idle));
    assert_that!(lifecycle.pid(), none());
    assert_eq!(
        super::drain_states(&mut states),
        vec![
            LifecycleState::Starting,
            LifecycleState::Running,
            LifecycleState::Crashed,
            LifecycleState::Idle,
        ]
    );
}

#[tokio::test]
async fn given_starting_when_process_exits_then_server_error_then_stopped() {
    let lifecycle = Lifecycle::new(EventEmitter::new());
    let mut rx = lifecycle.emitter().subscribe();
    let generation = begin(&lifecycle);

    lifecycle.process_exited(generation, Some(2));

    let kinds = super::lifecycle_kinds(&super::drain(&mut rx));
    assert_eq!(kinds, vec!["server_error", "server_stopped"]);
    assert_that!(lifecycle.state(), eq(LifecycleState::Idle));
}

#[tokio::test]
async fn given_stopping_when_exit_reported_twice_then_single_stopped() {
    // Given
    let lifecycle = Lifecycle::new(EventEmitter::new());
    let mut rx = lifecycle.emitter().subscribe();
    let generation = begin(&lifecycle);
    lifecycle.mark_ready(generation, "127.0.0.1:8080");
    super::drain(&mut rx);

    // When
    assert_that!(lifecycle.begin_stop(), some(eq(generation)));
    lifecycle.process_exited(generation, None);
    lifecycle.finish_stop(generation);
    lifecycle.finish_stop(generation);
    lifecycle.process_exited(generation, None);

    // Then
    let kinds = super::lifecycle_kinds(&super::drain(&mut rx));
    assert_eq!(kinds, vec!["server_stopped"]);
    assert_that!(lifecycle.state(), eq(LifecycleState::Idle));
}

#[test]
fn given_idle_when_begin_stop_then_none() {
    let lifecycle = Lifecycle::new(EventEmitter::new());

    assert_that!(lifecycle.begin_stop(), none());
}

#[tokio::test]
async fn given_stopping_when_marker_arrives_then_not_ready() {
    let lifecycle = Lifecycle::new(EventEmitter::new());
    let mut rx = lifecycle.emitter().subscribe();
    let generation = begin(&lifecycle);
    lifecycle.begin_stop();

    let accepted = lifecycle.mark_ready(generation, "127.0.0.1:8080");

    assert!(!accepted);
    assert_that!(lifecycle.endpoint(), none());
    assert!(super::lifecycle_kinds(&super::drain(&mut rx)).is_empty());
}
