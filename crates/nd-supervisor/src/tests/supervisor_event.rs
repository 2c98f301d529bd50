use crate::{LifecycleState, OutputStream, SupervisorEvent};

use googletest::assert_that;
use googletest::prelude::eq;
use serde_json::json;

#[test]
fn given_events_when_serialized_then_tagged_by_kind() {
    let ready = serde_json::to_value(SupervisorEvent::ServerReady {
        endpoint: "127.0.0.1:8080".into(),
    })
    .unwrap();
    let chunk = serde_json::to_value(SupervisorEvent::OutputChunk {
        stream: OutputStream::Stderr,
        text: "oops\n".into(),
    })
    .unwrap();
    let stopped = serde_json::to_value(SupervisorEvent::ServerStopped).unwrap();

    assert_that!(ready, eq(&json!({"kind": "server_ready", "endpoint": "127.0.0.1:8080"})));
    assert_that!(
        chunk,
        eq(&json!({"kind": "output_chunk", "stream": "stderr", "text": "oops\n"}))
    );
    assert_that!(stopped, eq(&json!({"kind": "server_stopped"})));
}

#[test]
fn given_every_event_when_kind_then_matches_serialized_tag() {
    let events = [
        SupervisorEvent::ProcessLaunched {
            command: "netter".into(),
        },
        SupervisorEvent::process_error("boom"),
        SupervisorEvent::ServerReady {
            endpoint: "h:1".into(),
        },
        SupervisorEvent::ServerStopped,
        SupervisorEvent::server_error("bad"),
        SupervisorEvent::OutputChunk {
            stream: OutputStream::Stdout,
            text: "x".into(),
        },
    ];

    for event in events {
        let value = serde_json::to_value(&event).unwrap();
        assert_that!(value["kind"], eq(&json!(event.kind())));
    }
}

#[test]
fn given_states_when_displayed_then_snake_case_names() {
    assert_that!(LifecycleState::Running.to_string(), eq("running"));
    assert_that!(
        serde_json::to_value(LifecycleState::Crashed).unwrap(),
        eq(&json!("crashed"))
    );
}
