//! Battery and charging queries against a scripted backend

mod common;

use std::sync::Arc;

use common::{instant_flow, FakeBackend, Reply};
use razer_mouse::{CommandSession, DeviceError};
use razer_transport::protocol::{cmd, Command};
use razer_transport::{HidBackend, Status, TransportError};

fn session(backend: &Arc<FakeBackend>, max_tries: usize) -> CommandSession {
    let backend: Arc<dyn HidBackend> = backend.clone();
    CommandSession::new(
        backend,
        instant_flow(max_tries),
        "Razer Basilisk V3 Pro",
        0x00AB,
        "/dev/hidraw3",
        0x1F,
    )
}

#[test]
fn test_battery_full() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::ok(255)]);
    assert_eq!(session(&backend, 10).query_battery_level(), 100);
}

#[test]
fn test_battery_empty() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::ok(0)]);
    assert_eq!(session(&backend, 10).query_battery_level(), 0);
}

#[test]
fn test_battery_rounding() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::ok(128)]);
    assert_eq!(session(&backend, 10).query_battery_level(), 50);
}

#[test]
fn test_battery_request_frame() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::ok(200)]);
    assert_eq!(session(&backend, 10).query_battery_level(), 78);

    let request = backend.last_request().unwrap();
    assert_eq!(request.status, Status::NewCommand);
    assert_eq!(request.transaction_id, 0x1F);
    assert_eq!(request.command_class, cmd::CLASS_POWER);
    assert_eq!(request.command_id, cmd::GET_BATTERY_LEVEL);
    assert_eq!(request.data_size, 0x02);
    assert!(request.is_valid());
    assert_eq!(
        backend.state.opened_paths.lock().as_slice(),
        ["/dev/hidraw3".to_string()]
    );
}

#[test]
fn test_battery_failure_returns_sentinel() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::status(0x05)]);
    assert_eq!(session(&backend, 10).query_battery_level(), -1);
    assert_eq!(backend.sends(), 1);
}

#[test]
fn test_battery_busy_then_success() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::busy(), Reply::busy(), Reply::ok(255)]);
    assert_eq!(session(&backend, 10).query_battery_level(), 100);
    assert_eq!(backend.sends(), 3);
    assert_eq!(backend.opens(), 1);
}

#[test]
fn test_battery_always_busy_aborts() {
    let backend = FakeBackend::new(false);
    let session = session(&backend, 10);
    match session.read_battery_level() {
        Err(DeviceError::Transport(TransportError::ExchangeAborted { tries })) => {
            assert_eq!(tries, 10)
        }
        other => panic!("expected ExchangeAborted, got {other:?}"),
    }
    assert_eq!(backend.sends(), 10);
}

#[test]
fn test_charging_status() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::ok(1), Reply::ok(0)]);
    let session = session(&backend, 10);

    assert!(session.query_charging_status());
    assert_eq!(
        backend.last_request().unwrap().command_id,
        cmd::GET_CHARGING_STATUS
    );
    assert!(!session.query_charging_status());
}

#[test]
fn test_charging_failure_is_false() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::status(0x03)]);
    assert!(!session(&backend, 10).query_charging_status());
}

#[test]
fn test_handle_closed_after_each_query() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::ok(255), Reply::status(0x03), Reply::ok(1)]);
    let session = session(&backend, 10);

    session.query_battery_level();
    assert_eq!((backend.opens(), backend.closes()), (1, 1));

    session.query_battery_level();
    assert_eq!((backend.opens(), backend.closes()), (2, 2));

    session.query_charging_status();
    assert_eq!((backend.opens(), backend.closes()), (3, 3));
}

#[test]
fn test_open_failure() {
    let backend = FakeBackend::new(false);
    backend.fail_open(true);
    let session = session(&backend, 10);

    assert_eq!(session.query_battery_level(), -1);
    assert!(matches!(
        session.read_charging_status(),
        Err(DeviceError::Transport(TransportError::HidPermissionDenied(_)))
    ));
    assert_eq!(backend.sends(), 0);
}

#[test]
fn test_exchange_custom_command() {
    let backend = FakeBackend::new(false);
    backend.push_replies([Reply::ok(0x42)]);
    let session = session(&backend, 10);

    let command = Command::new(0x00, 0x81, 0x02).with_arguments(&[0x01]);
    let response = session.exchange(command).unwrap();
    assert_eq!(response.status, Status::Successful);
    assert_eq!(response.command_id, 0x81);
    assert_eq!(response.arguments[1], 0x42);
    assert_eq!(backend.last_request().unwrap().arguments[0], 0x01);
}

#[test]
fn test_accessors() {
    let backend = FakeBackend::new(false);
    let session = session(&backend, 10);
    assert_eq!(session.name(), "Razer Basilisk V3 Pro");
    assert_eq!(session.product_id(), 0x00AB);
    assert_eq!(session.path(), "/dev/hidraw3");
    assert_eq!(session.transaction_id(), 0x1F);
}
