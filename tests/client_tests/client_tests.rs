//! Client Tests
//!
//! Tests for the protocol verbs against scripted and simulated peers.

#[path = "../common/mod.rs"]
mod common;

use std::thread;
use std::time::{Duration, Instant};

use common::{MockPeer, Reply, SimPeer, SIM_DEVICES, SIM_RATES};
use logic_remote::{ConnectionState, Device, LogicClient, LogicError, SampleRate};

// =============================================================================
// Verb Tests (scripted peer)
// =============================================================================

#[test]
fn test_connected_devices() {
    let peer = MockPeer::start(vec![Reply::ack(&[
        "0, Logic 8, LOGIC_8_KIND, ABC123, ACTIVE",
        "1, Logic 4, LOGIC_4_KIND, DEF456",
    ])]);
    let mut logic = LogicClient::new(peer.config());

    let devices = logic.connected_devices().unwrap();

    assert_eq!(devices.len(), 2);
    assert_eq!(devices[0].name, "Logic 8");
    assert!(devices[0].active);
    assert_eq!(devices[1].dev_id, "DEF456");
    assert!(!devices[1].active);

    logic.close();
    assert_eq!(peer.finish(), vec!["GET_CONNECTED_DEVICES"]);
}

#[test]
fn test_all_sample_rates_keeps_server_order() {
    let peer = MockPeer::start(vec![Reply::ack(&["4000000, 0", "1000000, 0", "2000000, 10"])]);
    let mut logic = LogicClient::new(peer.config());

    let rates = logic.all_sample_rates().unwrap();

    assert_eq!(
        rates,
        vec![
            SampleRate::new(4_000_000, 0),
            SampleRate::new(1_000_000, 0),
            SampleRate::new(2_000_000, 10),
        ]
    );
    logic.close();
    assert_eq!(peer.finish(), vec!["GET_ALL_SAMPLE_RATES"]);
}

#[test]
fn test_sample_rate_at_least() {
    let rates = ["4000000, 0", "1000000, 0", "2000000, 10"];
    let peer = MockPeer::start(vec![
        Reply::ack(&rates),
        Reply::ack(&rates),
        Reply::ack(&rates),
    ]);
    let mut logic = LogicClient::new(peer.config());

    assert_eq!(
        logic.sample_rate_at_least(0, 0).unwrap(),
        Some(SampleRate::new(1_000_000, 0))
    );
    assert_eq!(
        logic.sample_rate_at_least(1_500_000, 1).unwrap(),
        Some(SampleRate::new(2_000_000, 10))
    );
    assert_eq!(logic.sample_rate_at_least(0, 11).unwrap(), None);

    logic.close();
    assert_eq!(peer.finish().len(), 3);
}

#[test]
fn test_sample_rate_at_least_no_match() {
    let peer = MockPeer::start(vec![Reply::ack(&["1, 0", "0, 1"])]);
    let mut logic = LogicClient::new(peer.config());

    assert_eq!(logic.sample_rate_at_least(1, 1).unwrap(), None);
    logic.close();
    peer.finish();
}

#[test]
fn test_set_sample_rate_request_format() {
    let peer = MockPeer::start(vec![Reply::ack(&[])]);
    let mut logic = LogicClient::new(peer.config());

    logic.set_sample_rate(SampleRate::new(1_000_000, 0)).unwrap();

    logic.close();
    assert_eq!(peer.finish(), vec!["SET_SAMPLE_RATE, 1000000, 0"]);
}

#[test]
fn test_sample_rate_getter() {
    let peer = MockPeer::start(vec![Reply::ack(&["12000000, 6000000"])]);
    let mut logic = LogicClient::new(peer.config());

    assert_eq!(logic.sample_rate().unwrap(), SampleRate::new(12_000_000, 6_000_000));
    logic.close();
    peer.finish();
}

#[test]
fn test_sample_rate_getter_empty_payload_is_parse_error() {
    let peer = MockPeer::start(vec![Reply::ack(&[])]);
    let mut logic = LogicClient::new(peer.config());

    assert!(matches!(logic.sample_rate(), Err(LogicError::Parse(_))));
    logic.close();
    peer.finish();
}

#[test]
fn test_set_num_seconds_matches_set_num_samples() {
    let peer = MockPeer::start(vec![
        Reply::ack(&["2000000, 0"]),
        Reply::ack(&[]),
        Reply::ack(&[]),
    ]);
    let mut logic = LogicClient::new(peer.config());

    logic.set_num_seconds(3.0).unwrap();
    logic.set_num_samples(2_000_000 * 3).unwrap();

    logic.close();
    let requests = peer.finish();
    assert_eq!(
        requests,
        vec!["GET_SAMPLE_RATE", "SET_NUM_SAMPLES, 6000000", "SET_NUM_SAMPLES, 6000000"]
    );
}

#[test]
fn test_set_num_seconds_truncates() {
    let peer = MockPeer::start(vec![Reply::ack(&["1000, 0"]), Reply::ack(&[])]);
    let mut logic = LogicClient::new(peer.config());

    logic.set_num_seconds(0.0025).unwrap();

    logic.close();
    assert_eq!(peer.finish()[1], "SET_NUM_SAMPLES, 2");
}

#[test]
fn test_set_num_seconds_rejects_negative_without_io() {
    let mut logic = LogicClient::default();

    assert!(matches!(
        logic.set_num_seconds(-1.0),
        Err(LogicError::InvalidArgument(_))
    ));
    assert!(matches!(
        logic.set_num_seconds(f64::NAN),
        Err(LogicError::InvalidArgument(_))
    ));
    assert_eq!(logic.state(), ConnectionState::Disconnected);
}

#[test]
fn test_set_num_seconds_overflow_is_rejected_before_sending() {
    let peer = MockPeer::start(vec![Reply::ack(&["500000000, 0"])]);
    let mut logic = LogicClient::new(peer.config());

    let err = logic.set_num_seconds(1e11).unwrap_err();
    assert!(matches!(err, LogicError::InvalidArgument(_)));
    assert!(logic.is_connected());

    logic.close();
    assert_eq!(peer.finish(), vec!["GET_SAMPLE_RATE"]);
}

#[test]
fn test_capture_waits_for_ack() {
    let peer = MockPeer::start(vec![Reply::ack(&[])]);
    let mut logic = LogicClient::new(peer.config());

    logic.capture().unwrap();
    logic.close();
    assert_eq!(peer.finish(), vec!["CAPTURE"]);
}

#[test]
fn test_ack_only_verb_tolerates_payload() {
    let peer = MockPeer::start(vec![Reply::ack(&["unexpected"])]);
    let mut logic = LogicClient::new(peer.config());

    assert!(logic.set_num_samples(10).is_ok());
    logic.close();
    peer.finish();
}

#[test]
fn test_active_device() {
    let peer = MockPeer::start(vec![
        Reply::ack(&["0, A, K, a", "1, B, K, b, ACTIVE"]),
        Reply::ack(&["0, A, K, a"]),
    ]);
    let mut logic = LogicClient::new(peer.config());

    assert_eq!(logic.active_device().unwrap().map(|d| d.dev_id), Some("b".to_string()));
    assert_eq!(logic.active_device().unwrap(), None);
    logic.close();
    peer.finish();
}

// =============================================================================
// Lifecycle and Error Tests
// =============================================================================

#[test]
fn test_client_connects_lazily() {
    let peer = MockPeer::start(vec![Reply::ack(&[])]);
    let mut logic = LogicClient::new(peer.config());

    assert!(!logic.is_connected());
    logic.capture().unwrap();
    assert!(logic.is_connected());

    logic.close();
    peer.finish();
}

#[test]
fn test_protocol_error_keeps_connection() {
    let peer = MockPeer::start(vec![
        Reply::Send("NAK".to_string()),
        Reply::ack(&["1000000, 0"]),
    ]);
    let mut logic = LogicClient::new(peer.config());

    let err = logic.set_sample_rate(SampleRate::new(3, 3)).unwrap_err();
    assert_eq!(err.raw_lines(), Some(&["NAK".to_string()][..]));
    assert!(logic.is_connected());

    assert_eq!(logic.sample_rate().unwrap(), SampleRate::new(1_000_000, 0));
    logic.close();
    peer.finish();
}

#[test]
fn test_parse_error_keeps_connection() {
    let peer = MockPeer::start(vec![
        Reply::ack(&["0, too short"]),
        Reply::ack(&["0, A, K, a"]),
    ]);
    let mut logic = LogicClient::new(peer.config());

    assert!(matches!(logic.connected_devices(), Err(LogicError::Parse(_))));
    assert!(logic.is_connected());
    assert_eq!(logic.connected_devices().unwrap().len(), 1);

    logic.close();
    peer.finish();
}

#[test]
fn test_close_then_use_reconnects() {
    let peer = MockPeer::start(vec![Reply::ack(&[]), Reply::ack(&[])]);
    let mut logic = LogicClient::new(peer.config());

    logic.capture().unwrap();
    logic.close();
    assert_eq!(logic.state(), ConnectionState::Disconnected);

    logic.capture().unwrap();
    assert_eq!(logic.state(), ConnectionState::Connected);

    logic.close();
    assert_eq!(peer.finish(), vec!["CAPTURE", "CAPTURE"]);
}

#[test]
fn test_timeout_then_next_verb_reconnects() {
    let peer = MockPeer::start(vec![Reply::Silent, Reply::ack(&[])]);
    let mut config = peer.config();
    config.io_timeout_ms = 100;
    let mut logic = LogicClient::new(config);

    assert!(matches!(
        logic.set_num_samples(1),
        Err(LogicError::Timeout { .. })
    ));
    assert_eq!(logic.state(), ConnectionState::Disconnected);

    logic.capture().unwrap();
    assert_eq!(logic.state(), ConnectionState::Connected);

    logic.close();
    assert_eq!(peer.finish(), vec!["SET_NUM_SAMPLES, 1", "CAPTURE"]);
}

#[test]
fn test_cancel_before_capture_is_not_lost() {
    let peer = MockPeer::start(vec![Reply::ack(&[])]);
    let mut config = peer.config();
    config.io_timeout_ms = 0;
    let mut logic = LogicClient::new(config);
    let handle = logic.cancel_handle();

    // Lands before the socket exists, as a Ctrl-C during connect would
    handle.cancel();
    let started = Instant::now();
    assert!(matches!(logic.capture(), Err(LogicError::Cancelled)));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(!logic.is_connected());

    logic.capture().unwrap();
    logic.close();
    assert_eq!(peer.finish(), vec!["CAPTURE"]);
}

#[test]
fn test_cancel_during_capture() {
    let peer = MockPeer::start(vec![Reply::Silent]);
    let mut config = peer.config();
    config.io_timeout_ms = 0;
    let mut logic = LogicClient::new(config);
    let handle = logic.cancel_handle();

    let canceller = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        handle.cancel();
    });

    assert!(matches!(logic.capture(), Err(LogicError::Cancelled)));
    canceller.join().unwrap();
    assert!(!logic.is_connected());
    assert_eq!(peer.finish(), vec!["CAPTURE"]);
}

#[test]
fn test_connection_refused_surfaces_connection_error() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = listener.local_addr().unwrap().port();
    drop(listener);

    let config = logic_remote::Config::builder().port(port).build();
    let mut logic = LogicClient::new(config);

    assert!(matches!(
        logic.connected_devices(),
        Err(LogicError::Connection { .. })
    ));
}

// =============================================================================
// Simulation Peer Tests
// =============================================================================

#[test]
fn test_sim_lists_all_devices() {
    let sim = SimPeer::start();
    let mut logic = LogicClient::new(sim.config());

    let devices = logic.connected_devices().unwrap();
    assert_eq!(devices.len(), SIM_DEVICES.len());
    assert_eq!(devices.iter().filter(|d| d.active).count(), 1);

    let active: Option<Device> = logic.active_device().unwrap();
    assert_eq!(active.map(|d| d.num), Some(1));
}

#[test]
fn test_sim_sample_rate_round_trip() {
    let sim = SimPeer::start();
    let mut logic = LogicClient::new(sim.config());

    let rate = SampleRate::new(25_000_000, 0);
    logic.set_sample_rate(rate).unwrap();

    assert_eq!(logic.sample_rate().unwrap(), rate);
    assert_eq!(sim.state().sample_rate, rate);
}

#[test]
fn test_sim_rate_at_least_bounds() {
    let sim = SimPeer::start();
    let mut logic = LogicClient::new(sim.config());

    let mut sorted = logic.all_sample_rates().unwrap();
    assert_eq!(sorted.len(), SIM_RATES.len());
    sorted.sort();

    let first = logic.sample_rate_at_least(0, 0).unwrap();
    assert_eq!(first, sorted.first().copied());

    let top = sorted[sorted.len() - 1];
    let last = logic.sample_rate_at_least(top.digital, top.analog).unwrap();
    assert_eq!(last, Some(top));
}

#[test]
fn test_sim_capture_for_duration() {
    let sim = SimPeer::start();
    let mut logic = LogicClient::new(sim.config());

    let rate = logic.sample_rate_at_least(4_000_000, 0).unwrap().unwrap();
    logic.set_sample_rate(rate).unwrap();
    logic.set_num_seconds(0.5).unwrap();
    logic.capture().unwrap();

    let state = sim.state();
    assert_eq!(state.num_samples, 2_000_000);
    assert_eq!(state.captures, 1);
}

#[test]
fn test_sim_rejects_unsupported_rate() {
    let sim = SimPeer::start();
    let mut logic = LogicClient::new(sim.config());

    let err = logic.set_sample_rate(SampleRate::new(3, 3)).unwrap_err();
    assert!(matches!(err, LogicError::Protocol { .. }));
    assert_eq!(sim.state().sample_rate, SampleRate::new(1_000_000, 0));
}
