/// Integration tests for the performance figures across session kinds: direct
/// measurement, heartbeat estimates, scraped status text and their precedence.
use std::sync::Arc;

use hudsync_client::{Provenance, WorldState, WorldStateConfig};
use hudsync_test::{init_logging, RecordingSender, TestHost};

const SECOND: u64 = 1_000_000_000;

fn world_state() -> WorldState {
    init_logging();
    let state = WorldState::new(WorldStateConfig::default(), Arc::new(RecordingSender::new()));
    state.on_session_start();
    state
}

/// One second of wall time per 20 ticks is full speed
#[test]
fn heartbeat_estimate_at_full_speed() {
    let state = world_state();
    let host = TestHost::remote(Some("server"));

    state.on_server_time_update(1000, 5 * SECOND, &host);
    assert!(!state.performance_sample().valid);
    assert_eq!(
        state.performance_sample().provenance,
        Some(Provenance::ElapsedEstimate)
    );

    state.on_server_time_update(1020, 6 * SECOND, &host);
    let sample = state.performance_sample();
    assert!(sample.valid);
    assert!((sample.ms_per_tick - 50.0).abs() < 1e-9);
    assert!((sample.ticks_per_second - 20.0).abs() < 1e-9);
}

/// A lagging simulation halves the tick rate
#[test]
fn heartbeat_estimate_when_lagging() {
    let state = world_state();
    let host = TestHost::remote(None);

    state.on_server_time_update(0, SECOND, &host);
    state.on_server_time_update(20, 3 * SECOND, &host);

    let sample = state.performance_sample();
    assert!((sample.ms_per_tick - 100.0).abs() < 1e-9);
    assert!((sample.ticks_per_second - 10.0).abs() < 1e-9);
}

/// A heartbeat without world time progress keeps the previous estimate
#[test]
fn stalled_heartbeat_keeps_estimate() {
    let state = world_state();
    let host = TestHost::remote(None);

    state.on_server_time_update(0, 0, &host);
    state.on_server_time_update(20, SECOND, &host);
    state.on_server_time_update(20, 4 * SECOND, &host);

    let sample = state.performance_sample();
    assert!(sample.valid);
    assert!((sample.ms_per_tick - 50.0).abs() < 1e-9);
}

/// Self-hosted sessions measure tick times directly and ignore heartbeats
#[test]
fn self_hosted_session_measures_directly() {
    let state = world_state();
    let mut host = TestHost::self_hosted(1);
    host.tick_times = Some(vec![25_000_000; 100]);

    state.on_server_time_update(0, 0, &host);
    state.on_server_time_update(20, 10 * SECOND, &host);
    assert_eq!(state.performance_sample().provenance, None);

    state.on_client_tick(&host);
    let sample = state.performance_sample();
    assert!(sample.valid);
    assert_eq!(sample.provenance, Some(Provenance::DirectMeasurement));
    assert!((sample.ms_per_tick - 25.0).abs() < 1e-9);
    assert!((sample.ticks_per_second - 20.0).abs() < 1e-9);
}

/// Once a status line was scraped, heartbeats no longer override it
#[test]
fn scraped_status_takes_precedence() {
    let state = world_state();
    let host = TestHost::remote(Some("server"));

    assert!(state.on_status_text("§7TPS: §a19,8 §7MSPT: §a34,1\nplayers online: 3"));
    state.on_server_time_update(0, 0, &host);
    state.on_server_time_update(20, 2 * SECOND, &host);

    let sample = state.performance_sample();
    assert_eq!(sample.provenance, Some(Provenance::TextScrape));
    assert!((sample.ticks_per_second - 19.8).abs() < 1e-9);
    assert!((sample.ms_per_tick - 34.1).abs() < 1e-9);
    assert!(state.is_protocol_capable());
}

/// Status text without the line invalidates the scraped sample
#[test]
fn missing_status_line_invalidates_sample() {
    let state = world_state();

    assert!(state.on_status_text("TPS: 20.0 MSPT: 3.2"));
    assert!(state.performance_sample().valid);
    assert!(!state.on_status_text("Welcome!"));
    assert!(!state.performance_sample().valid);
}
