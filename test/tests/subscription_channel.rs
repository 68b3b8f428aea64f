/// Integration tests for the subscription channel as seen through the world state:
/// automatic subscriptions, split delivery, telemetry refresh and malformed updates.
use std::sync::Arc;

use hudsync_client::{Provenance, WorldState, WorldStateConfig, DEFAULT_DROPPED_CHUNKS_HASH_SIZE};
use hudsync_serde::{ByteWriter, Serde, VarInt};
use hudsync_shared::pubsub::{
    constants::{
        AUTO_SUBSCRIBED_NODES, CHANNEL_NAME, NODE_DROPPED_CHUNKS_HASH_SIZE, NODE_MS_PER_TICK,
        NODE_TICKS_PER_SECOND,
    },
    SubscriptionKind, TypedValue, UpdateBatch,
};
use hudsync_test::{deliver_subscription_payload, init_logging, RecordingSender, TestHost};

fn started_state() -> (WorldState, Arc<RecordingSender>) {
    init_logging();
    let sender = Arc::new(RecordingSender::new());
    let state = WorldState::new(WorldStateConfig::default(), sender.clone());
    state.on_session_start();
    (state, sender)
}

/// Starting a session subscribes to the performance and hash size nodes
#[test]
fn session_start_subscribes_well_known_nodes() {
    let (_state, sender) = started_state();

    let requests = sender.take_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].kind, SubscriptionKind::Subscribe);
    assert_eq!(requests[0].nodes, AUTO_SUBSCRIBED_NODES.to_vec());
}

/// Requests go out on the subscription channel
#[test]
fn requests_use_the_subscription_channel() {
    let (state, sender) = started_state();
    sender.take();

    state.unsubscribe(&[NODE_MS_PER_TICK]);
    let packets = sender.take();
    assert!(!packets.is_empty());
    assert!(packets.iter().all(|(channel, _)| channel == CHANNEL_NAME));
}

/// An update split across many small packets is merged once and refreshes telemetry
#[test]
fn split_update_refreshes_performance() {
    let (state, _sender) = started_state();
    let batch = UpdateBatch::new()
        .with(NODE_TICKS_PER_SECOND, TypedValue::Double(19.5))
        .with(NODE_MS_PER_TICK, TypedValue::Double(51.2))
        .with(NODE_DROPPED_CHUNKS_HASH_SIZE, TypedValue::Int(4096));

    deliver_subscription_payload(&state, &batch.encode(), 8);

    let sample = state.performance_sample();
    assert!(sample.valid);
    assert_eq!(sample.provenance, Some(Provenance::Subscription));
    assert_eq!(sample.ticks_per_second, 19.5);
    assert_eq!(sample.ms_per_tick, 51.2);
    assert!(state.is_protocol_capable());

    let host = TestHost::remote(Some("server"));
    assert_eq!(state.dropped_chunks_hash_size(&host), 4096);
}

/// A sample needs both figures before it is valid
#[test]
fn partial_update_leaves_sample_invalid() {
    let (state, _sender) = started_state();
    let batch = UpdateBatch::new().with(NODE_TICKS_PER_SECOND, TypedValue::Float(20.0));

    deliver_subscription_payload(&state, &batch.encode(), 1024);

    let sample = state.performance_sample();
    assert!(!sample.valid);
    assert_eq!(sample.ticks_per_second, 20.0);
}

/// A batch with an unknown value type is dropped whole; earlier values stay
#[test]
fn unknown_value_type_leaves_store_unchanged() {
    let (state, _sender) = started_state();
    let good = UpdateBatch::new().with(NODE_MS_PER_TICK, TypedValue::Double(40.0));
    deliver_subscription_payload(&state, &good.encode(), 1024);

    let mut writer = ByteWriter::new();
    VarInt::new(1).ser(&mut writer);
    VarInt::new(2).ser(&mut writer);
    NODE_MS_PER_TICK.to_string().ser(&mut writer);
    VarInt::new(5).ser(&mut writer);
    12.0f64.ser(&mut writer);
    "custom.node".to_string().ser(&mut writer);
    VarInt::new(42).ser(&mut writer);
    deliver_subscription_payload(&state, &writer.to_bytes(), 1024);

    assert_eq!(
        state.subscription_value(NODE_MS_PER_TICK),
        Some(TypedValue::Double(40.0))
    );
    assert_eq!(state.subscription_value("custom.node"), None);
    assert!(state.is_protocol_capable());
}

/// A new session forgets values received in the previous one
#[test]
fn session_start_clears_received_values() {
    let (state, _sender) = started_state();
    let batch = UpdateBatch::new().with(NODE_DROPPED_CHUNKS_HASH_SIZE, TypedValue::Int(1024));
    deliver_subscription_payload(&state, &batch.encode(), 1024);
    assert!(state.subscription_value(NODE_DROPPED_CHUNKS_HASH_SIZE).is_some());

    state.on_session_start();
    assert_eq!(state.subscription_value(NODE_DROPPED_CHUNKS_HASH_SIZE), None);
    assert!(!state.is_protocol_capable());
    assert_eq!(
        state.dropped_chunks_hash_size(&TestHost::remote(None)),
        1024,
        "an explicit size survives the session change"
    );
    state.set_dropped_chunks_hash_size(0);
    assert_eq!(
        state.dropped_chunks_hash_size(&TestHost::remote(None)),
        DEFAULT_DROPPED_CHUNKS_HASH_SIZE
    );
}
