use hudsync_client::WorldState;
use hudsync_shared::{
    pubsub::constants::CHANNEL_NAME,
    splitter::{split, MAX_TOTAL_PER_PACKET_S2C},
};

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Split a peer payload into transport packets of at most `max_packet_size` bytes.
pub fn frame_for_client(payload: &[u8], max_packet_size: usize) -> Vec<Vec<u8>> {
    split(payload, max_packet_size.min(MAX_TOTAL_PER_PACKET_S2C))
}

/// Deliver a peer payload to `state` on the subscription channel.
pub fn deliver_subscription_payload(state: &WorldState, payload: &[u8], max_packet_size: usize) {
    for packet in frame_for_client(payload, max_packet_size) {
        assert!(state.on_custom_payload(CHANNEL_NAME, &packet));
    }
}
