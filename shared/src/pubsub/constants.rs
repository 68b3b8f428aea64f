/// Name of the logical channel carrying subscription traffic.
pub const CHANNEL_NAME: &str = "carpet:pubsub";

// id 0 is reserved
pub const PACKET_C2S_SUBSCRIBE: i32 = 1;
pub const PACKET_C2S_UNSUBSCRIBE: i32 = 2;

pub const PACKET_S2C_UPDATE: i32 = 1;

pub const NODE_TICKS_PER_SECOND: &str = "minecraft.performance.tps";
pub const NODE_MS_PER_TICK: &str = "minecraft.performance.mspt";
pub const NODE_DROPPED_CHUNKS_HASH_SIZE: &str =
    "minecraft.overworld.chunk_loading.dropped_chunks.hash_size";

/// Nodes subscribed to whenever a session starts.
pub const AUTO_SUBSCRIBED_NODES: [&str; 3] = [
    NODE_TICKS_PER_SECOND,
    NODE_MS_PER_TICK,
    NODE_DROPPED_CHUNKS_HASH_SIZE,
];
