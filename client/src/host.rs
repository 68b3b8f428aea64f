use hudsync_shared::{BlockPos, ChunkPos};

/// What the host application exposes about the session it is running. All calls are made
/// from the simulation thread.
pub trait WorldHost {
    /// The simulation runs in this process.
    fn is_self_hosted(&self) -> bool;

    /// Block the player stands in, or `None` without a loaded world and player.
    fn player_position(&self) -> Option<BlockPos>;

    /// Dimension the player is in, or `None` without a loaded world.
    fn dimension(&self) -> Option<i32>;

    /// Name of the local world or remote server, used for storage file names.
    fn world_or_server_name(&self) -> Option<String>;

    /// Seed of the given dimension's world on a self-hosted session.
    fn hosted_world_seed(&self, dimension: i32) -> Option<i64>;

    /// Spawn point of the loaded world.
    fn world_spawn(&self) -> Option<BlockPos>;

    /// Current dropped-chunks tracking size of the self-hosted world.
    fn hosted_dropped_chunks_hash_size(&self) -> Option<i32>;

    /// Recent tick durations of the self-hosted simulation, in nanoseconds.
    fn hosted_tick_times(&self) -> Option<Vec<i64>>;
}

/// Heightmap data of one loaded chunk.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ChunkColumn {
    pub heightmap: Vec<i32>,
    /// Y of the lowest block of the highest non-empty 16-block section, or 0 for none.
    pub top_filled_segment: i32,
}

/// Chunk data of the loaded world.
pub trait ChunkHeights {
    fn column(&self, chunk: ChunkPos) -> Option<ChunkColumn>;
}
