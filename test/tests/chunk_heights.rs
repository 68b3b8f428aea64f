/// Integration tests for the per-chunk spawnable sub-chunk counts kept by the world state.
use std::sync::Arc;

use hudsync_client::{WorldState, WorldStateConfig, UNKNOWN_SUB_CHUNK_COUNT};
use hudsync_shared::{BlockPos, ChunkPos};
use hudsync_test::{init_logging, RecordingSender, TestChunks};

fn world_state() -> WorldState {
    init_logging();
    WorldState::new(WorldStateConfig::default(), Arc::new(RecordingSender::new()))
}

/// Queued chunks are measured on the next check; unqueued ones stay unknown
#[test]
fn queued_chunks_are_measured() {
    let state = world_state();
    let hills = BlockPos::new(-20, 70, 33).chunk();
    let plains = ChunkPos::new(4, 4);
    let chunks = TestChunks::default().with_height(hills, 95).with_height(plains, 63);

    state.mark_chunk_for_heightmap_check(hills);
    state.check_queued_heightmaps(Some(&chunks));

    assert_eq!(hills, ChunkPos::new(-2, 2));
    assert_eq!(state.spawnable_sub_chunk_count(hills), 6);
    assert_eq!(state.spawnable_sub_chunk_count(plains), UNKNOWN_SUB_CHUNK_COUNT);
}

/// Unloading a chunk or losing the world forgets the counts
#[test]
fn counts_are_forgotten() {
    let state = world_state();
    let a = ChunkPos::new(0, 0);
    let b = ChunkPos::new(1, 0);
    let chunks = TestChunks::default().with_height(a, 10).with_height(b, 200);

    state.mark_chunk_for_heightmap_check(a);
    state.mark_chunk_for_heightmap_check(b);
    state.check_queued_heightmaps(Some(&chunks));
    assert_eq!(state.spawnable_sub_chunk_count(a), 1);
    assert_eq!(state.spawnable_sub_chunk_count(b), 13);

    state.on_chunk_unload(a);
    assert_eq!(state.spawnable_sub_chunk_count(a), UNKNOWN_SUB_CHUNK_COUNT);

    state.check_queued_heightmaps(None);
    assert_eq!(state.spawnable_sub_chunk_count(b), UNKNOWN_SUB_CHUNK_COUNT);
}
