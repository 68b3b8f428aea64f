use std::collections::{HashMap, HashSet};

use hudsync_shared::ChunkPos;

use crate::host::{ChunkColumn, ChunkHeights};

/// Returned for chunks without a computed count.
pub const UNKNOWN_SUB_CHUNK_COUNT: i32 = -1;

/// Spawnable sub-chunk counts for loaded chunks, recomputed lazily from their heightmaps.
#[derive(Clone, Debug, Default)]
pub struct ChunkTracker {
    pending: HashSet<ChunkPos>,
    spawnable_sub_chunks: HashMap<ChunkPos, i32>,
}

impl ChunkTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mark_for_heightmap_check(&mut self, chunk: ChunkPos) {
        self.pending.insert(chunk);
    }

    /// Recompute every queued chunk. Without a loaded world all counts are dropped. The
    /// queue is always emptied.
    pub fn check_queued_heightmaps(&mut self, heights: Option<&dyn ChunkHeights>) {
        match heights {
            Some(heights) => {
                for chunk in self.pending.iter().copied() {
                    if let Some(column) = heights.column(chunk) {
                        self.spawnable_sub_chunks
                            .insert(chunk, spawnable_sub_chunks(&column));
                    }
                }
            }
            None => self.spawnable_sub_chunks.clear(),
        }
        self.pending.clear();
    }

    pub fn spawnable_sub_chunk_count(&self, chunk: ChunkPos) -> i32 {
        self.spawnable_sub_chunks
            .get(&chunk)
            .copied()
            .unwrap_or(UNKNOWN_SUB_CHUNK_COUNT)
    }

    pub fn on_chunk_unload(&mut self, chunk: ChunkPos) {
        self.pending.remove(&chunk);
        self.spawnable_sub_chunks.remove(&chunk);
    }

    pub fn is_pending(&self, chunk: ChunkPos) -> bool {
        self.pending.contains(&chunk)
    }

    pub fn clear(&mut self) {
        self.pending.clear();
        self.spawnable_sub_chunks.clear();
    }
}

/// Number of 16-block sections mob spawning considers for a chunk.
pub fn spawnable_sub_chunks(column: &ChunkColumn) -> i32 {
    let max_height = column.heightmap.iter().copied().max().unwrap_or(-1);
    if max_height >= 0 {
        (max_height / 16 + 1).clamp(1, 16)
    } else {
        // void world
        ((column.top_filled_segment + 16) / 16).clamp(1, 16)
    }
}
