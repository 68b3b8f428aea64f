use std::sync::Arc;

use log::debug;
use parking_lot::Mutex;

use hudsync_shared::{structure::StructureMap, BlockPos};

use crate::structures::source::StructureSource;

struct CacheState {
    structures: StructureMap,
    last_update_pos: Option<BlockPos>,
    needs_update: bool,
    dirty: bool,
    has_remote_data: bool,
}

impl CacheState {
    fn new() -> Self {
        Self {
            structures: StructureMap::new(),
            last_update_pos: None,
            needs_update: true,
            dirty: false,
            has_remote_data: false,
        }
    }
}

/// Structure records known for the current session, shared between the network thread and
/// the simulation thread. Every read and write goes through one lock, so a consumer never
/// sees a half-replaced set.
pub struct StructureCache {
    state: Mutex<CacheState>,
}

impl Default for StructureCache {
    fn default() -> Self {
        Self::new()
    }
}

impl StructureCache {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(CacheState::new()),
        }
    }

    /// Whether a refresh at `player_pos` is due: nothing was collected yet, a refresh was
    /// requested explicitly, or the player moved at least `hysteresis` blocks on some axis.
    pub fn needs_refresh(&self, player_pos: &BlockPos, hysteresis: i32) -> bool {
        let state = self.state.lock();
        match state.last_update_pos {
            _ if state.needs_update => true,
            None => true,
            Some(last) => player_pos.max_axis_distance(&last) >= i64::from(hysteresis),
        }
    }

    /// Run `source` if the cached data is stale at `player_pos`. Returns whether it ran.
    /// A source without a hysteresis distance is push-only and never polled.
    pub fn request_refresh(self: &Arc<Self>, player_pos: BlockPos, source: &dyn StructureSource) -> bool {
        let Some(hysteresis) = source.hysteresis() else {
            return false;
        };
        if !self.needs_refresh(&player_pos, hysteresis) {
            return false;
        }

        debug!("Refreshing structure data at {}", player_pos);
        source.refresh(self, player_pos);

        let mut state = self.state.lock();
        state.last_update_pos = Some(player_pos);
        state.needs_update = false;
        true
    }

    pub fn set_needs_update(&self) {
        self.state.lock().needs_update = true;
    }

    /// Replace everything with a locally collected set. Data pushed by the peer always wins:
    /// once any remote message has applied, the local set is dropped and `false` returned.
    pub fn replace_local(&self, structures: StructureMap) -> bool {
        let mut state = self.state.lock();
        if state.has_remote_data {
            return false;
        }
        state.structures = structures;
        state.dirty = true;
        true
    }

    /// Replace everything with a set pushed by the peer.
    pub fn replace_remote(&self, structures: StructureMap) {
        let mut state = self.state.lock();
        state.structures = structures;
        state.has_remote_data = true;
        state.dirty = true;
    }

    /// Open a chunked transfer from the peer: the cache empties and waits for appends.
    pub fn begin_remote(&self) {
        let mut state = self.state.lock();
        state.structures.clear();
        state.has_remote_data = true;
        state.dirty = true;
    }

    pub fn append_remote(&self, structures: StructureMap) {
        let mut state = self.state.lock();
        state.structures.extend(structures.iter().cloned());
        state.has_remote_data = true;
        state.dirty = true;
    }

    /// Copy of the current set. Clears the dirty flag in the same critical section, so a
    /// mutation after this call is reported by the next one.
    pub fn snapshot(&self) -> StructureMap {
        let mut state = self.state.lock();
        state.dirty = false;
        state.structures.clone()
    }

    pub fn is_dirty(&self) -> bool {
        self.state.lock().dirty
    }

    pub fn has_remote_data(&self) -> bool {
        self.state.lock().has_remote_data
    }

    pub fn last_update_pos(&self) -> Option<BlockPos> {
        self.state.lock().last_update_pos
    }

    pub fn len(&self) -> usize {
        self.state.lock().structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.state.lock().structures.is_empty()
    }

    /// Forget everything, as at the start of a session.
    pub fn reset(&self) {
        *self.state.lock() = CacheState::new();
    }
}
