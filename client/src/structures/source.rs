use std::sync::Arc;

use hudsync_shared::BlockPos;

use crate::structures::cache::StructureCache;

/// One way of (re)building the structure cache. Exactly one source is active for a
/// session, chosen by the session kind.
pub trait StructureSource {
    /// Distance the player must move before this source is polled again; `None` for
    /// sources that only push.
    fn hysteresis(&self) -> Option<i32>;

    /// Rebuild the cache around `player_pos`, replacing its contents in one step. May defer
    /// the replacement to another thread.
    fn refresh(&self, cache: &Arc<StructureCache>, player_pos: BlockPos);
}
