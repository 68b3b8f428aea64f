use std::sync::Arc;

use log::{debug, info, warn};

use hudsync_shared::{
    structure::{StructureMap, StructureUpdate, TransferError},
    BlockPos,
};

use crate::structures::{cache::StructureCache, source::StructureSource};

/// Applies structure broadcasts pushed by the peer. Never polled: the cache only changes when
/// a message arrives.
#[derive(Default)]
pub struct NetworkSource;

impl NetworkSource {
    pub fn new() -> Self {
        Self
    }

    /// Decode one broadcast and apply it to `cache`. A message that fails to decode is logged
    /// and dropped with the cache untouched. Returns the world seed the message carried.
    pub fn receive(&self, cache: &StructureCache, payload: &[u8]) -> Option<i64> {
        let update = match StructureUpdate::decode(payload) {
            Ok(Some(update)) => update,
            Ok(None) => {
                debug!("Ignoring {} byte structure message", payload.len());
                return None;
            }
            Err(TransferError::UnknownKind { kind }) => {
                debug!("Ignoring structure message of unknown kind {}", kind);
                return None;
            }
            Err(error) => {
                warn!("Failed to read structure data from the peer: {}", error);
                return None;
            }
        };

        match update {
            StructureUpdate::Replace { seed, records } => {
                let structures: StructureMap = records.into_iter().collect();
                info!(
                    "Structure data updated from the peer (all), structures: {}",
                    structures.len()
                );
                cache.replace_remote(structures);
                Some(seed)
            }
            StructureUpdate::Begin { seed, expected } => {
                debug!("Peer announced {} structure boxes", expected);
                cache.begin_remote();
                Some(seed)
            }
            StructureUpdate::Append { records } => {
                debug!("Received {} structure boxes from the peer", records.len());
                cache.append_remote(records.into_iter().collect());
                None
            }
        }
    }
}

impl StructureSource for NetworkSource {
    fn hysteresis(&self) -> Option<i32> {
        None
    }

    fn refresh(&self, _cache: &Arc<StructureCache>, _player_pos: BlockPos) {}
}
