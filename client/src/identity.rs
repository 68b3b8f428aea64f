use hudsync_shared::BlockPos;

/// World seed and spawn point as far as they are known this session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WorldIdentity {
    seed: Option<i64>,
    spawn: Option<BlockPos>,
}

impl WorldIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seed(&self) -> Option<i64> {
        self.seed
    }

    pub fn spawn(&self) -> Option<BlockPos> {
        self.spawn
    }

    pub fn set_seed(&mut self, seed: i64) {
        self.seed = Some(seed);
    }

    pub fn set_spawn(&mut self, spawn: BlockPos) {
        self.spawn = Some(spawn);
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}
