use std::{default::Default, path::PathBuf};

/// Contains Config properties which will be used by the world-state cache
#[derive(Clone, Debug)]
pub struct WorldStateConfig {
    /// Identifier used for the storage directory, the fallback storage file name and the
    /// feedback translation keys.
    pub mod_id: String,
    /// Prefix of the textual debug commands, e.g. `<prefix>-seed`.
    pub command_prefix: String,
    /// Render distance in chunks. Locally generated structures are collected within
    /// `(render_distance_chunks + 4) * 16` blocks of the player.
    pub render_distance_chunks: u32,
    /// Keep the known world seed across a dimension change within one session.
    pub dont_reset_seed_on_dimension_change: bool,
    /// Base configuration directory; storage lives under `<config_dir>/<mod_id>`.
    pub config_dir: PathBuf,
    /// Refresh distance for structures collected from the local generator.
    pub generator_hysteresis: i32,
    /// Refresh distance for structures read from stored data files.
    pub file_hysteresis: i32,
}

impl WorldStateConfig {
    /// Half-size of the square around the player in which generated structures are kept.
    pub fn max_structure_range(&self) -> i32 {
        let chunks = i32::try_from(self.render_distance_chunks).unwrap_or(i32::MAX);
        chunks.saturating_add(4).saturating_mul(16)
    }

    pub fn storage_dir(&self) -> PathBuf {
        self.config_dir.join(&self.mod_id)
    }

    /// Directory holding the stored structure data files for one world or server.
    pub fn structure_dir(&self, world_name: &str) -> PathBuf {
        self.storage_dir().join("structures").join(world_name)
    }
}

impl Default for WorldStateConfig {
    fn default() -> Self {
        Self {
            mod_id: "hudsync".to_string(),
            command_prefix: "hudsync".to_string(),
            render_distance_chunks: 12,
            dont_reset_seed_on_dimension_change: false,
            config_dir: PathBuf::from("config"),
            generator_hysteresis: 32,
            file_hysteresis: 1024,
        }
    }
}
