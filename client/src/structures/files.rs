use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::{debug, info, warn};

use hudsync_shared::{
    nbt::read_file_bytes,
    structure::{
        read_structure_starts, structure_file_names, StructureMap, StructureRecord,
        STRUCTURE_FILE_EXTENSION,
    },
    BlockPos,
};

use crate::structures::{
    cache::StructureCache, error::StructureFileError, source::StructureSource,
};

/// Read one stored structure data file. A missing file holds no structures.
pub fn read_structure_file(
    path: &Path,
    structure_name: &str,
) -> Result<Vec<StructureRecord>, StructureFileError> {
    let bytes = match fs::read(path) {
        Ok(bytes) => bytes,
        Err(error) if error.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(source) => {
            return Err(StructureFileError::Io {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    let root = read_file_bytes(&bytes).map_err(|source| StructureFileError::Malformed {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(read_structure_starts(&root, structure_name))
}

/// Read every stored structure data file in `directory`. Unreadable files are logged and
/// contribute nothing.
pub fn read_structure_directory(directory: &Path) -> StructureMap {
    let mut structures = StructureMap::new();
    if !directory.is_dir() {
        return structures;
    }

    for structure_name in structure_file_names() {
        let path = directory.join(format!("{}.{}", structure_name, STRUCTURE_FILE_EXTENSION));
        match read_structure_file(&path, structure_name) {
            Ok(records) => structures.extend(records),
            Err(error) => warn!("{}", error),
        }
    }

    structures
}

/// Rebuilds the cache from structure data files stored for the current world or server.
pub struct FileSource {
    directory: Option<PathBuf>,
    hysteresis: i32,
}

impl FileSource {
    /// `directory` is `None` when the world or server has no resolvable name.
    pub fn new(directory: Option<PathBuf>, hysteresis: i32) -> Self {
        Self {
            directory,
            hysteresis,
        }
    }
}

impl StructureSource for FileSource {
    fn hysteresis(&self) -> Option<i32> {
        Some(self.hysteresis)
    }

    fn refresh(&self, cache: &Arc<StructureCache>, _player_pos: BlockPos) {
        let structures = match &self.directory {
            Some(directory) => read_structure_directory(directory),
            None => StructureMap::new(),
        };
        let count = structures.len();
        if cache.replace_local(structures) {
            info!("Structure data updated from local structure files, structures: {}", count);
        } else {
            debug!("Discarding structure files, the peer's data arrived first");
        }
    }
}
