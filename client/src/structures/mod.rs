mod cache;
mod error;
mod files;
mod generator;
mod network;
mod source;

pub use cache::StructureCache;
pub use error::StructureFileError;
pub use files::{read_structure_directory, read_structure_file, FileSource};
pub use generator::{
    collect_structures, FeatureKind, GeneratedStart, GeneratorKind, GeneratorSource,
    StructureGenerator,
};
pub use network::NetworkSource;
pub use source::StructureSource;
