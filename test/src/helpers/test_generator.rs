use std::collections::HashMap;

use hudsync_client::structures::{FeatureKind, GeneratedStart, GeneratorKind, StructureGenerator};
use hudsync_shared::{structure::BoundingBox, BlockPos};

/// World generator double holding a fixed set of starts per feature.
pub struct TestGenerator {
    kind: GeneratorKind,
    starts: HashMap<FeatureKind, Vec<GeneratedStart>>,
}

impl TestGenerator {
    pub fn new(kind: GeneratorKind) -> Self {
        Self {
            kind,
            starts: HashMap::new(),
        }
    }

    /// Add a 32x32 start whose minimum corner is at `(x, 60, z)`.
    pub fn with_start(mut self, feature: FeatureKind, x: i32, z: i32, component_ids: &[&str]) -> Self {
        let start = GeneratedStart {
            bounding_box: BoundingBox::new(BlockPos::new(x, 60, z), BlockPos::new(x + 31, 90, z + 31)),
            component_ids: component_ids.iter().map(|id| id.to_string()).collect(),
        };
        self.starts.entry(feature).or_default().push(start);
        self
    }
}

impl StructureGenerator for TestGenerator {
    fn kind(&self) -> GeneratorKind {
        self.kind.clone()
    }

    fn starts(&self, feature: FeatureKind) -> Vec<GeneratedStart> {
        self.starts.get(&feature).cloned().unwrap_or_default()
    }
}
