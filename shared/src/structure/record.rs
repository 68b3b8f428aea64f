use crate::structure::{bounding_box::BoundingBox, structure_type::StructureType};

/// One generated structure as observed by a source. Never mutated after creation.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct StructureRecord {
    kind: StructureType,
    bounding_box: BoundingBox,
    component_count: Option<usize>,
}

impl StructureRecord {
    pub fn new(kind: StructureType, bounding_box: BoundingBox, component_count: Option<usize>) -> Self {
        Self {
            kind,
            bounding_box,
            component_count,
        }
    }

    pub fn kind(&self) -> StructureType {
        self.kind
    }

    pub fn bounding_box(&self) -> &BoundingBox {
        &self.bounding_box
    }

    pub fn component_count(&self) -> Option<usize> {
        self.component_count
    }
}
