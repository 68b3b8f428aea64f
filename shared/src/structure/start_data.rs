use log::debug;

use crate::{
    nbt::{Compound, TagList},
    structure::{
        bounding_box::BoundingBox,
        record::StructureRecord,
        structure_type::{StructureType, TEMPLE_STRUCTURE_NAME},
    },
};

/// Extension of stored structure data files.
pub const STRUCTURE_FILE_EXTENSION: &str = "dat";

/// Structure names that have a stored data file, one per non-temple type plus the shared
/// temple file.
pub fn structure_file_names() -> Vec<&'static str> {
    let mut names: Vec<&'static str> = Vec::new();
    for kind in StructureType::ALL {
        let name = kind.structure_name();
        if !names.contains(&name) {
            names.push(name);
        }
    }
    names
}

/// Collect the structure starts stored in one data file tree.
///
/// The tree is `{data: {Features: {<key>: start}}}` with each start holding its `id`, its
/// `BB` and its `Children`. Only starts whose `id` matches `structure_name` contribute, and
/// for temples the single child decides the variant. Starts that cannot be classified or
/// carry malformed bounds are skipped.
pub fn read_structure_starts(root: &Compound, structure_name: &str) -> Vec<StructureRecord> {
    let Some(features) = root
        .get_compound("data")
        .and_then(|data| data.get_compound("Features"))
    else {
        debug!("Structure data for '{}' holds no features", structure_name);
        return Vec::new();
    };

    features
        .iter()
        .filter_map(|(_, start)| start.as_compound())
        .filter_map(|start| read_start(start, structure_name))
        .collect()
}

fn read_start(start: &Compound, structure_name: &str) -> Option<StructureRecord> {
    if start.get_str("id")? != structure_name {
        return None;
    }
    let bounding_box = BoundingBox::from_array(start.get_int_array("BB")?)?;
    let children = start.get_list("Children");
    let component_count = children.map(TagList::len);

    let kind = if structure_name == TEMPLE_STRUCTURE_NAME {
        let component_id = children
            .and_then(|children| children.compounds().next())
            .and_then(|child| child.get_str("id"));
        StructureType::classify(structure_name, component_id, Some(component_count.unwrap_or(0)))?
    } else {
        StructureType::from_structure_name(structure_name)?
    };

    Some(StructureRecord::new(kind, bounding_box, component_count))
}
