use std::fmt;

/// Structure name shared by every temple variant.
pub const TEMPLE_STRUCTURE_NAME: &str = "Temple";

/// Closed set of structure kinds tracked by the cache.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StructureType {
    DesertPyramid,
    JungleTemple,
    WitchHut,
    Igloo,
    OceanMonument,
    Stronghold,
    Village,
    Mansion,
    NetherFortress,
    EndCity,
}

impl StructureType {
    pub const ALL: [StructureType; 10] = [
        StructureType::DesertPyramid,
        StructureType::JungleTemple,
        StructureType::WitchHut,
        StructureType::Igloo,
        StructureType::OceanMonument,
        StructureType::Stronghold,
        StructureType::Village,
        StructureType::Mansion,
        StructureType::NetherFortress,
        StructureType::EndCity,
    ];

    /// Name the generator and stored data files use for this kind of structure.
    pub fn structure_name(&self) -> &'static str {
        match self {
            StructureType::DesertPyramid
            | StructureType::JungleTemple
            | StructureType::WitchHut
            | StructureType::Igloo => TEMPLE_STRUCTURE_NAME,
            StructureType::OceanMonument => "Monument",
            StructureType::Stronghold => "Stronghold",
            StructureType::Village => "Village",
            StructureType::Mansion => "Mansion",
            StructureType::NetherFortress => "Fortress",
            StructureType::EndCity => "EndCity",
        }
    }

    pub fn is_temple(&self) -> bool {
        self.temple_component_id().is_some()
    }

    /// Identifier of the single generated component that marks this temple variant.
    pub fn temple_component_id(&self) -> Option<&'static str> {
        match self {
            StructureType::DesertPyramid => Some("TeDP"),
            StructureType::JungleTemple => Some("TeJP"),
            StructureType::WitchHut => Some("TeSH"),
            StructureType::Igloo => Some("Iglu"),
            _ => None,
        }
    }

    pub fn from_temple_component_id(component_id: &str) -> Option<StructureType> {
        StructureType::ALL
            .into_iter()
            .find(|kind| kind.temple_component_id() == Some(component_id))
    }

    /// Non-temple kind for a structure name; temples need their component to be told apart.
    pub fn from_structure_name(name: &str) -> Option<StructureType> {
        StructureType::ALL
            .into_iter()
            .find(|kind| !kind.is_temple() && kind.structure_name() == name)
    }

    /// Classify a structure from its metadata. A temple must consist of exactly one component
    /// whose identifier is in the temple table; a start with more components is never a
    /// temple. An unknown component count is accepted.
    pub fn classify(
        structure_name: &str,
        component_id: Option<&str>,
        component_count: Option<usize>,
    ) -> Option<StructureType> {
        if structure_name == TEMPLE_STRUCTURE_NAME {
            if component_count.is_some_and(|count| count != 1) {
                return None;
            }
            return StructureType::from_temple_component_id(component_id?);
        }
        StructureType::from_structure_name(structure_name)
    }
}

impl fmt::Display for StructureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StructureType::DesertPyramid => "desert_pyramid",
            StructureType::JungleTemple => "jungle_temple",
            StructureType::WitchHut => "witch_hut",
            StructureType::Igloo => "igloo",
            StructureType::OceanMonument => "ocean_monument",
            StructureType::Stronghold => "stronghold",
            StructureType::Village => "village",
            StructureType::Mansion => "mansion",
            StructureType::NetherFortress => "nether_fortress",
            StructureType::EndCity => "end_city",
        };
        f.write_str(name)
    }
}
