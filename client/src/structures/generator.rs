use std::sync::Arc;

use log::{debug, info};

use hudsync_shared::{
    structure::{BoundingBox, StructureMap, StructureRecord, StructureType},
    BlockPos,
};

use crate::{
    structures::{cache::StructureCache, source::StructureSource},
    tasks::SimulationTasks,
};

/// Structure features a world generator can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    OceanMonument,
    /// Temples; the single generated component tells the variants apart.
    ScatteredFeature,
    Stronghold,
    Village,
    Mansion,
    Fortress,
    EndCity,
}

impl FeatureKind {
    pub fn structure_name(&self) -> &'static str {
        match self {
            FeatureKind::OceanMonument => "Monument",
            FeatureKind::ScatteredFeature => "Temple",
            FeatureKind::Stronghold => "Stronghold",
            FeatureKind::Village => "Village",
            FeatureKind::Mansion => "Mansion",
            FeatureKind::Fortress => "Fortress",
            FeatureKind::EndCity => "EndCity",
        }
    }
}

/// Kind of the active world generator and the features it carries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GeneratorKind {
    Overworld,
    Nether,
    End,
    /// Flat worlds carry whichever structures were configured; only monuments, temples,
    /// strongholds and villages are ever read from them.
    Flat(Vec<FeatureKind>),
}

impl GeneratorKind {
    pub fn features(&self) -> Vec<FeatureKind> {
        match self {
            GeneratorKind::Overworld => vec![
                FeatureKind::OceanMonument,
                FeatureKind::ScatteredFeature,
                FeatureKind::Stronghold,
                FeatureKind::Village,
                FeatureKind::Mansion,
            ],
            GeneratorKind::Nether => vec![FeatureKind::Fortress],
            GeneratorKind::End => vec![FeatureKind::EndCity],
            GeneratorKind::Flat(configured) => configured
                .iter()
                .copied()
                .filter(|feature| {
                    matches!(
                        feature,
                        FeatureKind::OceanMonument
                            | FeatureKind::ScatteredFeature
                            | FeatureKind::Stronghold
                            | FeatureKind::Village
                    )
                })
                .collect(),
        }
    }
}

/// A structure start the generator has already materialized.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedStart {
    pub bounding_box: BoundingBox,
    /// Identifier of each generated component, in generation order.
    pub component_ids: Vec<String>,
}

/// Read access to the active world generator.
///
/// Generator internals belong to the simulation thread: implementations are only ever called
/// from [`SimulationTasks::run_pending`], which the simulation thread drains once per tick.
pub trait StructureGenerator {
    fn kind(&self) -> GeneratorKind;

    /// Every start of `feature` the generator currently knows about.
    fn starts(&self, feature: FeatureKind) -> Vec<GeneratedStart>;
}

/// Collect and classify the starts within `max_range` blocks (horizontally) of `center`.
pub fn collect_structures(
    generator: &dyn StructureGenerator,
    center: &BlockPos,
    max_range: i32,
) -> StructureMap {
    let mut structures = StructureMap::new();

    for feature in generator.kind().features() {
        for start in generator.starts(feature) {
            if !start.bounding_box.is_within_range(center, max_range) {
                continue;
            }
            let component_count = start.component_ids.len();
            let kind = StructureType::classify(
                feature.structure_name(),
                start.component_ids.first().map(String::as_str),
                Some(component_count),
            );
            if let Some(kind) = kind {
                structures.insert(StructureRecord::new(
                    kind,
                    start.bounding_box,
                    Some(component_count),
                ));
            }
        }
    }

    structures
}

/// Rebuilds the cache from the self-hosted world generator. The work is deferred to the
/// simulation thread with the player position captured at scheduling time.
pub struct GeneratorSource {
    tasks: Arc<SimulationTasks>,
    hysteresis: i32,
    max_range: i32,
}

impl GeneratorSource {
    pub fn new(tasks: Arc<SimulationTasks>, hysteresis: i32, max_range: i32) -> Self {
        Self {
            tasks,
            hysteresis,
            max_range,
        }
    }
}

impl StructureSource for GeneratorSource {
    fn hysteresis(&self) -> Option<i32> {
        Some(self.hysteresis)
    }

    fn refresh(&self, cache: &Arc<StructureCache>, player_pos: BlockPos) {
        let cache = Arc::clone(cache);
        let max_range = self.max_range;
        self.tasks.schedule(Box::new(move |generator| {
            let structures = collect_structures(generator, &player_pos, max_range);
            let count = structures.len();
            if cache.replace_local(structures) {
                info!("Structure data updated from the local generator, structures: {}", count);
            } else {
                debug!("Discarding generated structures, the peer's data arrived first");
            }
        }));
    }
}
