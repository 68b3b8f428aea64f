/// Integration tests for the session documents written around world transitions: what is
/// saved where, when the global document is read and how the seed crosses dimensions.
use std::{fs, path::Path, sync::Arc};

use serde_json::json;

use hudsync_client::{
    session::{SessionLifecycle, WorldDescriptor},
    WorldState, WorldStateConfig,
};
use hudsync_shared::Vec3d;
use hudsync_test::{init_logging, MemorySection, RecordingSender};

struct Fixture {
    config: WorldStateConfig,
    shapes: MemorySection,
    renderers: MemorySection,
    lifecycle: SessionLifecycle,
}

impl Fixture {
    fn new(config_dir: &Path, carry_seed: bool) -> Self {
        init_logging();
        let config = WorldStateConfig {
            config_dir: config_dir.to_path_buf(),
            dont_reset_seed_on_dimension_change: carry_seed,
            ..WorldStateConfig::default()
        };
        let shapes = MemorySection::new(json!({}));
        let renderers = MemorySection::new(json!({}));
        let lifecycle = SessionLifecycle::from_config(
            &config,
            Box::new(shapes.clone()),
            Box::new(renderers.clone()),
        );
        Self {
            config,
            shapes,
            renderers,
            lifecycle,
        }
    }

    fn world_state(&self) -> WorldState {
        WorldState::new(self.config.clone(), Arc::new(RecordingSender::new()))
    }

    fn join(&mut self, state: &WorldState, world: &WorldDescriptor) {
        self.lifecycle.on_world_load_pre(state, None, Some(world));
        self.lifecycle.on_world_load_post(state, Some(world));
    }

    fn change(&mut self, state: &WorldState, from: &WorldDescriptor, to: &WorldDescriptor) {
        self.lifecycle.on_world_load_pre(state, Some(from), Some(to));
        self.lifecycle.on_world_load_post(state, Some(to));
    }

    fn leave(&mut self, state: &WorldState, from: &WorldDescriptor) {
        self.lifecycle.on_world_load_pre(state, Some(from), None);
        self.lifecycle.on_world_load_post(state, None);
    }
}

/// Leaving a world saves both documents and rejoining restores them
#[test]
fn documents_survive_rejoin() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = Fixture::new(dir.path(), false);
    let overworld = WorldDescriptor::new(Some("World"), 0);

    let state = fixture.world_state();
    fixture.join(&state, &overworld);
    fixture.shapes.set(json!({ "boxes": [1, 2, 3] }));
    fixture.renderers.set(json!({ "spawn_chunks": true }));
    state.set_distance_reference_point(Vec3d::new(1.5, 64.0, -2.0));
    fixture.leave(&state, &overworld);

    let storage = fixture.config.storage_dir();
    assert!(storage.join("World_dim0.json").is_file());
    assert!(storage.join("World.json").is_file());

    fixture.shapes.set(json!({}));
    fixture.renderers.set(json!({}));
    let rejoined = fixture.world_state();
    fixture.join(&rejoined, &overworld);

    assert_eq!(fixture.shapes.value(), json!({ "boxes": [1, 2, 3] }));
    assert_eq!(fixture.renderers.value(), json!({ "spawn_chunks": true }));
    assert_eq!(rejoined.distance_reference_point(), Vec3d::new(1.5, 64.0, -2.0));
}

/// Each dimension keeps its own document
#[test]
fn dimensions_are_stored_separately() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = Fixture::new(dir.path(), false);
    let overworld = WorldDescriptor::new(Some("World"), 0);
    let nether = WorldDescriptor::new(Some("World"), -1);

    let state = fixture.world_state();
    fixture.join(&state, &overworld);
    fixture.shapes.set(json!({ "dimension": "overworld" }));
    fixture.change(&state, &overworld, &nether);
    assert_eq!(fixture.shapes.clear_count(), 2);

    fixture.shapes.set(json!({ "dimension": "nether" }));
    fixture.change(&state, &nether, &overworld);
    assert_eq!(fixture.shapes.value(), json!({ "dimension": "overworld" }));

    let document: serde_json::Value = serde_json::from_str(
        &fs::read_to_string(fixture.config.storage_dir().join("World_dim-1.json")).unwrap(),
    )
    .unwrap();
    assert_eq!(document["shapes"], json!({ "dimension": "nether" }));
    assert!(document["data_storage"]["distance_pos"].is_array());
}

/// The global document is read once and only read again after leaving to the menu
#[test]
fn global_document_is_read_once_per_visit() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = Fixture::new(dir.path(), false);
    let world = WorldDescriptor::new(Some("World"), 0);
    let state = fixture.world_state();

    fixture.join(&state, &world);
    fixture.renderers.set(json!({ "version": 1 }));
    fixture.leave(&state, &world);

    fixture.renderers.set(json!({}));
    fixture.join(&state, &world);
    assert_eq!(fixture.renderers.value(), json!({ "version": 1 }));

    // a second load without visiting the menu keeps the in-memory value
    fixture.renderers.set(json!({ "version": 2 }));
    fixture.join(&state, &world);
    assert_eq!(fixture.renderers.value(), json!({ "version": 2 }));

    fixture.leave(&state, &world);
    fixture.renderers.set(json!({ "stale": true }));
    fixture.join(&state, &world);
    assert_eq!(fixture.renderers.value(), json!({ "version": 2 }));
}

/// The seed crosses a dimension change only when configured to
#[test]
fn seed_carry_over_follows_option() {
    for carry_seed in [true, false] {
        let dir = tempfile::tempdir().unwrap();
        let mut fixture = Fixture::new(dir.path(), carry_seed);
        let overworld = WorldDescriptor::new(Some("World"), 0);
        let end = WorldDescriptor::new(Some("World"), 1);
        let state = fixture.world_state();

        fixture.join(&state, &overworld);
        state.set_world_seed(-99);
        fixture.change(&state, &overworld, &end);

        let expected = carry_seed.then_some(-99);
        assert_eq!(state.known_world_seed(), expected, "carry_seed = {}", carry_seed);
    }
}

/// Leaving to the menu never carries the seed
#[test]
fn seed_is_dropped_when_leaving() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = Fixture::new(dir.path(), true);
    let world = WorldDescriptor::new(Some("World"), 0);
    let state = fixture.world_state();

    fixture.join(&state, &world);
    state.set_world_seed(5);
    fixture.leave(&state, &world);
    fixture.join(&state, &world);

    assert_eq!(state.known_world_seed(), None);
}

/// A corrupt document is ignored and defaults apply
#[test]
fn corrupt_document_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = Fixture::new(dir.path(), false);
    let world = WorldDescriptor::new(Some("World"), 0);
    let storage = fixture.config.storage_dir();
    fs::create_dir_all(&storage).unwrap();
    fs::write(storage.join("World_dim0.json"), "{ not json").unwrap();
    fs::write(storage.join("World.json"), "[1, 2]").unwrap();

    fixture.shapes.set(json!({ "kept": true }));
    let state = fixture.world_state();
    fixture.join(&state, &world);

    assert_eq!(fixture.shapes.value(), json!({ "kept": true }));
    assert_eq!(fixture.renderers.value(), json!({}));
    assert_eq!(state.distance_reference_point(), Vec3d::ZERO);
}

/// Worlds without a name share the fallback document
#[test]
fn unnamed_world_uses_fallback_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut fixture = Fixture::new(dir.path(), false);
    let world = WorldDescriptor::new(None, 0);
    let state = fixture.world_state();

    fixture.join(&state, &world);
    fixture.leave(&state, &world);

    assert!(fixture.config.storage_dir().join("hudsync_default.json").is_file());
}
