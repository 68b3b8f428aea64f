/// Integration tests for the structure cache and the three ways it is filled: peer
/// broadcasts, the self-hosted world generator and stored data files.
use std::{fs, sync::Arc, thread};

use hudsync_client::{
    structures::{read_structure_directory, FeatureKind, GeneratorKind, StructureCache},
    WorldState, WorldStateConfig, STRUCTURE_CHANNEL_NAME,
};
use hudsync_shared::{
    nbt::write_compressed,
    structure::{encode_bulk, encode_chunked, StructureMap, StructureType, KIND_BULK},
    BlockPos,
};
use hudsync_test::{
    init_logging, raw_nbt, record, spread_records, structure_data_tree, RecordingSender,
    TestGenerator, TestHost,
};

fn world_state(config: WorldStateConfig) -> WorldState {
    init_logging();
    let state = WorldState::new(config, Arc::new(RecordingSender::new()));
    state.on_session_start();
    state
}

// Peer broadcasts

/// A chunked transfer ends with the same cache content as one bulk message
#[test]
fn chunked_transfer_matches_bulk() {
    let records = spread_records(600);

    let bulk = world_state(WorldStateConfig::default());
    assert!(bulk.on_custom_payload(STRUCTURE_CHANNEL_NAME, &encode_bulk(-4172144997902289642, &records)));

    let chunked = world_state(WorldStateConfig::default());
    let messages = encode_chunked(-4172144997902289642, &records, 255);
    assert_eq!(messages.len(), 4);
    for message in &messages {
        assert!(chunked.on_custom_payload(STRUCTURE_CHANNEL_NAME, message));
    }

    let expected: StructureMap = records.into_iter().collect();
    assert_eq!(bulk.structure_snapshot(), expected);
    assert_eq!(chunked.structure_snapshot(), expected);
    assert_eq!(chunked.known_world_seed(), Some(-4172144997902289642));
    assert_eq!(bulk.known_world_seed(), Some(-4172144997902289642));
}

/// A chunked header empties the cache before any body arrives
#[test]
fn chunked_header_clears_previous_data() {
    let state = world_state(WorldStateConfig::default());
    state.on_structure_payload(&encode_bulk(1, &spread_records(12)));
    assert_eq!(state.structures().len(), 12);

    let messages = encode_chunked(2, &spread_records(3), 255);
    state.on_structure_payload(&messages[0]);
    assert!(state.structures().is_empty());
    assert!(state.has_structure_data_changed());
    assert_eq!(state.known_world_seed(), Some(2));

    state.on_structure_payload(&messages[1]);
    assert_eq!(state.structures().len(), 3);
}

/// A message of unknown kind is dropped and the cache stays as it was
#[test]
fn unknown_message_kind_leaves_cache_unchanged() {
    let state = world_state(WorldStateConfig::default());
    state.on_structure_payload(&encode_bulk(9, &spread_records(5)));
    let before = state.structure_snapshot();

    let mut payload = 99i32.to_be_bytes().to_vec();
    payload.extend_from_slice(&[10, 0, 0, 0]);
    state.on_structure_payload(&payload);

    assert!(!state.has_structure_data_changed());
    assert_eq!(state.structure_snapshot(), before);
}

/// Payloads too short to carry a body are ignored
#[test]
fn short_payload_is_ignored() {
    let state = world_state(WorldStateConfig::default());
    state.on_structure_payload(&KIND_BULK.to_be_bytes());

    assert!(!state.structures().has_remote_data());
    assert_eq!(state.known_world_seed(), None);
}

/// Once the peer has pushed data, a remote session stops polling stored files
#[test]
fn remote_data_stops_file_polling() {
    let dir = tempfile::tempdir().unwrap();
    let config = WorldStateConfig {
        config_dir: dir.path().to_path_buf(),
        ..WorldStateConfig::default()
    };
    let state = world_state(config);
    let host = TestHost::remote(Some("server"));

    assert!(state.update_structure_data(&host));
    state.on_structure_payload(&encode_bulk(3, &spread_records(2)));

    state.set_structures_need_update();
    assert!(!state.update_structure_data(&host));
    assert_eq!(state.structures().len(), 2);
}

// Snapshots

/// The changed flag is cleared by taking a snapshot and raised by the next mutation
#[test]
fn snapshot_clears_changed_flag() {
    let state = world_state(WorldStateConfig::default());
    assert!(!state.has_structure_data_changed());

    state.on_structure_payload(&encode_bulk(1, &spread_records(4)));
    assert!(state.has_structure_data_changed());
    assert_eq!(state.structure_snapshot().len(), 4);
    assert!(!state.has_structure_data_changed());

    let messages = encode_chunked(1, &spread_records(1), 1);
    state.on_structure_payload(&messages[1]);
    assert!(state.has_structure_data_changed());
}

/// A reader polling the flag never misses the final content written by another thread
#[test]
fn concurrent_snapshots_see_final_content() {
    let cache = Arc::new(StructureCache::new());
    let writer = {
        let cache = Arc::clone(&cache);
        thread::spawn(move || {
            for i in 0..200 {
                cache.replace_remote(spread_records(i % 7 + 1).into_iter().collect());
            }
        })
    };

    let mut seen = StructureMap::new();
    while !writer.is_finished() {
        if cache.is_dirty() {
            seen = cache.snapshot();
        }
    }
    writer.join().unwrap();
    if cache.is_dirty() {
        seen = cache.snapshot();
    }

    let expected: StructureMap = spread_records(199 % 7 + 1).into_iter().collect();
    assert_eq!(seen, expected);
}

// Local generator

fn overworld() -> TestGenerator {
    TestGenerator::new(GeneratorKind::Overworld)
        .with_start(FeatureKind::Village, 0, 0, &["ViStart", "ViSR"])
        .with_start(FeatureKind::Village, 2000, 0, &["ViStart"])
        .with_start(FeatureKind::ScatteredFeature, 100, 100, &["TeDP"])
        .with_start(FeatureKind::ScatteredFeature, -100, 50, &["TeJP", "TeJP"])
        .with_start(FeatureKind::Fortress, 0, 0, &["NeStart"])
}

/// Generator work waits for the simulation thread, then fills the cache within range
#[test]
fn generator_refresh_runs_on_simulation_thread() {
    let state = world_state(WorldStateConfig::default());
    let host = TestHost::self_hosted(1234);

    assert!(state.update_structure_data(&host));
    assert!(state.structures().is_empty());
    assert_eq!(state.tasks().len(), 1);

    assert_eq!(state.run_simulation_tasks(&overworld()), 1);
    let structures = state.structure_snapshot();
    assert_eq!(structures.get(StructureType::Village).len(), 1);
    assert_eq!(structures.get(StructureType::DesertPyramid).len(), 1);
    assert_eq!(structures.get(StructureType::JungleTemple).len(), 0);
    assert_eq!(structures.get(StructureType::NetherFortress).len(), 0);
    assert_eq!(structures.len(), 2);
}

/// The generator is polled again only after the player moves the full hysteresis distance
#[test]
fn generator_refresh_follows_hysteresis() {
    let state = world_state(WorldStateConfig::default());
    let host = TestHost::self_hosted(1234);
    host.move_player(BlockPos::new(0, 64, 0));
    assert!(state.update_structure_data(&host));
    state.run_simulation_tasks(&overworld());

    host.move_player(BlockPos::new(31, 64, -31));
    assert!(!state.update_structure_data(&host));
    assert!(state.tasks().is_empty());

    host.move_player(BlockPos::new(0, 64, 32));
    assert!(state.update_structure_data(&host));
    assert_eq!(state.tasks().len(), 1);
    state.run_simulation_tasks(&overworld());

    state.set_structures_need_update();
    assert!(state.update_structure_data(&host));
}

/// Work scheduled in one session never runs in the next
#[test]
fn session_start_discards_pending_generator_work() {
    let state = world_state(WorldStateConfig::default());
    assert!(state.update_structure_data(&TestHost::self_hosted(7)));

    state.on_session_start();
    assert_eq!(state.run_simulation_tasks(&overworld()), 0);
    assert!(state.structures().is_empty());
}

/// A peer broadcast that lands while generator work is queued is not overwritten by it
#[test]
fn queued_generator_work_yields_to_peer_data() {
    let state = world_state(WorldStateConfig::default());
    assert!(state.update_structure_data(&TestHost::self_hosted(1234)));
    assert_eq!(state.tasks().len(), 1);

    let records = spread_records(3);
    state.on_structure_payload(&encode_bulk(5, &records));
    assert_eq!(state.run_simulation_tasks(&overworld()), 1);

    let expected: StructureMap = records.into_iter().collect();
    assert_eq!(state.structure_snapshot(), expected);
    assert!(state.structures().has_remote_data());
}

// Stored files

/// Stored files of the named server fill the cache without any range filter
#[test]
fn stored_files_fill_remote_cache() {
    let dir = tempfile::tempdir().unwrap();
    let config = WorldStateConfig {
        config_dir: dir.path().to_path_buf(),
        ..WorldStateConfig::default()
    };
    let structure_dir = config.structure_dir("My Server");
    fs::create_dir_all(&structure_dir).unwrap();
    fs::write(
        structure_dir.join("Village.dat"),
        raw_nbt(&structure_data_tree("Village", &[(50_000, 50_000, &["ViStart"])])),
    )
    .unwrap();
    fs::write(
        structure_dir.join("Temple.dat"),
        write_compressed(&structure_data_tree(
            "Temple",
            &[(0, 0, &["Iglu"]), (64, 0, &["TeSH"]), (128, 0, &["TeSH", "TeSH"])],
        ))
        .unwrap(),
    )
    .unwrap();

    let state = world_state(config);
    assert!(state.update_structure_data(&TestHost::remote(Some("My Server"))));

    let structures = state.structure_snapshot();
    assert_eq!(structures.get(StructureType::Village).len(), 1);
    assert_eq!(structures.get(StructureType::Igloo).len(), 1);
    assert_eq!(structures.get(StructureType::WitchHut).len(), 1);
    assert_eq!(structures.len(), 3);
}

/// Without stored files the remote cache is simply empty
#[test]
fn absent_files_leave_cache_empty() {
    let dir = tempfile::tempdir().unwrap();
    let config = WorldStateConfig {
        config_dir: dir.path().to_path_buf(),
        ..WorldStateConfig::default()
    };
    let state = world_state(config);

    assert!(state.update_structure_data(&TestHost::remote(Some("Elsewhere"))));
    assert!(state.structures().is_empty());
    assert!(!state.structures().has_remote_data());
}

/// Compressed and uncompressed files hold the same structures
#[test]
fn compressed_and_raw_files_agree() {
    let tree = structure_data_tree("Stronghold", &[(0, 0, &["SHStart"]), (-640, 320, &[])]);
    let raw = tempfile::tempdir().unwrap();
    let gzip = tempfile::tempdir().unwrap();
    fs::write(raw.path().join("Stronghold.dat"), raw_nbt(&tree)).unwrap();
    fs::write(gzip.path().join("Stronghold.dat"), write_compressed(&tree).unwrap()).unwrap();

    let from_raw = read_structure_directory(raw.path());
    assert_eq!(from_raw.get(StructureType::Stronghold).len(), 2);
    assert_eq!(from_raw, read_structure_directory(gzip.path()));
}

/// Records built for the broadcast tests classify as the kind they were built with
#[test]
fn builder_records_keep_their_kind() {
    for kind in StructureType::ALL {
        assert_eq!(record(kind, 0, 0).kind(), kind);
    }
}
