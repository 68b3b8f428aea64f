use std::sync::Arc;

use log::info;
use parking_lot::Mutex;
use serde_json::{json, Value};

use hudsync_shared::{
    pubsub::{
        constants::{
            CHANNEL_NAME, NODE_DROPPED_CHUNKS_HASH_SIZE, NODE_MS_PER_TICK, NODE_TICKS_PER_SECOND,
        },
        TypedValue,
    },
    structure::StructureMap,
    BlockPos, ChunkPos, Vec3d,
};

use crate::{
    chunks::ChunkTracker,
    commands::{
        parse_debug_command, scrape_system_message, CommandArgs, CommandOutcome, DebugCommand,
        Feedback, FeedbackKey, ObservedFact, SystemMessage,
    },
    config::WorldStateConfig,
    host::{ChunkHeights, WorldHost},
    identity::WorldIdentity,
    performance::{PerformanceMonitor, PerformanceSample},
    structures::{FileSource, GeneratorSource, NetworkSource, StructureCache, StructureGenerator},
    subscription::{SubscriptionChannel, SubscriptionReceipt},
    tasks::SimulationTasks,
    transport::PacketSender,
};

/// Channel the host routes structure broadcasts from the peer on.
pub const STRUCTURE_CHANNEL_NAME: &str = "carpet:structures";

/// Dropped-chunks tracking size assumed for a remote peer that never reported one.
pub const DEFAULT_DROPPED_CHUNKS_HASH_SIZE: i32 = 0xFFFF;

const KEY_DISTANCE_POS: &str = "distance_pos";

struct LocalState {
    identity: WorldIdentity,
    performance: PerformanceMonitor,
    chunks: ChunkTracker,
    dropped_chunks_hash_size: i32,
    distance_reference: Vec3d,
}

impl LocalState {
    fn new() -> Self {
        Self {
            identity: WorldIdentity::new(),
            performance: PerformanceMonitor::new(),
            chunks: ChunkTracker::new(),
            dropped_chunks_hash_size: 0,
            distance_reference: Vec3d::ZERO,
        }
    }
}

/// Everything known about the running world for one play session: structures, telemetry,
/// seed and spawn. Built once and handed to every call site; network receive calls may run
/// concurrently with the simulation-thread calls.
pub struct WorldState {
    config: WorldStateConfig,
    structures: Arc<StructureCache>,
    network_source: NetworkSource,
    subscriptions: SubscriptionChannel,
    tasks: Arc<SimulationTasks>,
    local: Mutex<LocalState>,
}

impl WorldState {
    pub fn new(config: WorldStateConfig, sender: Arc<dyn PacketSender>) -> Self {
        Self {
            config,
            structures: Arc::new(StructureCache::new()),
            network_source: NetworkSource::new(),
            subscriptions: SubscriptionChannel::new(sender),
            tasks: Arc::new(SimulationTasks::new()),
            local: Mutex::new(LocalState::new()),
        }
    }

    pub fn config(&self) -> &WorldStateConfig {
        &self.config
    }

    pub fn structures(&self) -> &Arc<StructureCache> {
        &self.structures
    }

    /// Deferred generator work; the simulation thread drains it once per tick.
    pub fn tasks(&self) -> &Arc<SimulationTasks> {
        &self.tasks
    }

    /// Reset for a new world: every validity flag, the structure cache and the subscription
    /// store are cleared, then the well-known nodes are subscribed again.
    pub fn on_session_start(&self) {
        {
            let mut local = self.local.lock();
            local.identity.clear();
            local.performance.reset();
        }
        self.structures.reset();
        let discarded = self.tasks.discard_pending();
        if discarded > 0 {
            info!("Discarded {} pending structure refresh(es)", discarded);
        }
        self.subscriptions.reset();
        self.subscriptions.auto_subscribe();
    }

    // Incoming data

    /// Route a custom payload from the peer. Returns whether the channel is one of ours.
    pub fn on_custom_payload(&self, channel: &str, payload: &[u8]) -> bool {
        match channel {
            CHANNEL_NAME => {
                self.on_subscription_packet(payload);
                true
            }
            STRUCTURE_CHANNEL_NAME => {
                self.on_structure_payload(payload);
                true
            }
            _ => false,
        }
    }

    pub fn on_structure_payload(&self, payload: &[u8]) {
        if let Some(seed) = self.network_source.receive(&self.structures, payload) {
            self.set_world_seed(seed);
        }
    }

    pub fn on_subscription_packet(&self, packet: &[u8]) {
        match self.subscriptions.receive(packet) {
            SubscriptionReceipt::Pending => {}
            SubscriptionReceipt::Discarded => self.local.lock().performance.mark_protocol_capable(),
            SubscriptionReceipt::Merged { .. } => self.refresh_from_subscriptions(),
        }
    }

    fn refresh_from_subscriptions(&self) {
        let ticks_per_second = self.subscriptions.number(NODE_TICKS_PER_SECOND);
        let ms_per_tick = self.subscriptions.number(NODE_MS_PER_TICK);
        let hash_size = self
            .subscriptions
            .value(NODE_DROPPED_CHUNKS_HASH_SIZE)
            .as_ref()
            .and_then(TypedValue::as_i32);

        let mut local = self.local.lock();
        local
            .performance
            .on_subscription_refresh(ticks_per_second, ms_per_tick);
        if let Some(hash_size) = hash_size {
            local.dropped_chunks_hash_size = hash_size;
        }
    }

    /// World-time heartbeat. Only used to estimate performance on a remote session.
    pub fn on_server_time_update(&self, total_world_time: i64, now_nanos: u64, host: &dyn WorldHost) {
        if host.is_self_hosted() {
            return;
        }
        self.local
            .lock()
            .performance
            .on_heartbeat(total_world_time, now_nanos);
    }

    /// Status text from the peer, e.g. the player list footer.
    pub fn on_status_text(&self, text: &str) -> bool {
        self.local.lock().performance.on_status_text(text)
    }

    // Per-tick work

    /// Simulation-thread tick: refresh direct performance figures and, when stale, the
    /// structure data.
    pub fn on_client_tick(&self, host: &dyn WorldHost) {
        if host.is_self_hosted() {
            if let Some(tick_times) = host.hosted_tick_times() {
                self.local.lock().performance.update_direct(&tick_times);
            }
        }
        self.update_structure_data(host);
    }

    /// Refresh the structure cache from the source matching the session kind, if the
    /// player has moved far enough. Returns whether a refresh was started.
    pub fn update_structure_data(&self, host: &dyn WorldHost) -> bool {
        let Some(player_pos) = host.player_position() else {
            return false;
        };

        if host.is_self_hosted() {
            let source = GeneratorSource::new(
                Arc::clone(&self.tasks),
                self.config.generator_hysteresis,
                self.config.max_structure_range(),
            );
            self.structures.request_refresh(player_pos, &source)
        } else if !self.structures.has_remote_data() {
            let directory = host
                .world_or_server_name()
                .map(|name| self.config.structure_dir(&name));
            let source = FileSource::new(directory, self.config.file_hysteresis);
            self.structures.request_refresh(player_pos, &source)
        } else {
            self.structures.request_refresh(player_pos, &self.network_source)
        }
    }

    /// Run deferred generator work. Must be called from the simulation thread.
    pub fn run_simulation_tasks(&self, generator: &dyn StructureGenerator) -> usize {
        self.tasks.run_pending(generator)
    }

    // Structures

    /// Copy of the structure cache; clears the changed flag.
    pub fn structure_snapshot(&self) -> StructureMap {
        self.structures.snapshot()
    }

    pub fn has_structure_data_changed(&self) -> bool {
        self.structures.is_dirty()
    }

    pub fn set_structures_need_update(&self) {
        self.structures.set_needs_update();
    }

    // Seed & spawn

    pub fn set_world_seed(&self, seed: i64) {
        self.local.lock().identity.set_seed(seed);
    }

    pub fn set_world_spawn(&self, spawn: BlockPos) {
        self.local.lock().identity.set_spawn(spawn);
    }

    /// Seed learned this session, without asking the host.
    pub fn known_world_seed(&self) -> Option<i64> {
        self.local.lock().identity.seed()
    }

    pub fn is_world_seed_known(&self, host: &dyn WorldHost) -> bool {
        self.known_world_seed().is_some() || hosted_seed(host).is_some()
    }

    /// The world seed, asking the self-hosted world when nothing was learned yet.
    pub fn world_seed(&self, host: &dyn WorldHost) -> Option<i64> {
        let mut local = self.local.lock();
        if let Some(seed) = local.identity.seed() {
            return Some(seed);
        }
        let seed = hosted_seed(host)?;
        local.identity.set_seed(seed);
        Some(seed)
    }

    pub fn is_world_spawn_known(&self, host: &dyn WorldHost) -> bool {
        self.local.lock().identity.spawn().is_some() || host.world_spawn().is_some()
    }

    /// The spawn point, taken from the loaded world when nothing was learned yet.
    pub fn world_spawn(&self, host: &dyn WorldHost) -> Option<BlockPos> {
        let mut local = self.local.lock();
        if let Some(spawn) = local.identity.spawn() {
            return Some(spawn);
        }
        let spawn = host.world_spawn()?;
        local.identity.set_spawn(spawn);
        Some(spawn)
    }

    // Telemetry

    pub fn performance_sample(&self) -> PerformanceSample {
        self.local.lock().performance.sample()
    }

    pub fn is_protocol_capable(&self) -> bool {
        self.local.lock().performance.is_protocol_capable()
    }

    pub fn subscribe<S: AsRef<str>>(&self, nodes: &[S]) {
        self.subscriptions.subscribe(nodes);
    }

    pub fn unsubscribe<S: AsRef<str>>(&self, nodes: &[S]) {
        self.subscriptions.unsubscribe(nodes);
    }

    pub fn subscription_value(&self, path: &str) -> Option<TypedValue> {
        self.subscriptions.value(path)
    }

    /// Explicitly set size when positive, else the self-hosted world's current size, else
    /// [`DEFAULT_DROPPED_CHUNKS_HASH_SIZE`].
    pub fn dropped_chunks_hash_size(&self, host: &dyn WorldHost) -> i32 {
        let explicit = self.local.lock().dropped_chunks_hash_size;
        if explicit > 0 {
            return explicit;
        }
        if host.is_self_hosted() {
            return host
                .hosted_dropped_chunks_hash_size()
                .unwrap_or(DEFAULT_DROPPED_CHUNKS_HASH_SIZE);
        }
        DEFAULT_DROPPED_CHUNKS_HASH_SIZE
    }

    pub fn set_dropped_chunks_hash_size(&self, size: i32) {
        self.local.lock().dropped_chunks_hash_size = size;
    }

    pub fn distance_reference_point(&self) -> Vec3d {
        self.local.lock().distance_reference
    }

    pub fn set_distance_reference_point(&self, pos: Vec3d) -> Feedback {
        self.local.lock().distance_reference = pos;
        Feedback::new(FeedbackKey::DistanceReferencePointSet).with_arg(pos)
    }

    // Chunks

    pub fn mark_chunk_for_heightmap_check(&self, chunk: ChunkPos) {
        self.local.lock().chunks.mark_for_heightmap_check(chunk);
    }

    /// Recompute queued chunks; pass `None` when no world is loaded.
    pub fn check_queued_heightmaps(&self, heights: Option<&dyn ChunkHeights>) {
        self.local.lock().chunks.check_queued_heightmaps(heights);
    }

    pub fn on_chunk_unload(&self, chunk: ChunkPos) {
        self.local.lock().chunks.on_chunk_unload(chunk);
    }

    pub fn spawnable_sub_chunk_count(&self, chunk: ChunkPos) -> i32 {
        self.local.lock().chunks.spawnable_sub_chunk_count(chunk)
    }

    // Text side-channel

    /// Handle an outgoing chat line if it is one of the debug commands. Commands only read
    /// and write local state.
    pub fn on_chat_command(&self, message: &str, host: &dyn WorldHost) -> CommandOutcome {
        let Some(command) = parse_debug_command(&self.config.command_prefix, message) else {
            return CommandOutcome::NotACommand;
        };

        let feedback = match command {
            DebugCommand::Seed(CommandArgs::Set(value)) => match value.parse::<i64>() {
                Ok(seed) => {
                    self.set_world_seed(seed);
                    Some(Feedback::new(FeedbackKey::SeedSet).with_arg(seed))
                }
                Err(_) => Some(Feedback::new(FeedbackKey::InvalidSeed)),
            },
            DebugCommand::Seed(CommandArgs::Query) => self
                .known_world_seed()
                .map(|seed| Feedback::new(FeedbackKey::SeedSet).with_arg(seed)),
            DebugCommand::DroppedChunksHashSize(CommandArgs::Set(value)) => {
                match value.parse::<i32>() {
                    Ok(size) => {
                        self.set_dropped_chunks_hash_size(size);
                        Some(Feedback::new(FeedbackKey::DroppedChunksHashSizeSet).with_arg(size))
                    }
                    Err(_) => Some(Feedback::new(FeedbackKey::InvalidDroppedChunksHashSize)),
                }
            }
            DebugCommand::DroppedChunksHashSize(CommandArgs::Query) => Some(
                Feedback::new(FeedbackKey::DroppedChunksHashSizeSet)
                    .with_arg(self.dropped_chunks_hash_size(host)),
            ),
            DebugCommand::Seed(CommandArgs::Unsupported)
            | DebugCommand::DroppedChunksHashSize(CommandArgs::Unsupported) => None,
        };

        CommandOutcome::Handled(feedback)
    }

    /// Learn the seed or spawn point from an announcing system message.
    pub fn on_system_message(&self, message: &SystemMessage) -> Option<Feedback> {
        match scrape_system_message(message)? {
            ObservedFact::Seed(seed) => {
                self.set_world_seed(seed);
                info!("Received world seed from '{}': {}", message.key, seed);
                Some(Feedback::new(FeedbackKey::SeedSet).with_arg(seed))
            }
            ObservedFact::Spawn(spawn) => {
                self.set_world_spawn(spawn);
                info!("Received world spawn from '{}': {}", message.key, spawn);
                Some(Feedback::new(FeedbackKey::SpawnSet).with_arg(spawn))
            }
        }
    }

    // Persistence

    /// The `data_storage` section of the per-dimension document.
    pub fn to_json(&self) -> Value {
        let pos = self.distance_reference_point();
        json!({ KEY_DISTANCE_POS: [pos.x, pos.y, pos.z] })
    }

    /// Restore from a `data_storage` section; missing or malformed fields fall back to
    /// their defaults.
    pub fn from_json(&self, value: &Value) {
        let pos = value
            .get(KEY_DISTANCE_POS)
            .and_then(vec3d_from_json)
            .unwrap_or(Vec3d::ZERO);
        self.local.lock().distance_reference = pos;
    }
}

fn hosted_seed(host: &dyn WorldHost) -> Option<i64> {
    if !host.is_self_hosted() {
        return None;
    }
    host.hosted_world_seed(host.dimension()?)
}

fn vec3d_from_json(value: &Value) -> Option<Vec3d> {
    match value.as_array()?.as_slice() {
        [x, y, z] => Some(Vec3d::new(x.as_f64()?, y.as_f64()?, z.as_f64()?)),
        _ => None,
    }
}
