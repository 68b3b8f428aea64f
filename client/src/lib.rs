//! # Hudsync Client
//! World-state reconciliation and telemetry cache. Merges what is known about a running
//! world (generated structures, tick performance, seed and spawn) from the local generator,
//! stored structure files and a remote peer into one consistent, dirty-tracked view.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

pub use hudsync_shared as shared;

mod chunks;
mod commands;
mod config;
mod host;
mod identity;
mod performance;
mod subscription;
mod tasks;
mod transport;
mod world_state;

pub mod session;
pub mod structures;

pub use chunks::{spawnable_sub_chunks, ChunkTracker, UNKNOWN_SUB_CHUNK_COUNT};
pub use commands::{
    parse_debug_command, scrape_system_message, CommandArgs, CommandOutcome, DebugCommand,
    Feedback, FeedbackKey, ObservedFact, SystemMessage, EXTENDED_SEED_MESSAGE_KEY,
    SEED_MESSAGE_KEY, SPAWN_MESSAGE_KEY,
};
pub use config::WorldStateConfig;
pub use host::{ChunkColumn, ChunkHeights, WorldHost};
pub use identity::WorldIdentity;
pub use performance::{
    strip_formatting_codes, ticks_per_second_for, PerformanceMonitor, PerformanceSample,
    Provenance, TickTimeRing, TICK_TIME_SLOTS,
};
pub use subscription::{SubscriptionChannel, SubscriptionReceipt, SubscriptionStore};
pub use tasks::{SimulationTask, SimulationTasks};
pub use transport::{PacketSender, SendError};
pub use world_state::{WorldState, DEFAULT_DROPPED_CHUNKS_HASH_SIZE, STRUCTURE_CHANNEL_NAME};
