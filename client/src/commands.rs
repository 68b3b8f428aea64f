use log::warn;

use hudsync_shared::BlockPos;

/// Message shown to the user after a debug command or an observed system message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FeedbackKey {
    SeedSet,
    InvalidSeed,
    DroppedChunksHashSizeSet,
    InvalidDroppedChunksHashSize,
    SpawnSet,
    DistanceReferencePointSet,
}

impl FeedbackKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackKey::SeedSet => "seed_set",
            FeedbackKey::InvalidSeed => "invalid_seed",
            FeedbackKey::DroppedChunksHashSizeSet => "dropped_chunks_hash_size_set",
            FeedbackKey::InvalidDroppedChunksHashSize => "invalid_dropped_chunks_hash_size",
            FeedbackKey::SpawnSet => "spawn_set",
            FeedbackKey::DistanceReferencePointSet => "distance_reference_point_set",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self,
            FeedbackKey::InvalidSeed | FeedbackKey::InvalidDroppedChunksHashSize
        )
    }
}

/// A translation key plus its format arguments, rendered by the host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    pub key: FeedbackKey,
    pub args: Vec<String>,
}

impl Feedback {
    pub fn new(key: FeedbackKey) -> Self {
        Self {
            key,
            args: Vec::new(),
        }
    }

    pub fn with_arg(mut self, arg: impl ToString) -> Self {
        self.args.push(arg.to_string());
        self
    }

    /// Full translation key, e.g. `hudsync.message.seed_set`.
    pub fn translation_key(&self, mod_id: &str) -> String {
        if self.key.is_error() {
            format!("{}.message.error.{}", mod_id, self.key.as_str())
        } else {
            format!("{}.message.{}", mod_id, self.key.as_str())
        }
    }
}

/// What became of an outgoing chat line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Not a debug command; the host sends the line on as usual.
    NotACommand,
    /// Consumed as a debug command, with the feedback to show, if any.
    Handled(Option<Feedback>),
}

/// Argument shape of a debug command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CommandArgs<'a> {
    Query,
    Set(&'a str),
    /// More than one argument; consumed without effect.
    Unsupported,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DebugCommand<'a> {
    Seed(CommandArgs<'a>),
    DroppedChunksHashSize(CommandArgs<'a>),
}

/// Recognize `<prefix>-seed [value]` and `<prefix>-dropped-chunks-hash-size [value]`.
pub fn parse_debug_command<'a>(prefix: &str, message: &'a str) -> Option<DebugCommand<'a>> {
    let mut parts: Vec<&str> = message.split(' ').collect();
    while parts.last() == Some(&"") {
        parts.pop();
    }

    let (name, args) = parts.split_first()?;
    let args = match args {
        [] => CommandArgs::Query,
        [value] => CommandArgs::Set(*value),
        _ => CommandArgs::Unsupported,
    };
    let command = name.strip_prefix(prefix)?.strip_prefix('-')?;

    match command {
        "seed" => Some(DebugCommand::Seed(args)),
        "dropped-chunks-hash-size" => Some(DebugCommand::DroppedChunksHashSize(args)),
        _ => None,
    }
}

/// A localized system message: its translation key and rendered arguments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SystemMessage {
    pub key: String,
    pub args: Vec<String>,
}

impl SystemMessage {
    pub fn new(key: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            key: key.into(),
            args,
        }
    }
}

/// World facts announced by system messages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ObservedFact {
    Seed(i64),
    Spawn(BlockPos),
}

pub const SEED_MESSAGE_KEY: &str = "commands.seed.success";
pub const EXTENDED_SEED_MESSAGE_KEY: &str = "jed.commands.seed.success";
pub const SPAWN_MESSAGE_KEY: &str = "commands.setworldspawn.success";

/// Extract a seed or spawn point from a known system message. Unparsable arguments are
/// logged and yield nothing.
pub fn scrape_system_message(message: &SystemMessage) -> Option<ObservedFact> {
    match message.key.as_str() {
        SEED_MESSAGE_KEY => parse_seed(message.args.first()?),
        EXTENDED_SEED_MESSAGE_KEY => parse_seed(message.args.get(1)?),
        SPAWN_MESSAGE_KEY if message.args.len() == 3 => {
            let coords: Result<Vec<i32>, _> =
                message.args.iter().map(|arg| arg.trim().parse::<i32>()).collect();
            match coords.as_deref() {
                Ok([x, y, z]) => Some(ObservedFact::Spawn(BlockPos::new(*x, *y, *z))),
                _ => {
                    warn!("Failed to read the world spawn point from {:?}", message.args);
                    None
                }
            }
        }
        _ => None,
    }
}

fn parse_seed(arg: &str) -> Option<ObservedFact> {
    match arg.trim().parse::<i64>() {
        Ok(seed) => Some(ObservedFact::Seed(seed)),
        Err(error) => {
            warn!("Failed to read the world seed from '{}': {}", arg, error);
            None
        }
    }
}
