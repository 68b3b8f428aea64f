use log::{info, warn};
use serde_json::{json, Map, Value};

use crate::{
    config::WorldStateConfig,
    session::storage::{DocumentKind, SessionStorage},
    world_state::WorldState,
};

const KEY_SHAPES: &str = "shapes";
const KEY_DATA_STORAGE: &str = "data_storage";
const KEY_RENDERERS: &str = "renderers";

/// A section of a session document owned by another part of the host.
pub trait PersistedSection: Send {
    fn to_json(&self) -> Value;

    fn from_json(&mut self, value: &Value);

    /// Drop in-memory state before a world is loaded.
    fn clear(&mut self) {}
}

/// The world a transition leaves or enters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldDescriptor {
    /// Local world or server name; `None` stores under the fallback name.
    pub name: Option<String>,
    pub dimension: i32,
}

impl WorldDescriptor {
    pub fn new(name: Option<&str>, dimension: i32) -> Self {
        Self {
            name: name.map(str::to_string),
            dimension,
        }
    }
}

/// Saves and restores the session documents around world transitions, and carries the
/// known seed across a dimension change when configured to.
pub struct SessionLifecycle {
    storage: SessionStorage,
    shapes: Box<dyn PersistedSection>,
    renderers: Box<dyn PersistedSection>,
    renderers_read: bool,
    carry_seed: bool,
    carried_seed: Option<i64>,
}

impl SessionLifecycle {
    pub fn new(
        storage: SessionStorage,
        shapes: Box<dyn PersistedSection>,
        renderers: Box<dyn PersistedSection>,
        carry_seed: bool,
    ) -> Self {
        Self {
            storage,
            shapes,
            renderers,
            renderers_read: false,
            carry_seed,
            carried_seed: None,
        }
    }

    /// Build from the host configuration: its storage directory and the seed carry option.
    pub fn from_config(
        config: &WorldStateConfig,
        shapes: Box<dyn PersistedSection>,
        renderers: Box<dyn PersistedSection>,
    ) -> Self {
        Self::new(
            SessionStorage::from_config(config),
            shapes,
            renderers,
            config.dont_reset_seed_on_dimension_change,
        )
    }

    pub fn shapes(&self) -> &dyn PersistedSection {
        self.shapes.as_ref()
    }

    pub fn renderers(&self) -> &dyn PersistedSection {
        self.renderers.as_ref()
    }

    /// Before the world changes from `current` to `next`. Saves what the outgoing world
    /// owns while it is still available.
    pub fn on_world_load_pre(
        &mut self,
        state: &WorldState,
        current: Option<&WorldDescriptor>,
        next: Option<&WorldDescriptor>,
    ) {
        match current {
            Some(current) => {
                self.save_dimension(state, current);

                // leaving to the menu
                if next.is_none() {
                    self.save_global(current);
                    self.renderers_read = false;
                }

                self.carried_seed = match next {
                    Some(_) if self.carry_seed => state.known_world_seed(),
                    _ => None,
                };
            }
            None => {
                if let Some(next) = next {
                    self.load_global(next);
                }
                self.carried_seed = None;
            }
        }
    }

    /// After the world changed to `next`: reset the world state and restore the incoming
    /// world's documents.
    pub fn on_world_load_post(&mut self, state: &WorldState, next: Option<&WorldDescriptor>) {
        self.shapes.clear();
        state.on_session_start();

        if let Some(next) = next {
            self.load_dimension(state, next);
            if let Some(seed) = self.carried_seed.take() {
                info!("Keeping the world seed {} across the dimension change", seed);
                state.set_world_seed(seed);
            }
        }
    }

    fn save_dimension(&self, state: &WorldState, world: &WorldDescriptor) {
        let document = json!({
            KEY_SHAPES: self.shapes.to_json(),
            KEY_DATA_STORAGE: state.to_json(),
        });
        self.save(world, DocumentKind::Dimension(world.dimension), &document);
    }

    fn save_global(&self, world: &WorldDescriptor) {
        let document = json!({ KEY_RENDERERS: self.renderers.to_json() });
        self.save(world, DocumentKind::Global, &document);
    }

    fn save(&self, world: &WorldDescriptor, kind: DocumentKind, document: &Value) {
        let path = self.storage.path(world.name.as_deref(), kind);
        if let Err(error) = self.storage.write(&path, document) {
            warn!("{}", error);
        }
    }

    fn load_dimension(&mut self, state: &WorldState, world: &WorldDescriptor) {
        let Some(root) = self.load(world, DocumentKind::Dimension(world.dimension)) else {
            return;
        };
        if let Some(shapes) = object(&root, KEY_SHAPES) {
            self.shapes.from_json(shapes);
        }
        if let Some(data) = object(&root, KEY_DATA_STORAGE) {
            state.from_json(data);
        }
    }

    /// The global document is read at most once until the player leaves to the menu.
    fn load_global(&mut self, world: &WorldDescriptor) {
        if self.renderers_read {
            return;
        }
        let Some(root) = self.load(world, DocumentKind::Global) else {
            return;
        };
        if let Some(renderers) = object(&root, KEY_RENDERERS) {
            self.renderers.from_json(renderers);
            self.renderers_read = true;
        }
    }

    fn load(&self, world: &WorldDescriptor, kind: DocumentKind) -> Option<Map<String, Value>> {
        let path = self.storage.path(world.name.as_deref(), kind);
        match self.storage.read(&path) {
            Ok(Some(Value::Object(root))) => Some(root),
            Ok(_) => None,
            Err(error) => {
                warn!("{}", error);
                None
            }
        }
    }
}

fn object<'a>(root: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    root.get(key).filter(|value| value.is_object())
}
