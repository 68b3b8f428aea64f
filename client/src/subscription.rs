use std::{collections::HashMap, sync::Arc};

use log::{debug, warn};
use parking_lot::Mutex;

use hudsync_shared::{
    pubsub::{
        constants::{AUTO_SUBSCRIBED_NODES, CHANNEL_NAME},
        PeerMessage, SubscriptionRequest, TypedValue, UpdateBatch,
    },
    splitter::{split, MAX_TOTAL_PER_PACKET_C2S},
    PacketSplitter,
};

use crate::transport::PacketSender;

/// Latest value of every node the peer has reported this session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SubscriptionStore {
    nodes: HashMap<String, TypedValue>,
}

impl SubscriptionStore {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
        }
    }

    /// Merge a batch, later entries winning per path. Paths absent from the batch keep
    /// their value.
    pub fn merge(&mut self, batch: UpdateBatch) {
        for (path, value) in batch.nodes {
            self.nodes.insert(path, value);
        }
    }

    pub fn get(&self, path: &str) -> Option<&TypedValue> {
        self.nodes.get(path)
    }

    /// Numeric value of a node, whatever its numeric width.
    pub fn number(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(TypedValue::as_f64)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn clear(&mut self) {
        self.nodes.clear();
    }
}

/// Result of feeding one transport packet to the channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubscriptionReceipt {
    /// Part of a split payload; more packets are needed.
    Pending,
    /// A complete update was merged into the store.
    Merged { nodes: usize },
    /// A complete payload arrived but could not be decoded. The store is unchanged.
    Discarded,
}

/// Named logical channel carrying node subscriptions to the peer and node updates back.
pub struct SubscriptionChannel {
    sender: Arc<dyn PacketSender>,
    splitter: Mutex<PacketSplitter>,
    store: Mutex<SubscriptionStore>,
}

impl SubscriptionChannel {
    pub fn new(sender: Arc<dyn PacketSender>) -> Self {
        Self {
            sender,
            splitter: Mutex::new(PacketSplitter::default()),
            store: Mutex::new(SubscriptionStore::new()),
        }
    }

    pub fn subscribe<S: AsRef<str>>(&self, nodes: &[S]) {
        self.send(SubscriptionRequest::subscribe(nodes));
    }

    pub fn unsubscribe<S: AsRef<str>>(&self, nodes: &[S]) {
        self.send(SubscriptionRequest::unsubscribe(nodes));
    }

    /// Subscribe to the tick rate, tick duration and dropped-chunk tracking nodes.
    pub fn auto_subscribe(&self) {
        self.subscribe(&AUTO_SUBSCRIBED_NODES);
    }

    fn send(&self, request: SubscriptionRequest) {
        for packet in split(&request.encode(), MAX_TOTAL_PER_PACKET_C2S) {
            if let Err(error) = self.sender.send(CHANNEL_NAME, &packet) {
                warn!("Failed to send {:?} request: {}", request.kind, error);
                return;
            }
        }
    }

    /// Feed one transport packet received on the channel.
    pub fn receive(&self, packet: &[u8]) -> SubscriptionReceipt {
        let payload = match self.splitter.lock().receive(CHANNEL_NAME, packet) {
            Ok(Some(payload)) => payload,
            Ok(None) => return SubscriptionReceipt::Pending,
            Err(error) => {
                warn!("Dropping subscription payload: {}", error);
                return SubscriptionReceipt::Discarded;
            }
        };

        match PeerMessage::decode(&payload) {
            Ok(PeerMessage::Update(batch)) => {
                let nodes = batch.len();
                self.store.lock().merge(batch);
                debug!("Merged {} subscription node(s)", nodes);
                SubscriptionReceipt::Merged { nodes }
            }
            Err(error) => {
                warn!("Failed to read subscription update: {}", error);
                SubscriptionReceipt::Discarded
            }
        }
    }

    pub fn value(&self, path: &str) -> Option<TypedValue> {
        self.store.lock().get(path).cloned()
    }

    pub fn number(&self, path: &str) -> Option<f64> {
        self.store.lock().number(path)
    }

    /// Copy of the whole store.
    pub fn store(&self) -> SubscriptionStore {
        self.store.lock().clone()
    }

    /// Forget all values and any partially received payload.
    pub fn reset(&self) {
        self.store.lock().clear();
        self.splitter.lock().clear();
    }
}
