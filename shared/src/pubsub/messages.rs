use hudsync_serde::{read_bounded_string, ByteReader, ByteWriter, Serde, VarInt, MAX_STRING_CHARS};

use crate::pubsub::{
    constants::{PACKET_C2S_SUBSCRIBE, PACKET_C2S_UNSUBSCRIBE, PACKET_S2C_UPDATE},
    error::PubSubError,
    typed_value::TypedValue,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SubscriptionKind {
    Subscribe,
    Unsubscribe,
}

impl SubscriptionKind {
    pub fn packet_id(&self) -> i32 {
        match self {
            SubscriptionKind::Subscribe => PACKET_C2S_SUBSCRIBE,
            SubscriptionKind::Unsubscribe => PACKET_C2S_UNSUBSCRIBE,
        }
    }

    pub fn from_packet_id(id: i32) -> Option<Self> {
        match id {
            PACKET_C2S_SUBSCRIBE => Some(SubscriptionKind::Subscribe),
            PACKET_C2S_UNSUBSCRIBE => Some(SubscriptionKind::Unsubscribe),
            _ => None,
        }
    }
}

/// Client-to-peer request to (un)subscribe a list of node paths.
///
/// `[id:varint][count:varint][path:string]*count`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubscriptionRequest {
    pub kind: SubscriptionKind,
    pub nodes: Vec<String>,
}

impl SubscriptionRequest {
    pub fn subscribe<S: AsRef<str>>(nodes: &[S]) -> Self {
        Self::new(SubscriptionKind::Subscribe, nodes)
    }

    pub fn unsubscribe<S: AsRef<str>>(nodes: &[S]) -> Self {
        Self::new(SubscriptionKind::Unsubscribe, nodes)
    }

    fn new<S: AsRef<str>>(kind: SubscriptionKind, nodes: &[S]) -> Self {
        Self {
            kind,
            nodes: nodes.iter().map(|node| node.as_ref().to_string()).collect(),
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        VarInt::new(self.kind.packet_id()).ser(&mut writer);
        VarInt::from_len(self.nodes.len()).ser(&mut writer);
        for node in &self.nodes {
            node.ser(&mut writer);
        }
        writer.to_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, PubSubError> {
        let mut reader = ByteReader::new(bytes);
        let id = VarInt::de(&mut reader)?.get();
        let kind = SubscriptionKind::from_packet_id(id).ok_or(PubSubError::UnknownPacketId { id })?;

        let count = VarInt::de_len(&mut reader)?;
        let mut nodes = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            nodes.push(read_bounded_string(&mut reader, MAX_STRING_CHARS)?);
        }
        Ok(Self { kind, nodes })
    }
}

/// One batch of node values pushed by the peer, in wire order. A path may appear more than
/// once; the later entry wins when merged.
///
/// `[count:varint]([path:string][type:varint][value])*count`
#[derive(Clone, Debug, PartialEq, Default)]
pub struct UpdateBatch {
    pub nodes: Vec<(String, TypedValue)>,
}

impl UpdateBatch {
    pub fn new() -> Self {
        Self { nodes: Vec::new() }
    }

    pub fn with(mut self, path: impl Into<String>, value: TypedValue) -> Self {
        self.nodes.push((path.into(), value));
        self
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Decodes the whole batch or nothing.
    pub fn read(reader: &mut ByteReader) -> Result<Self, PubSubError> {
        let count = VarInt::de_len(reader)?;
        let mut nodes = Vec::with_capacity(count.min(reader.remaining()));
        for _ in 0..count {
            let path = read_bounded_string(reader, MAX_STRING_CHARS)?;
            let value = TypedValue::read(reader)?;
            nodes.push((path, value));
        }
        Ok(Self { nodes })
    }

    /// Full peer-to-client packet, including the update id.
    pub fn encode(&self) -> Vec<u8> {
        let mut writer = ByteWriter::new();
        VarInt::new(PACKET_S2C_UPDATE).ser(&mut writer);
        VarInt::from_len(self.nodes.len()).ser(&mut writer);
        for (path, value) in &self.nodes {
            path.ser(&mut writer);
            value.write(&mut writer);
        }
        writer.to_bytes()
    }
}

/// Messages a peer sends to the client on the subscription channel.
#[derive(Clone, Debug, PartialEq)]
pub enum PeerMessage {
    Update(UpdateBatch),
}

impl PeerMessage {
    pub fn decode(bytes: &[u8]) -> Result<Self, PubSubError> {
        let mut reader = ByteReader::new(bytes);
        let id = VarInt::de(&mut reader)?.get();
        match id {
            PACKET_S2C_UPDATE => Ok(PeerMessage::Update(UpdateBatch::read(&mut reader)?)),
            id => Err(PubSubError::UnknownPacketId { id }),
        }
    }
}
