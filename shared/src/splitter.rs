use std::collections::HashMap;

use hudsync_serde::{ByteReader, ByteWriter, Serde, SerdeErr, VarInt};
use thiserror::Error;

/// Largest client-to-peer transport packet.
pub const MAX_TOTAL_PER_PACKET_C2S: usize = 32767;
/// Largest peer-to-client transport packet.
pub const MAX_TOTAL_PER_PACKET_S2C: usize = 1048576;
/// Largest reassembled payload accepted from a peer.
pub const DEFAULT_MAX_RECEIVE_SIZE_S2C: usize = 67108864;

// room left in each packet for the length prefix
const LENGTH_PREFIX_RESERVE: usize = 5;

/// Errors that can occur while reassembling a split payload
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SplitterError {
    /// Malformed length prefix
    #[error("Malformed split payload header: {0}")]
    Serde(#[from] SerdeErr),

    /// Declared size above the receive limit (SECURITY: bounds memory held for a peer)
    #[error("Split payload declares {declared} bytes, above the limit of {limit}")]
    PayloadTooLarge { declared: usize, limit: usize },
}

/// Split `payload` into transport packets of at most `max_packet_size` bytes. The first packet
/// starts with the total payload length as a VarInt.
pub fn split(payload: &[u8], max_packet_size: usize) -> Vec<Vec<u8>> {
    let max_payload = max_packet_size.saturating_sub(LENGTH_PREFIX_RESERVE).max(1);
    let mut packets = Vec::new();

    let mut writer = ByteWriter::new();
    VarInt::from_len(payload.len()).ser(&mut writer);
    let mut first = writer.to_bytes();

    let first_len = payload.len().min(max_payload);
    first.extend_from_slice(&payload[..first_len]);
    packets.push(first);

    let mut offset = first_len;
    while offset < payload.len() {
        let this_len = (payload.len() - offset).min(max_payload);
        packets.push(payload[offset..offset + this_len].to_vec());
        offset += this_len;
    }

    packets
}

struct ReadingSession {
    expected_size: usize,
    received: Vec<u8>,
}

/// Reassembles split payloads, one reading session per channel.
pub struct PacketSplitter {
    max_receive_size: usize,
    sessions: HashMap<String, ReadingSession>,
}

impl Default for PacketSplitter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECEIVE_SIZE_S2C)
    }
}

impl PacketSplitter {
    pub fn new(max_receive_size: usize) -> Self {
        Self {
            max_receive_size,
            sessions: HashMap::new(),
        }
    }

    /// Feed one transport packet. Returns `Ok(None)` while more packets are needed and the
    /// full payload once at least the declared length has arrived. A rejected header drops
    /// that channel's session.
    pub fn receive(&mut self, channel: &str, packet: &[u8]) -> Result<Option<Vec<u8>>, SplitterError> {
        let mut reader = ByteReader::new(packet);

        if !self.sessions.contains_key(channel) {
            let expected_size = VarInt::de_len(&mut reader)?;
            if expected_size > self.max_receive_size {
                return Err(SplitterError::PayloadTooLarge {
                    declared: expected_size,
                    limit: self.max_receive_size,
                });
            }
            self.sessions.insert(
                channel.to_string(),
                ReadingSession {
                    expected_size,
                    received: Vec::with_capacity(expected_size.min(packet.len() * 4)),
                },
            );
        }

        let Some(session) = self.sessions.get_mut(channel) else {
            return Ok(None);
        };
        session.received.extend_from_slice(reader.read_remaining());

        if session.received.len() < session.expected_size {
            return Ok(None);
        }

        Ok(self.sessions.remove(channel).map(|session| session.received))
    }

    /// Forget partially received payloads.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    pub fn has_pending(&self, channel: &str) -> bool {
        self.sessions.contains_key(channel)
    }
}
