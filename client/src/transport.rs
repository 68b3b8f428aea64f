use std::fmt;

/// Returned when a packet could not be handed to the underlying transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendError;

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("packet could not be sent")
    }
}

/// Outgoing half of the host's custom-payload transport
pub trait PacketSender: Send + Sync {
    /// Sends one transport packet on the named logical channel
    fn send(&self, channel: &str, payload: &[u8]) -> Result<(), SendError>;
}
