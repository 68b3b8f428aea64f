//! Subscription channel wire format: node (un)subscribe requests, batched node updates and
//! the typed values they carry.

pub mod constants;
mod error;
mod messages;
mod typed_value;

pub use error::PubSubError;
pub use messages::{PeerMessage, SubscriptionKind, SubscriptionRequest, UpdateBatch};
pub use typed_value::{
    TypedValue, TYPE_BLOB, TYPE_DOUBLE, TYPE_FLOAT, TYPE_INT, TYPE_LONG, TYPE_STRING,
};
