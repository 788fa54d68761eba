//! Counterparty envelope parsing
//!
//! The extracted message stream (magic already trimmed) starts with a 1-byte
//! message id; everything after it is the message body.

use crate::types::counterparty::{CounterpartyEnvelope, CounterpartyMessageType};
use tracing::debug;

/// Split a message stream into id and body; `None` when it is empty
pub fn parse_envelope(message: &[u8]) -> Option<CounterpartyEnvelope> {
    let (&message_id, payload) = message.split_first()?;
    Some(CounterpartyEnvelope {
        message_id,
        payload: payload.to_vec(),
    })
}

/// Resolve the envelope to an issuance message type honoured at this height
///
/// Any other message id, or a subasset before activation, means the
/// transaction carries no stamp.
pub fn stamp_message_type(
    envelope: &CounterpartyEnvelope,
    block_height: u32,
    subasset_activation: u32,
) -> Option<CounterpartyMessageType> {
    let Some(message_type) = CounterpartyMessageType::from_id(envelope.message_id) else {
        debug!("Message id {} is not an issuance", envelope.message_id);
        return None;
    };

    if !message_type.is_active_at(block_height, subasset_activation) {
        debug!(
            "Subasset message at height {} before activation {}",
            block_height, subasset_activation
        );
        return None;
    }

    Some(message_type)
}
