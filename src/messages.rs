use serde::{Deserialize, Serialize};

use crate::error::{ElectionError, Result};

// ============================================================================
// MESSAGE TYPES - Only what circulates on the ring
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Message {
    // ELECTION MESSAGE
    // Circulates clockwise carrying the strongest candidacy seen so far.
    // candidate_id: the identifier currently competing for the maximum
    Election { candidate_id: u32 },

    // ELECTED MESSAGE
    // Originated exactly once, by the process whose own identifier made a
    // full circuit unbeaten. Announces the final winner to the ring.
    // winner_id: the unique maximum identifier on the ring
    Elected { winner_id: u32 },
}

impl Message {
    /// The identifier embedded in the message, regardless of kind.
    pub fn embedded_id(&self) -> u32 {
        match self {
            Message::Election { candidate_id } => *candidate_id,
            Message::Elected { winner_id } => *winner_id,
        }
    }

    // Convert a message to bytes for a wire transport. The in-memory
    // channel passes typed values directly and never goes through this;
    // it exists for transports that move bytes between address spaces.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        serde_json::to_vec(self)
            .map_err(|e| ElectionError::Protocol(format!("failed to serialize message: {}", e)))
    }

    // Convert bytes received from a wire transport back into a Message
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| ElectionError::Protocol(format!("unrecognized message: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn election_message_survives_the_wire() {
        let msg = Message::Election { candidate_id: 7 };
        let bytes = msg.to_bytes().unwrap();
        assert_eq!(Message::from_bytes(&bytes).unwrap(), msg);
    }

    #[test]
    fn garbage_bytes_are_a_protocol_error() {
        let err = Message::from_bytes(b"not a message").unwrap_err();
        assert!(matches!(err, ElectionError::Protocol(_)));
    }

    #[test]
    fn embedded_id_covers_both_kinds() {
        assert_eq!(Message::Election { candidate_id: 3 }.embedded_id(), 3);
        assert_eq!(Message::Elected { winner_id: 9 }.embedded_id(), 9);
    }
}
