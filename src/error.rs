//! # Error Taxonomy
//!
//! All failures in the election crate fall into one of three categories:
//!
//! - [`ElectionError::Configuration`]: a broken precondition detected before
//!   any process starts running (ring too small, bad initiator set). Fatal,
//!   never retried.
//! - [`ElectionError::Protocol`]: a message or call that should be unreachable
//!   under a correctly formed ring and a correct channel. Fatal for the
//!   affected process, which halts and reports rather than guessing.
//! - [`ElectionError::NotDecided`]: the winner was queried before the process
//!   reached its terminal state. Recoverable; the caller should process more
//!   messages and retry.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ElectionError>;

/// Errors raised by ring construction, the election protocol, and winner queries.
#[derive(Debug, Error)]
pub enum ElectionError {
    /// Invalid election setup; surfaced before any message is sent.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A malformed message or an impossible call; the affected process halts.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// `winner()` was called before the process reached the `Decided` state.
    #[error("process {id} has not decided a winner yet")]
    NotDecided {
        /// Identifier of the process that was queried too early.
        id: u32,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_their_context() {
        let err = ElectionError::Configuration("ring too small".to_string());
        assert_eq!(err.to_string(), "configuration error: ring too small");

        let err = ElectionError::NotDecided { id: 3 };
        assert_eq!(err.to_string(), "process 3 has not decided a winner yet");
    }
}
