//! # Process State Machine
//!
//! The per-process election logic. Each process moves through three states:
//!
//! ```text
//! Idle ──initiate / first Election──> Candidate ──Elected received──> Decided
//! ```
//!
//! A process that never self-initiates still becomes a candidate the first
//! time a circulating `Election` message touches it, injecting its own
//! identifier into the comparison. Weaker candidacies are absorbed (dropped
//! without forwarding); only strictly larger or self-returning candidacies
//! propagate, which is what bounds total message traffic.
//!
//! `Decided` is terminal: the process has performed its final forward, if
//! any, and consumes no further messages.

use log::debug;

use crate::channel::Network;
use crate::error::{ElectionError, Result};
use crate::messages::Message;
use crate::topology::RingTopology;

/// Local election state of a ring process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Not yet a candidate; no identifier observed.
    Idle,
    /// Actively competing; tracks the largest identifier seen or adopted.
    Candidate { highest_known_id: u32 },
    /// Terminal; the winner is known and no further messages are processed.
    Decided { winner_id: u32 },
}

/// One member of the ring.
///
/// Owns its state exclusively; the only mutations come from its own
/// [`initiate`](Process::initiate) call and its own handling of locally
/// received messages. Cross-process communication happens through the
/// [`Network`] only.
pub struct Process {
    id: u32,
    successor_id: u32,
    ring_size: u32,
    state: ProcessState,
}

impl Process {
    /// Create the process in its initial non-candidate state.
    pub fn new(id: u32, topology: &RingTopology) -> Self {
        Self {
            id,
            successor_id: topology.successor(id),
            ring_size: topology.size(),
            state: ProcessState::Idle,
        }
    }

    /// This process's own identifier.
    pub fn id(&self) -> u32 {
        self.id
    }

    /// Identifier of the next process clockwise; fixed for the process's lifetime.
    pub fn successor_id(&self) -> u32 {
        self.successor_id
    }

    /// Current election state.
    pub fn state(&self) -> ProcessState {
        self.state
    }

    /// Whether this process has reached its terminal state.
    pub fn is_decided(&self) -> bool {
        matches!(self.state, ProcessState::Decided { .. })
    }

    /// Declare this process a candidate and start circulating its identifier.
    ///
    /// Valid only from `Idle`; the driver must never call it twice on the
    /// same process.
    pub fn initiate(&mut self, net: &Network) -> Result<()> {
        if self.state != ProcessState::Idle {
            return Err(ElectionError::Protocol(format!(
                "process {} initiated from state {:?}",
                self.id, self.state
            )));
        }
        self.state = ProcessState::Candidate {
            highest_known_id: self.id,
        };
        debug!("process {} starts an election", self.id);
        net.send(
            self.successor_id,
            Message::Election {
                candidate_id: self.id,
            },
        )
    }

    /// Handle one message from this process's mailbox.
    ///
    /// This is the sole way state changes after initiation. Once `Decided`,
    /// further calls are no-ops and never change the winner.
    pub fn on_receive(&mut self, message: Message, net: &Network) -> Result<()> {
        if self.is_decided() {
            debug!(
                "process {} already decided, ignoring {:?}",
                self.id, message
            );
            return Ok(());
        }

        // An identifier outside the ring can only come from a broken
        // topology or channel; halt instead of guessing.
        if !self.contains(message.embedded_id()) {
            return Err(ElectionError::Protocol(format!(
                "process {} received identifier {} outside the ring of {}",
                self.id,
                message.embedded_id(),
                self.ring_size
            )));
        }

        match message {
            Message::Election { candidate_id } => self.on_election(candidate_id, net),
            Message::Elected { winner_id } => self.on_elected(winner_id, net),
        }
    }

    fn on_election(&mut self, num: u32, net: &Network) -> Result<()> {
        match self.state {
            ProcessState::Idle => {
                // First contact with the election: join it, injecting our
                // own identifier into the comparison.
                let highest = self.id.max(num);
                self.state = ProcessState::Candidate {
                    highest_known_id: highest,
                };
                debug!(
                    "process {} drafted into the election, forwarding {}",
                    self.id, highest
                );
                net.send(
                    self.successor_id,
                    Message::Election {
                        candidate_id: highest,
                    },
                )
            }
            ProcessState::Candidate { highest_known_id } => {
                if num > highest_known_id {
                    // A strictly larger candidacy propagates.
                    self.state = ProcessState::Candidate {
                        highest_known_id: num,
                    };
                    net.send(self.successor_id, Message::Election { candidate_id: num })
                } else if num == self.id {
                    // Our own identifier survived a full circuit unbeaten:
                    // it is the unique maximum. Announce the result; we stay
                    // a candidate until our Elected returns to us.
                    debug!("process {} won the election", self.id);
                    net.send(self.successor_id, Message::Elected { winner_id: self.id })
                } else {
                    // Absorption: a weaker candidacy dies here.
                    debug!("process {} absorbed candidacy {}", self.id, num);
                    Ok(())
                }
            }
            ProcessState::Decided { .. } => {
                // Already screened out by on_receive; a late candidacy is
                // simply ignored either way.
                debug!("process {} already decided, ignoring candidacy {}", self.id, num);
                Ok(())
            }
        }
    }

    fn on_elected(&mut self, num: u32, net: &Network) -> Result<()> {
        self.state = ProcessState::Decided { winner_id: num };
        if num != self.id {
            // Propagate the result, then stop consuming messages.
            net.send(self.successor_id, Message::Elected { winner_id: num })
        } else {
            // Our announcement has come back around: the whole ring knows.
            debug!("process {} saw its own announcement return", self.id);
            Ok(())
        }
    }

    /// The decided winner's identifier.
    ///
    /// # Returns
    /// - `Ok(winner_id)`: this process has reached `Decided`
    /// - `Err(ElectionError::NotDecided)`: queried too early; process more
    ///   messages and retry
    pub fn winner(&self) -> Result<u32> {
        match self.state {
            ProcessState::Decided { winner_id } => Ok(winner_id),
            _ => Err(ElectionError::NotDecided { id: self.id }),
        }
    }

    fn contains(&self, id: u32) -> bool {
        id < self.ring_size
    }
}
