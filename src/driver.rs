//! # Election Driver
//!
//! Assembles the ring and runs one election to completion:
//!
//! 1. Builds the [`RingTopology`] and the [`Network`] with one mailbox per
//!    process.
//! 2. Selects a non-empty subset of processes to self-initiate. Which subset
//!    is a deployment choice, not a correctness requirement — the protocol
//!    only needs at least one initiator.
//! 3. Spawns one tokio task per process. Each task is an independent
//!    sequential actor: optionally initiate, then block on the mailbox,
//!    handle, possibly send, repeat, until the process decides.
//! 4. Joins every task, checks that all processes agree on the winner, and
//!    reports it.

use std::collections::HashSet;

use log::{debug, info};
use rand::Rng;

use crate::channel::{Mailbox, Network};
use crate::config::RingConfig;
use crate::error::{ElectionError, Result};
use crate::process::Process;
use crate::topology::RingTopology;

// ============================================================================
// INITIATOR SELECTION
// ============================================================================

/// Policy choosing which processes call `initiate` at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitiatorPolicy {
    /// Every even identifier self-initiates (the demo default).
    EveryEven,
    /// An explicit, non-empty set of identifiers.
    Explicit(Vec<u32>),
    /// A uniformly random non-empty subset of the ring.
    Random,
}

impl InitiatorPolicy {
    /// Resolve the policy into a concrete initiator set for `topology`.
    ///
    /// Fails with a configuration error if the resolved set would be empty,
    /// contain duplicates, or name an identifier outside the ring.
    pub fn select(&self, topology: &RingTopology) -> Result<HashSet<u32>> {
        let chosen: Vec<u32> = match self {
            InitiatorPolicy::EveryEven => topology.ids().filter(|id| id % 2 == 0).collect(),
            InitiatorPolicy::Explicit(ids) => ids.clone(),
            InitiatorPolicy::Random => {
                let mut rng = rand::thread_rng();
                let mut picked: Vec<u32> =
                    topology.ids().filter(|_| rng.gen_bool(0.5)).collect();
                if picked.is_empty() {
                    picked.push(rng.gen_range(0..topology.size()));
                }
                picked
            }
        };

        if chosen.is_empty() {
            return Err(ElectionError::Configuration(
                "at least one process must initiate the election".to_string(),
            ));
        }
        for &id in &chosen {
            if !topology.contains(id) {
                return Err(ElectionError::Configuration(format!(
                    "initiator {} is not on the ring of {}",
                    id,
                    topology.size()
                )));
            }
        }
        let set: HashSet<u32> = chosen.iter().copied().collect();
        if set.len() != chosen.len() {
            return Err(ElectionError::Configuration(
                "duplicate initiator identifiers".to_string(),
            ));
        }
        Ok(set)
    }
}

// ============================================================================
// DRIVER
// ============================================================================

/// Result of a completed election, as reported by every process on the ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElectionOutcome {
    /// The globally maximum identifier, agreed on by all processes.
    pub winner_id: u32,
    /// Number of processes that took part.
    pub ring_size: u32,
}

/// Runs one complete election on a freshly formed ring.
pub struct ElectionDriver {
    topology: RingTopology,
    policy: InitiatorPolicy,
}

impl ElectionDriver {
    /// Create a driver for `topology` with the given initiator policy.
    pub fn new(topology: RingTopology, policy: InitiatorPolicy) -> Self {
        Self { topology, policy }
    }

    /// Create a driver from a loaded configuration file.
    pub fn from_config(config: &RingConfig) -> Result<Self> {
        let topology = RingTopology::new(config.ring.size)?;
        Ok(Self::new(topology, config.policy()))
    }

    /// Run the election to completion and report the agreed winner.
    ///
    /// Every process runs as its own tokio task and decides independently;
    /// this method returns once all of them have. A disagreement between
    /// processes would violate the protocol and is surfaced as a protocol
    /// error.
    pub async fn run(self) -> Result<ElectionOutcome> {
        // Resolve initiators before any process starts; configuration
        // failures must precede all election activity.
        let initiators = self.policy.select(&self.topology)?;
        info!(
            "🗳️ election on a ring of {}, initiated by {:?}",
            self.topology.size(),
            {
                let mut ids: Vec<u32> = initiators.iter().copied().collect();
                ids.sort_unstable();
                ids
            }
        );

        let (network, mailboxes) = Network::new(&self.topology);

        let mut handles = Vec::with_capacity(mailboxes.len());
        for mailbox in mailboxes {
            let id = mailbox.process_id();
            let process = Process::new(id, &self.topology);
            let net = network.clone();
            let is_initiator = initiators.contains(&id);
            handles.push(tokio::spawn(run_process(
                process, mailbox, net, is_initiator,
            )));
        }
        drop(network);

        // All processes converge on the same winner; anything else is a
        // protocol violation.
        let mut agreed: Option<u32> = None;
        for handle in handles {
            let (id, winner_id) = handle
                .await
                .map_err(|e| ElectionError::Protocol(format!("process task failed: {}", e)))??;
            debug!("process {} decided on winner {}", id, winner_id);
            match agreed {
                None => agreed = Some(winner_id),
                Some(w) if w == winner_id => {}
                Some(w) => {
                    return Err(ElectionError::Protocol(format!(
                        "processes disagree on the winner: {} vs {}",
                        w, winner_id
                    )))
                }
            }
        }

        let winner_id = agreed.ok_or_else(|| {
            ElectionError::Protocol("election finished with no processes".to_string())
        })?;
        info!("✅ ring agreed on winner {}", winner_id);
        Ok(ElectionOutcome {
            winner_id,
            ring_size: self.topology.size(),
        })
    }
}

/// One ring process's receive loop, run to local completion.
async fn run_process(
    mut process: Process,
    mut mailbox: Mailbox,
    net: Network,
    is_initiator: bool,
) -> Result<(u32, u32)> {
    if is_initiator {
        process.initiate(&net)?;
    }
    while !process.is_decided() {
        let message = mailbox.receive_next().await.ok_or_else(|| {
            ElectionError::Protocol(format!(
                "process {} lost its channel before deciding",
                process.id()
            ))
        })?;
        process.on_receive(message, &net)?;
    }
    Ok((process.id(), process.winner()?))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(size: u32) -> RingTopology {
        RingTopology::new(size).unwrap()
    }

    #[test]
    fn every_even_selects_the_even_identifiers() {
        let set = InitiatorPolicy::EveryEven.select(&ring(5)).unwrap();
        let mut ids: Vec<u32> = set.into_iter().collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![0, 2, 4]);
    }

    #[test]
    fn explicit_empty_set_is_rejected() {
        let err = InitiatorPolicy::Explicit(vec![]).select(&ring(3)).unwrap_err();
        assert!(matches!(err, ElectionError::Configuration(_)));
    }

    #[test]
    fn explicit_out_of_range_initiator_is_rejected() {
        let err = InitiatorPolicy::Explicit(vec![0, 5])
            .select(&ring(3))
            .unwrap_err();
        assert!(matches!(err, ElectionError::Configuration(_)));
    }

    #[test]
    fn explicit_duplicate_initiators_are_rejected() {
        let err = InitiatorPolicy::Explicit(vec![1, 1])
            .select(&ring(3))
            .unwrap_err();
        assert!(matches!(err, ElectionError::Configuration(_)));
    }

    #[test]
    fn random_policy_is_never_empty() {
        for _ in 0..50 {
            let set = InitiatorPolicy::Random.select(&ring(4)).unwrap();
            assert!(!set.is_empty());
            assert!(set.iter().all(|&id| id < 4));
        }
    }
}
