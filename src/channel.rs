//! # Message Channel
//!
//! In-process point-to-point transport between ring members, addressed by
//! recipient identifier. Each process owns a single inbound [`Mailbox`]; the
//! shared [`Network`] holds the send side for every mailbox.
//!
//! ## Delivery Guarantees
//!
//! - Messages from the same sender to the same receiver arrive in send order
//!   (each mailbox is one FIFO queue, which subsumes the per-pair guarantee).
//! - No loss, no duplication, no corruption.
//! - No ordering guarantee across different senders.
//!
//! `send` is fire-and-forget and never blocks the caller; `receive_next`
//! suspends the owning task until a message is available. These are the only
//! two operations the protocol relies on.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;

use crate::error::{ElectionError, Result};
use crate::messages::Message;
use crate::topology::RingTopology;

/// Send side of the channel: destination id -> inbound queue of that process.
///
/// Cheap to clone; every ring process holds its own handle.
#[derive(Clone)]
pub struct Network {
    senders: Arc<HashMap<u32, mpsc::UnboundedSender<Message>>>,
}

/// Receive side of the channel for a single process.
pub struct Mailbox {
    process_id: u32,
    inbound: mpsc::UnboundedReceiver<Message>,
}

impl Network {
    /// Build the channel for every process on the ring.
    ///
    /// Returns the shared send side and one mailbox per identifier, ordered
    /// by identifier.
    pub fn new(topology: &RingTopology) -> (Self, Vec<Mailbox>) {
        let mut senders = HashMap::new();
        let mut mailboxes = Vec::with_capacity(topology.size() as usize);

        for id in topology.ids() {
            let (tx, rx) = mpsc::unbounded_channel();
            senders.insert(id, tx);
            mailboxes.push(Mailbox {
                process_id: id,
                inbound: rx,
            });
        }

        (
            Self {
                senders: Arc::new(senders),
            },
            mailboxes,
        )
    }

    /// Deliver `message` to the process identified by `destination_id`.
    ///
    /// Fire-and-forget: the message is queued and the caller continues
    /// immediately. Fails with a protocol error if the destination is unknown
    /// or its mailbox has been dropped.
    pub fn send(&self, destination_id: u32, message: Message) -> Result<()> {
        let tx = self.senders.get(&destination_id).ok_or_else(|| {
            ElectionError::Protocol(format!("no such destination: {}", destination_id))
        })?;
        tx.send(message).map_err(|_| {
            ElectionError::Protocol(format!(
                "destination {} stopped receiving",
                destination_id
            ))
        })
    }
}

impl Mailbox {
    /// Identifier of the process this mailbox belongs to.
    pub fn process_id(&self) -> u32 {
        self.process_id
    }

    /// Wait for the next message addressed to this process.
    ///
    /// Returns `None` once every sender handle has been dropped and the
    /// queue is drained.
    pub async fn receive_next(&mut self) -> Option<Message> {
        self.inbound.recv().await
    }

    /// Non-blocking variant of [`receive_next`](Self::receive_next): returns
    /// `None` when the queue is currently empty.
    pub fn try_receive_next(&mut self) -> Option<Message> {
        self.inbound.try_recv().ok()
    }
}
