pub mod channel;
pub mod config;
pub mod driver;
pub mod error;
pub mod messages;
pub mod process;
pub mod topology;

pub use channel::{Mailbox, Network};
pub use config::RingConfig;
pub use driver::{ElectionDriver, ElectionOutcome, InitiatorPolicy};
pub use error::{ElectionError, Result};
pub use messages::Message;
pub use process::{Process, ProcessState};
pub use topology::RingTopology;
