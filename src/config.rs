//! # Configuration
//!
//! TOML-backed configuration for launching an election:
//!
//! ```toml
//! [ring]
//! size = 5
//!
//! [election]
//! initiators = [0, 2, 4]   # optional; every even identifier when omitted
//! ```
//!
//! No persisted state beyond this file; the ring size and initiator subset
//! are the only inputs the launch needs.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::driver::InitiatorPolicy;

/// Complete election configuration loaded from a TOML file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingConfig {
    /// The ring to form.
    pub ring: RingSettings,
    /// Who starts the election.
    #[serde(default)]
    pub election: ElectionSettings,
}

/// Structure of the ring itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RingSettings {
    /// Number of processes on the ring (must be at least 3).
    pub size: u32,
}

/// Initiator selection settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ElectionSettings {
    /// Identifiers that self-initiate; every even identifier when omitted.
    pub initiators: Option<Vec<u32>>,
}

impl RingConfig {
    /// Load the configuration from a TOML file.
    ///
    /// # Example
    /// ```ignore
    /// let config = RingConfig::from_file("config/ring.toml")?;
    /// ```
    pub fn from_file(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: RingConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// The initiator policy this configuration describes.
    pub fn policy(&self) -> InitiatorPolicy {
        match &self.election.initiators {
            Some(ids) => InitiatorPolicy::Explicit(ids.clone()),
            None => InitiatorPolicy::EveryEven,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn full_config_round_trips() {
        let file = write_config(
            r#"
            [ring]
            size = 5

            [election]
            initiators = [0, 2, 4]
            "#,
        );
        let config = RingConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.ring.size, 5);
        assert_eq!(
            config.policy(),
            InitiatorPolicy::Explicit(vec![0, 2, 4])
        );
    }

    #[test]
    fn missing_election_table_defaults_to_every_even() {
        let file = write_config("[ring]\nsize = 4\n");
        let config = RingConfig::from_file(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.policy(), InitiatorPolicy::EveryEven);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(RingConfig::from_file("/no/such/config.toml").is_err());
    }
}
