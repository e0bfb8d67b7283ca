//! Configuration for the OpenMint factory.

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Tunables for one factory deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Seconds between committing and applying an ownership transfer.
    pub transfer_delay_secs: i64,
}

impl FactoryConfig {
    /// The delay as a `chrono::Duration`.
    #[must_use]
    pub fn transfer_delay(&self) -> Duration {
        Duration::seconds(self.transfer_delay_secs)
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            transfer_delay_secs: constants::TRANSFER_DELAY_SECS,
        }
    }
}
