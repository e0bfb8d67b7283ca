//! The external market-registry collaborator.
//!
//! The registry tracks global market existence: which instances have been
//! registered, and which (reference, condition) key pairs already have a
//! live market. The factory consults it for duplicate detection and
//! registers every instance it creates.

use std::collections::HashSet;

use openmint_types::{Address, Result};

/// Contract surface the factory consumes on the external registry.
pub trait MarketRegistry {
    /// Register a newly created instance. A failure here aborts the whole
    /// creation; the factory commits nothing of its own on that path.
    fn support_market(&mut self, instance: Address) -> Result<()>;

    /// Pure read: has a market with this key pair already been recorded.
    fn confirm_existence(&self, reference: Address, condition: u64) -> bool;

    /// Record a key pair as now existing.
    fn set_existence(&mut self, reference: Address, condition: u64);
}

/// Set-backed registry for tests and single-process embedding.
#[derive(Debug, Default)]
pub struct InMemoryRegistry {
    supported: Vec<Address>,
    existing: HashSet<(Address, u64)>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an instance has been registered.
    #[must_use]
    pub fn is_supported(&self, instance: Address) -> bool {
        self.supported.contains(&instance)
    }

    /// Number of registered instances.
    #[must_use]
    pub fn supported_count(&self) -> usize {
        self.supported.len()
    }

    /// Number of recorded key pairs.
    #[must_use]
    pub fn existence_count(&self) -> usize {
        self.existing.len()
    }
}

impl MarketRegistry for InMemoryRegistry {
    fn support_market(&mut self, instance: Address) -> Result<()> {
        self.supported.push(instance);
        Ok(())
    }

    fn confirm_existence(&self, reference: Address, condition: u64) -> bool {
        self.existing.contains(&(reference, condition))
    }

    fn set_existence(&mut self, reference: Address, condition: u64) {
        self.existing.insert((reference, condition));
    }
}
