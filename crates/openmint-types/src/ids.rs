//! Address identifiers used throughout OpenMint.
//!
//! Callers, templates, market instances, and whitelist references all share
//! one 20-byte [`Address`] type. Two sentinel values are reserved:
//! [`Address::ZERO`] (the null identity) and [`Address::WILDCARD`] (the
//! whitelist entry that admits any reference in its slot).

use std::fmt;

use serde::{Deserialize, Serialize};

/// A 20-byte identity: caller, template, market instance, or reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Address(pub [u8; 20]);

impl Address {
    /// The null identity. Never a valid admin or transfer target.
    pub const ZERO: Address = Address([0u8; 20]);

    /// Whitelist sentinel: an allowed `(template, slot, WILDCARD)` entry
    /// admits any reference value in that slot.
    pub const WILDCARD: Address = Address([0xff; 20]);

    #[must_use]
    pub fn from_bytes(bytes: [u8; 20]) -> Self {
        Self(bytes)
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    #[must_use]
    pub fn short(&self) -> String {
        hex::encode(&self.0[..4])
    }

    /// Deterministic instance address from template, creator, and the
    /// factory's creation sequence.
    ///
    /// Every replay of the same ledger derives the **exact same** address
    /// for the same creation — the factory never mints two instances with
    /// the same sequence number.
    #[must_use]
    pub fn derive_instance(template: Address, creator: Address, sequence: u64) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"openmint:instance:v1:");
        hasher.update(template.0);
        hasher.update(creator.0);
        hasher.update(sequence.to_le_bytes());
        let hash = hasher.finalize();
        let mut bytes = [0u8; 20];
        bytes.copy_from_slice(&hash[..20]);
        Self(bytes)
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl Address {
    pub fn random() -> Self {
        use rand::Rng;
        let mut bytes = [0u8; 20];
        rand::thread_rng().fill(&mut bytes);
        Self(bytes)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}
