//! Per-template governance flags.

use serde::{Deserialize, Serialize};

/// Governance flags for one template, keyed by its code address.
///
/// `open` only carries meaning while `approved` is true. The governance
/// write path stores `open` equal to `approved` and discards the caller's
/// argument; see `GovernanceRegistry::set_template_approval`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplatePolicy {
    /// May this template be instantiated at all.
    pub approved: bool,
    /// May any caller instantiate it (false = admin-only).
    pub open: bool,
    /// May two instances share the same (reference, condition) key pair.
    pub allow_duplicate: bool,
}

impl TemplatePolicy {
    #[must_use]
    pub fn is_approved(&self) -> bool {
        self.approved
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.approved && self.open
    }
}
