//! # openmint-governance
//!
//! **Governance Plane**: per-template approval flags, the reference
//! whitelist, condition overrides, and the time-locked single-admin
//! ownership transfer.
//!
//! ## Architecture
//!
//! Two leaf components, both owned by the factory facade:
//! 1. **GovernanceRegistry**: the tables — template policy, per-slot
//!    reference whitelist, per-slot condition overrides
//! 2. **OwnershipController**: the two-state transfer machine that gates
//!    every governance mutation
//!
//! Admin gating happens in the facade: it asks the controller
//! `require_admin(caller)` before touching any registry table. The
//! registry itself only enforces the template-approval precondition on
//! whitelist and override writes.

pub mod ownership;
pub mod registry;

pub use ownership::{OwnershipController, PendingTransfer};
pub use registry::GovernanceRegistry;
