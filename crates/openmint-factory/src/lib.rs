//! # openmint-factory
//!
//! **Factory Plane**: validates market-creation requests against governance
//! state, instantiates blueprint-backed market instances, and enforces the
//! duplicate-market policy against an external registry.
//!
//! ## Architecture
//!
//! The factory sits on top of the governance plane:
//! 1. **Blueprint / MarketInstance**: the code-sharing instantiation model —
//!    a new instance binds shared blueprint code to its own fresh state
//! 2. **MarketRegistry**: the external collaborator that tracks global
//!    market existence and duplicate key pairs
//! 3. **MarketFactory**: the facade owning governance tables, ownership
//!    state, the ordered instance list, and the audit event log
//!
//! ## Creation Flow
//!
//! ```text
//! create_market → policy check → sender check → whitelist → overrides
//!     → non-empty guard → duplicate policy → initialize → commit
//! ```
//!
//! Every fallible step runs before the first mutation: a failure at any
//! point leaves factory state, registry state, and the event log untouched.

pub mod blueprint;
pub mod factory;
pub mod registry;

pub use blueprint::{Blueprint, MarketInstance, MarketState, StandardBlueprint};
pub use factory::MarketFactory;
pub use registry::{InMemoryRegistry, MarketRegistry};
