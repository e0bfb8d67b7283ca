//! # openmint-types
//!
//! Shared types, errors, and configuration for the **OpenMint** market
//! instance factory.
//!
//! This crate is the leaf dependency of the workspace — every other crate
//! depends on it. It defines:
//!
//! - **Identifiers**: [`Address`] with the `ZERO` and `WILDCARD` sentinels
//! - **Template policy**: [`TemplatePolicy`] (approved / open / allow-duplicate)
//! - **Events**: [`Event`], [`EventKind`] — the append-only audit log entries
//! - **Execution context**: [`ExecContext`] (caller identity + ledger time)
//! - **Configuration**: [`FactoryConfig`]
//! - **Errors**: [`MintError`] with `MINT_ERR_` prefix codes
//! - **Constants**: system-wide defaults

pub mod config;
pub mod constants;
pub mod context;
pub mod error;
pub mod event;
pub mod ids;
pub mod template;

// Re-export all primary types at crate root for ergonomic imports:
//   use openmint_types::{Address, TemplatePolicy, Event, MintError, ...};

pub use config::*;
pub use context::*;
pub use error::*;
pub use event::*;
pub use ids::*;
pub use template::*;

// Constants are accessed via `openmint_types::constants::FOO`
// (not re-exported to avoid name collisions).
