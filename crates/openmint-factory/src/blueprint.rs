//! Blueprint code and the market instance proxy model.
//!
//! In a shared-code ledger environment an instance is a minimal proxy
//! that forwards calls to the template's code while keeping its own
//! persistent state. Here that pattern is a trait seam: an instance holds
//! a shared `Arc<dyn Blueprint>` plus its own [`MarketState`], and the
//! factory depends only on the `initialize` contract — never on any
//! particular code-sharing mechanism.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use openmint_types::{Address, MintError, Result};

/// The per-instance state a blueprint initializes exactly once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarketState {
    /// Opaque market metadata supplied at creation.
    pub metadata: String,
    /// Condition values after override resolution.
    pub conditions: Vec<u64>,
    /// Reference addresses, one per whitelist slot.
    pub references: Vec<Address>,
}

/// Template code: the shared behavior every instance of a template binds to.
///
/// `initialize` is the instance's sole constructor-equivalent. It may fail;
/// the factory treats any failure as aborting the whole creation.
pub trait Blueprint: Send + Sync {
    fn initialize(
        &self,
        state: &mut MarketState,
        metadata: &str,
        conditions: &[u64],
        references: &[Address],
    ) -> Result<()>;
}

/// The stock blueprint: records the creation arguments verbatim and rejects
/// re-initialization.
#[derive(Debug, Default)]
pub struct StandardBlueprint;

impl Blueprint for StandardBlueprint {
    fn initialize(
        &self,
        state: &mut MarketState,
        metadata: &str,
        conditions: &[u64],
        references: &[Address],
    ) -> Result<()> {
        if !state.metadata.is_empty() || !state.conditions.is_empty() {
            return Err(MintError::InitializeFailed {
                reason: "instance already initialized".into(),
            });
        }
        state.metadata = metadata.to_string();
        state.conditions = conditions.to_vec();
        state.references = references.to_vec();
        Ok(())
    }
}

/// One created market: shared blueprint code bound to independent state.
///
/// Created exactly once by the factory, never destroyed by this subsystem.
pub struct MarketInstance {
    address: Address,
    template: Address,
    code: Arc<dyn Blueprint>,
    state: MarketState,
}

impl MarketInstance {
    pub(crate) fn new(
        address: Address,
        template: Address,
        code: Arc<dyn Blueprint>,
        state: MarketState,
    ) -> Self {
        Self {
            address,
            template,
            code,
            state,
        }
    }

    /// This instance's address.
    #[must_use]
    pub fn address(&self) -> Address {
        self.address
    }

    /// The template whose code this instance is bound to.
    #[must_use]
    pub fn template(&self) -> Address {
        self.template
    }

    /// The initialized per-instance state.
    #[must_use]
    pub fn state(&self) -> &MarketState {
        &self.state
    }

    /// The shared code this instance forwards behavior to.
    #[must_use]
    pub fn code(&self) -> &Arc<dyn Blueprint> {
        &self.code
    }
}

impl fmt::Debug for MarketInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarketInstance")
            .field("address", &self.address)
            .field("template", &self.template)
            .field("state", &self.state)
            .finish_non_exhaustive()
    }
}
