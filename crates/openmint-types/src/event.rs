//! Audit events for the OpenMint factory.
//!
//! Every successful state mutation (governance write, market creation,
//! ownership transfer step) appends one [`Event`] to the factory's ordered,
//! append-only log. Failed operations append nothing — the log only ever
//! records committed work.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Address;

/// The mutation an event records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// A template's governance flags were written.
    TemplateApproval {
        template: Address,
        approved: bool,
        open: bool,
        allow_duplicate: bool,
    },
    /// A reference-whitelist entry was written.
    ReferenceWhitelistSet {
        template: Address,
        slot: usize,
        target: Address,
        allowed: bool,
    },
    /// A condition-override entry was written.
    ConditionOverrideSet {
        template: Address,
        slot: usize,
        value: u64,
    },
    /// A market instance was created.
    MarketCreated {
        instance: Address,
        template: Address,
        creator: Address,
        metadata: String,
        conditions: Vec<u64>,
        references: Vec<Address>,
    },
    /// An ownership transfer was committed (deadline started).
    TransferCommitted {
        new_admin: Address,
        deadline: DateTime<Utc>,
    },
    /// A committed transfer was applied; `new_admin` is now the admin.
    TransferApplied { new_admin: Address },
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TemplateApproval { .. } => write!(f, "TEMPLATE_APPROVAL"),
            Self::ReferenceWhitelistSet { .. } => write!(f, "REFERENCE_WHITELIST_SET"),
            Self::ConditionOverrideSet { .. } => write!(f, "CONDITION_OVERRIDE_SET"),
            Self::MarketCreated { .. } => write!(f, "MARKET_CREATED"),
            Self::TransferCommitted { .. } => write!(f, "TRANSFER_COMMITTED"),
            Self::TransferApplied { .. } => write!(f, "TRANSFER_APPLIED"),
        }
    }
}

/// One entry in the factory's audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// What was mutated.
    pub kind: EventKind,
    /// Ledger time at which the operation ran.
    pub at: DateTime<Utc>,
}

impl Event {
    #[must_use]
    pub fn new(kind: EventKind, at: DateTime<Utc>) -> Self {
        Self { kind, at }
    }
}
