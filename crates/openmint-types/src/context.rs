//! Execution context passed into every factory operation.
//!
//! The ledger environment supplies both the calling identity and the
//! current time; neither is read from ambient state. Passing time as data
//! keeps every operation deterministic and makes the ownership-transfer
//! deadline directly testable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Address;

/// Caller identity and ledger time for one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecContext {
    /// The identity invoking the operation.
    pub caller: Address,
    /// Ledger time at which the operation runs.
    pub now: DateTime<Utc>,
}

impl ExecContext {
    #[must_use]
    pub fn new(caller: Address, now: DateTime<Utc>) -> Self {
        Self { caller, now }
    }
}
