//! Time-locked single-admin ownership transfer.
//!
//! Two states: stable (no pending transfer) and pending (future admin and
//! deadline recorded). A committed transfer cannot be cancelled; the only
//! way back to stable is applying it once the deadline passes. Both
//! transitions are driven by the *current* admin — the pending future
//! admin has no authority until promotion.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use openmint_types::{Address, EventKind, ExecContext, MintError, Result};

/// A committed, not-yet-applied transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTransfer {
    /// The identity that will become admin.
    pub new_admin: Address,
    /// Earliest ledger time at which the transfer may be applied.
    pub deadline: DateTime<Utc>,
}

/// The single-admin ownership state machine.
#[derive(Debug, Clone)]
pub struct OwnershipController {
    admin: Address,
    pending: Option<PendingTransfer>,
    transfer_delay: Duration,
}

impl OwnershipController {
    /// Create a controller with `admin` as the initial admin identity.
    #[must_use]
    pub fn new(admin: Address, transfer_delay: Duration) -> Self {
        Self {
            admin,
            pending: None,
            transfer_delay,
        }
    }

    /// Guard a governance mutation: only the current admin may proceed.
    ///
    /// # Errors
    /// Returns [`MintError::Unauthorized`] for any other caller.
    pub fn require_admin(&self, caller: Address) -> Result<()> {
        if caller == self.admin {
            Ok(())
        } else {
            Err(MintError::Unauthorized { caller })
        }
    }

    /// Commit a transfer to `new_admin`, starting the time lock.
    ///
    /// # Errors
    /// - [`MintError::Unauthorized`] if the caller is not the admin
    /// - [`MintError::TransferAlreadyActive`] if a transfer is pending
    /// - [`MintError::InvalidTarget`] if `new_admin` is the null identity
    pub fn commit_transfer(&mut self, ctx: &ExecContext, new_admin: Address) -> Result<EventKind> {
        self.require_admin(ctx.caller)?;
        if self.pending.is_some() {
            return Err(MintError::TransferAlreadyActive);
        }
        if new_admin.is_zero() {
            return Err(MintError::InvalidTarget);
        }

        let deadline = ctx.now + self.transfer_delay;
        self.pending = Some(PendingTransfer {
            new_admin,
            deadline,
        });

        tracing::info!(
            new_admin = %new_admin,
            deadline = %deadline,
            "Ownership transfer committed"
        );

        Ok(EventKind::TransferCommitted {
            new_admin,
            deadline,
        })
    }

    /// Apply a committed transfer once its deadline has passed, promoting
    /// the pending identity to admin.
    ///
    /// # Errors
    /// - [`MintError::Unauthorized`] if the caller is not the *current* admin
    /// - [`MintError::TransferNotActive`] if nothing is pending
    /// - [`MintError::TooEarly`] if `ctx.now` is before the deadline
    pub fn apply_transfer(&mut self, ctx: &ExecContext) -> Result<EventKind> {
        self.require_admin(ctx.caller)?;
        let pending = self.pending.ok_or(MintError::TransferNotActive)?;
        if ctx.now < pending.deadline {
            return Err(MintError::TooEarly {
                deadline: pending.deadline,
                now: ctx.now,
            });
        }

        self.admin = pending.new_admin;
        self.pending = None;

        tracing::info!(new_admin = %self.admin, "Ownership transfer applied");

        Ok(EventKind::TransferApplied {
            new_admin: self.admin,
        })
    }

    /// The current admin identity.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.admin
    }

    /// The pending future admin; `Address::ZERO` when no transfer is pending.
    #[must_use]
    pub fn pending_admin(&self) -> Address {
        self.pending.map_or(Address::ZERO, |p| p.new_admin)
    }

    /// The committed deadline, when a transfer is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<DateTime<Utc>> {
        self.pending.map(|p| p.deadline)
    }
}
