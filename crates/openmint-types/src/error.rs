//! Error types for the OpenMint factory.
//!
//! All errors use the `MINT_ERR_` prefix convention for easy grepping in
//! logs. Error codes are grouped by subsystem:
//! - 1xx: Governance errors
//! - 2xx: Creation / factory errors
//! - 3xx: Ownership-transfer errors
//! - 9xx: General / internal errors

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::Address;

/// Central error enum for all OpenMint operations.
///
/// Every failure is fatal to the operation that raised it: nothing is
/// committed, and no retry happens inside this subsystem.
#[derive(Debug, Error)]
pub enum MintError {
    // =================================================================
    // Governance Errors (1xx)
    // =================================================================
    /// The caller is not the current admin identity.
    #[error("MINT_ERR_100: Unauthorized: caller {caller} is not the admin")]
    Unauthorized { caller: Address },

    /// A whitelist or override write targeted a template that is not approved.
    #[error("MINT_ERR_101: Template not approved: {template}")]
    TemplateNotApproved { template: Address },

    // =================================================================
    // Creation Errors (2xx)
    // =================================================================
    /// The template is not approved for instantiation.
    #[error("MINT_ERR_200: Unauthorized template: {template}")]
    UnauthorizedTemplate { template: Address },

    /// The template is not open and the caller is not the admin.
    #[error("MINT_ERR_201: Unauthorized sender {caller} for closed template {template}")]
    UnauthorizedSender { caller: Address, template: Address },

    /// A reference failed the per-slot whitelist check.
    #[error("MINT_ERR_202: Unauthorized reference {reference} at slot {slot}")]
    UnauthorizedReference { slot: usize, reference: Address },

    /// The duplicate key pair already exists and the template disallows it.
    #[error("MINT_ERR_203: Duplicate market for ({reference}, {condition})")]
    DuplicateMarket { reference: Address, condition: u64 },

    /// `references` or `conditions` was empty, so the duplicate-check key
    /// `(references[0], conditions[0])` cannot be formed.
    #[error("MINT_ERR_204: Index out of range: {what} must be non-empty")]
    IndexOutOfRange { what: &'static str },

    /// The template is approved but no blueprint code is installed for it.
    #[error("MINT_ERR_205: No blueprint code installed for template {template}")]
    CodeNotInstalled { template: Address },

    /// The blueprint's `initialize` entry point rejected the creation.
    #[error("MINT_ERR_206: Blueprint initialize failed: {reason}")]
    InitializeFailed { reason: String },

    /// The external registry refused to register the new instance.
    #[error("MINT_ERR_207: Registry rejected instance: {reason}")]
    RegistryFailed { reason: String },

    // =================================================================
    // Ownership-Transfer Errors (3xx)
    // =================================================================
    /// A transfer is already pending; it must be applied first.
    #[error("MINT_ERR_300: Ownership transfer already active")]
    TransferAlreadyActive,

    /// No transfer is pending.
    #[error("MINT_ERR_301: No ownership transfer active")]
    TransferNotActive,

    /// The transfer deadline has not passed yet.
    #[error("MINT_ERR_302: Transfer deadline not reached: deadline {deadline}, now {now}")]
    TooEarly {
        deadline: DateTime<Utc>,
        now: DateTime<Utc>,
    },

    /// The proposed new admin is the null identity.
    #[error("MINT_ERR_303: Invalid transfer target: null identity")]
    InvalidTarget,

    // =================================================================
    // General / Internal (9xx)
    // =================================================================
    /// Unrecoverable internal error.
    #[error("MINT_ERR_900: Internal error: {0}")]
    Internal(String),
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MintError>;
