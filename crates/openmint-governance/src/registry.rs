//! Governance tables — template policy, reference whitelist, overrides.
//!
//! The registry is a set of idempotent-upsert tables. All of them are
//! mutated only by the current admin (enforced by the caller); the one
//! precondition enforced here is that whitelist and override writes target
//! an approved template.
//!
//! ## Design Principles
//!
//! - **Fail-closed**: an unknown template reads as all-false policy
//! - **Upserts**: re-writing an entry with the same value is a no-op
//! - **`open` mirrors `approved`**: the approval write path stores
//!   `open = approved` and discards the caller's `open` argument. This
//!   coupling is a long-standing quirk of the governance surface and is
//!   preserved exactly.

use std::collections::HashMap;

use openmint_types::{Address, EventKind, MintError, Result, TemplatePolicy, constants};

/// The per-template governance tables.
#[derive(Debug, Default)]
pub struct GovernanceRegistry {
    /// Template code address → policy flags.
    templates: HashMap<Address, TemplatePolicy>,
    /// (template, slot, target) → allowed.
    whitelist: HashMap<(Address, usize, Address), bool>,
    /// (template, slot) → override value; absent and `0` are equivalent.
    overrides: HashMap<(Address, usize), u64>,
}

impl GovernanceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a template's governance flags unconditionally.
    ///
    /// Re-approving is idempotent; passing `approved = false` revokes.
    /// The stored `open` flag is forced equal to `approved` — the `open`
    /// argument is accepted and discarded.
    pub fn set_template_approval(
        &mut self,
        template: Address,
        approved: bool,
        _open: bool,
        allow_duplicate: bool,
    ) -> EventKind {
        let policy = TemplatePolicy {
            approved,
            open: approved,
            allow_duplicate,
        };
        self.templates.insert(template, policy);

        tracing::info!(
            template = %template,
            approved,
            open = policy.open,
            allow_duplicate,
            "Template approval written"
        );

        EventKind::TemplateApproval {
            template,
            approved,
            open: policy.open,
            allow_duplicate,
        }
    }

    /// Upsert a reference-whitelist entry.
    ///
    /// # Errors
    /// Returns [`MintError::TemplateNotApproved`] if the template is not
    /// currently approved.
    pub fn set_reference_whitelist(
        &mut self,
        template: Address,
        slot: usize,
        target: Address,
        allowed: bool,
    ) -> Result<EventKind> {
        self.require_approved(template)?;
        self.whitelist.insert((template, slot, target), allowed);

        tracing::debug!(
            template = %template,
            slot,
            target = %target,
            allowed,
            "Reference whitelist written"
        );

        Ok(EventKind::ReferenceWhitelistSet {
            template,
            slot,
            target,
            allowed,
        })
    }

    /// Upsert a condition override. A value of `0` is indistinguishable
    /// from "unset" to the factory.
    ///
    /// # Errors
    /// Returns [`MintError::TemplateNotApproved`] if the template is not
    /// currently approved.
    pub fn set_condition_override(
        &mut self,
        template: Address,
        slot: usize,
        value: u64,
    ) -> Result<EventKind> {
        self.require_approved(template)?;
        self.overrides.insert((template, slot), value);

        tracing::debug!(template = %template, slot, value, "Condition override written");

        Ok(EventKind::ConditionOverrideSet {
            template,
            slot,
            value,
        })
    }

    /// The policy for a template (all-false when never written).
    #[must_use]
    pub fn policy(&self, template: Address) -> TemplatePolicy {
        self.templates.get(&template).copied().unwrap_or_default()
    }

    /// The raw whitelist entry, without wildcard resolution.
    #[must_use]
    pub fn is_whitelisted(&self, template: Address, slot: usize, target: Address) -> bool {
        self.whitelist
            .get(&(template, slot, target))
            .copied()
            .unwrap_or(false)
    }

    /// Whether `target` is admitted at `slot`: either an explicit entry or
    /// the slot's wildcard entry.
    #[must_use]
    pub fn reference_allowed(&self, template: Address, slot: usize, target: Address) -> bool {
        self.is_whitelisted(template, slot, target)
            || self.is_whitelisted(template, slot, Address::WILDCARD)
    }

    /// The override at (template, slot); `0` when unset.
    #[must_use]
    pub fn condition_override(&self, template: Address, slot: usize) -> u64 {
        self.overrides
            .get(&(template, slot))
            .copied()
            .unwrap_or(constants::OVERRIDE_UNSET)
    }

    fn require_approved(&self, template: Address) -> Result<()> {
        if self.policy(template).approved {
            Ok(())
        } else {
            Err(MintError::TemplateNotApproved { template })
        }
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl GovernanceRegistry {
    /// Write a policy verbatim, bypassing the open/approved coupling.
    ///
    /// The public write path cannot produce an approved-but-closed
    /// template; tests for the closed-template sender check need one.
    pub fn set_policy_raw(&mut self, template: Address, policy: TemplatePolicy) {
        self.templates.insert(template, policy);
    }
}
