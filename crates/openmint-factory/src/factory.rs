//! The market factory facade.
//!
//! Owns the governance tables, the ownership controller, the installed
//! blueprint code table, the ordered instance list, and the audit event
//! log; delegates existence tracking to the external [`MarketRegistry`].
//!
//! ## Atomicity
//!
//! Every operation is a single synchronous call: it either commits all of
//! its changes or none. `create_market` achieves this by two-phase staging
//! rather than rollback — all fallible work (validation, the duplicate
//! query, blueprint `initialize`, `support_market`) runs before the first
//! local mutation, and the remaining commit steps cannot fail.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};

use openmint_governance::{GovernanceRegistry, OwnershipController};
use openmint_types::{
    Address, Event, EventKind, ExecContext, FactoryConfig, MintError, Result, TemplatePolicy,
    constants,
};

use crate::blueprint::{Blueprint, MarketInstance, MarketState};
use crate::registry::MarketRegistry;

/// Admission control and instance creation over a set of approved templates.
pub struct MarketFactory<R: MarketRegistry> {
    governance: GovernanceRegistry,
    ownership: OwnershipController,
    /// Template address → installed blueprint code.
    codes: HashMap<Address, Arc<dyn Blueprint>>,
    /// All created instances, by address.
    instances: HashMap<Address, MarketInstance>,
    /// Ordered, append-only list of created instance addresses.
    market_list: Vec<Address>,
    /// Ordered, append-only audit log.
    events: Vec<Event>,
    registry: R,
}

impl<R: MarketRegistry> MarketFactory<R> {
    /// Create a factory with `admin` as the initial admin identity.
    #[must_use]
    pub fn new(admin: Address, config: &FactoryConfig, registry: R) -> Self {
        Self {
            governance: GovernanceRegistry::new(),
            ownership: OwnershipController::new(admin, config.transfer_delay()),
            codes: HashMap::new(),
            instances: HashMap::new(),
            market_list: Vec::new(),
            events: Vec::new(),
            registry,
        }
    }

    // =================================================================
    // Governance writes (admin-only)
    // =================================================================

    /// Install blueprint code under a template address.
    ///
    /// A shared-code ledger environment locates code at the template's
    /// address; here the admin binds it explicitly. Re-installing replaces
    /// the code for future creations only.
    ///
    /// # Errors
    /// Returns [`MintError::Unauthorized`] for non-admin callers.
    pub fn install_template_code(
        &mut self,
        ctx: &ExecContext,
        template: Address,
        code: Arc<dyn Blueprint>,
    ) -> Result<()> {
        self.ownership.require_admin(ctx.caller)?;
        self.codes.insert(template, code);
        tracing::info!(template = %template, "Blueprint code installed");
        Ok(())
    }

    /// Write a template's governance flags. Unconditional upsert; the
    /// stored `open` flag mirrors `approved` regardless of the argument.
    ///
    /// # Errors
    /// Returns [`MintError::Unauthorized`] for non-admin callers.
    pub fn set_template_approval(
        &mut self,
        ctx: &ExecContext,
        template: Address,
        approved: bool,
        open: bool,
        allow_duplicate: bool,
    ) -> Result<()> {
        self.ownership.require_admin(ctx.caller)?;
        let kind =
            self.governance
                .set_template_approval(template, approved, open, allow_duplicate);
        self.events.push(Event::new(kind, ctx.now));
        Ok(())
    }

    /// Upsert a reference-whitelist entry for an approved template.
    ///
    /// # Errors
    /// - [`MintError::Unauthorized`] for non-admin callers
    /// - [`MintError::TemplateNotApproved`] if the template is not approved
    pub fn set_reference_whitelist(
        &mut self,
        ctx: &ExecContext,
        template: Address,
        slot: usize,
        target: Address,
        allowed: bool,
    ) -> Result<()> {
        self.ownership.require_admin(ctx.caller)?;
        let kind = self
            .governance
            .set_reference_whitelist(template, slot, target, allowed)?;
        self.events.push(Event::new(kind, ctx.now));
        Ok(())
    }

    /// Upsert a condition override for an approved template.
    ///
    /// # Errors
    /// - [`MintError::Unauthorized`] for non-admin callers
    /// - [`MintError::TemplateNotApproved`] if the template is not approved
    pub fn set_condition_override(
        &mut self,
        ctx: &ExecContext,
        template: Address,
        slot: usize,
        value: u64,
    ) -> Result<()> {
        self.ownership.require_admin(ctx.caller)?;
        let kind = self
            .governance
            .set_condition_override(template, slot, value)?;
        self.events.push(Event::new(kind, ctx.now));
        Ok(())
    }

    // =================================================================
    // Ownership transfer
    // =================================================================

    /// Commit a time-locked transfer of the admin identity.
    pub fn commit_transfer(&mut self, ctx: &ExecContext, new_admin: Address) -> Result<()> {
        let kind = self.ownership.commit_transfer(ctx, new_admin)?;
        self.events.push(Event::new(kind, ctx.now));
        Ok(())
    }

    /// Apply a committed transfer once its deadline has passed.
    pub fn apply_transfer(&mut self, ctx: &ExecContext) -> Result<()> {
        let kind = self.ownership.apply_transfer(ctx)?;
        self.events.push(Event::new(kind, ctx.now));
        Ok(())
    }

    // =================================================================
    // Market creation
    // =================================================================

    /// Create a market instance from an approved template.
    ///
    /// Validation runs in order: template approval, sender permission,
    /// per-slot reference whitelist, condition-override resolution, the
    /// non-empty guard on `references`/`conditions`, and the duplicate
    /// policy against the external registry. Only after the blueprint's
    /// `initialize` and the registry's `support_market` have both
    /// succeeded does the factory commit: existence key, list append,
    /// instance insert, creation event.
    ///
    /// # Errors
    /// - [`MintError::UnauthorizedTemplate`] — template not approved
    /// - [`MintError::UnauthorizedSender`] — closed template, non-admin caller
    /// - [`MintError::UnauthorizedReference`] — reference not whitelisted
    /// - [`MintError::IndexOutOfRange`] — empty `references` or `conditions`
    /// - [`MintError::CodeNotInstalled`] — no blueprint bound to the template
    /// - [`MintError::DuplicateMarket`] — key pair exists, duplicates disallowed
    /// - [`MintError::InitializeFailed`] — blueprint rejected the creation
    /// - [`MintError::RegistryFailed`] — registry refused the instance
    pub fn create_market(
        &mut self,
        ctx: &ExecContext,
        template: Address,
        metadata: &str,
        conditions: &[u64],
        references: &[Address],
    ) -> Result<Address> {
        // 1. Template must be approved (unknown templates read all-false).
        let policy = self.governance.policy(template);
        if !policy.approved {
            return Err(MintError::UnauthorizedTemplate { template });
        }

        // 2. Closed templates are admin-only.
        if !policy.open && self.ownership.require_admin(ctx.caller).is_err() {
            return Err(MintError::UnauthorizedSender {
                caller: ctx.caller,
                template,
            });
        }

        // 3. Per-slot whitelist, wildcard-aware. Vacuous when empty.
        for (slot, reference) in references.iter().enumerate() {
            if !self.governance.reference_allowed(template, slot, *reference) {
                tracing::warn!(
                    template = %template,
                    slot,
                    reference = %reference,
                    "Reference rejected by whitelist"
                );
                return Err(MintError::UnauthorizedReference {
                    slot,
                    reference: *reference,
                });
            }
        }

        // 4. Non-zero overrides silently replace the caller's conditions.
        let mut conditions = conditions.to_vec();
        for (slot, condition) in conditions.iter_mut().enumerate() {
            let value = self.governance.condition_override(template, slot);
            if value != constants::OVERRIDE_UNSET {
                tracing::debug!(template = %template, slot, value, "Condition overridden");
                *condition = value;
            }
        }

        // 5. The duplicate key is (references[0], conditions[0]); both
        //    arrays must be non-empty for it to be well-defined.
        if references.is_empty() {
            return Err(MintError::IndexOutOfRange { what: "references" });
        }
        if conditions.is_empty() {
            return Err(MintError::IndexOutOfRange { what: "conditions" });
        }
        let (dup_ref, dup_cond) = (references[0], conditions[0]);

        // 6. Duplicate policy.
        let key_exists = self.registry.confirm_existence(dup_ref, dup_cond);
        if key_exists && !policy.allow_duplicate {
            tracing::warn!(
                template = %template,
                reference = %dup_ref,
                condition = dup_cond,
                "Duplicate market rejected"
            );
            return Err(MintError::DuplicateMarket {
                reference: dup_ref,
                condition: dup_cond,
            });
        }

        // 7. Bind a fresh instance to the template's code and initialize it.
        let code = self
            .codes
            .get(&template)
            .cloned()
            .ok_or(MintError::CodeNotInstalled { template })?;
        let sequence = self.market_list.len() as u64;
        let address = Address::derive_instance(template, ctx.caller, sequence);

        let mut state = MarketState::default();
        code.initialize(&mut state, metadata, &conditions, references)?;
        let instance = MarketInstance::new(address, template, code, state);

        // 8. Commit. `support_market` is the last fallible step; everything
        //    after it cannot fail, so no partial state is ever visible.
        self.registry.support_market(address)?;
        if !key_exists {
            self.registry.set_existence(dup_ref, dup_cond);
        }
        self.market_list.push(address);
        self.instances.insert(address, instance);
        self.events.push(Event::new(
            EventKind::MarketCreated {
                instance: address,
                template,
                creator: ctx.caller,
                metadata: metadata.to_string(),
                conditions,
                references: references.to_vec(),
            },
            ctx.now,
        ));

        tracing::info!(
            instance = %address,
            template = %template,
            creator = %ctx.caller,
            sequence,
            "Market created"
        );

        Ok(address)
    }

    // =================================================================
    // Read-only state
    // =================================================================

    /// The current admin identity.
    #[must_use]
    pub fn admin(&self) -> Address {
        self.ownership.admin()
    }

    /// The pending future admin; `Address::ZERO` when no transfer pending.
    #[must_use]
    pub fn pending_admin(&self) -> Address {
        self.ownership.pending_admin()
    }

    /// The committed transfer deadline, when a transfer is pending.
    #[must_use]
    pub fn transfer_deadline(&self) -> Option<DateTime<Utc>> {
        self.ownership.deadline()
    }

    /// A template's governance flags.
    #[must_use]
    pub fn policy(&self, template: Address) -> TemplatePolicy {
        self.governance.policy(template)
    }

    /// The governance tables, for whitelist and override queries.
    #[must_use]
    pub fn governance(&self) -> &GovernanceRegistry {
        &self.governance
    }

    /// Ordered list of every created instance address.
    #[must_use]
    pub fn markets(&self) -> &[Address] {
        &self.market_list
    }

    /// Number of created instances.
    #[must_use]
    pub fn market_count(&self) -> usize {
        self.market_list.len()
    }

    /// A created instance, by address.
    #[must_use]
    pub fn instance(&self, address: Address) -> Option<&MarketInstance> {
        self.instances.get(&address)
    }

    /// The ordered audit log.
    #[must_use]
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// The external registry collaborator.
    #[must_use]
    pub fn registry(&self) -> &R {
        &self.registry
    }
}

/// Test helpers.
#[cfg(any(test, feature = "test-helpers"))]
impl<R: MarketRegistry> MarketFactory<R> {
    /// Mutable governance access, for raw policy writes in tests.
    pub fn governance_mut(&mut self) -> &mut GovernanceRegistry {
        &mut self.governance
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use crate::blueprint::StandardBlueprint;
    use crate::registry::InMemoryRegistry;

    use super::*;

    fn setup() -> (MarketFactory<InMemoryRegistry>, ExecContext) {
        let admin = Address::random();
        let ctx = ExecContext::new(admin, Utc::now());
        let factory = MarketFactory::new(admin, &FactoryConfig::default(), InMemoryRegistry::new());
        (factory, ctx)
    }

    /// Approve a template with wildcard slot 0 and installed code.
    fn approve_with_wildcard(
        factory: &mut MarketFactory<InMemoryRegistry>,
        ctx: &ExecContext,
        allow_duplicate: bool,
    ) -> Address {
        let template = Address::random();
        factory
            .install_template_code(ctx, template, Arc::new(StandardBlueprint))
            .unwrap();
        factory
            .set_template_approval(ctx, template, true, true, allow_duplicate)
            .unwrap();
        factory
            .set_reference_whitelist(ctx, template, 0, Address::WILDCARD, true)
            .unwrap();
        template
    }

    #[test]
    fn unapproved_template_rejected() {
        let (mut factory, ctx) = setup();
        let err = factory
            .create_market(&ctx, Address::random(), "m", &[1], &[Address::random()])
            .unwrap_err();
        assert!(matches!(err, MintError::UnauthorizedTemplate { .. }));
        assert_eq!(factory.market_count(), 0);
    }

    #[test]
    fn revoked_template_rejected() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        factory
            .set_template_approval(&ctx, template, false, true, false)
            .unwrap();

        let err = factory
            .create_market(&ctx, template, "m", &[1], &[Address::random()])
            .unwrap_err();
        assert!(matches!(err, MintError::UnauthorizedTemplate { .. }));
    }

    #[test]
    fn governance_writes_are_admin_only() {
        let (mut factory, _) = setup();
        let outsider = ExecContext::new(Address::random(), Utc::now());
        let err = factory
            .set_template_approval(&outsider, Address::random(), true, true, false)
            .unwrap_err();
        assert!(matches!(err, MintError::Unauthorized { .. }));
        assert!(factory.events().is_empty());
    }

    #[test]
    fn whitelisted_reference_accepted_wildcard() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);

        let instance = factory
            .create_market(&ctx, template, "m", &[5], &[Address::random()])
            .unwrap();
        assert_eq!(factory.markets(), &[instance]);
        assert!(factory.registry().is_supported(instance));
    }

    #[test]
    fn unlisted_reference_rejected() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);

        // Slot 1 has no whitelist entry at all.
        let err = factory
            .create_market(
                &ctx,
                template,
                "m",
                &[5],
                &[Address::random(), Address::random()],
            )
            .unwrap_err();
        assert!(matches!(
            err,
            MintError::UnauthorizedReference { slot: 1, .. }
        ));
        assert_eq!(factory.market_count(), 0);
    }

    #[test]
    fn explicit_whitelist_entry_accepted() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        let specific = Address::random();
        factory
            .set_reference_whitelist(&ctx, template, 1, specific, true)
            .unwrap();

        factory
            .create_market(&ctx, template, "m", &[5], &[Address::random(), specific])
            .unwrap();
        assert_eq!(factory.market_count(), 1);
    }

    #[test]
    fn override_replaces_caller_condition() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        factory
            .set_condition_override(&ctx, template, 0, 42)
            .unwrap();

        let instance = factory
            .create_market(&ctx, template, "m", &[7], &[Address::random()])
            .unwrap();
        let state = factory.instance(instance).unwrap().state();
        assert_eq!(state.conditions, vec![42]);
    }

    #[test]
    fn zero_override_leaves_condition_alone() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        factory
            .set_condition_override(&ctx, template, 0, 0)
            .unwrap();

        let instance = factory
            .create_market(&ctx, template, "m", &[7], &[Address::random()])
            .unwrap();
        assert_eq!(factory.instance(instance).unwrap().state().conditions, [7]);
    }

    #[test]
    fn empty_references_guarded() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        let err = factory
            .create_market(&ctx, template, "m", &[1], &[])
            .unwrap_err();
        assert!(matches!(
            err,
            MintError::IndexOutOfRange { what: "references" }
        ));
    }

    #[test]
    fn empty_conditions_guarded() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        let err = factory
            .create_market(&ctx, template, "m", &[], &[Address::random()])
            .unwrap_err();
        assert!(matches!(
            err,
            MintError::IndexOutOfRange { what: "conditions" }
        ));
    }

    #[test]
    fn missing_code_rejected() {
        let (mut factory, ctx) = setup();
        let template = Address::random();
        factory
            .set_template_approval(&ctx, template, true, true, false)
            .unwrap();
        factory
            .set_reference_whitelist(&ctx, template, 0, Address::WILDCARD, true)
            .unwrap();

        let err = factory
            .create_market(&ctx, template, "m", &[1], &[Address::random()])
            .unwrap_err();
        assert!(matches!(err, MintError::CodeNotInstalled { .. }));
    }

    #[test]
    fn duplicate_key_rejected_when_disallowed() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        let reference = Address::random();

        factory
            .create_market(&ctx, template, "m1", &[5], &[reference])
            .unwrap();
        let err = factory
            .create_market(&ctx, template, "m2", &[5], &[reference])
            .unwrap_err();
        assert!(matches!(err, MintError::DuplicateMarket { .. }));
        assert_eq!(factory.market_count(), 1);
        assert_eq!(factory.registry().supported_count(), 1);
    }

    #[test]
    fn duplicate_key_allowed_when_policy_permits() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, true);
        let reference = Address::random();

        let a = factory
            .create_market(&ctx, template, "m1", &[5], &[reference])
            .unwrap();
        let b = factory
            .create_market(&ctx, template, "m2", &[5], &[reference])
            .unwrap();
        assert_ne!(a, b);
        assert_eq!(factory.markets(), &[a, b]);
        // The key pair is only recorded once.
        assert_eq!(factory.registry().existence_count(), 1);
    }

    #[test]
    fn duplicate_detected_after_override_resolution() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        let reference = Address::random();
        factory
            .set_condition_override(&ctx, template, 0, 9)
            .unwrap();

        // Both calls supply different conditions, but slot 0 resolves to 9.
        factory
            .create_market(&ctx, template, "m1", &[1], &[reference])
            .unwrap();
        let err = factory
            .create_market(&ctx, template, "m2", &[2], &[reference])
            .unwrap_err();
        assert!(matches!(err, MintError::DuplicateMarket { .. }));
    }

    #[test]
    fn failed_initialize_commits_nothing() {
        struct RejectingBlueprint;
        impl Blueprint for RejectingBlueprint {
            fn initialize(
                &self,
                _state: &mut MarketState,
                _metadata: &str,
                _conditions: &[u64],
                _references: &[Address],
            ) -> Result<()> {
                Err(MintError::InitializeFailed {
                    reason: "blueprint said no".into(),
                })
            }
        }

        let (mut factory, ctx) = setup();
        let template = Address::random();
        factory
            .install_template_code(&ctx, template, Arc::new(RejectingBlueprint))
            .unwrap();
        factory
            .set_template_approval(&ctx, template, true, true, false)
            .unwrap();
        factory
            .set_reference_whitelist(&ctx, template, 0, Address::WILDCARD, true)
            .unwrap();
        let events_before = factory.events().len();
        let reference = Address::random();

        let err = factory
            .create_market(&ctx, template, "m", &[5], &[reference])
            .unwrap_err();
        assert!(matches!(err, MintError::InitializeFailed { .. }));

        // No instance, no registry state, no event.
        assert_eq!(factory.market_count(), 0);
        assert_eq!(factory.registry().supported_count(), 0);
        assert!(!factory.registry().confirm_existence(reference, 5));
        assert_eq!(factory.events().len(), events_before);
    }

    #[test]
    fn creation_emits_market_created_event() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);
        let reference = Address::random();

        let instance = factory
            .create_market(&ctx, template, "meta", &[5], &[reference])
            .unwrap();
        let last = factory.events().last().unwrap();
        match &last.kind {
            EventKind::MarketCreated {
                instance: i,
                template: t,
                metadata,
                conditions,
                references,
                ..
            } => {
                assert_eq!(*i, instance);
                assert_eq!(*t, template);
                assert_eq!(metadata, "meta");
                assert_eq!(conditions, &vec![5]);
                assert_eq!(references, &vec![reference]);
            }
            other => panic!("expected MarketCreated, got {other}"),
        }
    }

    #[test]
    fn open_template_allows_any_caller() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, false);

        let outsider = ExecContext::new(Address::random(), ctx.now);
        let instance = factory
            .create_market(&outsider, template, "m", &[5], &[Address::random()])
            .unwrap();
        assert!(factory.instance(instance).is_some());
    }

    #[test]
    fn closed_template_is_admin_only() {
        let (mut factory, ctx) = setup();
        let template = Address::random();
        factory
            .install_template_code(&ctx, template, Arc::new(StandardBlueprint))
            .unwrap();
        // The public write path couples open to approved; a closed-but-
        // approved policy has to be written raw.
        factory.governance_mut().set_policy_raw(
            template,
            TemplatePolicy {
                approved: true,
                open: false,
                allow_duplicate: false,
            },
        );
        factory
            .set_reference_whitelist(&ctx, template, 0, Address::WILDCARD, true)
            .unwrap();

        let outsider = ExecContext::new(Address::random(), ctx.now);
        let err = factory
            .create_market(&outsider, template, "m", &[5], &[Address::random()])
            .unwrap_err();
        assert!(matches!(err, MintError::UnauthorizedSender { .. }));
        assert_eq!(factory.market_count(), 0);

        // The admin proceeds past the sender check.
        factory
            .create_market(&ctx, template, "m", &[5], &[Address::random()])
            .unwrap();
        assert_eq!(factory.market_count(), 1);
    }

    #[test]
    fn transfer_gates_follow_admin_promotion() {
        let (mut factory, ctx) = setup();
        let new_admin = Address::random();
        factory.commit_transfer(&ctx, new_admin).unwrap();
        assert_eq!(factory.pending_admin(), new_admin);
        assert!(factory.transfer_deadline().is_some());

        let late = ExecContext::new(ctx.caller, ctx.now + Duration::days(3));
        factory.apply_transfer(&late).unwrap();
        assert_eq!(factory.admin(), new_admin);

        // Old admin can no longer write governance state.
        let old = ExecContext::new(ctx.caller, late.now);
        let err = factory
            .set_template_approval(&old, Address::random(), true, true, false)
            .unwrap_err();
        assert!(matches!(err, MintError::Unauthorized { .. }));

        // New admin can.
        let fresh = ExecContext::new(new_admin, late.now);
        factory
            .set_template_approval(&fresh, Address::random(), true, true, false)
            .unwrap();
    }

    #[test]
    fn instance_addresses_are_replay_deterministic() {
        let (mut factory, ctx) = setup();
        let template = approve_with_wildcard(&mut factory, &ctx, true);
        let reference = Address::random();

        let a = factory
            .create_market(&ctx, template, "m", &[5], &[reference])
            .unwrap();
        assert_eq!(a, Address::derive_instance(template, ctx.caller, 0));

        let b = factory
            .create_market(&ctx, template, "m", &[5], &[reference])
            .unwrap();
        assert_eq!(b, Address::derive_instance(template, ctx.caller, 1));
    }
}
