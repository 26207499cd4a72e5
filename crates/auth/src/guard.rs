//! Ordered, short-circuiting authorization guards.
//!
//! A route owner declares a fixed chain of guards; a single runner evaluates
//! the chain against the request's [`AuthContext`] and stops at the first
//! denial. Evaluation is total: every guard answers Allow or Deny, nothing
//! is skipped, and the same inputs always produce the same decision.

use std::collections::HashSet;
use std::sync::Arc;

use atelier_core::{ProjectId, SubjectId};
use thiserror::Error;

use crate::context::AuthContext;
use crate::error::AuthError;
use crate::role::Role;

// ─────────────────────────────────────────────────────────────────────────────
// Inputs and outcomes
// ─────────────────────────────────────────────────────────────────────────────

/// Parameters a route declares for its guards.
///
/// How the resource id is pulled out of the route (path segment, query, body
/// field) is the route owner's concern; guards only ever see the declared
/// value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteParams {
    pub resource_id: Option<ProjectId>,
}

impl RouteParams {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn for_resource(resource_id: ProjectId) -> Self {
        Self {
            resource_id: Some(resource_id),
        }
    }
}

/// Outcome of a single guard or of a whole chain. There is no partial state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Deny(AuthError),
}

impl GuardDecision {
    pub fn is_allow(&self) -> bool {
        matches!(self, GuardDecision::Allow)
    }
}

/// One authorization check.
///
/// Guards are pure with respect to their inputs; any I/O they perform (the
/// participant guard's ownership lookup) is read-only.
#[async_trait::async_trait]
pub trait Guard: Send + Sync {
    async fn check(&self, ctx: Option<&AuthContext>, params: &RouteParams) -> GuardDecision;
}

// ─────────────────────────────────────────────────────────────────────────────
// Chain
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed, ordered list of guards declared by a route owner.
///
/// Evaluation stops at the first deny. A chain with no guards is public and
/// always allows.
#[derive(Clone, Default)]
pub struct GuardChain {
    guards: Vec<Arc<dyn Guard>>,
}

impl GuardChain {
    pub fn new() -> Self {
        Self { guards: Vec::new() }
    }

    pub fn with(mut self, guard: impl Guard + 'static) -> Self {
        self.guards.push(Arc::new(guard));
        self
    }

    pub fn len(&self) -> usize {
        self.guards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.guards.is_empty()
    }

    /// A route with zero guards is implicitly public.
    pub fn is_public(&self) -> bool {
        self.is_empty()
    }

    pub async fn evaluate(
        &self,
        ctx: Option<&AuthContext>,
        params: &RouteParams,
    ) -> GuardDecision {
        for guard in &self.guards {
            if let GuardDecision::Deny(reason) = guard.check(ctx, params).await {
                return GuardDecision::Deny(reason);
            }
        }
        GuardDecision::Allow
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Guard variants
// ─────────────────────────────────────────────────────────────────────────────

/// Requires that the upstream pipeline produced an authenticated context.
pub struct AuthenticationGuard;

#[async_trait::async_trait]
impl Guard for AuthenticationGuard {
    async fn check(&self, ctx: Option<&AuthContext>, _params: &RouteParams) -> GuardDecision {
        match ctx {
            Some(_) => GuardDecision::Allow,
            None => GuardDecision::Deny(AuthError::Unauthenticated),
        }
    }
}

/// Restricts a route to an explicit set of roles.
///
/// There is no wildcard and no implicit elevation: a route that should admit
/// admins lists [`Role::Admin`] like any other role. Because [`Role`] is a
/// closed enum, a role added to the platform later can never slip past an
/// outdated allow-list; it is simply not a member and gets denied.
pub struct RoleGuard {
    allowed: Vec<Role>,
}

impl RoleGuard {
    pub fn allowing(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            allowed: roles.into_iter().collect(),
        }
    }
}

#[async_trait::async_trait]
impl Guard for RoleGuard {
    async fn check(&self, ctx: Option<&AuthContext>, _params: &RouteParams) -> GuardDecision {
        let Some(ctx) = ctx else {
            return GuardDecision::Deny(AuthError::Unauthenticated);
        };

        if self.allowed.contains(&ctx.role()) {
            GuardDecision::Allow
        } else {
            GuardDecision::Deny(AuthError::InsufficientRole {
                allowed: self.allowed.clone(),
            })
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Resource ownership
// ─────────────────────────────────────────────────────────────────────────────

/// Stateless value describing one access check against one resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceAccessQuery {
    pub resource_id: ProjectId,
    pub subject_id: SubjectId,
}

/// Subjects entitled to act on a resource. Guards only test membership; the
/// set is never mutated on the authorization path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParticipantSet {
    owners: HashSet<SubjectId>,
}

impl ParticipantSet {
    pub fn new(owners: impl IntoIterator<Item = SubjectId>) -> Self {
        Self {
            owners: owners.into_iter().collect(),
        }
    }

    pub fn contains(&self, subject: &SubjectId) -> bool {
        self.owners.contains(subject)
    }
}

impl FromIterator<SubjectId> for ParticipantSet {
    fn from_iter<I: IntoIterator<Item = SubjectId>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// The ownership lookup could not answer (store unreachable, query failed).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("ownership lookup failed: {0}")]
pub struct LookupError(pub String);

/// Boundary to whatever store knows which subjects own a resource.
#[async_trait::async_trait]
pub trait ResourceOwnershipLookup: Send + Sync {
    /// `Ok(None)` means the resource does not exist.
    async fn participants(
        &self,
        query: &ResourceAccessQuery,
    ) -> Result<Option<ParticipantSet>, LookupError>;
}

/// Restricts a route to participants of the resource it targets.
///
/// Admins pass before any lookup happens. A failed lookup is a denial: the
/// guard never allows on the absence of a negative signal.
pub struct ResourceParticipantGuard {
    lookup: Arc<dyn ResourceOwnershipLookup>,
}

impl ResourceParticipantGuard {
    pub fn new(lookup: Arc<dyn ResourceOwnershipLookup>) -> Self {
        Self { lookup }
    }
}

#[async_trait::async_trait]
impl Guard for ResourceParticipantGuard {
    async fn check(&self, ctx: Option<&AuthContext>, params: &RouteParams) -> GuardDecision {
        let Some(ctx) = ctx else {
            return GuardDecision::Deny(AuthError::Unauthenticated);
        };

        // Administrative override, checked before the lookup so admin traffic
        // costs no ownership query.
        if ctx.role().is_admin() {
            return GuardDecision::Allow;
        }

        let Some(resource_id) = params.resource_id else {
            // A participant-guarded route that declared no resource id is a
            // wiring defect; deny rather than guess.
            tracing::warn!("participant guard evaluated without a declared resource id");
            return GuardDecision::Deny(AuthError::ResourceNotFound);
        };

        let query = ResourceAccessQuery {
            resource_id,
            subject_id: ctx.subject_id().clone(),
        };

        match self.lookup.participants(&query).await {
            Ok(Some(owners)) if owners.contains(ctx.subject_id()) => GuardDecision::Allow,
            Ok(Some(_)) => GuardDecision::Deny(AuthError::NotParticipant {
                subject: ctx.subject_id().clone(),
                resource: resource_id,
            }),
            Ok(None) => GuardDecision::Deny(AuthError::ResourceNotFound),
            Err(err) => {
                tracing::error!(error = %err, resource_id = %resource_id, "ownership lookup failed");
                GuardDecision::Deny(AuthError::NotParticipant {
                    subject: ctx.subject_id().clone(),
                    resource: resource_id,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use proptest::prelude::*;

    use super::*;
    use crate::context::ProfileAttributes;

    fn ctx(subject: &str, role: Role) -> AuthContext {
        AuthContext::new(
            SubjectId::new(subject),
            format!("{subject}@example.com"),
            subject.to_uppercase(),
            role,
            ProfileAttributes::default(),
        )
    }

    /// Guard that records how often it ran, for short-circuit assertions.
    struct RecordingGuard {
        decision: GuardDecision,
        calls: Arc<AtomicUsize>,
    }

    impl RecordingGuard {
        fn new(decision: GuardDecision) -> (Self, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Self {
                    decision,
                    calls: calls.clone(),
                },
                calls,
            )
        }
    }

    #[async_trait::async_trait]
    impl Guard for RecordingGuard {
        async fn check(&self, _ctx: Option<&AuthContext>, _params: &RouteParams) -> GuardDecision {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.decision.clone()
        }
    }

    struct FixedLookup {
        result: Result<Option<ParticipantSet>, LookupError>,
        calls: Arc<AtomicUsize>,
    }

    impl FixedLookup {
        fn new(result: Result<Option<ParticipantSet>, LookupError>) -> (Arc<Self>, Arc<AtomicUsize>) {
            let calls = Arc::new(AtomicUsize::new(0));
            (
                Arc::new(Self {
                    result,
                    calls: calls.clone(),
                }),
                calls,
            )
        }
    }

    #[async_trait::async_trait]
    impl ResourceOwnershipLookup for FixedLookup {
        async fn participants(
            &self,
            _query: &ResourceAccessQuery,
        ) -> Result<Option<ParticipantSet>, LookupError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.result.clone()
        }
    }

    fn owners(subjects: &[&str]) -> ParticipantSet {
        subjects.iter().map(|s| SubjectId::new(*s)).collect()
    }

    #[tokio::test]
    async fn empty_chain_is_public() {
        let chain = GuardChain::new();
        assert!(chain.is_public());
        assert!(chain.evaluate(None, &RouteParams::none()).await.is_allow());
    }

    #[tokio::test]
    async fn authentication_guard_requires_a_context() {
        let guard = AuthenticationGuard;
        assert!(
            guard
                .check(Some(&ctx("u1", Role::Client)), &RouteParams::none())
                .await
                .is_allow()
        );
        assert_eq!(
            guard.check(None, &RouteParams::none()).await,
            GuardDecision::Deny(AuthError::Unauthenticated)
        );
    }

    #[tokio::test]
    async fn role_guard_allows_exactly_the_allowed_set() {
        let guard = RoleGuard::allowing([Role::Client, Role::Designer]);

        for role in [Role::Client, Role::Designer] {
            assert!(
                guard
                    .check(Some(&ctx("u1", role)), &RouteParams::none())
                    .await
                    .is_allow()
            );
        }

        let denied = guard
            .check(Some(&ctx("u3", Role::Admin)), &RouteParams::none())
            .await;
        assert!(matches!(
            denied,
            GuardDecision::Deny(AuthError::InsufficientRole { .. })
        ));
    }

    #[tokio::test]
    async fn admin_is_not_implicitly_allowed_by_role_guard() {
        let guard = RoleGuard::allowing([Role::Designer]);
        let denied = guard
            .check(Some(&ctx("root", Role::Admin)), &RouteParams::none())
            .await;
        assert!(!denied.is_allow());
    }

    #[tokio::test]
    async fn chain_short_circuits_at_the_first_deny() {
        let (first, first_calls) =
            RecordingGuard::new(GuardDecision::Deny(AuthError::Unauthenticated));
        let (second, second_calls) = RecordingGuard::new(GuardDecision::Allow);

        let chain = GuardChain::new().with(first).with(second);
        let decision = chain.evaluate(None, &RouteParams::none()).await;

        assert_eq!(decision, GuardDecision::Deny(AuthError::Unauthenticated));
        assert_eq!(first_calls.load(Ordering::SeqCst), 1);
        assert_eq!(second_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn chain_evaluation_is_idempotent() {
        let lookup = FixedLookup::new(Ok(Some(owners(&["u1", "u2"])))).0;
        let chain = GuardChain::new()
            .with(AuthenticationGuard)
            .with(RoleGuard::allowing([Role::Client]))
            .with(ResourceParticipantGuard::new(lookup));

        let context = ctx("u1", Role::Client);
        let params = RouteParams::for_resource(ProjectId::new());

        let first = chain.evaluate(Some(&context), &params).await;
        let second = chain.evaluate(Some(&context), &params).await;
        assert_eq!(first, second);
        assert!(first.is_allow());
    }

    #[tokio::test]
    async fn participant_guard_allows_a_member() {
        let (lookup, _) = FixedLookup::new(Ok(Some(owners(&["u1", "u2"]))));
        let guard = ResourceParticipantGuard::new(lookup);

        let decision = guard
            .check(
                Some(&ctx("u1", Role::Client)),
                &RouteParams::for_resource(ProjectId::new()),
            )
            .await;
        assert!(decision.is_allow());
    }

    #[tokio::test]
    async fn participant_guard_denies_a_non_member() {
        let (lookup, _) = FixedLookup::new(Ok(Some(owners(&["u2", "u3"]))));
        let guard = ResourceParticipantGuard::new(lookup);

        let decision = guard
            .check(
                Some(&ctx("u1", Role::Client)),
                &RouteParams::for_resource(ProjectId::new()),
            )
            .await;
        assert!(matches!(
            decision,
            GuardDecision::Deny(AuthError::NotParticipant { .. })
        ));
    }

    #[tokio::test]
    async fn participant_guard_admin_override_skips_the_lookup() {
        let (lookup, calls) = FixedLookup::new(Ok(Some(owners(&["u1"]))));
        let guard = ResourceParticipantGuard::new(lookup);

        let decision = guard
            .check(
                Some(&ctx("root", Role::Admin)),
                &RouteParams::for_resource(ProjectId::new()),
            )
            .await;

        assert!(decision.is_allow());
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn participant_guard_reports_a_missing_resource() {
        let (lookup, _) = FixedLookup::new(Ok(None));
        let guard = ResourceParticipantGuard::new(lookup);

        let decision = guard
            .check(
                Some(&ctx("u1", Role::Client)),
                &RouteParams::for_resource(ProjectId::new()),
            )
            .await;
        assert_eq!(decision, GuardDecision::Deny(AuthError::ResourceNotFound));
    }

    #[tokio::test]
    async fn participant_guard_fails_closed_on_lookup_error() {
        let (lookup, _) = FixedLookup::new(Err(LookupError("connection reset".into())));
        let guard = ResourceParticipantGuard::new(lookup);

        let decision = guard
            .check(
                Some(&ctx("u1", Role::Client)),
                &RouteParams::for_resource(ProjectId::new()),
            )
            .await;
        assert!(matches!(
            decision,
            GuardDecision::Deny(AuthError::NotParticipant { .. })
        ));
    }

    #[tokio::test]
    async fn participant_guard_denies_without_a_declared_resource() {
        let (lookup, calls) = FixedLookup::new(Ok(Some(owners(&["u1"]))));
        let guard = ResourceParticipantGuard::new(lookup);

        let decision = guard
            .check(Some(&ctx("u1", Role::Client)), &RouteParams::none())
            .await;

        assert_eq!(decision, GuardDecision::Deny(AuthError::ResourceNotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    proptest! {
        #[test]
        fn role_guard_decision_is_set_membership(
            role_ix in 0usize..3,
            allowed_mask in 0u8..8,
        ) {
            let all = [Role::Client, Role::Designer, Role::Admin];
            let role = all[role_ix];
            let allowed: Vec<Role> = all
                .iter()
                .enumerate()
                .filter(|(i, _)| allowed_mask & (1 << i) != 0)
                .map(|(_, r)| *r)
                .collect();

            let expected = allowed.contains(&role);
            let guard = RoleGuard::allowing(allowed);

            let rt = tokio::runtime::Builder::new_current_thread()
                .build()
                .unwrap();
            let decision = rt.block_on(
                guard.check(Some(&ctx("u1", role)), &RouteParams::none()),
            );
            prop_assert_eq!(decision.is_allow(), expected);
        }
    }
}
