//! Field-level authorization shared by both registries.
//!
//! Every gated operation names an [`AccessRule`]; the registry's
//! [`AccessPolicy`] decides whether the caller satisfies it and, if so,
//! reports which identity did via a [`Grant`].
//!
//! | Operation | Rule |
//! |-----------|------|
//! | civilization `update_status` | [`AccessRule::CreatorOrPrivileged`] |
//! | civilization `update_parameters` | [`AccessRule::Creator`] |
//! | technology `advance` | [`AccessRule::Role`] |

use civitas_types::{Grant, Operation, Principal};

/// Default identity of the privileged principal.
pub const DEFAULT_PRIVILEGED_PRINCIPAL: &str = "CONTRACT_OWNER";

/// Default identity of the fixed role allowed to advance technologies.
pub const DEFAULT_ADVANCE_ROLE: &str = "creator";

/// Who may perform a gated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessRule {
    /// Only the record's creator.
    Creator,
    /// The record's creator or the privileged principal.
    CreatorOrPrivileged,
    /// Only the fixed role configured for the operation, regardless of who
    /// created the record.
    Role,
}

impl AccessRule {
    /// Return the rule a gated operation is checked against.
    pub const fn for_operation(operation: Operation) -> Self {
        match operation {
            Operation::UpdateStatus => Self::CreatorOrPrivileged,
            Operation::UpdateParameters => Self::Creator,
            Operation::AdvanceTechnology => Self::Role,
        }
    }
}

/// The configured identities that authorization compares against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    privileged: Principal,
    advance_role: Principal,
}

impl AccessPolicy {
    /// Create a policy from explicit identities.
    pub const fn new(privileged: Principal, advance_role: Principal) -> Self {
        Self {
            privileged,
            advance_role,
        }
    }

    /// Return the privileged principal.
    pub const fn privileged(&self) -> &Principal {
        &self.privileged
    }

    /// Return the fixed role allowed to advance technologies.
    pub const fn advance_role(&self) -> &Principal {
        &self.advance_role
    }

    /// Check `caller` against `rule` for a record created by `creator`.
    ///
    /// Returns the identity that satisfied the rule, or `None` if the caller
    /// is not authorized. A creator match is preferred over a privileged
    /// match when the caller happens to be both.
    pub fn authorize(
        &self,
        rule: AccessRule,
        creator: &Principal,
        caller: &Principal,
    ) -> Option<Grant> {
        match rule {
            AccessRule::Creator => (caller == creator).then_some(Grant::Creator),
            AccessRule::CreatorOrPrivileged => {
                if caller == creator {
                    Some(Grant::Creator)
                } else if *caller == self.privileged {
                    Some(Grant::Privileged)
                } else {
                    None
                }
            }
            AccessRule::Role => (*caller == self.advance_role).then_some(Grant::Role),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(
            Principal::from(DEFAULT_PRIVILEGED_PRINCIPAL),
            Principal::from(DEFAULT_ADVANCE_ROLE),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(s: &str) -> Principal {
        Principal::from(s)
    }

    #[test]
    fn creator_rule_ignores_privileged_principal() {
        let policy = AccessPolicy::default();
        let creator = p("user1");
        assert_eq!(
            policy.authorize(AccessRule::Creator, &creator, &p("user1")),
            Some(Grant::Creator)
        );
        assert_eq!(
            policy.authorize(AccessRule::Creator, &creator, &p("CONTRACT_OWNER")),
            None
        );
    }

    #[test]
    fn creator_or_privileged_accepts_both() {
        let policy = AccessPolicy::default();
        let creator = p("user2");
        let rule = AccessRule::CreatorOrPrivileged;
        assert_eq!(policy.authorize(rule, &creator, &p("user2")), Some(Grant::Creator));
        assert_eq!(
            policy.authorize(rule, &creator, &p("CONTRACT_OWNER")),
            Some(Grant::Privileged)
        );
        assert_eq!(policy.authorize(rule, &creator, &p("unauthorized_user")), None);
    }

    #[test]
    fn creator_wins_when_creator_is_also_privileged() {
        let policy = AccessPolicy::default();
        let owner = p("CONTRACT_OWNER");
        assert_eq!(
            policy.authorize(AccessRule::CreatorOrPrivileged, &owner, &owner),
            Some(Grant::Creator)
        );
    }

    #[test]
    fn role_rule_compares_against_sentinel_not_creator() {
        let policy = AccessPolicy::default();
        let creator = p("user2");
        assert_eq!(
            policy.authorize(AccessRule::Role, &creator, &p("creator")),
            Some(Grant::Role)
        );
        assert_eq!(policy.authorize(AccessRule::Role, &creator, &p("user2")), None);
    }

    #[test]
    fn configured_identities_replace_defaults() {
        let policy = AccessPolicy::new(p("admin"), p("researcher"));
        let creator = p("user1");
        assert_eq!(
            policy.authorize(AccessRule::CreatorOrPrivileged, &creator, &p("admin")),
            Some(Grant::Privileged)
        );
        assert_eq!(
            policy.authorize(AccessRule::CreatorOrPrivileged, &creator, &p("CONTRACT_OWNER")),
            None
        );
        assert_eq!(
            policy.authorize(AccessRule::Role, &creator, &p("researcher")),
            Some(Grant::Role)
        );
    }

    #[test]
    fn operations_map_to_expected_rules() {
        assert_eq!(
            AccessRule::for_operation(Operation::UpdateStatus),
            AccessRule::CreatorOrPrivileged
        );
        assert_eq!(
            AccessRule::for_operation(Operation::UpdateParameters),
            AccessRule::Creator
        );
        assert_eq!(
            AccessRule::for_operation(Operation::AdvanceTechnology),
            AccessRule::Role
        );
    }
}
