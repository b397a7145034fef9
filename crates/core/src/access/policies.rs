use super::identity::UserId;
use super::permissions::{PermissionGrant, PermissionLevel};
use serde::Serialize;

/// Why a check was allowed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AllowReason {
    Superuser,
    Owner,
    PublicPool,
    ReadGrant,
    WriteGrant,
}

/// Result of a policy evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PolicyDecision {
    Allow(AllowReason),
    Deny,
}

impl PolicyDecision {
    pub const fn is_allowed(self) -> bool {
        matches!(self, Self::Allow(_))
    }
}

/// Decide whether `caller` holds `required` on an object carrying `grants`.
///
/// Owners always pass. Reads pass while nobody owns the object (the public
/// pool) or with any explicit grant. Writes need an explicit Write grant.
/// A caller with no grant on an owned object is denied.
pub fn decide(
    caller: UserId,
    required: PermissionLevel,
    grants: &[PermissionGrant],
) -> PolicyDecision {
    let mine = grants.iter().find(|grant| grant.user_id == caller);

    if mine.is_some_and(|grant| grant.level.is_owner()) {
        return PolicyDecision::Allow(AllowReason::Owner);
    }

    match required {
        PermissionLevel::Read => {
            if !grants.iter().any(|grant| grant.level.is_owner()) {
                return PolicyDecision::Allow(AllowReason::PublicPool);
            }
            match mine.map(|grant| grant.level) {
                Some(PermissionLevel::Write) => PolicyDecision::Allow(AllowReason::WriteGrant),
                Some(PermissionLevel::Read) => PolicyDecision::Allow(AllowReason::ReadGrant),
                _ => PolicyDecision::Deny,
            }
        }
        PermissionLevel::Write => match mine {
            Some(grant) if grant.level.at_least(PermissionLevel::Write) => {
                PolicyDecision::Allow(AllowReason::WriteGrant)
            }
            _ => PolicyDecision::Deny,
        },
        // Only reachable without an Owner grant
        PermissionLevel::Owner => PolicyDecision::Deny,
    }
}
