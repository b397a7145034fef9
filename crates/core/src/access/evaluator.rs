use super::identity::{BizId, BizType, UserId};
use super::permissions::{GrantLookup, GuardFault, PermissionLevel, PermissionRequest};
use super::policies::{AllowReason, PolicyDecision, decide};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Loads the grants on an object and applies the row-level policy
#[derive(Clone)]
pub struct PermissionEvaluator {
    lookup: Arc<dyn GrantLookup>,
    superusers: HashSet<UserId>,
}

impl PermissionEvaluator {
    pub fn new(lookup: Arc<dyn GrantLookup>) -> Self {
        Self {
            lookup,
            superusers: HashSet::new(),
        }
    }

    /// Callers that pass every check without a lookup
    #[must_use]
    pub fn with_superusers(mut self, superusers: impl IntoIterator<Item = UserId>) -> Self {
        self.superusers.extend(superusers);
        self
    }

    pub async fn check_access(
        &self,
        caller_id: UserId,
        biz_type: BizType,
        biz_id: Option<BizId>,
        required: PermissionLevel,
    ) -> Result<PolicyDecision, GuardFault> {
        self.check(&PermissionRequest {
            caller_id,
            biz_type,
            biz_id,
            required,
        })
        .await
    }

    #[instrument(
        name = "guard.check",
        skip(self, request),
        fields(
            caller_id = request.caller_id,
            biz_type = %request.biz_type,
            biz_id = ?request.biz_id,
            required = %request.required,
        )
    )]
    pub async fn check(&self, request: &PermissionRequest) -> Result<PolicyDecision, GuardFault> {
        if self.superusers.contains(&request.caller_id) {
            return Ok(PolicyDecision::Allow(AllowReason::Superuser));
        }

        // A missing id behaves like an object without grants
        let grants = match request.biz_id {
            Some(biz_id) => self
                .lookup
                .get_grants(request.biz_type, biz_id)
                .await
                .map_err(GuardFault::Lookup)?,
            None => Vec::new(),
        };

        if let Some(stray) = grants
            .iter()
            .find(|grant| grant.biz_type != request.biz_type || Some(grant.biz_id) != request.biz_id)
        {
            return Err(GuardFault::Evaluation(format!(
                "lookup returned a grant for {}#{}",
                stray.biz_type, stray.biz_id
            )));
        }

        let decision = decide(request.caller_id, request.required, &grants);
        debug!(grants = grants.len(), ?decision, "Permission evaluated");
        Ok(decision)
    }
}
