use super::guard::OperationDeclaration;
use super::permissions::{GuardFault, PermissionRequest};
use super::policies::AllowReason;
use crate::telemetry::metrics::{self, counter};
use tracing::{debug, error, warn};

/// Receives the outcome of every guarded check.
///
/// This is the single place where decisions become log lines, so the
/// evaluator and extractor stay free of reporting concerns.
pub trait GuardObserver: Send + Sync {
    fn on_allowed(&self, _request: &PermissionRequest, _reason: AllowReason) {}

    fn on_denied(&self, request: &PermissionRequest);

    /// `request` is absent when the fault happened before it could be built
    fn on_fault(
        &self,
        declaration: &OperationDeclaration,
        request: Option<&PermissionRequest>,
        fault: &GuardFault,
    );
}

/// Default observer: structured log events plus the global decision counters
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl GuardObserver for TracingObserver {
    fn on_allowed(&self, request: &PermissionRequest, reason: AllowReason) {
        counter(metrics::ALLOWED).increment();
        debug!(
            caller_id = request.caller_id,
            biz_type = %request.biz_type,
            biz_id = ?request.biz_id,
            ?reason,
            "Permission granted"
        );
    }

    fn on_denied(&self, request: &PermissionRequest) {
        counter(metrics::DENIED).increment();
        warn!(
            caller_id = request.caller_id,
            biz_type = %request.biz_type,
            biz_id = ?request.biz_id,
            required = %request.required,
            "Permission denied"
        );
    }

    fn on_fault(
        &self,
        declaration: &OperationDeclaration,
        request: Option<&PermissionRequest>,
        fault: &GuardFault,
    ) {
        counter(metrics::FAULTS).increment();
        let declaration = serde_json::to_string(declaration).unwrap_or_default();
        let request = request
            .and_then(|request| serde_json::to_string(request).ok())
            .unwrap_or_default();
        error!(
            stage = fault.stage(),
            %declaration,
            %request,
            error = %fault,
            "Permission check failed"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::identity::BizType;
    use crate::access::permissions::PermissionLevel;
    use crate::telemetry::metrics::global;

    #[test]
    fn test_tracing_observer_counts_denials() {
        let request = PermissionRequest {
            caller_id: 9,
            biz_type: BizType::Product,
            biz_id: Some(4),
            required: PermissionLevel::Write,
        };
        let before = global().counter(metrics::DENIED).get();

        TracingObserver.on_denied(&request);

        assert!(global().counter(metrics::DENIED).get() > before);
    }
}
