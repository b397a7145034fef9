use super::evaluator::PermissionEvaluator;
use super::identity::{BizType, HasIdentifier, OperationArg, extract_biz_id};
use super::observer::{GuardObserver, TracingObserver};
use super::permissions::{
    CallerResolver, GrantLookup, GuardFault, PERMISSION_DENIED, PERMISSION_DENIED_MESSAGE,
    PermissionDenied, PermissionLevel, PermissionRequest,
};
use super::policies::PolicyDecision;
use crate::config::GuardConfig;
use serde::Serialize;
use std::future::Future;
use std::sync::Arc;

/// What a guarded operation requires
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationDeclaration {
    pub biz_type: BizType,
    pub level: PermissionLevel,
    /// Argument types carrying the object id; empty means the first argument is the id
    pub id_for: Vec<&'static str>,
}

impl OperationDeclaration {
    pub const fn new(biz_type: BizType, level: PermissionLevel) -> Self {
        Self {
            biz_type,
            level,
            id_for: Vec::new(),
        }
    }

    pub const fn read(biz_type: BizType) -> Self {
        Self::new(biz_type, PermissionLevel::Read)
    }

    pub const fn write(biz_type: BizType) -> Self {
        Self::new(biz_type, PermissionLevel::Write)
    }

    /// Take the object id from arguments named `type_name`
    #[must_use]
    pub fn id_for(mut self, type_name: &'static str) -> Self {
        self.id_for.push(type_name);
        self
    }

    /// Take the object id from arguments of type `T`
    #[must_use]
    pub fn id_from<T: HasIdentifier>(self) -> Self {
        self.id_for(T::TYPE_NAME)
    }
}

/// Pre-operation permission check.
///
/// Every internal failure is reported to the observer and then surfaces as
/// the same [`PermissionDenied`] a policy refusal produces.
#[derive(Clone)]
pub struct PermissionGuard {
    evaluator: PermissionEvaluator,
    observer: Arc<dyn GuardObserver>,
    denial_code: i32,
    denial_message: String,
}

impl PermissionGuard {
    pub fn new(evaluator: PermissionEvaluator) -> Self {
        Self {
            evaluator,
            observer: Arc::new(TracingObserver),
            denial_code: PERMISSION_DENIED,
            denial_message: PERMISSION_DENIED_MESSAGE.to_string(),
        }
    }

    pub fn from_config(lookup: Arc<dyn GrantLookup>, config: &GuardConfig) -> Self {
        let evaluator =
            PermissionEvaluator::new(lookup).with_superusers(config.superusers.iter().copied());
        Self::new(evaluator).with_denial(config.denial.code, config.denial.message.clone())
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Arc<dyn GuardObserver>) -> Self {
        self.observer = observer;
        self
    }

    #[must_use]
    pub fn with_denial(mut self, code: i32, message: impl Into<String>) -> Self {
        self.denial_code = code;
        self.denial_message = message.into();
        self
    }

    pub const fn evaluator(&self) -> &PermissionEvaluator {
        &self.evaluator
    }

    /// Check that the current caller may perform `declaration` on the object
    /// identified by `args`
    pub async fn evaluate(
        &self,
        caller: &dyn CallerResolver,
        args: &[OperationArg],
        declaration: &OperationDeclaration,
    ) -> Result<(), PermissionDenied> {
        let Some(caller_id) = caller.current_user_id() else {
            return Err(self.fault(declaration, None, &GuardFault::MissingCaller));
        };

        let biz_id = match extract_biz_id(args, &declaration.id_for) {
            Ok(biz_id) => biz_id,
            Err(e) => return Err(self.fault(declaration, None, &GuardFault::from(e))),
        };

        let request = PermissionRequest {
            caller_id,
            biz_type: declaration.biz_type,
            biz_id,
            required: declaration.level,
        };

        match self.evaluator.check(&request).await {
            Ok(PolicyDecision::Allow(reason)) => {
                self.observer.on_allowed(&request, reason);
                Ok(())
            }
            Ok(PolicyDecision::Deny) => {
                self.observer.on_denied(&request);
                Err(self.denial(declaration.biz_type))
            }
            Err(fault) => Err(self.fault(declaration, Some(&request), &fault)),
        }
    }

    /// Run `operation` only if the check allows it
    pub async fn run<F, Fut, T, E>(
        &self,
        caller: &dyn CallerResolver,
        args: &[OperationArg],
        declaration: &OperationDeclaration,
        operation: F,
    ) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: From<PermissionDenied>,
    {
        self.evaluate(caller, args, declaration).await?;
        operation().await
    }

    fn denial(&self, biz_type: BizType) -> PermissionDenied {
        PermissionDenied::new(self.denial_code, &self.denial_message, biz_type)
    }

    fn fault(
        &self,
        declaration: &OperationDeclaration,
        request: Option<&PermissionRequest>,
        fault: &GuardFault,
    ) -> PermissionDenied {
        self.observer.on_fault(declaration, request, fault);
        self.denial(declaration.biz_type)
    }
}
