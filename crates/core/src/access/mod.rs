pub mod evaluator;
pub mod guard;
pub mod identity;
pub mod memory;
pub mod observer;
pub mod permissions;
pub mod policies;

pub use evaluator::PermissionEvaluator;
pub use guard::{OperationDeclaration, PermissionGuard};
pub use identity::{
    BizId, BizType, ExtractionError, HasIdentifier, OperationArg, UserId, extract_biz_id,
};
pub use memory::MemoryGrantStore;
pub use observer::{GuardObserver, TracingObserver};
pub use permissions::{
    CallerResolver, GrantLookup, GuardFault, PERMISSION_DENIED, PermissionDenied,
    PermissionGrant, PermissionLevel, PermissionRequest, StaticCaller,
};
pub use policies::{AllowReason, PolicyDecision, decide};
