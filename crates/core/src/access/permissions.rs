use super::identity::{BizId, BizType, ExtractionError, UserId};
use crate::errors::{Error, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt::{self, Display};
use thiserror::Error;

/// Error code reported with every denial unless configured otherwise
pub const PERMISSION_DENIED: i32 = 1_020_007_003;

/// Message reported with every denial unless configured otherwise.
/// `{}` is replaced by the business type's display name.
pub const PERMISSION_DENIED_MESSAGE: &str = "{} operation failed: no permission";

/// Level of access a grant confers.
///
/// Ordered Owner > Write > Read. The storage tags do not follow that order,
/// so comparisons go through [`PermissionLevel::at_least`] or `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionLevel {
    Owner,
    Read,
    Write,
}

impl PermissionLevel {
    pub const fn tag(self) -> i32 {
        match self {
            Self::Owner => 1,
            Self::Read => 2,
            Self::Write => 3,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            1 => Ok(Self::Owner),
            2 => Ok(Self::Read),
            3 => Ok(Self::Write),
            other => Err(Error::UnknownPermissionLevel(other)),
        }
    }

    const fn rank(self) -> u8 {
        match self {
            Self::Read => 1,
            Self::Write => 2,
            Self::Owner => 3,
        }
    }

    /// Whether this level implies `threshold`
    pub const fn at_least(self, threshold: Self) -> bool {
        self.rank() >= threshold.rank()
    }

    pub const fn is_owner(self) -> bool {
        matches!(self, Self::Owner)
    }
}

impl PartialOrd for PermissionLevel {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PermissionLevel {
    fn cmp(&self, other: &Self) -> Ordering {
        self.rank().cmp(&other.rank())
    }
}

impl Display for PermissionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Owner => write!(f, "owner"),
            Self::Read => write!(f, "read"),
            Self::Write => write!(f, "write"),
        }
    }
}

/// One caller's permission on one business object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionGrant {
    pub biz_type: BizType,
    pub biz_id: BizId,
    pub user_id: UserId,
    pub level: PermissionLevel,
}

impl PermissionGrant {
    pub const fn new(
        biz_type: BizType,
        biz_id: BizId,
        user_id: UserId,
        level: PermissionLevel,
    ) -> Self {
        Self {
            biz_type,
            biz_id,
            user_id,
            level,
        }
    }
}

/// A single access check, built per guarded call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PermissionRequest {
    pub caller_id: UserId,
    pub biz_type: BizType,
    pub biz_id: Option<BizId>,
    pub required: PermissionLevel,
}

/// The only error a guarded call's caller ever sees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Error)]
#[error("{message}")]
pub struct PermissionDenied {
    pub code: i32,
    pub biz_type: BizType,
    message: String,
}

impl PermissionDenied {
    /// Build a denial, substituting the business type name into `template`
    pub fn new(code: i32, template: &str, biz_type: BizType) -> Self {
        Self {
            code,
            biz_type,
            message: template.replacen("{}", biz_type.name(), 1),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<BizType> for PermissionDenied {
    fn from(biz_type: BizType) -> Self {
        Self::new(PERMISSION_DENIED, PERMISSION_DENIED_MESSAGE, biz_type)
    }
}

/// Internal failures while deciding; collapsed into [`PermissionDenied`]
/// before they leave the guard
#[derive(Debug, Error)]
pub enum GuardFault {
    #[error("No caller in the current context")]
    MissingCaller,

    #[error("Failed to resolve object id: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Failed to load grants: {0}")]
    Lookup(#[source] Error),

    #[error("Policy evaluation failed: {0}")]
    Evaluation(String),
}

impl GuardFault {
    /// Stage of the check that failed
    #[must_use]
    pub const fn stage(&self) -> &'static str {
        match self {
            Self::MissingCaller => "caller",
            Self::Extraction(_) => "extraction",
            Self::Lookup(_) => "lookup",
            Self::Evaluation(_) => "evaluation",
        }
    }
}

/// Read access to stored grants
#[async_trait]
pub trait GrantLookup: Send + Sync {
    /// All grants attached to one business object, empty if there are none
    async fn get_grants(&self, biz_type: BizType, biz_id: BizId)
    -> Result<Vec<PermissionGrant>>;
}

/// Resolves the caller of the current request or session
pub trait CallerResolver: Send + Sync {
    fn current_user_id(&self) -> Option<UserId>;
}

/// Caller fixed at construction, for contexts that already know who is acting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticCaller(pub Option<UserId>);

impl CallerResolver for StaticCaller {
    fn current_user_id(&self) -> Option<UserId> {
        self.0
    }
}
