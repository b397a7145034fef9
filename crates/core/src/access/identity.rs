use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};
use thiserror::Error;

/// Identifier of a business object instance
pub type BizId = i64;

/// Identifier of a caller
pub type UserId = i64;

/// Category of business object a grant applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BizType {
    Leads,
    Customer,
    Contact,
    Business,
    Contract,
    Product,
    Receivable,
    ReceivablePlan,
}

impl BizType {
    /// Integer tag used by grant storage
    pub const fn tag(self) -> i32 {
        match self {
            Self::Leads => 1,
            Self::Customer => 2,
            Self::Contact => 3,
            Self::Business => 4,
            Self::Contract => 5,
            Self::Product => 6,
            Self::Receivable => 7,
            Self::ReceivablePlan => 8,
        }
    }

    pub fn from_tag(tag: i32) -> Result<Self> {
        match tag {
            1 => Ok(Self::Leads),
            2 => Ok(Self::Customer),
            3 => Ok(Self::Contact),
            4 => Ok(Self::Business),
            5 => Ok(Self::Contract),
            6 => Ok(Self::Product),
            7 => Ok(Self::Receivable),
            8 => Ok(Self::ReceivablePlan),
            other => Err(Error::UnknownBizType(other)),
        }
    }

    /// Display name attached to denials
    pub const fn name(self) -> &'static str {
        match self {
            Self::Leads => "leads",
            Self::Customer => "customer",
            Self::Contact => "contact",
            Self::Business => "business opportunity",
            Self::Contract => "contract",
            Self::Product => "product",
            Self::Receivable => "receivable",
            Self::ReceivablePlan => "receivable plan",
        }
    }
}

impl Display for BizType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<i32> for BizType {
    type Error = Error;

    fn try_from(tag: i32) -> Result<Self> {
        Self::from_tag(tag)
    }
}

/// Argument types that carry the id of the business object they target.
///
/// Implemented by request types of guarded operations so the guard can
/// find the object id without knowing the operation's signature.
pub trait HasIdentifier {
    /// Name matched against an operation's declared id-bearing types
    const TYPE_NAME: &'static str;

    /// The object id, if the value carries one
    fn identifier(&self) -> Option<BizId>;

    fn as_arg(&self) -> OperationArg {
        OperationArg::Record {
            type_name: Self::TYPE_NAME,
            id: self.identifier(),
        }
    }
}

/// One argument of a guarded operation, as seen by the guard
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperationArg {
    Null,
    Id(BizId),
    Text(String),
    Record {
        type_name: &'static str,
        id: Option<BizId>,
    },
}

impl OperationArg {
    pub fn of<T: HasIdentifier>(value: &T) -> Self {
        value.as_arg()
    }

    /// Short description of the argument's type
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Id(_) => "id",
            Self::Text(_) => "text",
            Self::Record { type_name, .. } => *type_name,
        }
    }
}

impl From<BizId> for OperationArg {
    fn from(id: BizId) -> Self {
        Self::Id(id)
    }
}

impl From<Option<BizId>> for OperationArg {
    fn from(id: Option<BizId>) -> Self {
        id.map_or(Self::Null, Self::Id)
    }
}

impl From<String> for OperationArg {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<&str> for OperationArg {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

/// Reasons the object id could not be resolved from an operation's arguments
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Operation has no arguments to take an id from")]
    MissingArgument,

    #[error("First argument is not an integer id (found {0})")]
    TypeMismatch(&'static str),

    #[error("Argument of type {0} carries no id")]
    MissingId(&'static str),
}

/// Resolve the business object id targeted by an operation.
///
/// With no declared types the first argument is the id, and a null first
/// argument means no id. Otherwise the first non-null argument whose type is
/// declared supplies it, and `Ok(None)` means no argument matched.
pub fn extract_biz_id(
    args: &[OperationArg],
    id_for: &[&str],
) -> std::result::Result<Option<BizId>, ExtractionError> {
    if id_for.is_empty() {
        return match args.first() {
            Some(OperationArg::Id(id)) => Ok(Some(*id)),
            Some(OperationArg::Null) => Ok(None),
            Some(other) => Err(ExtractionError::TypeMismatch(other.kind())),
            None => Err(ExtractionError::MissingArgument),
        };
    }

    for arg in args {
        if let &OperationArg::Record { type_name, id } = arg {
            if !id_for.contains(&type_name) {
                continue;
            }
            return id.map(Some).ok_or(ExtractionError::MissingId(type_name));
        }
    }

    Ok(None)
}
