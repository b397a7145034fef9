//! Row types shared between database implementations

use chrono::{DateTime, Utc};
use rowguard_core::access::{BizType, PermissionGrant, PermissionLevel};
use rowguard_core::{Error, Result};
use sqlx::FromRow;

pub fn datetime_to_string(dt: DateTime<Utc>) -> String {
    dt.to_rfc3339()
}

#[derive(FromRow)]
pub struct GrantRow {
    pub biz_type: i32,
    pub biz_id: i64,
    pub user_id: i64,
    pub level: i32,
}

impl TryFrom<GrantRow> for PermissionGrant {
    type Error = Error;

    fn try_from(row: GrantRow) -> Result<Self> {
        Ok(Self {
            biz_type: BizType::from_tag(row.biz_type)?,
            biz_id: row.biz_id,
            user_id: row.user_id,
            level: PermissionLevel::from_tag(row.level)?,
        })
    }
}

/// Decode every row, failing on the first unknown tag
pub fn rows_to_grants(rows: Vec<GrantRow>) -> Result<Vec<PermissionGrant>> {
    rows.into_iter().map(PermissionGrant::try_from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_decodes_tags() {
        let grant = PermissionGrant::try_from(GrantRow {
            biz_type: 5,
            biz_id: 10,
            user_id: 7,
            level: 3,
        })
        .unwrap();
        assert_eq!(
            grant,
            PermissionGrant::new(BizType::Contract, 10, 7, PermissionLevel::Write)
        );
    }

    #[test]
    fn test_unknown_level_is_an_error() {
        let rows = vec![GrantRow {
            biz_type: 1,
            biz_id: 10,
            user_id: 7,
            level: 9,
        }];
        assert!(matches!(
            rows_to_grants(rows),
            Err(Error::UnknownPermissionLevel(9))
        ));
    }
}
