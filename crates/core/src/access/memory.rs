use super::identity::{BizId, BizType};
use super::permissions::{GrantLookup, PermissionGrant};
use crate::errors::Result;
use async_trait::async_trait;

/// Grant lookup over a fixed set of grants held in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryGrantStore {
    grants: Vec<PermissionGrant>,
}

impl MemoryGrantStore {
    pub fn new(grants: Vec<PermissionGrant>) -> Self {
        Self { grants }
    }
}

impl FromIterator<PermissionGrant> for MemoryGrantStore {
    fn from_iter<I: IntoIterator<Item = PermissionGrant>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[async_trait]
impl GrantLookup for MemoryGrantStore {
    async fn get_grants(
        &self,
        biz_type: BizType,
        biz_id: BizId,
    ) -> Result<Vec<PermissionGrant>> {
        Ok(self
            .grants
            .iter()
            .filter(|grant| grant.biz_type == biz_type && grant.biz_id == biz_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::access::permissions::PermissionLevel;

    #[tokio::test]
    async fn test_filters_by_object() {
        let store: MemoryGrantStore = [
            PermissionGrant::new(BizType::Leads, 1, 7, PermissionLevel::Owner),
            PermissionGrant::new(BizType::Leads, 2, 7, PermissionLevel::Read),
            PermissionGrant::new(BizType::Customer, 1, 9, PermissionLevel::Write),
            PermissionGrant::new(BizType::Leads, 1, 9, PermissionLevel::Read),
        ]
        .into_iter()
        .collect();

        let grants = store.get_grants(BizType::Leads, 1).await.unwrap();
        assert_eq!(grants.len(), 2);
        assert_eq!(grants[0].user_id, 7);
        assert_eq!(grants[1].user_id, 9);

        assert!(store.get_grants(BizType::Contract, 1).await.unwrap().is_empty());
    }
}
