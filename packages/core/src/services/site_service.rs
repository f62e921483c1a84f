//! Site recognition for back-reference reporting

use crate::db::StoreResult;
use crate::models::files::{RT_SITE, SITE_MEMBERS};
use crate::models::{Content, PropertyValue};
use async_trait::async_trait;

/// Recognizes site nodes and reports their membership size
#[async_trait]
pub trait SiteService: Send + Sync {
    fn is_site(&self, content: &Content) -> bool;

    async fn member_count(&self, site: &Content) -> StoreResult<u64>;
}

/// Sites are nodes of resource type `sakai/site`; members are the entries of
/// their `sakai:members` property.
#[derive(Debug, Clone, Default)]
pub struct ResourceTypeSiteService;

impl ResourceTypeSiteService {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl SiteService for ResourceTypeSiteService {
    fn is_site(&self, content: &Content) -> bool {
        content.is_resource_type(RT_SITE)
    }

    async fn member_count(&self, site: &Content) -> StoreResult<u64> {
        Ok(match site.property(SITE_MEMBERS) {
            Some(PropertyValue::Array(members)) => members.len() as u64,
            Some(_) => 1,
            None => 0,
        })
    }
}
