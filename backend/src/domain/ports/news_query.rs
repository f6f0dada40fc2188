//! Driving port for news reads.

use async_trait::async_trait;

use crate::domain::{Caller, Department, Error, NewsPost};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsQuery: Send + Sync {
    /// Unauthenticated feed, newest first.
    async fn list_public(&self, department: Option<Department>) -> Result<Vec<NewsPost>, Error>;

    /// Feed of the caller's own department. Staff only.
    async fn list_own_department(&self, caller: &Caller) -> Result<Vec<NewsPost>, Error>;
}
