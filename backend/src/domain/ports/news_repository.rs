//! Port for news post persistence.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Department, NewsPost};

use super::define_port_error;

define_port_error! {
    /// Errors raised by news repository adapters.
    pub enum NewsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "news repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "news repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsRepository: Send + Sync {
    async fn insert(&self, post: &NewsPost) -> Result<(), NewsRepositoryError>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<NewsPost>, NewsRepositoryError>;

    /// Posts newest first, optionally restricted to one department.
    async fn list(
        &self,
        department: Option<Department>,
    ) -> Result<Vec<NewsPost>, NewsRepositoryError>;

    /// Remove a post; returns whether a record was deleted.
    async fn delete(&self, id: &Uuid) -> Result<bool, NewsRepositoryError>;
}
