//! Driving port for news writes.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Caller, Error, NewsDraft, NewsPost};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsCommand: Send + Sync {
    /// Publish to the caller's department, or the common channel for the
    /// principal.
    async fn create(&self, caller: &Caller, draft: NewsDraft) -> Result<NewsPost, Error>;

    /// Principal deletes anything; staff only their department's posts.
    async fn delete(&self, caller: &Caller, id: &Uuid) -> Result<(), Error>;
}
