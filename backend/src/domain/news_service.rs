//! News feed services.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::access_policy::{DenyReason, own_department};
use crate::domain::ports::{NewsCommand, NewsQuery, NewsRepository, NewsRepositoryError};
use crate::domain::{COMMON_NEWS_CHANNEL, Caller, Department, Error, NewsDraft, NewsPost};

fn map_repository_error(error: NewsRepositoryError) -> Error {
    match error {
        NewsRepositoryError::Connection { message } => {
            error!(%message, "news repository unavailable");
            Error::service_unavailable(format!("news repository unavailable: {message}"))
        }
        NewsRepositoryError::Query { message } => {
            error!(%message, "news repository query failed");
            Error::internal(format!("news repository error: {message}"))
        }
    }
}

fn common_channel() -> Result<Department, Error> {
    Department::new(COMMON_NEWS_CHANNEL)
        .map_err(|err| Error::internal(format!("invalid news channel: {err}")))
}

#[derive(Clone)]
pub struct NewsService<N> {
    news: Arc<N>,
    clock: Arc<dyn Clock>,
}

impl<N> NewsService<N> {
    pub fn new(news: Arc<N>, clock: Arc<dyn Clock>) -> Self {
        Self { news, clock }
    }
}

#[async_trait]
impl<N> NewsCommand for NewsService<N>
where
    N: NewsRepository,
{
    async fn create(&self, caller: &Caller, draft: NewsDraft) -> Result<NewsPost, Error> {
        let department = if caller.is_principal() {
            common_channel()?
        } else {
            own_department(caller)?.clone()
        };
        let post = NewsPost::from_draft(draft, department, self.clock.utc());
        self.news
            .insert(&post)
            .await
            .map_err(map_repository_error)?;

        info!(post = %post.id, department = %post.department, "news post created");
        Ok(post)
    }

    async fn delete(&self, caller: &Caller, id: &Uuid) -> Result<(), Error> {
        let post = self
            .news
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| Error::not_found(format!("news post {id} not found")))?;

        if !caller.is_principal() {
            let own = own_department(caller)?;
            if *own != post.department {
                return Err(DenyReason::CrossDepartment.into());
            }
        }

        let deleted = self.news.delete(id).await.map_err(map_repository_error)?;
        if !deleted {
            return Err(Error::not_found(format!("news post {id} not found")));
        }
        info!(post = %id, "news post deleted");
        Ok(())
    }
}

#[async_trait]
impl<N> NewsQuery for NewsService<N>
where
    N: NewsRepository,
{
    async fn list_public(&self, department: Option<Department>) -> Result<Vec<NewsPost>, Error> {
        self.news
            .list(department)
            .await
            .map_err(map_repository_error)
    }

    async fn list_own_department(&self, caller: &Caller) -> Result<Vec<NewsPost>, Error> {
        let department = own_department(caller)?.clone();
        self.news
            .list(Some(department))
            .await
            .map_err(map_repository_error)
    }
}
