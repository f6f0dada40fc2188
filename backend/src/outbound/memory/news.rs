//! In-memory news feed.

use std::sync::Mutex;

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::ports::{NewsRepository, NewsRepositoryError};
use crate::domain::{Department, NewsPost};

use super::lock;

#[derive(Debug, Default)]
pub struct InMemoryNewsRepository {
    store: Mutex<Vec<NewsPost>>,
}

impl InMemoryNewsRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NewsRepository for InMemoryNewsRepository {
    async fn insert(&self, post: &NewsPost) -> Result<(), NewsRepositoryError> {
        let mut guard = lock(&self.store, NewsRepositoryError::query)?;
        guard.push(post.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<NewsPost>, NewsRepositoryError> {
        let guard = lock(&self.store, NewsRepositoryError::query)?;
        Ok(guard.iter().find(|post| post.id == *id).cloned())
    }

    async fn list(
        &self,
        department: Option<Department>,
    ) -> Result<Vec<NewsPost>, NewsRepositoryError> {
        let guard = lock(&self.store, NewsRepositoryError::query)?;
        let mut posts: Vec<NewsPost> = guard
            .iter()
            .filter(|post| department.as_ref().is_none_or(|d| post.department == *d))
            .cloned()
            .collect();
        // Later inserts win ties so equal timestamps still list newest first.
        posts.reverse();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, NewsRepositoryError> {
        let mut guard = lock(&self.store, NewsRepositoryError::query)?;
        let before = guard.len();
        guard.retain(|post| post.id != *id);
        Ok(guard.len() != before)
    }
}
