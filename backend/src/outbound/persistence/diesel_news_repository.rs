//! PostgreSQL-backed `NewsRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{NewsRepository, NewsRepositoryError};
use crate::domain::{Department, NewsPost};

use super::error_mapping::{map_diesel_error, map_pool_error};
use super::models::{NewNewsPostRow, NewsPostRow};
use super::pool::{DbPool, PoolError};
use super::schema::news_posts;

#[derive(Clone)]
pub struct DieselNewsRepository {
    pool: DbPool,
}

impl DieselNewsRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> NewsRepositoryError {
    map_pool_error(error, NewsRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> NewsRepositoryError {
    map_diesel_error(
        error,
        NewsRepositoryError::query,
        NewsRepositoryError::connection,
    )
}

fn row_to_post(row: NewsPostRow) -> Result<NewsPost, NewsRepositoryError> {
    let department = Department::new(&row.department)
        .map_err(|err| NewsRepositoryError::query(format!("stored news post {}: {err}", row.id)))?;
    Ok(NewsPost {
        id: row.id,
        title: row.title,
        content: row.content,
        department,
        image_url: row.image_url,
        created_at: row.created_at,
    })
}

#[async_trait]
impl NewsRepository for DieselNewsRepository {
    async fn insert(&self, post: &NewsPost) -> Result<(), NewsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row = NewNewsPostRow {
            id: post.id,
            title: post.title.as_str(),
            content: post.content.as_str(),
            department: post.department.as_str(),
            image_url: post.image_url.as_deref(),
            created_at: post.created_at,
        };
        diesel::insert_into(news_posts::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(diesel_error)
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<NewsPost>, NewsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let row: Option<NewsPostRow> = news_posts::table
            .filter(news_posts::id.eq(id))
            .select(NewsPostRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;
        row.map(row_to_post).transpose()
    }

    async fn list(
        &self,
        department: Option<Department>,
    ) -> Result<Vec<NewsPost>, NewsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let mut query = news_posts::table
            .select(NewsPostRow::as_select())
            .order(news_posts::created_at.desc())
            .into_boxed();
        if let Some(department) = department {
            query = query.filter(news_posts::department.eq(department.as_str().to_owned()));
        }
        let rows: Vec<NewsPostRow> = query.load(&mut conn).await.map_err(diesel_error)?;
        rows.into_iter().map(row_to_post).collect()
    }

    async fn delete(&self, id: &Uuid) -> Result<bool, NewsRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let deleted = diesel::delete(news_posts::table.filter(news_posts::id.eq(id)))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;
        Ok(deleted > 0)
    }
}
