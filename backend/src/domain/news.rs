//! Departmental news feed records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::identity::Department;

/// Channel used for posts written by the principal.
pub const COMMON_NEWS_CHANNEL: &str = "News";

/// Validation errors raised by news constructors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NewsValidationError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("content must not be empty")]
    EmptyContent,
}

/// Validated input for a new post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsDraft {
    title: String,
    content: String,
    image_url: Option<String>,
}

impl NewsDraft {
    pub fn new(
        title: &str,
        content: &str,
        image_url: Option<&str>,
    ) -> Result<Self, NewsValidationError> {
        let title = title.trim();
        if title.is_empty() {
            return Err(NewsValidationError::EmptyTitle);
        }
        let content = content.trim();
        if content.is_empty() {
            return Err(NewsValidationError::EmptyContent);
        }
        Ok(Self {
            title: title.to_owned(),
            content: content.to_owned(),
            image_url: image_url
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_owned),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn image_url(&self) -> Option<&str> {
        self.image_url.as_deref()
    }
}

/// Stored news post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsPost {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    pub department: Department,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl NewsPost {
    pub fn from_draft(draft: NewsDraft, department: Department, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            content: draft.content,
            department,
            image_url: draft.image_url,
            created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(" ", "body", NewsValidationError::EmptyTitle)]
    #[case("title", "", NewsValidationError::EmptyContent)]
    fn draft_requires_title_and_content(
        #[case] title: &str,
        #[case] content: &str,
        #[case] expected: NewsValidationError,
    ) {
        assert_eq!(NewsDraft::new(title, content, None), Err(expected));
    }

    #[rstest]
    fn blank_image_url_is_dropped() {
        let draft = NewsDraft::new("t", "c", Some("  ")).expect("draft");
        assert!(draft.image_url().is_none());
    }
}
