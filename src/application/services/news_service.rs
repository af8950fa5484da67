//! News feed and moderated comments.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use std::sync::Arc;

use crate::domain::access::can_mutate;
use crate::domain::entities::{Comment, NewComment, NewNews, News, User};
use crate::domain::moderation::{BannedWords, ContentValidator};
use crate::domain::repositories::{CommentRepository, NewsRepository};
use crate::error::AppError;

/// Default number of news on the home page.
pub const NEWS_COUNT_ON_HOME_PAGE: i64 = 10;

/// A news item on the home page with its comment counter.
#[derive(Debug, Clone)]
pub struct NewsPreview {
    pub news: News,
    pub comment_count: i64,
}

/// A news item with all its comments, oldest first.
#[derive(Debug, Clone)]
pub struct NewsDetail {
    pub news: News,
    pub comments: Vec<Comment>,
}

/// Service for the news feed and comment moderation.
///
/// Every comment write (create and edit) passes through the
/// [`ContentValidator`]; a rejected text is never persisted.
pub struct NewsService {
    news: Arc<dyn NewsRepository>,
    comments: Arc<dyn CommentRepository>,
    validator: ContentValidator,
    home_page_limit: i64,
}

impl NewsService {
    pub fn new(
        news: Arc<dyn NewsRepository>,
        comments: Arc<dyn CommentRepository>,
        validator: ContentValidator,
        home_page_limit: i64,
    ) -> Self {
        Self {
            news,
            comments,
            validator,
            home_page_limit,
        }
    }

    pub fn banned_words(&self) -> &BannedWords {
        self.validator.banned_words()
    }

    /// Latest news, newest first, capped at the home page limit.
    pub async fn home_page(&self) -> Result<Vec<NewsPreview>, AppError> {
        let latest = self.news.latest(self.home_page_limit).await?;

        let mut previews = Vec::with_capacity(latest.len());
        for news in latest {
            let comment_count = self.comments.count_for_news(news.id).await?;
            previews.push(NewsPreview {
                news,
                comment_count,
            });
        }
        Ok(previews)
    }

    /// # Errors
    ///
    /// Returns [`AppError::NotFound`] if the news item does not exist.
    pub async fn news_detail(&self, news_id: i64) -> Result<NewsDetail, AppError> {
        let news = self.find_news(news_id).await?;
        let comments = self.comments.list_for_news(news_id).await?;
        Ok(NewsDetail { news, comments })
    }

    async fn find_news(&self, news_id: i64) -> Result<News, AppError> {
        self.news.find_by_id(news_id).await?.ok_or_else(|| {
            AppError::not_found("News not found", json!({ "news_id": news_id }))
        })
    }

    fn moderate<'a>(&self, text: &'a str) -> Result<&'a str, AppError> {
        self.validator.validate(text).map_err(|e| {
            metrics::counter!("comments_rejected_total").increment(1);
            tracing::info!("Comment rejected by moderation");
            AppError::from(e)
        })
    }

    /// Posts a comment under a news item on behalf of `author`.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] if the news item does not exist
    /// - [`AppError::Form`] on the `text` field if the text contains a banned word
    pub async fn add_comment(
        &self,
        news_id: i64,
        author: &User,
        text: &str,
    ) -> Result<Comment, AppError> {
        self.find_news(news_id).await?;
        let text = self.moderate(text)?;

        let comment = self
            .comments
            .create(NewComment {
                news_id,
                author_id: author.id,
                text: text.to_string(),
                created: Utc::now(),
            })
            .await?;

        metrics::counter!("comments_created_total").increment(1);
        tracing::info!(
            comment_id = comment.id,
            news_id,
            author_id = author.id,
            "Comment created"
        );
        Ok(comment)
    }

    /// Loads a comment for editing or deletion by `user`.
    ///
    /// A comment owned by someone else is reported exactly like a missing one.
    pub async fn comment_for_owner(&self, comment_id: i64, user: &User) -> Result<Comment, AppError> {
        match self.comments.find_by_id(comment_id).await? {
            Some(comment) if can_mutate(user.id, &comment) => Ok(comment),
            _ => Err(AppError::not_found(
                "Comment not found",
                json!({ "comment_id": comment_id }),
            )),
        }
    }

    /// Replaces the text of the user's own comment.
    ///
    /// The author, news item and creation time never change.
    pub async fn edit_comment(
        &self,
        comment_id: i64,
        user: &User,
        text: &str,
    ) -> Result<Comment, AppError> {
        let comment = self.comment_for_owner(comment_id, user).await?;
        let text = self.moderate(text)?;

        let updated = self.comments.update_text(comment.id, text).await?;
        tracing::info!(comment_id, author_id = user.id, "Comment edited");
        Ok(updated)
    }

    /// Deletes the user's own comment. Returns the comment as it was.
    pub async fn delete_comment(&self, comment_id: i64, user: &User) -> Result<Comment, AppError> {
        let comment = self.comment_for_owner(comment_id, user).await?;
        self.comments.delete(comment.id).await?;
        tracing::info!(comment_id, author_id = user.id, "Comment deleted");
        Ok(comment)
    }

    /// Deletes any comment regardless of author. Used by the admin tool.
    pub async fn delete_comment_as_admin(&self, comment_id: i64) -> Result<(), AppError> {
        if !self.comments.delete(comment_id).await? {
            return Err(AppError::not_found(
                "Comment not found",
                json!({ "comment_id": comment_id }),
            ));
        }
        tracing::info!(comment_id, "Comment deleted by admin");
        Ok(())
    }

    /// Publishes a news item. `date` defaults to today.
    pub async fn create_news(
        &self,
        title: &str,
        text: &str,
        date: Option<NaiveDate>,
    ) -> Result<News, AppError> {
        let news = self
            .news
            .create(NewNews {
                title: title.to_string(),
                text: text.to_string(),
                date: date.unwrap_or_else(|| Utc::now().date_naive()),
            })
            .await?;

        tracing::info!(news_id = news.id, "News created");
        Ok(news)
    }

    /// Deletes a news item together with its comments.
    pub async fn delete_news(&self, news_id: i64) -> Result<(), AppError> {
        if !self.news.delete(news_id).await? {
            return Err(AppError::not_found(
                "News not found",
                json!({ "news_id": news_id }),
            ));
        }
        tracing::info!(news_id, "News deleted");
        Ok(())
    }

    /// All news, newest first, without the home page cap.
    pub async fn list_news(&self) -> Result<Vec<News>, AppError> {
        let total = self.news.count().await?;
        self.news.latest(total.max(1)).await
    }

    pub async fn count_news(&self) -> Result<i64, AppError> {
        self.news.count().await
    }

    pub async fn count_comments(&self) -> Result<i64, AppError> {
        self.comments.count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::moderation::WARNING;
    use crate::domain::repositories::{MockCommentRepository, MockNewsRepository};

    fn user(id: i64) -> User {
        User {
            id,
            username: format!("user{id}"),
            password_hash: String::new(),
            created_at: Utc::now(),
        }
    }

    fn news(id: i64) -> News {
        News {
            id,
            title: "Заголовок".to_string(),
            text: "Текст".to_string(),
            date: Utc::now().date_naive(),
        }
    }

    fn comment(id: i64, author_id: i64) -> Comment {
        Comment {
            id,
            news_id: 1,
            author_id,
            author_username: format!("user{author_id}"),
            text: "Текст комментария".to_string(),
            created: Utc::now(),
        }
    }

    fn service(news: MockNewsRepository, comments: MockCommentRepository) -> NewsService {
        NewsService::new(
            Arc::new(news),
            Arc::new(comments),
            ContentValidator::default(),
            NEWS_COUNT_ON_HOME_PAGE,
        )
    }

    #[tokio::test]
    async fn test_home_page_uses_limit() {
        let mut news_repo = MockNewsRepository::new();
        news_repo
            .expect_latest()
            .withf(|limit| *limit == NEWS_COUNT_ON_HOME_PAGE)
            .times(1)
            .returning(|_| Ok(vec![news(2), news(1)]));

        let mut comments = MockCommentRepository::new();
        comments
            .expect_count_for_news()
            .times(2)
            .returning(|news_id| Ok(news_id * 10));

        let previews = service(news_repo, comments).home_page().await.unwrap();

        assert_eq!(previews.len(), 2);
        assert_eq!(previews[0].news.id, 2);
        assert_eq!(previews[0].comment_count, 20);
    }

    #[tokio::test]
    async fn test_news_detail_missing() {
        let mut news_repo = MockNewsRepository::new();
        news_repo.expect_find_by_id().returning(|_| Ok(None));

        let err = service(news_repo, MockCommentRepository::new())
            .news_detail(99)
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_add_comment_success() {
        let mut news_repo = MockNewsRepository::new();
        news_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(news(id))));

        let mut comments = MockCommentRepository::new();
        comments
            .expect_create()
            .withf(|c| c.news_id == 1 && c.author_id == 5 && c.text == "Хорошая новость")
            .times(1)
            .returning(|c| {
                Ok(Comment {
                    id: 1,
                    news_id: c.news_id,
                    author_id: c.author_id,
                    author_username: "user5".to_string(),
                    text: c.text,
                    created: c.created,
                })
            });

        let comment = service(news_repo, comments)
            .add_comment(1, &user(5), "Хорошая новость")
            .await
            .unwrap();

        assert_eq!(comment.text, "Хорошая новость");
    }

    #[tokio::test]
    async fn test_add_comment_with_banned_word_is_not_saved() {
        let mut news_repo = MockNewsRepository::new();
        news_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(news(id))));

        let mut comments = MockCommentRepository::new();
        comments.expect_create().times(0);

        let err = service(news_repo, comments)
            .add_comment(1, &user(5), "Какой-то текст, редиска, еще текст")
            .await
            .unwrap_err();

        let errors = err.as_form_errors().expect("form errors");
        assert_eq!(errors.for_field("text"), vec![WARNING]);
    }

    #[tokio::test]
    async fn test_add_comment_to_missing_news() {
        let mut news_repo = MockNewsRepository::new();
        news_repo.expect_find_by_id().returning(|_| Ok(None));

        let mut comments = MockCommentRepository::new();
        comments.expect_create().times(0);

        let err = service(news_repo, comments)
            .add_comment(42, &user(5), "Текст")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_custom_banned_words() {
        let mut news_repo = MockNewsRepository::new();
        news_repo
            .expect_find_by_id()
            .returning(|id| Ok(Some(news(id))));

        let svc = NewsService::new(
            Arc::new(news_repo),
            Arc::new(MockCommentRepository::new()),
            ContentValidator::new(BannedWords::new(["стоп"])),
            NEWS_COUNT_ON_HOME_PAGE,
        );

        assert!(svc.add_comment(1, &user(1), "стоп-слово").await.is_err());
    }

    #[tokio::test]
    async fn test_edit_foreign_comment_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 1))));
        comments.expect_update_text().times(0);

        let err = service(MockNewsRepository::new(), comments)
            .edit_comment(3, &user(2), "Обновлённый комментарий")
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_edit_own_comment_is_moderated() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 1))));
        comments.expect_update_text().times(0);

        let err = service(MockNewsRepository::new(), comments)
            .edit_comment(3, &user(1), "ты негодяй")
            .await
            .unwrap_err();

        assert!(err.as_form_errors().is_some());
    }

    #[tokio::test]
    async fn test_edit_own_comment() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 1))));
        comments
            .expect_update_text()
            .withf(|id, text| *id == 3 && text == "Обновлённый комментарий")
            .times(1)
            .returning(|id, text| {
                let mut updated = comment(id, 1);
                updated.text = text.to_string();
                Ok(updated)
            });

        let updated = service(MockNewsRepository::new(), comments)
            .edit_comment(3, &user(1), "Обновлённый комментарий")
            .await
            .unwrap();

        assert_eq!(updated.text, "Обновлённый комментарий");
        assert_eq!(updated.author_id, 1);
    }

    #[tokio::test]
    async fn test_delete_foreign_comment_is_not_found() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 1))));
        comments.expect_delete().times(0);

        let err = service(MockNewsRepository::new(), comments)
            .delete_comment(3, &user(2))
            .await
            .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_own_comment() {
        let mut comments = MockCommentRepository::new();
        comments
            .expect_find_by_id()
            .returning(|id| Ok(Some(comment(id, 1))));
        comments
            .expect_delete()
            .withf(|id| *id == 3)
            .times(1)
            .returning(|_| Ok(true));

        let deleted = service(MockNewsRepository::new(), comments)
            .delete_comment(3, &user(1))
            .await
            .unwrap();

        assert_eq!(deleted.id, 3);
    }

    #[tokio::test]
    async fn test_create_news_defaults_to_today() {
        let mut news_repo = MockNewsRepository::new();
        news_repo
            .expect_create()
            .withf(|n| n.date == Utc::now().date_naive())
            .times(1)
            .returning(|n| {
                Ok(News {
                    id: 1,
                    title: n.title,
                    text: n.text,
                    date: n.date,
                })
            });

        let created = service(news_repo, MockCommentRepository::new())
            .create_news("Заголовок", "Текст", None)
            .await
            .unwrap();

        assert_eq!(created.title, "Заголовок");
    }
}
