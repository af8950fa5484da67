//! News home page and news detail with comments.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};

use crate::application::services::{NewsDetail, NewsPreview};
use crate::domain::access::can_mutate;
use crate::domain::entities::{Comment, User};
use crate::domain::validation::FormErrors;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::extract::{AuthUser, MaybeUser};
use crate::web::forms::CommentForm;
use crate::web::handlers::form_errors;

/// One line of the home page.
pub struct NewsItemView {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: String,
    pub comment_count: i64,
}

impl From<NewsPreview> for NewsItemView {
    fn from(preview: NewsPreview) -> Self {
        Self {
            id: preview.news.id,
            title: preview.news.title,
            text: preview.news.text,
            date: preview.news.date.format("%d.%m.%Y").to_string(),
            comment_count: preview.comment_count,
        }
    }
}

/// A comment as shown under a news item.
pub struct CommentView {
    pub id: i64,
    pub author: String,
    pub text: String,
    pub created: String,
    /// Edit and delete links are shown to the author only.
    pub can_edit: bool,
}

impl CommentView {
    fn new(comment: Comment, viewer: Option<&User>) -> Self {
        Self {
            can_edit: viewer.is_some_and(|user| can_mutate(user.id, &comment)),
            id: comment.id,
            author: comment.author_username,
            text: comment.text,
            created: comment.created.format("%d.%m.%Y %H:%M").to_string(),
        }
    }
}

#[derive(Template, WebTemplate)]
#[template(path = "news/home.html")]
pub struct HomeTemplate {
    pub current_user: Option<String>,
    pub news_list: Vec<NewsItemView>,
}

/// News detail. The comment form is rendered only when `current_user` is set.
#[derive(Template, WebTemplate)]
#[template(path = "news/detail.html")]
pub struct DetailTemplate {
    pub current_user: Option<String>,
    pub id: i64,
    pub title: String,
    pub text: String,
    pub date: String,
    pub comments: Vec<CommentView>,
    pub form_text: String,
    pub text_errors: Vec<String>,
}

impl DetailTemplate {
    fn new(detail: NewsDetail, viewer: Option<&User>) -> Self {
        Self {
            current_user: viewer.map(|u| u.username.clone()),
            id: detail.news.id,
            title: detail.news.title,
            text: detail.news.text,
            date: detail.news.date.format("%d.%m.%Y").to_string(),
            comments: detail
                .comments
                .into_iter()
                .map(|c| CommentView::new(c, viewer))
                .collect(),
            form_text: String::new(),
            text_errors: Vec::new(),
        }
    }

    fn with_form(mut self, text: String, errors: &FormErrors) -> Self {
        self.form_text = text;
        self.text_errors = errors.for_field("text");
        self
    }
}

/// Renders the latest news.
///
/// # Endpoint
///
/// `GET /`
pub async fn home_handler(
    State(st): State<AppState>,
    user: MaybeUser,
) -> Result<HomeTemplate, AppError> {
    let news_list = st
        .news_service
        .home_page()
        .await?
        .into_iter()
        .map(NewsItemView::from)
        .collect();

    Ok(HomeTemplate {
        current_user: user.username(),
        news_list,
    })
}

/// Renders a news item with its comments.
///
/// # Endpoint
///
/// `GET /news/{id}`
///
/// # Errors
///
/// - **404 Not Found**: News item does not exist
pub async fn detail_handler(
    State(st): State<AppState>,
    Path(id): Path<i64>,
    MaybeUser(user): MaybeUser,
) -> Result<DetailTemplate, AppError> {
    let detail = st.news_service.news_detail(id).await?;
    Ok(DetailTemplate::new(detail, user.as_ref()))
}

/// Posts a comment.
///
/// # Endpoint
///
/// `POST /news/{id}` (form field `text`)
///
/// # Responses
///
/// - **303 See Other** to `/news/{id}#comments` on success
/// - **200 OK** with the form and its errors on validation failure
/// - **303 See Other** to the login page for anonymous visitors
pub async fn add_comment_handler(
    State(st): State<AppState>,
    Path(id): Path<i64>,
    AuthUser(user): AuthUser,
    Form(form): Form<CommentForm>,
) -> Result<Response, AppError> {
    let submitted = form.text.clone();

    let result = match form.clean() {
        Ok(form) => st.news_service.add_comment(id, &user, &form.text).await,
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(_) => Ok(Redirect::to(&format!("/news/{id}#comments")).into_response()),
        Err(e) => {
            let errors = form_errors(e)?;
            let detail = st.news_service.news_detail(id).await?;
            Ok(DetailTemplate::new(detail, Some(&user))
                .with_form(submitted, &errors)
                .into_response())
        }
    }
}
