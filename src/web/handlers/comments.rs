//! Comment edit and delete pages, available to the comment's author only.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};

use crate::error::AppError;
use crate::state::AppState;
use crate::web::extract::AuthUser;
use crate::web::forms::CommentForm;
use crate::web::handlers::form_errors;

#[derive(Template, WebTemplate)]
#[template(path = "news/comment_edit.html")]
pub struct CommentEditTemplate {
    pub current_user: Option<String>,
    pub comment_id: i64,
    pub news_id: i64,
    pub form_text: String,
    pub text_errors: Vec<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "news/comment_delete.html")]
pub struct CommentDeleteTemplate {
    pub current_user: Option<String>,
    pub comment_id: i64,
    pub news_id: i64,
    pub text: String,
}

fn comments_anchor(news_id: i64) -> Redirect {
    Redirect::to(&format!("/news/{news_id}#comments"))
}

/// # Endpoint
///
/// `GET /news/comments/{id}/edit`
///
/// # Errors
///
/// - **404 Not Found**: Comment missing or written by someone else
pub async fn edit_form_handler(
    State(st): State<AppState>,
    Path(id): Path<i64>,
    AuthUser(user): AuthUser,
) -> Result<CommentEditTemplate, AppError> {
    let comment = st.news_service.comment_for_owner(id, &user).await?;

    Ok(CommentEditTemplate {
        current_user: Some(user.username),
        comment_id: comment.id,
        news_id: comment.news_id,
        form_text: comment.text,
        text_errors: Vec::new(),
    })
}

/// Replaces the comment text and returns to the news page.
///
/// # Endpoint
///
/// `POST /news/comments/{id}/edit` (form field `text`)
pub async fn edit_handler(
    State(st): State<AppState>,
    Path(id): Path<i64>,
    AuthUser(user): AuthUser,
    form: Result<Form<CommentForm>, FormRejection>,
) -> Result<Response, AppError> {
    let comment = st.news_service.comment_for_owner(id, &user).await?;
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let submitted = form.text.clone();

    let result = match form.clean() {
        Ok(form) => st.news_service.edit_comment(id, &user, &form.text).await,
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(updated) => Ok(comments_anchor(updated.news_id).into_response()),
        Err(e) => {
            let errors = form_errors(e)?;
            Ok(CommentEditTemplate {
                current_user: Some(user.username),
                comment_id: comment.id,
                news_id: comment.news_id,
                form_text: submitted,
                text_errors: errors.for_field("text"),
            }
            .into_response())
        }
    }
}

/// # Endpoint
///
/// `GET /news/comments/{id}/delete`
pub async fn delete_form_handler(
    State(st): State<AppState>,
    Path(id): Path<i64>,
    AuthUser(user): AuthUser,
) -> Result<CommentDeleteTemplate, AppError> {
    let comment = st.news_service.comment_for_owner(id, &user).await?;

    Ok(CommentDeleteTemplate {
        current_user: Some(user.username),
        comment_id: comment.id,
        news_id: comment.news_id,
        text: comment.text,
    })
}

/// Deletes the comment and returns to the news page.
///
/// # Endpoint
///
/// `POST /news/comments/{id}/delete` or `DELETE /news/comments/{id}/delete`
pub async fn delete_handler(
    State(st): State<AppState>,
    Path(id): Path<i64>,
    AuthUser(user): AuthUser,
) -> Result<Redirect, AppError> {
    let deleted = st.news_service.delete_comment(id, &user).await?;
    Ok(comments_anchor(deleted.news_id))
}
