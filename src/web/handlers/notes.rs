//! Personal notes pages. Every page except the landing page requires login,
//! and a note is only reachable by its author.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State, rejection::FormRejection},
    response::{IntoResponse, Redirect, Response},
};

use crate::application::services::NoteDraft;
use crate::domain::entities::Note;
use crate::domain::validation::FormErrors;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::extract::{AuthUser, MaybeUser};
use crate::web::forms::NoteForm;
use crate::web::handlers::form_errors;

const DONE_PATH: &str = "/notes/done";

#[derive(Template, WebTemplate)]
#[template(path = "notes/home.html")]
pub struct NotesHomeTemplate {
    pub current_user: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "notes/list.html")]
pub struct NotesListTemplate {
    pub current_user: Option<String>,
    pub notes: Vec<Note>,
}

#[derive(Template, WebTemplate)]
#[template(path = "notes/detail.html")]
pub struct NoteDetailTemplate {
    pub current_user: Option<String>,
    pub note: Note,
}

#[derive(Template, WebTemplate)]
#[template(path = "notes/delete.html")]
pub struct NoteDeleteTemplate {
    pub current_user: Option<String>,
    pub note: Note,
}

#[derive(Template, WebTemplate)]
#[template(path = "notes/success.html")]
pub struct NoteSuccessTemplate {
    pub current_user: Option<String>,
}

/// Create and edit form.
#[derive(Template, WebTemplate)]
#[template(path = "notes/form.html")]
pub struct NoteFormTemplate {
    pub current_user: Option<String>,
    pub heading: &'static str,
    pub action: String,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub title_errors: Vec<String>,
    pub text_errors: Vec<String>,
    pub slug_errors: Vec<String>,
}

impl NoteFormTemplate {
    fn add(username: String) -> Self {
        Self {
            current_user: Some(username),
            heading: "Добавить заметку",
            action: "/notes/add".to_string(),
            title: String::new(),
            text: String::new(),
            slug: String::new(),
            title_errors: Vec::new(),
            text_errors: Vec::new(),
            slug_errors: Vec::new(),
        }
    }

    fn edit(username: String, note: Note) -> Self {
        Self {
            current_user: Some(username),
            heading: "Редактировать заметку",
            action: format!("/notes/edit/{}", note.slug),
            title: note.title,
            text: note.text,
            slug: note.slug,
            title_errors: Vec::new(),
            text_errors: Vec::new(),
            slug_errors: Vec::new(),
        }
    }

    fn with_submission(mut self, form: NoteForm, errors: &FormErrors) -> Self {
        self.title = form.title;
        self.text = form.text;
        self.slug = form.slug.unwrap_or_default();
        self.title_errors = errors.for_field("title");
        self.text_errors = errors.for_field("text");
        self.slug_errors = errors.for_field("slug");
        self
    }
}

fn draft(form: NoteForm) -> Result<NoteDraft, AppError> {
    let form = form.clean()?;
    Ok(NoteDraft {
        title: form.title,
        text: form.text,
        slug: form.slug,
    })
}

/// # Endpoint
///
/// `GET /notes`
pub async fn home_handler(user: MaybeUser) -> NotesHomeTemplate {
    NotesHomeTemplate {
        current_user: user.username(),
    }
}

/// Lists the visitor's own notes.
///
/// # Endpoint
///
/// `GET /notes/list`
pub async fn list_handler(
    State(st): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<NotesListTemplate, AppError> {
    let notes = st.note_service.list_for(&user).await?;
    Ok(NotesListTemplate {
        current_user: Some(user.username),
        notes,
    })
}

/// # Endpoint
///
/// `GET /notes/add`
pub async fn add_form_handler(AuthUser(user): AuthUser) -> NoteFormTemplate {
    NoteFormTemplate::add(user.username)
}

/// Creates a note. A blank slug is derived from the title.
///
/// # Endpoint
///
/// `POST /notes/add` (form fields `title`, `text`, `slug`)
///
/// # Responses
///
/// - **303 See Other** to `/notes/done` on success
/// - **200 OK** with the form and its errors (including a taken slug)
pub async fn add_handler(
    State(st): State<AppState>,
    AuthUser(user): AuthUser,
    Form(form): Form<NoteForm>,
) -> Result<Response, AppError> {
    let submitted = form.clone();

    let result = match draft(form) {
        Ok(draft) => st.note_service.create(&user, draft).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Ok(Redirect::to(DONE_PATH).into_response()),
        Err(e) => {
            let errors = form_errors(e)?;
            Ok(NoteFormTemplate::add(user.username)
                .with_submission(submitted, &errors)
                .into_response())
        }
    }
}

/// # Endpoint
///
/// `GET /notes/note/{slug}`
///
/// # Errors
///
/// - **404 Not Found**: Note missing or owned by someone else
pub async fn detail_handler(
    State(st): State<AppState>,
    Path(slug): Path<String>,
    AuthUser(user): AuthUser,
) -> Result<NoteDetailTemplate, AppError> {
    let note = st.note_service.note_for_owner(&slug, &user).await?;
    Ok(NoteDetailTemplate {
        current_user: Some(user.username),
        note,
    })
}

/// # Endpoint
///
/// `GET /notes/edit/{slug}`
pub async fn edit_form_handler(
    State(st): State<AppState>,
    Path(slug): Path<String>,
    AuthUser(user): AuthUser,
) -> Result<NoteFormTemplate, AppError> {
    let note = st.note_service.note_for_owner(&slug, &user).await?;
    Ok(NoteFormTemplate::edit(user.username, note))
}

/// # Endpoint
///
/// `POST /notes/edit/{slug}`
pub async fn edit_handler(
    State(st): State<AppState>,
    Path(slug): Path<String>,
    AuthUser(user): AuthUser,
    form: Result<Form<NoteForm>, FormRejection>,
) -> Result<Response, AppError> {
    let note = st.note_service.note_for_owner(&slug, &user).await?;
    let Form(form) = match form {
        Ok(form) => form,
        Err(rejection) => return Ok(rejection.into_response()),
    };
    let submitted = form.clone();

    let result = match draft(form) {
        Ok(draft) => st.note_service.update(&slug, &user, draft).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(_) => Ok(Redirect::to(DONE_PATH).into_response()),
        Err(e) => {
            let errors = form_errors(e)?;
            Ok(NoteFormTemplate::edit(user.username, note)
                .with_submission(submitted, &errors)
                .into_response())
        }
    }
}

/// # Endpoint
///
/// `GET /notes/delete/{slug}`
pub async fn delete_form_handler(
    State(st): State<AppState>,
    Path(slug): Path<String>,
    AuthUser(user): AuthUser,
) -> Result<NoteDeleteTemplate, AppError> {
    let note = st.note_service.note_for_owner(&slug, &user).await?;
    Ok(NoteDeleteTemplate {
        current_user: Some(user.username),
        note,
    })
}

/// # Endpoint
///
/// `POST /notes/delete/{slug}`
pub async fn delete_handler(
    State(st): State<AppState>,
    Path(slug): Path<String>,
    AuthUser(user): AuthUser,
) -> Result<Redirect, AppError> {
    st.note_service.delete(&slug, &user).await?;
    Ok(Redirect::to(DONE_PATH))
}

/// # Endpoint
///
/// `GET /notes/done`
pub async fn done_handler(AuthUser(user): AuthUser) -> NoteSuccessTemplate {
    NoteSuccessTemplate {
        current_user: Some(user.username),
    }
}
