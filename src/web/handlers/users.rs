//! Login, logout and signup pages.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    http::{HeaderMap, header::SET_COOKIE},
    response::{IntoResponse, Redirect, Response},
};

use crate::domain::validation::FormErrors;
use crate::error::AppError;
use crate::state::AppState;
use crate::web::extract::{LOGIN_PATH, MaybeUser};
use crate::web::forms::{LoginForm, NextQuery, SignupForm, safe_next};
use crate::web::handlers::form_errors;
use crate::web::middleware::session::{clear_session_cookie, session_cookie, session_token};

#[derive(Template, WebTemplate)]
#[template(path = "users/login.html")]
pub struct LoginTemplate {
    pub current_user: Option<String>,
    pub next: String,
    pub username: String,
    pub errors: Vec<String>,
    pub username_errors: Vec<String>,
    pub password_errors: Vec<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "users/logout.html")]
pub struct LogoutTemplate {
    pub current_user: Option<String>,
}

#[derive(Template, WebTemplate)]
#[template(path = "users/signup.html")]
pub struct SignupTemplate {
    pub current_user: Option<String>,
    pub username: String,
    pub username_errors: Vec<String>,
    pub password_errors: Vec<String>,
    pub password_confirmation_errors: Vec<String>,
}

impl SignupTemplate {
    fn new(current_user: Option<String>, username: String, errors: &FormErrors) -> Self {
        Self {
            current_user,
            username,
            username_errors: errors.for_field("username"),
            password_errors: errors.for_field("password"),
            password_confirmation_errors: errors.for_field("password_confirmation"),
        }
    }
}

/// # Endpoint
///
/// `GET /auth/login?next=/path`
pub async fn login_form_handler(
    user: MaybeUser,
    Query(query): Query<NextQuery>,
) -> LoginTemplate {
    LoginTemplate {
        current_user: user.username(),
        next: safe_next(query.next.as_deref()).unwrap_or_default().to_string(),
        username: String::new(),
        errors: Vec::new(),
        username_errors: Vec::new(),
        password_errors: Vec::new(),
    }
}

/// Opens a session and redirects to `next` (or the home page).
///
/// # Endpoint
///
/// `POST /auth/login` (form fields `username`, `password`, `next`)
///
/// # Responses
///
/// - **303 See Other** with `Set-Cookie: session_id=...` on success
/// - **200 OK** with the form and an error on bad credentials
pub async fn login_handler(
    State(st): State<AppState>,
    user: MaybeUser,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    let submitted = form.clone();

    let result = match form.clean() {
        Ok(form) => st.auth_service.login(&form.username, &form.password).await,
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok((_, token)) => {
            let target = safe_next(submitted.next.as_deref()).unwrap_or("/");
            Ok((
                [(SET_COOKIE, session_cookie(&token))],
                Redirect::to(target),
            )
                .into_response())
        }
        Err(e) => {
            let errors = form_errors(e)?;
            Ok(LoginTemplate {
                current_user: user.username(),
                next: safe_next(submitted.next.as_deref())
                    .unwrap_or_default()
                    .to_string(),
                username: submitted.username,
                errors: errors.non_field_errors(),
                username_errors: errors.for_field("username"),
                password_errors: errors.for_field("password"),
            }
            .into_response())
        }
    }
}

/// Closes the session, if any, and renders the logged-out page.
///
/// # Endpoint
///
/// `GET /auth/logout` or `POST /auth/logout`
pub async fn logout_handler(
    State(st): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    if let Some(token) = session_token(&headers) {
        st.auth_service.logout(&token).await?;
    }

    Ok((
        [(SET_COOKIE, clear_session_cookie())],
        LogoutTemplate { current_user: None },
    )
        .into_response())
}

/// # Endpoint
///
/// `GET /auth/signup`
pub async fn signup_form_handler(user: MaybeUser) -> SignupTemplate {
    SignupTemplate::new(user.username(), String::new(), &FormErrors::new())
}

/// Registers a user and sends them to the login page.
///
/// # Endpoint
///
/// `POST /auth/signup` (form fields `username`, `password`, `password_confirmation`)
pub async fn signup_handler(
    State(st): State<AppState>,
    user: MaybeUser,
    Form(form): Form<SignupForm>,
) -> Result<Response, AppError> {
    let submitted = form.username.clone();

    let result = match form.clean() {
        Ok(form) => {
            st.auth_service
                .signup(&form.username, &form.password, &form.password_confirmation)
                .await
        }
        Err(errors) => Err(errors.into()),
    };

    match result {
        Ok(_) => Ok(Redirect::to(LOGIN_PATH).into_response()),
        Err(e) => {
            let errors = form_errors(e)?;
            Ok(SignupTemplate::new(user.username(), submitted, &errors).into_response())
        }
    }
}
