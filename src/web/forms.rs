//! Form bodies submitted by the HTML pages.
//!
//! Each form is deserialized from `application/x-www-form-urlencoded`,
//! trimmed, then validated with `validator`. Business rules (moderation,
//! slug uniqueness, credentials) run later in the services.

use regex::Regex;
use serde::Deserialize;
use serde_with::{NoneAsEmptyString, serde_as};
use std::borrow::Cow;
use std::sync::LazyLock;
use validator::{Validate, ValidationError};

use crate::domain::validation::FormErrors;

const REQUIRED: &str = "Обязательное поле.";

/// Letters, digits and `@ . + - _`.
static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+$").expect("valid username regex"));

fn required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required").with_message(Cow::Borrowed(REQUIRED)));
    }
    Ok(())
}

fn trimmed(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

fn check(form: &impl Validate) -> Result<(), FormErrors> {
    form.validate().map_err(FormErrors::from)
}

/// Comment text under a news item.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CommentForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub text: String,
}

impl CommentForm {
    pub fn clean(mut self) -> Result<Self, FormErrors> {
        trimmed(&mut self.text);
        check(&self)?;
        Ok(self)
    }
}

/// Note fields. An empty `slug` input is read as `None`.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NoteForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    #[validate(length(
        max = 100,
        message = "Убедитесь, что это значение содержит не более 100 символов."
    ))]
    pub title: String,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub text: String,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    #[validate(length(
        max = 100,
        message = "Убедитесь, что это значение содержит не более 100 символов."
    ))]
    pub slug: Option<String>,
}

impl NoteForm {
    pub fn clean(mut self) -> Result<Self, FormErrors> {
        trimmed(&mut self.title);
        trimmed(&mut self.text);
        self.slug = self
            .slug
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());
        check(&self)?;
        Ok(self)
    }
}

/// Login credentials plus the page to return to.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub password: String,

    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub next: Option<String>,
}

impl LoginForm {
    /// Passwords are never trimmed.
    pub fn clean(mut self) -> Result<Self, FormErrors> {
        trimmed(&mut self.username);
        check(&self)?;
        Ok(self)
    }
}

/// Registration form.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct SignupForm {
    #[serde(default)]
    #[validate(custom(function = "required"))]
    #[validate(length(
        max = 150,
        message = "Убедитесь, что это значение содержит не более 150 символов."
    ))]
    #[validate(regex(
        path = "*USERNAME_REGEX",
        message = "Введите правильное имя пользователя. Оно может содержать только буквы, цифры и знаки @/./+/-/_."
    ))]
    pub username: String,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub password: String,

    #[serde(default)]
    #[validate(custom(function = "required"))]
    pub password_confirmation: String,
}

impl SignupForm {
    pub fn clean(mut self) -> Result<Self, FormErrors> {
        trimmed(&mut self.username);
        check(&self)?;
        Ok(self)
    }
}

/// Query string of the login page.
#[serde_as]
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    #[serde_as(as = "NoneAsEmptyString")]
    #[serde(default)]
    pub next: Option<String>,
}

/// Returns `next` if it is a local absolute path, so a login link cannot
/// send the user to another site.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|path| {
        path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
    })
}
