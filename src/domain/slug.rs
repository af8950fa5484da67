//! Note slug derivation and assignment.
//!
//! A slug is either supplied explicitly by the author or derived from the
//! title: Cyrillic is transliterated with the Russian table below, anything
//! else non-ASCII is approximated by `deunicode` (through the `slug` crate),
//! and the result is normalized to lowercase ASCII letters, digits and hyphens.
//! Derived slugs are never suffixed to dodge collisions.

use crate::domain::repositories::NoteRepository;
use crate::domain::validation::ValidationError;
use crate::error::AppError;

/// Maximum slug length, in characters.
pub const SLUG_MAX_LENGTH: usize = 100;

/// Appended to the colliding slug in the conflict message.
pub const SLUG_CONFLICT_SUFFIX: &str =
    " - такой slug уже существует, придумайте уникальное значение!";

const INVALID_SLUG_MESSAGE: &str =
    "Значение должно состоять только из латинских букв, цифр, знаков подчеркивания или дефиса.";

const EMPTY_SLUG_MESSAGE: &str = "Не удалось построить slug из заголовка, укажите его вручную.";

fn transliterate_char(c: char) -> Option<&'static str> {
    let latin = match c {
        'а' => "a",
        'б' => "b",
        'в' => "v",
        'г' | 'ґ' => "g",
        'д' => "d",
        'е' | 'э' => "e",
        'ё' => "yo",
        'є' => "ye",
        'ж' => "zh",
        'з' => "z",
        'и' | 'і' => "i",
        'ї' => "yi",
        'й' => "j",
        'к' => "k",
        'л' => "l",
        'м' => "m",
        'н' => "n",
        'о' => "o",
        'п' => "p",
        'р' => "r",
        'с' => "s",
        'т' => "t",
        'у' => "u",
        'ф' => "f",
        'х' => "h",
        'ц' => "ts",
        'ч' => "ch",
        'ш' => "sh",
        'щ' => "sch",
        'ъ' | 'ь' => "",
        'ы' => "yi",
        'ю' => "yu",
        'я' => "ya",
        _ => return None,
    };
    Some(latin)
}

/// Replaces Cyrillic letters (of either case) with their lowercase Latin spelling.
/// Other characters are kept as they are.
pub fn transliterate(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        let mut lower = c.to_lowercase();
        let mapped = match (lower.next(), lower.next()) {
            (Some(l), None) => transliterate_char(l),
            _ => None,
        };
        match mapped {
            Some(latin) => out.push_str(latin),
            None => out.push(c),
        }
    }
    out
}

/// Derives a URL-safe slug from a title.
///
/// The result contains only `[a-z0-9-]`, has no leading or trailing hyphen and
/// is at most [`SLUG_MAX_LENGTH`] characters long. It may be empty when the
/// title has nothing transliterable.
pub fn slugify(title: &str) -> String {
    let mut slug = ::slug::slugify(transliterate(title));
    if slug.len() > SLUG_MAX_LENGTH {
        slug.truncate(SLUG_MAX_LENGTH);
        let trimmed = slug.trim_end_matches('-').len();
        slug.truncate(trimmed);
    }
    slug
}

/// Returns true for an acceptable explicit slug: `[-a-zA-Z0-9_]+`, at most 100 chars.
pub fn is_valid_slug(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= SLUG_MAX_LENGTH
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Slug proposed for a note before the uniqueness check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlugCandidate {
    Explicit(String),
    Derived(String),
}

impl SlugCandidate {
    pub fn as_str(&self) -> &str {
        match self {
            SlugCandidate::Explicit(s) | SlugCandidate::Derived(s) => s,
        }
    }

    pub fn into_inner(self) -> String {
        match self {
            SlugCandidate::Explicit(s) | SlugCandidate::Derived(s) => s,
        }
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, SlugCandidate::Explicit(_))
    }
}

/// Picks the slug for a note and enforces uniqueness among notes.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentifierAssigner;

impl IdentifierAssigner {
    pub fn new() -> Self {
        Self
    }

    /// Chooses the candidate without touching storage.
    ///
    /// A blank explicit slug counts as absent.
    pub fn candidate(
        &self,
        title: &str,
        explicit: Option<&str>,
    ) -> Result<SlugCandidate, ValidationError> {
        match explicit.map(str::trim).filter(|s| !s.is_empty()) {
            Some(slug) if is_valid_slug(slug) => Ok(SlugCandidate::Explicit(slug.to_string())),
            Some(_) => Err(ValidationError::Invalid {
                field: "slug",
                message: INVALID_SLUG_MESSAGE.to_string(),
            }),
            None => {
                let derived = slugify(title);
                if derived.is_empty() {
                    return Err(ValidationError::Invalid {
                        field: "title",
                        message: EMPTY_SLUG_MESSAGE.to_string(),
                    });
                }
                Ok(SlugCandidate::Derived(derived))
            }
        }
    }

    /// Chooses the slug and checks that no other note holds it.
    ///
    /// `editing` is the id of the note being updated; its own slug does not
    /// count as a collision.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Form`] with [`ValidationError::IdentifierConflict`]
    /// on the `slug` field when another note already uses the slug.
    pub async fn assign(
        &self,
        notes: &dyn NoteRepository,
        title: &str,
        explicit: Option<&str>,
        editing: Option<i64>,
    ) -> Result<String, AppError> {
        let candidate = self.candidate(title, explicit)?;

        if let Some(existing) = notes.find_by_slug(candidate.as_str()).await?
            && Some(existing.id) != editing
        {
            tracing::debug!(
                slug = candidate.as_str(),
                explicit = candidate.is_explicit(),
                "Slug already taken"
            );
            return Err(ValidationError::IdentifierConflict {
                slug: candidate.into_inner(),
            }
            .into());
        }

        Ok(candidate.into_inner())
    }
}
