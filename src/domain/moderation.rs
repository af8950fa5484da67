//! Comment moderation against a configured list of banned words.
//!
//! Matching is plain, case-sensitive substring search: a banned word is found
//! anywhere in the text, including inside a longer word. The rejection never
//! says which word matched.

use std::sync::Arc;

use crate::domain::validation::ValidationError;

/// Words rejected by default.
pub const BAD_WORDS: [&str; 2] = ["редиска", "негодяй"];

/// Message attached to the `text` field of a rejected comment.
pub const WARNING: &str = "Не ругайтесь!";

/// Immutable set of banned substrings, built once at startup.
#[derive(Debug, Clone)]
pub struct BannedWords(Arc<[String]>);

impl BannedWords {
    /// Builds the set, dropping empty entries (an empty pattern would match any text).
    pub fn new<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.is_empty())
            .collect();
        Self(words.into())
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn first_match(&self, text: &str) -> Option<&str> {
        self.iter().find(|word| text.contains(word))
    }
}

impl Default for BannedWords {
    fn default() -> Self {
        Self::new(BAD_WORDS)
    }
}

/// Validates comment text before it is persisted.
#[derive(Debug, Clone, Default)]
pub struct ContentValidator {
    banned: BannedWords,
}

impl ContentValidator {
    pub fn new(banned: BannedWords) -> Self {
        Self { banned }
    }

    pub fn banned_words(&self) -> &BannedWords {
        &self.banned
    }

    /// Returns the text unchanged, or [`ValidationError::ContentRejected`].
    pub fn validate<'a>(&self, text: &'a str) -> Result<&'a str, ValidationError> {
        match self.banned.first_match(text) {
            Some(word) => {
                tracing::debug!(word_len = word.chars().count(), "Banned word found");
                Err(ValidationError::ContentRejected)
            }
            None => Ok(text),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> ContentValidator {
        ContentValidator::default()
    }

    #[test]
    fn test_rejects_every_default_word_in_the_middle() {
        for word in BAD_WORDS {
            let text = format!("Какой-то текст, {word}, еще текст");
            assert_eq!(
                validator().validate(&text),
                Err(ValidationError::ContentRejected),
                "'{word}' should be rejected"
            );
        }
    }

    #[test]
    fn test_rejects_at_start_and_end() {
        assert!(validator().validate("редиска в начале").is_err());
        assert!(validator().validate("в конце негодяй").is_err());
        assert!(validator().validate("негодяй").is_err());
    }

    #[test]
    fn test_rejects_inside_larger_word() {
        assert!(validator().validate("суперредискаоднако").is_err());
        assert!(validator().validate("негодяйство").is_err());
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(validator().validate("Редиска с большой буквы").is_ok());
        assert!(validator().validate("НЕГОДЯЙ").is_ok());
    }

    #[test]
    fn test_accepts_clean_text_unchanged() {
        let text = "  обычный текст  ";
        assert_eq!(validator().validate(text), Ok(text));
    }

    #[test]
    fn test_custom_word_list() {
        let validator = ContentValidator::new(BannedWords::new(["запрещенное_слово"]));

        assert!(
            validator
                .validate("текст, запрещенное_слово, еще текст")
                .is_err()
        );
        assert!(validator.validate("обычный текст").is_ok());
        assert!(validator.validate("редиска").is_ok());
    }

    #[test]
    fn test_empty_entries_are_ignored() {
        let words = BannedWords::new(["", "плохо"]);
        assert_eq!(words.len(), 1);

        let validator = ContentValidator::new(words);
        assert!(validator.validate("всё хорошо").is_ok());
    }

    #[test]
    fn test_empty_set_accepts_everything() {
        let validator = ContentValidator::new(BannedWords::new(Vec::<String>::new()));
        assert!(validator.banned_words().is_empty());
        assert!(validator.validate("редиска").is_ok());
    }
}
