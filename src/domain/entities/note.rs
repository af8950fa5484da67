//! Note entity.

use crate::domain::access::Owned;

/// A personal note, addressed by its unique slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: i64,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: i64,
}

impl Owned for Note {
    fn owner_id(&self) -> i64 {
        self.author_id
    }
}

/// Input data for creating a note. The slug is already assigned.
#[derive(Debug, Clone)]
pub struct NewNote {
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: i64,
}

/// Full replacement of the editable note fields.
#[derive(Debug, Clone)]
pub struct NoteChanges {
    pub title: String,
    pub text: String,
    pub slug: String,
}
