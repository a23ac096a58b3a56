use chrono::{DateTime, Utc};

use std::fmt;

/// Store-assigned note identifier: 24 lowercase hex characters.
///
/// The first 8 characters encode the creation second, the remaining 16 are random.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteId(pub(crate) String);

impl NoteId {
    pub const LEN: usize = 24;

    pub fn generate() -> Self {
        let secs = u32::try_from(Utc::now().timestamp()).unwrap_or(u32::MAX);
        let random = uuid::Uuid::new_v4();

        let mut hex = format!("{secs:08x}");
        for byte in &random.as_bytes()[8..] {
            hex.push_str(&format!("{byte:02x}"));
        }

        Self(hex)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub content: Option<String>,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl Note {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Validated input for note creation. Unset fields already carry their defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewNote {
    pub title: String,
    pub content: Option<String>,
    pub tags: Vec<String>,
}

/// Validated partial update. `None` leaves the stored field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl NotePatch {
    pub const fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }

    pub fn apply(self, note: &mut Note) {
        if let Some(title) = self.title {
            note.title = title;
        }
        if let Some(content) = self.content {
            note.content = Some(content);
        }
        if let Some(tags) = self.tags {
            note.tags = tags;
        }
    }
}
