//! Request shape checks that run before anything reaches the service.
//!
//! Payloads are inspected as raw JSON so that every offending field can be
//! reported at once instead of failing on the first deserialization error.

use serde_json::{Map, Value};

use std::fmt;

use crate::models::{NewNote, NoteId, NotePatch};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid ID : {0}")]
pub struct MalformedIdentifier(pub String);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    /// Offending field, `tags[i]` for a single tag
    pub field: String,
    /// What is wrong with it
    pub message: String,
}

impl FieldError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationErrors(pub Vec<FieldError>);

impl ValidationErrors {
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.field.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self
            .0
            .iter()
            .map(|e| format!("{}: {}", e.field, e.message))
            .collect();
        write!(f, "invalid payload ({})", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

pub fn parse_note_id(raw: &str) -> Result<NoteId, MalformedIdentifier> {
    if raw.len() == NoteId::LEN && raw.bytes().all(|b| b.is_ascii_hexdigit()) {
        Ok(NoteId(raw.to_ascii_lowercase()))
    } else {
        Err(MalformedIdentifier(raw.to_string()))
    }
}

pub fn validate_create(body: &Value) -> Result<NewNote, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = Vec::new();

    let title = match present(object, "title") {
        Some(value) => check_title(value, &mut errors),
        None => {
            errors.push(FieldError::new("title", "title should not be empty"));
            None
        }
    };
    let content = present(object, "content").and_then(|v| check_content(v, &mut errors));
    let tags = present(object, "tags").and_then(|v| check_tags(v, &mut errors));

    match title {
        Some(title) if errors.is_empty() => Ok(NewNote {
            title,
            content,
            tags: tags.unwrap_or_default(),
        }),
        _ => Err(ValidationErrors(errors)),
    }
}

pub fn validate_update(body: &Value) -> Result<NotePatch, ValidationErrors> {
    let object = as_object(body)?;
    let mut errors = Vec::new();

    let patch = NotePatch {
        title: present(object, "title").and_then(|v| check_title(v, &mut errors)),
        content: present(object, "content").and_then(|v| check_content(v, &mut errors)),
        tags: present(object, "tags").and_then(|v| check_tags(v, &mut errors)),
    };

    if errors.is_empty() {
        Ok(patch)
    } else {
        Err(ValidationErrors(errors))
    }
}

fn as_object(body: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    body.as_object().ok_or_else(|| {
        ValidationErrors(vec![FieldError::new("body", "body must be a JSON object")])
    })
}

// `null` counts as omitted.
fn present<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    object.get(field).filter(|v| !v.is_null())
}

fn check_title(value: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::String(_) => {
            errors.push(FieldError::new("title", "title should not be empty"));
            None
        }
        _ => {
            errors.push(FieldError::new("title", "title must be a string"));
            None
        }
    }
}

fn check_content(value: &Value, errors: &mut Vec<FieldError>) -> Option<String> {
    if let Value::String(s) = value {
        Some(s.clone())
    } else {
        errors.push(FieldError::new("content", "content must be a string"));
        None
    }
}

fn check_tags(value: &Value, errors: &mut Vec<FieldError>) -> Option<Vec<String>> {
    let Value::Array(items) = value else {
        errors.push(FieldError::new("tags", "tags must be an array"));
        return None;
    };

    let before = errors.len();
    let tags: Vec<String> = items
        .iter()
        .enumerate()
        .filter_map(|(i, item)| {
            if let Value::String(s) = item {
                Some(s.clone())
            } else {
                errors.push(FieldError::new(
                    format!("tags[{i}]"),
                    "each value in tags must be a string",
                ));
                None
            }
        })
        .collect();

    (errors.len() == before).then_some(tags)
}
