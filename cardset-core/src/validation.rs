//! Typed creation input.
//!
//! A [`GroupDraft`] is whatever the form (CLI flags, TUI, HTTP body) collected.
//! [`GroupDraft::validate`] is the only way to obtain a [`NewGroup`], which is
//! what [`crate::FlashcardStore::create`] accepts.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::FlashcardGroup;

pub const TITLE_REQUIRED: &str = "Group title is required";
pub const DESCRIPTION_REQUIRED: &str = "Description is required";
pub const TERMS_REQUIRED: &str = "At least one term is required";
pub const TERM_REQUIRED: &str = "Term is required";
pub const DEFINITION_REQUIRED: &str = "Definition is required";

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TermDraft {
    #[serde(default)]
    pub term: String,
    #[serde(default)]
    pub definition: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl TermDraft {
    pub fn new(term: impl Into<String>, definition: impl Into<String>) -> Self {
        Self {
            term: term.into(),
            definition: definition.into(),
            image: None,
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct GroupDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub terms: Vec<TermDraft>,
}

impl GroupDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            image: None,
            terms: Vec::new(),
        }
    }

    pub fn with_term(mut self, term: impl Into<String>, definition: impl Into<String>) -> Self {
        self.terms.push(TermDraft::new(term, definition));
        self
    }

    /// Checks every field and reports all failures together.
    pub fn validate(self) -> Result<NewGroup, ValidationErrors> {
        let mut errors = Vec::new();
        if is_blank(&self.title) {
            errors.push(FieldError::new("title", TITLE_REQUIRED));
        }
        if is_blank(&self.description) {
            errors.push(FieldError::new("description", DESCRIPTION_REQUIRED));
        }
        if self.terms.is_empty() {
            errors.push(FieldError::new("terms", TERMS_REQUIRED));
        }
        for (i, t) in self.terms.iter().enumerate() {
            if is_blank(&t.term) {
                errors.push(FieldError::new(format!("terms[{i}].term"), TERM_REQUIRED));
            }
            if is_blank(&t.definition) {
                errors.push(FieldError::new(
                    format!("terms[{i}].definition"),
                    DEFINITION_REQUIRED,
                ));
            }
        }
        if !errors.is_empty() {
            return Err(ValidationErrors { errors });
        }

        Ok(NewGroup {
            title: self.title,
            description: self.description,
            image: normalize_image(self.image),
            terms: self
                .terms
                .into_iter()
                .map(|t| NewTerm {
                    term: t.term,
                    definition: t.definition,
                    image: normalize_image(t.image),
                })
                .collect(),
        })
    }
}

impl From<&FlashcardGroup> for GroupDraft {
    fn from(g: &FlashcardGroup) -> Self {
        Self {
            title: g.title.clone(),
            description: g.description.clone(),
            image: g.image.clone(),
            terms: g
                .terms
                .iter()
                .map(|t| TermDraft {
                    term: t.term.clone(),
                    definition: t.definition.clone(),
                    image: t.image.clone(),
                })
                .collect(),
        }
    }
}

/// A validated term, ready to be given an id.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewTerm {
    term: String,
    definition: String,
    image: Option<String>,
}

impl NewTerm {
    pub fn term(&self) -> &str {
        &self.term
    }

    pub fn definition(&self) -> &str {
        &self.definition
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub(crate) fn into_parts(self) -> (String, String, Option<String>) {
        (self.term, self.definition, self.image)
    }
}

/// A validated group: non-blank title and description, at least one term.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewGroup {
    title: String,
    description: String,
    image: Option<String>,
    terms: Vec<NewTerm>,
}

impl NewGroup {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn terms(&self) -> &[NewTerm] {
        &self.terms
    }

    pub(crate) fn into_parts(self) -> (String, String, Option<String>, Vec<NewTerm>) {
        (self.title, self.description, self.image, self.terms)
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: &'static str,
}

impl FieldError {
    fn new(field: impl Into<String>, message: &'static str) -> Self {
        Self {
            field: field.into(),
            message,
        }
    }
}

#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
pub struct ValidationErrors {
    pub errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn for_field(&self, field: &str) -> Option<&'static str> {
        self.errors
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.errors.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn normalize_image(image: Option<String>) -> Option<String> {
    image.filter(|s| !s.trim().is_empty())
}
