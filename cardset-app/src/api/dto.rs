use cardset_core::{FieldError, FlashcardGroup, GroupId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// One card on the listing page.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupSummary {
    pub id: GroupId,
    pub title: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub cards: usize,
    pub created_at: DateTime<Utc>,
    pub share_url: String,
}

impl GroupSummary {
    pub fn new(g: &FlashcardGroup, share_url: String) -> Self {
        Self {
            id: g.id.clone(),
            title: g.title.clone(),
            description: g.description.clone(),
            image: g.image.clone(),
            cards: g.term_count(),
            created_at: g.created_at,
            share_url,
        }
    }
}

#[derive(Serialize)]
pub struct ShareOut {
    pub url: String,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<FieldError>,
}
