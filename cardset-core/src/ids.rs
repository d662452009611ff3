use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{FlashcardGroup, GroupId, TermId};

/// Issues group ids as decimal millisecond timestamps that never repeat and
/// never go backwards, even when two groups land in the same millisecond or
/// the clock steps back.
#[derive(Clone, Debug, Default)]
pub struct GroupIdGen {
    last: i64,
}

impl GroupIdGen {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds from the largest numeric id already in use. Ids that are not a
    /// representable millisecond timestamp (hand-edited or foreign data) are
    /// ignored; `create` still steps around them if they collide.
    pub fn seeded_from(groups: &[FlashcardGroup]) -> Self {
        let last = groups
            .iter()
            .filter_map(|g| g.id.parse::<i64>().ok())
            .filter(|ms| DateTime::<Utc>::from_timestamp_millis(*ms).is_some())
            .max()
            .unwrap_or(0);
        Self { last }
    }

    pub fn next_at(&mut self, now: DateTime<Utc>) -> GroupId {
        let candidate = now.timestamp_millis();
        self.last = if candidate > self.last {
            candidate
        } else {
            self.last.saturating_add(1)
        };
        self.last.to_string()
    }

    pub fn next(&mut self) -> GroupId {
        self.next_at(Utc::now())
    }
}

pub fn new_term_id() -> TermId {
    format!("term-{}", Uuid::new_v4())
}
