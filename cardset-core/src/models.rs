use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

pub type GroupId = String;
pub type TermId = String;

/// One card of a group.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Term {
    pub id: TermId,
    pub term: String,
    pub definition: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub image: Option<String>,
}

/// A named set of terms, created in one step and never edited afterwards.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardGroup {
    pub id: GroupId,
    pub title: String,
    pub description: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "empty_as_none"
    )]
    pub image: Option<String>,
    pub terms: Vec<Term>,
    pub created_at: DateTime<Utc>,
}

impl FlashcardGroup {
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// "1 Card" / "3 Cards", as shown on the listing.
    pub fn card_label(&self) -> String {
        match self.terms.len() {
            1 => "1 Card".to_string(),
            n => format!("{n} Cards"),
        }
    }

    pub fn term(&self, index: usize) -> Option<&Term> {
        self.terms.get(index)
    }
}

// Older snapshots store "no image" as an empty string.
fn empty_as_none<'de, D>(de: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Option::<String>::deserialize(de)?;
    Ok(v.filter(|s| !s.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FlashcardGroup {
        FlashcardGroup {
            id: "1700000000000".into(),
            title: "Spanish".into(),
            description: "Greetings".into(),
            image: None,
            terms: vec![Term {
                id: "term-1".into(),
                term: "hola".into(),
                definition: "hello".into(),
                image: Some("data:image/png;base64,AAAA".into()),
            }],
            created_at: "2024-05-01T10:00:00Z".parse().unwrap(),
        }
    }

    #[test]
    fn serializes_with_persisted_field_names() {
        let v = serde_json::to_value(sample()).unwrap();
        assert!(v.get("createdAt").is_some());
        assert!(v.get("created_at").is_none());
        assert!(v.get("image").is_none());
        assert_eq!(v["terms"][0]["image"], "data:image/png;base64,AAAA");
    }

    #[test]
    fn empty_image_reads_as_absent() {
        let raw = r#"{"id":"1","title":"t","description":"d","image":"",
            "terms":[{"id":"a","term":"x","definition":"y","image":""}],
            "createdAt":"2024-05-01T10:00:00.000Z"}"#;
        let g: FlashcardGroup = serde_json::from_str(raw).unwrap();
        assert_eq!(g.image, None);
        assert_eq!(g.terms[0].image, None);
    }

    #[test]
    fn card_label_pluralizes() {
        let mut g = sample();
        assert_eq!(g.card_label(), "1 Card");
        g.terms.push(g.terms[0].clone());
        assert_eq!(g.card_label(), "2 Cards");
    }
}
