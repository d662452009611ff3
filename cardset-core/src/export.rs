//! Read-only renderings of a group: download text, print page, share link.

use crate::FlashcardGroup;

pub fn download_text(group: &FlashcardGroup) -> String {
    let body = group
        .terms
        .iter()
        .enumerate()
        .map(|(i, t)| format!("{}. {}\n   {}\n", i + 1, t.term, t.definition))
        .collect::<Vec<_>>()
        .join("\n");
    format!("{}\n\n{}\n\n{}", group.title, group.description, body)
}

/// `My Deck` -> `My_Deck_flashcards.txt`
pub fn download_file_name(group: &FlashcardGroup) -> String {
    let mut out = String::with_capacity(group.title.len() + 16);
    let mut in_space = false;
    for ch in group.title.chars() {
        if ch.is_whitespace() {
            if !in_space {
                out.push('_');
            }
            in_space = true;
        } else {
            out.push(ch);
            in_space = false;
        }
    }
    out.push_str("_flashcards.txt");
    out
}

pub fn print_page(group: &FlashcardGroup) -> String {
    let rule = "=".repeat(group.title.chars().count().max(8));
    let mut out = format!("{}\n{rule}\n\n{}\n\n", group.title, group.description);
    out.push_str(&format!(
        "{}  (created {})\n\n",
        group.card_label(),
        group.created_at.format("%Y-%m-%d")
    ));
    for (i, t) in group.terms.iter().enumerate() {
        out.push_str(&format!("{:>3}. {}\n     {}\n", i + 1, t.term, t.definition));
        if t.image.is_some() {
            out.push_str("     [image]\n");
        }
        out.push('\n');
    }
    out
}

pub fn share_url(origin: &str, id: &str) -> String {
    format!("{}/flashcard/{}", origin.trim_end_matches('/'), id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Term;
    use chrono::Utc;

    fn group() -> FlashcardGroup {
        let term = |t: &str, d: &str| Term {
            id: format!("term-{t}"),
            term: t.into(),
            definition: d.into(),
            image: None,
        };
        FlashcardGroup {
            id: "42".into(),
            title: "Rust  basics".into(),
            description: "Ownership".into(),
            image: None,
            terms: vec![term("move", "transfer"), term("borrow", "reference")],
            created_at: Utc::now(),
        }
    }

    #[test]
    fn download_text_layout() {
        assert_eq!(
            download_text(&group()),
            "Rust  basics\n\nOwnership\n\n1. move\n   transfer\n\n2. borrow\n   reference\n"
        );
    }

    #[test]
    fn file_name_collapses_whitespace() {
        assert_eq!(download_file_name(&group()), "Rust_basics_flashcards.txt");
    }

    #[test]
    fn share_url_trims_origin() {
        assert_eq!(
            share_url("http://localhost:8080/", "42"),
            "http://localhost:8080/flashcard/42"
        );
    }

    #[test]
    fn print_page_lists_every_term() {
        let page = print_page(&group());
        assert!(page.starts_with("Rust  basics\n"));
        assert!(page.contains("2 Cards"));
        assert!(page.contains("  1. move\n     transfer\n"));
        assert!(page.contains("  2. borrow\n     reference\n"));
    }
}
