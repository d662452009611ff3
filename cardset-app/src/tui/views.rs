use crate::tui::theme::*;
use cardset_core::{FlashcardGroup, ReviewCursor};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

pub enum View<'a> {
    Listing { groups: &'a [FlashcardGroup], sel: usize },
    Detail { group: &'a FlashcardGroup, cursor: &'a ReviewCursor },
    NotFound { id: &'a str },
}

pub fn draw_ui(f: &mut Frame, area: Rect, view: View, confirm: Option<&str>, status: Option<&str>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(1), Constraint::Length(1)])
        .split(area);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
        .split(rows[0]);

    let keys = match view {
        View::Listing { groups, sel } => {
            draw_groups(f, chunks[0], groups, sel);
            draw_summary(f, chunks[1], groups.get(sel));
            " ↑/k ↓/j select   Enter open   d delete   q quit "
        }
        View::Detail { group, cursor } => {
            draw_terms(f, chunks[0], group, cursor.position());
            draw_card(f, chunks[1], group, cursor);
            " ←/h →/l previous/next   1-9 jump   d delete   Esc back   q quit "
        }
        View::NotFound { id } => {
            let p = Paragraph::new(vec![
                Line::from(Span::raw("Flashcard not found").style(title_style())),
                Line::from(""),
                Line::from(format!("No group with id {id}.")),
                Line::from(Span::raw("Press Esc to go back to My Flashcards.").style(hint_style())),
            ])
            .wrap(Wrap { trim: true })
            .block(Block::default().borders(Borders::ALL));
            f.render_widget(p, rows[0]);
            " Esc back   q quit "
        }
    };

    let status_line = Paragraph::new(status.unwrap_or("")).style(warn_style());
    f.render_widget(status_line, rows[1]);
    let foot = Paragraph::new(keys).style(footer_style());
    f.render_widget(foot, rows[2]);

    if let Some(title) = confirm {
        draw_confirm(f, area, title);
    }
}

fn draw_groups(f: &mut Frame, area: Rect, groups: &[FlashcardGroup], sel: usize) {
    let items: Vec<_> = groups
        .iter()
        .enumerate()
        .map(|(i, g)| {
            let text = format!("{}  ({})", g.title, g.card_label());
            let line = if i == sel {
                Line::from(text).style(selected_style())
            } else {
                Line::from(text)
            };
            ListItem::new(line)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(Span::raw("My Flashcards").style(title_style()))
            .borders(Borders::ALL),
    );
    f.render_widget(list, area);
}

fn draw_summary(f: &mut Frame, area: Rect, group: Option<&FlashcardGroup>) {
    let block = Block::default().title("Details").borders(Borders::ALL);
    let p = match group {
        None => Paragraph::new(vec![
            Line::from("No flashcards yet."),
            Line::from(Span::raw("Create one with `cardset create`.").style(hint_style())),
        ]),
        Some(g) => {
            let mut lines = vec![
                Line::from(Span::raw(g.title.as_str()).style(title_style())),
                Line::from(""),
                Line::from(g.description.as_str()),
                Line::from(""),
                Line::from(Span::raw(g.card_label()).style(hint_style())),
            ];
            if g.image.is_some() {
                lines.push(Line::from(Span::raw("[image]").style(hint_style())));
            }
            Paragraph::new(lines)
        }
    };
    f.render_widget(p.wrap(Wrap { trim: true }).block(block), area);
}

fn draw_terms(f: &mut Frame, area: Rect, group: &FlashcardGroup, current: usize) {
    let items: Vec<_> = group
        .terms
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let text = format!("{}. {}", i + 1, t.term);
            if i == current {
                ListItem::new(Line::from(text).style(selected_style()))
            } else {
                ListItem::new(Line::from(text))
            }
        })
        .collect();
    let list = List::new(items).block(Block::default().title("Flashcards").borders(Borders::ALL));
    f.render_widget(list, area);
}

fn draw_card(f: &mut Frame, area: Rect, group: &FlashcardGroup, cursor: &ReviewCursor) {
    let Some(term) = group.term(cursor.position()) else {
        return;
    };
    let (n, total) = cursor.progress();
    let mut lines = vec![
        Line::from(Span::raw(term.term.as_str()).style(title_style())),
        Line::from(""),
    ];
    if term.image.is_some() {
        lines.push(Line::from(Span::raw("[image]").style(hint_style())));
    }
    lines.push(Line::from(term.definition.as_str()));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::raw(format!("‹  {n}/{total}  ›")).style(hint_style())));

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().title(group.title.as_str()).borders(Borders::ALL));
    f.render_widget(p, area);
}

fn draw_confirm(f: &mut Frame, area: Rect, title: &str) {
    let w = area.width.min(50);
    let h = 5;
    let r = Rect {
        x: area.x + area.width.saturating_sub(w) / 2,
        y: area.y + area.height.saturating_sub(h) / 2,
        width: w,
        height: h.min(area.height),
    };
    let p = Paragraph::new(vec![
        Line::from(format!("Delete \"{title}\"?")),
        Line::from(Span::raw("This cannot be undone.  y = delete, n = cancel").style(hint_style())),
    ])
    .wrap(Wrap { trim: true })
    .block(Block::default().title("Delete Flashcard").borders(Borders::ALL));
    f.render_widget(Clear, r);
    f.render_widget(p, r);
}
