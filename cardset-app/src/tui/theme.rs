use ratatui::style::{Color, Style, Stylize};

pub fn title_style() -> Style { Style::default().fg(Color::Red).bold() }
pub fn hint_style() -> Style { Style::default().fg(Color::DarkGray) }
pub fn selected_style() -> Style { Style::default().fg(Color::Red).bold() }
pub fn footer_style() -> Style { Style::default().fg(Color::Gray) }
pub fn warn_style() -> Style { Style::default().fg(Color::Yellow).bold() }
