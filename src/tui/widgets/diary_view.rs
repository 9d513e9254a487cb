use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Config;
use crate::canvas::DiaryBoard;
use crate::models::{DiaryEntry, DiaryField};
use crate::tui::layout::DiaryLayout;
use crate::tui::widgets::canvas::BrailleCanvas;
use crate::tui::widgets::color::parse_color;

/// Prompt shown in an empty diary text box
fn placeholder(field: DiaryField) -> &'static str {
    match field {
        DiaryField::Strengths => "What went well today?",
        DiaryField::Weaknesses => "What could have gone better?",
    }
}

pub fn render_diary_view(
    f: &mut Frame,
    layout: &DiaryLayout,
    entry: Option<&DiaryEntry>,
    board: &DiaryBoard,
    focus: DiaryField,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let ink = parse_color(&active_theme.ink);

    for field in DiaryField::ALL {
        let border_style = if field == focus {
            Style::default().fg(highlight_bg).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color)
        };

        let text = entry.map(|e| e.text(field)).unwrap_or_default();
        let body = if text.is_empty() {
            Paragraph::new(placeholder(field))
                .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM))
        } else {
            Paragraph::new(text.lines().map(Line::from).collect::<Vec<_>>())
                .style(Style::default().fg(fg_color))
        };
        f.render_widget(
            body.wrap(Wrap { trim: false }).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(field.title()),
            ),
            layout.text_area(field),
        );

        let canvas = board.canvas(field);
        let status = match canvas {
            Some(c) if c.is_restoring() => "loading".to_string(),
            Some(_) => board.mode().label().to_string(),
            None => "unavailable".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("{} sketch · {}", field.title(), status));
        f.render_widget(block, layout.canvas_block(field));

        if let Some(canvas) = canvas {
            f.render_widget(
                BrailleCanvas::new(canvas.surface(), ink),
                layout.canvas_inner(field),
            );
        }
    }
}
