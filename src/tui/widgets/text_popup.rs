use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::Config;
use crate::tui::app::TextEdit;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::tui::widgets::task_form::place_cursor;
use crate::utils::format_key_binding_for_display;

/// Free-text editor shown over the current tab
pub fn render_text_popup(f: &mut Frame, area: Rect, edit: &mut TextEdit, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 70, 60);
    f.render_widget(Clear, popup_area);

    let viewport = popup_area.height.saturating_sub(2) as usize;
    edit.editor.update_scroll(viewport);
    let lines: Vec<Line> = edit
        .editor
        .get_visible_lines(viewport)
        .into_iter()
        .map(Line::from)
        .collect();

    let hint = format!(
        " {}: save • Esc: cancel ",
        format_key_binding_for_display(&config.key_bindings.save)
    );
    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(edit.title())
                .title_alignment(Alignment::Center)
                .title_bottom(Line::from(hint).alignment(Alignment::Right))
                .style(Style::default().fg(fg_color).bg(bg_color)),
        );
    f.render_widget(paragraph, popup_area);
    place_cursor(f, &edit.editor, popup_area);
}
