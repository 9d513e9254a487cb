use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::Config;
use crate::tui::app::TIME_STEP_MINUTES;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup_area = popup_area(area, 60, 80);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(Wrap { trim: true });

    f.render_widget(paragraph, popup_area);
}

pub fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Navigation:\n");
    text.push_str(&format!(
        "  {} / {}: Switch tabs (1-4 jumps)\n",
        key(&kb.tab_left),
        key(&kb.tab_right)
    ));
    text.push_str(&format!(
        "  {} / {}: Move selection\n",
        key(&kb.list_up),
        key(&kb.list_down)
    ));
    text.push_str(&format!(
        "  {} / {} / {}: Previous day / next day / today\n",
        key(&kb.prev_day),
        key(&kb.next_day),
        key(&kb.today)
    ));
    text.push('\n');

    text.push_str("Tasks:\n");
    text.push_str(&format!("  {}: New task\n", key(&kb.new)));
    text.push_str(&format!("  {}: Edit selected task\n", key(&kb.edit)));
    text.push_str(&format!("  {}: Delete selected task\n", key(&kb.delete)));
    text.push_str(&format!(
        "  {}: Toggle completed\n",
        key(&kb.toggle_task_status)
    ));
    text.push_str(&format!(
        "  {} / {}: Add / remove {} minutes\n",
        key(&kb.add_time),
        key(&kb.remove_time),
        TIME_STEP_MINUTES
    ));
    text.push('\n');

    text.push_str("Diary:\n");
    text.push_str(&format!(
        "  {}: Focus strengths / weaknesses\n",
        key(&kb.switch_field)
    ));
    text.push_str(&format!("  {}: Edit focused text\n", key(&kb.edit)));
    text.push_str("  Mouse drag: Draw on a canvas\n");
    text.push_str(&format!(
        "  {} / {}: Pen / eraser\n",
        key(&kb.pen),
        key(&kb.eraser)
    ));
    text.push_str(&format!(
        "  {}: Clear focused canvas\n",
        key(&kb.clear_canvas)
    ));
    text.push('\n');

    text.push_str("Reflections:\n");
    text.push_str(&format!("  {}: Add row\n", key(&kb.new)));
    text.push_str(&format!("  {}: Switch column\n", key(&kb.switch_field)));
    text.push_str(&format!("  {}: Edit cell\n", key(&kb.edit)));
    text.push_str(&format!("  {}: Delete row\n", key(&kb.delete)));
    text.push('\n');

    text.push_str("Editing:\n");
    text.push_str(&format!("  {}: Save\n", key(&kb.save)));
    text.push_str("  Tab / Shift+Tab: Next / previous form field\n");
    text.push_str("  Left / Right on a choice: Cycle options\n");
    text.push_str("  Esc: Cancel\n");
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!(
        "  {}: Clear all data on this tab\n",
        key(&kb.clear_all)
    ));
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_help_reflects_configured_bindings() {
        let mut config = Config::default();
        config.key_bindings.pen = "b".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("b / x: Pen / eraser"));
        assert!(text.contains("Add / remove 15 minutes"));
    }
}
