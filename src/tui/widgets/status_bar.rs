use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;

use crate::Config;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

const SEPARATOR: &str = " • ";
const ELLIPSIS: &str = "...";

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<&String>,
    key_hints: &[String],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let max_width = area.width as usize;

    let (content, style) = match message {
        Some(msg) => {
            let msg_fg = get_contrast_text_color(highlight_bg);
            (
                truncate(msg, max_width),
                Style::default()
                    .fg(msg_fg)
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD),
            )
        }
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(fg_color).bg(bg_color),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let keep = max_width.saturating_sub(ELLIPSIS.len());
    text.chars().take(keep).collect::<String>() + ELLIPSIS
}

/// Join as many hints as fit in `max_width`, ending with an ellipsis when some are dropped
pub fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    let mut hints_text = String::new();
    for (i, hint) in key_hints.iter().enumerate() {
        let current_len = hints_text.chars().count();
        let would_be_len = if i == 0 {
            hint.chars().count()
        } else {
            current_len + SEPARATOR.chars().count() + hint.chars().count()
        };

        if would_be_len > max_width {
            if i == 0 {
                return truncate(hint, max_width);
            }
            if current_len + ELLIPSIS.len() > max_width {
                let keep = max_width.saturating_sub(ELLIPSIS.len());
                hints_text = hints_text.chars().take(keep).collect();
            }
            hints_text.push_str(ELLIPSIS);
            break;
        }

        if i > 0 {
            hints_text.push_str(SEPARATOR);
        }
        hints_text.push_str(hint);
    }
    hints_text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_all_hints_fit() {
        let text = fit_hints(&hints(&["q: Quit", "F1: Help"]), 40);
        assert_eq!(text, "q: Quit • F1: Help");
    }

    #[test]
    fn test_overflowing_hints_are_elided() {
        let three = hints(&["q: Quit", "F1: Help", "n: New task"]);
        assert_eq!(fit_hints(&three, 21), "q: Quit • F1: Help...");
        assert_eq!(fit_hints(&three, 20), "q: Quit • F1: Hel...");

        let text = fit_hints(&hints(&["a very long first hint"]), 10);
        assert_eq!(text, "a very ...");
    }
}
