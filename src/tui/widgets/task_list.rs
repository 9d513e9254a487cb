use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, List, ListItem, ListState, Paragraph, Scrollbar, ScrollbarOrientation,
    ScrollbarState, Wrap,
};

use crate::Config;
use crate::models::Task;
use crate::stats::format_time;
use crate::tui::widgets::color::{category_color, get_contrast_text_color, parse_color};

/// One list row: status marker, title, time spent and category.
/// Never wider than `max_width`; the title gives way first.
pub fn task_line(task: &Task, max_width: usize) -> String {
    let status_indicator = if task.completed { "✓" } else { "○" };
    let suffix = format!(
        " {} · {}",
        format_time(u64::from(task.time_spent)),
        task.category.short_label()
    );
    let mut line = format!("{} {}", status_indicator, task.title);
    let room = max_width.saturating_sub(suffix.chars().count());
    if line.chars().count() > room {
        line = line.chars().take(room.saturating_sub(3)).collect::<String>() + "...";
    }
    (line + &suffix).chars().take(max_width).collect()
}

pub fn render_task_list(
    f: &mut Frame,
    area: Rect,
    tasks: &[Task],
    list_state: &mut ListState,
    config: &Config,
) {
    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(area);
    let (list_area, details_area) = (panes[0], panes[1]);

    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };

    let max_width = list_area.width.saturating_sub(4) as usize;
    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let style = if task.completed {
                Style::default().fg(fg_color).add_modifier(Modifier::CROSSED_OUT | Modifier::DIM)
            } else {
                Style::default().fg(fg_color)
            };
            ListItem::new(task_line(task, max_width)).style(style)
        })
        .collect();

    let completed = tasks.iter().filter(|t| t.completed).count();
    let title = format!("Tasks ({}/{} done)", completed, tasks.len());

    if items.is_empty() {
        let empty = Paragraph::new("No tasks logged for this day. Press n to add one.")
            .style(Style::default().fg(fg_color).add_modifier(Modifier::DIM))
            .block(Block::default().borders(Borders::ALL).title(title))
            .wrap(Wrap { trim: true });
        f.render_widget(empty, list_area);
    } else {
        let total_items = items.len();
        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(title))
            .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));
        f.render_stateful_widget(list, list_area, list_state);

        let visible_items = list_area.height.saturating_sub(2) as usize;
        if total_items > visible_items && list_area.height > 2 {
            let mut scrollbar_state = ScrollbarState::new(total_items)
                .viewport_content_length(visible_items)
                .position(list_state.selected().unwrap_or(0));
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");
            f.render_stateful_widget(scrollbar, list_area, &mut scrollbar_state);
        }
    }

    let selected = list_state.selected().and_then(|i| tasks.get(i));
    render_task_details(f, details_area, selected, config);
}

fn render_task_details(f: &mut Frame, area: Rect, task: Option<&Task>, config: &Config) {
    let fg_color = parse_color(&config.get_active_theme().fg);
    let label = Style::default().fg(fg_color).add_modifier(Modifier::BOLD);

    let lines = match task {
        Some(task) => {
            let mut lines = vec![
                Line::from(Span::styled(task.title.clone(), label)),
                Line::from(""),
                Line::from(vec![
                    Span::styled("Status:   ", label),
                    Span::raw(if task.completed { "Completed" } else { "Open" }),
                ]),
                Line::from(vec![
                    Span::styled("Time:     ", label),
                    Span::raw(format_time(u64::from(task.time_spent))),
                ]),
                Line::from(vec![
                    Span::styled("Category: ", label),
                    Span::styled(
                        task.category.label(),
                        Style::default().fg(category_color(task.category)),
                    ),
                ]),
                Line::from(vec![
                    Span::styled("Priority: ", label),
                    Span::raw(task.priority.label()),
                ]),
                Line::from(vec![
                    Span::styled("Created:  ", label),
                    Span::raw(task.created_at.format("%Y-%m-%d %H:%M UTC").to_string()),
                ]),
            ];
            if !task.description.is_empty() {
                lines.push(Line::from(""));
                lines.extend(task.description.lines().map(|l| Line::from(l.to_string())));
            }
            lines
        }
        None => vec![Line::from("Select a task to view details")],
    };

    let paragraph = Paragraph::new(lines)
        .style(Style::default().fg(fg_color))
        .block(Block::default().borders(Borders::ALL).title("Details"))
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
