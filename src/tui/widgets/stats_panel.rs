use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, Paragraph};

use crate::Config;
use crate::stats::{CategoryBreakdown, DailyStats, format_time};
use crate::tui::widgets::color::{category_color, parse_color};

const BAR_WIDTH: usize = 24;

pub fn render_stats_panel(
    f: &mut Frame,
    area: Rect,
    stats: &DailyStats,
    breakdown: &[CategoryBreakdown],
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let label = Style::default().fg(fg_color).add_modifier(Modifier::BOLD);

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Summary
            Constraint::Length(3), // Completion gauge
            Constraint::Min(3),    // Category breakdown
        ])
        .split(area);

    let summary = vec![
        Line::from(vec![
            Span::styled("Tasks logged:      ", label),
            Span::raw(stats.total_tasks.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Completed:         ", label),
            Span::raw(stats.completed_tasks.to_string()),
        ]),
        Line::from(vec![
            Span::styled("Time spent:        ", label),
            Span::raw(format_time(stats.total_time)),
        ]),
        Line::from(vec![
            Span::styled("Most productive:   ", label),
            Span::styled(
                stats.most_productive_category.label(),
                Style::default().fg(category_color(stats.most_productive_category)),
            ),
        ]),
    ];
    f.render_widget(
        Paragraph::new(summary)
            .style(Style::default().fg(fg_color))
            .block(Block::default().borders(Borders::ALL).title("Daily Stats")),
        rows[0],
    );

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title("Completion Rate"))
        .gauge_style(Style::default().fg(highlight_bg))
        .percent(stats.completion_rate.min(100) as u16)
        .label(format!("{}%", stats.completion_rate));
    f.render_widget(gauge, rows[1]);

    let lines: Vec<Line> = if breakdown.is_empty() {
        vec![Line::from(Span::styled(
            "Nothing logged yet",
            Style::default().fg(fg_color).add_modifier(Modifier::DIM),
        ))]
    } else {
        let max_time = breakdown.iter().map(|b| b.time).max().unwrap_or(0);
        breakdown
            .iter()
            .map(|row| {
                Line::from(vec![
                    Span::styled(format!("{:<10}", row.category.label()), label),
                    Span::styled(
                        bar(row.time, max_time),
                        Style::default().fg(category_color(row.category)),
                    ),
                    Span::raw(format!(
                        " {} · {}/{} done",
                        format_time(row.time),
                        row.completed,
                        row.count
                    )),
                ])
            })
            .collect()
    };
    f.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(fg_color))
            .block(Block::default().borders(Borders::ALL).title("By Category")),
        rows[2],
    );
}

/// Fixed-width bar proportional to `value / max`
pub fn bar(value: u64, max: u64) -> String {
    let filled = if max == 0 {
        0
    } else {
        ((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize
    };
    let filled = filled.min(BAR_WIDTH);
    "█".repeat(filled) + &"░".repeat(BAR_WIDTH - filled)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_scales_to_largest_category() {
        assert_eq!(bar(60, 60).chars().filter(|c| *c == '█').count(), BAR_WIDTH);
        assert_eq!(bar(30, 60).chars().filter(|c| *c == '█').count(), BAR_WIDTH / 2);
        assert_eq!(bar(0, 0).chars().count(), BAR_WIDTH);
    }
}
