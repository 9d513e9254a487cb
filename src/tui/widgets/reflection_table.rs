use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};

use crate::Config;
use crate::records::{ReflectionField, ReflectionTable};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};

pub fn render_reflection_table(
    f: &mut Frame,
    area: Rect,
    reflections: &ReflectionTable,
    column: ReflectionField,
    state: &mut TableState,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(3)])
        .split(area);

    let dim = Style::default().fg(fg_color).add_modifier(Modifier::DIM);
    let cell = |text: &str| {
        if text.is_empty() {
            Cell::from("…").style(dim)
        } else {
            Cell::from(text.to_string())
        }
    };
    let table_rows: Vec<Row> = reflections
        .rows()
        .iter()
        .map(|row| {
            Row::new(vec![
                cell(&row.strength),
                cell(&row.weakness),
                Cell::from(row.date.format("%Y-%m-%d").to_string()).style(dim),
            ])
        })
        .collect();

    let header = Row::new(vec!["Strength", "Weakness", "Date"])
        .style(Style::default().fg(fg_color).add_modifier(Modifier::BOLD));

    state.select_column(Some(match column {
        ReflectionField::Strength => 0,
        ReflectionField::Weakness => 1,
    }));

    let table = Table::new(
        table_rows,
        [
            Constraint::Percentage(44),
            Constraint::Percentage(44),
            Constraint::Length(10),
        ],
    )
    .header(header)
    .style(Style::default().fg(fg_color))
    .row_highlight_style(Style::default().add_modifier(Modifier::BOLD))
    .cell_highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title("Strengths & Weaknesses"),
    );
    f.render_stateful_widget(table, parts[0], state);

    let stats = reflections.stats();
    let saved = match reflections.last_saved() {
        Some(time) => time.format("%Y-%m-%d %H:%M UTC").to_string(),
        None => "never".to_string(),
    };
    let footer = Line::from(format!(
        "{} strengths · {} weaknesses · {}/{} rows complete · last saved {}",
        stats.total_strengths,
        stats.total_weaknesses,
        stats.completed_entries,
        stats.total_entries,
        saved
    ));
    f.render_widget(
        Paragraph::new(footer)
            .style(Style::default().fg(fg_color))
            .block(Block::default().borders(Borders::ALL).title("Summary")),
        parts[1],
    );
}
