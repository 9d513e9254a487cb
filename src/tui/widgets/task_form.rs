use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::Config;
use crate::models::{TaskCategory, TaskPriority};
use crate::tui::app::{TaskForm, TaskFormField};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::editor::Editor;

pub fn render_task_form(f: &mut Frame, area: Rect, form: &mut TaskForm, config: &Config) {
    if area.width < 2 || area.height < 2 {
        return;
    }

    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = if active_theme.highlight_fg.is_empty() {
        get_contrast_text_color(highlight_bg)
    } else {
        parse_color(&active_theme.highlight_fg)
    };
    let highlight_style = Style::default().bg(highlight_bg).fg(highlight_fg);
    let inactive_field_style = Style::default()
        .fg(parse_color(&active_theme.fg))
        .add_modifier(Modifier::DIM);
    let current_field = form.current_field;
    let style_for = move |field: TaskFormField| {
        if current_field == field {
            highlight_style
        } else {
            inactive_field_style
        }
    };

    let field_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(4),    // Description
            Constraint::Length(3), // Time spent
            Constraint::Length(3), // Category
            Constraint::Length(3), // Priority
        ])
        .split(area);

    let heading = if form.editing_task_id.is_some() {
        "Edit Task"
    } else {
        "New Task"
    };

    let title_label = format!("{} - Title", heading);
    let title_block = field_block(&title_label, form.errors.title.as_deref());
    f.render_widget(
        Paragraph::new(form.title.text())
            .style(style_for(TaskFormField::Title))
            .block(title_block),
        field_areas[0],
    );

    let desc_area = field_areas[1];
    form.description
        .update_scroll(desc_area.height.saturating_sub(2) as usize);
    let desc_lines: Vec<Line> = form
        .description
        .get_visible_lines(desc_area.height.saturating_sub(2) as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(
        Paragraph::new(desc_lines)
            .style(style_for(TaskFormField::Description))
            .block(field_block("Description", None)),
        desc_area,
    );

    let time_block = field_block("Time Spent (minutes)", form.errors.time_spent.as_deref());
    f.render_widget(
        Paragraph::new(form.time_spent.text())
            .style(style_for(TaskFormField::TimeSpent))
            .block(time_block),
        field_areas[2],
    );

    let categories: Vec<&str> = TaskCategory::ALL.iter().map(|c| c.label()).collect();
    render_choice(
        f,
        field_areas[3],
        "Category",
        &categories,
        form.category.label(),
        style_for(TaskFormField::Category),
        highlight_style,
    );

    let priorities: Vec<&str> = TaskPriority::ALL.iter().map(|p| p.label()).collect();
    render_choice(
        f,
        field_areas[4],
        "Priority",
        &priorities,
        form.priority.label(),
        style_for(TaskFormField::Priority),
        highlight_style,
    );

    let cursor_area = match form.current_field {
        TaskFormField::Title => Some((&form.title, field_areas[0])),
        TaskFormField::Description => Some((&form.description, desc_area)),
        TaskFormField::TimeSpent => Some((&form.time_spent, field_areas[2])),
        TaskFormField::Category | TaskFormField::Priority => None,
    };
    if let Some((editor, field_area)) = cursor_area {
        place_cursor(f, editor, field_area);
    }
}

fn field_block<'a>(title: &'a str, error: Option<&'a str>) -> Block<'a> {
    let block = Block::default().borders(Borders::ALL).title(title);
    match error {
        Some(message) => block
            .border_style(Style::default().fg(Color::Red))
            .title_bottom(Span::styled(message, Style::default().fg(Color::Red))),
        None => block,
    }
}

fn render_choice(
    f: &mut Frame,
    area: Rect,
    title: &str,
    options: &[&str],
    selected: &str,
    style: Style,
    selected_style: Style,
) {
    let mut spans = Vec::new();
    for option in options {
        let span_style = if *option == selected {
            selected_style.add_modifier(Modifier::BOLD)
        } else {
            style
        };
        spans.push(Span::styled(format!(" {} ", option), span_style));
        spans.push(Span::raw(" "));
    }
    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: true });
    f.render_widget(paragraph, area);
}

pub(crate) fn place_cursor(f: &mut Frame, editor: &Editor, area: Rect) {
    if let Some((x, y)) = editor.get_cursor_screen_pos(area) {
        f.set_cursor_position((x, y));
    }
}
