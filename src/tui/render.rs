use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::stats::format_date;
use crate::tui::app::{Mode, Tab};
use crate::tui::widgets::{
    color::parse_color, confirm_clear::render_confirm_clear, diary_view::render_diary_view,
    help::render_help, reflection_table::render_reflection_table,
    stats_panel::render_stats_panel, status_bar::render_status_bar, tabs::render_tabs,
    task_form::render_task_form, task_list::render_task_list, text_popup::render_text_popup,
};
use crate::tui::{App, Layout};
use crate::utils::{self, format_key_binding_for_display as key};

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("Daybook")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(outer_block, f.area());

    render_tabs(f, layout.tabs_area, app.ui.current_tab, &app.config);
    render_header(f, app, layout);

    match app.ui.current_tab {
        Tab::Tasks => {
            if app.ui.mode == Mode::Create {
                if let Some(form) = app.task_form.as_mut() {
                    render_task_form(f, layout.main_area, form, &app.config);
                }
            } else {
                let tasks = app.tasks_for_day();
                render_task_list(
                    f,
                    layout.main_area,
                    &tasks,
                    &mut app.ui.list_state,
                    &app.config,
                );
            }
        }
        Tab::Stats => {
            let date = app.selected_date();
            let stats = app.workbook.tasks.stats_for(date);
            let breakdown = app.workbook.tasks.breakdown_for(date);
            render_stats_panel(f, layout.main_area, &stats, &breakdown, &app.config);
        }
        Tab::Diary => {
            let entry = app.workbook.diary.entry_for(app.selected_date());
            render_diary_view(
                f,
                &layout.diary(),
                entry,
                &app.board,
                app.ui.diary_focus,
                &app.config,
            );
        }
        Tab::Reflections => {
            render_reflection_table(
                f,
                layout.main_area,
                &app.workbook.reflections,
                app.ui.reflection_column,
                &mut app.ui.reflection_state,
                &app.config,
            );
        }
    }

    if app.ui.mode == Mode::EditText {
        if let Some(edit) = app.text_edit.as_mut() {
            render_text_popup(f, layout.main_area, edit, &app.config);
        }
    }

    if app.ui.mode == Mode::Help {
        render_help(f, f.area(), &app.config);
    }

    if let Some(target) = app.modals.clear_confirmation {
        render_confirm_clear(
            f,
            f.area(),
            target,
            app.modals.clear_modal_selection,
            &app.config,
        );
    }

    let key_hints = get_key_hints(app);
    render_status_bar(
        f,
        layout.status_area,
        app.status.message.as_ref(),
        &key_hints,
        &app.config,
    );
}

fn render_header(f: &mut Frame, app: &App, layout: &Layout) {
    let fg_color = parse_color(&app.config.get_active_theme().fg);
    let date = app.selected_date();
    let mut spans = vec![Span::styled(
        format_date(date),
        Style::default().fg(fg_color).add_modifier(Modifier::BOLD),
    )];
    if date == utils::today() {
        spans.push(Span::raw(" (today)"));
    }
    if app.ui.current_tab == Tab::Diary {
        spans.push(Span::raw(format!("   Tool: {}", app.board.mode().label())));
    }
    f.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(fg_color)),
        layout.header_area,
    );
}

pub fn get_key_hints(app: &App) -> Vec<String> {
    let kb = &app.config.key_bindings;

    if app.modals.clear_confirmation.is_some() {
        return vec![
            "↑/↓: Choose".to_string(),
            "Enter: Confirm".to_string(),
            "Esc: Cancel".to_string(),
        ];
    }

    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&kb.help))],
        Mode::Create => vec![
            "Tab: Next field".to_string(),
            "Shift+Tab: Previous field".to_string(),
            "←/→: Change choice".to_string(),
            format!("{}: Save", key(&kb.save)),
            "Esc: Cancel".to_string(),
        ],
        Mode::EditText => vec![
            format!("{}: Save", key(&kb.save)),
            "Enter: New line".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::View => {
            let mut hints = vec![format!("{}: Quit", key(&kb.quit))];
            match app.ui.current_tab {
                Tab::Tasks => {
                    hints.push(format!("{}: New", key(&kb.new)));
                    hints.push(format!("{}: Edit", key(&kb.edit)));
                    hints.push(format!("{}: Done", key(&kb.toggle_task_status)));
                    hints.push(format!(
                        "{}/{}: Time",
                        key(&kb.add_time),
                        key(&kb.remove_time)
                    ));
                    hints.push(format!("{}: Delete", key(&kb.delete)));
                }
                Tab::Stats => {}
                Tab::Diary => {
                    hints.push(format!("{}: Switch field", key(&kb.switch_field)));
                    hints.push(format!("{}: Edit text", key(&kb.edit)));
                    hints.push(format!("{}: Pen", key(&kb.pen)));
                    hints.push(format!("{}: Eraser", key(&kb.eraser)));
                    hints.push(format!("{}: Clear sketch", key(&kb.clear_canvas)));
                }
                Tab::Reflections => {
                    hints.push(format!("{}: Add row", key(&kb.new)));
                    hints.push(format!("{}: Edit", key(&kb.edit)));
                    hints.push(format!("{}: Switch column", key(&kb.switch_field)));
                    hints.push(format!("{}: Delete row", key(&kb.delete)));
                }
            }
            hints.push(format!(
                "{}/{}: Day",
                key(&kb.prev_day),
                key(&kb.next_day)
            ));
            hints.push(format!("{}: Clear all", key(&kb.clear_all)));
            hints.push(format!("{}: Help", key(&kb.help)));
            hints
        }
    }
}
