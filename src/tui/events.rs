use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
    size as terminal_size,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use std::io;
use std::time::Duration;

use crate::canvas::ToolMode;
use crate::tui::App;
use crate::tui::app::{ClearTarget, Mode, PointerPhase, Tab, TIME_STEP_MINUTES, TaskFormField};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::tui::widgets::confirm_clear::OPTIONS;
use crate::tui::widgets::editor::Editor;
use crate::utils::{ParsedKeyBinding, has_primary_modifier, parse_key_binding};

/// Restores the terminal when dropped, even on panic
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, EnableMouseCapture)?;
        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore on normal exit; the guard does nothing on drop afterwards
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), DisableMouseCapture, LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before the alternate screen so the message stays readable
    let (width, height) = terminal_size()?;
    let min_width_with_border = Layout::MIN_WIDTH + 2;
    let min_height_with_border = Layout::MIN_HEIGHT + 2;
    if width < min_width_with_border || height < min_height_with_border {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width_with_border, min_height_with_border
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::info!("tui started");

    loop {
        app.check_status_message_timeout();

        let size = terminal.size()?;
        let layout = Layout::calculate(Rect::new(0, 0, size.width, size.height));
        app.sync_canvas_mounts(&layout);
        app.board.poll();

        terminal.draw(|f| crate::tui::render::render(f, &mut app, &layout))?;

        if event::poll(Duration::from_millis(16))? {
            match event::read()? {
                // Press only; Windows also reports releases
                Event::Key(key_event) if key_event.kind == KeyEventKind::Press => {
                    if handle_key_event(&mut app, key_event)? {
                        break;
                    }
                }
                Event::Mouse(mouse_event) => handle_mouse_event(&mut app, mouse_event),
                _ => {}
            }
        }
    }

    guard.restore()?;
    tracing::info!("tui stopped");
    Ok(())
}

/// Forward left-button mouse events to the diary canvases
pub fn handle_mouse_event(app: &mut App, mouse_event: MouseEvent) {
    if app.ui.mode != Mode::View || app.modals.clear_confirmation.is_some() {
        return;
    }
    let phase = match mouse_event.kind {
        MouseEventKind::Down(MouseButton::Left) => PointerPhase::Down,
        MouseEventKind::Drag(MouseButton::Left) => PointerPhase::Drag,
        MouseEventKind::Up(MouseButton::Left) => PointerPhase::Up,
        _ => return,
    };
    if app.handle_pointer(phase, mouse_event.column, mouse_event.row) {
        tracing::debug!(field = ?app.ui.diary_focus, "drawing stored");
    }
}

/// Handle one key press. Returns Ok(true) when the user asked to quit.
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if app.modals.clear_confirmation.is_some() {
        handle_confirm_clear_modal(app, key_event);
        return Ok(false);
    }

    match app.ui.mode {
        Mode::Help => {
            if key_event.code == KeyCode::Esc || pressed(key_event, &app.config.key_bindings.help)? {
                app.exit_help_mode();
            }
            Ok(false)
        }
        Mode::Create => {
            handle_create_mode(app, key_event)?;
            Ok(false)
        }
        Mode::EditText => {
            handle_text_edit_mode(app, key_event)?;
            Ok(false)
        }
        Mode::View => {
            if let Some(quit) = handle_global_key_bindings(app, key_event)? {
                return Ok(quit);
            }
            match app.ui.current_tab {
                Tab::Tasks => handle_tasks_keys(app, key_event)?,
                Tab::Stats => {}
                Tab::Diary => handle_diary_keys(app, key_event)?,
                Tab::Reflections => handle_reflection_keys(app, key_event)?,
            }
            Ok(false)
        }
    }
}

fn handle_confirm_clear_modal(app: &mut App, key_event: KeyEvent) {
    match key_event.code {
        KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
            app.modals.clear_modal_selection = (app.modals.clear_modal_selection + 1) % OPTIONS.len();
        }
        KeyCode::Enter => {
            if app.modals.clear_modal_selection == 0 {
                app.confirm_clear();
            } else {
                app.cancel_clear();
            }
        }
        KeyCode::Esc => app.cancel_clear(),
        _ => {}
    }
}

/// Bindings shared by every tab. Some(quit) when the key was consumed.
fn handle_global_key_bindings(app: &mut App, key_event: KeyEvent) -> Result<Option<bool>, TuiError> {
    let kb = app.config.key_bindings.clone();

    if pressed(key_event, &kb.quit)? {
        return Ok(Some(true));
    }
    if pressed(key_event, &kb.help)? {
        app.enter_help_mode();
    } else if pressed(key_event, &kb.tab_left)? {
        if let Some(tab) = app.ui.current_tab.prev() {
            app.switch_tab(tab);
        }
    } else if pressed(key_event, &kb.tab_right)? {
        if let Some(tab) = app.ui.current_tab.next() {
            app.switch_tab(tab);
        }
    } else if let KeyCode::Char(c @ '1'..='4') = key_event.code {
        let index = c as usize - '1' as usize;
        app.switch_tab(Tab::ALL[index]);
    } else if pressed(key_event, &kb.prev_day)? {
        app.prev_day();
    } else if pressed(key_event, &kb.next_day)? {
        app.next_day();
    } else if pressed(key_event, &kb.today)? {
        app.go_today();
    } else if pressed(key_event, &kb.list_up)? || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if pressed(key_event, &kb.list_down)? || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if pressed(key_event, &kb.clear_all)? {
        let target = match app.ui.current_tab {
            Tab::Tasks | Tab::Stats => ClearTarget::Tasks,
            Tab::Diary => ClearTarget::Diary,
            Tab::Reflections => ClearTarget::Reflections,
        };
        app.request_clear(target);
    } else {
        return Ok(None);
    }
    Ok(Some(false))
}

fn handle_tasks_keys(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if pressed(key_event, &kb.new)? {
        app.enter_create_mode();
    } else if pressed(key_event, &kb.edit)? || key_event.code == KeyCode::Enter {
        app.enter_edit_task_mode();
    } else if pressed(key_event, &kb.delete)? {
        app.delete_selected_task();
    } else if pressed(key_event, &kb.toggle_task_status)? {
        app.toggle_selected_task();
    } else if pressed(key_event, &kb.add_time)? {
        app.adjust_selected_time(TIME_STEP_MINUTES);
    } else if pressed(key_event, &kb.remove_time)? {
        app.adjust_selected_time(-TIME_STEP_MINUTES);
    }
    Ok(())
}

fn handle_diary_keys(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if pressed(key_event, &kb.switch_field)? {
        app.switch_diary_focus();
    } else if pressed(key_event, &kb.edit)? || key_event.code == KeyCode::Enter {
        app.enter_text_edit();
    } else if pressed(key_event, &kb.pen)? {
        app.set_tool(ToolMode::Pen);
    } else if pressed(key_event, &kb.eraser)? {
        app.set_tool(ToolMode::Eraser);
    } else if pressed(key_event, &kb.clear_canvas)? {
        app.clear_focused_canvas();
    }
    Ok(())
}

fn handle_reflection_keys(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    let kb = app.config.key_bindings.clone();
    if pressed(key_event, &kb.new)? {
        app.add_reflection_row();
    } else if pressed(key_event, &kb.edit)? || key_event.code == KeyCode::Enter {
        app.enter_text_edit();
    } else if pressed(key_event, &kb.switch_field)? {
        app.switch_reflection_column();
    } else if pressed(key_event, &kb.delete)? {
        app.delete_selected_reflection();
    } else if pressed(key_event, &kb.save)? {
        app.save_reflections();
    }
    Ok(())
}

fn handle_create_mode(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    if pressed(key_event, &app.config.key_bindings.save)? {
        app.save_task_form();
        return Ok(());
    }
    if key_event.code == KeyCode::Esc || app.task_form.is_none() {
        app.exit_create_mode();
        return Ok(());
    }
    let Some(form) = app.task_form.as_mut() else {
        return Ok(());
    };

    match key_event.code {
        KeyCode::Tab => {
            form.current_field = form.current_field.next();
            return Ok(());
        }
        KeyCode::BackTab => {
            form.current_field = form.current_field.prev();
            return Ok(());
        }
        _ => {}
    }

    match form.current_field {
        TaskFormField::Category | TaskFormField::Priority => match key_event.code {
            KeyCode::Left => form.cycle_choice(false),
            KeyCode::Right | KeyCode::Char(' ') => form.cycle_choice(true),
            KeyCode::Enter => form.current_field = form.current_field.next(),
            _ => {}
        },
        TaskFormField::Description => {
            if let Some(editor) = form.current_editor() {
                edit_text(editor, key_event, true);
            }
        }
        TaskFormField::Title => {
            if key_event.code == KeyCode::Enter {
                form.current_field = form.current_field.next();
            } else if let Some(editor) = form.current_editor() {
                edit_text(editor, key_event, false);
            }
        }
        TaskFormField::TimeSpent => match key_event.code {
            KeyCode::Enter => form.current_field = form.current_field.next(),
            KeyCode::Char(c) if !(c.is_ascii_digit() || c == '-') => {}
            _ => {
                if let Some(editor) = form.current_editor() {
                    edit_text(editor, key_event, false);
                }
            }
        },
    }
    Ok(())
}

fn handle_text_edit_mode(app: &mut App, key_event: KeyEvent) -> Result<(), TuiError> {
    if pressed(key_event, &app.config.key_bindings.save)? {
        app.save_text_edit();
        return Ok(());
    }
    if key_event.code == KeyCode::Esc {
        app.cancel_text_edit();
        return Ok(());
    }
    if let Some(edit) = app.text_edit.as_mut() {
        edit_text(&mut edit.editor, key_event, true);
    }
    Ok(())
}

/// Apply a plain editing key to `editor`
fn edit_text(editor: &mut Editor, key_event: KeyEvent, multi_line: bool) {
    if has_primary_modifier(key_event.modifiers) {
        return;
    }
    match key_event.code {
        KeyCode::Char(c) => editor.insert_char(c),
        KeyCode::Enter if multi_line => editor.insert_newline(),
        KeyCode::Backspace => editor.delete_char(),
        KeyCode::Delete => editor.delete_forward(),
        KeyCode::Left => editor.move_cursor_left(),
        KeyCode::Right => editor.move_cursor_right(),
        KeyCode::Up => editor.move_cursor_up(),
        KeyCode::Down => editor.move_cursor_down(),
        KeyCode::Home => editor.move_cursor_home(),
        KeyCode::End => editor.move_cursor_end(),
        _ => {}
    }
}

fn pressed(key_event: KeyEvent, binding: &str) -> Result<bool, TuiError> {
    let parsed = parse_key_binding(binding).map_err(TuiError::KeyBindingError)?;
    Ok(matches_key_event(key_event, &parsed))
}

fn matches_key_event(key_event: KeyEvent, binding: &ParsedKeyBinding) -> bool {
    // Primary modifier is Ctrl, or Option on macOS
    if binding.requires_ctrl != has_primary_modifier(key_event.modifiers) {
        return false;
    }
    binding.key_code == key_event.code
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Config;
    use crate::database::{Database, Storage};
    use crate::models::{DiaryField, NewTask};
    use crate::records::Workbook;
    use crossterm::event::KeyModifiers;
    use std::rc::Rc;

    fn app() -> App {
        let storage: Rc<dyn Storage> = Rc::new(Database::in_memory().unwrap());
        App::new(Config::default(), Workbook::open(storage))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            handle_key_event(app, key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn test_quit_only_from_view_mode() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('n'))).unwrap();
        assert_eq!(app.ui.mode, Mode::Create);
        // Typing q into a form is text, not quit
        assert!(!handle_key_event(&mut app, key(KeyCode::Char('q'))).unwrap());
        handle_key_event(&mut app, key(KeyCode::Esc)).unwrap();
        assert!(handle_key_event(&mut app, key(KeyCode::Char('q'))).unwrap());
    }

    #[test]
    fn test_create_task_with_keyboard() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('n'))).unwrap();
        type_text(&mut app, "Standup");
        handle_key_event(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key_event(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key_event(&mut app, key(KeyCode::Backspace)).unwrap();
        type_text(&mut app, "1x5");
        handle_key_event(&mut app, key(KeyCode::Tab)).unwrap();
        handle_key_event(&mut app, key(KeyCode::Right)).unwrap();
        handle_key_event(&mut app, key(KeyCode::Right)).unwrap();
        handle_key_event(&mut app, ctrl('s')).unwrap();

        assert_eq!(app.ui.mode, Mode::View);
        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "Standup");
        assert_eq!(task.time_spent, 15);
        assert_eq!(task.category.label(), "Meetings");
    }

    #[test]
    fn test_task_shortcuts() {
        let mut app = app();
        let date = app.selected_date();
        app.workbook.tasks.add(NewTask::new("inbox"), date).unwrap();
        app.sync_list_state();

        handle_key_event(&mut app, key(KeyCode::Char(' '))).unwrap();
        assert!(app.selected_task().unwrap().completed);
        handle_key_event(&mut app, key(KeyCode::Char('+'))).unwrap();
        assert_eq!(app.selected_task().unwrap().time_spent, TIME_STEP_MINUTES as u32);
        handle_key_event(&mut app, key(KeyCode::Char('d'))).unwrap();
        assert!(app.tasks_for_day().is_empty());
    }

    #[test]
    fn test_tab_navigation_and_digits() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Left)).unwrap();
        assert_eq!(app.ui.current_tab, Tab::Tasks);
        handle_key_event(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(app.ui.current_tab, Tab::Stats);
        handle_key_event(&mut app, key(KeyCode::Char('4'))).unwrap();
        assert_eq!(app.ui.current_tab, Tab::Reflections);
        handle_key_event(&mut app, key(KeyCode::Right)).unwrap();
        assert_eq!(app.ui.current_tab, Tab::Reflections);
    }

    #[test]
    fn test_day_keys_move_selected_date() {
        let mut app = app();
        let today = app.selected_date();
        handle_key_event(&mut app, key(KeyCode::Char('['))).unwrap();
        assert_eq!(app.selected_date(), today.pred_opt().unwrap());
        handle_key_event(&mut app, key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.selected_date(), today);
    }

    #[test]
    fn test_clear_all_modal_defaults_to_cancel() {
        let mut app = app();
        let date = app.selected_date();
        app.workbook.tasks.add(NewTask::new("keep"), date).unwrap();

        handle_key_event(&mut app, key(KeyCode::Char('C'))).unwrap();
        assert_eq!(app.modals.clear_confirmation, Some(ClearTarget::Tasks));
        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();
        assert_eq!(app.workbook.tasks.all().len(), 1);

        handle_key_event(&mut app, key(KeyCode::Char('C'))).unwrap();
        handle_key_event(&mut app, key(KeyCode::Up)).unwrap();
        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();
        assert!(app.workbook.tasks.all().is_empty());
    }

    #[test]
    fn test_diary_tool_and_text_keys() {
        let mut app = app();
        handle_key_event(&mut app, key(KeyCode::Char('3'))).unwrap();
        handle_key_event(&mut app, key(KeyCode::Char('x'))).unwrap();
        assert_eq!(app.board.mode(), ToolMode::Eraser);
        handle_key_event(&mut app, key(KeyCode::Char('p'))).unwrap();
        assert_eq!(app.board.mode(), ToolMode::Pen);

        handle_key_event(&mut app, key(KeyCode::Tab)).unwrap();
        assert_eq!(app.ui.diary_focus, DiaryField::Weaknesses);
        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "late");
        handle_key_event(&mut app, key(KeyCode::Enter)).unwrap();
        type_text(&mut app, "again");
        handle_key_event(&mut app, ctrl('s')).unwrap();
        let entry = app.workbook.diary.entry_for(app.selected_date()).unwrap();
        assert_eq!(entry.weaknesses_text, "late\nagain");
    }

    #[test]
    fn test_mouse_ignored_outside_view_mode() {
        let mut app = app();
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40));
        app.switch_tab(Tab::Diary);
        app.sync_canvas_mounts(&layout);
        app.enter_help_mode();
        let area = layout.diary().canvas_inner(DiaryField::Strengths);
        handle_mouse_event(
            &mut app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column: area.x + 1,
                row: area.y + 1,
                modifiers: KeyModifiers::NONE,
            },
        );
        assert!(app.board.active_field().is_none());
    }
}
