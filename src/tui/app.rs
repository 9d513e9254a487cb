use chrono::{Days, NaiveDate};
use ratatui::layout::{Position, Rect};
use ratatui::widgets::{ListState, TableState};
use std::time::Instant;

use crate::canvas::{DiaryBoard, Point, PointerInput, ToolMode};
use crate::models::{
    DiaryField, NewTask, Task, TaskCategory, TaskPriority, ValidationErrors,
};
use crate::records::{ReflectionField, TaskUpdate, Workbook};
use crate::tui::layout::Layout;
use crate::tui::widgets::editor::Editor;
use crate::{Config, utils};

/// Minutes added or removed by the quick time keys
pub const TIME_STEP_MINUTES: i64 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Tasks,
    Stats,
    Diary,
    Reflections,
}

impl Tab {
    pub const ALL: [Tab; 4] = [Tab::Tasks, Tab::Stats, Tab::Diary, Tab::Reflections];

    pub fn title(self) -> &'static str {
        match self {
            Tab::Tasks => "Tasks",
            Tab::Stats => "Stats",
            Tab::Diary => "Diary",
            Tab::Reflections => "Reflections",
        }
    }

    pub fn index(self) -> usize {
        match self {
            Tab::Tasks => 0,
            Tab::Stats => 1,
            Tab::Diary => 2,
            Tab::Reflections => 3,
        }
    }

    pub fn next(self) -> Option<Tab> {
        Tab::ALL.get(self.index() + 1).copied()
    }

    pub fn prev(self) -> Option<Tab> {
        self.index().checked_sub(1).map(|i| Tab::ALL[i])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    View,
    Help,
    Create,
    EditText,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearTarget {
    Tasks,
    Diary,
    Reflections,
}

impl ClearTarget {
    pub fn description(self) -> &'static str {
        match self {
            ClearTarget::Tasks => "every logged task",
            ClearTarget::Diary => "every diary entry and drawing",
            ClearTarget::Reflections => "the whole strengths/weaknesses table",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskFormField {
    Title,
    Description,
    TimeSpent,
    Category,
    Priority,
}

impl TaskFormField {
    const ORDER: [TaskFormField; 5] = [
        TaskFormField::Title,
        TaskFormField::Description,
        TaskFormField::TimeSpent,
        TaskFormField::Category,
        TaskFormField::Priority,
    ];

    fn position(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.position() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Self {
        Self::ORDER[(self.position() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

#[derive(Debug, Clone)]
pub struct TaskForm {
    pub current_field: TaskFormField,
    pub title: Editor,
    pub description: Editor,
    pub time_spent: Editor,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub errors: ValidationErrors,
    pub editing_task_id: Option<String>, // None for new tasks
}

impl TaskForm {
    pub fn new() -> Self {
        let defaults = NewTask::default();
        Self {
            current_field: TaskFormField::Title,
            title: Editor::new(),
            description: Editor::new(),
            time_spent: Editor::from_string(&defaults.time_spent.to_string()),
            category: defaults.category,
            priority: defaults.priority,
            errors: ValidationErrors::default(),
            editing_task_id: None,
        }
    }

    pub fn from_task(task: &Task) -> Self {
        Self {
            current_field: TaskFormField::Title,
            title: Editor::from_string(&task.title),
            description: Editor::from_string(&task.description),
            time_spent: Editor::from_string(&task.time_spent.to_string()),
            category: task.category,
            priority: task.priority,
            errors: ValidationErrors::default(),
            editing_task_id: Some(task.id.clone()),
        }
    }

    /// Editor behind the focused field; choice fields have none
    pub fn current_editor(&mut self) -> Option<&mut Editor> {
        match self.current_field {
            TaskFormField::Title => Some(&mut self.title),
            TaskFormField::Description => Some(&mut self.description),
            TaskFormField::TimeSpent => Some(&mut self.time_spent),
            TaskFormField::Category | TaskFormField::Priority => None,
        }
    }

    /// Step the focused choice field through its options
    pub fn cycle_choice(&mut self, forward: bool) {
        fn step<T: Copy + PartialEq>(all: &[T], current: T, forward: bool) -> T {
            let i = all.iter().position(|v| *v == current).unwrap_or(0);
            let n = all.len();
            all[if forward { (i + 1) % n } else { (i + n - 1) % n }]
        }
        match self.current_field {
            TaskFormField::Category => {
                self.category = step(&TaskCategory::ALL, self.category, forward)
            }
            TaskFormField::Priority => {
                self.priority = step(&TaskPriority::ALL, self.priority, forward)
            }
            _ => {}
        }
    }

    /// Build the form payload; errors are stored on the form as well
    pub fn to_new_task(&mut self) -> Result<NewTask, ValidationErrors> {
        let raw_time = self.time_spent.text();
        let raw_time = raw_time.trim();
        let parsed_time = if raw_time.is_empty() {
            Ok(0)
        } else {
            raw_time.parse::<i64>()
        };

        let form = NewTask {
            title: self.title.text().trim().to_string(),
            description: self.description.text().trim().to_string(),
            time_spent: *parsed_time.as_ref().unwrap_or(&0),
            category: self.category,
            priority: self.priority,
        };

        let mut errors = form.validate().err().unwrap_or_default();
        if parsed_time.is_err() {
            errors.time_spent = Some("Time spent must be a whole number of minutes".to_string());
        }
        self.errors = errors.clone();
        if errors.is_empty() { Ok(form) } else { Err(errors) }
    }
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TextTarget {
    Diary(DiaryField),
    Reflection { id: String, field: ReflectionField },
}

#[derive(Debug, Clone)]
pub struct TextEdit {
    pub target: TextTarget,
    pub editor: Editor,
}

impl TextEdit {
    pub fn title(&self) -> String {
        match &self.target {
            TextTarget::Diary(field) => field.title().to_string(),
            TextTarget::Reflection { field: ReflectionField::Strength, .. } => {
                "Strength".to_string()
            }
            TextTarget::Reflection { field: ReflectionField::Weakness, .. } => {
                "Weakness".to_string()
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    Down,
    Drag,
    Up,
}

#[derive(Debug, Clone)]
pub struct UiState {
    pub current_tab: Tab,
    pub mode: Mode,
    pub selected_index: usize,
    pub list_state: ListState,
    pub diary_focus: DiaryField,
    pub reflection_index: usize,
    pub reflection_column: ReflectionField,
    pub reflection_state: TableState,
    /// On-screen drawable cells of each mounted canvas
    pub canvas_areas: Vec<(DiaryField, Rect)>,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            current_tab: Tab::Tasks,
            mode: Mode::View,
            selected_index: 0,
            list_state: ListState::default(),
            diary_focus: DiaryField::Strengths,
            reflection_index: 0,
            reflection_column: ReflectionField::Strength,
            reflection_state: TableState::default(),
            canvas_areas: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ModalState {
    pub clear_confirmation: Option<ClearTarget>,
    pub clear_modal_selection: usize, // 0 = Clear, 1 = Cancel
}

#[derive(Debug, Clone, Default)]
pub struct StatusState {
    pub message: Option<String>,
    pub message_time: Option<Instant>,
}

pub struct App {
    pub config: Config,
    pub workbook: Workbook,
    pub board: DiaryBoard,

    pub ui: UiState,
    pub modals: ModalState,
    pub status: StatusState,
    pub task_form: Option<TaskForm>,
    pub text_edit: Option<TextEdit>,
}

impl App {
    pub fn new(config: Config, workbook: Workbook) -> Self {
        let board = DiaryBoard::new(utils::today(), config.canvas.clone());
        let mut app = Self {
            config,
            workbook,
            board,
            ui: UiState::default(),
            modals: ModalState::default(),
            status: StatusState::default(),
            task_form: None,
            text_edit: None,
        };
        app.sync_list_state();
        app
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.board.date()
    }

    pub fn tasks_for_day(&self) -> Vec<Task> {
        self.workbook.tasks.for_date(self.selected_date())
    }

    pub fn selected_task(&self) -> Option<Task> {
        self.tasks_for_day().into_iter().nth(self.ui.selected_index)
    }

    pub fn sync_list_state(&mut self) {
        let task_count = self.tasks_for_day().len();
        if self.ui.selected_index >= task_count {
            self.ui.selected_index = task_count.saturating_sub(1);
        }
        self.ui
            .list_state
            .select(if task_count == 0 { None } else { Some(self.ui.selected_index) });

        let row_count = self.workbook.reflections.rows().len();
        if self.ui.reflection_index >= row_count {
            self.ui.reflection_index = row_count.saturating_sub(1);
        }
        self.ui.reflection_state.select(Some(self.ui.reflection_index));
    }

    pub fn move_selection_up(&mut self) {
        match self.ui.current_tab {
            Tab::Tasks => self.ui.selected_index = self.ui.selected_index.saturating_sub(1),
            Tab::Reflections => {
                self.ui.reflection_index = self.ui.reflection_index.saturating_sub(1)
            }
            _ => {}
        }
        self.sync_list_state();
    }

    pub fn move_selection_down(&mut self) {
        match self.ui.current_tab {
            Tab::Tasks => self.ui.selected_index += 1,
            Tab::Reflections => self.ui.reflection_index += 1,
            _ => {}
        }
        self.sync_list_state();
    }

    pub fn switch_tab(&mut self, new_tab: Tab) {
        self.ui.current_tab = new_tab;
        self.sync_list_state();
    }

    /// Show another day; mounted canvases reload that day's drawings
    pub fn set_date(&mut self, date: NaiveDate) {
        // Commit a stroke in progress to the day it was drawn on
        if let Some(field) = self.board.active_field() {
            self.board.pointer_leave(field, &mut self.workbook.diary);
        }
        self.board.select_date(date, &self.workbook.diary);
        self.ui.selected_index = 0;
        self.sync_list_state();
    }

    pub fn prev_day(&mut self) {
        if let Some(date) = self.selected_date().checked_sub_days(Days::new(1)) {
            self.set_date(date);
        }
    }

    pub fn next_day(&mut self) {
        if let Some(date) = self.selected_date().checked_add_days(Days::new(1)) {
            self.set_date(date);
        }
    }

    pub fn go_today(&mut self) {
        self.set_date(utils::today());
    }

    pub fn toggle_selected_task(&mut self) {
        if let Some(task) = self.selected_task() {
            self.workbook.tasks.toggle_completion(&task.id);
        }
    }

    /// Add `delta` minutes to the selected task, never going below zero
    pub fn adjust_selected_time(&mut self, delta: i64) {
        if let Some(task) = self.selected_task() {
            let minutes = (i64::from(task.time_spent) + delta).clamp(0, i64::from(u32::MAX));
            self.workbook.tasks.update_time(&task.id, minutes as u32);
        }
    }

    pub fn delete_selected_task(&mut self) {
        if let Some(task) = self.selected_task() {
            self.workbook.tasks.delete(&task.id);
            self.sync_list_state();
            self.set_status_message(format!("Deleted \"{}\"", task.title));
        }
    }

    pub fn enter_create_mode(&mut self) {
        self.task_form = Some(TaskForm::new());
        self.ui.mode = Mode::Create;
    }

    pub fn enter_edit_task_mode(&mut self) {
        match self.selected_task() {
            Some(task) => {
                self.task_form = Some(TaskForm::from_task(&task));
                self.ui.mode = Mode::Create;
            }
            None => self.set_status_message("No task selected".to_string()),
        }
    }

    pub fn exit_create_mode(&mut self) {
        self.task_form = None;
        self.ui.mode = Mode::View;
    }

    /// Validate and store the form. Invalid input keeps the form open.
    pub fn save_task_form(&mut self) {
        let Some(form) = self.task_form.as_mut() else {
            return;
        };
        let new_task = match form.to_new_task() {
            Ok(new_task) => new_task,
            Err(errors) => {
                self.set_status_message(format!("Validation error: {}", errors));
                return;
            }
        };

        match form.editing_task_id.clone() {
            Some(id) => {
                let tasks = &mut self.workbook.tasks;
                let updates = [
                    TaskUpdate::Title(new_task.title),
                    TaskUpdate::Description(new_task.description),
                    TaskUpdate::TimeSpent(u32::try_from(new_task.time_spent).unwrap_or(u32::MAX)),
                    TaskUpdate::Category(new_task.category),
                    TaskUpdate::Priority(new_task.priority),
                ];
                let mut found = true;
                for update in updates {
                    found &= tasks.apply(&id, update);
                }
                self.exit_create_mode();
                self.set_status_message(
                    if found { "Task updated" } else { "Task not found" }.to_string(),
                );
            }
            None => {
                let date = self.selected_date();
                if let Err(errors) = self.workbook.tasks.add(new_task, date) {
                    self.set_status_message(format!("Validation error: {}", errors));
                    return;
                }
                self.exit_create_mode();
                let count = self.tasks_for_day().len();
                self.ui.selected_index = count.saturating_sub(1);
                self.set_status_message("Task created".to_string());
            }
        }
        self.sync_list_state();
    }

    /// Open the text editor for the focused diary field or reflection cell
    pub fn enter_text_edit(&mut self) {
        let edit = match self.ui.current_tab {
            Tab::Diary => {
                let field = self.ui.diary_focus;
                let text = self
                    .workbook
                    .diary
                    .entry_for(self.selected_date())
                    .map(|e| e.text(field).to_string())
                    .unwrap_or_default();
                TextEdit {
                    target: TextTarget::Diary(field),
                    editor: Editor::from_string(&text),
                }
            }
            Tab::Reflections => {
                let Some(row) = self.workbook.reflections.rows().get(self.ui.reflection_index)
                else {
                    return;
                };
                let field = self.ui.reflection_column;
                let text = match field {
                    ReflectionField::Strength => &row.strength,
                    ReflectionField::Weakness => &row.weakness,
                };
                TextEdit {
                    target: TextTarget::Reflection {
                        id: row.id.clone(),
                        field,
                    },
                    editor: Editor::from_string(text),
                }
            }
            _ => return,
        };
        self.text_edit = Some(edit);
        self.ui.mode = Mode::EditText;
    }

    pub fn save_text_edit(&mut self) {
        let Some(edit) = self.text_edit.take() else {
            return;
        };
        let text = edit.editor.text();
        match edit.target {
            TextTarget::Diary(field) => {
                let date = self.selected_date();
                self.workbook.diary.set_text(date, field, text);
            }
            TextTarget::Reflection { id, field } => {
                self.workbook.reflections.update(&id, field, text);
            }
        }
        self.ui.mode = Mode::View;
        self.set_status_message("Saved".to_string());
    }

    pub fn cancel_text_edit(&mut self) {
        self.text_edit = None;
        self.ui.mode = Mode::View;
    }

    pub fn switch_diary_focus(&mut self) {
        self.ui.diary_focus = self.ui.diary_focus.other();
    }

    pub fn switch_reflection_column(&mut self) {
        self.ui.reflection_column = match self.ui.reflection_column {
            ReflectionField::Strength => ReflectionField::Weakness,
            ReflectionField::Weakness => ReflectionField::Strength,
        };
    }

    pub fn add_reflection_row(&mut self) {
        self.workbook.reflections.add_row(self.selected_date());
        self.ui.reflection_index = self.workbook.reflections.rows().len() - 1;
        self.sync_list_state();
    }

    pub fn delete_selected_reflection(&mut self) {
        let id = self
            .workbook
            .reflections
            .rows()
            .get(self.ui.reflection_index)
            .map(|r| r.id.clone());
        if let Some(id) = id {
            self.workbook.reflections.remove_row(&id);
            self.sync_list_state();
        }
    }

    /// Explicit save of the reflection table, refreshing its timestamp
    pub fn save_reflections(&mut self) {
        self.workbook.reflections.save();
        self.set_status_message("Reflections saved".to_string());
    }

    pub fn set_tool(&mut self, mode: ToolMode) {
        self.board.set_mode(mode);
        self.set_status_message(format!("{} selected", mode.label()));
    }

    /// Wipe the focused canvas and its stored drawing
    pub fn clear_focused_canvas(&mut self) {
        let field = self.ui.diary_focus;
        if self.board.clear(field, &mut self.workbook.diary) {
            self.set_status_message(format!("Cleared drawing: {}", field.title()));
        }
    }

    pub fn request_clear(&mut self, target: ClearTarget) {
        self.modals.clear_confirmation = Some(target);
        self.modals.clear_modal_selection = 1; // Default to Cancel
    }

    pub fn cancel_clear(&mut self) {
        self.modals.clear_confirmation = None;
    }

    pub fn confirm_clear(&mut self) {
        let Some(target) = self.modals.clear_confirmation.take() else {
            return;
        };
        match target {
            ClearTarget::Tasks => self.workbook.tasks.clear_all(),
            ClearTarget::Diary => {
                self.workbook.diary.clear_all();
                // Mounted canvases show the now-empty day
                self.board.select_date(self.selected_date(), &self.workbook.diary);
            }
            ClearTarget::Reflections => self.workbook.reflections.clear_all(),
        }
        self.sync_list_state();
        self.set_status_message("All data cleared".to_string());
    }

    /// Mount the diary canvases while the Diary tab is shown, unmount otherwise
    pub fn sync_canvas_mounts(&mut self, layout: &Layout) {
        self.ui.canvas_areas.clear();
        if self.ui.current_tab != Tab::Diary {
            for field in DiaryField::ALL {
                // Commit any stroke cut short by leaving the tab
                self.board.pointer_leave(field, &mut self.workbook.diary);
                self.board.unmount(field);
            }
            return;
        }

        let diary = layout.diary();
        for field in DiaryField::ALL {
            let inner = diary.canvas_inner(field);
            let origin = Point::new(inner.x as f32 * 2.0, inner.y as f32 * 4.0);
            self.board.mount(field, origin, &self.workbook.diary);
            self.ui.canvas_areas.push((field, inner));
        }
    }

    fn canvas_at(&self, column: u16, row: u16) -> Option<DiaryField> {
        self.ui
            .canvas_areas
            .iter()
            .find(|(_, area)| area.contains(Position::new(column, row)))
            .map(|(field, _)| *field)
    }

    /// Centre of a terminal cell in braille-dot units
    pub fn cell_to_dots(column: u16, row: u16) -> Point {
        Point::new(column as f32 * 2.0 + 1.0, row as f32 * 4.0 + 2.0)
    }

    /// Route a mouse event to the canvases. Returns true when a drawing was stored.
    pub fn handle_pointer(&mut self, phase: PointerPhase, column: u16, row: u16) -> bool {
        let input = PointerInput::Mouse(Self::cell_to_dots(column, row));
        match phase {
            PointerPhase::Down => {
                if let Some(field) = self.canvas_at(column, row) {
                    self.ui.diary_focus = field;
                    self.board.pointer_down(field, &input);
                }
                false
            }
            PointerPhase::Drag => {
                let Some(field) = self.board.active_field() else {
                    return false;
                };
                if self.canvas_at(column, row) == Some(field) {
                    self.board.pointer_move(field, &input);
                    false
                } else {
                    self.board.pointer_leave(field, &mut self.workbook.diary)
                }
            }
            PointerPhase::Up => match self.board.active_field() {
                Some(field) => self.board.pointer_up(field, &mut self.workbook.diary),
                None => false,
            },
        }
    }

    pub fn set_status_message(&mut self, message: String) {
        self.status.message = Some(message);
        self.status.message_time = Some(Instant::now());
    }

    pub fn clear_status_message(&mut self) {
        self.status.message = None;
        self.status.message_time = None;
    }

    /// Check if status message should be auto-cleared (after 3 seconds)
    pub fn check_status_message_timeout(&mut self) {
        const STATUS_MESSAGE_TIMEOUT_SECS: u64 = 3;
        if let Some(time) = self.status.message_time {
            if time.elapsed().as_secs() >= STATUS_MESSAGE_TIMEOUT_SECS {
                self.clear_status_message();
            }
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.ui.mode = Mode::Help;
    }

    pub fn exit_help_mode(&mut self) {
        self.ui.mode = Mode::View;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, Storage};
    use std::rc::Rc;

    fn app() -> App {
        let storage: Rc<dyn Storage> = Rc::new(Database::in_memory().unwrap());
        App::new(Config::default(), Workbook::open(storage))
    }

    fn type_into(editor: &mut Editor, text: &str) {
        for ch in text.chars() {
            editor.insert_char(ch);
        }
    }

    #[test]
    fn test_create_form_rejects_then_accepts() {
        let mut app = app();
        app.enter_create_mode();
        app.save_task_form();
        assert_eq!(app.ui.mode, Mode::Create);
        let form = app.task_form.as_ref().unwrap();
        assert_eq!(form.errors.title.as_deref(), Some("Task title is required"));

        let form = app.task_form.as_mut().unwrap();
        type_into(&mut form.title, "Write report");
        form.time_spent = Editor::from_string("30");
        form.current_field = TaskFormField::Priority;
        form.cycle_choice(true);
        app.save_task_form();

        assert_eq!(app.ui.mode, Mode::View);
        let tasks = app.tasks_for_day();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].time_spent, 30);
        assert_eq!(tasks[0].priority, TaskPriority::High);
    }

    #[test]
    fn test_non_numeric_time_is_reported() {
        let mut form = TaskForm::new();
        type_into(&mut form.title, "x");
        form.time_spent = Editor::from_string("half an hour");
        let errors = form.to_new_task().unwrap_err();
        assert!(errors.time_spent.is_some());

        form.time_spent = Editor::from_string("-5");
        let errors = form.to_new_task().unwrap_err();
        assert_eq!(errors.time_spent.as_deref(), Some("Time spent cannot be negative"));
    }

    #[test]
    fn test_edit_updates_in_place() {
        let mut app = app();
        let date = app.selected_date();
        app.workbook.tasks.add(NewTask::new("draft"), date).unwrap();
        app.enter_edit_task_mode();
        let form = app.task_form.as_mut().unwrap();
        form.title = Editor::from_string("final");
        form.current_field = TaskFormField::Category;
        form.cycle_choice(false);
        app.save_task_form();

        let task = app.selected_task().unwrap();
        assert_eq!(task.title, "final");
        assert_eq!(task.category, TaskCategory::Break);
        assert_eq!(app.workbook.tasks.all().len(), 1);
    }

    #[test]
    fn test_time_keys_never_go_negative() {
        let mut app = app();
        let date = app.selected_date();
        app.workbook.tasks.add(NewTask::new("inbox"), date).unwrap();
        app.adjust_selected_time(TIME_STEP_MINUTES);
        app.adjust_selected_time(TIME_STEP_MINUTES);
        assert_eq!(app.selected_task().unwrap().time_spent, 30);
        app.adjust_selected_time(-100);
        assert_eq!(app.selected_task().unwrap().time_spent, 0);
    }

    #[test]
    fn test_date_navigation_partitions_tasks() {
        let mut app = app();
        let today = app.selected_date();
        app.workbook.tasks.add(NewTask::new("today"), today).unwrap();
        app.next_day();
        assert!(app.tasks_for_day().is_empty());
        assert!(app.selected_task().is_none());
        app.prev_day();
        assert_eq!(app.tasks_for_day().len(), 1);
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut app = app();
        let date = app.selected_date();
        app.workbook.tasks.add(NewTask::new("keep"), date).unwrap();

        app.request_clear(ClearTarget::Tasks);
        app.cancel_clear();
        assert_eq!(app.workbook.tasks.all().len(), 1);

        app.request_clear(ClearTarget::Tasks);
        app.confirm_clear();
        assert!(app.workbook.tasks.all().is_empty());
        assert!(app.modals.clear_confirmation.is_none());
    }

    #[test]
    fn test_mouse_drawing_commits_to_diary() {
        let mut app = app();
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40));
        app.switch_tab(Tab::Diary);
        app.sync_canvas_mounts(&layout);

        let area = layout.diary().canvas_inner(DiaryField::Weaknesses);
        let (x, y) = (area.x + 2, area.y + 2);
        app.handle_pointer(PointerPhase::Down, x, y);
        assert_eq!(app.ui.diary_focus, DiaryField::Weaknesses);
        app.handle_pointer(PointerPhase::Drag, x + 6, y + 1);
        assert!(app.handle_pointer(PointerPhase::Up, x + 6, y + 1));

        let entry = app.workbook.diary.entry_for(app.selected_date()).unwrap();
        assert!(entry.weaknesses_drawing.is_some());
        assert!(entry.strengths_drawing.is_none());
    }

    #[test]
    fn test_dragging_off_canvas_ends_stroke() {
        let mut app = app();
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40));
        app.switch_tab(Tab::Diary);
        app.sync_canvas_mounts(&layout);

        let area = layout.diary().canvas_inner(DiaryField::Strengths);
        app.handle_pointer(PointerPhase::Down, area.x + 1, area.y + 1);
        app.handle_pointer(PointerPhase::Drag, area.x + 4, area.y + 1);
        assert!(app.handle_pointer(PointerPhase::Drag, area.x, area.y - 1));
        assert!(app.board.active_field().is_none());
        assert!(!app.handle_pointer(PointerPhase::Up, area.x, area.y - 1));
    }

    #[test]
    fn test_changing_day_mid_stroke_commits_it() {
        let mut app = app();
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40));
        app.switch_tab(Tab::Diary);
        app.sync_canvas_mounts(&layout);
        let day = app.selected_date();

        let area = layout.diary().canvas_inner(DiaryField::Strengths);
        app.handle_pointer(PointerPhase::Down, area.x + 1, area.y + 1);
        app.handle_pointer(PointerPhase::Drag, area.x + 5, area.y + 2);
        app.next_day();

        assert!(app.board.active_field().is_none());
        let entry = app.workbook.diary.entry_for(day).unwrap();
        assert!(entry.strengths_drawing.is_some());
        assert!(app.workbook.diary.entry_for(app.selected_date()).is_none());
    }

    #[test]
    fn test_leaving_diary_unmounts_canvases() {
        let mut app = app();
        let layout = Layout::calculate(Rect::new(0, 0, 120, 40));
        app.switch_tab(Tab::Diary);
        app.sync_canvas_mounts(&layout);
        assert!(app.board.is_mounted(DiaryField::Strengths));

        app.switch_tab(Tab::Tasks);
        app.sync_canvas_mounts(&layout);
        assert!(!app.board.is_mounted(DiaryField::Strengths));
        assert!(app.ui.canvas_areas.is_empty());
        // Clicks on a hidden canvas do nothing
        assert!(!app.handle_pointer(PointerPhase::Down, 10, 10));
    }

    #[test]
    fn test_text_edit_saves_diary_and_reflections() {
        let mut app = app();
        app.switch_tab(Tab::Diary);
        app.switch_diary_focus();
        app.enter_text_edit();
        type_into(&mut app.text_edit.as_mut().unwrap().editor, "missed standup");
        app.save_text_edit();
        let entry = app.workbook.diary.entry_for(app.selected_date()).unwrap();
        assert_eq!(entry.weaknesses_text, "missed standup");

        app.switch_tab(Tab::Reflections);
        app.switch_reflection_column();
        app.enter_text_edit();
        type_into(&mut app.text_edit.as_mut().unwrap().editor, "overcommits");
        app.save_text_edit();
        assert_eq!(app.workbook.reflections.rows()[0].weakness, "overcommits");
    }

    #[test]
    fn test_reflection_rows_never_empty() {
        let mut app = app();
        app.switch_tab(Tab::Reflections);
        app.add_reflection_row();
        assert_eq!(app.ui.reflection_index, 1);
        app.delete_selected_reflection();
        app.delete_selected_reflection();
        assert_eq!(app.workbook.reflections.rows().len(), 1);
        assert_eq!(app.ui.reflection_index, 0);
    }
}
