use chrono::NaiveDate;
use std::rc::Rc;

use crate::database::Storage;
use crate::models::{NewTask, Task, TaskCategory, TaskPriority, ValidationErrors};
use crate::stats::{self, CategoryBreakdown, DailyStats};
use crate::store::{RecordStore, TASKS_KEY};

/// Field-level change to one task
#[derive(Debug, Clone, PartialEq)]
pub enum TaskUpdate {
    ToggleCompleted,
    TimeSpent(u32),
    Title(String),
    Description(String),
    Category(TaskCategory),
    Priority(TaskPriority),
}

pub struct TaskLog {
    tasks: Vec<Task>,
    store: RecordStore<Vec<Task>>,
}

impl TaskLog {
    pub fn open(storage: Rc<dyn Storage>) -> Self {
        let store = RecordStore::new(storage, TASKS_KEY);
        let tasks = store.load();
        Self { tasks, store }
    }

    /// Whole collection, insertion order
    pub fn all(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    pub fn for_date(&self, date: NaiveDate) -> Vec<Task> {
        self.tasks.iter().filter(|t| t.date == date).cloned().collect()
    }

    pub fn stats_for(&self, date: NaiveDate) -> DailyStats {
        stats::calculate_daily_stats(&self.for_date(date))
    }

    pub fn breakdown_for(&self, date: NaiveDate) -> Vec<CategoryBreakdown> {
        stats::category_breakdown(&self.for_date(date))
    }

    /// Validate the form and append a fresh task on `date`
    pub fn add(&mut self, form: NewTask, date: NaiveDate) -> Result<&Task, ValidationErrors> {
        let task = form.into_task(date)?;
        tracing::info!(id = %task.id, %date, "task added");
        self.tasks.push(task);
        self.persist();
        Ok(&self.tasks[self.tasks.len() - 1])
    }

    /// Apply `update` to the task with `id`; returns false when no task matched
    pub fn apply(&mut self, id: &str, update: TaskUpdate) -> bool {
        let Some(task) = self.tasks.iter_mut().find(|t| t.id == id) else {
            tracing::debug!(id, "update for unknown task ignored");
            return false;
        };
        match update {
            TaskUpdate::ToggleCompleted => task.completed = !task.completed,
            TaskUpdate::TimeSpent(minutes) => task.time_spent = minutes,
            TaskUpdate::Title(title) => task.title = title,
            TaskUpdate::Description(description) => task.description = description,
            TaskUpdate::Category(category) => task.category = category,
            TaskUpdate::Priority(priority) => task.priority = priority,
        }
        self.persist();
        true
    }

    pub fn toggle_completion(&mut self, id: &str) -> bool {
        self.apply(id, TaskUpdate::ToggleCompleted)
    }

    pub fn update_time(&mut self, id: &str, minutes: u32) -> bool {
        self.apply(id, TaskUpdate::TimeSpent(minutes))
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            tracing::info!(id, "task deleted");
            self.persist();
        }
        removed
    }

    pub fn clear_all(&mut self) {
        self.tasks.clear();
        self.store.clear();
        tracing::info!("all tasks cleared");
    }

    fn persist(&self) {
        self.store.save(&self.tasks);
    }
}
