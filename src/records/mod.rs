//! In-memory collections with full-snapshot persistence on every mutation.

pub mod diary;
pub mod reflections;
pub mod tasks;

pub use diary::{Diary, DiaryUpdate};
pub use reflections::{ReflectionField, ReflectionSnapshot, ReflectionStats, ReflectionTable};
pub use tasks::{TaskLog, TaskUpdate};

use std::rc::Rc;

use crate::database::Storage;

/// Every collection of the application, loaded once from one storage port
pub struct Workbook {
    pub tasks: TaskLog,
    pub diary: Diary,
    pub reflections: ReflectionTable,
}

impl Workbook {
    pub fn open(storage: Rc<dyn Storage>) -> Self {
        let workbook = Self {
            tasks: TaskLog::open(storage.clone()),
            diary: Diary::open(storage.clone()),
            reflections: ReflectionTable::open(storage),
        };
        tracing::info!(
            tasks = workbook.tasks.all().len(),
            diary_entries = workbook.diary.entries().len(),
            reflection_rows = workbook.reflections.rows().len(),
            "loaded records"
        );
        workbook
    }
}
