use chrono::NaiveDate;
use std::rc::Rc;

use crate::database::Storage;
use crate::models::{DiaryEntry, DiaryField};
use crate::store::{DIARY_KEY, RecordStore};

/// One targeted change to the diary entry of a date
#[derive(Debug, Clone, PartialEq)]
pub enum DiaryUpdate {
    Text(DiaryField, String),
    Drawing(DiaryField, Option<String>),
}

/// Date-keyed diary entries, at most one per calendar date
pub struct Diary {
    entries: Vec<DiaryEntry>,
    store: RecordStore<Vec<DiaryEntry>>,
}

impl Diary {
    pub fn open(storage: Rc<dyn Storage>) -> Self {
        let store = RecordStore::new(storage, DIARY_KEY);
        let entries = store.load();
        Self { entries, store }
    }

    pub fn entries(&self) -> &[DiaryEntry] {
        &self.entries
    }

    pub fn entry_for(&self, date: NaiveDate) -> Option<&DiaryEntry> {
        self.entries.iter().find(|e| e.date == date)
    }

    /// Apply `update` to the entry of `date`, creating the entry on first write
    pub fn apply(&mut self, date: NaiveDate, update: DiaryUpdate) -> &DiaryEntry {
        let index = match self.entries.iter().position(|e| e.date == date) {
            Some(index) => index,
            None => {
                tracing::debug!(%date, "creating diary entry");
                self.entries.push(DiaryEntry::new(date));
                self.entries.len() - 1
            }
        };

        let entry = &mut self.entries[index];
        match update {
            DiaryUpdate::Text(DiaryField::Strengths, text) => entry.strengths_text = text,
            DiaryUpdate::Text(DiaryField::Weaknesses, text) => entry.weaknesses_text = text,
            DiaryUpdate::Drawing(DiaryField::Strengths, drawing) => entry.strengths_drawing = drawing,
            DiaryUpdate::Drawing(DiaryField::Weaknesses, drawing) => {
                entry.weaknesses_drawing = drawing
            }
        }

        self.store.save(&self.entries);
        &self.entries[index]
    }

    pub fn set_text(&mut self, date: NaiveDate, field: DiaryField, text: String) -> &DiaryEntry {
        self.apply(date, DiaryUpdate::Text(field, text))
    }

    pub fn set_drawing(
        &mut self,
        date: NaiveDate,
        field: DiaryField,
        drawing: Option<String>,
    ) -> &DiaryEntry {
        self.apply(date, DiaryUpdate::Drawing(field, drawing))
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
        self.store.clear();
        tracing::info!("diary cleared");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, d).unwrap()
    }

    #[test]
    fn test_lookup_or_create_keeps_one_entry_per_date() {
        let mut diary = Diary::open(Rc::new(Database::in_memory().unwrap()));
        assert!(diary.entry_for(day(4)).is_none());

        diary.set_text(day(4), DiaryField::Strengths, "shipped the release".into());
        diary.set_text(day(4), DiaryField::Weaknesses, "skipped review".into());
        diary.set_drawing(day(4), DiaryField::Strengths, Some("data:image/png;base64,AA".into()));

        assert_eq!(diary.entries().len(), 1);
        let entry = diary.entry_for(day(4)).unwrap();
        assert_eq!(entry.strengths_text, "shipped the release");
        assert_eq!(entry.weaknesses_text, "skipped review");
        assert!(entry.strengths_drawing.is_some());
        assert!(entry.weaknesses_drawing.is_none());

        diary.set_text(day(5), DiaryField::Strengths, "new day".into());
        assert_eq!(diary.entries().len(), 2);
        assert_eq!(diary.entry_for(day(4)).unwrap().strengths_text, "shipped the release");
    }

    #[test]
    fn test_clearing_a_drawing_writes_absent_value() {
        let storage: Rc<dyn Storage> = Rc::new(Database::in_memory().unwrap());
        let mut diary = Diary::open(storage.clone());
        diary.set_drawing(day(4), DiaryField::Weaknesses, Some("data:image/png;base64,AA".into()));
        diary.set_drawing(day(4), DiaryField::Weaknesses, None);

        let reloaded = Diary::open(storage);
        assert_eq!(reloaded.entry_for(day(4)).unwrap().weaknesses_drawing, None);
    }

    #[test]
    fn test_clear_all_resets_collection() {
        let storage: Rc<dyn Storage> = Rc::new(Database::in_memory().unwrap());
        let mut diary = Diary::open(storage.clone());
        diary.set_text(day(4), DiaryField::Strengths, "x".into());
        diary.clear_all();

        assert!(diary.entries().is_empty());
        assert!(Diary::open(storage).entries().is_empty());
    }
}
