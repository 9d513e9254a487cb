use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::rc::Rc;

use crate::database::Storage;
use crate::models::{StrengthWeaknessEntry, generate_id};
use crate::store::{REFLECTIONS_KEY, RecordStore};
use crate::utils;

/// Stored layout of the strengths/weaknesses table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReflectionSnapshot {
    #[serde(default)]
    pub entries: Vec<StrengthWeaknessEntry>,
    #[serde(default)]
    pub last_saved: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReflectionField {
    Strength,
    Weakness,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReflectionStats {
    pub total_strengths: usize,
    pub total_weaknesses: usize,
    pub completed_entries: usize,
    pub total_entries: usize,
}

/// Free-standing strengths/weaknesses rows. The table always holds at least one row.
pub struct ReflectionTable {
    rows: Vec<StrengthWeaknessEntry>,
    last_saved: Option<DateTime<Utc>>,
    store: RecordStore<ReflectionSnapshot>,
}

impl ReflectionTable {
    pub fn open(storage: Rc<dyn Storage>) -> Self {
        let store: RecordStore<ReflectionSnapshot> =
            RecordStore::new(storage, REFLECTIONS_KEY);
        let snapshot = store.load();
        let mut table = Self {
            rows: snapshot.entries,
            last_saved: snapshot.last_saved,
            store,
        };
        if table.rows.is_empty() {
            table.rows.push(StrengthWeaknessEntry::empty(utils::today()));
        }
        table
    }

    pub fn rows(&self) -> &[StrengthWeaknessEntry] {
        &self.rows
    }

    pub fn last_saved(&self) -> Option<DateTime<Utc>> {
        self.last_saved
    }

    pub fn add_row(&mut self, date: NaiveDate) -> &StrengthWeaknessEntry {
        self.rows.push(StrengthWeaknessEntry {
            id: generate_id(),
            strength: String::new(),
            weakness: String::new(),
            date,
        });
        self.save();
        &self.rows[self.rows.len() - 1]
    }

    pub fn update(&mut self, id: &str, field: ReflectionField, value: String) -> bool {
        let Some(row) = self.rows.iter_mut().find(|r| r.id == id) else {
            return false;
        };
        match field {
            ReflectionField::Strength => row.strength = value,
            ReflectionField::Weakness => row.weakness = value,
        }
        self.save();
        true
    }

    /// Remove the row with `id`. Removing the last row leaves one fresh empty row.
    pub fn remove_row(&mut self, id: &str) -> bool {
        let before = self.rows.len();
        self.rows.retain(|r| r.id != id);
        if self.rows.len() == before {
            return false;
        }
        if self.rows.is_empty() {
            self.rows.push(StrengthWeaknessEntry::empty(utils::today()));
        }
        self.save();
        true
    }

    /// Reset to a single empty row
    pub fn clear_all(&mut self) {
        self.rows = vec![StrengthWeaknessEntry::empty(utils::today())];
        self.save();
        tracing::info!("reflection table cleared");
    }

    pub fn stats(&self) -> ReflectionStats {
        let filled = |s: &str| !s.trim().is_empty();
        ReflectionStats {
            total_strengths: self.rows.iter().filter(|r| filled(&r.strength)).count(),
            total_weaknesses: self.rows.iter().filter(|r| filled(&r.weakness)).count(),
            completed_entries: self
                .rows
                .iter()
                .filter(|r| filled(&r.strength) && filled(&r.weakness))
                .count(),
            total_entries: self.rows.len(),
        }
    }

    /// Persist the full table and stamp the save time
    pub fn save(&mut self) {
        let now = Utc::now();
        let snapshot = ReflectionSnapshot {
            entries: self.rows.clone(),
            last_saved: Some(now),
        };
        self.store.save(&snapshot);
        self.last_saved = Some(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    fn table() -> (ReflectionTable, Rc<dyn Storage>) {
        let storage: Rc<dyn Storage> = Rc::new(Database::in_memory().unwrap());
        (ReflectionTable::open(storage.clone()), storage)
    }

    #[test]
    fn test_starts_with_one_empty_row() {
        let (table, _) = table();
        assert_eq!(table.rows().len(), 1);
        assert!(table.rows()[0].strength.is_empty());
        assert!(table.last_saved().is_none());
    }

    #[test]
    fn test_removing_last_row_reseeds_exactly_one() {
        let (mut table, _) = table();
        let id = table.rows()[0].id.clone();
        table.update(&id, ReflectionField::Strength, "focus".into());

        assert!(table.remove_row(&id));
        assert_eq!(table.rows().len(), 1);
        assert_ne!(table.rows()[0].id, id);
        assert!(table.rows()[0].strength.is_empty());
    }

    #[test]
    fn test_remove_keeps_other_rows() {
        let (mut table, _) = table();
        let second = table.add_row(day()).id.clone();
        let first = table.rows()[0].id.clone();

        assert!(table.remove_row(&first));
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.rows()[0].id, second);
        assert!(!table.remove_row("missing"));
    }

    #[test]
    fn test_stats_count_filled_cells() {
        let (mut table, _) = table();
        let a = table.rows()[0].id.clone();
        let b = table.add_row(day()).id.clone();
        table.add_row(day());
        table.update(&a, ReflectionField::Strength, "planned well".into());
        table.update(&a, ReflectionField::Weakness, "late start".into());
        table.update(&b, ReflectionField::Strength, "   ".into());
        table.update(&b, ReflectionField::Weakness, "context switching".into());

        let stats = table.stats();
        assert_eq!(stats.total_strengths, 1);
        assert_eq!(stats.total_weaknesses, 2);
        assert_eq!(stats.completed_entries, 1);
        assert_eq!(stats.total_entries, 3);
    }

    #[test]
    fn test_snapshot_persists_rows_and_save_time() {
        let (mut table, storage) = table();
        let id = table.rows()[0].id.clone();
        table.update(&id, ReflectionField::Weakness, "meetings ran over".into());
        assert!(table.last_saved().is_some());

        let reloaded = ReflectionTable::open(storage.clone());
        assert_eq!(reloaded.rows(), table.rows());
        assert!(reloaded.last_saved().is_some());

        let raw = storage.get_item(REFLECTIONS_KEY).unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert!(value["entries"].is_array());
        assert!(value["lastSaved"].is_string());
    }

    #[test]
    fn test_clear_all_leaves_single_row() {
        let (mut table, _) = table();
        table.add_row(day());
        table.add_row(day());
        table.clear_all();
        assert_eq!(table.rows().len(), 1);
        assert_eq!(table.stats().total_strengths, 0);
    }
}
