use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Fresh client-side identifier, unique within the local collection
pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskCategory {
    Work,
    Learning,
    Meetings,
    Admin,
    Break,
}

impl TaskCategory {
    pub const ALL: [TaskCategory; 5] = [
        TaskCategory::Work,
        TaskCategory::Learning,
        TaskCategory::Meetings,
        TaskCategory::Admin,
        TaskCategory::Break,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskCategory::Work => "work",
            TaskCategory::Learning => "learning",
            TaskCategory::Meetings => "meetings",
            TaskCategory::Admin => "admin",
            TaskCategory::Break => "break",
        }
    }

    /// Human label used by forms and the stats panel
    pub fn label(self) -> &'static str {
        match self {
            TaskCategory::Work => "Work Tasks",
            TaskCategory::Learning => "Learning",
            TaskCategory::Meetings => "Meetings",
            TaskCategory::Admin => "Administrative",
            TaskCategory::Break => "Break/Rest",
        }
    }

    /// Compact label for list rows
    pub fn short_label(self) -> &'static str {
        match self {
            TaskCategory::Work => "Work",
            TaskCategory::Learning => "Learning",
            TaskCategory::Meetings => "Meetings",
            TaskCategory::Admin => "Admin",
            TaskCategory::Break => "Break",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub const ALL: [TaskPriority; 3] = [TaskPriority::Low, TaskPriority::Medium, TaskPriority::High];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TaskPriority::Low => "Low Priority",
            TaskPriority::Medium => "Medium Priority",
            TaskPriority::High => "High Priority",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl fmt::Display for UnknownVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown {} '{}'", self.kind, self.value)
    }
}

impl std::error::Error for UnknownVariant {}

impl FromStr for TaskCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        TaskCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "category",
                value: s.clone(),
            })
    }
}

impl FromStr for TaskPriority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        TaskPriority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownVariant {
                kind: "priority",
                value: s.clone(),
            })
    }
}

impl fmt::Display for TaskCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub time_spent: u32, // minutes
    pub completed: bool,
    pub date: NaiveDate,
    pub category: TaskCategory,
    pub priority: TaskPriority,
    pub created_at: DateTime<Utc>,
}

/// Task form payload before it is validated and stamped
#[derive(Debug, Clone, PartialEq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub time_spent: i64,
    pub category: TaskCategory,
    pub priority: TaskPriority,
}

impl Default for NewTask {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            time_spent: 0,
            category: TaskCategory::Work,
            priority: TaskPriority::Medium,
        }
    }
}

/// Per-field validation messages for the task form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    pub title: Option<String>,
    pub time_spent: Option<String>,
}

impl ValidationErrors {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.time_spent.is_none()
    }

    pub fn messages(&self) -> Vec<&str> {
        [self.title.as_deref(), self.time_spent.as_deref()]
            .into_iter()
            .flatten()
            .collect()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.messages().join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        if self.title.trim().is_empty() {
            errors.title = Some("Task title is required".to_string());
        }
        if self.time_spent < 0 {
            errors.time_spent = Some("Time spent cannot be negative".to_string());
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Validate and turn the payload into a stored task for `date`
    pub fn into_task(self, date: NaiveDate) -> Result<Task, ValidationErrors> {
        self.validate()?;
        Ok(Task {
            id: generate_id(),
            title: self.title,
            description: self.description,
            time_spent: u32::try_from(self.time_spent).unwrap_or(u32::MAX),
            completed: false,
            date,
            category: self.category,
            priority: self.priority,
            created_at: Utc::now(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiaryEntry {
    pub id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub strengths_text: String,
    #[serde(default)]
    pub weaknesses_text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strengths_drawing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weaknesses_drawing: Option<String>,
}

impl DiaryEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            id: generate_id(),
            date,
            strengths_text: String::new(),
            weaknesses_text: String::new(),
            strengths_drawing: None,
            weaknesses_drawing: None,
        }
    }

    pub fn text(&self, field: DiaryField) -> &str {
        match field {
            DiaryField::Strengths => &self.strengths_text,
            DiaryField::Weaknesses => &self.weaknesses_text,
        }
    }

    pub fn drawing(&self, field: DiaryField) -> Option<&str> {
        match field {
            DiaryField::Strengths => self.strengths_drawing.as_deref(),
            DiaryField::Weaknesses => self.weaknesses_drawing.as_deref(),
        }
    }
}

/// The two reflective fields of a diary page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiaryField {
    Strengths,
    Weaknesses,
}

impl DiaryField {
    pub const ALL: [DiaryField; 2] = [DiaryField::Strengths, DiaryField::Weaknesses];

    pub fn title(self) -> &'static str {
        match self {
            DiaryField::Strengths => "What I Accomplished",
            DiaryField::Weaknesses => "What I Couldn't Achieve",
        }
    }

    pub fn other(self) -> Self {
        match self {
            DiaryField::Strengths => DiaryField::Weaknesses,
            DiaryField::Weaknesses => DiaryField::Strengths,
        }
    }
}

impl FromStr for DiaryField {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strengths" | "strength" => Ok(DiaryField::Strengths),
            "weaknesses" | "weakness" => Ok(DiaryField::Weaknesses),
            other => Err(UnknownVariant {
                kind: "diary field",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StrengthWeaknessEntry {
    pub id: String,
    #[serde(default)]
    pub strength: String,
    #[serde(default)]
    pub weakness: String,
    pub date: NaiveDate,
}

impl StrengthWeaknessEntry {
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            id: generate_id(),
            strength: String::new(),
            weakness: String::new(),
            date,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 5, 4).unwrap()
    }

    #[test]
    fn test_validation_messages() {
        let mut form = NewTask::new("   ");
        form.time_spent = -5;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.title.as_deref(), Some("Task title is required"));
        assert_eq!(errors.time_spent.as_deref(), Some("Time spent cannot be negative"));

        assert!(NewTask::new("Write report").validate().is_ok());
    }

    #[test]
    fn test_into_task_stamps_fresh_fields() {
        let mut form = NewTask::new("Write report");
        form.time_spent = 30;
        form.priority = TaskPriority::High;
        let task = form.into_task(day()).unwrap();

        assert!(!task.id.is_empty());
        assert!(!task.completed);
        assert_eq!(task.date, day());
        assert_eq!(task.time_spent, 30);
        assert_eq!(task.category, TaskCategory::Work);
        assert_eq!(task.priority, TaskPriority::High);
    }

    #[test]
    fn test_task_json_layout() {
        let task = NewTask::new("Standup").into_task(day()).unwrap();
        let value = serde_json::to_value(&task).unwrap();

        assert_eq!(value["timeSpent"], 0);
        assert_eq!(value["date"], "2026-05-04");
        assert_eq!(value["category"], "work");
        assert_eq!(value["priority"], "medium");
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn test_reads_stored_browser_layout() {
        let raw = r#"{"id":"17167abc","title":"Read","description":"","timeSpent":20,
            "completed":true,"date":"2026-05-04","category":"learning","priority":"low",
            "createdAt":"2026-05-04T09:15:00.000Z"}"#;
        let task: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(task.category, TaskCategory::Learning);
        assert!(task.completed);
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("Meetings".parse::<TaskCategory>().unwrap(), TaskCategory::Meetings);
        assert_eq!("high".parse::<TaskPriority>().unwrap(), TaskPriority::High);
        assert!("urgent".parse::<TaskPriority>().is_err());
        assert_eq!("weakness".parse::<DiaryField>().unwrap(), DiaryField::Weaknesses);
    }

    #[test]
    fn test_diary_entry_omits_absent_drawings() {
        let entry = DiaryEntry::new(day());
        let value = serde_json::to_value(&entry).unwrap();
        assert!(value.get("strengthsDrawing").is_none());
        assert_eq!(value["strengthsText"], "");
    }
}
