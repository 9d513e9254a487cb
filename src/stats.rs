use chrono::NaiveDate;
use serde::Serialize;

use crate::models::{Task, TaskCategory};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyStats {
    pub total_tasks: usize,
    pub completed_tasks: usize,
    pub total_time: u64,
    pub most_productive_category: TaskCategory,
    pub completion_rate: u32,
}

/// Time, count and completions of one category within a day
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryBreakdown {
    pub category: TaskCategory,
    pub time: u64,
    pub count: usize,
    pub completed: usize,
}

/// Per-category totals, in the order each category first appears in `tasks`
pub fn category_breakdown(tasks: &[Task]) -> Vec<CategoryBreakdown> {
    let mut rows: Vec<CategoryBreakdown> = Vec::new();
    for task in tasks {
        let index = match rows.iter().position(|r| r.category == task.category) {
            Some(index) => index,
            None => {
                rows.push(CategoryBreakdown {
                    category: task.category,
                    time: 0,
                    count: 0,
                    completed: 0,
                });
                rows.len() - 1
            }
        };
        let row = &mut rows[index];
        row.time += u64::from(task.time_spent);
        row.count += 1;
        if task.completed {
            row.completed += 1;
        }
    }
    rows
}

pub fn calculate_daily_stats(tasks: &[Task]) -> DailyStats {
    let total_tasks = tasks.len();
    let completed_tasks = tasks.iter().filter(|t| t.completed).count();
    let total_time = tasks.iter().map(|t| u64::from(t.time_spent)).sum();
    let completion_rate = if total_tasks > 0 {
        (completed_tasks as f64 / total_tasks as f64 * 100.0).round() as u32
    } else {
        0
    };

    // Strictly-greater fold seeded with (work, 0): ties keep the earlier
    // category, and a day without positive time reports work.
    let most_productive_category = category_breakdown(tasks)
        .into_iter()
        .fold((TaskCategory::Work, 0u64), |best, row| {
            if row.time > best.1 { (row.category, row.time) } else { best }
        })
        .0;

    DailyStats {
        total_tasks,
        completed_tasks,
        total_time,
        most_productive_category,
        completion_rate,
    }
}

/// `90` → `1h 30m`, `45` → `45m`
pub fn format_time(minutes: u64) -> String {
    let hours = minutes / 60;
    let mins = minutes % 60;
    if hours > 0 {
        format!("{}h {}m", hours, mins)
    } else {
        format!("{}m", mins)
    }
}

/// Long human date, e.g. `Monday, May 4, 2026`
pub fn format_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d, %Y").to_string()
}
