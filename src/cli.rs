use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::canvas::{self, CodecError};
use crate::models::{DiaryField, NewTask, TaskCategory, TaskPriority, ValidationErrors};
use crate::records::{ReflectionField, Workbook};
use crate::stats::{format_date, format_time};
use crate::utils::{parse_date, today};

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Daily work tracker with a drawing diary - terminal edition")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Use development mode (uses separate dev config/database)
    #[arg(long)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch interactive TUI (default if no subcommand)
    Tui,
    /// Log a task
    AddTask {
        /// Task title
        title: String,
        /// Longer description
        #[arg(long, default_value = "")]
        description: String,
        /// Minutes spent
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        time: i64,
        /// work, learning, meetings, admin or break
        #[arg(long, default_value = "work")]
        category: TaskCategory,
        /// low, medium or high
        #[arg(long, default_value = "medium")]
        priority: TaskPriority,
        /// Day the task belongs to (YYYY-MM-DD, default today)
        #[arg(long)]
        date: Option<String>,
    },
    /// List the tasks of a day
    List {
        #[arg(long)]
        date: Option<String>,
    },
    /// Show daily statistics
    Stats {
        #[arg(long)]
        date: Option<String>,
    },
    /// Show or write the diary text of a day
    Diary {
        #[arg(long)]
        date: Option<String>,
        /// Set "What I Accomplished"
        #[arg(long)]
        strengths: Option<String>,
        /// Set "What I Couldn't Achieve"
        #[arg(long)]
        weaknesses: Option<String>,
    },
    /// Add a strengths/weaknesses row, or show the table
    Reflect {
        #[arg(long)]
        strength: Option<String>,
        #[arg(long)]
        weakness: Option<String>,
    },
    /// Write a stored diary drawing to a PNG file
    ExportDrawing {
        #[arg(long)]
        date: Option<String>,
        /// strengths or weaknesses
        #[arg(long)]
        field: DiaryField,
        /// Output file
        #[arg(long)]
        out: PathBuf,
    },
    /// Erase stored records
    Clear {
        #[arg(long)]
        tasks: bool,
        #[arg(long)]
        diary: bool,
        #[arg(long)]
        reflections: bool,
        /// Confirm the deletion
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Failed to parse date: {0}")]
    DateParseError(String),
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error("No {field} drawing stored for {date}")]
    NoDrawing { date: NaiveDate, field: &'static str },
    #[error("Stored drawing is unreadable: {0}")]
    Codec(#[from] CodecError),
    #[error("Failed to write image: {0}")]
    Image(#[from] image::ImageError),
    #[error("Nothing selected to clear (use --tasks, --diary or --reflections)")]
    NothingToClear,
    #[error("Refusing to clear without --yes")]
    NotConfirmed,
}

fn resolve_date(date: Option<String>) -> Result<NaiveDate, CliError> {
    match date {
        Some(date_str) => parse_date(&date_str).map_err(|e| {
            CliError::DateParseError(format!("Invalid date format '{}': {}", date_str, e))
        }),
        None => Ok(today()),
    }
}

/// Handle the add-task command
pub fn handle_add_task(
    form: NewTask,
    date: Option<String>,
    workbook: &mut Workbook,
) -> Result<(), CliError> {
    let date = resolve_date(date)?;
    let task = workbook.tasks.add(form, date)?;
    println!("Task created successfully (ID: {})", task.id);
    Ok(())
}

/// Handle the list command
pub fn handle_list(date: Option<String>, workbook: &Workbook) -> Result<(), CliError> {
    let date = resolve_date(date)?;
    let tasks = workbook.tasks.for_date(date);
    println!("{}", format_date(date));
    if tasks.is_empty() {
        println!("  No tasks logged.");
    }
    for task in tasks {
        println!(
            "  [{}] {} ({}, {}, {}) {}",
            if task.completed { "x" } else { " " },
            task.title,
            format_time(u64::from(task.time_spent)),
            task.category.label(),
            task.priority.label(),
            task.id
        );
    }
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(date: Option<String>, workbook: &Workbook) -> Result<(), CliError> {
    let date = resolve_date(date)?;
    let stats = workbook.tasks.stats_for(date);
    println!("{}", format_date(date));
    println!("  Total tasks:       {}", stats.total_tasks);
    println!("  Completed:         {}", stats.completed_tasks);
    println!("  Time spent:        {}", format_time(stats.total_time));
    println!("  Completion rate:   {}%", stats.completion_rate);
    println!("  Most productive:   {}", stats.most_productive_category.label());
    for row in workbook.tasks.breakdown_for(date) {
        println!(
            "    {:<16} {:>8}  {}/{} done",
            row.category.label(),
            format_time(row.time),
            row.completed,
            row.count
        );
    }
    Ok(())
}

/// Handle the diary command
pub fn handle_diary(
    date: Option<String>,
    strengths: Option<String>,
    weaknesses: Option<String>,
    workbook: &mut Workbook,
) -> Result<(), CliError> {
    let date = resolve_date(date)?;
    if let Some(text) = strengths {
        workbook.diary.set_text(date, DiaryField::Strengths, text);
    }
    if let Some(text) = weaknesses {
        workbook.diary.set_text(date, DiaryField::Weaknesses, text);
    }

    println!("{}", format_date(date));
    let entry = workbook.diary.entry_for(date);
    for field in DiaryField::ALL {
        let text = entry.map(|e| e.text(field)).unwrap_or_default();
        let drawing = entry.and_then(|e| e.drawing(field)).is_some();
        println!("  {}{}", field.title(), if drawing { " [drawing]" } else { "" });
        println!("    {}", if text.is_empty() { "-" } else { text });
    }
    Ok(())
}

/// Handle the reflect command
pub fn handle_reflect(
    strength: Option<String>,
    weakness: Option<String>,
    workbook: &mut Workbook,
) -> Result<(), CliError> {
    let table = &mut workbook.reflections;
    if strength.is_some() || weakness.is_some() {
        // Fill the trailing blank row before growing the table
        let blank = table
            .rows()
            .last()
            .filter(|r| r.strength.trim().is_empty() && r.weakness.trim().is_empty())
            .map(|r| r.id.clone());
        let id = match blank {
            Some(id) => id,
            None => table.add_row(today()).id.clone(),
        };
        if let Some(text) = strength {
            table.update(&id, ReflectionField::Strength, text);
        }
        if let Some(text) = weakness {
            table.update(&id, ReflectionField::Weakness, text);
        }
    }

    for (i, row) in table.rows().iter().enumerate() {
        println!("{:>3}. + {}", i + 1, if row.strength.is_empty() { "-" } else { row.strength.as_str() });
        println!("     - {}", if row.weakness.is_empty() { "-" } else { row.weakness.as_str() });
    }
    let stats = table.stats();
    println!(
        "{} strengths, {} weaknesses, {}/{} complete",
        stats.total_strengths, stats.total_weaknesses, stats.completed_entries, stats.total_entries
    );
    Ok(())
}

/// Handle the export-drawing command
pub fn handle_export_drawing(
    date: Option<String>,
    field: DiaryField,
    out: &Path,
    workbook: &Workbook,
) -> Result<(), CliError> {
    let date = resolve_date(date)?;
    let stored = workbook
        .diary
        .entry_for(date)
        .and_then(|e| e.drawing(field))
        .ok_or(CliError::NoDrawing {
            date,
            field: field.title(),
        })?;
    let pixels = canvas::decode_data_url(stored)?;
    pixels.save_with_format(out, image::ImageFormat::Png)?;
    println!("Drawing written to {}", out.display());
    Ok(())
}

/// Handle the clear command
pub fn handle_clear(
    tasks: bool,
    diary: bool,
    reflections: bool,
    yes: bool,
    workbook: &mut Workbook,
) -> Result<(), CliError> {
    if !(tasks || diary || reflections) {
        return Err(CliError::NothingToClear);
    }
    if !yes {
        return Err(CliError::NotConfirmed);
    }
    if tasks {
        workbook.tasks.clear_all();
        println!("All tasks cleared");
    }
    if diary {
        workbook.diary.clear_all();
        println!("Diary cleared");
    }
    if reflections {
        workbook.reflections.clear_all();
        println!("Strengths/weaknesses table cleared");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::{Database, Storage};
    use std::rc::Rc;

    fn workbook() -> Workbook {
        let storage: Rc<dyn Storage> = Rc::new(Database::in_memory().unwrap());
        Workbook::open(storage)
    }

    #[test]
    fn test_parses_add_task_arguments() {
        let cli = Cli::try_parse_from([
            "daybook", "add-task", "Write report", "--time", "30", "--priority", "high",
            "--category", "learning", "--date", "2026-05-04",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::AddTask { title, time, category, priority, date, .. }) => {
                assert_eq!(title, "Write report");
                assert_eq!(time, 30);
                assert_eq!(category, TaskCategory::Learning);
                assert_eq!(priority, TaskPriority::High);
                assert_eq!(date.as_deref(), Some("2026-05-04"));
            }
            _ => panic!("expected add-task"),
        }

        assert!(Cli::try_parse_from(["daybook", "add-task", "x", "--category", "nap"]).is_err());
        assert!(Cli::try_parse_from(["daybook"]).unwrap().command.is_none());
    }

    #[test]
    fn test_add_task_validates() {
        let mut wb = workbook();
        let mut form = NewTask::new("  ");
        form.time_spent = -5;
        let err = handle_add_task(form, Some("2026-05-04".into()), &mut wb).unwrap_err();
        assert!(matches!(err, CliError::Validation(_)));
        assert!(wb.tasks.all().is_empty());

        handle_add_task(NewTask::new("ok"), Some("2026-05-04".into()), &mut wb).unwrap();
        assert_eq!(wb.tasks.all().len(), 1);

        let err = handle_add_task(NewTask::new("ok"), Some("05/04/2026".into()), &mut wb);
        assert!(matches!(err, Err(CliError::DateParseError(_))));
    }

    #[test]
    fn test_reflect_fills_blank_row_first() {
        let mut wb = workbook();
        handle_reflect(Some("calm under pressure".into()), None, &mut wb).unwrap();
        assert_eq!(wb.reflections.rows().len(), 1);

        handle_reflect(None, Some("slow replies".into()), &mut wb).unwrap();
        assert_eq!(wb.reflections.rows().len(), 2);
        assert_eq!(wb.reflections.rows()[1].weakness, "slow replies");
    }

    #[test]
    fn test_clear_requires_confirmation() {
        let mut wb = workbook();
        handle_add_task(NewTask::new("keep"), None, &mut wb).unwrap();

        assert!(matches!(
            handle_clear(true, false, false, false, &mut wb),
            Err(CliError::NotConfirmed)
        ));
        assert_eq!(wb.tasks.all().len(), 1);
        assert!(matches!(
            handle_clear(false, false, false, true, &mut wb),
            Err(CliError::NothingToClear)
        ));

        handle_clear(true, false, false, true, &mut wb).unwrap();
        assert!(wb.tasks.all().is_empty());
    }

    #[test]
    fn test_export_drawing_writes_png() {
        let mut wb = workbook();
        let date = NaiveDate::from_ymd_opt(2026, 5, 4).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("strengths.png");

        let missing = handle_export_drawing(Some("2026-05-04".into()), DiaryField::Strengths, &out, &wb);
        assert!(matches!(missing, Err(CliError::NoDrawing { .. })));

        let mut pixels = image::RgbaImage::new(4, 4);
        pixels.put_pixel(1, 1, image::Rgba([1, 2, 3, 255]));
        let stored = canvas::encode_data_url(&pixels).unwrap();
        wb.diary.set_drawing(date, DiaryField::Strengths, Some(stored));

        handle_export_drawing(Some("2026-05-04".into()), DiaryField::Strengths, &out, &wb).unwrap();
        let written = image::open(&out).unwrap().to_rgba8();
        assert_eq!(written, pixels);
    }
}
