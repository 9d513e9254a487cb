use clap::Parser;
use color_eyre::Result;
use daybook::cli::{self, Cli, Commands};
use daybook::models::NewTask;
use daybook::{Config, Database, Profile, Storage, Workbook};
use std::rc::Rc;

fn main() -> Result<()> {
    // Set up error reporting with color-eyre
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Determine profile: --dev flag enables dev mode, otherwise use prod
    let profile = if cli.dev {
        Profile::Dev
    } else {
        Profile::Prod
    };

    // An explicit --config file wins over the profile's one
    let config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load_with_profile(profile)?,
    };

    // Log next to the database; the terminal belongs to the UI
    let db_path = config.get_database_path();
    if let Some(log_dir) = db_path.parent() {
        if let Err(e) = daybook::utils::init_logging(log_dir, &config.log_level) {
            eprintln!("WARNING: logging disabled: {}", e);
        }
    }
    tracing::info!(profile = ?profile, db = %db_path.display(), "starting daybook");

    // Initialize database and load every collection once
    let db = Database::new(&db_path)?;
    let storage: Rc<dyn Storage> = Rc::new(db);
    let mut workbook = Workbook::open(storage);

    // Dispatch to appropriate command handler
    match cli.command.unwrap_or(Commands::Tui) {
        Commands::Tui => {
            let app = daybook::tui::App::new(config, workbook);
            daybook::tui::run_event_loop(app)?;
        }
        Commands::AddTask {
            title,
            description,
            time,
            category,
            priority,
            date,
        } => {
            let form = NewTask {
                title,
                description,
                time_spent: time,
                category,
                priority,
            };
            cli::handle_add_task(form, date, &mut workbook)?;
        }
        Commands::List { date } => cli::handle_list(date, &workbook)?,
        Commands::Stats { date } => cli::handle_stats(date, &workbook)?,
        Commands::Diary {
            date,
            strengths,
            weaknesses,
        } => cli::handle_diary(date, strengths, weaknesses, &mut workbook)?,
        Commands::Reflect { strength, weakness } => {
            cli::handle_reflect(strength, weakness, &mut workbook)?
        }
        Commands::ExportDrawing { date, field, out } => {
            cli::handle_export_drawing(date, field, &out, &workbook)?
        }
        Commands::Clear {
            tasks,
            diary,
            reflections,
            yes,
        } => cli::handle_clear(tasks, diary, reflections, yes, &mut workbook)?,
    }

    Ok(())
}
