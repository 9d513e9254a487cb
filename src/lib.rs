pub mod canvas;
pub mod cli;
pub mod config;
pub mod database;
pub mod models;
pub mod records;
pub mod stats;
pub mod store;
pub mod tui;
pub mod utils;

pub use config::Config;
pub use database::{Database, Storage};
pub use models::{DiaryEntry, StrengthWeaknessEntry, Task};
pub use records::Workbook;
pub use utils::Profile;
