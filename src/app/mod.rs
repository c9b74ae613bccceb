#[cfg(feature = "cli")]
pub mod commands;
pub mod menu;
pub mod sorting;
pub mod state;

pub use menu::ConsoleMenu;
pub use sorting::SortKey;
pub use state::AppState;

use crate::utils::validation::ensure_json_extension;

/// Empty names fall back to the data file; `.json` is appended when missing.
pub fn export_file_name(requested: Option<&str>, data_file: &str) -> String {
    match requested.map(str::trim) {
        Some(name) if !name.is_empty() => ensure_json_extension(name),
        _ => ensure_json_extension(data_file),
    }
}
