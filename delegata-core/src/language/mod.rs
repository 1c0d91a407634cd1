//! Language descriptions and per-language default delegate tables
//!
//! Each language maps a group category and group name to an ordered chain of
//! candidate delegates. The first entry is the primary default.

pub mod config;
mod defaults;
mod descriptor;
pub mod loader;

pub use config::LanguageConfig;
pub use defaults::{LanguageDefaults, LanguageTables};
pub use descriptor::Language;
pub use loader::{embedded, load_file, parse_table};
