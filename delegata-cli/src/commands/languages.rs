//! Languages command implementation

use super::Context;
use crate::output::{write_json, OutputFormat};
use anyhow::Result;
use clap::Args;
use delegata_core::Language;
use serde::Serialize;
use std::io::Write;

/// Arguments for the languages command
#[derive(Debug, Args)]
pub struct LanguagesArgs {
    /// Only list languages with a loaded default table
    #[arg(long)]
    pub loaded_only: bool,

    /// Only list languages whose table counts WORD among its common words
    #[arg(long, value_name = "WORD")]
    pub common_word: Option<String>,
}

/// One row of the listing
#[derive(Debug, Serialize)]
pub struct LanguageEntry {
    /// ISO 639-1 code
    pub code: &'static str,
    /// ISO 639-3 code
    pub iso639_3: &'static str,
    /// English name
    pub name: &'static str,
    /// Whether a default table is loaded
    pub table: bool,
}

impl LanguagesArgs {
    /// Execute the languages command
    pub fn execute<W: Write>(&self, ctx: &Context, out: &mut W) -> Result<()> {
        let tables = ctx.config.language_tables()?;
        let entries: Vec<LanguageEntry> = Language::ALL
            .into_iter()
            .map(|language| LanguageEntry {
                code: language.code(),
                iso639_3: language.iso639_3(),
                name: language.name(),
                table: tables.supports(language.code()),
            })
            .filter(|entry| entry.table || !self.loaded_only)
            .filter(|entry| match &self.common_word {
                Some(word) => tables
                    .get(entry.code)
                    .is_ok_and(|table| table.is_common_word(word)),
                None => true,
            })
            .collect();

        match ctx.format {
            OutputFormat::Json => write_json(out, &entries),
            OutputFormat::Text => {
                writeln!(out, "Known languages:")?;
                for entry in &entries {
                    let marker = if entry.table { "  (default table)" } else { "" };
                    writeln!(
                        out,
                        "  {:<4} {:<4} {}{marker}",
                        entry.code, entry.iso639_3, entry.name
                    )?;
                }
                Ok(())
            }
        }
    }
}
