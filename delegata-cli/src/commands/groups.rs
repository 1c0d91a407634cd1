//! Groups command implementation

use super::Context;
use crate::error::CliError;
use crate::output::{write_json, OutputFormat};
use anyhow::{Context as _, Result};
use clap::Args;
use delegata_core::{
    CapabilityGroup, Classification, DefaultDelegate, Kind, LanguageTables, Registry,
    RegistryConfig,
};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Arguments for the groups command
#[derive(Debug, Args)]
pub struct GroupsArgs {
    /// Registry definition file (default: from config)
    #[arg(short, long, value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

/// One group of the listing
#[derive(Debug, Serialize)]
pub struct GroupSummary {
    /// Canonical method name
    pub method: String,
    /// Group name in the language tables
    pub name: String,
    /// Group category
    pub kind: Kind,
    /// Annotator or plain
    pub classification: Classification,
    /// Valid delegates
    pub delegates: Vec<String>,
    /// Default policy
    pub default: String,
    /// Delegate picked for the configured language when none is named
    pub resolved_default: Option<String>,
    /// Installed operation names
    pub operations: Vec<String>,
}

impl GroupSummary {
    fn new<E>(group: &CapabilityGroup<E>, tables: &LanguageTables, language_id: &str) -> Self {
        let (default, resolved_default) = match group.default_delegate() {
            DefaultDelegate::Fixed(id) => (format!("fixed ({id})"), Some(id.to_string())),
            DefaultDelegate::Forbidden => ("none".to_string(), None),
            DefaultDelegate::Language => (
                "language table".to_string(),
                tables
                    .resolve_default(language_id, group.kind(), group.name())
                    .ok()
                    .filter(|id| !id.is_none())
                    .map(|id| id.to_string()),
            ),
        };

        Self {
            method: group.method().to_string(),
            name: group.name().to_string(),
            kind: group.kind(),
            classification: group.classification(),
            delegates: group.delegates().iter().map(ToString::to_string).collect(),
            default,
            resolved_default,
            operations: group
                .operation_names()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// Load and build a registry definition file
pub fn load_registry(path: &Path) -> Result<Registry<()>> {
    let config = RegistryConfig::from_file(path)
        .with_context(|| format!("Failed to load registry {}", path.display()))?;
    let registry = Registry::from_config(&config)
        .with_context(|| format!("Invalid registry {}", path.display()))?;
    log::info!("Loaded {} groups from {}", registry.len(), path.display());
    Ok(registry)
}

impl GroupsArgs {
    /// Execute the groups command
    pub fn execute<W: Write>(&self, ctx: &Context, out: &mut W) -> Result<()> {
        let path = self
            .registry
            .as_ref()
            .or(ctx.config.registry.file.as_ref())
            .ok_or(CliError::MissingRegistry)?;
        let registry = load_registry(path)?;
        let tables = ctx.config.language_tables()?;
        let language_id = ctx.config.language.default_language.as_str();

        let summaries: Vec<GroupSummary> = registry
            .groups()
            .iter()
            .map(|group| GroupSummary::new(group, &tables, language_id))
            .collect();

        match ctx.format {
            OutputFormat::Json => write_json(out, &summaries),
            OutputFormat::Text => {
                for summary in &summaries {
                    writeln!(
                        out,
                        "{} [{} {}] {:?}",
                        summary.method, summary.kind, summary.name, summary.classification
                    )?;
                    writeln!(out, "  delegates:  {}", summary.delegates.join(", "))?;
                    match &summary.resolved_default {
                        Some(id) => writeln!(out, "  default:    {} -> {id}", summary.default)?,
                        None => writeln!(out, "  default:    {}", summary.default)?,
                    }
                    writeln!(out, "  operations: {}", summary.operations.join(", "))?;
                }
                Ok(())
            }
        }
    }
}
