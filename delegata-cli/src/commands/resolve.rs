//! Resolve command implementation

use super::Context;
use crate::output::{write_json, OutputFormat};
use anyhow::Result;
use clap::Args;
use delegata_core::{Kind, Language};
use serde::Serialize;
use std::io::Write;

/// Arguments for the resolve command
#[derive(Debug, Args)]
pub struct ResolveArgs {
    /// Language code or name (default: from config)
    #[arg(short, long)]
    pub language: Option<String>,

    /// Group category (extractors, processors, lexicalizers, inflectors)
    #[arg(short, long)]
    pub kind: Kind,

    /// Group name within the category (e.g. tokenizers)
    #[arg(short, long)]
    pub group: String,
}

/// Resolution result
#[derive(Debug, Serialize)]
pub struct Resolution {
    /// Canonical language name
    pub language: Language,
    /// Group category
    pub kind: Kind,
    /// Group name
    pub group: String,
    /// Primary default
    pub default: String,
    /// Full ordered chain
    pub chain: Vec<String>,
}

impl ResolveArgs {
    /// Execute the resolve command
    pub fn execute<W: Write>(&self, ctx: &Context, out: &mut W) -> Result<()> {
        let language_id = self
            .language
            .as_deref()
            .unwrap_or(ctx.config.language.default_language.as_str());
        let resolution = self.resolve(ctx, language_id)?;

        match ctx.format {
            OutputFormat::Json => write_json(out, &resolution),
            OutputFormat::Text => {
                writeln!(
                    out,
                    "{} {} ({}): {}",
                    resolution.language, resolution.group, resolution.kind, resolution.default
                )?;
                writeln!(out, "  chain: {}", resolution.chain.join(" -> "))?;
                Ok(())
            }
        }
    }

    fn resolve(&self, ctx: &Context, language_id: &str) -> Result<Resolution> {
        let tables = ctx.config.language_tables()?;
        let default = tables.resolve_default(language_id, self.kind, &self.group)?;
        let chain = tables.chain(language_id, self.kind, &self.group)?;
        log::debug!("Resolved {} for {language_id}: {default}", self.group);

        Ok(Resolution {
            language: Language::describe(language_id)?,
            kind: self.kind,
            group: self.group.clone(),
            default: default.to_string(),
            chain: chain.iter().map(ToString::to_string).collect(),
        })
    }
}
