//! Validate command implementation

use super::groups::load_registry;
use super::Context;
use crate::error::CliError;
use crate::output::{write_json, OutputFormat};
use anyhow::Result;
use clap::Args;
use delegata_core::{language, DefaultDelegate, LanguageTables};
use serde::Serialize;
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Arguments for the validate command
#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Language table to validate (repeatable)
    #[arg(short = 'c', long = "language-config", value_name = "FILE")]
    pub language_configs: Vec<PathBuf>,

    /// Registry definition file to validate
    #[arg(short, long, value_name = "FILE")]
    pub registry: Option<PathBuf>,
}

/// Outcome for one file
#[derive(Debug, Serialize)]
pub struct FileReport {
    /// Checked file
    pub path: PathBuf,
    /// Whether the file is valid
    pub valid: bool,
    /// One-line summary or error
    pub message: String,
    /// Non-fatal findings
    pub warnings: Vec<String>,
}

impl FileReport {
    fn valid(path: &Path, message: String) -> Self {
        Self {
            path: path.to_path_buf(),
            valid: true,
            message,
            warnings: Vec::new(),
        }
    }

    fn invalid(path: &Path, error: &anyhow::Error) -> Self {
        Self {
            path: path.to_path_buf(),
            valid: false,
            message: format!("{error:#}"),
            warnings: Vec::new(),
        }
    }
}

impl ValidateArgs {
    /// Execute the validate command
    pub fn execute<W: Write>(&self, ctx: &Context, out: &mut W) -> Result<()> {
        // Without arguments, check the files named in the config
        let (language_configs, registry) =
            if self.language_configs.is_empty() && self.registry.is_none() {
                (
                    ctx.config.language.tables.clone(),
                    ctx.config.registry.file.clone(),
                )
            } else {
                (self.language_configs.clone(), self.registry.clone())
            };

        if language_configs.is_empty() && registry.is_none() {
            return Err(CliError::NothingToValidate.into());
        }

        let mut tables = LanguageTables::with_embedded();
        let mut reports = Vec::new();

        for path in &language_configs {
            log::debug!("Validating language table {}", path.display());
            match language::load_file(path) {
                Ok(defaults) => {
                    reports.push(FileReport::valid(
                        path,
                        format!(
                            "{} ({}) table",
                            defaults.language().name(),
                            defaults.language().code()
                        ),
                    ));
                    tables.insert(defaults);
                }
                Err(e) => reports.push(FileReport::invalid(path, &anyhow::Error::from(e))),
            }
        }

        if let Some(path) = &registry {
            log::debug!("Validating registry {}", path.display());
            reports.push(self.check_registry(path, &tables, ctx));
        }

        let failures = reports.iter().filter(|r| !r.valid).count();
        match ctx.format {
            OutputFormat::Json => write_json(out, &reports)?,
            OutputFormat::Text => {
                for report in &reports {
                    let mark = if report.valid { "✓" } else { "✗" };
                    writeln!(out, "{mark} {}: {}", report.path.display(), report.message)?;
                    for warning in &report.warnings {
                        writeln!(out, "  warning: {warning}")?;
                    }
                }
            }
        }

        if failures > 0 {
            return Err(CliError::ValidationFailed(failures).into());
        }
        Ok(())
    }

    fn check_registry(&self, path: &Path, tables: &LanguageTables, ctx: &Context) -> FileReport {
        let registry = match load_registry(path) {
            Ok(registry) => registry,
            Err(e) => return FileReport::invalid(path, &e),
        };

        // Operation names must be unique across groups
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for group in registry.groups() {
            for name in group.operation_names() {
                if let Some(first) = owners.insert(name, group.name()) {
                    let error = anyhow::anyhow!(
                        "operation '{name}' is defined by both {first} and {}",
                        group.name()
                    );
                    return FileReport::invalid(path, &error);
                }
            }
        }

        let mut report = FileReport::valid(
            path,
            format!("{} groups, {} operations", registry.len(), owners.len()),
        );

        // Language-table defaults outside the delegate list fail at call time
        let language_id = ctx.config.language.default_language.as_str();
        for group in registry.groups() {
            if group.default_delegate() != &DefaultDelegate::Language {
                continue;
            }
            match tables.resolve_default(language_id, group.kind(), group.name()) {
                Ok(id) if id.is_none() || group.has_delegate(&id) => {}
                Ok(id) => report.warnings.push(format!(
                    "{} defaults to '{id}' for {language_id}, which is not one of its delegates",
                    group.name()
                )),
                Err(e) => report.warnings.push(format!("{}: {e}", group.name())),
            }
        }

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn run(args: &ValidateArgs) -> (Result<()>, String) {
        let ctx = Context::default();
        let mut out = Vec::new();
        let result = args.execute(&ctx, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_validate_args_debug() {
        let args = ValidateArgs {
            language_configs: vec![PathBuf::from("french.toml")],
            registry: None,
        };

        let debug_str = format!("{:?}", args);
        assert!(debug_str.contains("ValidateArgs"));
        assert!(debug_str.contains("french.toml"));
    }

    #[test]
    fn test_valid_language_table() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "german.toml",
            r#"
[metadata]
code = "de"
name = "German"

[inflectors]
stem = ["snowball"]
"#,
        );

        let (result, output) = run(&ValidateArgs {
            language_configs: vec![path],
            registry: None,
        });
        assert!(result.is_ok());
        assert!(output.contains("✓"));
        assert!(output.contains("German (de) table"));
    }

    #[test]
    fn test_invalid_language_table() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "broken.toml",
            r#"
[metadata]
code = "xx"
name = "Nowhere"
"#,
        );

        let (result, output) = run(&ValidateArgs {
            language_configs: vec![path],
            registry: None,
        });
        let error = result.unwrap_err();
        assert!(matches!(
            error.downcast_ref::<CliError>(),
            Some(CliError::ValidationFailed(1))
        ));
        assert!(output.contains("✗"));
        assert!(output.contains("unknown language 'xx'"));
    }

    #[test]
    fn test_registry_with_warning() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "registry.toml",
            r#"
[[group]]
method = "tokenize"
name = "tokenizers"
kind = "processors"
delegates = ["punkt"]
"#,
        );

        let (result, output) = run(&ValidateArgs {
            language_configs: vec![],
            registry: Some(path),
        });
        assert!(result.is_ok());
        assert!(output.contains("1 groups, 1 operations"));
        assert!(output.contains("warning: tokenizers defaults to 'macintyre'"));
    }

    #[test]
    fn test_duplicate_operation_in_registry() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "registry.toml",
            r#"
[[group]]
method = "tag"
name = "tag"
kind = "lexicalizers"
delegates = ["brill"]

[group.presets.stem]
model = "small"

[[group]]
method = "stem"
name = "stem"
kind = "inflectors"
delegates = ["porter"]
"#,
        );

        let (result, output) = run(&ValidateArgs {
            language_configs: vec![],
            registry: Some(path),
        });
        assert!(result.is_err());
        assert!(output.contains("operation 'stem' is defined by both tag and stem"));
    }

    #[test]
    fn test_nothing_to_validate() {
        let (result, _) = run(&ValidateArgs {
            language_configs: vec![],
            registry: None,
        });
        assert!(matches!(
            result.unwrap_err().downcast_ref::<CliError>(),
            Some(CliError::NothingToValidate)
        ));
    }
}
