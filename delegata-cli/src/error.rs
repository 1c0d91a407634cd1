//! Error handling for the CLI application

use std::fmt;

/// Custom error type for CLI-specific errors
#[derive(Debug)]
pub enum CliError {
    /// A command needs a registry file and none was given
    MissingRegistry,
    /// `validate` was run with nothing to check
    NothingToValidate,
    /// One or more configuration files failed validation
    ValidationFailed(usize),
    /// Configuration error
    ConfigError(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::MissingRegistry => write!(
                f,
                "No registry file given; pass --registry or set [registry] file in the config"
            ),
            CliError::NothingToValidate => write!(f, "Nothing to validate"),
            CliError::ValidationFailed(count) => {
                write!(f, "Validation failed with {count} error(s)")
            }
            CliError::ConfigError(msg) => write!(f, "Configuration error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {}

/// Result type alias for CLI operations
pub type CliResult<T> = Result<T, anyhow::Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_failed_display() {
        let error = CliError::ValidationFailed(2);
        assert_eq!(error.to_string(), "Validation failed with 2 error(s)");
    }

    #[test]
    fn test_config_error_display() {
        let error = CliError::ConfigError("unknown field `langauge`".to_string());
        assert_eq!(
            error.to_string(),
            "Configuration error: unknown field `langauge`"
        );
    }

    #[test]
    fn test_missing_registry_mentions_flag() {
        assert!(CliError::MissingRegistry.to_string().contains("--registry"));
    }

    #[test]
    fn test_converts_into_anyhow() {
        let failure: CliResult<()> = Err(CliError::NothingToValidate.into());
        let error = failure.unwrap_err();
        assert!(error.downcast_ref::<CliError>().is_some());
        assert_eq!(error.to_string(), "Nothing to validate");
    }
}
