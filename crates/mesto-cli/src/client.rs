//! Shared wiring and error types for the CLI.

use std::fmt::{self, Display, Formatter};
use std::sync::Arc;

use anyhow::anyhow;
use mesto_client::{FileTokenStore, MestoClient};
use mesto_config::{ClientConfig, ConfigError};
use mesto_core::{ApiError, AppState, Outcome};

/// CLI-level error type to distinguish validation from operational failures.
#[derive(Debug)]
pub(crate) enum CliError {
    Validation(String),
    Failure(anyhow::Error),
}

/// Convenience alias for functions returning a `CliError`.
pub(crate) type CliResult<T> = Result<T, CliError>;

impl CliError {
    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub(crate) fn failure(error: impl Into<anyhow::Error>) -> Self {
        Self::Failure(error.into())
    }

    pub(crate) const fn exit_code(&self) -> i32 {
        match self {
            Self::Validation(_) => 2,
            Self::Failure(_) => 3,
        }
    }

    pub(crate) fn display_message(&self) -> String {
        match self {
            Self::Validation(message) => message.clone(),
            Self::Failure(error) => format!("{error:#}"),
        }
    }
}

impl Display for CliError {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> fmt::Result {
        formatter.write_str("cli error")
    }
}

impl std::error::Error for CliError {}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        Self::validation(err.to_string())
    }
}

/// Classify a backend error: rejected input is a validation error, the rest
/// are operational failures.
pub(crate) fn classify_api_error(err: ApiError) -> CliError {
    match err {
        ApiError::Validation { .. } => CliError::validation(err.to_string()),
        ApiError::Http {
            status: 400 | 409 | 422,
            ref message,
        } => CliError::validation(message.clone()),
        other => CliError::failure(other),
    }
}

/// Turn an action outcome into a CLI result.
pub(crate) fn require_success(outcome: Outcome, action: &str) -> CliResult<()> {
    match outcome {
        Outcome::Success | Outcome::Unchanged => Ok(()),
        Outcome::Declined => Err(CliError::failure(anyhow!(
            "{action} was declined by the server"
        ))),
        Outcome::Busy => Err(CliError::failure(anyhow!(
            "{action} skipped: another action is still in flight"
        ))),
        Outcome::Failed(err) => Err(classify_api_error(err)),
    }
}

/// Fail unless the persisted token resolved to a session.
pub(crate) fn require_session(app: &AppState) -> CliResult<()> {
    if app.session().is_logged_in {
        Ok(())
    } else {
        Err(CliError::validation(
            "not signed in; run `mesto login` first",
        ))
    }
}

/// Build the application state from effective configuration.
pub(crate) fn build_app(config: &ClientConfig) -> CliResult<AppState> {
    let tokens = Arc::new(FileTokenStore::new(config.token_path.clone()));
    let client = MestoClient::new(config.api_url.clone(), config.timeout, tokens.clone())
        .map_err(|err| CliError::failure(anyhow!("failed to build HTTP client: {err}")))?;
    let client = Arc::new(client);
    Ok(AppState::new(client.clone(), client, tokens))
}
