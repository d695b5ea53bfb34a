//! Registration, login, logout and identity commands.

use std::io::{self, IsTerminal};

use anyhow::anyhow;
use mesto_core::{AppState, Credentials};

use crate::cli::{AuthArgs, OutputFormat};
use crate::client::{CliError, CliResult, require_success};
use crate::output::render_session;

pub(crate) async fn handle_register(app: &mut AppState, args: AuthArgs) -> CliResult<String> {
    let credentials = credentials_from(args)?;
    require_success(app.register(&credentials).await, "registration")?;
    // Let the post-registration redirect and reset run their course.
    app.settle().await;
    Ok(format!(
        "registered {}; sign in with `mesto login`",
        credentials.email
    ))
}

pub(crate) async fn handle_login(
    app: &mut AppState,
    args: AuthArgs,
    output: OutputFormat,
) -> CliResult<String> {
    let credentials = credentials_from(args)?;
    require_success(app.authenticate(&credentials).await, "login")?;
    render_session(app.session(), output)
}

pub(crate) fn handle_logout(app: &mut AppState) -> String {
    app.logout();
    "signed out".to_string()
}

pub(crate) fn handle_whoami(app: &AppState, output: OutputFormat) -> CliResult<String> {
    render_session(app.session(), output)
}

fn credentials_from(args: AuthArgs) -> CliResult<Credentials> {
    let email = args.email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(CliError::validation("email must be a valid address"));
    }
    let password = match args.password {
        Some(password) => password,
        None => prompt_password()?,
    };
    if password.is_empty() {
        return Err(CliError::validation("password cannot be empty"));
    }
    Ok(Credentials::new(email, password))
}

fn prompt_password() -> CliResult<String> {
    if io::stdin().is_terminal() {
        rpassword::prompt_password("Password: ").map_err(|err| {
            CliError::failure(anyhow!("failed to read password from stdin: {err}"))
        })
    } else {
        Err(CliError::validation(
            "password required; supply via --password or MESTO_PASSWORD when running non-interactively",
        ))
    }
}

#[cfg(test)]
mod tests {
    use mesto_core::{Route, TokenStore};
    use mesto_test_support::fixtures::{self, DEFAULT_EMAIL, DEFAULT_PASSWORD};
    use mesto_test_support::mocks::FakeBackend;

    use super::*;

    fn args(email: &str, password: &str) -> AuthArgs {
        AuthArgs {
            email: email.to_string(),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn malformed_email_is_rejected_before_any_request() {
        let err = credentials_from(args("not-an-email", "pw")).err();
        assert!(err.is_some_and(|e| e.exit_code() == 2));
        let err = credentials_from(args("a@b.com", "")).err();
        assert!(err.is_some_and(|e| e.display_message().contains("password")));
    }

    #[tokio::test]
    async fn login_then_logout_round_trip() -> CliResult<()> {
        let backend = FakeBackend::seeded(vec![fixtures::card("1", "u1", &[])]);
        let mut app = backend.app_state();

        let text = handle_login(
            &mut app,
            args(DEFAULT_EMAIL, DEFAULT_PASSWORD),
            OutputFormat::Table,
        )
        .await?;
        assert_eq!(text, "signed in as a@b.com (u1)");
        assert_eq!(backend.tokens().current().as_deref(), Some("token-u1"));

        assert_eq!(handle_logout(&mut app), "signed out");
        assert!(
            backend
                .tokens()
                .load()
                .map_err(CliError::failure)?
                .is_none()
        );
        assert_eq!(handle_whoami(&app, OutputFormat::Table)?, "not signed in");
        Ok(())
    }

    #[tokio::test]
    async fn wrong_password_exits_with_failure() {
        let backend = FakeBackend::seeded(Vec::new());
        let mut app = backend.app_state();
        let err = handle_login(&mut app, args(DEFAULT_EMAIL, "nope"), OutputFormat::Json)
            .await
            .err();
        assert!(err.is_some_and(|e| e.exit_code() == 3));
    }

    #[tokio::test(start_paused = true)]
    async fn register_waits_for_redirect() -> CliResult<()> {
        let backend = FakeBackend::new();
        let mut app = backend.app_state();

        let text = handle_register(&mut app, args("new@b.com", "pw123456")).await?;

        assert!(text.starts_with("registered new@b.com"));
        assert_eq!(app.shell().route(), Route::SignIn);
        assert!(!app.session_controller().registration_success());
        Ok(())
    }

    #[tokio::test]
    async fn duplicate_registration_is_a_validation_error() {
        let backend = FakeBackend::seeded(Vec::new());
        let mut app = backend.app_state();
        let err = handle_register(&mut app, args(DEFAULT_EMAIL, DEFAULT_PASSWORD))
            .await
            .err();
        assert!(err.is_some_and(|e| e.exit_code() == 2));
    }
}
