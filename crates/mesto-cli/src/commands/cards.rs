//! Card gallery commands.

use anyhow::anyhow;
use mesto_config::validate_link;
use mesto_core::AppState;

use crate::cli::{CardAddArgs, CardIdArgs, OutputFormat};
use crate::client::{CliError, CliResult, require_session, require_success};
use crate::output::{render_card, render_cards};

pub(crate) fn handle_cards_list(app: &AppState, output: OutputFormat) -> CliResult<String> {
    require_session(app)?;
    render_cards(app.cards(), &app.profile().id, output)
}

pub(crate) async fn handle_cards_add(
    app: &mut AppState,
    args: CardAddArgs,
    output: OutputFormat,
) -> CliResult<String> {
    require_session(app)?;
    let name = args.name.trim();
    if name.is_empty() {
        return Err(CliError::validation("card name cannot be empty"));
    }
    let link = args.link.trim();
    validate_link(link)?;

    require_success(app.add_card(name, link).await, "card upload")?;
    let card = app
        .cards()
        .last()
        .ok_or_else(|| CliError::failure(anyhow!("created card missing from gallery")))?;
    render_card(card, &app.profile().id, output)
}

pub(crate) async fn handle_cards_remove(app: &mut AppState, args: CardIdArgs) -> CliResult<String> {
    require_session(app)?;
    let card = app
        .gallery()
        .card(&args.id)
        .ok_or_else(|| CliError::validation(format!("no card with id {}", args.id)))?;
    if !card.is_owned_by(&app.profile().id) {
        return Err(CliError::validation("only your own cards can be deleted"));
    }

    app.request_delete(&args.id);
    require_success(app.confirm_pending_delete().await, "card deletion")?;
    Ok(format!("deleted card {}", args.id))
}

pub(crate) async fn handle_cards_like(
    app: &mut AppState,
    args: CardIdArgs,
    output: OutputFormat,
) -> CliResult<String> {
    require_session(app)?;
    require_success(app.toggle_like(&args.id).await, "like")?;
    let card = app
        .gallery()
        .card(&args.id)
        .ok_or_else(|| CliError::failure(anyhow!("card {} vanished after update", args.id)))?;
    render_card(card, &app.profile().id, output)
}

#[cfg(test)]
mod tests {
    use mesto_test_support::fixtures;
    use mesto_test_support::mocks::FakeBackend;

    use super::*;

    async fn signed_in(cards: Vec<mesto_core::Card>) -> (std::sync::Arc<FakeBackend>, AppState) {
        let backend = FakeBackend::seeded(cards);
        backend.sign_in_as("u1");
        let mut app = backend.app_state();
        app.check_persisted_token().await;
        backend.clear_calls();
        (backend, app)
    }

    #[tokio::test]
    async fn add_renders_the_created_card() -> CliResult<()> {
        let (backend, mut app) = signed_in(vec![fixtures::card("1", "u1", &[])]).await;
        let text = handle_cards_add(
            &mut app,
            CardAddArgs {
                name: "Peaks".into(),
                link: "http://x.com/p.jpg".into(),
            },
            OutputFormat::Table,
        )
        .await?;
        assert!(text.starts_with("id: 2\nname: Peaks"));
        assert_eq!(backend.stored_cards().len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn invalid_link_never_reaches_the_backend() {
        let (backend, mut app) = signed_in(Vec::new()).await;
        let err = handle_cards_add(
            &mut app,
            CardAddArgs {
                name: "Peaks".into(),
                link: "peaks.jpg".into(),
            },
            OutputFormat::Table,
        )
        .await
        .err();
        assert!(err.is_some_and(|e| e.exit_code() == 2));
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn remove_checks_ownership_first() -> CliResult<()> {
        let (backend, mut app) = signed_in(vec![
            fixtures::card("1", "u1", &[]),
            fixtures::card("2", "u2", &[]),
        ])
        .await;

        let err = handle_cards_remove(&mut app, CardIdArgs { id: "2".into() })
            .await
            .err();
        assert!(err.is_some_and(|e| e.exit_code() == 2));
        assert!(backend.calls().is_empty());

        let text = handle_cards_remove(&mut app, CardIdArgs { id: "1".into() }).await?;
        assert_eq!(text, "deleted card 1");
        assert_eq!(app.cards().len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn like_toggles_and_lists_marker() -> CliResult<()> {
        let (backend, mut app) = signed_in(vec![fixtures::card("5", "u2", &["u1"])]).await;

        let text = handle_cards_like(&mut app, CardIdArgs { id: "5".into() }, OutputFormat::Table)
            .await?;
        assert!(text.contains("likes: 0"));
        assert_eq!(backend.count("DELETE", "/cards/5/likes"), 1);

        let table = handle_cards_list(&app, OutputFormat::Table)?;
        assert!(!table.contains('♥'));
        Ok(())
    }
}
