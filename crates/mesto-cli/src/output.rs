//! Output renderers for CLI commands.

use std::fmt::Write as _;

use anyhow::anyhow;
use mesto_core::{Card, Session, UserProfile};
use serde::Serialize;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

fn to_json<T: Serialize + ?Sized>(value: &T) -> CliResult<String> {
    serde_json::to_string_pretty(value)
        .map_err(|err| CliError::failure(anyhow!("failed to format JSON: {err}")))
}

pub(crate) fn render_profile(profile: &UserProfile, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(profile),
        OutputFormat::Table => Ok(format!(
            "id: {}\nemail: {}\nname: {}\nabout: {}\navatar: {}",
            profile.id, profile.email, profile.name, profile.about, profile.avatar_url
        )),
    }
}

pub(crate) fn render_session(session: &Session, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(&serde_json::json!({
            "logged_in": session.is_logged_in,
            "user": session.user,
        })),
        OutputFormat::Table if session.is_logged_in => Ok(format!(
            "signed in as {} ({})",
            session.user.email, session.user.id
        )),
        OutputFormat::Table => Ok("not signed in".to_string()),
    }
}

/// `viewer` marks the cards the current user liked and owns.
pub(crate) fn render_cards(
    cards: &[Card],
    viewer: &str,
    format: OutputFormat,
) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(cards),
        OutputFormat::Table => {
            let mut out = format!("{:<26} {:>5} {:<4} {:<24} LINK", "ID", "LIKES", "", "NAME");
            for card in cards {
                let marks = format!(
                    "{}{}",
                    if card.is_liked_by(viewer) { '♥' } else { ' ' },
                    if card.is_owned_by(viewer) { '*' } else { ' ' },
                );
                let _ = write!(
                    out,
                    "\n{:<26} {:>5} {:<4} {:<24} {}",
                    card.id,
                    card.like_count(),
                    marks,
                    truncate(&card.name, 24),
                    card.image_url
                );
            }
            Ok(out)
        }
    }
}

pub(crate) fn render_card(card: &Card, viewer: &str, format: OutputFormat) -> CliResult<String> {
    match format {
        OutputFormat::Json => to_json(card),
        OutputFormat::Table => {
            let mut out = format!(
                "id: {}\nname: {}\nlink: {}\nlikes: {}",
                card.id,
                card.name,
                card.image_url,
                card.like_count()
            );
            if card.is_liked_by(viewer) {
                out.push_str(" (including you)");
            }
            if let Some(created_at) = card.created_at {
                let _ = write!(out, "\ncreated: {}", created_at.to_rfc3339());
            }
            Ok(out)
        }
    }
}

fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_string();
    }
    let mut shortened: String = value.chars().take(max.saturating_sub(1)).collect();
    shortened.push('…');
    shortened
}

#[cfg(test)]
mod tests {
    use mesto_test_support::fixtures;

    use super::*;

    #[test]
    fn card_table_marks_viewer_likes_and_ownership() -> CliResult<()> {
        let cards = vec![
            fixtures::card("1", "u1", &["u1", "u2"]),
            fixtures::card("2", "u2", &[]),
        ];
        let table = render_cards(&cards, "u1", OutputFormat::Table)?;
        let lines: Vec<_> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID"));
        assert!(lines[1].contains("♥*"));
        assert!(lines[1].contains("    2 "));
        assert!(!lines[2].contains('♥'));
        Ok(())
    }

    #[test]
    fn json_uses_backend_field_names() -> CliResult<()> {
        let card = fixtures::card("5", "u1", &["u1"]);
        let text = render_card(&card, "u1", OutputFormat::Json)?;
        let value: serde_json::Value = serde_json::from_str(&text)
            .map_err(|err| CliError::failure(anyhow!("bad JSON: {err}")))?;
        assert_eq!(value["_id"], "5");
        assert_eq!(value["link"], "https://pictures.example.com/5.jpg");
        assert_eq!(value["likes"], serde_json::json!(["u1"]));
        Ok(())
    }

    #[test]
    fn profile_and_session_tables() -> CliResult<()> {
        let profile = fixtures::profile("u1", "a@b.com");
        let text = render_profile(&profile, OutputFormat::Table)?;
        assert!(text.contains("name: Jacques Cousteau"));

        let session = Session::default();
        assert_eq!(render_session(&session, OutputFormat::Table)?, "not signed in");
        Ok(())
    }

    #[test]
    fn long_names_are_truncated() {
        assert_eq!(truncate("Kamchatka peninsula volcanoes", 10), "Kamchatka…");
        assert_eq!(truncate("Baikal", 10), "Baikal");
    }
}
