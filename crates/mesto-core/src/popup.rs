//! Single-active popup orchestration.
//!
//! # Design
//! - One enum value models every modal, so two popups can never be open at once.
//! - The image preview keeps its card for a short grace period after closing
//!   so the exit transition still has content to render.

use std::time::Duration;

use tokio::time::Instant;

use crate::models::{Card, CardId};

/// How long the preview card stays displayable after the preview closes.
pub const PREVIEW_GRACE: Duration = Duration::from_millis(400);

/// The popup currently shown, if any.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PopupState {
    /// No popup is open.
    #[default]
    None,
    /// Profile name/about form.
    EditProfile,
    /// Avatar link form.
    EditAvatar,
    /// New card form.
    AddPlace,
    /// Delete confirmation for the given card.
    ConfirmDelete {
        /// Card awaiting confirmation.
        card_id: CardId,
    },
    /// Full-size image preview.
    ViewImage(Card),
    /// Result notification after registration or login.
    InfoTooltip {
        /// Whether the tooltip reports success.
        success: bool,
    },
}

impl PopupState {
    /// Whether any popup is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        !matches!(self, Self::None)
    }
}

/// Element that received a click while a popup was open.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the popup.
    Backdrop,
    /// A designated close button.
    CloseButton,
    /// Anything inside the popup body.
    Content,
}

/// Tracks the active popup and the lingering preview card.
#[derive(Clone, Debug, Default)]
pub struct PopupOrchestrator {
    active: PopupState,
    preview: Option<Card>,
    preview_clear_at: Option<Instant>,
}

impl PopupOrchestrator {
    /// Create an orchestrator with nothing open.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently active popup.
    #[must_use]
    pub const fn active(&self) -> &PopupState {
        &self.active
    }

    /// Whether any popup is open.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.active.is_open()
    }

    /// Open `popup`, replacing whatever was open.
    pub fn open(&mut self, popup: PopupState) {
        if let PopupState::ViewImage(card) = &popup {
            self.preview = Some(card.clone());
            self.preview_clear_at = None;
        } else if matches!(self.active, PopupState::ViewImage(_)) {
            self.schedule_preview_clear(Instant::now());
        }
        self.active = popup;
    }

    /// Close whatever is open.
    pub fn close_all(&mut self) {
        if matches!(self.active, PopupState::ViewImage(_)) {
            self.schedule_preview_clear(Instant::now());
        }
        self.active = PopupState::None;
    }

    /// Close only when the click landed on the backdrop or a close button.
    /// Returns whether the popup closed.
    pub fn dismiss_on_outside_click(&mut self, target: ClickTarget) -> bool {
        match target {
            ClickTarget::Backdrop | ClickTarget::CloseButton if self.is_open() => {
                self.close_all();
                true
            }
            _ => false,
        }
    }

    /// Card the preview should render: the open one, or the one still fading out.
    #[must_use]
    pub const fn displayed_preview(&self) -> Option<&Card> {
        self.preview.as_ref()
    }

    /// Earliest pending deadline.
    #[must_use]
    pub const fn next_deadline(&self) -> Option<Instant> {
        self.preview_clear_at
    }

    /// Apply deadlines that have passed as of `now`.
    pub fn run_due_timers(&mut self, now: Instant) {
        if self.preview_clear_at.is_some_and(|at| at <= now) {
            self.preview = None;
            self.preview_clear_at = None;
        }
    }

    fn schedule_preview_clear(&mut self, now: Instant) {
        self.preview_clear_at = Some(now + PREVIEW_GRACE);
    }
}
