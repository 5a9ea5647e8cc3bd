use crate::decision::ConsentDecision;
use serde::Serialize;
use std::fmt;

/// Which surface the visitor currently sees.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    /// No decision yet and nothing shown (loading, or waiting on the banner delay).
    Unset,
    BannerShown,
    ModalShown,
    /// A decision exists and neither banner nor modal is shown.
    Resolved,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Phase::Unset => "unset",
            Phase::BannerShown => "banner",
            Phase::ModalShown => "modal",
            Phase::Resolved => "resolved",
        })
    }
}

/// In-memory consent state for one page session. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControllerState {
    pub decision: Option<ConsentDecision>,
    pub banner_visible: bool,
    pub modal_visible: bool,
    /// The analytics checkbox in the settings panel. Only committed on save.
    pub pending_analytics: bool,
}

impl ControllerState {
    pub fn new() -> Self {
        Self {
            decision: None,
            banner_visible: false,
            modal_visible: false,
            pending_analytics: true,
        }
    }

    pub fn phase(&self) -> Phase {
        debug_assert!(!(self.banner_visible && self.modal_visible));
        if self.modal_visible {
            Phase::ModalShown
        } else if self.banner_visible {
            Phase::BannerShown
        } else if self.decision.is_some() {
            Phase::Resolved
        } else {
            Phase::Unset
        }
    }

    /// Checkbox value the modal falls back to when opened or dismissed.
    pub(crate) fn committed_analytics(&self) -> bool {
        self.decision.as_ref().map_or(true, |d| d.analytics)
    }
}

impl Default for ControllerState {
    fn default() -> Self {
        Self::new()
    }
}

/// What a view needs to render, handed to subscribers after each change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConsentSnapshot {
    pub phase: Phase,
    pub banner_visible: bool,
    pub modal_visible: bool,
    pub pending_analytics: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<ConsentDecision>,
}

impl From<&ControllerState> for ConsentSnapshot {
    fn from(state: &ControllerState) -> Self {
        Self {
            phase: state.phase(),
            banner_visible: state.banner_visible,
            modal_visible: state.modal_visible,
            pending_analytics: state.pending_analytics,
            decision: state.decision.clone(),
        }
    }
}
