use crate::decision::ConsentDecision;
use crate::gate::AnalyticsGate;
use crate::state::{ConsentSnapshot, ControllerState, Phase};
use crate::store::ConsentStore;
use crate::timer::{BannerTimer, TimerToken};

/// Result of [`ConsentController::init`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Init {
    /// A stored decision was found and adopted; nothing will be shown.
    Adopted(ConsentDecision),
    /// No usable decision. The host must call
    /// [`ConsentController::banner_timer_fired`] with this token after the
    /// configured banner delay.
    BannerPending(TimerToken),
    AlreadyInitialized,
}

/// Result of feeding one event into the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The event does not apply in the current phase. State is unchanged.
    Ignored { phase: Phase },
    Moved { from: Phase, to: Phase },
    /// A new decision took effect. `saved` is false if persisting it failed.
    Committed {
        from: Phase,
        analytics: bool,
        saved: bool,
    },
}

impl Outcome {
    pub fn is_ignored(&self) -> bool {
        matches!(self, Outcome::Ignored { .. })
    }
}

/// The consent state machine for one page session.
///
/// Owns the volatile [`ControllerState`], reads the stored decision once at
/// [`init`](Self::init) and writes a full replacement on every commit.
pub struct ConsentController<S, G> {
    store: S,
    gate: G,
    state: ControllerState,
    timer: BannerTimer,
    initialized: bool,
}

impl<S: ConsentStore, G: AnalyticsGate> ConsentController<S, G> {
    pub fn new(store: S, gate: G) -> Self {
        Self {
            store,
            gate,
            state: ControllerState::new(),
            timer: BannerTimer::new(),
            initialized: false,
        }
    }

    /// Load the stored decision. Runs once per session.
    pub fn init(&mut self) -> Init {
        if self.initialized {
            return Init::AlreadyInitialized;
        }
        self.initialized = true;

        match self.store.load() {
            Some(decision) => {
                tracing::debug!(analytics = decision.analytics, "adopted stored consent");
                self.state.pending_analytics = decision.analytics;
                self.state.decision = Some(decision.clone());
                self.gate.on_consent_resolved(decision.analytics);
                Init::Adopted(decision)
            }
            None => {
                tracing::debug!("no stored consent, banner pending");
                Init::BannerPending(self.timer.arm())
            }
        }
    }

    /// Timer callback for the delayed banner. A cancelled or stale token,
    /// or one arriving after a decision exists, changes nothing.
    pub fn banner_timer_fired(&mut self, token: TimerToken) -> Outcome {
        let from = self.phase();
        if !self.timer.fire(token) || from != Phase::Unset || self.state.decision.is_some() {
            return Outcome::Ignored { phase: from };
        }
        self.state.banner_visible = true;
        self.moved(from)
    }

    /// "Accept all": commit `analytics = true` from any phase.
    pub fn accept_all(&mut self) -> Outcome {
        if !self.initialized {
            return Outcome::Ignored { phase: self.phase() };
        }
        self.commit(true)
    }

    /// Show the settings panel.
    pub fn open_settings(&mut self) -> Outcome {
        let from = self.phase();
        match from {
            Phase::BannerShown => {
                self.state.banner_visible = false;
            }
            Phase::Resolved => {
                self.state.pending_analytics = self.state.committed_analytics();
            }
            Phase::Unset if self.timer.is_armed() => {
                self.timer.cancel();
            }
            _ => return Outcome::Ignored { phase: from },
        }
        self.state.modal_visible = true;
        self.moved(from)
    }

    /// Dismiss the settings panel without saving. The checkbox value is
    /// discarded; the banner comes back if nothing was ever decided.
    pub fn close_settings(&mut self) -> Outcome {
        let from = self.phase();
        if from != Phase::ModalShown {
            return Outcome::Ignored { phase: from };
        }
        self.state.modal_visible = false;
        self.state.pending_analytics = self.state.committed_analytics();
        if self.state.decision.is_none() {
            self.state.banner_visible = true;
        }
        self.moved(from)
    }

    /// Flip the analytics checkbox. Nothing is persisted.
    pub fn toggle_analytics(&mut self, value: bool) -> Outcome {
        let from = self.phase();
        if from != Phase::ModalShown {
            return Outcome::Ignored { phase: from };
        }
        self.state.pending_analytics = value;
        self.moved(from)
    }

    /// Commit the checkbox value.
    pub fn save_preferences(&mut self) -> Outcome {
        let from = self.phase();
        if from != Phase::ModalShown {
            return Outcome::Ignored { phase: from };
        }
        self.commit(self.state.pending_analytics)
    }

    fn commit(&mut self, analytics: bool) -> Outcome {
        let from = self.phase();
        self.timer.cancel();

        let decision = ConsentDecision::new(analytics);
        let saved = match self.store.save(&decision) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "failed to persist consent; keeping it for this session");
                false
            }
        };

        self.state.decision = Some(decision);
        self.state.banner_visible = false;
        self.state.modal_visible = false;
        self.state.pending_analytics = analytics;

        self.gate.on_consent_resolved(analytics);
        tracing::debug!(from = %from, analytics, saved, "consent committed");
        Outcome::Committed {
            from,
            analytics,
            saved,
        }
    }

    fn moved(&self, from: Phase) -> Outcome {
        let to = self.phase();
        tracing::debug!(from = %from, to = %to, "consent transition");
        Outcome::Moved { from, to }
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn state(&self) -> &ControllerState {
        &self.state
    }

    pub fn snapshot(&self) -> ConsentSnapshot {
        ConsentSnapshot::from(&self.state)
    }

    pub fn decision(&self) -> Option<&ConsentDecision> {
        self.state.decision.as_ref()
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Whether the banner timer is still waiting to fire.
    pub fn banner_pending(&self) -> bool {
        self.timer.is_armed()
    }
}
