/// Loader/blocker for third-party analytics scripts.
///
/// Called once each time a decision is adopted or committed.
pub trait AnalyticsGate {
    fn on_consent_resolved(&mut self, analytics: bool);
}

impl<F: FnMut(bool)> AnalyticsGate for F {
    fn on_consent_resolved(&mut self, analytics: bool) {
        self(analytics)
    }
}
