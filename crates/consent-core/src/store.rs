use crate::decision::ConsentDecision;
use crate::error::ConsentError;

/// Durable home of the consent decision.
pub trait ConsentStore {
    /// Read the saved decision. Missing, unreadable and malformed records
    /// all come back as `None`.
    fn load(&self) -> Option<ConsentDecision>;

    /// Replace the saved decision.
    fn save(&mut self, decision: &ConsentDecision) -> Result<(), ConsentError>;
}
