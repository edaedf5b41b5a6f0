use crate::types::ClassificationResult;

/// Where the most recent classification attempt stands.
///
/// A tagged outcome rather than two optional fields, so a result and an
/// error can never be present at the same time.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Outcome {
    #[default]
    Idle,
    Loading,
    Success(ClassificationResult),
    Failure(String),
}

/// Identifies one issued request; only the latest ticket may resolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(pub(crate) u64);

impl Ticket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// The interaction state owned by the [`crate::Coordinator`].
///
/// Everything else reads it through a shared reference; only the
/// coordinator can change it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InteractionState {
    outcome: Outcome,
}

impl InteractionState {
    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.outcome, Outcome::Loading)
    }

    pub fn result(&self) -> Option<&ClassificationResult> {
        match &self.outcome {
            Outcome::Success(result) => Some(result),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Failure(message) => Some(message),
            _ => None,
        }
    }

    pub(crate) fn set(&mut self, outcome: Outcome) {
        self.outcome = outcome;
    }
}
