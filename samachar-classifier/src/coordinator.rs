use crate::error::ClassificationFailed;
use crate::service::Classifier;
use crate::state::{InteractionState, Outcome, Ticket};
use crate::types::{ClassificationRequest, ClassificationResult};
use std::future::Future;
use std::sync::Arc;

pub type ClassifyOutcome = Result<ClassificationResult, ClassificationFailed>;

/// Owns the [`InteractionState`] and performs classification on behalf of
/// the input card.
///
/// Every request is tagged with a [`Ticket`]. When two requests overlap,
/// the last one issued wins: resolutions carrying an older ticket are
/// dropped without touching the state.
pub struct Coordinator {
    classifier: Arc<dyn Classifier>,
    state: InteractionState,
    issued: u64,
}

impl Coordinator {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self {
            classifier,
            state: InteractionState::default(),
            issued: 0,
        }
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn classifier(&self) -> Arc<dyn Classifier> {
        Arc::clone(&self.classifier)
    }

    /// Enter `Loading`, clearing any previous result or error.
    pub fn begin(&mut self) -> Ticket {
        self.issued += 1;
        self.state.set(Outcome::Loading);
        tracing::debug!(generation = self.issued, "classification started");
        Ticket(self.issued)
    }

    /// Start a request and hand back the future that performs it.
    ///
    /// The state is already `Loading` when this returns; the caller drives
    /// the future wherever it likes and feeds its output to
    /// [`Coordinator::resolve`] together with the ticket.
    pub fn dispatch(
        &mut self,
        text: impl Into<String>,
    ) -> (Ticket, impl Future<Output = ClassifyOutcome> + Send + 'static) {
        let ticket = self.begin();
        let classifier = Arc::clone(&self.classifier);
        let request = ClassificationRequest::new(text);
        let pending = async move { perform(classifier.as_ref(), &request).await };
        (ticket, pending)
    }

    /// Apply a finished request. Returns `false` when the ticket is stale.
    pub fn resolve(&mut self, ticket: Ticket, outcome: ClassifyOutcome) -> bool {
        if ticket.0 != self.issued || !self.state.is_loading() {
            tracing::debug!(
                generation = ticket.0,
                latest = self.issued,
                "dropping stale classification outcome"
            );
            return false;
        }
        let next = match outcome {
            Ok(result) => Outcome::Success(result),
            Err(failed) => Outcome::Failure(failed.message),
        };
        self.state.set(next);
        true
    }

    /// Classify `text` and wait for the state to settle.
    pub async fn classify(&mut self, text: &str) {
        let (ticket, pending) = self.dispatch(text);
        let outcome = pending.await;
        self.resolve(ticket, outcome);
    }
}

async fn perform(classifier: &dyn Classifier, request: &ClassificationRequest) -> ClassifyOutcome {
    classifier.classify(request).await.map_err(|err| {
        tracing::warn!(
            error = %err,
            status = ?err.status(),
            endpoint = classifier.endpoint(),
            "classification failed"
        );
        ClassificationFailed::from(&err)
    })
}
