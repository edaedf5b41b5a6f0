//! Classification client and interaction state for Samachar.
//!
//! This crate talks to the remote news classification service and owns the
//! state of the most recent attempt. Presentation layers hold a
//! [`Coordinator`], call [`Coordinator::dispatch`] (or the awaiting
//! [`Coordinator::classify`]) and render from [`Coordinator::state`].
//!
//! # Examples
//! ```no_run
//! use samachar_classifier::{Coordinator, PredictClient};
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() -> samachar_common::Result<()> {
//! let client = PredictClient::new("http://localhost:8000")?;
//! let mut coordinator = Coordinator::new(Arc::new(client));
//! coordinator.classify("नेपालमा आज...").await;
//! if let Some(result) = coordinator.state().result() {
//!     println!("{} ({})", result.category, result.confidence_percent());
//! }
//! # Ok(())
//! # }
//! ```
pub mod coordinator;
pub mod error;
pub mod service;
pub mod state;
pub mod types;

pub use coordinator::{ClassifyOutcome, Coordinator};
pub use error::{ClassificationFailed, FALLBACK_MESSAGE};
pub use service::{Classifier, PredictClient};
pub use state::{InteractionState, Outcome, Ticket};
pub use types::{
    ClassificationRequest, ClassificationResult, HealthReport, ReloadReport, ServiceStatus,
};
