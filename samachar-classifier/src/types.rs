//! Wire types exchanged with the classification service.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Body of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassificationRequest {
    pub text: String,
}

impl ClassificationRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    /// Whether the text has anything besides whitespace in it.
    pub fn is_submittable(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

/// Successful reply of `POST /predict`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub category: String,
    /// Probability-like score in `[0, 1]`.
    pub confidence: f64,
}

impl ClassificationResult {
    /// Confidence as a percentage with one decimal place. Ties round up.
    ///
    /// ```
    /// use samachar_classifier::ClassificationResult;
    ///
    /// let r = ClassificationResult { category: "Politics".into(), confidence: 0.873 };
    /// assert_eq!(r.confidence_percent(), "87.3%");
    /// ```
    pub fn confidence_percent(&self) -> String {
        let pct = self.confidence * 100.0;
        // only x.25 and x.75 sit exactly between two tenths; `{:.1}` sends those to even
        let quarters = pct * 4.0;
        if quarters.fract() == 0.0 && quarters % 2.0 != 0.0 {
            format!("{:.1}%", (pct * 10.0 + 0.5) / 10.0)
        } else {
            format!("{pct:.1}%")
        }
    }
}

/// Reply of `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    #[serde(default)]
    pub models: BTreeMap<String, bool>,
    #[serde(default)]
    pub message: String,
}

impl HealthReport {
    pub fn is_healthy(&self) -> bool {
        self.status.eq_ignore_ascii_case("healthy")
    }

    /// Names of the model artefacts the service failed to load.
    pub fn missing_models(&self) -> Vec<&str> {
        self.models
            .iter()
            .filter(|(_, loaded)| !**loaded)
            .map(|(name, _)| name.as_str())
            .collect()
    }
}

/// Reply of `GET /`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub message: String,
    pub status: String,
    #[serde(default)]
    pub models_loaded: bool,
}

/// Reply of `POST /reload-models`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReloadReport {
    pub message: String,
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn percent_rounds_to_one_decimal() {
        let r = |c| ClassificationResult {
            category: "Sports".into(),
            confidence: c,
        };
        assert_eq!(r(1.0).confidence_percent(), "100.0%");
        assert_eq!(r(0.0).confidence_percent(), "0.0%");
        assert_eq!(r(0.5).confidence_percent(), "50.0%");
        assert_eq!(r(0.99949).confidence_percent(), "99.9%");
    }

    #[test]
    fn percent_rounds_exact_ties_up() {
        let r = |c| ClassificationResult {
            category: "Economy".into(),
            confidence: c,
        };
        assert_eq!(r(0.3625).confidence_percent(), "36.3%");
        assert_eq!(r(0.0125).confidence_percent(), "1.3%");
        assert_eq!(r(0.0075).confidence_percent(), "0.8%");
        // 0.8765 * 100 lands just below 87.65
        assert_eq!(r(0.8765).confidence_percent(), "87.6%");
    }

    #[test]
    fn blank_requests_are_not_submittable() {
        assert!(!ClassificationRequest::new("  \n\t ").is_submittable());
        assert!(ClassificationRequest::new(" काठमाडौं ").is_submittable());
    }

    #[test]
    fn health_lists_missing_models() {
        let report: HealthReport = serde_json::from_value(json!({
            "status": "unhealthy",
            "models": {
                "svm_model": true,
                "tfidf_vectorizer": false,
                "label_encoder": false
            },
            "message": "Some models failed to load"
        }))
        .unwrap();

        assert!(!report.is_healthy());
        assert_eq!(
            report.missing_models(),
            vec!["label_encoder", "tfidf_vectorizer"]
        );
    }
}
