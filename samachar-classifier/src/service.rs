use crate::types::{
    ClassificationRequest, ClassificationResult, HealthReport, ReloadReport, ServiceStatus,
};
use async_trait::async_trait;
use samachar_common::{Result, SamacharError};
use samachar_config::ServiceConfig;
use samachar_http::{HttpClient, HttpError, RequestOpts};

const PREDICT_PATH: &str = "predict";
const HEALTH_PATH: &str = "health";
const STATUS_PATH: &str = "";
const RELOAD_PATH: &str = "reload-models";

/// Anything that can turn article text into a category.
#[async_trait]
pub trait Classifier: Send + Sync {
    /// Issue exactly one classification request.
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> std::result::Result<ClassificationResult, HttpError>;

    /// Ask the service whether its models are loaded.
    async fn health_check(&self) -> std::result::Result<HealthReport, HttpError>;

    /// Human-readable location of the service, for display.
    fn endpoint(&self) -> &str;
}

/// Client for the remote `/predict` service and its auxiliary endpoints.
#[derive(Clone, Debug)]
pub struct PredictClient {
    http: HttpClient,
    endpoint: String,
}

impl PredictClient {
    /// Build a client with default timeouts.
    ///
    /// ```
    /// use samachar_classifier::{Classifier, PredictClient};
    ///
    /// let client = PredictClient::new("http://localhost:8000").unwrap();
    /// assert_eq!(client.endpoint(), "http://localhost:8000/");
    /// assert!(PredictClient::new("not a url").is_err());
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        let http = HttpClient::new(base_url).map_err(config_error)?;
        Ok(Self::from_http(http))
    }

    pub fn from_config(cfg: &ServiceConfig) -> Result<Self> {
        let http = HttpClient::with_connect_timeout(&cfg.base_url, cfg.connect_timeout())
            .map_err(config_error)?
            .with_timeout(cfg.timeout());
        Ok(Self::from_http(http))
    }

    pub fn from_http(http: HttpClient) -> Self {
        let endpoint = http.base().to_string();
        Self { http, endpoint }
    }

    /// `GET /`: liveness banner of the service.
    pub async fn status(&self) -> std::result::Result<ServiceStatus, HttpError> {
        self.http
            .get_json(STATUS_PATH, RequestOpts::default())
            .await
    }

    /// `POST /reload-models`: ask the service to re-read its model files.
    pub async fn reload_models(&self) -> std::result::Result<ReloadReport, HttpError> {
        let report: ReloadReport = self
            .http
            .post_empty(RELOAD_PATH, RequestOpts::default())
            .await?;
        tracing::info!(status = %report.status, "models reloaded");
        Ok(report)
    }
}

fn config_error(e: HttpError) -> SamacharError {
    SamacharError::Config(format!("service.base_url: {e}"))
}

#[async_trait]
impl Classifier for PredictClient {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> std::result::Result<ClassificationResult, HttpError> {
        let result: ClassificationResult = self
            .http
            .post_json(PREDICT_PATH, request, RequestOpts::default())
            .await?;
        if !(0.0..=1.0).contains(&result.confidence) {
            tracing::warn!(
                confidence = result.confidence,
                "service returned confidence outside [0, 1]"
            );
        }
        tracing::info!(
            category = %result.category,
            confidence = result.confidence,
            text_chars = request.text.chars().count(),
            "classification succeeded"
        );
        Ok(result)
    }

    async fn health_check(&self) -> std::result::Result<HealthReport, HttpError> {
        self.http
            .get_json(HEALTH_PATH, RequestOpts::default())
            .await
    }

    fn endpoint(&self) -> &str {
        &self.endpoint
    }
}
