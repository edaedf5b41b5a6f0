//! Non-interactive subcommands: one request, printed, then exit.

use anyhow::{Context, Result};
use samachar_classifier::{
    ClassificationRequest, Classifier, Coordinator, HealthReport, Outcome, PredictClient,
};
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::sync::Arc;

pub const EXIT_OK: u8 = 0;
pub const EXIT_FAILED: u8 = 1;
pub const EXIT_USAGE: u8 = 2;

/// Article text from the argument, else the file, else stdin.
pub fn read_input(text: Option<String>, file: Option<&Path>) -> Result<String> {
    match (text, file) {
        (Some(text), _) => Ok(text),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        (None, None) => io::read_to_string(io::stdin()).context("failed to read stdin"),
    }
}

pub async fn classify(
    classifier: Arc<dyn Classifier>,
    text: &str,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    if !ClassificationRequest::new(text).is_submittable() {
        writeln!(err, "Error: please enter some news text to classify")?;
        return Ok(EXIT_USAGE);
    }

    let mut coordinator = Coordinator::new(classifier);
    coordinator.classify(text).await;

    match coordinator.state().outcome() {
        Outcome::Success(result) => {
            if json {
                print_json(out, result)?;
            } else {
                writeln!(out, "Category: {}", result.category)?;
                writeln!(out, "Confidence: {}", result.confidence_percent())?;
            }
            Ok(EXIT_OK)
        }
        Outcome::Failure(message) => {
            if json {
                print_json(out, &serde_json::json!({ "error": message }))?;
            } else {
                writeln!(err, "Error: {message}")?;
            }
            Ok(EXIT_FAILED)
        }
        other => anyhow::bail!("classification did not settle: {other:?}"),
    }
}

pub async fn health(
    client: &PredictClient,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    let report = match client.health_check().await {
        Ok(report) => report,
        Err(e) => return service_unreachable(e, err),
    };
    if json {
        print_json(out, &report)?;
    } else {
        print_health(out, &report)?;
    }
    Ok(if report.is_healthy() { EXIT_OK } else { EXIT_FAILED })
}

pub async fn status(
    client: &PredictClient,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    let status = match client.status().await {
        Ok(status) => status,
        Err(e) => return service_unreachable(e, err),
    };
    if json {
        print_json(out, &status)?;
    } else {
        writeln!(out, "{} ({})", status.message, status.status)?;
        writeln!(out, "Models loaded: {}", yes_no(status.models_loaded))?;
    }
    Ok(EXIT_OK)
}

pub async fn reload_models(
    client: &PredictClient,
    json: bool,
    out: &mut impl Write,
    err: &mut impl Write,
) -> Result<u8> {
    let report = match client.reload_models().await {
        Ok(report) => report,
        Err(e) => return service_unreachable(e, err),
    };
    if json {
        print_json(out, &report)?;
    } else {
        writeln!(out, "{} ({})", report.message, report.status)?;
    }
    Ok(EXIT_OK)
}

fn print_health(out: &mut impl Write, report: &HealthReport) -> io::Result<()> {
    writeln!(out, "Status: {}", report.status)?;
    if !report.message.is_empty() {
        writeln!(out, "Message: {}", report.message)?;
    }
    for (name, loaded) in &report.models {
        let mark = if *loaded { "✓" } else { "✗" };
        writeln!(out, "  {mark} {name}")?;
    }
    Ok(())
}

fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn service_unreachable(e: samachar_http::HttpError, err: &mut impl Write) -> Result<u8> {
    tracing::warn!(error = %e, status = ?e.status(), "service request failed");
    match e.detail() {
        Some(detail) => writeln!(err, "Error: {detail}")?,
        None => writeln!(err, "Error: {e}")?,
    }
    Ok(EXIT_FAILED)
}

fn yes_no(b: bool) -> &'static str {
    if b { "yes" } else { "no" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use samachar_classifier::FALLBACK_MESSAGE;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn run_classify(server: &MockServer, text: &str, json: bool) -> (u8, String, String) {
        let client = PredictClient::new(&server.uri()).unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = classify(Arc::new(client), text, json, &mut out, &mut err)
            .await
            .unwrap();
        (
            code,
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[tokio::test]
    async fn prints_category_and_confidence() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({ "category": "Politics", "confidence": 0.873 })),
            )
            .mount(&server)
            .await;

        let (code, out, err) = run_classify(&server, "संसदमा आज", false).await;

        assert_eq!(code, EXIT_OK);
        assert_eq!(out, "Category: Politics\nConfidence: 87.3%\n");
        assert!(err.is_empty());
    }

    #[tokio::test]
    async fn failure_prints_message_and_exits_nonzero() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/predict"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let (code, out, err) = run_classify(&server, "news", false).await;
        assert_eq!(code, EXIT_FAILED);
        assert!(out.is_empty());
        assert_eq!(err, format!("Error: {FALLBACK_MESSAGE}\n"));

        let (_, out, _) = run_classify(&server, "news", true).await;
        let body: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(body["error"], FALLBACK_MESSAGE);
    }

    #[tokio::test]
    async fn blank_text_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let (code, _, err) = run_classify(&server, " \n\t ", false).await;

        assert_eq!(code, EXIT_USAGE);
        assert!(err.contains("please enter some news text"));
    }

    #[tokio::test]
    async fn unhealthy_service_exits_nonzero() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "status": "unhealthy",
                "models": { "svm_model": true, "tfidf_vectorizer": false },
                "message": "Some models failed to load"
            })))
            .mount(&server)
            .await;

        let client = PredictClient::new(&server.uri()).unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());
        let code = health(&client, false, &mut out, &mut err).await.unwrap();

        assert_eq!(code, EXIT_FAILED);
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Status: unhealthy"));
        assert!(out.contains("✗ tfidf_vectorizer"));
        assert!(out.contains("✓ svm_model"));
    }

    #[tokio::test]
    async fn status_and_reload_print_banners() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Nepali News Classifier API is running",
                "status": "active",
                "models_loaded": true
            })))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/reload-models"))
            .respond_with(ResponseTemplate::new(500).set_body_json(json!({
                "detail": "Error reloading models: file not found"
            })))
            .mount(&server)
            .await;

        let client = PredictClient::new(&server.uri()).unwrap();
        let (mut out, mut err) = (Vec::new(), Vec::new());

        assert_eq!(status(&client, false, &mut out, &mut err).await.unwrap(), EXIT_OK);
        assert_eq!(
            String::from_utf8_lossy(&out),
            "Nepali News Classifier API is running (active)\nModels loaded: yes\n"
        );

        assert_eq!(
            reload_models(&client, false, &mut out, &mut err).await.unwrap(),
            EXIT_FAILED
        );
        assert_eq!(
            String::from_utf8_lossy(&err),
            "Error: Error reloading models: file not found\n"
        );
    }

    #[test]
    fn input_prefers_argument_then_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("article.txt");
        std::fs::write(&file, "फाइलबाट समाचार").unwrap();

        assert_eq!(
            read_input(Some("arg".into()), Some(&file)).unwrap(),
            "arg"
        );
        assert_eq!(read_input(None, Some(&file)).unwrap(), "फाइलबाट समाचार");
        assert!(read_input(None, Some(&dir.path().join("missing.txt"))).is_err());
    }
}
