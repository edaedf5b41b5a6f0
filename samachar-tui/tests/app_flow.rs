use async_trait::async_trait;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use samachar_classifier::{
    ClassificationRequest, ClassificationResult, Classifier, Coordinator, FALLBACK_MESSAGE,
    HealthReport,
};
use samachar_http::{HttpError, StatusCode};
use samachar_tui::{Flow, NoticeKind, TuiApp, TuiMsg};
use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

/// Answers every classification with the same reply and counts calls.
struct Fixed {
    reply: Result<ClassificationResult, HttpError>,
    calls: Mutex<Vec<String>>,
}

impl Fixed {
    fn new(reply: Result<ClassificationResult, HttpError>) -> Arc<Self> {
        Arc::new(Self {
            reply,
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for Fixed {
    async fn classify(
        &self,
        request: &ClassificationRequest,
    ) -> Result<ClassificationResult, HttpError> {
        self.calls.lock().unwrap().push(request.text.clone());
        match &self.reply {
            Ok(result) => Ok(result.clone()),
            Err(HttpError::Api { detail, .. }) => Err(HttpError::Api {
                status: StatusCode::BAD_REQUEST,
                message: "bad request".into(),
                detail: detail.clone(),
                request_id: "-".into(),
            }),
            Err(_) => Err(HttpError::Network("connection refused".into())),
        }
    }

    async fn health_check(&self) -> Result<HealthReport, HttpError> {
        let mut models = BTreeMap::new();
        models.insert("svm_model".to_string(), true);
        models.insert("label_encoder".to_string(), false);
        Ok(HealthReport {
            status: "unhealthy".into(),
            models,
            message: "Some models failed to load".into(),
        })
    }

    fn endpoint(&self) -> &str {
        "http://test/"
    }
}

fn politics() -> ClassificationResult {
    ClassificationResult {
        category: "Politics".into(),
        confidence: 0.873,
    }
}

fn app_with(classifier: Arc<Fixed>) -> (TuiApp, mpsc::Receiver<TuiMsg>) {
    let (tx, rx) = mpsc::channel(16);
    (TuiApp::new(Coordinator::new(classifier), tx), rx)
}

fn press(app: &mut TuiApp, code: KeyCode) -> Flow {
    app.handle(TuiMsg::InputEvent(Event::Key(KeyEvent::new(
        code,
        KeyModifiers::NONE,
    ))))
}

fn type_text(app: &mut TuiApp, text: &str) {
    for ch in text.chars() {
        press(app, KeyCode::Char(ch));
    }
}

#[tokio::test]
async fn submit_loads_then_shows_result() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, mut rx) = app_with(classifier.clone());

    type_text(&mut app, "संसद बैठक");
    press(&mut app, KeyCode::Enter);

    assert!(app.state().is_loading());
    let snap = app.snapshot();
    assert!(!snap.submit_enabled);
    assert!(!snap.clear_enabled);
    assert!(snap.clear_visible);

    let msg = rx.recv().await.unwrap();
    assert!(matches!(msg, TuiMsg::Classified { .. }));
    assert_eq!(app.handle(msg), Flow::Continue);

    assert!(!app.state().is_loading());
    let result = app.state().result().unwrap();
    assert_eq!(result.category, "Politics");
    assert_eq!(result.confidence_percent(), "87.3%");
    assert!(app.snapshot().submit_enabled);
    assert_eq!(classifier.calls(), vec!["संसद बैठक".to_string()]);
}

#[tokio::test]
async fn service_detail_is_shown_verbatim() {
    let classifier = Fixed::new(Err(HttpError::Api {
        status: StatusCode::BAD_REQUEST,
        message: String::new(),
        detail: Some("text too short".into()),
        request_id: String::new(),
    }));
    let (mut app, mut rx) = app_with(classifier);

    type_text(&mut app, "x");
    press(&mut app, KeyCode::Enter);
    let msg = rx.recv().await.unwrap();
    app.handle(msg);

    assert_eq!(app.state().error(), Some("text too short"));
    assert!(app.state().result().is_none());
}

#[tokio::test]
async fn network_failure_shows_fallback() {
    let classifier = Fixed::new(Err(HttpError::Network("down".into())));
    let (mut app, mut rx) = app_with(classifier);

    type_text(&mut app, "news");
    press(&mut app, KeyCode::Enter);
    let msg = rx.recv().await.unwrap();
    app.handle(msg);

    assert_eq!(app.state().error(), Some(FALLBACK_MESSAGE));
}

#[tokio::test]
async fn blank_input_issues_no_request() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, mut rx) = app_with(classifier.clone());

    type_text(&mut app, "   ");
    press(&mut app, KeyCode::Enter);

    assert!(!app.state().is_loading());
    assert!(rx.try_recv().is_err());
    assert!(classifier.calls().is_empty());
}

#[tokio::test]
async fn enter_while_loading_is_ignored() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, mut rx) = app_with(classifier.clone());

    type_text(&mut app, "news");
    press(&mut app, KeyCode::Enter);
    press(&mut app, KeyCode::Enter);

    let msg = rx.recv().await.unwrap();
    app.handle(msg);
    tokio::task::yield_now().await;

    assert!(rx.try_recv().is_err());
    assert_eq!(classifier.calls().len(), 1);
}

#[tokio::test]
async fn clearing_keeps_the_outcome() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, mut rx) = app_with(classifier);

    type_text(&mut app, "news");
    press(&mut app, KeyCode::Enter);
    let msg = rx.recv().await.unwrap();
    app.handle(msg);

    press(&mut app, KeyCode::Esc);

    assert_eq!(app.text(), "");
    assert!(!app.snapshot().clear_visible);
    assert_eq!(app.state().result(), Some(&politics()));
}

#[tokio::test]
async fn paste_is_inserted_verbatim() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, _rx) = app_with(classifier);

    app.handle(TuiMsg::InputEvent(Event::Paste("पहिलो\nदोस्रो".into())));

    assert_eq!(app.text(), "पहिलो\nदोस्रो");
}

#[tokio::test]
async fn slash_commands_never_reach_the_classifier() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, mut rx) = app_with(classifier.clone());

    type_text(&mut app, "/menu");
    press(&mut app, KeyCode::Enter);
    assert!(app.snapshot().nav.is_open());
    assert_eq!(app.text(), "");

    type_text(&mut app, "/help");
    press(&mut app, KeyCode::Enter);
    assert!(app.snapshot().show_help);

    type_text(&mut app, "/bogus");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.notice().map(|n| n.kind), Some(NoticeKind::Error));

    type_text(&mut app, "/quit");
    assert_eq!(press(&mut app, KeyCode::Enter), Flow::Quit);

    assert!(rx.try_recv().is_err());
    assert!(classifier.calls().is_empty());
}

#[tokio::test]
async fn health_command_reports_missing_models() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, mut rx) = app_with(classifier);

    type_text(&mut app, "/health");
    press(&mut app, KeyCode::Enter);
    assert_eq!(app.notice().map(|n| n.kind), Some(NoticeKind::Info));

    let msg = rx.recv().await.unwrap();
    assert!(matches!(msg, TuiMsg::HealthChecked(_)));
    app.handle(msg);

    let notice = app.notice().unwrap();
    assert_eq!(notice.kind, NoticeKind::Error);
    assert!(notice.text.contains("label_encoder"));
}

#[tokio::test]
async fn navigation_and_quit_keys() {
    let classifier = Fixed::new(Ok(politics()));
    let (mut app, _rx) = app_with(classifier);

    press(&mut app, KeyCode::F(2));
    assert!(app.snapshot().nav.is_open());
    press(&mut app, KeyCode::F(2));
    assert!(!app.snapshot().nav.is_open());

    let quit = app.handle(TuiMsg::InputEvent(Event::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    ))));
    assert_eq!(quit, Flow::Quit);
}
