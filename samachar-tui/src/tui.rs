use crate::{
    card::{CardAction, InputCard},
    command::{Command, parse_command},
    feeders::spawn_tui_feeders,
    navbar::NavBar,
    shutdown::ShutdownHandle,
    view::{self, Notice, ViewSnap},
};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableBracketedPaste, EnableBracketedPaste, Event as CtEvent, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use samachar_classifier::{
    Classifier, ClassifyOutcome, Coordinator, HealthReport, InteractionState, Ticket,
};
use std::{
    io::{self, Stdout},
    time::Duration,
};
use tokio::sync::mpsc;

const BRAILLE_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
const MAILBOX: usize = 256;

pub enum TuiMsg {
    InputEvent(CtEvent),
    Tick,
    Classified {
        ticket: Ticket,
        outcome: ClassifyOutcome,
    },
    HealthChecked(std::result::Result<HealthReport, String>),
    OpError(String),
    Shutdown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Single owner of everything on screen.
///
/// Messages come in through [`TuiApp::handle`]; network work is spawned onto
/// the runtime and reports back on the same mailbox, so handling a message
/// never waits on the service.
pub struct TuiApp {
    coordinator: Coordinator,
    card: InputCard,
    nav: NavBar,
    tx: mpsc::Sender<TuiMsg>,

    endpoint: String,
    show_help: bool,
    notice: Option<Notice>,

    tick: u64,
    spin_idx: usize,
    dirty: bool,
}

impl TuiApp {
    pub fn new(coordinator: Coordinator, tx: mpsc::Sender<TuiMsg>) -> Self {
        let endpoint = coordinator.classifier().endpoint().to_string();
        Self {
            coordinator,
            card: InputCard::new(),
            nav: NavBar::default(),
            tx,
            endpoint,
            show_help: false,
            notice: None,
            tick: 0,
            spin_idx: 0,
            dirty: true,
        }
    }

    pub fn state(&self) -> &InteractionState {
        self.coordinator.state()
    }

    pub fn text(&self) -> &str {
        self.card.text()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub fn snapshot(&self) -> ViewSnap {
        let loading = self.state().is_loading();
        ViewSnap {
            nav: self.nav,
            text: self.card.text().to_string(),
            caret: self.card.field().caret(),
            outcome: self.state().outcome().clone(),
            submit_enabled: self.card.submit_enabled(loading),
            clear_visible: self.card.clear_visible(),
            clear_enabled: self.card.clear_enabled(loading),
            spinner: self.spinner(),
            tick: self.tick,
            show_help: self.show_help,
            notice: self.notice.clone(),
            endpoint: self.endpoint.clone(),
        }
    }

    pub fn handle(&mut self, msg: TuiMsg) -> Flow {
        match msg {
            TuiMsg::InputEvent(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                return self.handle_key(key);
            }
            TuiMsg::InputEvent(CtEvent::Paste(text)) => {
                let loading = self.state().is_loading();
                if self.card.paste(&text, loading) == CardAction::Edited {
                    self.dirty = true;
                }
            }
            TuiMsg::InputEvent(CtEvent::Resize(..)) => self.dirty = true,
            TuiMsg::InputEvent(_) => {}
            TuiMsg::Tick => self.on_tick(),
            TuiMsg::Classified { ticket, outcome } => {
                if self.coordinator.resolve(ticket, outcome) {
                    self.dirty = true;
                }
            }
            TuiMsg::HealthChecked(report) => {
                self.notice = Some(health_notice(report));
                self.dirty = true;
            }
            TuiMsg::OpError(e) => {
                tracing::warn!(error = %e, "tui operation failed");
                self.notice = Some(Notice::error(format!("× Error: {e}")));
                self.dirty = true;
            }
            TuiMsg::Shutdown => return Flow::Quit,
        }
        Flow::Continue
    }

    fn handle_key(&mut self, key: KeyEvent) -> Flow {
        match (key.code, key.modifiers) {
            (KeyCode::Char('c'), KeyModifiers::CONTROL)
            | (KeyCode::Char('q'), KeyModifiers::CONTROL) => return Flow::Quit,
            (KeyCode::F(1), _) => self.show_help = !self.show_help,
            (KeyCode::F(2), _) => self.nav.toggle(),
            (KeyCode::Esc, _) if self.show_help => self.show_help = false,
            _ => {
                let loading = self.state().is_loading();
                match self.card.handle_key(key, loading) {
                    CardAction::Submit(text) => return self.route_submit(text),
                    CardAction::Cleared | CardAction::Edited => {}
                    CardAction::Ignored => return Flow::Continue,
                }
            }
        }
        self.dirty = true;
        Flow::Continue
    }

    fn route_submit(&mut self, text: String) -> Flow {
        self.dirty = true;
        match parse_command(&text) {
            Some(cmd) => {
                // Command lines never stay in the article field.
                self.card.clear(false);
                self.handle_command(cmd)
            }
            None => {
                self.start_classify(text);
                Flow::Continue
            }
        }
    }

    fn handle_command(&mut self, cmd: Command) -> Flow {
        match cmd {
            Command::Quit => return Flow::Quit,
            Command::Help => self.show_help = !self.show_help,
            Command::Menu => self.nav.toggle(),
            Command::Health => self.start_health_check(),
            Command::Unknown(verb) => {
                self.notice = Some(Notice::error(format!("× Unknown command: {verb}. Try /help")));
            }
        }
        Flow::Continue
    }

    fn start_classify(&mut self, text: String) {
        let chars = text.chars().count();
        let (ticket, pending) = self.coordinator.dispatch(text);
        tracing::info!(generation = ticket.generation(), chars, "classification submitted");

        let tx = self.tx.clone();
        tokio::spawn(async move {
            let outcome = pending.await;
            let _ = tx.send(TuiMsg::Classified { ticket, outcome }).await;
        });
    }

    fn start_health_check(&mut self) {
        self.notice = Some(Notice::info("Checking service health…"));
        let classifier = self.coordinator.classifier();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let report = classifier.health_check().await.map_err(|e| e.to_string());
            let _ = tx.send(TuiMsg::HealthChecked(report)).await;
        });
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if self.state().is_loading() {
            self.spin_idx = (self.spin_idx + 1) % BRAILLE_FRAMES.len();
            self.dirty = true;
        }
        // backdrop drifts one row every four ticks
        if self.tick % 4 == 0 {
            self.dirty = true;
        }
    }

    fn spinner(&self) -> &'static str {
        if self.state().is_loading() {
            BRAILLE_FRAMES[self.spin_idx % BRAILLE_FRAMES.len()]
        } else {
            " "
        }
    }
}

fn health_notice(report: std::result::Result<HealthReport, String>) -> Notice {
    match report {
        Ok(report) if report.is_healthy() => {
            Notice::ok(format!("✓ Service healthy: {}", report.message))
        }
        Ok(report) => {
            let missing = report.missing_models();
            if missing.is_empty() {
                Notice::error(format!("× Service {}: {}", report.status, report.message))
            } else {
                Notice::error(format!(
                    "× Service {}: missing {}",
                    report.status,
                    missing.join(", ")
                ))
            }
        }
        Err(e) => Notice::error(format!("× Health check failed: {e}")),
    }
}

/// Raw mode, alternate screen and bracketed paste for as long as it lives.
struct TerminalGuard {
    term: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode().context("enable raw mode")?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, EnableBracketedPaste)
            .context("enter alternate screen")?;
        let mut term = Terminal::new(CrosstermBackend::new(stdout))?;
        term.clear()?;
        Ok(Self { term })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        disable_raw_mode().ok();
        let _ = execute!(io::stdout(), DisableBracketedPaste, LeaveAlternateScreen);
        let _ = self.term.show_cursor();
    }
}

/// Run the interactive client until the user quits.
pub async fn run(coordinator: Coordinator, tick: Duration) -> Result<()> {
    let (tx, mut rx) = mpsc::channel(MAILBOX);
    let shutdown = ShutdownHandle::new();

    let mut guard = TerminalGuard::enter()?;
    let mut app = TuiApp::new(coordinator, tx.clone());
    let feeders = spawn_tui_feeders(tx, &shutdown, tick);
    tracing::info!(endpoint = %app.endpoint, "terminal client started");

    let mut outcome = Ok(());
    while let Some(msg) = rx.recv().await {
        if app.handle(msg) == Flow::Quit {
            break;
        }
        if app.take_dirty() {
            if let Err(e) = view::draw(&mut guard.term, &app.snapshot()) {
                outcome = Err(e);
                break;
            }
        }
    }

    shutdown.signal();
    drop(rx);
    for feeder in feeders {
        let _ = feeder.await;
    }
    drop(guard);
    tracing::info!("terminal client stopped");
    outcome
}
