use crate::{
    backdrop::Backdrop,
    navbar::{self, NavBar},
    styles,
};
use anyhow::Result;
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Flex, Layout, Position, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};
use samachar_classifier::Outcome;
use textwrap::wrap;

pub const PLACEHOLDER: &str = "Paste your Nepali news article here...";

const CARD_MAX_WIDTH: u16 = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Ok,
    Error,
}

/// One-line message shown in the status bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            text: text.into(),
        }
    }

    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Ok,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }

    fn style(&self) -> Style {
        match self.kind {
            NoticeKind::Info => styles::value(),
            NoticeKind::Ok => styles::ok(),
            NoticeKind::Error => styles::error(),
        }
    }
}

/// Everything one frame needs, copied out of the app so drawing never
/// borrows it.
#[derive(Debug, Clone)]
pub struct ViewSnap {
    pub nav: NavBar,
    pub text: String,
    pub caret: (u16, u16),
    pub outcome: Outcome,
    pub submit_enabled: bool,
    pub clear_visible: bool,
    pub clear_enabled: bool,
    pub spinner: &'static str,
    pub tick: u64,
    pub show_help: bool,
    pub notice: Option<Notice>,
    pub endpoint: String,
}

impl ViewSnap {
    fn loading(&self) -> bool {
        matches!(self.outcome, Outcome::Loading)
    }
}

pub fn draw<B: Backend>(term: &mut Terminal<B>, snap: &ViewSnap) -> Result<()> {
    term.draw(|frame| render(frame, snap))?;
    Ok(())
}

pub fn render(frame: &mut Frame, snap: &ViewSnap) {
    let area = frame.area();
    let [nav_area, body, status_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(snap.nav.height()),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

    render_navbar(frame, nav_area, snap.nav);
    frame.render_widget(Backdrop::new(snap.tick), body);
    render_card(frame, card_area(body), snap);
    render_status(frame, status_area, snap);

    if snap.show_help {
        render_help(frame, body);
    }
}

fn render_navbar(frame: &mut Frame, area: Rect, nav: NavBar) {
    let hint = if nav.is_open() { "F2 close menu" } else { "F2 menu" };
    let mut lines = vec![Line::from(vec![
        Span::styled(format!(" {} ", navbar::BRAND), styles::brand()),
        Span::styled(navbar::TAGLINE, styles::tagline()),
        Span::raw("   "),
        Span::styled(hint, styles::dim()),
    ])];
    if nav.is_open() {
        lines.extend(
            navbar::LINKS
                .iter()
                .map(|link| Line::from(Span::styled(format!("   › {link}"), styles::link()))),
        );
    }
    frame.render_widget(Clear, area);
    frame.render_widget(Paragraph::new(lines), area);
}

fn card_area(body: Rect) -> Rect {
    let width = body.width.saturating_sub(4).min(CARD_MAX_WIDTH);
    let height = body.height.saturating_sub(2);
    let [column] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(body);
    let [card] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(column);
    card
}

fn render_card(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(" Nepali News Classifier ", styles::title()));
    let inner = block.inner(area);
    frame.render_widget(Clear, area);
    frame.render_widget(block, area);

    // The outcome grows to fit the whole message; the input gives up rows first.
    let result = outcome_lines(&snap.outcome, inner.width);
    let outcome_rows = u16::try_from(result.len()).unwrap_or(u16::MAX);

    let [subtitle, label, input, buttons, outcome, hints] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(outcome_rows),
            Constraint::Length(1),
        ])
        .areas(inner);

    frame.render_widget(
        Paragraph::new(Span::styled(
            "Paste a Nepali news article and let AI find its category.",
            styles::dim(),
        )),
        subtitle,
    );
    frame.render_widget(
        Paragraph::new(Span::styled("News Article", styles::label())),
        label,
    );
    render_input(frame, input, snap);
    render_buttons(frame, buttons, snap);
    frame.render_widget(Paragraph::new(result), outcome);
    frame.render_widget(
        Paragraph::new(Span::styled(
            "Enter classify • Alt+Enter newline • Esc clear • F1 help • Ctrl+C quit",
            styles::dim(),
        )),
        hints,
    );
}

fn render_input(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let border = if snap.loading() { styles::dim() } else { styles::value() };
    let block = Block::default().borders(Borders::ALL).border_style(border);
    let inner = block.inner(area);

    let (row, col) = snap.caret;
    let v_scroll = row.saturating_sub(inner.height.saturating_sub(1));
    let h_scroll = col.saturating_sub(inner.width.saturating_sub(1));

    let body = if snap.text.is_empty() {
        Paragraph::new(Span::styled(PLACEHOLDER, styles::dim()))
    } else {
        let style = if snap.loading() { styles::dim() } else { styles::value() };
        Paragraph::new(snap.text.as_str())
            .style(style)
            .scroll((v_scroll, h_scroll))
    };
    frame.render_widget(body.block(block), area);

    // Read-only while loading: no caret.
    if !snap.loading() && inner.width > 0 && inner.height > 0 {
        frame.set_cursor_position(Position {
            x: inner.x + col - h_scroll,
            y: inner.y + row - v_scroll,
        });
    }
}

fn render_buttons(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let mut spans = Vec::with_capacity(3);
    if snap.loading() {
        spans.push(Span::styled(
            format!(" {} Classifying... ", snap.spinner),
            styles::button_disabled(),
        ));
    } else {
        let style = if snap.submit_enabled { styles::button() } else { styles::button_disabled() };
        spans.push(Span::styled(" Classify with AI ", style));
    }
    if snap.clear_visible {
        let style = if snap.clear_enabled { styles::value() } else { styles::button_disabled() };
        spans.push(Span::raw("  "));
        spans.push(Span::styled(" Clear ", style));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn outcome_lines(outcome: &Outcome, width: u16) -> Vec<Line<'static>> {
    match outcome {
        Outcome::Success(result) => vec![
            Line::from(Span::styled("Classification Result", styles::title())),
            Line::from(vec![
                Span::styled("Category: ", styles::label()),
                Span::styled(result.category.clone(), styles::category()),
            ]),
            Line::from(vec![
                Span::styled("Confidence: ", styles::label()),
                Span::styled(result.confidence_percent(), styles::value()),
            ]),
        ],
        Outcome::Failure(message) => {
            let heading = Line::from(Span::styled("Error", styles::error()));
            let body = wrap(message, usize::from(width).max(1))
                .into_iter()
                .map(|seg| Line::from(Span::styled(seg.into_owned(), styles::error())));
            std::iter::once(heading).chain(body).collect()
        }
        Outcome::Idle | Outcome::Loading => Vec::new(),
    }
}

fn render_status(frame: &mut Frame, area: Rect, snap: &ViewSnap) {
    let mut spans = vec![Span::raw(" ")];
    if snap.loading() {
        spans.push(Span::styled(snap.spinner, styles::label()));
        spans.push(Span::styled(" Classifying…", styles::label()));
    } else {
        spans.push(Span::styled("Ready", styles::ok()));
    }
    spans.push(Span::styled(format!(" • {}", snap.endpoint), styles::dim()));
    if let Some(notice) = &snap.notice {
        spans.push(Span::raw(" • "));
        spans.push(Span::styled(notice.text.clone(), notice.style()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_help(frame: &mut Frame, body: Rect) {
    const ROWS: [(&str, &str); 11] = [
        ("Enter", "classify the article"),
        ("Alt+Enter", "new line"),
        ("Esc / Ctrl+L", "clear the text"),
        ("←/→ Home/End", "move the cursor"),
        ("F1", "toggle this help"),
        ("F2", "toggle the menu"),
        ("Ctrl+C / Ctrl+Q", "quit"),
        ("/help", "toggle this help"),
        ("/health", "check the classification service"),
        ("/menu", "toggle the menu"),
        ("/quit", "quit"),
    ];
    let lines: Vec<Line> = ROWS
        .iter()
        .map(|(key, what)| {
            Line::from(vec![
                Span::styled(format!(" {key:<16}"), styles::label()),
                Span::styled(*what, styles::value()),
            ])
        })
        .collect();

    let [column] = Layout::horizontal([Constraint::Length(56u16.min(body.width))])
        .flex(Flex::Center)
        .areas(body);
    let [popup] = Layout::vertical([Constraint::Length((ROWS.len() as u16 + 2).min(body.height))])
        .flex(Flex::Center)
        .areas(column);

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title(" Help ")),
        popup,
    );
}
