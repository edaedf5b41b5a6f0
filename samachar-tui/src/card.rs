use crate::field::TextField;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press on the card asks the rest of the UI to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardAction {
    /// Classify this raw, untrimmed text.
    Submit(String),
    Cleared,
    Edited,
    Ignored,
}

/// The article input form: owns the text, never the interaction state.
///
/// Every method that depends on whether a request is in flight takes
/// `loading` from the caller, which reads it off the coordinator.
#[derive(Debug, Default)]
pub struct InputCard {
    field: TextField,
}

impl InputCard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        self.field.text()
    }

    pub fn field(&self) -> &TextField {
        &self.field
    }

    /// Submit needs a non-blank text and no request in flight.
    pub fn submit_enabled(&self, loading: bool) -> bool {
        !loading && !self.field.text().trim().is_empty()
    }

    pub fn clear_visible(&self) -> bool {
        !self.field.is_empty()
    }

    pub fn clear_enabled(&self, loading: bool) -> bool {
        self.clear_visible() && !loading
    }

    pub fn submit(&self, loading: bool) -> Option<String> {
        self.submit_enabled(loading)
            .then(|| self.field.text().to_string())
    }

    /// Empty the field. Does not touch any request already in flight.
    pub fn clear(&mut self, loading: bool) -> bool {
        if !self.clear_enabled(loading) {
            return false;
        }
        self.field.clear();
        true
    }

    pub fn paste(&mut self, text: &str, loading: bool) -> CardAction {
        if loading || text.is_empty() {
            return CardAction::Ignored;
        }
        self.field.insert_str(text);
        CardAction::Edited
    }

    pub fn handle_key(&mut self, key: KeyEvent, loading: bool) -> CardAction {
        match (key.code, key.modifiers) {
            (KeyCode::Enter, m) if m.contains(KeyModifiers::ALT) => self.edit(loading, |f| f.newline()),
            (KeyCode::Char('j'), KeyModifiers::CONTROL) => self.edit(loading, |f| f.newline()),
            (KeyCode::Enter, _) => match self.submit(loading) {
                Some(text) => CardAction::Submit(text),
                None => CardAction::Ignored,
            },
            (KeyCode::Char('l'), KeyModifiers::CONTROL) | (KeyCode::Esc, _) => {
                if self.clear(loading) {
                    CardAction::Cleared
                } else {
                    CardAction::Ignored
                }
            }
            (KeyCode::Left, _) => self.edit(loading, TextField::left),
            (KeyCode::Right, _) => self.edit(loading, TextField::right),
            (KeyCode::Home, _) => self.edit(loading, TextField::home),
            (KeyCode::End, _) => self.edit(loading, TextField::end),
            (KeyCode::Backspace, _) => self.edit(loading, TextField::backspace),
            (KeyCode::Delete, _) => self.edit(loading, TextField::delete),
            (KeyCode::Char(ch), m) if !m.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
                self.edit(loading, |f| f.insert_char(ch))
            }
            _ => CardAction::Ignored,
        }
    }

    // The field is read-only while a request is outstanding.
    fn edit(&mut self, loading: bool, f: impl FnOnce(&mut TextField)) -> CardAction {
        if loading {
            return CardAction::Ignored;
        }
        f(&mut self.field);
        CardAction::Edited
    }
}
