pub const BRAND: &str = "Nepal Daily";
pub const TAGLINE: &str = "AI-Powered News Intelligence";
pub const LINKS: [&str; 3] = ["News Summary", "Categories", "Subscriptions"];

/// Collapsible link list. Holds nothing but its own open flag.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NavBar {
    open: bool,
}

impl NavBar {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Rows the bar occupies: brand line plus one per link when open.
    pub fn height(&self) -> u16 {
        if self.open {
            1 + LINKS.len() as u16
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_flips_open_state() {
        let mut nav = NavBar::default();
        assert!(!nav.is_open());
        assert_eq!(nav.height(), 1);

        nav.toggle();
        assert!(nav.is_open());
        assert_eq!(nav.height(), 4);

        nav.toggle();
        assert!(!nav.is_open());
    }
}
