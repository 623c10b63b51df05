//! Open/closed state of the cart summary panel.
//!
//! Not persisted: every full page render starts with the panel closed.

/// Whether the cart summary panel is showing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CartVisibility {
    open: bool,
}

impl CartVisibility {
    pub const fn open(&mut self) {
        self.open = true;
    }

    pub const fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }
}
