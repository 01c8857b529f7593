//! The single-slot notification banner.

/// Visual kind of the banner.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BannerKind {
    #[default]
    Neutral,
    Ok,
    Error,
}

/// Outcome of the most recent operation. Holds at most one message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Banner {
    kind: BannerKind,
    text: String,
}

impl Banner {
    /// Removes whatever is showing.
    pub fn clear(&mut self) {
        self.kind = BannerKind::Neutral;
        self.text.clear();
    }

    /// Shows a neutral message.
    pub fn info(&mut self, text: impl Into<String>) {
        self.show(BannerKind::Neutral, text.into());
    }

    /// Shows a success message.
    pub fn ok(&mut self, text: impl Into<String>) {
        self.show(BannerKind::Ok, text.into());
    }

    /// Shows an error message.
    pub fn error(&mut self, text: impl Into<String>) {
        self.show(BannerKind::Error, text.into());
    }

    fn show(&mut self, kind: BannerKind, text: String) {
        self.kind = kind;
        self.text = text;
    }

    pub fn kind(&self) -> BannerKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether nothing is showing.
    pub fn is_clear(&self) -> bool {
        self.text.is_empty()
    }
}
