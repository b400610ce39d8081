//! Parser configuration
//!
//! Supplied once when an [`MsrpParser`](crate::MsrpParser) is built and read
//! only afterwards.

/// Parser options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserConfig {
    /// Also emit the whole message as raw text lines when dissecting into a sink
    pub display_raw_text: bool,
    /// Consult the body handler registry; when false bodies are always rendered raw
    pub dispatch_bodies: bool,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            display_raw_text: true,
            dispatch_bodies: true,
        }
    }
}

impl ParserConfig {
    /// Configuration that never emits the raw text view
    pub fn without_raw_text() -> Self {
        Self {
            display_raw_text: false,
            ..Self::default()
        }
    }

    pub fn with_display_raw_text(mut self, display: bool) -> Self {
        self.display_raw_text = display;
        self
    }

    pub fn with_dispatch_bodies(mut self, dispatch: bool) -> Self {
        self.dispatch_bodies = dispatch;
        self
    }
}
