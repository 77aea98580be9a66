//! Terminal markdown rendering for assistant replies.
//!
//! The assistant answers in light markdown (bold product names, bullet
//! lists). `ChatRenderer` renders it through `termimad` for styled output
//! and passes text through untouched when styling is off.

use termimad::crossterm::style::Color;
use termimad::MadSkin;

/// Terminal markdown renderer.
pub struct ChatRenderer {
    skin: Option<MadSkin>,
}

impl ChatRenderer {
    /// Create a styled renderer.
    pub fn new() -> Self {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Cyan);
        skin.headers[0].set_fg(Color::Cyan);
        skin.headers[1].set_fg(Color::Cyan);
        skin.inline_code.set_fg(Color::Yellow);
        Self { skin: Some(skin) }
    }

    /// Create a renderer that returns text unchanged.
    pub fn plain() -> Self {
        Self { skin: None }
    }

    /// Render a complete reply.
    pub fn render_final(&self, markdown: &str) -> String {
        match &self.skin {
            Some(skin) => skin.term_text(markdown).to_string(),
            None => markdown.to_string(),
        }
    }
}

impl Default for ChatRenderer {
    fn default() -> Self {
        Self::new()
    }
}
