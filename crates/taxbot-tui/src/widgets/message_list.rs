//! Message list widget for displaying chat messages

use crate::theme::Theme;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};
use taxbot_chat::{Message, Sender};

/// Widget for displaying the conversation top to bottom
pub struct MessageList<'a> {
    messages: &'a [Message],
    theme: &'a Theme,
    scroll: usize,
}

impl<'a> MessageList<'a> {
    /// Create a new message list
    pub fn new(messages: &'a [Message], theme: &'a Theme) -> Self {
        Self {
            messages,
            theme,
            scroll: 0,
        }
    }

    /// Set scroll offset
    pub fn scroll(mut self, scroll: usize) -> Self {
        self.scroll = scroll;
        self
    }

    fn render_message(&self, msg: &Message, width: usize) -> Vec<Line<'static>> {
        let mut lines = Vec::new();

        let (label, label_style, prefix) = match msg.sender() {
            Sender::User => ("You", self.theme.accent_bold(), "▶ "),
            Sender::Bot => (
                "Tax Bot",
                self.theme.success_style().add_modifier(Modifier::BOLD),
                "◀ ",
            ),
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", prefix, label),
            label_style,
        )));

        let content_style = content_style(msg, self.theme);
        for line in wrap_content(msg.text(), width) {
            lines.push(Line::from(Span::styled(format!("  {}", line), content_style)));
        }

        // Empty line between messages
        lines.push(Line::from(""));

        lines
    }
}

fn content_style(msg: &Message, theme: &Theme) -> Style {
    if msg.sender() == Sender::Bot && msg.text().starts_with("Error: ") {
        theme.error_style()
    } else {
        theme.base_style()
    }
}

/// Wrap message text to the content column (width minus the two-space indent)
fn wrap_content(text: &str, width: usize) -> Vec<String> {
    let content_width = width.saturating_sub(2).max(1);
    textwrap::wrap(text, content_width)
        .into_iter()
        .map(|line| line.into_owned())
        .collect()
}

impl Widget for MessageList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let width = area.width as usize;
        let visible_lines: Vec<Line> = self
            .messages
            .iter()
            .flat_map(|msg| self.render_message(msg, width))
            .skip(self.scroll)
            .take(area.height as usize)
            .collect();

        Paragraph::new(visible_lines).render(area, buf);
    }
}

/// Calculate total height of messages
pub fn calculate_message_height(messages: &[Message], width: usize) -> usize {
    messages
        .iter()
        // header + content + separator
        .map(|msg| wrap_content(msg.text(), width).len() + 2)
        .sum()
}
