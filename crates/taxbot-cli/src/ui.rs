//! TUI implementation for taxbot

use crossterm::event::{Event, EventStream, MouseEventKind};
use futures::StreamExt;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState},
};
use std::io;
use std::time::Instant;
use taxbot_chat::{Conversation, Message, Submission};
use taxbot_client::TaxTransport;
use taxbot_tui::{
    App, Theme,
    input::{Action, event_to_action},
    widgets::{InputBox, MessageList, Spinner, message_list::calculate_message_height},
};

/// Requests raised by the UI for the run loop
#[derive(Debug, PartialEq)]
pub enum UiMessage {
    /// User submitted input
    Submit(String),
    /// User requested quit
    Quit,
}

/// TUI application state
pub struct TuiState {
    /// Input box
    input: InputBox,
    /// Current scroll position
    scroll: usize,
    /// Theme
    theme: Theme,
    /// Endpoint shown in the title
    endpoint: String,
    /// Spinner start time for animation
    spinner_start: Instant,
}

impl TuiState {
    pub fn new(theme: Theme, endpoint: impl Into<String>) -> Self {
        let mut input = InputBox::new().with_placeholder("Type your message...");
        input.set_focused(true);

        Self {
            input,
            scroll: 0,
            theme,
            endpoint: endpoint.into(),
            spinner_start: Instant::now(),
        }
    }

    fn scroll_to_bottom(&mut self) {
        // Will be calculated during render based on content height
        self.scroll = usize::MAX;
    }

    fn scroll_up(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_sub(lines);
    }

    fn scroll_down(&mut self, lines: usize) {
        self.scroll = self.scroll.saturating_add(lines);
    }

    /// A calculation went out: lock the input and start the spinner
    pub fn start_thinking(&mut self) {
        self.spinner_start = Instant::now();
        self.input.set_disabled(true);
        self.scroll_to_bottom();
    }

    /// The reply arrived
    pub fn finish_thinking(&mut self) {
        self.input.set_disabled(false);
        self.scroll_to_bottom();
    }

    /// Handle keyboard action
    pub fn handle_action(&mut self, action: Action, width: u16, loading: bool) -> Option<UiMessage> {
        if action.is_exit() {
            return Some(UiMessage::Quit);
        }

        match action {
            Action::Submit => {
                if loading || self.input.content().trim().is_empty() {
                    return None;
                }
                self.scroll_to_bottom();
                Some(UiMessage::Submit(self.input.take()))
            }
            Action::PageUp => {
                self.scroll_up(10);
                None
            }
            Action::PageDown => {
                self.scroll_down(10);
                None
            }
            _ => {
                self.input.handle_action(&action, width);
                None
            }
        }
    }

    /// Handle one item from the terminal event stream
    fn handle_event(
        &mut self,
        event: Option<io::Result<Event>>,
        width: u16,
        loading: bool,
    ) -> anyhow::Result<Option<UiMessage>> {
        match event {
            Some(Ok(Event::Mouse(mouse))) => {
                match mouse.kind {
                    MouseEventKind::ScrollUp => self.scroll_up(3),
                    MouseEventKind::ScrollDown => self.scroll_down(3),
                    _ => {}
                }
                Ok(None)
            }
            Some(Ok(event)) => Ok(event_to_action(event)
                .and_then(|action| self.handle_action(action, width, loading))),
            Some(Err(e)) => Err(anyhow::anyhow!("Event error: {}", e)),
            None => Ok(Some(UiMessage::Quit)),
        }
    }

    /// Render the UI
    pub fn render(&mut self, frame: &mut Frame, conversation: &Conversation) {
        let size = frame.area();

        // Layout: messages (flex), status bar (1), input (3)
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // Messages
                Constraint::Length(1), // Status
                Constraint::Length(3), // Input
            ])
            .split(size);

        self.render_messages(frame, chunks[0], conversation.messages().as_slice());
        self.render_status(frame, chunks[1], conversation.is_loading());
        self.input
            .render(chunks[2], frame.buffer_mut(), &self.theme);
    }

    fn render_messages(&mut self, frame: &mut Frame, area: Rect, messages: &[Message]) {
        let title = format!(" Tax Chatbot │ {} ", self.endpoint);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style())
            .title(title);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        if inner.height == 0 {
            return;
        }

        let content_height = calculate_message_height(messages, inner.width as usize);
        let max_scroll = content_height.saturating_sub(inner.height as usize);
        // usize::MAX means "follow the bottom"
        self.scroll = self.scroll.min(max_scroll);

        let message_list = MessageList::new(messages, &self.theme).scroll(self.scroll);
        frame.render_widget(message_list, inner);

        if content_height > inner.height as usize {
            let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓"))
                .track_symbol(Some("│"))
                .thumb_symbol("█");

            let mut scrollbar_state = ScrollbarState::new(content_height)
                .position(self.scroll)
                .viewport_content_length(inner.height as usize);

            frame.render_stateful_widget(scrollbar, inner, &mut scrollbar_state);
        }
    }

    fn render_status(&self, frame: &mut Frame, area: Rect, loading: bool) {
        if loading {
            let spinner =
                Spinner::new("Thinking...", &self.theme).with_start_time(self.spinner_start);
            frame.render_widget(spinner, area);
            return;
        }

        let left_content = "Ready";
        let right_content = "Enter: send │ PgUp/PgDn: scroll │ Ctrl+C: quit";

        let left_width = left_content.chars().count();
        let right_width = right_content.chars().count();
        let available = area.width as usize;

        let line = if left_width + right_width + 2 <= available {
            let spacing = available - left_width - right_width;
            Line::from(vec![
                Span::styled(left_content, self.theme.dim_style()),
                Span::raw(" ".repeat(spacing)),
                Span::styled(right_content, Style::default().fg(Color::DarkGray)),
            ])
        } else {
            Line::from(Span::styled(left_content, self.theme.dim_style()))
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Run the TUI application
pub async fn run_tui(
    conversation: &mut Conversation,
    transport: &dyn TaxTransport,
    endpoint: &str,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new()?;
    let mut state = TuiState::new(theme, endpoint);
    let mut event_stream = EventStream::new();
    let mut tick_interval = tokio::time::interval(app.tick_rate());

    loop {
        app.draw(|frame| state.render(frame, conversation))?;
        let width = app.width()?;

        let message = tokio::select! {
            event = event_stream.next() => state.handle_event(event, width, false)?,
            _ = tick_interval.tick() => None,
        };

        let content = match message {
            Some(UiMessage::Submit(content)) => content,
            Some(UiMessage::Quit) => return Ok(()),
            None => continue,
        };

        let Submission::Pending(request) = conversation.submit(&content) else {
            state.scroll_to_bottom();
            continue;
        };

        state.start_thinking();
        let mut calculation = transport.calculate(&request);

        // Keep drawing the spinner until the reply lands. Input stays locked.
        loop {
            app.draw(|frame| state.render(frame, conversation))?;
            let width = app.width()?;

            tokio::select! {
                biased;

                result = &mut calculation => {
                    conversation.resolve(result);
                    break;
                }

                event = event_stream.next() => {
                    if let Some(UiMessage::Quit) = state.handle_event(event, width, true)? {
                        return Ok(());
                    }
                }

                _ = tick_interval.tick() => {}
            }
        }

        state.finish_thinking();
    }
}
