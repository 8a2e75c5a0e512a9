//! Status bar component for showing request outcomes

use std::time::Duration;

use chrono::{DateTime, Local};
use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::dashboard::ui::Styles;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusType {
    Info,
    Success,
    Error,
    Loading,
}

#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: DateTime<Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: Local::now(),
        }
    }
}

/// Single-line status display; errors stay until replaced, other messages expire
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub auto_clear_timeout: Option<Duration>,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            auto_clear_timeout: Some(Duration::from_secs(5)),
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_message(&mut self, message: StatusMessage) {
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Success));
    }

    pub fn set_error(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Error));
    }

    pub fn set_loading(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Loading));
    }

    pub fn clear(&mut self) {
        self.current_message = None;
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    /// Check if we should auto-clear the current message
    pub fn should_auto_clear(&self) -> bool {
        match (self.auto_clear_timeout, &self.current_message) {
            (Some(timeout), Some(message)) if message.status_type != StatusType::Error => {
                let elapsed = Local::now().signed_duration_since(message.timestamp);
                elapsed.to_std().unwrap_or_default() > timeout
            }
            _ => false,
        }
    }

    pub fn tick(&mut self) {
        if self.should_auto_clear() {
            self.clear();
        }
    }

    /// Render with `hint` shown when there is no message
    pub fn render_with_title(&self, f: &mut Frame, area: Rect, title: &str, hint: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => (
                format_message(message),
                match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Error => Styles::error(),
                    StatusType::Loading => Styles::warning(),
                },
            ),
            None => (hint.to_string(), Styles::inactive()),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        f.render_widget(Paragraph::new(content).style(style).block(block), area);
    }
}

fn format_message(message: &StatusMessage) -> String {
    let prefix = match message.status_type {
        StatusType::Info => "ℹ",
        StatusType::Success => "✓",
        StatusType::Error => "✗",
        StatusType::Loading => "⟳",
    };
    format!("{} [{}] {}", prefix, message.timestamp.format("%H:%M:%S"), message.message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_errors_do_not_expire() {
        let mut status = StatusDisplay::new();
        status.auto_clear_timeout = Some(Duration::ZERO);

        status.set_error("Failed to delete vehicle (see log)".to_string());
        status.tick();
        assert!(status.get_current().is_some());

        let mut old = StatusMessage::new("Loaded 3 vehicles".to_string(), StatusType::Success);
        old.timestamp = Local::now() - chrono::Duration::seconds(10);
        status.set_message(old);
        status.tick();
        assert!(status.get_current().is_none());
    }
}
