//! Core traits for the dashboard screens

use crossterm::event::KeyEvent;
use ratatui::{layout::Rect, Frame};

use super::app::Screen;

/// Actions that can be returned from screen event handling
#[derive(Debug, Clone, PartialEq)]
pub enum ScreenAction {
    /// Navigate to a different screen
    NavigateTo(Screen),
    /// Quit the application
    Quit,
    /// Set status message
    SetStatus(String),
    /// Set error message
    SetError(String),
    /// No action taken
    None,
}

/// A screen the app can show and route keys to
pub trait ScreenView {
    fn screen_type(&self) -> Screen;

    fn draw(&mut self, f: &mut Frame, area: Rect);

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction;

    /// Called once when the screen is mounted
    fn on_enter(&mut self) {}

    /// Collect results of background work finished since the last tick
    fn poll_events(&mut self) -> Vec<ScreenAction> {
        Vec::new()
    }

    /// True while keys are being typed into a text input, so global shortcuts stay quiet
    fn captures_text(&self) -> bool {
        false
    }
}

/// Trait for screens with navigable lists
pub trait Navigable {
    fn navigate_up(&mut self);

    fn navigate_down(&mut self);

    fn get_selected_index(&self) -> Option<usize>;

    fn set_selected_index(&mut self, index: Option<usize>);

    fn get_item_count(&self) -> usize;

    fn navigate_to_first(&mut self) {
        if self.get_item_count() > 0 {
            self.set_selected_index(Some(0));
        }
    }

    fn navigate_to_last(&mut self) {
        let count = self.get_item_count();
        if count > 0 {
            self.set_selected_index(Some(count - 1));
        }
    }
}

/// Trait for form handling
pub trait FormHandler {
    fn get_current_field(&self) -> usize;

    fn set_current_field(&mut self, field: usize);

    fn get_field_count(&self) -> usize;

    fn next_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        self.set_current_field((self.get_current_field() + 1) % total);
    }

    fn previous_field(&mut self) {
        let total = self.get_field_count();
        if total == 0 {
            return;
        }
        let current = self.get_current_field();
        self.set_current_field(if current == 0 { total - 1 } else { current - 1 });
    }

    /// Handle character input for current field
    fn handle_char_input(&mut self, c: char);

    fn handle_backspace(&mut self);

    fn handle_delete(&mut self);
}
