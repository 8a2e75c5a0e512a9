//! Home screen listing the management screens

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::dashboard::{
    app::Screen,
    traits::{Navigable, ScreenAction, ScreenView},
    ui::Styles,
};

#[derive(Debug, Clone)]
pub struct MenuOption {
    pub title: String,
    pub description: String,
    pub shortcut: char,
    pub screen: Screen,
}

impl MenuOption {
    pub fn new(title: &str, description: &str, shortcut: char, screen: Screen) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            shortcut,
            screen,
        }
    }
}

pub struct MainMenuScreen {
    pub menu_state: ListState,
    pub menu_options: Vec<MenuOption>,
}

impl Default for MainMenuScreen {
    fn default() -> Self {
        Self::new()
    }
}

impl MainMenuScreen {
    pub fn new() -> Self {
        let menu_options = vec![
            MenuOption::new(
                "Manage Vehicles",
                "View, add, update, and delete vehicle details",
                'V',
                Screen::Vehicles,
            ),
            MenuOption::new(
                "Manage Drivers",
                "View, add, update, and delete driver details",
                'D',
                Screen::Drivers,
            ),
            MenuOption::new(
                "Trip Details",
                "Plan trips and assign drivers and vehicles",
                'T',
                Screen::Trips,
            ),
        ];

        let mut menu_state = ListState::default();
        menu_state.select(Some(0));

        Self {
            menu_state,
            menu_options,
        }
    }

    fn draw_menu(&mut self, f: &mut Frame, area: Rect) {
        let selected = self.menu_state.selected();
        let items: Vec<ListItem> = self
            .menu_options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let is_selected = Some(i) == selected;
                let style = if is_selected {
                    Styles::selected()
                } else {
                    Style::default()
                };

                ListItem::new(vec![
                    Line::from(vec![
                        Span::styled(format!("[{}] ", option.shortcut), Styles::info()),
                        Span::styled(option.title.clone(), style.add_modifier(Modifier::BOLD)),
                    ]),
                    Line::from(Span::styled(
                        format!("     {}", option.description),
                        if is_selected { style } else { Styles::inactive() },
                    )),
                ])
            })
            .collect();

        let menu = List::new(items)
            .block(
                Block::default()
                    .title("Dashboard")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_stateful_widget(menu, area, &mut self.menu_state);
    }

    fn draw_instructions(&self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let instructions = vec![
            Line::from(vec![
                Span::styled("Navigation: ", Styles::info()),
                Span::raw("↑/↓ to move, "),
                Span::styled("Enter", bold),
                Span::raw(" to open"),
            ]),
            Line::from(vec![
                Span::styled("Shortcuts: ", Styles::info()),
                Span::styled("V/D/T", bold),
                Span::raw(" for direct access, "),
                Span::styled("F1/?", bold),
                Span::raw(" for help, "),
                Span::styled("q", bold),
                Span::raw(" to quit"),
            ]),
        ];

        let paragraph = Paragraph::new(instructions).block(
            Block::default()
                .title("Instructions")
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(paragraph, area);
    }
}

impl Navigable for MainMenuScreen {
    fn navigate_up(&mut self) {
        let selected = self.menu_state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.menu_options.len() - 1
        } else {
            selected - 1
        };
        self.menu_state.select(Some(new_selected));
    }

    fn navigate_down(&mut self) {
        let selected = self.menu_state.selected().unwrap_or(0);
        self.menu_state
            .select(Some((selected + 1) % self.menu_options.len()));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.menu_state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.menu_state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.menu_options.len()
    }
}

impl ScreenView for MainMenuScreen {
    fn screen_type(&self) -> Screen {
        Screen::Home
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Up => self.navigate_up(),
            KeyCode::Down => self.navigate_down(),
            KeyCode::Home => self.navigate_to_first(),
            KeyCode::End => self.navigate_to_last(),
            KeyCode::Enter => {
                if let Some(option) = self
                    .menu_state
                    .selected()
                    .and_then(|i| self.menu_options.get(i))
                {
                    return ScreenAction::NavigateTo(option.screen);
                }
            }
            KeyCode::Char(c) => {
                let upper = c.to_ascii_uppercase();
                if let Some(option) = self.menu_options.iter().find(|o| o.shortcut == upper) {
                    return ScreenAction::NavigateTo(option.screen);
                }
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(4),
            ])
            .split(area);

        let title = Paragraph::new("Admin Dashboard")
            .style(Styles::title())
            .block(Block::default().borders(Borders::ALL));
        f.render_widget(title, chunks[0]);

        self.draw_menu(f, chunks[1]);
        self.draw_instructions(f, chunks[2]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_shortcuts_are_case_insensitive() {
        let mut menu = MainMenuScreen::new();
        assert_eq!(
            menu.handle_key_event(key(KeyCode::Char('t'))),
            ScreenAction::NavigateTo(Screen::Trips)
        );
        assert_eq!(
            menu.handle_key_event(key(KeyCode::Char('D'))),
            ScreenAction::NavigateTo(Screen::Drivers)
        );
        assert_eq!(menu.handle_key_event(key(KeyCode::Char('x'))), ScreenAction::None);
    }

    #[test]
    fn test_navigation_wraps() {
        let mut menu = MainMenuScreen::new();
        menu.handle_key_event(key(KeyCode::Up));
        assert_eq!(menu.get_selected_index(), Some(2));
        assert_eq!(
            menu.handle_key_event(key(KeyCode::Enter)),
            ScreenAction::NavigateTo(Screen::Trips)
        );
    }
}
