//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tracing::info;

use super::components::StatusDisplay;
use super::screens::{EntityScreen, MainMenuScreen};
use super::traits::{ScreenAction, ScreenView};
use super::ui::centered_rect;
use crate::api::ApiClient;
use crate::config::Config;
use crate::entities::{Drivers, Trips, Vehicles};

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Home,
    Vehicles,
    Drivers,
    Trips,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Home => "Admin Dashboard",
            Screen::Vehicles => "Vehicle Management",
            Screen::Drivers => "Driver Management",
            Screen::Trips => "Trip Details",
        }
    }
}

/// Main TUI application state
pub struct App {
    pub config: Config,
    api: ApiClient,
    /// Mounted screen; replacing it drops its pending request results
    active: Box<dyn ScreenView>,
    pub should_quit: bool,
    pub show_help_popup: bool,
    pub status: StatusDisplay,
}

impl App {
    pub fn new(config: Config, api: ApiClient) -> Self {
        Self {
            config,
            api,
            active: Box::new(MainMenuScreen::new()),
            should_quit: false,
            show_help_popup: false,
            status: StatusDisplay::new(),
        }
    }

    pub fn current_screen(&self) -> Screen {
        self.active.screen_type()
    }

    /// Run the main application loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = self.config.tick_rate();

        loop {
            terminal.draw(|f| self.draw(f))?;

            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            self.on_tick();

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Deliver finished background work to the mounted screen
    pub fn on_tick(&mut self) {
        for action in self.active.poll_events() {
            self.apply_action(action);
        }
        self.status.tick();
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return;
        }

        let typing = self.active.captures_text();
        match key.code {
            KeyCode::F(1) => {
                self.show_help_popup = true;
                return;
            }
            KeyCode::Char('?') if !typing => {
                self.show_help_popup = true;
                return;
            }
            KeyCode::Char('q') if !typing => {
                self.should_quit = true;
                return;
            }
            _ => {}
        }

        let action = self.active.handle_key_event(key);
        self.apply_action(action);
    }

    fn apply_action(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::NavigateTo(screen) => self.navigate_to_screen(screen),
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::None => {}
        }
    }

    /// Mount a fresh instance of `screen`; its state is never carried over
    pub fn navigate_to_screen(&mut self, screen: Screen) {
        info!("Navigating to {:?}", screen);
        let api = self.api.clone();
        let mut next: Box<dyn ScreenView> = match screen {
            Screen::Home => Box::new(MainMenuScreen::new()),
            Screen::Vehicles => Box::new(EntityScreen::<Vehicles>::new(screen, api)),
            Screen::Drivers => Box::new(EntityScreen::<Drivers>::new(screen, api)),
            Screen::Trips => Box::new(EntityScreen::<Trips>::new(screen, api)),
        };
        next.on_enter();
        self.active = next;
        self.status.clear();
    }

    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        self.active.draw(f, chunks[0]);

        let title = format!("fleetdash - {}", self.current_screen().title());
        self.status
            .render_with_title(f, chunks[1], &title, "Esc: Back | q: Quit | F1/?: Help");

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help())
            .block(
                Block::default()
                    .title("Help - Context Shortcuts")
                    .borders(Borders::ALL)
                    .style(Style::default().fg(Color::Yellow)),
            )
            .style(Style::default().fg(Color::White));

        f.render_widget(help_popup, popup_area);
    }

    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            Esc - Go back / cancel\n\
            q - Quit (when not typing)\n\
            Ctrl+C - Quit\n\
            F1 / ? - Toggle this help\n\n";

        let screen_help = match self.current_screen() {
            Screen::Home => {
                "Dashboard:\n\
                ↑/↓ - Navigate menu\n\
                Enter - Open screen\n\
                V - Vehicles\n\
                D - Drivers\n\
                T - Trips"
            }
            Screen::Vehicles | Screen::Drivers | Screen::Trips => {
                "Grid:\n\
                ↑/↓ - Select row\n\
                ←/→ - Select column\n\
                s - Sort by column (asc, desc, off)\n\
                / - Filter column, c - Clear filters\n\
                e / Enter - Edit row\n\
                n - New record\n\
                d / Delete - Delete row (y to confirm)\n\
                r - Reload from server\n\
                Tab - Go to form\n\n\
                Form:\n\
                Tab / Shift+Tab - Next / previous field\n\
                ↑/↓ - Open and move through options\n\
                Enter - Pick option or save\n\
                Ctrl+S - Save\n\
                Esc - Cancel edit"
            }
        };

        format!("{}{}", global_help, screen_help)
    }
}
