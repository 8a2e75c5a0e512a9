//! Management screen for one entity type: grid on the left, form on the right

use std::sync::Arc;

use chrono::Local;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tokio::sync::mpsc;
use tracing::{debug, info};

use crate::api::{ApiClient, Resource, ResourceClient};
use crate::crud::{report_failure, Change, CrudScreen, Mode, Operation, SubmitTarget};
use crate::dashboard::{
    app::Screen,
    components::{DataGrid, Form},
    events::CrudEvent,
    traits::{FormHandler, Navigable, ScreenAction, ScreenView},
    ui::Styles,
};
use crate::entities::Entity;
use crate::models::{Identified, RecordId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Grid,
    Form,
    /// Typing a filter for the grid's focused column
    Filter,
}

pub struct EntityScreen<E: Entity> {
    screen: Screen,
    api: ApiClient,
    crud: CrudScreen<E>,
    grid: DataGrid<E::Record>,
    form: Form,
    focus: Focus,
    filter_input: String,
    pending_delete: Option<RecordId>,
    tx: mpsc::UnboundedSender<CrudEvent<E::Record>>,
    rx: mpsc::UnboundedReceiver<CrudEvent<E::Record>>,
}

impl<E: Entity> EntityScreen<E> {
    pub fn new(screen: Screen, api: ApiClient) -> Self {
        let resource: Arc<dyn Resource<Entity = E>> = Arc::new(ResourceClient::<E>::new(api.clone()));
        Self::with_resource(screen, api, resource)
    }

    pub fn with_resource(screen: Screen, api: ApiClient, resource: Arc<dyn Resource<Entity = E>>) -> Self {
        let crud = CrudScreen::new(resource);
        let form = Form::from_schema(crud.schema());
        let (tx, rx) = mpsc::unbounded_channel();
        let mut screen = Self {
            screen,
            api,
            crud,
            grid: DataGrid::new(E::columns()),
            form,
            focus: Focus::Grid,
            filter_input: String::new(),
            pending_delete: None,
            tx,
            rx,
        };
        screen.form.blur();
        screen
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn crud(&self) -> &CrudScreen<E> {
        &self.crud
    }

    fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
        if focus == Focus::Form {
            self.form.focus();
        } else {
            self.form.blur();
        }
    }

    fn spawn_list(&self) {
        let resource = self.crud.resource();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match resource.list().await {
                Ok(records) => CrudEvent::Listed(records),
                Err(e) => CrudEvent::Failed(report_failure(E::NAME, Operation::List, &e)),
            };
            // receiver is gone once the user navigated away
            let _ = tx.send(event);
        });
    }

    fn spawn_references(&self) {
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let references = E::load_references(&api).await;
            let _ = tx.send(CrudEvent::ReferencesLoaded(references));
        });
    }

    fn spawn_delete(&self, id: RecordId) {
        let resource = self.crud.resource();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match resource.delete(id).await {
                Ok(()) => CrudEvent::Changed(Change::Deleted(id)),
                Err(e) => CrudEvent::Failed(report_failure(E::NAME, Operation::Delete(id), &e)),
            };
            let _ = tx.send(event);
        });
    }

    fn submit(&mut self) -> ScreenAction {
        let submission = match self.crud.prepare_submission(Local::now().naive_local()) {
            Some(submission) => submission,
            None => {
                self.form.set_errors(self.crud.errors());
                return ScreenAction::SetError(format!(
                    "{} field(s) need attention",
                    self.crud.errors().len()
                ));
            }
        };

        if submission.target == SubmitTarget::Create {
            self.sync_form();
        }

        let operation = submission.operation();
        let resource = self.crud.resource();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let event = match submission.send(resource.as_ref()).await {
                Ok(change) => CrudEvent::Changed(change),
                Err(e) => CrudEvent::Failed(report_failure(E::NAME, operation, &e)),
            };
            let _ = tx.send(event);
        });

        ScreenAction::SetStatus(format!("Saving {}...", E::NAME.to_lowercase()))
    }

    /// Reload the form widgets from screen state after the state changed underneath them
    fn sync_form(&mut self) {
        self.form.load_values(self.crud.form());
        self.form.set_errors(self.crud.errors());
    }

    /// Push the edited field's value into screen state
    fn push_current_value(&mut self) {
        if let Some((name, value)) = self.form.current_entry() {
            self.crud.set_value(name, value);
        }
    }

    fn start_edit(&mut self) -> ScreenAction {
        let Some(id) = self.grid.selected_id() else {
            return ScreenAction::None;
        };
        if self.crud.select_for_edit(id) {
            self.sync_form();
            self.form.set_current_field(0);
            self.set_focus(Focus::Form);
            ScreenAction::SetStatus(format!("Editing {} #{}", E::NAME.to_lowercase(), id))
        } else {
            ScreenAction::None
        }
    }

    fn start_create(&mut self) -> ScreenAction {
        self.crud.cancel_edit();
        self.sync_form();
        self.form.set_current_field(0);
        self.set_focus(Focus::Form);
        ScreenAction::SetStatus(format!("New {}", E::NAME.to_lowercase()))
    }

    fn apply_event(&mut self, event: CrudEvent<E::Record>) -> ScreenAction {
        match event {
            CrudEvent::Listed(records) => {
                let count = records.len();
                self.crud.load(records);
                if self.crud.mode() == Mode::Viewing {
                    self.sync_form();
                }
                self.grid.refresh(self.crud.records());
                debug!("{} screen loaded {} records", E::NAME, count);
                ScreenAction::SetStatus(format!("Loaded {} {}", count, E::PLURAL.to_lowercase()))
            }
            CrudEvent::ReferencesLoaded(references) => {
                self.form.set_reference_options(&references);
                self.crud.set_references(references);
                ScreenAction::None
            }
            CrudEvent::Changed(change) => {
                let message = match &change {
                    Change::Created(record) => format!("{} #{} added", E::NAME, record.id()),
                    Change::Updated { id, .. } => format!("{} #{} updated", E::NAME, id),
                    Change::Deleted(id) => format!("{} #{} deleted", E::NAME, id),
                };
                let was_editing = self.crud.mode() != Mode::Viewing;
                self.crud.apply(change);
                if self.crud.mode() == Mode::Viewing {
                    self.sync_form();
                    if was_editing {
                        self.set_focus(Focus::Grid);
                    }
                }
                self.grid.refresh(self.crud.records());
                info!("{}", message);
                ScreenAction::SetStatus(message)
            }
            CrudEvent::Failed(message) => ScreenAction::SetError(message),
        }
    }

    fn handle_grid_key(&mut self, key: KeyEvent) -> ScreenAction {
        if let Some(id) = self.pending_delete.take() {
            if matches!(key.code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.spawn_delete(id);
                return ScreenAction::SetStatus(format!("Deleting {} #{}...", E::NAME.to_lowercase(), id));
            }
            return ScreenAction::SetStatus("Delete cancelled".to_string());
        }

        match key.code {
            KeyCode::Up => self.grid.navigate_up(),
            KeyCode::Down => self.grid.navigate_down(),
            KeyCode::Home => self.grid.navigate_to_first(),
            KeyCode::End => self.grid.navigate_to_last(),
            KeyCode::Left => self.grid.previous_column(),
            KeyCode::Right => self.grid.next_column(),
            KeyCode::Char('s') => self.grid.cycle_sort(self.crud.records()),
            KeyCode::Char('/') => {
                let column = self.grid.focused_column;
                self.filter_input = self.grid.view.filter(column).unwrap_or_default().to_string();
                self.focus = Focus::Filter;
            }
            KeyCode::Char('c') => {
                self.grid.clear_filters(self.crud.records());
                return ScreenAction::SetStatus("Filters cleared".to_string());
            }
            KeyCode::Enter | KeyCode::Char('e') => return self.start_edit(),
            KeyCode::Char('n') => return self.start_create(),
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(id) = self.grid.selected_id() {
                    self.pending_delete = Some(id);
                    return ScreenAction::SetStatus(format!(
                        "Delete {} #{}? Press y to confirm",
                        E::NAME.to_lowercase(),
                        id
                    ));
                }
            }
            KeyCode::Char('r') => {
                self.on_enter();
                return ScreenAction::SetStatus(format!("Reloading {}...", E::PLURAL.to_lowercase()));
            }
            KeyCode::Tab => self.set_focus(Focus::Form),
            KeyCode::Esc => return ScreenAction::NavigateTo(Screen::Home),
            _ => {}
        }
        ScreenAction::None
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Char(c) => self.filter_input.push(c),
            KeyCode::Backspace => {
                self.filter_input.pop();
            }
            KeyCode::Enter => {
                self.focus = Focus::Grid;
                return ScreenAction::None;
            }
            KeyCode::Esc => {
                self.filter_input.clear();
                self.focus = Focus::Grid;
            }
            _ => return ScreenAction::None,
        }
        let text = self.filter_input.clone();
        self.grid.set_filter(&text, self.crud.records());
        ScreenAction::None
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> ScreenAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
            return self.submit();
        }

        match key.code {
            KeyCode::Tab => self.form.next_field(),
            KeyCode::BackTab => self.form.previous_field(),
            KeyCode::Esc => {
                if self.form.dropdown_open() {
                    if let Some(field) = self.form.get_current_field_mut() {
                        field.show_dropdown = false;
                    }
                    return ScreenAction::None;
                }
                let was_editing = self.crud.mode() != Mode::Viewing;
                if was_editing {
                    self.crud.cancel_edit();
                    self.sync_form();
                }
                self.set_focus(Focus::Grid);
                if was_editing {
                    return ScreenAction::SetStatus("Edit cancelled".to_string());
                }
            }
            KeyCode::Enter => {
                if self.form.dropdown_open() {
                    if let Some(field) = self.form.get_current_field_mut() {
                        field.select_dropdown_value();
                    }
                    self.push_current_value();
                } else {
                    return self.submit();
                }
            }
            KeyCode::Up => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.dropdown_up();
                }
            }
            KeyCode::Down => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.dropdown_down();
                }
            }
            KeyCode::Left => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_right();
                }
            }
            KeyCode::Home => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_to_start();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.form.get_current_field_mut() {
                    field.move_cursor_to_end();
                }
            }
            KeyCode::Backspace => {
                self.form.handle_backspace();
                self.push_current_value();
            }
            KeyCode::Delete => {
                self.form.handle_delete();
                self.push_current_value();
            }
            KeyCode::Char(c) => {
                self.form.handle_char_input(c);
                self.push_current_value();
            }
            _ => {}
        }
        ScreenAction::None
    }

    fn form_title(&self) -> String {
        match self.crud.mode() {
            Mode::Viewing => format!("Add {}", E::NAME),
            Mode::Editing(id) => format!("Edit {} #{}", E::NAME, id),
        }
    }

    fn key_hints(&self) -> Line<'static> {
        let hints: &[(&str, &str)] = match self.focus {
            Focus::Grid => &[
                ("e", "edit"),
                ("n", "new"),
                ("d", "delete"),
                ("s", "sort"),
                ("/", "filter"),
                ("r", "reload"),
                ("Tab", "form"),
            ],
            Focus::Form => &[
                ("Tab", "next"),
                ("Enter/Ctrl+S", "save"),
                ("↑/↓", "options"),
                ("Esc", "cancel"),
            ],
            Focus::Filter => &[("Enter", "done"), ("Esc", "clear")],
        };

        let mut spans = Vec::new();
        for (key, action) in hints {
            spans.push(Span::styled(key.to_string(), Styles::info()));
            spans.push(Span::raw(format!(" {}  ", action)));
        }
        Line::from(spans)
    }
}

impl<E: Entity> ScreenView for EntityScreen<E> {
    fn screen_type(&self) -> Screen {
        self.screen
    }

    fn on_enter(&mut self) {
        info!("Loading {}", E::PLURAL.to_lowercase());
        self.spawn_list();
        self.spawn_references();
    }

    fn poll_events(&mut self) -> Vec<ScreenAction> {
        let mut actions = Vec::new();
        while let Ok(event) = self.rx.try_recv() {
            let action = self.apply_event(event);
            if action != ScreenAction::None {
                actions.push(action);
            }
        }
        actions
    }

    fn captures_text(&self) -> bool {
        match self.focus {
            Focus::Filter => true,
            Focus::Form => self.form.current_is_text(),
            Focus::Grid => false,
        }
    }

    fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match self.focus {
            Focus::Grid => self.handle_grid_key(key),
            Focus::Form => self.handle_form_key(key),
            Focus::Filter => self.handle_filter_key(key),
        }
    }

    fn draw(&mut self, f: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(area);

        let left = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(if self.focus == Focus::Filter { 3 } else { 0 }),
            ])
            .split(columns[0]);

        let editing = match self.crud.mode() {
            Mode::Editing(id) => Some(id),
            Mode::Viewing => None,
        };
        self.grid.render(
            f,
            left[0],
            self.crud.records(),
            editing,
            self.focus != Focus::Form,
            E::PLURAL,
        );

        if self.focus == Focus::Filter {
            let column = self
                .grid
                .focused_column()
                .map(|c| c.header)
                .unwrap_or_default();
            let input = Paragraph::new(self.filter_input.clone()).block(
                Block::default()
                    .title(format!("Filter {}", column))
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            );
            f.render_widget(input, left[1]);
        }

        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(columns[1]);

        let form_block = Block::default()
            .title(self.form_title())
            .borders(Borders::ALL)
            .border_style(if self.focus == Focus::Form {
                Styles::active_border()
            } else {
                Styles::inactive_border()
            });
        let form_area = form_block.inner(right[0]);
        f.render_widget(form_block, right[0]);
        self.form.render(f, form_area);

        let hints = Paragraph::new(self.key_hints()).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );
        f.render_widget(hints, right[1]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiError, StaticTokenSigner};
    use crate::config::ApiConfig;
    use crate::entities::Drivers;
    use crate::models::{Driver, DriverPayload};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MemoryDrivers {
        records: Mutex<Vec<Driver>>,
    }

    fn driver(id: RecordId, name: &str) -> Driver {
        Driver {
            id,
            driver_name: name.to_string(),
            extra: Default::default(),
        }
    }

    #[async_trait]
    impl Resource for MemoryDrivers {
        type Entity = Drivers;

        async fn list(&self) -> Result<Vec<Driver>, ApiError> {
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, payload: &DriverPayload) -> Result<Driver, ApiError> {
            let mut records = self.records.lock().unwrap();
            let record = driver(records.len() as RecordId + 10, &payload.driver_name);
            records.push(record.clone());
            Ok(record)
        }

        async fn update(&self, id: RecordId, payload: &DriverPayload) -> Result<Driver, ApiError> {
            Ok(driver(id, &payload.driver_name))
        }

        async fn delete(&self, _id: RecordId) -> Result<(), ApiError> {
            Ok(())
        }
    }

    fn screen(records: Vec<Driver>) -> EntityScreen<Drivers> {
        let api = ApiClient::new(&ApiConfig::default(), Arc::new(StaticTokenSigner::new("t"))).unwrap();
        let resource = Arc::new(MemoryDrivers {
            records: Mutex::new(records),
        });
        EntityScreen::with_resource(Screen::Drivers, api, resource)
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    async fn settle(screen: &mut EntityScreen<Drivers>) -> Vec<ScreenAction> {
        for _ in 0..50 {
            tokio::task::yield_now().await;
        }
        screen.poll_events()
    }

    #[tokio::test]
    async fn test_reload_then_edit_and_save() {
        let mut screen = screen(vec![driver(1, "Ravi"), driver(2, "Asha")]);
        screen.handle_key_event(key(KeyCode::Char('r')));
        let actions = settle(&mut screen).await;
        assert!(actions.contains(&ScreenAction::SetStatus("Loaded 2 drivers".to_string())));
        assert_eq!(screen.crud().records().len(), 2);

        screen.handle_key_event(key(KeyCode::Down));
        screen.handle_key_event(key(KeyCode::Char('e')));
        assert_eq!(screen.focus(), Focus::Form);
        assert_eq!(screen.crud().mode(), Mode::Editing(2));
        assert!(screen.captures_text());

        screen.handle_key_event(key(KeyCode::Char('!')));
        screen.handle_key_event(key(KeyCode::Enter));
        let actions = settle(&mut screen).await;

        assert!(actions.contains(&ScreenAction::SetStatus("Driver #2 updated".to_string())));
        assert_eq!(screen.crud().records()[1].driver_name, "Asha!");
        assert_eq!(screen.crud().mode(), Mode::Viewing);
        assert_eq!(screen.focus(), Focus::Grid);
    }

    #[tokio::test]
    async fn test_create_clears_form_before_result_arrives() {
        let mut screen = screen(Vec::new());
        screen.handle_key_event(key(KeyCode::Char('n')));
        for c in "Meera".chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }

        screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(screen.form.get_current_field().map(|f| f.value.as_str()), Some(""));

        screen.handle_key_event(key(KeyCode::Char('J')));
        let actions = settle(&mut screen).await;
        assert!(actions.contains(&ScreenAction::SetStatus("Driver #10 added".to_string())));
        assert_eq!(screen.crud().records()[0].driver_name, "Meera");
        assert_eq!(screen.crud().form().get("driverName"), "J");
        assert_eq!(screen.form.get_current_field().map(|f| f.value.as_str()), Some("J"));
    }

    #[tokio::test]
    async fn test_invalid_form_reports_errors_without_request() {
        let mut screen = screen(Vec::new());
        screen.handle_key_event(key(KeyCode::Char('n')));
        screen.handle_key_event(key(KeyCode::Char('A')));

        let action = screen.handle_key_event(key(KeyCode::Enter));
        assert_eq!(action, ScreenAction::SetError("1 field(s) need attention".to_string()));
        assert!(screen.crud().errors().contains("driverName"));
        assert!(settle(&mut screen).await.is_empty());
    }

    #[tokio::test]
    async fn test_delete_requires_confirmation() {
        let mut screen = screen(vec![driver(1, "Ravi")]);
        screen.on_enter();
        settle(&mut screen).await;

        screen.handle_key_event(key(KeyCode::Char('d')));
        screen.handle_key_event(key(KeyCode::Char('x')));
        settle(&mut screen).await;
        assert_eq!(screen.crud().records().len(), 1);

        screen.handle_key_event(key(KeyCode::Char('d')));
        screen.handle_key_event(key(KeyCode::Char('y')));
        let actions = settle(&mut screen).await;
        assert!(actions.contains(&ScreenAction::SetStatus("Driver #1 deleted".to_string())));
        assert!(screen.crud().records().is_empty());
    }
}
