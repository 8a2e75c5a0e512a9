//! Form field component for user input

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::dashboard::{traits::FormHandler, ui::Styles};
use crate::form::{FieldErrors, FieldKind, FieldSchema, FormSchema, FormValues, ReferenceOptions};

/// How a field takes input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFieldType {
    Text,
    Dropdown,
}

/// One dropdown entry; `value` is what gets submitted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DropdownOption {
    pub value: String,
    pub label: String,
}

impl DropdownOption {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }
}

/// Individual form field
#[derive(Debug, Clone)]
pub struct FormField {
    pub name: &'static str,
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub required: bool,
    /// Reference source feeding the dropdown options
    pub source: Option<&'static str>,
    pub is_focused: bool,
    /// Cursor position in characters
    pub cursor_position: usize,
    pub dropdown_options: Vec<DropdownOption>,
    pub dropdown_state: ListState,
    pub show_dropdown: bool,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(name: &'static str, label: &str, field_type: FormFieldType) -> Self {
        Self {
            name,
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            required: false,
            source: None,
            is_focused: false,
            cursor_position: 0,
            dropdown_options: Vec::new(),
            dropdown_state: ListState::default(),
            show_dropdown: false,
            validation_error: None,
        }
    }

    pub fn from_schema(schema: &FieldSchema) -> Self {
        let mut field = match &schema.kind {
            FieldKind::Text | FieldKind::DateTime => {
                FormField::new(schema.name, schema.label, FormFieldType::Text)
            }
            FieldKind::Choice(options) => FormField::new(schema.name, schema.label, FormFieldType::Dropdown)
                .with_dropdown_options(
                    options
                        .iter()
                        .map(|o| DropdownOption::new(o.as_str(), o.as_str()))
                        .collect(),
                ),
            FieldKind::Reference { source } => {
                let mut field = FormField::new(schema.name, schema.label, FormFieldType::Dropdown);
                field.source = Some(*source);
                field.placeholder = format!("Select {}", schema.label);
                field
            }
        };
        if !schema.placeholder.is_empty() {
            field.placeholder = schema.placeholder.to_string();
        }
        field.required = schema.is_required();
        field
    }

    pub fn with_dropdown_options(mut self, options: Vec<DropdownOption>) -> Self {
        self.set_dropdown_options(options);
        self
    }

    pub fn set_dropdown_options(&mut self, options: Vec<DropdownOption>) {
        self.dropdown_options = options;
        self.sync_dropdown_selection();
    }

    /// Replace the value, e.g. when the form is re-initialized
    pub fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.cursor_position = self.value.chars().count();
        self.sync_dropdown_selection();
    }

    fn sync_dropdown_selection(&mut self) {
        let index = self
            .dropdown_options
            .iter()
            .position(|o| o.value == self.value)
            .or(if self.dropdown_options.is_empty() { None } else { Some(0) });
        self.dropdown_state.select(index);
    }

    /// What the user sees: the option label for dropdowns, the raw text otherwise
    pub fn display_value(&self) -> String {
        match self.field_type {
            FormFieldType::Dropdown => self
                .dropdown_options
                .iter()
                .find(|o| o.value == self.value)
                .map(|o| o.label.clone())
                .unwrap_or_else(|| self.value.clone()),
            FormFieldType::Text => self.value.clone(),
        }
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
        if !focused {
            self.show_dropdown = false;
        }
    }

    fn byte_index(&self, char_pos: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_pos)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        let at = self.byte_index(self.cursor_position);
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            self.value.clear();
            self.validation_error = None;
            return;
        }
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.field_type == FormFieldType::Dropdown {
            return;
        }
        if self.cursor_position < self.value.chars().count() {
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    pub fn dropdown_up(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        self.show_dropdown = true;
        let selected = self.dropdown_state.selected().unwrap_or(0);
        let new_selected = if selected == 0 {
            self.dropdown_options.len() - 1
        } else {
            selected - 1
        };
        self.dropdown_state.select(Some(new_selected));
    }

    pub fn dropdown_down(&mut self) {
        if self.dropdown_options.is_empty() {
            return;
        }
        if !self.show_dropdown {
            self.show_dropdown = true;
            return;
        }
        let selected = self.dropdown_state.selected().unwrap_or(0);
        self.dropdown_state
            .select(Some((selected + 1) % self.dropdown_options.len()));
    }

    pub fn select_dropdown_value(&mut self) {
        if let Some(option) = self
            .dropdown_state
            .selected()
            .and_then(|i| self.dropdown_options.get(i))
        {
            self.value = option.value.clone();
            self.cursor_position = self.value.chars().count();
            self.validation_error = None;
        }
        self.show_dropdown = false;
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let shown = self.display_value();
        let (text, text_style) = if shown.is_empty() && !self.placeholder.is_empty() {
            (self.placeholder.clone(), Styles::inactive())
        } else {
            (shown, Styles::default())
        };

        let border_style = if self.is_focused {
            Styles::active_border()
        } else if self.validation_error.is_some() {
            Styles::error()
        } else {
            Styles::inactive_border()
        };

        let marker = if self.required { "*" } else { "" };
        let title = match &self.validation_error {
            Some(error) => format!("{}{} - {}", self.label, marker, error),
            None => format!("{}{}", self.label, marker),
        };

        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);

        f.render_widget(Paragraph::new(text).style(text_style).block(block), area);

        if self.is_focused && self.field_type == FormFieldType::Text {
            let before = &self.value[..self.byte_index(self.cursor_position)];
            let cursor_x = area.x + 1 + before.width() as u16;
            if cursor_x < area.x + area.width.saturating_sub(1) {
                f.set_cursor(cursor_x, area.y + 1);
            }
        }
    }

    /// Render the option list below `anchor` if it is open
    pub fn render_dropdown(&mut self, f: &mut Frame, anchor: Rect, bounds: Rect) {
        if !self.show_dropdown || self.dropdown_options.is_empty() {
            return;
        }

        let wanted = self.dropdown_options.len() as u16 + 2;
        let below = bounds.bottom().saturating_sub(anchor.bottom());
        let area = if below >= 3 {
            Rect::new(anchor.x, anchor.bottom(), anchor.width, wanted.min(below))
        } else {
            let height = wanted.min(anchor.y.saturating_sub(bounds.y));
            Rect::new(anchor.x, anchor.y.saturating_sub(height), anchor.width, height)
        };

        let items: Vec<ListItem> = self
            .dropdown_options
            .iter()
            .map(|option| ListItem::new(option.label.clone()))
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Options")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());

        f.render_widget(Clear, area);
        f.render_stateful_widget(list, area, &mut self.dropdown_state);
    }
}

/// Form container that manages multiple fields
pub struct Form {
    pub fields: Vec<FormField>,
    pub current_field: usize,
}

impl Form {
    pub fn new(fields: Vec<FormField>) -> Self {
        let mut form = Self {
            fields,
            current_field: 0,
        };
        form.update_focus();
        form
    }

    pub fn from_schema(schema: &FormSchema) -> Self {
        Self::new(schema.fields().iter().map(FormField::from_schema).collect())
    }

    fn update_focus(&mut self) {
        for (i, field) in self.fields.iter_mut().enumerate() {
            field.set_focus(i == self.current_field);
        }
    }

    pub fn get_current_field(&self) -> Option<&FormField> {
        self.fields.get(self.current_field)
    }

    pub fn get_current_field_mut(&mut self) -> Option<&mut FormField> {
        self.fields.get_mut(self.current_field)
    }

    pub fn blur(&mut self) {
        for field in &mut self.fields {
            field.set_focus(false);
        }
    }

    pub fn focus(&mut self) {
        self.update_focus();
    }

    /// Re-initialize every field from `values` and clear stale errors
    pub fn load_values(&mut self, values: &FormValues) {
        for field in &mut self.fields {
            field.set_value(values.get(field.name));
            field.validation_error = None;
        }
    }

    pub fn set_errors(&mut self, errors: &FieldErrors) {
        for field in &mut self.fields {
            field.validation_error = errors.get(field.name).map(str::to_string);
        }
    }

    pub fn set_reference_options(&mut self, references: &ReferenceOptions) {
        for field in &mut self.fields {
            if let Some(source) = field.source {
                let options = references
                    .get(source)
                    .iter()
                    .map(|o| DropdownOption::new(o.id.to_string(), format!("{} (#{})", o.label, o.id)))
                    .collect();
                field.set_dropdown_options(options);
            }
        }
    }

    /// Current field name and value, for pushing edits back into screen state
    pub fn current_entry(&self) -> Option<(&'static str, String)> {
        self.get_current_field().map(|f| (f.name, f.value.clone()))
    }

    pub fn current_is_text(&self) -> bool {
        matches!(self.get_current_field(), Some(f) if f.field_type == FormFieldType::Text)
    }

    pub fn dropdown_open(&self) -> bool {
        matches!(self.get_current_field(), Some(f) if f.show_dropdown)
    }

    /// Draw fields stacked, scrolled so the current field stays visible
    pub fn render(&mut self, f: &mut Frame, area: Rect) {
        let visible = (area.height / 3).max(1) as usize;
        let first = (self.current_field + 1).saturating_sub(visible);
        let shown: Vec<usize> = (first..self.fields.len()).take(visible).collect();

        let mut constraints: Vec<Constraint> = shown.iter().map(|_| Constraint::Length(3)).collect();
        constraints.push(Constraint::Min(0));
        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        for (slot, index) in shown.iter().enumerate() {
            self.fields[*index].render(f, rows[slot]);
        }

        if let Some(slot) = shown.iter().position(|i| *i == self.current_field) {
            let anchor = rows[slot];
            if let Some(field) = self.fields.get_mut(self.current_field) {
                field.render_dropdown(f, anchor, area);
            }
        }
    }
}

impl FormHandler for Form {
    fn get_current_field(&self) -> usize {
        self.current_field
    }

    fn set_current_field(&mut self, field: usize) {
        if field < self.fields.len() {
            self.current_field = field;
            self.update_focus();
        }
    }

    fn get_field_count(&self) -> usize {
        self.fields.len()
    }

    fn handle_char_input(&mut self, c: char) {
        if let Some(field) = self.get_current_field_mut() {
            field.insert_char(c);
        }
    }

    fn handle_backspace(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char();
        }
    }

    fn handle_delete(&mut self) {
        if let Some(field) = self.get_current_field_mut() {
            field.delete_char_forward();
        }
    }
}
