//! Sortable, filterable record grid

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::crud::{Column, GridView, SortDirection};
use crate::dashboard::{traits::Navigable, ui::{fit, Styles}};
use crate::models::{Identified, RecordId};

const SEPARATOR: &str = " | ";

/// Grid state for one screen: columns, sort/filter settings and row selection
pub struct DataGrid<R> {
    columns: Vec<Column<R>>,
    pub view: GridView,
    pub state: ListState,
    pub focused_column: usize,
    /// Ids of the rows as currently displayed
    row_ids: Vec<RecordId>,
}

impl<R: Identified> DataGrid<R> {
    pub fn new(columns: Vec<Column<R>>) -> Self {
        Self {
            columns,
            view: GridView::new(),
            state: ListState::default(),
            focused_column: 0,
            row_ids: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[Column<R>] {
        &self.columns
    }

    pub fn focused_column(&self) -> Option<&Column<R>> {
        self.columns.get(self.focused_column)
    }

    /// Recompute displayed rows, keeping the selected record selected when it is still shown
    pub fn refresh(&mut self, records: &[R]) {
        let previous = self.selected_id();
        self.row_ids = self
            .view
            .rows(&self.columns, records)
            .iter()
            .map(|r| r.id())
            .collect();

        let index = previous
            .and_then(|id| self.row_ids.iter().position(|r| *r == id))
            .or(if self.row_ids.is_empty() { None } else { Some(0) })
            .map(|i| i.min(self.row_ids.len().saturating_sub(1)));
        self.state.select(index);
    }

    pub fn row_count(&self) -> usize {
        self.row_ids.len()
    }

    pub fn selected_id(&self) -> Option<RecordId> {
        self.state.selected().and_then(|i| self.row_ids.get(i).copied())
    }

    pub fn next_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = (self.focused_column + 1) % self.columns.len();
        }
    }

    pub fn previous_column(&mut self) {
        if !self.columns.is_empty() {
            self.focused_column = self
                .focused_column
                .checked_sub(1)
                .unwrap_or(self.columns.len() - 1);
        }
    }

    pub fn cycle_sort(&mut self, records: &[R]) {
        self.view.cycle_sort(self.focused_column);
        self.refresh(records);
    }

    pub fn set_filter(&mut self, text: &str, records: &[R]) {
        self.view.set_filter(self.focused_column, text);
        self.refresh(records);
    }

    pub fn clear_filters(&mut self, records: &[R]) {
        self.view.clear_filters();
        self.refresh(records);
    }

    fn header_line(&self) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, column) in self.columns.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(SEPARATOR, Styles::inactive()));
            }
            let arrow = match self.view.sort() {
                Some((c, SortDirection::Ascending)) if c == i => "▲",
                Some((c, SortDirection::Descending)) if c == i => "▼",
                _ => "",
            };
            let style = if i == self.focused_column {
                Styles::header().add_modifier(ratatui::style::Modifier::UNDERLINED)
            } else {
                Styles::header()
            };
            let label = format!("{}{}", column.header, arrow);
            spans.push(Span::styled(fit(&label, column.width as usize), style));
        }
        Line::from(spans)
    }

    fn filter_summary(&self) -> Option<String> {
        if !self.view.has_filters() {
            return None;
        }
        let parts: Vec<String> = self
            .columns
            .iter()
            .enumerate()
            .filter_map(|(i, c)| self.view.filter(i).map(|text| format!("{}~\"{}\"", c.header, text)))
            .collect();
        Some(parts.join(", "))
    }

    /// Render the grid; `editing` marks the record loaded into the form
    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        records: &[R],
        editing: Option<RecordId>,
        focused: bool,
        title: &str,
    ) {
        self.refresh(records);

        let block = Block::default()
            .title(format!("{} ({}/{})", title, self.row_ids.len(), records.len()))
            .borders(Borders::ALL)
            .border_style(if focused {
                Styles::active_border()
            } else {
                Styles::inactive_border()
            });
        let inner = block.inner(area);
        f.render_widget(block, area);

        let filter = self.filter_summary();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(if filter.is_some() { 1 } else { 0 }),
                Constraint::Min(0),
            ])
            .split(inner);

        f.render_widget(Paragraph::new(self.header_line()), chunks[0]);
        if let Some(filter) = filter {
            f.render_widget(
                Paragraph::new(format!("Filter: {}", filter)).style(Styles::warning()),
                chunks[1],
            );
        }

        let rows = self.view.rows(&self.columns, records);
        let items: Vec<ListItem> = rows
            .iter()
            .map(|record| {
                let style = if Some(record.id()) == editing {
                    Styles::editing()
                } else {
                    Style::default()
                };
                ListItem::new(format_row(&self.columns, record)).style(style)
            })
            .collect();

        let list = List::new(items).highlight_style(if focused {
            Styles::selected()
        } else {
            Styles::inactive()
        });
        f.render_stateful_widget(list, chunks[2], &mut self.state);
    }
}

/// One grid line with every cell fitted to its column width
pub fn format_row<R>(columns: &[Column<R>], record: &R) -> String {
    columns
        .iter()
        .map(|c| fit(&c.cell(record), c.width as usize))
        .collect::<Vec<_>>()
        .join(SEPARATOR)
}

impl<R: Identified> Navigable for DataGrid<R> {
    fn navigate_up(&mut self) {
        if self.row_ids.is_empty() {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        self.state.select(Some(selected.saturating_sub(1)));
    }

    fn navigate_down(&mut self) {
        if self.row_ids.is_empty() {
            return;
        }
        let next = self.state.selected().map(|i| i + 1).unwrap_or(0);
        self.state.select(Some(next.min(self.row_ids.len() - 1)));
    }

    fn get_selected_index(&self) -> Option<usize> {
        self.state.selected()
    }

    fn set_selected_index(&mut self, index: Option<usize>) {
        self.state.select(index);
    }

    fn get_item_count(&self) -> usize {
        self.row_ids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Entity, Vehicles};
    use crate::models::Vehicle;
    use ratatui::{backend::TestBackend, Terminal};

    fn vehicles() -> Vec<Vehicle> {
        serde_json::from_str(
            r#"[{"id":1,"vehicleNumber":"MH12-1234","vehicleName":"Tata Ace","vehicleModelNumber":"ACE-2",
                 "puc":"Valid","accidentHistory":"No Accidents","carryingCapacity":"1000kg"}]"#,
        )
        .unwrap()
    }

    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|line| line.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_single_record_renders_one_row() {
        let records = vehicles();
        let mut grid = DataGrid::new(Vehicles::columns());
        let mut terminal = Terminal::new(TestBackend::new(120, 10)).unwrap();

        terminal
            .draw(|f| grid.render(f, f.size(), &records, None, true, "Vehicles"))
            .unwrap();

        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.selected_id(), Some(1));

        let text = screen_text(&terminal);
        let row_lines: Vec<&str> = text.lines().filter(|l| l.contains("MH12-1234")).collect();
        assert_eq!(row_lines.len(), 1);
        assert!(row_lines[0].contains("Tata Ace"));
        assert!(row_lines[0].contains("1000kg"));
        assert!(text.contains("Vehicles (1/1)"));
    }

    #[test]
    fn test_selection_follows_record_across_sort() {
        let mut records = vehicles();
        let mut second = records[0].clone();
        second.id = 2;
        second.vehicle_number = "AA11-0000".to_string();
        records.push(second);

        let mut grid = DataGrid::new(Vehicles::columns());
        grid.refresh(&records);
        grid.navigate_down();
        assert_eq!(grid.selected_id(), Some(2));

        grid.cycle_sort(&records);
        assert_eq!(grid.selected_id(), Some(2));
        assert_eq!(grid.get_selected_index(), Some(0));
    }

    #[test]
    fn test_filter_narrows_rows() {
        let records = vehicles();
        let mut grid = DataGrid::new(Vehicles::columns());
        grid.set_filter("zz", &records);
        assert_eq!(grid.row_count(), 0);
        assert_eq!(grid.selected_id(), None);

        grid.clear_filters(&records);
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_format_row_is_fixed_width() {
        let records = vehicles();
        let columns = Vehicles::columns();
        let line = format_row(&columns, &records[0]);
        let expected: usize = columns.iter().map(|c| c.width as usize).sum::<usize>()
            + SEPARATOR.len() * (columns.len() - 1);
        assert_eq!(line.chars().count(), expected);
    }
}
