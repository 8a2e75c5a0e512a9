//! Column definitions plus client-side sorting and filtering

use std::cmp::Ordering;
use std::collections::BTreeMap;

/// One grid column: a header and how to render a record's cell
pub struct Column<R> {
    pub header: &'static str,
    /// Field name used by the `list` command's `--sort`/`--filter` flags
    pub field: &'static str,
    pub width: u16,
    pub value: fn(&R) -> String,
}

impl<R> Column<R> {
    pub fn new(header: &'static str, field: &'static str, width: u16, value: fn(&R) -> String) -> Self {
        Self {
            header,
            field,
            width,
            value,
        }
    }

    pub fn cell(&self, record: &R) -> String {
        (self.value)(record)
    }
}

impl<R> Clone for Column<R> {
    fn clone(&self) -> Self {
        Self {
            header: self.header,
            field: self.field,
            width: self.width,
            value: self.value,
        }
    }
}

impl<R> std::fmt::Debug for Column<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("header", &self.header)
            .field("field", &self.field)
            .finish()
    }
}

/// Find a column by field name or header, ignoring case
pub fn column_index<R>(columns: &[Column<R>], name: &str) -> Option<usize> {
    columns.iter().position(|c| {
        c.field.eq_ignore_ascii_case(name) || c.header.eq_ignore_ascii_case(name)
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Sort and filter settings of one grid; never touches the records themselves
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GridView {
    sort: Option<(usize, SortDirection)>,
    filters: BTreeMap<usize, String>,
}

impl GridView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sort(&self) -> Option<(usize, SortDirection)> {
        self.sort
    }

    /// none -> ascending -> descending -> none; switching columns starts at ascending
    pub fn cycle_sort(&mut self, column: usize) {
        self.sort = match self.sort {
            Some((c, SortDirection::Ascending)) if c == column => Some((column, SortDirection::Descending)),
            Some((c, SortDirection::Descending)) if c == column => None,
            _ => Some((column, SortDirection::Ascending)),
        };
    }

    pub fn set_sort(&mut self, sort: Option<(usize, SortDirection)>) {
        self.sort = sort;
    }

    /// Set a column's filter text; empty text removes the filter
    pub fn set_filter(&mut self, column: usize, text: &str) {
        if text.is_empty() {
            self.filters.remove(&column);
        } else {
            self.filters.insert(column, text.to_string());
        }
    }

    pub fn filter(&self, column: usize) -> Option<&str> {
        self.filters.get(&column).map(String::as_str)
    }

    pub fn has_filters(&self) -> bool {
        !self.filters.is_empty()
    }

    pub fn clear_filters(&mut self) {
        self.filters.clear();
    }

    /// Records that pass every filter, in display order
    pub fn rows<'a, R>(&self, columns: &[Column<R>], records: &'a [R]) -> Vec<&'a R> {
        let filters: Vec<(&Column<R>, String)> = self
            .filters
            .iter()
            .filter_map(|(index, text)| columns.get(*index).map(|c| (c, text.to_lowercase())))
            .collect();

        let mut rows: Vec<&R> = records
            .iter()
            .filter(|record| {
                filters
                    .iter()
                    .all(|(column, needle)| column.cell(record).to_lowercase().contains(needle.as_str()))
            })
            .collect();

        if let Some((index, direction)) = self.sort {
            if let Some(column) = columns.get(index) {
                rows.sort_by(|a, b| {
                    let ordering = compare_cells(&column.cell(a), &column.cell(b));
                    match direction {
                        SortDirection::Ascending => ordering,
                        SortDirection::Descending => ordering.reverse(),
                    }
                });
            }
        }

        rows
    }
}

/// Numbers compare numerically, everything else case-insensitively
fn compare_cells(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => a.to_lowercase().cmp(&b.to_lowercase()),
    }
}
