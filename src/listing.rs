//! Plain-text rendering of entity grids for the `list` command

use anyhow::{anyhow, Result};
use unicode_width::UnicodeWidthStr;

use crate::crud::{column_index, Column, GridView, SortDirection};

/// Build a grid view from `--sort FIELD[:desc]` and `--filter FIELD=TEXT` arguments
pub fn build_view<R>(columns: &[Column<R>], sort: Option<&str>, filters: &[String]) -> Result<GridView> {
    let mut view = GridView::new();

    if let Some(arg) = sort {
        let (field, direction) = match arg.rsplit_once(':') {
            Some((field, dir)) if dir.eq_ignore_ascii_case("desc") => (field, SortDirection::Descending),
            Some((field, dir)) if dir.eq_ignore_ascii_case("asc") => (field, SortDirection::Ascending),
            _ => (arg, SortDirection::Ascending),
        };
        let index = lookup(columns, field)?;
        view.set_sort(Some((index, direction)));
    }

    for filter in filters {
        let (field, text) = filter
            .split_once('=')
            .ok_or_else(|| anyhow!("Invalid filter '{}', expected FIELD=TEXT", filter))?;
        let index = lookup(columns, field)?;
        view.set_filter(index, text);
    }

    Ok(view)
}

fn lookup<R>(columns: &[Column<R>], field: &str) -> Result<usize> {
    column_index(columns, field.trim()).ok_or_else(|| {
        let known: Vec<&str> = columns.iter().map(|c| c.field).collect();
        anyhow!("Unknown column '{}'. Available: {}", field, known.join(", "))
    })
}

/// Render rows as an aligned text table with a header line
pub fn render_table<R>(columns: &[Column<R>], rows: &[&R]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| columns.iter().map(|c| c.cell(row)).collect())
        .collect();

    let widths: Vec<usize> = columns
        .iter()
        .enumerate()
        .map(|(i, c)| {
            cells
                .iter()
                .map(|row| row[i].width())
                .chain(std::iter::once(c.header.width()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut out = String::new();
    let header: Vec<String> = columns.iter().map(|c| c.header.to_string()).collect();
    push_line(&mut out, &header, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_line(&mut out, &rule, &widths);
    for row in &cells {
        push_line(&mut out, row, &widths);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{}{}", cell, " ".repeat(width.saturating_sub(cell.width()))))
        .collect();
    out.push_str(padded.join("  ").trim_end());
    out.push('\n');
}
