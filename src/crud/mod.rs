//! Generic CRUD screen logic shared by every entity type

pub mod grid;
pub mod list_state;
pub mod screen;

pub use grid::{column_index, Column, GridView, SortDirection};
pub use list_state::EntityListState;
pub use screen::{report_failure, Change, CrudScreen, Mode, Operation, Submission, SubmitTarget};
