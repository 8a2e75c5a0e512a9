//! Reusable TUI components

pub mod data_grid;
pub mod form_field;
pub mod status_display;

pub use data_grid::DataGrid;
pub use form_field::{DropdownOption, Form, FormField, FormFieldType};
pub use status_display::{StatusDisplay, StatusMessage, StatusType};
