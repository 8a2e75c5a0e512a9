//! Dashboard screens

pub mod entity;
pub mod main_menu;

pub use entity::{EntityScreen, Focus};
pub use main_menu::MainMenuScreen;
