pub mod egui_app;
pub mod grid_widget;

pub use egui_app::{run_gui, BlotterGui};
pub use grid_widget::GridWidget;
