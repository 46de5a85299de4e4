//! Terminal UI: address input, POH filter, stats cards and results table

pub mod layout;
pub mod renderer;
pub mod terminal;

pub use terminal::run_ui;
