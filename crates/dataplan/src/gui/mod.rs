pub mod app;
pub mod selector;
pub mod theme;
