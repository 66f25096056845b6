mod app;
mod clipboard;
mod effects;
mod persistence;

pub use app::run_app;
