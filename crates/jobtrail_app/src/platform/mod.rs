mod app;
mod config;
mod panel;

pub use app::run;
