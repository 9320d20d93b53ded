// Library surface for headless/integration tests and reuse.
// The binary in main.rs only adds CLI parsing and terminal setup.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod input;
pub mod logging;
pub mod notify;
pub mod runtime;
pub mod schedule;
pub mod session;
pub mod settings;
pub mod timer;
pub mod ui;
