// Library surface for the binary and for headless/integration tests.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod logging;
pub mod lyrics;
pub mod metrics;
pub mod playback;
pub mod runtime;
pub mod session;
pub mod setup;
pub mod ui;
