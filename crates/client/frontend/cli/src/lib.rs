//! Headless command-line frontend for the battle presentation layer.
//!
//! Plays the local side of a [`demo::DemoEngine`] battle with a fixed policy
//! and prints everything the message log records, which makes it a quick way
//! to watch the packet dispatcher, menus and targeting work end to end.
mod app;
mod config;
pub mod demo;
pub mod logging;

pub use app::{AutoplayFrontend, autoplay};
pub use config::CliConfig;
pub use demo::DemoEngine;

// Re-export for convenience (used in main.rs)
pub use client_frontend_core::FrontendConfig;
