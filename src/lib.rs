//! fabric-desk - Desktop client core for a local pattern server
//!
//! This library supervises the local server process, probes its health, relays
//! streaming chat requests and records completed exchanges for a UI layer that
//! consumes typed [`events::AppEvent`] notifications.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod events;
pub mod health;
pub mod history;
pub mod logging;
pub mod relay;
pub mod sse;
pub mod supervisor;

pub use app::App;
