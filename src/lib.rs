//! Possibility Engine
//!
//! An adaptive contrarian signal engine that converts a stream of
//! sequential OHLC bars into discrete trading directives. A reversal in
//! bar-to-bar body-move sign is treated as the tradable event; rolling
//! hit-rate statistics over candidate sampling periods pick the best
//! period online, and a chain of independently toggleable filters
//! confirms or suppresses each side of the signal.

pub mod config;
pub mod data;
pub mod engine;
pub mod filters;
pub mod fractal;
pub mod history;
pub mod indicators;
pub mod possibility;
pub mod selector;
pub mod types;

pub use config::{ConfigError, EngineConfig, FilterToggles};
pub use engine::Engine;
pub use history::BarHistory;
pub use types::*;
