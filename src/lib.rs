//! Terminal stopwatch with laps, spoken minute announcements and voice start

pub mod announce;
pub mod app;
pub mod board;
pub mod clock;
pub mod config;
pub mod engine;
pub mod events;
pub mod format;
pub mod input;
pub mod logging;
pub mod render;
pub mod sampler;
pub mod speech;
pub mod tui;
pub mod voice;
