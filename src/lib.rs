//! Gantt dependency engine: bar geometry, cycle-safe dependency edits,
//! scheduling-conflict detection and drag-to-connect, plus the egui viewer
//! that composes them.

pub mod app;
pub mod config;
pub mod engine;
pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod ui;

pub use error::{Error, Result};
