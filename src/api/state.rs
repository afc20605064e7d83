//! Application state for the attendance API.
//!
//! This module defines the shared application state that is available
//! to all request handlers.

use std::sync::Arc;

use crate::engine::AttendanceEngine;

/// Shared application state.
///
/// Wraps the engine in an `Arc` so every handler shares one store and one
/// lock table.
#[derive(Clone)]
pub struct AppState {
    engine: Arc<AttendanceEngine>,
}

impl AppState {
    /// Creates a new application state around `engine`.
    pub fn new(engine: AttendanceEngine) -> Self {
        Self {
            engine: Arc::new(engine),
        }
    }

    /// Returns the shared engine.
    pub fn engine(&self) -> &AttendanceEngine {
        &self.engine
    }
}
