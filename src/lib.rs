//! Employee attendance engine.
//!
//! This crate tracks clock-in/clock-out, break intervals, and regular versus
//! overtime hours for employee time entries, and takes each entry through
//! its review lifecycle.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod ids;
pub mod models;
pub mod store;
