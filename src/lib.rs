//! Hello Weather Library
//!
//! This module exposes the application modules for use by the binary and in
//! integration tests.

pub mod app;
pub mod chart;
pub mod classify;
pub mod cli;
pub mod config;
pub mod data;
pub mod logging;
pub mod series;
pub mod settings;
pub mod ui;
pub mod worker;
