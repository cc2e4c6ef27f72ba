//! Internal modules for the Hold'em terminal client.
//!
//! This library provides command parsing, configuration, rendering and the
//! controller that drives `holdem_sync`, used by the hs_client binary.

pub mod commands;
pub mod config;
pub mod controller;
pub mod logging;
pub mod render;
