//! `fred-miner` library crate.
//!
//! The binary (`fredmine`) is a thin wrapper around this library so that the
//! analysis engine can be driven by in-memory providers in tests, without
//! network access or spawned processes.

pub mod analysis;
pub mod app;
pub mod cli;
pub mod config;
pub mod data;
pub mod domain;
pub mod error;
pub mod io;
pub mod math;
pub mod report;
