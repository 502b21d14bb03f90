//! Build, edit, and persist form definitions.
//!
//! The `state` module holds the store and its pure transitions, `persist`
//! keeps the store in durable storage, and `app` drives both from the
//! command line.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod model;
pub mod persist;
pub mod share;
pub mod state;
