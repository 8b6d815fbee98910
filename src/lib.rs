// Virtool client - list synchronization and coverage charting core

pub mod api;
pub mod client;
pub mod config;
pub mod coverage;
pub mod error;
pub mod list;
pub mod realtime;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
