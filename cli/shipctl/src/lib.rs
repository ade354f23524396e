//! Client library behind the `ship` command.
//!
//! The binary is a thin wrapper: everything it does is reachable from here,
//! which lets the integration tests drive whole commands against a mock API.

pub mod client;
pub mod commands;
pub mod config;
pub mod edit;
pub mod error;
pub mod gate;
pub mod models;
pub mod output;
pub mod project;
pub mod resolve;
