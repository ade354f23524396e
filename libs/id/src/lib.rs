//! # ship-id
//!
//! Typed ID wrappers for the resources the `ship` CLI addresses.
//!
//! ## Design Principles
//!
//! - IDs are server-assigned and opaque; names are user-controlled labels
//! - Each resource kind has its own ID type so IDs cannot be mixed up
//! - Parsing is strict enough to catch obvious mistakes (empty, whitespace)
//!   and otherwise accepts whatever the platform hands out

mod error;
mod macros;
mod types;

pub use error::IdError;
pub use types::*;
