//! Two-level navigation core for a terminal operations console: an
//! application-level and a page-level navigator kept consistent across
//! in-memory state, an in-process session-history stack, and durable
//! key/value storage.

pub mod config;
pub mod console;
pub mod error;
pub mod nav;
pub mod registry;
