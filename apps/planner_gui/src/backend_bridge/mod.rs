//! Worker thread that owns the async runtime and the search controller.

pub mod commands;
pub mod runtime;
