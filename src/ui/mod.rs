//! User interface module - terminal output for the command line tool.
//!
//! All user-facing text is written through [formatter]; diagnostic logging
//! goes through `tracing` instead (see [crate::logging]).

pub mod formatter;

// Re-export formatter functions for convenience
pub use formatter::{
    display_allocation, display_error, display_manifest, display_status, display_success,
};
