pub mod allocator;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod metadata;
pub mod package;
pub mod registry;
pub mod resolver;
pub mod ui;

pub use error::{ReleaseError, Result};
