pub mod clock;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod fs;
pub mod host;
pub mod models;
pub mod monitors;
pub mod session;
pub mod supervisor;

pub use error::{Error, Result};
