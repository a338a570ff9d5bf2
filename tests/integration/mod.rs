//! Integration tests for session-logger
//!
//! These drive the host adapter the way an editor would and check the
//! resulting activity log line by line.

pub mod cli;
pub mod helpers;
pub mod scenarios;
