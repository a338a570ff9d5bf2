pub mod log;
pub mod runners;
pub mod watch;
