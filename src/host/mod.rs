//! Adapter between an editor host and the monitors.

pub mod adapter;
pub mod notify;
pub mod protocol;

pub use adapter::{Control, Host, NO_LOG_YET};
pub use notify::{JsonLinesNotifier, Level, Notifier, NullNotifier};
pub use protocol::HostEvent;
