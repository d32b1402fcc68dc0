pub mod monitor;

pub use monitor::{LogLevel, ScanMessage, ScanMonitor, create_monitor_channel, run_monitor};
