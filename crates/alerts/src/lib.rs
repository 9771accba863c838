//! Telegram front-end and alert relay for the smart money bot.
//!
//! This crate provides:
//! - Chat commands and inline menu mapped onto explicit actions
//! - Message formatting for scans, overlaps and wallet alerts
//! - The webhook alert relay task

pub mod command;
pub mod format;
pub mod processor;
pub mod relay;
pub mod telegram;

pub use command::{main_menu, Action, Command, MonitorRequest};
pub use processor::{CommandProcessor, Reply};
pub use relay::{
    run_alert_relay, start_alert_relay, ActivityEvent, AlertRelayHandle, AlertSink, RelayError,
};
pub use telegram::{TelegramBot, TelegramError, TelegramSink};
