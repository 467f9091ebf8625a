//! Logging backend for the engine.
//!
//! The engine itself only uses the `log` macros. Applications install a [`ChannelLogger`] with
//! [`init`] and drain the returned receiver once per frame.

mod channel;

use crossbeam::channel::Receiver;
use log::{LevelFilter, SetLoggerError};

pub use channel::{ChannelLogger, LogMessage};

/// Install a [`ChannelLogger`] as the global logger and return the receiving end.
///
/// Fails if a global logger is already installed.
pub fn init(level: LevelFilter) -> Result<Receiver<LogMessage>, SetLoggerError> {
    let (logger, receiver) = ChannelLogger::with_receiver(level);
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(level);
    Ok(receiver)
}
