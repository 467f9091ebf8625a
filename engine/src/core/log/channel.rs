use crossbeam::channel::{Receiver, Sender, unbounded};
use log::{Level, LevelFilter, Metadata, Record};

const GREEN: &str = "\x1b[32m";
const BRIGHT_RED: &str = "\x1b[91m";
const RESET: &str = "\x1b[0m";

/// A log record captured by a [`ChannelLogger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogMessage {
    pub level: Level,
    pub target: String,
    pub message: String,
}

impl LogMessage {
    /// Format the message for a terminal.
    ///
    /// Warnings and errors print as `ERR: [target] message` in bright red, everything else as
    /// `LOG: [target] message` in green.
    pub fn render(&self) -> String {
        match self.level {
            Level::Error | Level::Warn => {
                format!("{BRIGHT_RED}ERR: [{}] {}{RESET}", self.target, self.message)
            }
            _ => format!("{GREEN}LOG: [{}] {}{RESET}", self.target, self.message),
        }
    }
}

/// A `log` backend that forwards records over a channel instead of writing them.
///
/// The frame loop owns the receiving end and decides when to print, so logging never blocks the
/// simulation on the terminal.
pub struct ChannelLogger {
    level: LevelFilter,
    sender: Sender<LogMessage>,
}

impl log::Log for ChannelLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            // A dropped receiver just means nobody is listening anymore.
            let _ = self.sender.try_send(LogMessage {
                level: record.level(),
                target: record.target().to_string(),
                message: format!("{}", record.args()),
            });
        }
    }

    fn flush(&self) {}
}

impl ChannelLogger {
    pub fn new(level: LevelFilter, sender: Sender<LogMessage>) -> Self {
        Self { level, sender }
    }

    pub fn with_receiver(level: LevelFilter) -> (Self, Receiver<LogMessage>) {
        let (sender, receiver) = unbounded();
        (Self::new(level, sender), receiver)
    }

    #[inline]
    pub fn level(&self) -> LevelFilter {
        self.level
    }
}

#[cfg(test)]
mod tests {
    use log::Log;

    use super::*;

    fn record(level: Level, logger: &ChannelLogger, message: &str) {
        logger.log(
            &Record::builder()
                .level(level)
                .target("ember::test")
                .args(format_args!("{message}"))
                .build(),
        );
    }

    #[test]
    fn forwards_enabled_records() {
        // Given
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Debug);

        // When
        record(Level::Debug, &logger, "created entity 0");
        record(Level::Trace, &logger, "entity 0 joined 'Movement'");

        // Then
        let messages: Vec<_> = receiver.try_iter().collect();
        assert_eq!(
            messages,
            vec![LogMessage {
                level: Level::Debug,
                target: "ember::test".into(),
                message: "created entity 0".into(),
            }]
        );
    }

    #[test]
    fn dropped_receiver_is_ignored() {
        // Given
        let (logger, receiver) = ChannelLogger::with_receiver(LevelFilter::Info);
        drop(receiver);

        // When
        record(Level::Error, &logger, "nobody hears this");

        // Then
        assert_eq!(logger.level(), LevelFilter::Info);
    }

    #[test]
    fn render_colors_by_severity() {
        // Given
        let info = LogMessage {
            level: Level::Info,
            target: "frame".into(),
            message: "frame 1".into(),
        };
        let warn = LogMessage {
            level: Level::Warn,
            ..info.clone()
        };

        // Then
        assert_eq!(info.render(), "\x1b[32mLOG: [frame] frame 1\x1b[0m");
        assert_eq!(warn.render(), "\x1b[91mERR: [frame] frame 1\x1b[0m");
    }
}
