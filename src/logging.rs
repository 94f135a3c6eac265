//! Leveled logging through the host sink.
//!
//! Messages are staged in shared memory and handed to one of the four
//! per-severity primitives; the host routes them into its own structured
//! logging. The staging block is freed immediately — the sink consumes the
//! region during the call.

use crate::abi;
use crate::memory::Memory;

/// Log severity, most severe first. The discriminants are the wire values
/// of the host's level query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl LogLevel {
    fn from_i32(raw: i32) -> Self {
        match raw {
            0 => LogLevel::Error,
            1 => LogLevel::Warn,
            2 => LogLevel::Info,
            _ => LogLevel::Debug,
        }
    }
}

/// The most verbose severity the host will record.
pub fn log_level() -> LogLevel {
    LogLevel::from_i32(abi::get_log_level())
}

/// Whether the host records messages at `level`. Lets guests skip
/// formatting messages the sink would drop.
pub fn enabled(level: LogLevel) -> bool {
    level as i32 <= log_level() as i32
}

/// Emit `message` at `level`.
pub fn log(level: LogLevel, message: &str) {
    let mem = Memory::from_bytes(message.as_bytes());
    match level {
        LogLevel::Error => abi::log_error(mem.offset(), mem.len()),
        LogLevel::Warn => abi::log_warn(mem.offset(), mem.len()),
        LogLevel::Info => abi::log_info(mem.offset(), mem.len()),
        LogLevel::Debug => abi::log_debug(mem.offset(), mem.len()),
    }
    mem.free();
}

pub fn error(message: &str) {
    log(LogLevel::Error, message);
}

pub fn warn(message: &str) {
    log(LogLevel::Warn, message);
}

pub fn info(message: &str) {
    log(LogLevel::Info, message);
}

pub fn debug(message: &str) {
    log(LogLevel::Debug, message);
}

#[cfg(test)]
// Tests are allowed to use unwrap/expect freely.
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::testing;

    #[test]
    fn lines_arrive_in_order_with_their_levels() {
        testing::reset();
        info("starting sync");
        warn("retrying fetch");
        error("fetch failed");
        debug("3 items in queue");

        assert_eq!(
            testing::log_lines(),
            vec![
                (LogLevel::Info, "starting sync".to_string()),
                (LogLevel::Warn, "retrying fetch".to_string()),
                (LogLevel::Error, "fetch failed".to_string()),
                (LogLevel::Debug, "3 items in queue".to_string()),
            ]
        );
    }

    #[test]
    fn host_level_gates_verbose_messages() {
        testing::reset();
        assert_eq!(log_level(), LogLevel::Debug);
        assert!(enabled(LogLevel::Debug));

        testing::set_log_level(LogLevel::Warn);
        assert_eq!(log_level(), LogLevel::Warn);
        assert!(enabled(LogLevel::Error));
        assert!(enabled(LogLevel::Warn));
        assert!(!enabled(LogLevel::Info));
        assert!(!enabled(LogLevel::Debug));
    }

    #[test]
    fn non_ascii_messages_survive() {
        testing::reset();
        info("håndtert 3 poster");
        assert_eq!(testing::log_lines()[0].1, "håndtert 3 poster");
    }
}
