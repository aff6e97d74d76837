//! Injected logging.
//!
//! The turn loop and the search take a `&dyn Logger` rather than writing to a
//! global. [`FacadeLogger`] forwards to the `log` crate (and from there to
//! whatever backend the binary installed); [`NullLogger`] drops everything.

use std::fmt;

use log::Level;

pub trait Logger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>);

    fn error(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Error, args);
    }

    fn warn(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Warn, args);
    }

    fn info(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Info, args);
    }

    fn debug(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Debug, args);
    }

    fn trace(&self, args: fmt::Arguments<'_>) {
        self.log(Level::Trace, args);
    }
}

/// Forwards to the `log` facade under the `circus_agent` target.
#[derive(Debug, Default, Clone, Copy)]
pub struct FacadeLogger;

impl Logger for FacadeLogger {
    fn log(&self, level: Level, args: fmt::Arguments<'_>) {
        log::log!(target: "circus_agent", level, "{args}");
    }
}

/// Discards every record.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullLogger;

impl Logger for NullLogger {
    fn log(&self, _level: Level, _args: fmt::Arguments<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Collects records in memory.
    #[derive(Default)]
    struct MemoryLogger {
        records: RefCell<Vec<(Level, String)>>,
    }

    impl Logger for MemoryLogger {
        fn log(&self, level: Level, args: fmt::Arguments<'_>) {
            self.records.borrow_mut().push((level, args.to_string()));
        }
    }

    #[test]
    fn test_default_methods_route_levels() {
        let logger = MemoryLogger::default();
        logger.warn(format_args!("bad token {}", "Q"));
        logger.debug(format_args!("depth {}", 3));
        let records = logger.records.borrow();
        assert_eq!(records[0], (Level::Warn, "bad token Q".to_string()));
        assert_eq!(records[1], (Level::Debug, "depth 3".to_string()));
    }

    #[test]
    fn test_null_logger_is_silent() {
        NullLogger.error(format_args!("ignored"));
    }
}
