use std::sync::Mutex;

use syslog::{Facility, Formatter3164, Logger, LoggerBackend};

// ANSI escape sequences, applied when color is enabled
const CYAN: &str = "\u{1b}[36m";
const RED: &str = "\u{1b}[31m";
const RESET: &str = "\u{1b}[0m";

/// A `Reporter` delivers user-facing messages.
///
/// Components receive one by reference instead of reaching for process-wide
/// state; the binary decides once at startup where messages go and whether
/// informational ones are wanted at all.
pub trait Reporter {
    /// Progress messages; only delivered in verbose mode
    fn info(&self, message: &str);
    /// Fatal conditions; always delivered
    fn error(&self, message: &str);
}

/// Reporter writing to the terminal: info to stdout, errors to stderr, each
/// in its own color unless color is disabled.
pub struct ConsoleReporter {
    color: bool,
    verbose: bool,
}

impl ConsoleReporter {
    pub fn new(color: bool, verbose: bool) -> Self {
        ConsoleReporter { color, verbose }
    }

    fn paint(&self, color: &str, message: &str) -> String {
        if self.color {
            format!("{}{}{}", color, message, RESET)
        } else {
            message.to_string()
        }
    }
}

impl Reporter for ConsoleReporter {
    fn info(&self, message: &str) {
        if self.verbose {
            println!("{}", self.paint(CYAN, message));
        }
    }

    fn error(&self, message: &str) {
        eprintln!("{}", self.paint(RED, message));
    }
}

/// Reporter handing messages to the local syslog daemon, for runs under a
/// scheduler where nobody watches the terminal.
pub struct SyslogReporter {
    logger: Mutex<Logger<LoggerBackend, Formatter3164>>,
    verbose: bool,
}

impl SyslogReporter {
    pub fn new(verbose: bool) -> Result<Self, syslog::Error> {
        let formatter = Formatter3164 {
            facility: Facility::LOG_USER,
            hostname: None,
            process: "updatedns".into(),
            pid: std::process::id(),
        };
        Ok(SyslogReporter {
            logger: Mutex::new(syslog::unix(formatter)?),
            verbose,
        })
    }
}

impl Reporter for SyslogReporter {
    fn info(&self, message: &str) {
        if !self.verbose {
            return;
        }
        if let Ok(mut logger) = self.logger.lock() {
            let _ = logger.info(message);
        }
    }

    fn error(&self, message: &str) {
        if let Ok(mut logger) = self.logger.lock() {
            let _ = logger.err(message);
        }
    }
}
