//! TTY-aware progress reporting.
//!
//! Interactive terminals get styled output with a progress bar; everything
//! else gets structured tracing logs.

mod interactive;
mod logging;

use std::sync::Arc;

use forgemirror::{MirrorProgress, ProgressCallback};

pub(crate) use interactive::InteractiveReporter;
pub(crate) use logging::LoggingReporter;

pub(crate) enum Reporter {
    Interactive(InteractiveReporter),
    Logging(LoggingReporter),
}

impl Reporter {
    pub(crate) fn for_terminal(is_tty: bool) -> Self {
        if is_tty {
            Reporter::Interactive(InteractiveReporter::new())
        } else {
            Reporter::Logging(LoggingReporter::new())
        }
    }

    pub(crate) fn handle(&self, event: MirrorProgress) {
        match self {
            Reporter::Interactive(reporter) => reporter.handle(event),
            Reporter::Logging(reporter) => reporter.handle(event),
        }
    }

    /// Turn the reporter into a callback for the mirror engine.
    pub(crate) fn into_callback(self) -> ProgressCallback {
        let reporter = Arc::new(self);
        Box::new(move |event| reporter.handle(event))
    }
}
