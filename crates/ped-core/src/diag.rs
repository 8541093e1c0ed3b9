//! Diagnostic event sinks.
//!
//! The engine never logs through process-wide state.  Each simulation owns
//! one [`DiagnosticSink`] and emits severity-tagged text events to it.  Sink
//! behavior has no influence on control flow; a sink must return promptly
//! and must not call back into the simulation.

use std::fmt;
use std::sync::Arc;

/// Severity of a diagnostic event.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Debug   => "debug",
            Severity::Info    => "info",
            Severity::Warning => "warning",
            Severity::Error   => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Severity> for log::Level {
    fn from(s: Severity) -> log::Level {
        match s {
            Severity::Debug   => log::Level::Debug,
            Severity::Info    => log::Level::Info,
            Severity::Warning => log::Level::Warn,
            Severity::Error   => log::Level::Error,
        }
    }
}

/// Receiver of diagnostic events.
///
/// `Send + Sync` so a simulation holding one can itself be moved between
/// threads; `emit` takes `&self`, so implementations needing state use
/// interior mutability.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, severity: Severity, message: &str);

    fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message);
    }

    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    fn warning(&self, message: &str) {
        self.emit(Severity::Warning, message);
    }

    fn error(&self, message: &str) {
        self.emit(Severity::Error, message);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn emit(&self, severity: Severity, message: &str) {
        (**self).emit(severity, message);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Box<S> {
    fn emit(&self, severity: Severity, message: &str) {
        (**self).emit(severity, message);
    }
}

/// Forwards events to the `log` facade under the `ped` target.
///
/// This is the default sink; install any `log` backend to see the output.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn emit(&self, severity: Severity, message: &str) {
        let level: log::Level = severity.into();
        log::log!(target: "ped", level, "{message}");
    }
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl DiagnosticSink for NoopSink {
    fn emit(&self, _severity: Severity, _message: &str) {}
}
