// SPDX-License-Identifier: MIT
// Copyright (c) 2026 QNTX Contributors

//! Logger surface a plugin calls back into (spec §4.E).

/// Severity for a log line emitted through the service bridge, mirroring
/// [`qntx_core::LogLevel`] so plugin logs and task logs share one taxonomy.
pub use qntx_core::LogLevel;

/// A named logger handed to a plugin so its log lines are attributed to
/// the plugin rather than appearing as anonymous host output.
pub trait ServiceLogger: Send + Sync {
    /// The name this logger's lines are tagged with (e.g. the plugin name).
    fn name(&self) -> &str;

    fn log(&self, level: LogLevel, message: &str);

    fn debug(&self, message: &str) {
        self.log(LogLevel::Debug, message);
    }

    fn info(&self, message: &str) {
        self.log(LogLevel::Info, message);
    }

    fn warn(&self, message: &str) {
        self.log(LogLevel::Warn, message);
    }

    fn error(&self, message: &str) {
        self.log(LogLevel::Error, message);
    }
}
