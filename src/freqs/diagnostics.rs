//! Non-fatal diagnostic messages.
//!
//! Truncation and exclusion are expected policy, not errors. Messages are
//! always collected so callers can inspect them, and emitted through
//! `tracing` unless the caller asked for quiet operation.

/// Collects diagnostic messages for one invocation.
#[derive(Debug, Clone, Default)]
pub(crate) struct Diagnostics {
    quiet: bool,
    messages: Vec<String>,
}

impl Diagnostics {
    pub(crate) fn new(quiet: bool) -> Self {
        Self { quiet, messages: Vec::new() }
    }

    /// Report an applied policy (truncation, exclusion).
    pub(crate) fn info(&mut self, message: String) {
        if !self.quiet {
            tracing::info!(target: "trueno_freqs", "{message}");
        }
        self.messages.push(message);
    }

    /// Report an advisory condition (e.g. nothing left to summarize).
    pub(crate) fn warn(&mut self, message: String) {
        if !self.quiet {
            tracing::warn!(target: "trueno_freqs", "{message}");
        }
        self.messages.push(message);
    }

    pub(crate) fn into_messages(self) -> Vec<String> {
        self.messages
    }
}
