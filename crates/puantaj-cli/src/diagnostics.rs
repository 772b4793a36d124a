//! Diagnostic output for the CLI
//!
//! Diagnostics go to stderr, one per line, in the same shape as their
//! `Display` form:
//!
//! ```text
//! warning[W002]: record 'r3': check-out 2024-01-01 is before check-in 2024-01-05
//! ```
//!
//! ## Exit Code Semantics
//!
//! | Exit Code | Meaning |
//! |-----------|---------|
//! | 0 | Success: report produced (dropped records allowed) |
//! | 1 | Failure: request rejected or input unreadable |
//!
//! `--quiet` hides hints and info lines. It never changes the exit code.

use std::io::Write;
use std::process;

use puantaj_core::{Diagnostic, Severity};

// ============================================================================
// Exit Code
// ============================================================================

/// Exit codes for CLI operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Report produced
    Success = 0,
    /// Request rejected
    Failure = 1,
}

impl From<ExitCode> for process::ExitCode {
    fn from(code: ExitCode) -> Self {
        process::ExitCode::from(code as u8)
    }
}

// ============================================================================
// Emitter
// ============================================================================

/// Configuration for diagnostic output
#[derive(Debug, Clone, Default)]
pub struct DiagnosticConfig {
    /// Only show warnings and errors
    pub quiet: bool,
}

impl DiagnosticConfig {
    pub fn should_show(&self, severity: Severity) -> bool {
        !self.quiet || matches!(severity, Severity::Error | Severity::Warning)
    }
}

/// Writes diagnostics line by line and keeps a tally
pub struct TerminalEmitter<W: Write> {
    writer: W,
    config: DiagnosticConfig,
    warning_count: usize,
}

impl<W: Write> TerminalEmitter<W> {
    pub fn new(writer: W, config: DiagnosticConfig) -> Self {
        Self {
            writer,
            config,
            warning_count: 0,
        }
    }

    /// Number of warnings seen, shown or not
    pub fn warning_count(&self) -> usize {
        self.warning_count
    }

    pub fn emit(&mut self, diagnostic: &Diagnostic) -> std::io::Result<()> {
        if diagnostic.severity == Severity::Warning {
            self.warning_count += 1;
        }
        if !self.config.should_show(diagnostic.severity) {
            return Ok(());
        }
        writeln!(self.writer, "{diagnostic}")
    }

    pub fn emit_all<'a>(
        &mut self,
        diagnostics: impl IntoIterator<Item = &'a Diagnostic>,
    ) -> std::io::Result<()> {
        for diagnostic in diagnostics {
            self.emit(diagnostic)?;
        }
        Ok(())
    }

    /// Closing line, e.g. `2 records dropped`
    pub fn summary(&mut self, dropped: usize) -> std::io::Result<()> {
        if dropped > 0 {
            let noun = if dropped == 1 { "record" } else { "records" };
            writeln!(self.writer, "{dropped} {noun} dropped")?;
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================
