//! Uniform reporting of failed statements.
//!
//! The connector never decides whether a failed statement aborts the
//! program. It hands an [`ErrorReport`] and the caller's [`Severity`] to an
//! [`ErrorReporter`], then returns the error to the caller.

use std::fmt;

use tracing::{error, info, warn};

/// How seriously the caller treats a failure of this statement.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Expected failures, e.g. probing for an optional table.
    Notice,
    /// Failures the caller recovers from.
    Warning,
    /// Failures that should abort the current operation.
    #[default]
    Error,
}

impl Severity {
    /// Returns `true` for [`Severity::Error`].
    #[must_use]
    pub const fn is_fatal(self) -> bool {
        matches!(self, Self::Error)
    }
}

/// Everything known about a failed statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorReport {
    /// Normalized engine error message.
    pub message: Option<String>,
    /// The statement's SQL.
    pub sql: String,
    /// Rendered parameter values, in bind order.
    pub parameters: Vec<String>,
}

impl fmt::Display for ErrorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Couldn't run query: {}", self.sql)?;
        if let Some(message) = &self.message {
            write!(f, " | {message}")?;
        }
        if !self.parameters.is_empty() {
            write!(f, " | parameters: [{}]", self.parameters.join(", "))?;
        }
        Ok(())
    }
}

/// Receives every statement failure before it is returned.
pub trait ErrorReporter {
    /// Handles a failed statement.
    fn report(&self, report: &ErrorReport, severity: Severity);
}

impl<F> ErrorReporter for F
where
    F: Fn(&ErrorReport, Severity),
{
    fn report(&self, report: &ErrorReport, severity: Severity) {
        self(report, severity);
    }
}

/// Default reporter: emits a `tracing` event at a level matching the severity.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, report: &ErrorReport, severity: Severity) {
        let message = report.message.as_deref().unwrap_or("unknown error");
        let parameters = report.parameters.join(", ");
        match severity {
            Severity::Notice => info!(sql = %report.sql, %parameters, "{message}"),
            Severity::Warning => warn!(sql = %report.sql, %parameters, "{message}"),
            Severity::Error => error!(sql = %report.sql, %parameters, "{message}"),
        }
    }
}
