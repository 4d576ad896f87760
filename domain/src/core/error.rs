//! Domain error types

use thiserror::Error;

/// How a child process ended when it did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitKind {
    /// Process exited on its own with a non-zero code
    Code(i32),
    /// Process was terminated by a signal (e.g. SIGINT from a `timeout` wrapper)
    Signal(i32),
    /// Process could not be started or its output could not be handled
    NotStarted,
}

impl std::fmt::Display for ExitKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ExitKind::Code(code) => write!(f, "exit code {}", code),
            ExitKind::Signal(signal) => write!(f, "terminated by signal {}", signal),
            ExitKind::NotStarted => write!(f, "not started"),
        }
    }
}

/// Coarse classification of an [`AdapterError`], used by callers to pick
/// an exit status or a presentation style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Resolution,
    Execution,
    Parse,
    UnknownAdapter,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::Validation => "validation",
            ErrorCategory::Resolution => "resolution",
            ErrorCategory::Execution => "execution",
            ErrorCategory::Parse => "parse",
            ErrorCategory::UnknownAdapter => "unknown_adapter",
        }
    }
}

/// Errors produced while building, running or parsing a benchmark.
///
/// Every variant is terminal for the invocation that raised it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AdapterError {
    #[error("invalid parameter '{parameter}' for {adapter}: {message}")]
    Validation {
        adapter: String,
        parameter: String,
        message: String,
    },

    #[error("cannot resolve {target}: {message}")]
    Resolution { target: String, message: String },

    #[error("`{command}` failed ({exit}): {stderr}")]
    Execution {
        command: String,
        exit: ExitKind,
        stderr: String,
    },

    #[error("cannot parse {origin}{}: {message}", line.map(|l| format!(" at line {}", l)).unwrap_or_default())]
    Parse {
        origin: String,
        line: Option<usize>,
        message: String,
    },

    #[error("unknown benchmark adapter '{0}'")]
    UnknownAdapter(String),
}

impl AdapterError {
    pub fn validation(
        adapter: impl Into<String>,
        parameter: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        AdapterError::Validation {
            adapter: adapter.into(),
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    pub fn resolution(target: impl Into<String>, message: impl Into<String>) -> Self {
        AdapterError::Resolution {
            target: target.into(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            AdapterError::Validation { .. } => ErrorCategory::Validation,
            AdapterError::Resolution { .. } => ErrorCategory::Resolution,
            AdapterError::Execution { .. } => ErrorCategory::Execution,
            AdapterError::Parse { .. } => ErrorCategory::Parse,
            AdapterError::UnknownAdapter(_) => ErrorCategory::UnknownAdapter,
        }
    }

    /// True when the failing process was killed by a signal rather than exiting.
    pub fn is_signal_termination(&self) -> bool {
        matches!(
            self,
            AdapterError::Execution {
                exit: ExitKind::Signal(_),
                ..
            }
        )
    }
}

/// Failure raised by an output scanner, before the source is known.
///
/// The use case attaches the origin (file path) when converting it into
/// an [`AdapterError::Parse`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ParseFailure {
    pub line: Option<usize>,
    pub message: String,
}

impl ParseFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            line: None,
            message: message.into(),
        }
    }

    pub fn at_line(line: usize, message: impl Into<String>) -> Self {
        Self {
            line: Some(line),
            message: message.into(),
        }
    }

    pub fn no_metrics() -> Self {
        Self::new("no metrics could be extracted")
    }

    pub fn into_adapter_error(self, origin: impl Into<String>) -> AdapterError {
        AdapterError::Parse {
            origin: origin.into(),
            line: self.line,
            message: self.message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_display() {
        let error = AdapterError::validation("fio", "rw", "missing required parameter");
        assert_eq!(
            error.to_string(),
            "invalid parameter 'rw' for fio: missing required parameter"
        );
        assert_eq!(error.category(), ErrorCategory::Validation);
    }

    #[test]
    fn test_parse_error_display_with_line() {
        let error = ParseFailure::at_line(7, "too few columns").into_adapter_error("/tmp/ub.log");
        assert_eq!(
            error.to_string(),
            "cannot parse /tmp/ub.log at line 7: too few columns"
        );
    }

    #[test]
    fn test_parse_error_display_without_line() {
        let error = ParseFailure::no_metrics().into_adapter_error("out.txt");
        assert_eq!(
            error.to_string(),
            "cannot parse out.txt: no metrics could be extracted"
        );
    }

    #[test]
    fn test_signal_termination_is_distinguishable() {
        let signalled = AdapterError::Execution {
            command: "timeout 10s mprime -t".to_string(),
            exit: ExitKind::Signal(2),
            stderr: String::new(),
        };
        let failed = AdapterError::Execution {
            command: "fio".to_string(),
            exit: ExitKind::Code(1),
            stderr: "bad option".to_string(),
        };

        assert!(signalled.is_signal_termination());
        assert!(!failed.is_signal_termination());
        assert!(signalled.to_string().contains("terminated by signal 2"));
        assert!(failed.to_string().contains("exit code 1"));
    }
}
