//! Error types for the schemagen-order crate.

use std::backtrace::Backtrace;
use std::fmt;

use itertools::Itertools;

use crate::render::RenderError;

/// Error type for ordering and emission.
///
/// Uses the canonical struct pattern with backtrace capture and `is_xxx()`
/// helper methods. Only rendering, I/O, invalid input, unsafe output names,
/// and (when asked for) cycles are fatal; duplicate names and dangling dependencies are handled
/// where they are found and never surface here.
#[derive(Debug)]
pub struct OrderError {
    kind: OrderErrorKind,
    backtrace: Backtrace,
}

/// Internal error variants. Not exposed publicly; use `is_xxx()` methods.
#[derive(Debug)]
pub(crate) enum OrderErrorKind {
    /// A definition could not be rendered to text.
    Serialization {
        schema: String,
        source: RenderError,
    },
    /// Failed to deserialize input JSON.
    Deserialization(serde_json::Error),
    /// I/O error when reading input or writing output.
    Io(std::io::Error),
    /// A name or namespace segment cannot be used as a path component.
    InvalidName { schema: String, segment: String },
    /// Dependency cycles found under `CyclePolicy::FailFast`. Each entry
    /// lists the fully-qualified names of one cycle.
    Cycle(Vec<Vec<String>>),
}

impl OrderError {
    /// Creates an error from an error kind, capturing a backtrace.
    pub(crate) fn new(kind: OrderErrorKind) -> Self {
        Self {
            kind,
            backtrace: Backtrace::capture(),
        }
    }

    /// Returns true if a definition failed to render.
    pub fn is_serialization(&self) -> bool {
        matches!(self.kind, OrderErrorKind::Serialization { .. })
    }

    /// Returns true if the input was not valid JSON.
    pub fn is_deserialization(&self) -> bool {
        matches!(self.kind, OrderErrorKind::Deserialization(_))
    }

    /// Returns true if this error is due to I/O failure.
    pub fn is_io(&self) -> bool {
        matches!(self.kind, OrderErrorKind::Io(_))
    }

    /// Returns true if a definition's name would escape the output layout.
    pub fn is_invalid_name(&self) -> bool {
        matches!(self.kind, OrderErrorKind::InvalidName { .. })
    }

    /// Returns true if dependency cycles prevented a complete ordering.
    pub fn is_cycle(&self) -> bool {
        matches!(self.kind, OrderErrorKind::Cycle(_))
    }

    /// The cycles that were found, if this is a cycle error.
    pub fn cycles(&self) -> Option<&[Vec<String>]> {
        match &self.kind {
            OrderErrorKind::Cycle(cycles) => Some(cycles),
            _ => None,
        }
    }

    /// Returns the backtrace captured when this error was created.
    pub fn backtrace(&self) -> &Backtrace {
        &self.backtrace
    }
}

impl fmt::Display for OrderErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderErrorKind::Serialization { schema, source } => {
                write!(f, "failed to render schema `{schema}`: {source}")
            }
            OrderErrorKind::Deserialization(err) => {
                write!(f, "failed to deserialize input: {err}")
            }
            OrderErrorKind::Io(err) => write!(f, "I/O error: {err}"),
            OrderErrorKind::InvalidName { schema, segment } => write!(
                f,
                "schema `{schema}` has `{segment}`, which is not a valid \
                 file name"
            ),
            OrderErrorKind::Cycle(cycles) => {
                let listed = cycles
                    .iter()
                    .map(|cycle| format!("[{}]", cycle.join(", ")))
                    .join(", ");
                write!(f, "dependency cycles detected: {listed}")
            }
        }
    }
}

impl fmt::Display for OrderError {
    /// Formats the error with a summary and captured backtrace.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.kind)?;

        // Backtrace (will be empty unless RUST_BACKTRACE is set).
        write!(f, "{}", self.backtrace)
    }
}

impl std::error::Error for OrderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.kind {
            OrderErrorKind::Serialization { source, .. } => Some(&**source),
            OrderErrorKind::Deserialization(err) => Some(err),
            OrderErrorKind::Io(err) => Some(err),
            OrderErrorKind::InvalidName { .. } | OrderErrorKind::Cycle(_) => {
                None
            }
        }
    }
}

impl From<std::io::Error> for OrderError {
    fn from(err: std::io::Error) -> Self {
        Self::new(OrderErrorKind::Io(err))
    }
}
