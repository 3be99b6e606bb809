//! Output line types for command results.

/// A single line produced by a command.
///
/// Errors are kept distinct from regular output so the driver can route them
/// to stderr while regular lines go to stdout.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OutputLine {
    /// Plain output line.
    Text(String),
    /// Diagnostic line.
    Error(String),
}

impl OutputLine {
    pub fn text(s: impl Into<String>) -> Self {
        Self::Text(s.into())
    }

    pub fn error(s: impl Into<String>) -> Self {
        Self::Error(s.into())
    }

    /// The line content, regardless of kind.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Text(s) | Self::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}
