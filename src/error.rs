use std::fmt;
use std::io::Write;
use std::num::ParseIntError;

use thiserror::Error;

/// Pipeline component that raised an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Parse,
    Build,
    Layout,
    Render,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Parse => "parse",
            Self::Build => "build",
            Self::Layout => "layout",
            Self::Render => "render",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ParseError,
    ValidationError,
    RenderError,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ParseError => "ParseError",
            Self::ValidationError => "ValidationError",
            Self::RenderError => "RenderError",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum TourError {
    #[error("invalid tour entry {token:?} at position {position}: {source}")]
    Parse {
        token: String,
        position: usize,
        #[source]
        source: ParseIntError,
    },
    #[error("{reason}")]
    Validation { input: String, reason: String },
    #[error("{reason}")]
    Render { stage: Stage, reason: String },
}

impl TourError {
    pub fn empty_tour(input: &str) -> Self {
        Self::Validation {
            input: input.to_string(),
            reason: "tour is empty".to_string(),
        }
    }

    pub fn missing_input() -> Self {
        Self::Validation {
            input: String::new(),
            reason: "no tour provided".to_string(),
        }
    }

    pub fn render(stage: Stage, reason: impl Into<String>) -> Self {
        Self::Render {
            stage,
            reason: reason.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Parse { .. } => ErrorKind::ParseError,
            Self::Validation { .. } => ErrorKind::ValidationError,
            Self::Render { .. } => ErrorKind::RenderError,
        }
    }

    pub fn stage(&self) -> Stage {
        match self {
            Self::Parse { .. } | Self::Validation { .. } => Stage::Parse,
            Self::Render { stage, .. } => *stage,
        }
    }

    /// The piece of operator input the error is about, when there is one.
    pub fn fragment(&self) -> Option<&str> {
        match self {
            Self::Parse { token, .. } => Some(token),
            Self::Validation { input, .. } if !input.is_empty() => Some(input),
            Self::Validation { .. } | Self::Render { .. } => None,
        }
    }
}

/// One human-readable failure message, as shown to the operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: ErrorKind,
    pub stage: Stage,
    pub fragment: Option<String>,
    pub message: String,
}

impl Diagnostic {
    pub fn from_error(err: &TourError) -> Self {
        Self {
            kind: err.kind(),
            stage: err.stage(),
            fragment: err.fragment().map(str::to_string),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} in {} stage: {}", self.kind, self.stage, self.message)?;
        if let Some(fragment) = &self.fragment {
            write!(f, " (input: {fragment:?})")?;
        }
        Ok(())
    }
}

/// Turns pipeline errors into diagnostics written to an operator-facing sink.
pub struct ErrorReporter<W: Write> {
    sink: W,
}

impl ErrorReporter<std::io::Stderr> {
    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }
}

impl<W: Write> ErrorReporter<W> {
    pub fn new(sink: W) -> Self {
        Self { sink }
    }

    pub fn report(&mut self, err: &TourError) -> Diagnostic {
        let diagnostic = Diagnostic::from_error(err);
        // The sink line is the operator-facing message; the trace only shows
        // up when debugging.
        tracing::debug!(
            kind = %diagnostic.kind,
            stage = %diagnostic.stage,
            "{}",
            diagnostic.message
        );
        // A broken stderr leaves nothing else to report to.
        let _ = writeln!(self.sink, "error: {diagnostic}");
        let _ = self.sink.flush();
        diagnostic
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}
