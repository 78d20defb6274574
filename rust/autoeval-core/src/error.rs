//! Error taxonomy for an evaluation run

/// Errors surfaced by the filler, calculator and their adapters
#[derive(Debug, Clone, PartialEq)]
pub enum EvalError {
    /// The header used as the panel anchor is not on the page
    AnchorNotFound(String),
    /// The page has no question widgets at all
    NoQuestions,
    /// A run is already in flight
    Busy,
    /// The page adapter failed while reading or mutating the DOM
    Dom(String),
    /// The preference store could not be read or written
    Storage(String),
    /// Configuration could not be parsed or is out of range
    Config(String),
}

impl std::fmt::Display for EvalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EvalError::AnchorNotFound(selector) => {
                write!(f, "Target header not found ({})", selector)
            }
            EvalError::NoQuestions => write!(f, "No se encontraron preguntas (selects)."),
            EvalError::Busy => write!(f, "An evaluation is already running"),
            EvalError::Dom(msg) => write!(f, "DOM error: {}", msg),
            EvalError::Storage(msg) => write!(f, "Storage error: {}", msg),
            EvalError::Config(msg) => write!(f, "Invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for EvalError {}

impl EvalError {
    /// Message shown in the panel log for this error
    pub fn user_message(&self) -> String {
        match self {
            EvalError::NoQuestions => self.to_string(),
            other => format!("Error: {}", other),
        }
    }
}
