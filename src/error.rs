//! Error type shared by the reader and the writer.

use std::fmt;

use thiserror::Error;

/// Which keyed collection a duplicate was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Variable,
    State,
    Link,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Variable => write!(f, "variable"),
            Self::State => write!(f, "state"),
            Self::Link => write!(f, "link"),
        }
    }
}

#[derive(Debug, Error)]
pub enum ProbModelError {
    /// The input is not well-formed XML.
    #[error("malformed XML: {message}")]
    Parse { message: String },

    /// Well-formed XML that lacks something the dialect requires.
    #[error("<{element}> is missing {missing}")]
    Schema { element: String, missing: String },

    #[error("duplicate {kind} '{key}'")]
    DuplicateKey { kind: KeyKind, key: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The tree-to-text encoder failed.
    #[error("failed to serialize XML: {message}")]
    Serialize { message: String },
}

impl ProbModelError {
    pub(crate) fn missing_attribute(element: &str, attribute: &str) -> Self {
        Self::Schema {
            element: element.to_string(),
            missing: format!("required attribute '{}'", attribute),
        }
    }

    pub(crate) fn missing_element(element: &str, child: &str) -> Self {
        Self::Schema {
            element: element.to_string(),
            missing: format!("required child <{}>", child),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProbModelError>;
