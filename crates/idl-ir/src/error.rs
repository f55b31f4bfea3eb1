//! Errors raised while building the IR.
//!
//! Every error is fatal for the translation unit being built: builders return
//! on the first failure and no partially built container is handed back.

use thiserror::Error;

/// Result type used throughout IR construction.
pub type Result<T> = std::result::Result<T, IdlError>;

/// Coarse classification of an [`IdlError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The tree does not have the shape the grammar promises (wrong node kind,
    /// wrong child count, unparsable property value).
    Structural,
    /// The tree is well formed but breaks an IR invariant.
    Semantic,
    /// The tree uses a deprecated or unsupported form.
    Unsupported,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdlError {
    #[error("unrecognized node class `{found}` in {context}")]
    UnexpectedNode { context: String, found: String },

    #[error("{context} expects {expected} child(ren), got {found}")]
    ChildCount {
        context: String,
        expected: &'static str,
        found: usize,
    },

    #[error("malformed {what}: {value:?}")]
    MalformedValue { what: &'static str, value: String },

    #[error("{0}")]
    Invariant(String),

    #[error("{0}")]
    Unsupported(String),

    #[error("{0}")]
    FilenameConvention(String),
}

impl IdlError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            IdlError::UnexpectedNode { .. }
            | IdlError::ChildCount { .. }
            | IdlError::MalformedValue { .. } => ErrorKind::Structural,
            IdlError::Invariant(_) | IdlError::FilenameConvention(_) => ErrorKind::Semantic,
            IdlError::Unsupported(_) => ErrorKind::Unsupported,
        }
    }

    pub(crate) fn unexpected(context: impl Into<String>, found: impl Into<String>) -> Self {
        IdlError::UnexpectedNode {
            context: context.into(),
            found: found.into(),
        }
    }

    pub(crate) fn child_count(
        context: impl Into<String>,
        expected: &'static str,
        found: usize,
    ) -> Self {
        IdlError::ChildCount {
            context: context.into(),
            expected,
            found,
        }
    }

    pub(crate) fn malformed(what: &'static str, value: impl Into<String>) -> Self {
        IdlError::MalformedValue {
            what,
            value: value.into(),
        }
    }
}

/// Return early with an [`IdlError::Invariant`].
macro_rules! invariant {
    ($($arg:tt)*) => {
        return Err($crate::error::IdlError::Invariant(format!($($arg)*)))
    };
}

/// Return early with an [`IdlError::Unsupported`].
macro_rules! unsupported {
    ($($arg:tt)*) => {
        return Err($crate::error::IdlError::Unsupported(format!($($arg)*)))
    };
}

pub(crate) use invariant;
pub(crate) use unsupported;
