// Suppress false-positive `unused_assignments` warnings from miette's derive
// macros. The `#[label]` and `#[source_code]` attributes cause the compiler
// to think struct fields are written but never read, because it doesn't
// trace through the generated `Diagnostic` impl.
#![allow(unused_assignments)]

use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CoreError>;

/// The taxonomy of compiler errors. Each variant
/// renders as `file:line message` through its `Display` impl, matching the
/// plain-text diagnostic contract every back end and test relies on, while
/// staying a typed value callers can match on.
#[derive(Debug, Diagnostic, Error)]
pub enum CoreError {
    #[error("{path}: {reason}")]
    Io { path: PathBuf, reason: String },

    #[error("{file}:{line} {message}")]
    Parse {
        file: String,
        line: usize,
        message: String,
        #[source_code]
        src: Option<NamedSource<String>>,
        #[label("{message}")]
        span: Option<SourceSpan>,
    },

    #[error("{file}:{line} {message}")]
    Structural {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{file}:{line} {kind} {name} should be declared in a file called {expected}.")]
    FilenameMismatch {
        file: String,
        line: usize,
        kind: &'static str,
        name: String,
        expected: String,
    },

    #[error("{file}:{line} couldn't find import for class {class_name}")]
    ImportUnresolved {
        file: String,
        line: usize,
        class_name: String,
    },

    #[error("{file}:{line} {message}")]
    TypeLegality {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{file}:{line} attempt to redefine method {name}; previously defined at {file}:{first_line}")]
    MethodRedefinition {
        file: String,
        line: usize,
        first_line: usize,
        name: String,
    },

    #[error("{file}:{line} {message}")]
    IdRule {
        file: String,
        line: usize,
        message: String,
    },

    #[error("{path}:{line} {message}")]
    Manifest {
        path: String,
        line: usize,
        message: String,
    },
}

impl CoreError {
    /// The file the error occurred in, when one is known. Used by callers
    /// that want to group or sort diagnostics by source file.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match self {
            CoreError::Io { .. } => None,
            CoreError::Parse { file, .. }
            | CoreError::Structural { file, .. }
            | CoreError::FilenameMismatch { file, .. }
            | CoreError::ImportUnresolved { file, .. }
            | CoreError::TypeLegality { file, .. }
            | CoreError::MethodRedefinition { file, .. }
            | CoreError::IdRule { file, .. } => Some(file),
            CoreError::Manifest { path, .. } => Some(path),
        }
    }
}

/// A stage of the pipeline failed with one or more accumulated errors. The
/// first error is the "headline" failure for `?`-based propagation; the full
/// set is preserved for callers that want every diagnostic from the stage.
#[derive(Debug, Error)]
#[error("{}", .0.first().expect("CompileError is never constructed with an empty Vec"))]
pub struct CompileError(pub Vec<CoreError>);

impl CompileError {
    #[must_use]
    pub fn errors(&self) -> &[CoreError] {
        &self.0
    }
}
