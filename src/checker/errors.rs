//! Semantic diagnostics produced by the checker
//!
//! This module defines [`SemanticError`], which represents every rule
//! violation found after parsing (as opposed to lexical or syntax errors).
//!
//! Semantic errors are accumulated, never thrown: the checker records one and
//! keeps going. Only [`SemanticError::MissingMain`] is fatal to the program.

use crate::parser::ast::SourceLocation;
use std::fmt;

/// Fieldless tag of a [`SemanticError`], for counting and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    DuplicateSymbol,
    UndefinedSymbol,
    TypeMismatch,
    ArityMismatch,
    InvalidBreakContinue,
    MissingReturn,
    NotAssignable,
    MissingMain,
}

/// Semantic errors found while checking a translation unit
#[derive(Debug, Clone, PartialEq)]
pub enum SemanticError {
    /// Name declared twice in the same scope
    DuplicateSymbol {
        name: String,
        previous: SourceLocation,
        location: SourceLocation,
    },

    /// Identifier not found in any enclosing scope
    UndefinedSymbol {
        name: String,
        location: SourceLocation,
    },

    /// Operand, argument, initializer or return value of the wrong type
    TypeMismatch {
        message: String,
        location: SourceLocation,
    },

    /// Function called with the wrong number of arguments
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
        variadic: bool,
        location: SourceLocation,
    },

    /// `break` or `continue` outside a loop
    InvalidBreakContinue {
        keyword: &'static str,
        location: SourceLocation,
    },

    /// Non-void function without a reachable `return <expr>;`
    MissingReturn {
        function: String,
        location: SourceLocation,
    },

    /// Left side of an assignment does not denote storage
    NotAssignable {
        target: String,
        location: SourceLocation,
    },

    /// No unique top-level `main` definition
    MissingMain { found: usize },
}

impl SemanticError {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            SemanticError::DuplicateSymbol { .. } => DiagnosticKind::DuplicateSymbol,
            SemanticError::UndefinedSymbol { .. } => DiagnosticKind::UndefinedSymbol,
            SemanticError::TypeMismatch { .. } => DiagnosticKind::TypeMismatch,
            SemanticError::ArityMismatch { .. } => DiagnosticKind::ArityMismatch,
            SemanticError::InvalidBreakContinue { .. } => DiagnosticKind::InvalidBreakContinue,
            SemanticError::MissingReturn { .. } => DiagnosticKind::MissingReturn,
            SemanticError::NotAssignable { .. } => DiagnosticKind::NotAssignable,
            SemanticError::MissingMain { .. } => DiagnosticKind::MissingMain,
        }
    }

    pub fn location(&self) -> Option<&SourceLocation> {
        match self {
            SemanticError::DuplicateSymbol { location, .. } => Some(location),
            SemanticError::UndefinedSymbol { location, .. } => Some(location),
            SemanticError::TypeMismatch { location, .. } => Some(location),
            SemanticError::ArityMismatch { location, .. } => Some(location),
            SemanticError::InvalidBreakContinue { location, .. } => Some(location),
            SemanticError::MissingReturn { location, .. } => Some(location),
            SemanticError::NotAssignable { location, .. } => Some(location),
            SemanticError::MissingMain { .. } => None,
        }
    }

    /// Fatal diagnostics make the whole program invalid
    pub fn is_fatal(&self) -> bool {
        matches!(self, SemanticError::MissingMain { .. })
    }
}

impl fmt::Display for SemanticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SemanticError::DuplicateSymbol {
                name,
                previous,
                location,
            } => {
                write!(
                    f,
                    "Duplicate symbol '{}' at line {} (previously declared at line {})",
                    name, location.line, previous.line
                )
            }
            SemanticError::UndefinedSymbol { name, location } => {
                write!(f, "Undefined symbol '{}' at line {}", name, location.line)
            }
            SemanticError::TypeMismatch { message, location } => {
                write!(f, "Type mismatch at line {}: {}", location.line, message)
            }
            SemanticError::ArityMismatch {
                function,
                expected,
                got,
                variadic,
                location,
            } => {
                write!(
                    f,
                    "Function '{}' expects {}{} argument{}, got {} at line {}",
                    function,
                    if *variadic { "at least " } else { "" },
                    expected,
                    if *expected == 1 { "" } else { "s" },
                    got,
                    location.line
                )
            }
            SemanticError::InvalidBreakContinue { keyword, location } => {
                write!(f, "'{}' outside of a loop at line {}", keyword, location.line)
            }
            SemanticError::MissingReturn { function, location } => {
                write!(
                    f,
                    "Function '{}' declared at line {} does not return a value",
                    function, location.line
                )
            }
            SemanticError::NotAssignable { target, location } => {
                write!(f, "Cannot assign to '{}' at line {}", target, location.line)
            }
            SemanticError::MissingMain { found } => {
                if *found == 0 {
                    write!(f, "No main() function found")
                } else {
                    write!(f, "Expected exactly one main() function, found {}", found)
                }
            }
        }
    }
}

impl std::error::Error for SemanticError {}
