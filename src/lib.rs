//! # Introduction
//!
//! `minic` is the front end of a compiler for MiniC, a small C-like teaching
//! language. It turns source text into a validated AST, or into a complete
//! list of diagnostics.
//!
//! ## Pipeline
//!
//! ```text
//! Source → Lexer → Tokens → Parser → AST → Checker → Diagnostics (+ annotations)
//! ```
//!
//! 1. [`tokenize`] scans lazily and records lexical errors as it goes; an
//!    illegal character is skipped and scanning continues.
//! 2. [`parse`] builds a [`TranslationUnit`] and stops at the first syntax
//!    error.
//! 3. [`check`] resolves names through a scope chain, infers expression
//!    types and validates control flow. Every problem found is reported.
//!
//! [`compile`] runs the first two stages; the resulting [`Compilation`] owns
//! the AST that a [`CheckReport`] borrows from.
//!
//! ## Language
//!
//! Types: `int`, `float`, `char`, `void`, pointers, fixed-size arrays.
//! Control flow: `if/else`, `while`, `for`, `break`, `continue`, `return`.
//! Declarations: functions, prototypes, globals and locals with optional
//! `static`/`extern`/`const`.

pub mod checker;
pub mod parser;

use std::fmt;

pub use checker::{check, check_with_options, CheckOptions, CheckReport, DiagnosticKind};
pub use parser::ast::TranslationUnit;
pub use parser::{parse, tokenize, LexError, ParseError};

/// Errors that stop the pipeline
#[derive(Debug, Clone, PartialEq)]
pub enum FrontendError {
    /// The parse failed; also carries every lexical error from the scan
    Syntax {
        error: ParseError,
        lex_errors: Vec<LexError>,
    },
}

impl FrontendError {
    pub fn lex_errors(&self) -> &[LexError] {
        match self {
            FrontendError::Syntax { lex_errors, .. } => lex_errors,
        }
    }
}

impl fmt::Display for FrontendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrontendError::Syntax { error, lex_errors } => {
                for lex_error in lex_errors {
                    writeln!(f, "{}", lex_error)?;
                }
                write!(f, "{}", error)
            }
        }
    }
}

impl std::error::Error for FrontendError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FrontendError::Syntax { error, .. } => Some(error),
        }
    }
}

impl From<ParseError> for FrontendError {
    fn from(error: ParseError) -> Self {
        FrontendError::Syntax {
            error,
            lex_errors: Vec::new(),
        }
    }
}

/// A parsed translation unit together with the lexical errors found on the way
#[derive(Debug)]
pub struct Compilation {
    pub unit: TranslationUnit,
    pub lex_errors: Vec<LexError>,
}

impl Compilation {
    /// Run the checker with default options
    pub fn check(&self) -> CheckReport<'_> {
        checker::check(&self.unit)
    }
}

/// Tokenize and parse `source`.
///
/// Lexical errors are returned on both paths.
pub fn compile(source: &str) -> Result<Compilation, FrontendError> {
    let mut lexer = tokenize(source);
    let parsed = parse(lexer.by_ref());
    let lex_errors = lexer.finish();

    match parsed {
        Ok(unit) => Ok(Compilation { unit, lex_errors }),
        Err(error) => Err(FrontendError::Syntax { error, lex_errors }),
    }
}
