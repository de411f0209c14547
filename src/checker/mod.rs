//! Semantic checker
//!
//! This module validates a parsed [`TranslationUnit`]:
//! - [`symtab`]: arena-backed scope tree and the symbols bound in it
//! - [`types`]: the type lattice used for expression inference
//! - [`errors`]: semantic diagnostics
//! - `engine`: declarations, scopes and statements
//! - `expressions`: bottom-up expression typing
//! - `returns`: reachability of valued `return` statements
//!
//! # Checking Model
//!
//! One walk over the tree, starting from an empty root scope. Problems are
//! collected as diagnostics and the walk continues, so a single run reports
//! everything it finds. The AST is never modified: inferred types and name
//! resolutions are returned in side tables keyed by [`NodeId`].

pub mod errors;
pub mod symtab;
pub mod types;

mod engine;
mod expressions;
mod returns;

pub use errors::{DiagnosticKind, SemanticError};
pub use symtab::{Scope, ScopeId, ScopeTree, Symbol};
pub use types::Ty;

use crate::parser::ast::{NodeId, TranslationUnit};
use engine::Checker;
use log::info;
use rustc_hash::FxHashMap;

/// Checker configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckOptions {
    /// Check `return <expr>;` against the function's declared return type
    pub check_return_types: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            check_return_types: true,
        }
    }
}

/// Outcome of checking one translation unit
#[derive(Debug)]
pub struct CheckReport<'ast> {
    /// Diagnostics in the order they were found
    pub diagnostics: Vec<SemanticError>,
    /// False iff a fatal diagnostic is present
    pub ok: bool,
    pub scopes: ScopeTree<'ast>,
    /// Inferred type of every checked expression
    pub types: FxHashMap<NodeId, Ty>,
    /// Declaration each identifier resolved to
    pub resolutions: FxHashMap<NodeId, Symbol<'ast>>,
}

impl<'ast> CheckReport<'ast> {
    /// Number of diagnostics of the given kind
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics.iter().filter(|d| d.kind() == kind).count()
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn type_of(&self, id: NodeId) -> Option<&Ty> {
        self.types.get(&id)
    }

    pub fn resolution(&self, id: NodeId) -> Option<Symbol<'ast>> {
        self.resolutions.get(&id).copied()
    }
}

/// Check `unit` with default options
pub fn check(unit: &TranslationUnit) -> CheckReport<'_> {
    check_with_options(unit, CheckOptions::default())
}

pub fn check_with_options(unit: &TranslationUnit, options: CheckOptions) -> CheckReport<'_> {
    let report = Checker::new(options).check_unit(unit);
    info!(
        "checked {} declarations: {} diagnostics, {} scopes, ok = {}",
        unit.decls.len(),
        report.diagnostics.len(),
        report.scopes.len(),
        report.ok
    );
    report
}
