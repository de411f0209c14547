//! Completeness: does a function body reach a `return <expr>;`?

use crate::parser::ast::{CompoundStmt, Expr, Stmt};
use crate::parser::visit::{walk_stmt, Visitor};

#[derive(Default)]
struct ReturnFinder {
    found: bool,
}

impl<'ast> Visitor<'ast> for ReturnFinder {
    fn visit_compound(&mut self, block: &'ast CompoundStmt) {
        for stmt in &block.stmts {
            self.visit_stmt(stmt);
            // Anything after an unconditional jump in the same list is dead
            if matches!(
                stmt,
                Stmt::Return { .. } | Stmt::Break { .. } | Stmt::Continue { .. }
            ) {
                break;
            }
        }
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        match stmt {
            Stmt::Return { expr: Some(_), .. } => self.found = true,
            _ => walk_stmt(self, stmt),
        }
    }

    fn visit_expr(&mut self, _expr: &'ast Expr) {}
}

/// True if `body` contains a reachable `return` carrying a value
pub(crate) fn has_reachable_return(body: &CompoundStmt) -> bool {
    let mut finder = ReturnFinder::default();
    finder.visit_compound(body);
    finder.found
}
