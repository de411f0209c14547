//! Read-only AST traversal
//!
//! A pass implements [`Visitor`] and overrides only the node kinds it cares
//! about. Every default method forwards to the matching `walk_*` function,
//! which visits the node's children in source order. An override that still
//! wants the children visited calls the `walk_*` function itself.
//!
//! Node types know nothing about visitors, so a new pass never touches `ast`.

use crate::parser::ast::*;

pub trait Visitor<'ast>: Sized {
    fn visit_translation_unit(&mut self, unit: &'ast TranslationUnit) {
        walk_translation_unit(self, unit);
    }

    fn visit_decl(&mut self, decl: &'ast Decl) {
        walk_decl(self, decl);
    }

    fn visit_function(&mut self, func: &'ast FunctionDef) {
        walk_function(self, func);
    }

    fn visit_parameter(&mut self, _param: &'ast Parameter) {}

    fn visit_variable(&mut self, var: &'ast VariableDef) {
        walk_variable(self, var);
    }

    fn visit_compound(&mut self, block: &'ast CompoundStmt) {
        walk_compound(self, block);
    }

    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

pub fn walk_translation_unit<'ast, V: Visitor<'ast>>(visitor: &mut V, unit: &'ast TranslationUnit) {
    for decl in &unit.decls {
        visitor.visit_decl(decl);
    }
}

pub fn walk_decl<'ast, V: Visitor<'ast>>(visitor: &mut V, decl: &'ast Decl) {
    match decl {
        Decl::Function(func) => visitor.visit_function(func),
        Decl::Variable(var) => visitor.visit_variable(var),
    }
}

pub fn walk_function<'ast, V: Visitor<'ast>>(visitor: &mut V, func: &'ast FunctionDef) {
    for param in &func.params.params {
        visitor.visit_parameter(param);
    }
    if let Some(body) = &func.body {
        visitor.visit_compound(body);
    }
}

pub fn walk_variable<'ast, V: Visitor<'ast>>(visitor: &mut V, var: &'ast VariableDef) {
    if let Some(init) = &var.init {
        visitor.visit_expr(init);
    }
}

pub fn walk_compound<'ast, V: Visitor<'ast>>(visitor: &mut V, block: &'ast CompoundStmt) {
    for decl in &block.decls {
        visitor.visit_decl(decl);
    }
    for stmt in &block.stmts {
        visitor.visit_stmt(stmt);
    }
}

pub fn walk_stmt<'ast, V: Visitor<'ast>>(visitor: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Compound(block) => visitor.visit_compound(block),
        Stmt::If {
            condition,
            then_branch,
            else_branch,
            ..
        } => {
            visitor.visit_expr(condition);
            visitor.visit_compound(then_branch);
            if let Some(else_branch) = else_branch {
                visitor.visit_compound(else_branch);
            }
        }
        Stmt::While {
            condition, body, ..
        } => {
            visitor.visit_expr(condition);
            visitor.visit_compound(body);
        }
        Stmt::For {
            init,
            condition,
            step,
            body,
            ..
        } => {
            for expr in [init, condition, step].into_iter().flatten() {
                visitor.visit_expr(expr);
            }
            visitor.visit_compound(body);
        }
        Stmt::Return { expr, .. } => {
            if let Some(expr) = expr {
                visitor.visit_expr(expr);
            }
        }
        Stmt::ExprStmt { expr, .. } => visitor.visit_expr(expr),
        Stmt::Break { .. } | Stmt::Continue { .. } => {}
    }
}

pub fn walk_expr<'ast, V: Visitor<'ast>>(visitor: &mut V, expr: &'ast Expr) {
    match &expr.kind {
        ExprKind::Integer(_)
        | ExprKind::Float(_)
        | ExprKind::Char(_)
        | ExprKind::String(_)
        | ExprKind::Ident(_) => {}
        ExprKind::Binary { left, right, .. } => {
            visitor.visit_expr(left);
            visitor.visit_expr(right);
        }
        ExprKind::Unary { operand, .. } => visitor.visit_expr(operand),
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr(target);
            visitor.visit_expr(value);
        }
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(callee);
            for arg in args {
                visitor.visit_expr(arg);
            }
        }
        ExprKind::Index { base, index } => {
            visitor.visit_expr(base);
            visitor.visit_expr(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{lexer::tokenize, parse::parse};

    #[derive(Default)]
    struct Counter {
        idents: Vec<String>,
        loops: usize,
    }

    impl<'ast> Visitor<'ast> for Counter {
        fn visit_stmt(&mut self, stmt: &'ast Stmt) {
            if matches!(stmt, Stmt::While { .. } | Stmt::For { .. }) {
                self.loops += 1;
            }
            walk_stmt(self, stmt);
        }

        fn visit_expr(&mut self, expr: &'ast Expr) {
            if let ExprKind::Ident(name) = &expr.kind {
                self.idents.push(name.clone());
            }
            walk_expr(self, expr);
        }
    }

    #[test]
    fn test_walk_visits_children_in_source_order() {
        let source = "int g = 1;\n\
                      int main() {\n\
                        int a = g;\n\
                        while (a) { for (;;) { a = f(a, b[c]); } }\n\
                        return a;\n\
                      }";
        let unit = parse(tokenize(source)).unwrap();

        let mut counter = Counter::default();
        counter.visit_translation_unit(&unit);

        assert_eq!(counter.loops, 2);
        assert_eq!(counter.idents, vec!["g", "a", "a", "f", "a", "b", "c", "a"]);
    }
}
