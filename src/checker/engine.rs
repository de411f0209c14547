//! Checker state and statement-level traversal
//!
//! One [`Checker`] checks one translation unit. Scope and loop context travel
//! down the recursion in a [`Ctx`] passed by value, so a nested block or loop
//! can never leak its context into a sibling.

use crate::checker::errors::SemanticError;
use crate::checker::returns::has_reachable_return;
use crate::checker::symtab::{ScopeId, ScopeTree, Symbol};
use crate::checker::types::{assignable, Ty};
use crate::checker::{CheckOptions, CheckReport};
use crate::parser::ast::*;
use log::{debug, trace};
use rustc_hash::FxHashMap;

/// Traversal context for the statement being checked
#[derive(Debug, Clone, Copy)]
pub(crate) struct Ctx<'ast> {
    pub(crate) scope: ScopeId,
    pub(crate) in_loop: bool,
    /// Function whose body is being checked
    pub(crate) function: Option<&'ast FunctionDef>,
}

impl Ctx<'_> {
    fn entering_loop(self) -> Self {
        Self {
            in_loop: true,
            ..self
        }
    }
}

pub(crate) struct Checker<'ast> {
    pub(crate) scopes: ScopeTree<'ast>,
    pub(crate) diagnostics: Vec<SemanticError>,
    pub(crate) types: FxHashMap<NodeId, Ty>,
    pub(crate) resolutions: FxHashMap<NodeId, Symbol<'ast>>,
    options: CheckOptions,
}

impl<'ast> Checker<'ast> {
    pub(crate) fn new(options: CheckOptions) -> Self {
        Self {
            scopes: ScopeTree::new(),
            diagnostics: Vec::new(),
            types: FxHashMap::default(),
            resolutions: FxHashMap::default(),
            options,
        }
    }

    pub(crate) fn check_unit(mut self, unit: &'ast TranslationUnit) -> CheckReport<'ast> {
        let ctx = Ctx {
            scope: self.scopes.root(),
            in_loop: false,
            function: None,
        };

        for decl in &unit.decls {
            self.check_decl(decl, ctx);
        }

        // Whole-program rule, run once after the traversal
        let mains = unit
            .functions()
            .filter(|func| func.name == "main" && func.is_definition())
            .count();
        if mains != 1 {
            self.report(SemanticError::MissingMain { found: mains });
        }

        let ok = !self.diagnostics.iter().any(SemanticError::is_fatal);
        CheckReport {
            diagnostics: self.diagnostics,
            ok,
            scopes: self.scopes,
            types: self.types,
            resolutions: self.resolutions,
        }
    }

    pub(crate) fn report(&mut self, error: SemanticError) {
        debug!("diagnostic: {}", error);
        self.diagnostics.push(error);
    }

    pub(crate) fn type_mismatch(&mut self, message: String, location: SourceLocation) {
        self.report(SemanticError::TypeMismatch { message, location });
    }

    fn declare(&mut self, scope: ScopeId, symbol: Symbol<'ast>) {
        if let Err(previous) = self.scopes.add(scope, symbol) {
            self.report(SemanticError::DuplicateSymbol {
                name: symbol.name().to_string(),
                previous: previous.location(),
                location: symbol.location(),
            });
        }
    }

    fn enter_scope(&mut self, parent: ScopeId) -> ScopeId {
        let scope = self.scopes.push_child(parent);
        trace!("enter scope {:?} (parent {:?})", scope, parent);
        scope
    }

    // ===== Declarations =====

    fn check_decl(&mut self, decl: &'ast Decl, ctx: Ctx<'ast>) {
        match decl {
            Decl::Function(func) => self.check_function(func, ctx),
            Decl::Variable(var) => self.check_variable(var, ctx),
        }
    }

    fn check_variable(&mut self, var: &'ast VariableDef, ctx: Ctx<'ast>) {
        if var.var_type.is_void() {
            self.type_mismatch(
                format!("variable '{}' declared with type void", var.name),
                var.location,
            );
        }

        // The initializer is checked before the name is visible
        if let Some(init) = &var.init {
            let init_ty = self.check_expr(init, ctx);
            let var_ty = Ty::from_type(&var.var_type);
            if !assignable(&init_ty, &var_ty) {
                self.type_mismatch(
                    format!(
                        "cannot initialize '{}' of type {} with a value of type {}",
                        var.name, var_ty, init_ty
                    ),
                    init.location,
                );
            }
        }

        self.declare(ctx.scope, Symbol::Variable(var));
    }

    fn check_function(&mut self, func: &'ast FunctionDef, ctx: Ctx<'ast>) {
        self.declare(ctx.scope, Symbol::Function(func));

        let Some(body) = &func.body else {
            return;
        };

        // Parameters and the body's own declarations share one scope
        let scope = self.enter_scope(ctx.scope);
        for param in &func.params.params {
            if param.param_type.is_void() {
                self.type_mismatch(
                    format!("parameter '{}' declared with type void", param.name),
                    param.location,
                );
            }
            self.declare(scope, Symbol::Parameter(param));
        }

        let inner = Ctx {
            scope,
            in_loop: false,
            function: Some(func),
        };
        self.check_block_items(body, inner);
        trace!("leave function '{}'", func.name);

        if !func.return_type.is_void() && !has_reachable_return(body) {
            self.report(SemanticError::MissingReturn {
                function: func.name.clone(),
                location: func.location,
            });
        }
    }

    // ===== Statements =====

    fn check_compound(&mut self, block: &'ast CompoundStmt, ctx: Ctx<'ast>) {
        let scope = self.enter_scope(ctx.scope);
        self.check_block_items(block, Ctx { scope, ..ctx });
        trace!("leave scope {:?}", scope);
    }

    fn check_block_items(&mut self, block: &'ast CompoundStmt, ctx: Ctx<'ast>) {
        for decl in &block.decls {
            self.check_decl(decl, ctx);
        }
        for stmt in &block.stmts {
            self.check_stmt(stmt, ctx);
        }
    }

    fn check_stmt(&mut self, stmt: &'ast Stmt, ctx: Ctx<'ast>) {
        match stmt {
            Stmt::Compound(block) => self.check_compound(block, ctx),

            Stmt::If {
                condition,
                then_branch,
                else_branch,
                ..
            } => {
                self.check_condition(condition, ctx);
                self.check_compound(then_branch, ctx);
                if let Some(else_branch) = else_branch {
                    self.check_compound(else_branch, ctx);
                }
            }

            Stmt::While {
                condition, body, ..
            } => {
                self.check_condition(condition, ctx);
                self.check_compound(body, ctx.entering_loop());
            }

            Stmt::For {
                init,
                condition,
                step,
                body,
                ..
            } => {
                if let Some(init) = init {
                    self.check_expr(init, ctx);
                }
                if let Some(condition) = condition {
                    self.check_condition(condition, ctx);
                }
                if let Some(step) = step {
                    self.check_expr(step, ctx);
                }
                self.check_compound(body, ctx.entering_loop());
            }

            Stmt::Break { location } => self.check_jump("break", *location, ctx),
            Stmt::Continue { location } => self.check_jump("continue", *location, ctx),

            Stmt::Return { expr, location } => {
                let Some(expr) = expr else {
                    return;
                };
                let ty = self.check_expr(expr, ctx);
                if self.options.check_return_types {
                    if let Some(func) = ctx.function {
                        self.check_return_type(func, &ty, *location);
                    }
                }
            }

            Stmt::ExprStmt { expr, .. } => {
                self.check_expr(expr, ctx);
            }
        }
    }

    fn check_jump(&mut self, keyword: &'static str, location: SourceLocation, ctx: Ctx<'ast>) {
        if !ctx.in_loop {
            self.report(SemanticError::InvalidBreakContinue { keyword, location });
        }
    }

    fn check_condition(&mut self, condition: &'ast Expr, ctx: Ctx<'ast>) {
        let ty = self.check_expr(condition, ctx);
        if !ty.is_truthy_coercible() {
            self.type_mismatch(
                format!("condition of type {} is not a truth value", ty),
                condition.location,
            );
        }
    }

    fn check_return_type(&mut self, func: &FunctionDef, ty: &Ty, location: SourceLocation) {
        if func.return_type.is_void() {
            self.type_mismatch(
                format!("void function '{}' returns a value", func.name),
                location,
            );
            return;
        }

        let expected = Ty::from_type(&func.return_type);
        if !assignable(ty, &expected) {
            self.type_mismatch(
                format!(
                    "function '{}' returns {} but the value has type {}",
                    func.name, expected, ty
                ),
                location,
            );
        }
    }
}
