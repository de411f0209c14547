//! Bottom-up expression typing
//!
//! Every expression gets a [`Ty`], recorded in the checker's side table under
//! its [`NodeId`]. An ill-typed subexpression is reported once and typed
//! [`Ty::Error`], which every later check accepts silently.

use crate::checker::engine::{Checker, Ctx};
use crate::checker::errors::SemanticError;
use crate::checker::symtab::Symbol;
use crate::checker::types::{assignable, binary_result, Ty};
use crate::parser::ast::*;

impl<'ast> Checker<'ast> {
    /// Infer and record the type of `expr`
    pub(crate) fn check_expr(&mut self, expr: &'ast Expr, ctx: Ctx<'ast>) -> Ty {
        let ty = self.infer_expr(expr, ctx);
        self.types.insert(expr.id, ty.clone());
        ty
    }

    fn infer_expr(&mut self, expr: &'ast Expr, ctx: Ctx<'ast>) -> Ty {
        match &expr.kind {
            ExprKind::Integer(_) => Ty::Int,
            ExprKind::Float(_) => Ty::Float,
            ExprKind::Char(_) => Ty::Char,
            ExprKind::String(_) => Ty::String,

            ExprKind::Ident(name) => match self.resolve(expr, name, ctx) {
                Some(symbol) => symbol.value_type(),
                None => Ty::Error,
            },

            ExprKind::Binary { op, left, right } => {
                let left_ty = self.check_expr(left, ctx);
                let right_ty = self.check_expr(right, ctx);
                match binary_result(*op, &left_ty, &right_ty) {
                    Some(ty) => ty,
                    None => {
                        self.type_mismatch(
                            format!(
                                "invalid operands to '{}': {} and {}",
                                op.symbol(),
                                left_ty,
                                right_ty
                            ),
                            expr.location,
                        );
                        Ty::Error
                    }
                }
            }

            ExprKind::Unary { op, operand } => {
                let operand_ty = self.check_expr(operand, ctx);
                self.unary_result(*op, operand_ty, expr.location)
            }

            ExprKind::Assign { op, target, value } => {
                self.check_assignment(*op, target, value, ctx)
            }

            ExprKind::Call { callee, args } => self.check_call(expr, callee, args, ctx),

            ExprKind::Index { base, index } => {
                let base_ty = self.check_expr(base, ctx);
                let index_ty = self.check_expr(index, ctx);

                if !index_ty.is_error() && !index_ty.is_integral() {
                    self.type_mismatch(
                        format!("array index has type {}, expected an integer", index_ty),
                        index.location,
                    );
                }
                if base_ty.is_error() {
                    return Ty::Error;
                }
                match base_ty.pointee() {
                    Some(element) => element,
                    None => {
                        self.type_mismatch(
                            format!("cannot index a value of type {}", base_ty),
                            base.location,
                        );
                        Ty::Error
                    }
                }
            }
        }
    }

    /// Look `name` up from the current scope and record the resolution
    fn resolve(&mut self, expr: &Expr, name: &str, ctx: Ctx<'ast>) -> Option<Symbol<'ast>> {
        match self.scopes.get(ctx.scope, name) {
            Some(symbol) => {
                self.resolutions.insert(expr.id, symbol);
                Some(symbol)
            }
            None => {
                self.report(SemanticError::UndefinedSymbol {
                    name: name.to_string(),
                    location: expr.location,
                });
                None
            }
        }
    }

    fn unary_result(&mut self, op: UnOp, operand: Ty, location: SourceLocation) -> Ty {
        if operand.is_error() {
            return Ty::Error;
        }

        let result = match op {
            UnOp::Neg | UnOp::Plus if operand.is_numeric() => {
                Some(if operand == Ty::Float { Ty::Float } else { Ty::Int })
            }
            UnOp::Not if operand.is_truthy_coercible() => Some(Ty::Int),
            UnOp::Deref => operand.pointee(),
            UnOp::AddrOf if operand != Ty::Function => Some(Ty::pointer_to(operand.clone())),
            _ => None,
        };

        result.unwrap_or_else(|| {
            self.type_mismatch(
                format!("invalid operand to '{}': {}", op.symbol(), operand),
                location,
            );
            Ty::Error
        })
    }

    fn check_assignment(
        &mut self,
        op: AssignOp,
        target: &'ast Expr,
        value: &'ast Expr,
        ctx: Ctx<'ast>,
    ) -> Ty {
        let target_ty = self.check_expr(target, ctx);
        let value_ty = self.check_expr(value, ctx);

        if !self.is_assignable_target(target) {
            self.report(SemanticError::NotAssignable {
                target: target.to_string(),
                location: target.location,
            });
            return Ty::Error;
        }

        // `a op= b` is checked as `a = a op b`
        let stored_ty = match op.binary_op() {
            None => value_ty,
            Some(bin_op) => match binary_result(bin_op, &target_ty, &value_ty) {
                Some(ty) => ty,
                None => {
                    self.type_mismatch(
                        format!(
                            "invalid operands to '{}': {} and {}",
                            op.symbol(),
                            target_ty,
                            value_ty
                        ),
                        value.location,
                    );
                    return Ty::Error;
                }
            },
        };

        if !assignable(&stored_ty, &target_ty) {
            self.type_mismatch(
                format!("cannot assign {} to {}", stored_ty, target_ty),
                value.location,
            );
        }
        target_ty
    }

    /// Whether `target` denotes storage: a non-array, non-const variable or
    /// parameter, a dereference, or an index expression.
    fn is_assignable_target(&self, target: &Expr) -> bool {
        match &target.kind {
            ExprKind::Ident(_) => match self.resolutions.get(&target.id) {
                Some(Symbol::Function(_)) => false,
                Some(symbol) => {
                    let ty = symbol.declared_type();
                    ty.array_dims.is_empty() && !(ty.is_const && ty.pointer_depth == 0)
                }
                // Already reported as undefined
                None => true,
            },
            ExprKind::Unary {
                op: UnOp::Deref, ..
            }
            | ExprKind::Index { .. } => true,
            _ => false,
        }
    }

    fn check_call(
        &mut self,
        call: &'ast Expr,
        callee: &'ast Expr,
        args: &'ast [Expr],
        ctx: Ctx<'ast>,
    ) -> Ty {
        let function = match &callee.kind {
            ExprKind::Ident(name) => {
                let symbol = self.resolve(callee, name, ctx);
                let callee_ty = symbol.map_or(Ty::Error, |symbol| symbol.value_type());
                self.types.insert(callee.id, callee_ty);

                match symbol {
                    Some(Symbol::Function(func)) => Some(func),
                    Some(_) => {
                        self.type_mismatch(
                            format!("'{}' is not a function", name),
                            callee.location,
                        );
                        None
                    }
                    None => None,
                }
            }
            _ => {
                let callee_ty = self.check_expr(callee, ctx);
                if !callee_ty.is_error() {
                    self.type_mismatch(
                        format!("called value of type {} is not a function", callee_ty),
                        callee.location,
                    );
                }
                None
            }
        };

        let arg_types: Vec<Ty> = args.iter().map(|arg| self.check_expr(arg, ctx)).collect();

        let Some(func) = function else {
            return Ty::Error;
        };

        let params = &func.params;
        let arity_ok = if params.ellipsis {
            args.len() >= params.len()
        } else {
            args.len() == params.len()
        };
        if !arity_ok {
            self.report(SemanticError::ArityMismatch {
                function: func.name.clone(),
                expected: params.len(),
                got: args.len(),
                variadic: params.ellipsis,
                location: call.location,
            });
        }

        for (position, (param, (arg, arg_ty))) in params
            .params
            .iter()
            .zip(args.iter().zip(&arg_types))
            .enumerate()
        {
            let param_ty = Ty::from_type(&param.param_type);
            if !assignable(arg_ty, &param_ty) {
                self.type_mismatch(
                    format!(
                        "argument {} of '{}' expects {}, got {}",
                        position + 1,
                        func.name,
                        param_ty,
                        arg_ty
                    ),
                    arg.location,
                );
            }
        }

        Ty::from_type(&func.return_type)
    }
}
