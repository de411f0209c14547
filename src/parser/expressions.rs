//! Expression parsing implementation
//!
//! This module handles parsing of MiniC expressions using precedence climbing
//! for binary operators and recursive descent for other expression forms.
//!
//! # Supported Expressions
//!
//! - Literals: integers, floats, characters, strings (adjacent strings concatenate)
//! - Identifiers
//! - Binary operators: arithmetic, comparison, logical
//! - Unary operators: `-`, `+`, `!`, `*`, `&`
//! - Postfix: `()` calls and `[]` indexing
//! - Assignment: `=`, `+=`, `-=`, `*=`, `/=`, `%=` (right-associative)
//!
//! # Precedence
//!
//! From loosest to tightest: assignment, `||`, `&&`, `== !=`, `< <= > >=`,
//! `+ -`, `* / %`, unary, postfix. All binary operators are left-associative.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

/// Binding power and AST operator for a binary operator token
fn binary_operator(kind: &TokenKind) -> Option<(u8, BinOp)> {
    let entry = match kind {
        TokenKind::OrOr => (1, BinOp::Or),
        TokenKind::AndAnd => (2, BinOp::And),
        TokenKind::EqEq => (3, BinOp::Eq),
        TokenKind::NotEq => (3, BinOp::Ne),
        TokenKind::Lt => (4, BinOp::Lt),
        TokenKind::Le => (4, BinOp::Le),
        TokenKind::Gt => (4, BinOp::Gt),
        TokenKind::Ge => (4, BinOp::Ge),
        TokenKind::Plus => (5, BinOp::Add),
        TokenKind::Minus => (5, BinOp::Sub),
        TokenKind::Star => (6, BinOp::Mul),
        TokenKind::Slash => (6, BinOp::Div),
        TokenKind::Percent => (6, BinOp::Mod),
        _ => return None,
    };
    Some(entry)
}

fn assignment_operator(kind: &TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Eq => Some(AssignOp::Assign),
        TokenKind::PlusEq => Some(AssignOp::Add),
        TokenKind::MinusEq => Some(AssignOp::Sub),
        TokenKind::StarEq => Some(AssignOp::Mul),
        TokenKind::SlashEq => Some(AssignOp::Div),
        TokenKind::PercentEq => Some(AssignOp::Mod),
        _ => None,
    }
}

fn unary_operator(kind: &TokenKind) -> Option<UnOp> {
    match kind {
        TokenKind::Minus => Some(UnOp::Neg),
        TokenKind::Plus => Some(UnOp::Plus),
        TokenKind::Bang => Some(UnOp::Not),
        TokenKind::Star => Some(UnOp::Deref),
        TokenKind::Amp => Some(UnOp::AddrOf),
        _ => None,
    }
}

impl Parser {
    /// Parse expression (top-level entry point)
    pub(crate) fn parse_expression(&mut self) -> Result<Expr, ParseError> {
        self.parse_assignment()
    }

    /// Parse assignment (right-associative)
    fn parse_assignment(&mut self) -> Result<Expr, ParseError> {
        let target = self.parse_binary(1)?;

        let Some(op) = self.peek_kind().and_then(assignment_operator) else {
            return Ok(target);
        };
        let location = self.current_location();
        self.advance();

        let value = self.parse_assignment()?;
        Ok(self.make_expr(
            ExprKind::Assign {
                op,
                target: Box::new(target),
                value: Box::new(value),
            },
            location,
        ))
    }

    /// Precedence climbing over the binary operator table
    fn parse_binary(&mut self, min_prec: u8) -> Result<Expr, ParseError> {
        let mut left = self.parse_unary()?;

        while let Some((prec, op)) = self.peek_kind().and_then(binary_operator) {
            if prec < min_prec {
                break;
            }
            let location = self.current_location();
            self.advance();

            let right = self.parse_binary(prec + 1)?;
            left = self.make_expr(
                ExprKind::Binary {
                    op,
                    left: Box::new(left),
                    right: Box::new(right),
                },
                location,
            );
        }

        Ok(left)
    }

    /// Parse unary: - + ! * &
    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        let Some(op) = self.peek_kind().and_then(unary_operator) else {
            return self.parse_postfix();
        };
        let location = self.current_location();
        self.advance();

        let operand = self.parse_unary()?;
        Ok(self.make_expr(
            ExprKind::Unary {
                op,
                operand: Box::new(operand),
            },
            location,
        ))
    }

    /// Parse postfix: calls and array indexing
    fn parse_postfix(&mut self) -> Result<Expr, ParseError> {
        let mut expr = self.parse_primary()?;

        loop {
            let location = self.current_location();
            if self.match_token(&TokenKind::LParen) {
                let args = self.parse_argument_list()?;
                self.expect_rparen("after function arguments")?;
                expr = self.make_expr(
                    ExprKind::Call {
                        callee: Box::new(expr),
                        args,
                    },
                    location,
                );
            } else if self.match_token(&TokenKind::LBracket) {
                let index = self.parse_expression()?;
                self.expect_token(&TokenKind::RBracket, "Expected ']' after array index")?;
                expr = self.make_expr(
                    ExprKind::Index {
                        base: Box::new(expr),
                        index: Box::new(index),
                    },
                    location,
                );
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn parse_argument_list(&mut self) -> Result<Vec<Expr>, ParseError> {
        let mut args = Vec::new();

        if !self.check(&TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_token(&TokenKind::Comma) {
                    break;
                }
            }
        }

        Ok(args)
    }

    /// Parse primary: literals, identifiers, parenthesized expressions
    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        let location = self.current_location();

        let kind = match self.peek_kind() {
            Some(TokenKind::IntLiteral(n)) => ExprKind::Integer(*n),
            Some(TokenKind::FloatLiteral(x)) => ExprKind::Float(*x),
            Some(TokenKind::CharLiteral(c)) => ExprKind::Char(*c),
            Some(TokenKind::Ident(name)) => ExprKind::Ident(name.clone()),
            Some(TokenKind::StringLiteral(_)) => {
                let text = self.parse_string_literals();
                return Ok(self.make_expr(ExprKind::String(text), location));
            }
            Some(TokenKind::LParen) => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect_rparen("after expression")?;
                return Ok(expr);
            }
            _ => return Err(self.error("Expected expression")),
        };
        self.advance();

        Ok(self.make_expr(kind, location))
    }

    /// Consume one or more adjacent string literals as a single string
    fn parse_string_literals(&mut self) -> String {
        let mut text = String::new();
        while let Some(TokenKind::StringLiteral(part)) = self.peek_kind() {
            text.push_str(part);
            self.advance();
        }
        text
    }
}
