//! Statement parsing implementation
//!
//! This module handles parsing of all MiniC statement types:
//!
//! - Compound statements: `{ decl* stmt* }`
//! - Control flow: `if`, `while`, `for`
//! - Jump statements: `return`, `break`, `continue`
//! - Expression statements: function calls, assignments
//!
//! # Grammar
//!
//! ```text
//! compound_stmt ::= "{" declaration* statement* "}"
//! statement     ::= compound_stmt | if_stmt | while_stmt | for_stmt
//!                 | return_stmt | break_stmt | continue_stmt | expr_stmt
//! if_stmt       ::= "if" "(" expression ")" compound_stmt ["else" compound_stmt]
//! while_stmt    ::= "while" "(" expression ")" compound_stmt
//! for_stmt      ::= "for" "(" [expression] ";" [expression] ";" [expression] ")" compound_stmt
//! ```
//!
//! Bodies of `if`, `else`, `while` and `for` must be braced. Declarations
//! inside a block come before its statements; a declaration keyword after the
//! first statement is a syntax error.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

impl Parser {
    /// Parse `{ decl* stmt* }`
    pub(crate) fn parse_compound_statement(&mut self) -> Result<CompoundStmt, ParseError> {
        let location = self.expect_lbrace("to open block")?;

        let mut decls = Vec::new();
        while self.is_declaration_start() {
            decls.push(self.parse_declaration(false)?);
        }

        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.is_at_end() {
            if self.is_declaration_start() {
                return Err(self.error("Declarations must come before statements in a block"));
            }
            stmts.push(self.parse_statement()?);
        }

        self.expect_rbrace("to close block")?;

        Ok(CompoundStmt {
            decls,
            stmts,
            location,
        })
    }

    /// Parse a statement
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt, ParseError> {
        let location = self.current_location();

        match self.peek_kind() {
            Some(TokenKind::LBrace) => Ok(Stmt::Compound(self.parse_compound_statement()?)),
            Some(TokenKind::If) => {
                self.advance();
                self.parse_if_statement(location)
            }
            Some(TokenKind::While) => {
                self.advance();
                self.parse_while_statement(location)
            }
            Some(TokenKind::For) => {
                self.advance();
                self.parse_for_statement(location)
            }
            Some(TokenKind::Return) => {
                self.advance();
                self.parse_return_statement(location)
            }
            Some(TokenKind::Break) => {
                self.advance();
                self.expect_semicolon("after 'break'")?;
                Ok(Stmt::Break { location })
            }
            Some(TokenKind::Continue) => {
                self.advance();
                self.expect_semicolon("after 'continue'")?;
                Ok(Stmt::Continue { location })
            }
            _ => {
                let expr = self.parse_expression()?;
                self.expect_semicolon("after expression")?;
                Ok(Stmt::ExprStmt { expr, location })
            }
        }
    }

    fn parse_if_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'if'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after if condition")?;

        let then_branch = self.parse_braced_body("'if'")?;
        let else_branch = if self.match_token(&TokenKind::Else) {
            Some(self.parse_braced_body("'else'")?)
        } else {
            None
        };

        Ok(Stmt::If {
            condition,
            then_branch,
            else_branch,
            location,
        })
    }

    fn parse_while_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'while'")?;
        let condition = self.parse_expression()?;
        self.expect_rparen("after while condition")?;
        let body = self.parse_braced_body("'while'")?;

        Ok(Stmt::While {
            condition,
            body,
            location,
        })
    }

    fn parse_for_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        self.expect_lparen("after 'for'")?;

        let init = self.parse_optional_expression(&TokenKind::Semicolon)?;
        self.expect_semicolon("after for initializer")?;

        let condition = self.parse_optional_expression(&TokenKind::Semicolon)?;
        self.expect_semicolon("after for condition")?;

        let step = self.parse_optional_expression(&TokenKind::RParen)?;
        self.expect_rparen("after for clauses")?;

        let body = self.parse_braced_body("'for'")?;

        Ok(Stmt::For {
            init,
            condition,
            step,
            body,
            location,
        })
    }

    fn parse_return_statement(&mut self, location: SourceLocation) -> Result<Stmt, ParseError> {
        let expr = self.parse_optional_expression(&TokenKind::Semicolon)?;
        self.expect_semicolon("after return statement")?;
        Ok(Stmt::Return { expr, location })
    }

    /// An expression, or nothing if the next token is `terminator`
    fn parse_optional_expression(
        &mut self,
        terminator: &TokenKind,
    ) -> Result<Option<Expr>, ParseError> {
        if self.check(terminator) {
            Ok(None)
        } else {
            self.parse_expression().map(Some)
        }
    }

    fn parse_braced_body(&mut self, owner: &str) -> Result<CompoundStmt, ParseError> {
        if !self.check(&TokenKind::LBrace) {
            return Err(self.error(format!("Expected '{{' to open {owner} body")));
        }
        self.parse_compound_statement()
    }
}
