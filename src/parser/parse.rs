//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the error type, helper methods, and the [`parse`] entry point.
//!
//! # Parser Architecture
//!
//! The Parser uses a recursive descent approach with the following organization:
//! - This module: Parser struct, helper methods, and coordination
//! - `declarations`: declarators, parameter lists, function and variable definitions
//! - `statements`: compound, selection, iteration and jump statements
//! - `expressions`: precedence climbing for binary operators, unary/postfix/primary
//!
//! Parsing stops at the first syntax error. Unlike the lexer there is no
//! recovery: the caller gets a [`ParseError`] naming the offending token.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use log::debug;
use std::fmt;

/// Parser error type
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub message: String,
    /// Lexeme of the offending token, or `"EOF"`
    pub found: String,
    /// Location of the offending token; at end of input, of the last token (if any)
    pub location: Option<SourceLocation>,
}

impl ParseError {
    pub fn is_eof(&self) -> bool {
        self.found == "EOF"
    }

    pub fn line(&self) -> Option<usize> {
        self.location.map(|loc| loc.line)
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "Syntax error at line {}, column {} near '{}': {}",
                loc.line, loc.column, self.found, self.message
            ),
            None => write!(f, "Syntax error at {}: {}", self.found, self.message),
        }
    }
}

impl std::error::Error for ParseError {}

/// Parse a token sequence into one translation unit.
pub fn parse<I>(tokens: I) -> Result<TranslationUnit, ParseError>
where
    I: IntoIterator<Item = Token>,
{
    Parser::new(tokens).parse_translation_unit()
}

/// Recursive descent parser for MiniC
pub struct Parser {
    pub(crate) tokens: Vec<Token>,
    pub(crate) position: usize,
    next_id: NodeId,
}

impl Parser {
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = Token>,
    {
        Self {
            tokens: tokens.into_iter().collect(),
            position: 0,
            next_id: 0,
        }
    }

    /// Parse the entire input (top-level declarations)
    pub fn parse_translation_unit(&mut self) -> Result<TranslationUnit, ParseError> {
        let mut unit = TranslationUnit::new();

        while !self.is_at_end() {
            let decl = self.parse_external_declaration()?;
            debug!(
                "parsed top-level declaration '{}' at line {}",
                decl.name(),
                decl.location().line
            );
            unit.decls.push(decl);
        }

        Ok(unit)
    }

    // ===== Helper methods =====

    /// Build an expression node with a fresh id
    pub(crate) fn make_expr(&mut self, kind: ExprKind, location: SourceLocation) -> Expr {
        let id = self.next_id;
        self.next_id += 1;
        Expr { id, kind, location }
    }

    /// True if the current token has the same variant as `kind` (payload ignored)
    pub(crate) fn check(&self, kind: &TokenKind) -> bool {
        self.peek_kind()
            .is_some_and(|k| std::mem::discriminant(k) == std::mem::discriminant(kind))
    }

    pub(crate) fn match_token(&mut self, kind: &TokenKind) -> bool {
        if self.check(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    pub(crate) fn advance(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    pub(crate) fn is_at_end(&self) -> bool {
        self.position >= self.tokens.len()
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    pub(crate) fn peek_kind(&self) -> Option<&TokenKind> {
        self.peek().map(|t| &t.kind)
    }

    pub(crate) fn peek_ahead(&self, n: usize) -> Option<&TokenKind> {
        self.tokens.get(self.position + n).map(|t| &t.kind)
    }

    /// Location of the current token, or of the last token at end of input
    pub(crate) fn current_location(&self) -> SourceLocation {
        self.peek()
            .or_else(|| self.tokens.last())
            .map(|t| t.location)
            .unwrap_or(SourceLocation::new(1, 1))
    }

    /// Error pointing at the current token (or EOF)
    pub(crate) fn error(&self, message: impl Into<String>) -> ParseError {
        match self.peek() {
            Some(token) => ParseError {
                message: message.into(),
                found: token.to_string(),
                location: Some(token.location),
            },
            None => ParseError {
                message: message.into(),
                found: "EOF".to_string(),
                location: self.tokens.last().map(|t| t.location),
            },
        }
    }

    /// Consume a token of the given kind or fail; returns its location
    pub(crate) fn expect_token(
        &mut self,
        kind: &TokenKind,
        message: &str,
    ) -> Result<SourceLocation, ParseError> {
        if self.check(kind) {
            let location = self.current_location();
            self.advance();
            Ok(location)
        } else {
            Err(self.error(message))
        }
    }

    pub(crate) fn expect_lparen(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::LParen, &format!("Expected '(' {ctx}"))
    }

    pub(crate) fn expect_rparen(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::RParen, &format!("Expected ')' {ctx}"))
    }

    pub(crate) fn expect_lbrace(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::LBrace, &format!("Expected '{{' {ctx}"))
    }

    pub(crate) fn expect_rbrace(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::RBrace, &format!("Expected '}}' {ctx}"))
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> Result<SourceLocation, ParseError> {
        self.expect_token(&TokenKind::Semicolon, &format!("Expected ';' {ctx}"))
    }

    pub(crate) fn expect_identifier(&mut self) -> Result<(String, SourceLocation), ParseError> {
        if let Some(Token {
            kind: TokenKind::Ident(name),
            location,
        }) = self.peek()
        {
            let ident = (name.clone(), *location);
            self.advance();
            Ok(ident)
        } else {
            Err(self.error("Expected identifier"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::lexer::tokenize;

    fn parse_source(source: &str) -> Result<TranslationUnit, ParseError> {
        parse(tokenize(source))
    }

    /// Expression of the first statement of `main`, rendered in prefix form
    fn first_expr(body: &str) -> String {
        let source = format!("int main() {{ {} }}", body);
        let unit = parse_source(&source).unwrap();
        let main = unit.function("main").unwrap();
        match &main.body.as_ref().unwrap().stmts[0] {
            Stmt::ExprStmt { expr, .. } => expr.to_string(),
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_simple_function() {
        let unit = parse_source("int main() { return 0; }").unwrap();

        assert_eq!(unit.decls.len(), 1);
        match &unit.decls[0] {
            Decl::Function(func) => {
                assert_eq!(func.name, "main");
                assert!(func.params.is_empty());
                assert_eq!(func.return_type.base, BaseType::Int);
                let body = func.body.as_ref().unwrap();
                assert!(matches!(body.stmts[0], Stmt::Return { expr: Some(_), .. }));
            }
            _ => panic!("Expected function definition"),
        }
    }

    #[test]
    fn test_multiplicative_binds_tighter() {
        assert_eq!(first_expr("1 + 2 * 3 - 4;"), "(- (+ 1 (* 2 3)) 4)");
    }

    #[test]
    fn test_full_precedence_ladder() {
        assert_eq!(
            first_expr("a || b && c == d < e + f * -g;"),
            "(|| a (&& b (== c (< d (+ e (* f (- g)))))))"
        );
        assert_eq!(first_expr("(1 + 2) * 3;"), "(* (+ 1 2) 3)");
        assert_eq!(first_expr("a < b == c > d;"), "(== (< a b) (> c d))");
    }

    #[test]
    fn test_assignment_is_right_associative() {
        assert_eq!(first_expr("a = b += c * 2;"), "(= a (+= b (* c 2)))");
    }

    #[test]
    fn test_postfix_and_unary() {
        assert_eq!(
            first_expr("*p = f(1, x[2]) + &y;"),
            "(= (* p) (+ (call f 1 (index x 2)) (& y)))"
        );
        assert_eq!(first_expr("!+-a;"), "(! (+ (- a)))");
    }

    #[test]
    fn test_adjacent_strings_concatenate() {
        assert_eq!(first_expr("s = \"ab\" \"cd\";"), "(= s \"abcd\")");
    }

    #[test]
    fn test_pointer_declarator_vs_dereference() {
        let unit = parse_source("int main() { int **pp; char *s = \"x\"; **pp = 3; return 0; }")
            .unwrap();
        let body = unit.function("main").unwrap().body.as_ref().unwrap();

        match &body.decls[0] {
            Decl::Variable(var) => {
                assert_eq!(var.name, "pp");
                assert_eq!(var.var_type.pointer_depth, 2);
            }
            _ => panic!("Expected variable definition"),
        }
        match &body.stmts[0] {
            Stmt::ExprStmt { expr, .. } => assert_eq!(expr.to_string(), "(= (* (* pp)) 3)"),
            other => panic!("Expected expression statement, got {:?}", other),
        }
    }

    #[test]
    fn test_declaration_forms() {
        let source = "static int counter = 0;\n\
                      extern float rate;\n\
                      int printf(char *fmt, ...);\n\
                      static void helper(void) { }\n\
                      int table[8];\n\
                      int main() { return 0; }";
        let unit = parse_source(source).unwrap();
        assert_eq!(unit.decls.len(), 6);

        match &unit.decls[0] {
            Decl::Variable(var) => {
                assert!(var.is_static);
                assert!(var.init.is_some());
            }
            _ => panic!("Expected variable"),
        }
        match &unit.decls[1] {
            Decl::Variable(var) => {
                assert!(var.is_extern);
                assert_eq!(var.var_type.base, BaseType::Float);
            }
            _ => panic!("Expected variable"),
        }
        match &unit.decls[2] {
            Decl::Function(func) => {
                assert!(!func.is_definition());
                assert_eq!(func.params.len(), 1);
                assert!(func.params.ellipsis);
                assert_eq!(func.params.params[0].param_type.pointer_depth, 1);
            }
            _ => panic!("Expected prototype"),
        }
        match &unit.decls[3] {
            Decl::Function(func) => {
                assert!(func.is_static);
                assert!(func.params.is_empty());
                assert!(func.return_type.is_void());
            }
            _ => panic!("Expected function"),
        }
        match &unit.decls[4] {
            Decl::Variable(var) => assert_eq!(var.var_type.array_dims, vec![8]),
            _ => panic!("Expected array"),
        }
    }

    #[test]
    fn test_control_flow_statements() {
        let source = "int main() {\n\
                        int i;\n\
                        for (i = 0; i < 10; i += 1) { if (i == 5) { break; } else { continue; } }\n\
                        while (1) { break; }\n\
                        for (;;) { }\n\
                        { int inner; }\n\
                        return;\n\
                      }";
        let unit = parse_source(source).unwrap();
        let body = unit.function("main").unwrap().body.as_ref().unwrap();

        assert_eq!(body.decls.len(), 1);
        assert_eq!(body.stmts.len(), 5);
        match &body.stmts[0] {
            Stmt::For {
                init,
                condition,
                step,
                body,
                ..
            } => {
                assert_eq!(init.as_ref().unwrap().to_string(), "(= i 0)");
                assert_eq!(condition.as_ref().unwrap().to_string(), "(< i 10)");
                assert_eq!(step.as_ref().unwrap().to_string(), "(+= i 1)");
                assert!(matches!(
                    body.stmts[0],
                    Stmt::If {
                        else_branch: Some(_),
                        ..
                    }
                ));
            }
            other => panic!("Expected for loop, got {:?}", other),
        }
        assert!(matches!(
            body.stmts[2],
            Stmt::For {
                init: None,
                condition: None,
                step: None,
                ..
            }
        ));
        assert!(matches!(body.stmts[3], Stmt::Compound(_)));
        assert!(matches!(body.stmts[4], Stmt::Return { expr: None, .. }));
    }

    #[test]
    fn test_syntax_error_names_token_and_line() {
        let err = parse_source("int main() {\n  int x\n  return 0;\n}").unwrap_err();

        assert_eq!(err.found, "return");
        assert_eq!(err.line(), Some(3));
        assert!(err.to_string().contains("Expected ';'"));
    }

    #[test]
    fn test_syntax_error_at_eof() {
        let err = parse_source("int main() { return 0;").unwrap_err();
        assert!(err.is_eof());
        assert_eq!(err.line(), Some(1));
    }

    #[test]
    fn test_unbraced_bodies_are_rejected() {
        let err = parse_source("int main() { if (1) return 0; }").unwrap_err();
        assert_eq!(err.found, "return");

        let err = parse_source("int main() { while (1) break; }").unwrap_err();
        assert_eq!(err.found, "break");
    }

    #[test]
    fn test_declarations_must_precede_statements() {
        let err = parse_source("int main() { f(); int x; }").unwrap_err();
        assert_eq!(err.found, "int");
    }

    #[test]
    fn test_bodies_only_on_function_declarators() {
        assert!(parse_source("int x { }").is_err());
        assert!(parse_source("extern int f(int a) { return a; }").is_err());
        assert!(parse_source("int main() { int g() { } }").is_err());
    }

    #[test]
    fn test_expression_ids_are_unique() {
        fn collect(expr: &Expr, ids: &mut Vec<NodeId>) {
            ids.push(expr.id);
            match &expr.kind {
                ExprKind::Binary { left, right, .. } => {
                    collect(left, ids);
                    collect(right, ids);
                }
                ExprKind::Unary { operand, .. } => collect(operand, ids),
                ExprKind::Assign { target, value, .. } => {
                    collect(target, ids);
                    collect(value, ids);
                }
                ExprKind::Call { callee, args } => {
                    collect(callee, ids);
                    args.iter().for_each(|a| collect(a, ids));
                }
                ExprKind::Index { base, index } => {
                    collect(base, ids);
                    collect(index, ids);
                }
                _ => {}
            }
        }

        let unit = parse_source("int main() { a = f(b, c[1]) * -d; }").unwrap();
        let body = unit.function("main").unwrap().body.as_ref().unwrap();
        let mut ids = Vec::new();
        if let Stmt::ExprStmt { expr, .. } = &body.stmts[0] {
            collect(expr, &mut ids);
        }
        let count = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), count);
        assert_eq!(count, 11);
    }
}
