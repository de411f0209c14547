//! Declaration parsing implementation
//!
//! This module handles declarations at file and block scope:
//!
//! - Function definitions and prototypes: `int f(int a, char *b) { ... }`
//! - Variable definitions: `static int x = 4;`, `int buf[16];`
//! - Declarators, including pointer declarators and parameter lists
//!
//! # Grammar
//!
//! ```text
//! declaration     ::= ["static" | "extern"] type_specifier declarator
//!                     ["=" expression] (";" | compound_statement)
//! type_specifier  ::= ["const"] ("int" | "float" | "char" | "void")
//! declarator      ::= "*" declarator | direct_declarator
//! direct_declarator ::= ID | ID "(" parameter_list? ")" | ID ("[" INT "]")*
//! parameter_list  ::= "void" | parameter ("," parameter)* ["," "..."]
//! parameter       ::= type_specifier declarator
//! ```
//!
//! The shape of the declarator decides the AST case: a parameter list makes a
//! [`FunctionDef`], a bare name a [`VariableDef`]. `*` here is a pointer
//! declarator; in expression position the same token is a dereference.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseError, Parser};

/// Result of parsing a declarator, before it is combined with the base type
struct Declarator {
    name: String,
    location: SourceLocation,
    pointer_depth: usize,
    array_dims: Vec<usize>,
    params: Option<ParamList>,
}

impl Declarator {
    fn apply(&self, mut ty: Type) -> Type {
        ty.pointer_depth += self.pointer_depth;
        ty.array_dims.extend(self.array_dims.iter().copied());
        ty
    }
}

impl Parser {
    /// Whether the current token can start a declaration
    pub(crate) fn is_declaration_start(&self) -> bool {
        matches!(
            self.peek_kind(),
            Some(
                TokenKind::Static
                    | TokenKind::Extern
                    | TokenKind::Const
                    | TokenKind::Int
                    | TokenKind::Float
                    | TokenKind::Char
                    | TokenKind::Void
            )
        )
    }

    /// Parse a top-level declaration (function or variable)
    pub(crate) fn parse_external_declaration(&mut self) -> Result<Decl, ParseError> {
        self.parse_declaration(true)
    }

    /// Parse a declaration; `allow_body` is false inside compound statements
    pub(crate) fn parse_declaration(&mut self, allow_body: bool) -> Result<Decl, ParseError> {
        let is_static = self.match_token(&TokenKind::Static);
        let is_extern = !is_static && self.match_token(&TokenKind::Extern);

        let base = self.parse_type_specifier()?;
        let declarator = self.parse_declarator()?;
        let declared_type = declarator.apply(base);

        let Some(params) = declarator.params else {
            let init = if self.match_token(&TokenKind::Eq) {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect_semicolon("after variable declaration")?;

            return Ok(Decl::Variable(VariableDef {
                var_type: declared_type,
                name: declarator.name,
                init,
                is_static,
                is_extern,
                location: declarator.location,
            }));
        };

        let body = if self.check(&TokenKind::LBrace) {
            if !allow_body {
                return Err(self.error("Function definition is not allowed inside a block"));
            }
            if is_extern {
                return Err(self.error("An 'extern' declaration cannot have a body"));
            }
            Some(self.parse_compound_statement()?)
        } else {
            self.expect_semicolon("after function declaration")?;
            None
        };

        Ok(Decl::Function(FunctionDef {
            return_type: declared_type,
            name: declarator.name,
            params,
            body,
            is_static,
            is_extern,
            location: declarator.location,
        }))
    }

    /// Parse type: [const] base_type
    pub(crate) fn parse_type_specifier(&mut self) -> Result<Type, ParseError> {
        let is_const = self.match_token(&TokenKind::Const);

        let base = match self.peek_kind() {
            Some(TokenKind::Int) => BaseType::Int,
            Some(TokenKind::Float) => BaseType::Float,
            Some(TokenKind::Char) => BaseType::Char,
            Some(TokenKind::Void) => BaseType::Void,
            _ => return Err(self.error("Expected type specifier")),
        };
        self.advance();

        let ty = Type::new(base);
        Ok(if is_const { ty.with_const() } else { ty })
    }

    /// declarator ::= '*' declarator | direct_declarator
    fn parse_declarator(&mut self) -> Result<Declarator, ParseError> {
        if self.match_token(&TokenKind::Star) {
            let mut inner = self.parse_declarator()?;
            inner.pointer_depth += 1;
            return Ok(inner);
        }
        self.parse_direct_declarator()
    }

    fn parse_direct_declarator(&mut self) -> Result<Declarator, ParseError> {
        let (name, location) = self.expect_identifier()?;
        let mut declarator = Declarator {
            name,
            location,
            pointer_depth: 0,
            array_dims: Vec::new(),
            params: None,
        };

        if self.match_token(&TokenKind::LParen) {
            declarator.params = Some(self.parse_parameter_list()?);
            self.expect_rparen("after parameters")?;
        } else {
            while self.match_token(&TokenKind::LBracket) {
                declarator.array_dims.push(self.parse_array_size()?);
                self.expect_token(&TokenKind::RBracket, "Expected ']' after array size")?;
            }
        }

        Ok(declarator)
    }

    fn parse_array_size(&mut self) -> Result<usize, ParseError> {
        match self.peek_kind() {
            Some(TokenKind::IntLiteral(n)) if *n >= 0 => {
                let size = *n as usize;
                self.advance();
                Ok(size)
            }
            _ => Err(self.error("Array size must be a non-negative integer constant")),
        }
    }

    /// Parse parameter list (without the parentheses)
    fn parse_parameter_list(&mut self) -> Result<ParamList, ParseError> {
        let mut list = ParamList::default();

        if self.check(&TokenKind::RParen) {
            return Ok(list);
        }

        // Special case: (void) means no parameters
        if self.check(&TokenKind::Void) && matches!(self.peek_ahead(1), Some(TokenKind::RParen)) {
            self.advance();
            return Ok(list);
        }

        loop {
            if self.check(&TokenKind::Ellipsis) {
                if list.params.is_empty() {
                    return Err(self.error("Expected a named parameter before '...'"));
                }
                self.advance();
                list.ellipsis = true;
                break;
            }

            list.params.push(self.parse_parameter()?);

            if !self.match_token(&TokenKind::Comma) {
                break;
            }
        }

        Ok(list)
    }

    fn parse_parameter(&mut self) -> Result<Parameter, ParseError> {
        let base = self.parse_type_specifier()?;
        let declarator = self.parse_declarator()?;

        if declarator.params.is_some() {
            return Err(ParseError {
                message: "A parameter cannot be declared as a function".to_string(),
                found: declarator.name,
                location: Some(declarator.location),
            });
        }

        Ok(Parameter {
            param_type: declarator.apply(base),
            name: declarator.name,
            location: declarator.location,
        })
    }
}
