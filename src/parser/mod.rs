//! MiniC source code parser
//!
//! This module transforms MiniC source text into an Abstract Syntax Tree (AST):
//! - [`lexer`]: Tokenization (source text → tokens)
//! - [`parse`]: Parsing (tokens → AST)
//! - [`ast`]: AST node definitions
//! - [`visit`]: Read-only traversal for passes over the AST
//!
//! # Supported Language
//!
//! - Types: `int`, `float`, `char`, `void`, `const`, pointers, fixed-size arrays
//! - Storage: `static`, `extern`, function prototypes, variadic `...` parameters
//! - Statements: blocks, `if`/`else`, `while`, `for`, `break`, `continue`, `return`
//! - Expressions: arithmetic, comparison, logical, assignment, calls, indexing
//! - No preprocessor, structs, casts or `switch`
//!
//! # Parser Implementation
//!
//! Hand-written recursive descent parser with precedence climbing for binary operators.
//! No external parser generator dependencies.

pub mod ast;
pub mod lexer;
pub mod parse;
pub mod visit;

mod declarations;
mod expressions;
mod statements;

pub use lexer::{tokenize, LexError, LexErrorKind, Lexer, Token, TokenKind};
pub use parse::{parse, ParseError, Parser};
