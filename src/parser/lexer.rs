//! Lexer (tokenizer) for MiniC source code
//!
//! Converts raw source text into a lazy stream of [`Token`]s consumed by the
//! parser. Lexing never aborts: an illegal character is recorded as a
//! [`LexError`], skipped, and scanning resumes with the next character.
//! Unterminated strings, character constants and block comments are
//! recorded the same way, so one pass reports every lexical problem.

use super::ast::SourceLocation;
use log::debug;
use std::fmt;

/// All token kinds produced by the lexer.
///
/// Literal variants carry the decoded value rather than the raw lexeme.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    IntLiteral(i64),
    FloatLiteral(f64),
    CharLiteral(char),
    StringLiteral(String),

    // Identifiers
    Ident(String),

    // Keywords
    Int,
    Float,
    Char,
    Void,
    Const,
    Static,
    Extern,
    If,
    Else,
    While,
    For,
    Return,
    Break,
    Continue,

    // Arithmetic
    Plus,    // +
    Minus,   // -
    Star,    // *
    Slash,   // /
    Percent, // %

    // Comparison
    EqEq,  // ==
    NotEq, // !=
    Lt,    // <
    Le,    // <=
    Gt,    // >
    Ge,    // >=

    // Logical
    AndAnd, // &&
    OrOr,   // ||
    Bang,   // !
    Amp,    // &

    // Assignment
    Eq,        // =
    PlusEq,    // +=
    MinusEq,   // -=
    StarEq,    // *=
    SlashEq,   // /=
    PercentEq, // %=

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Semicolon, // ;
    Comma,     // ,
    Colon,     // :
    Dot,       // .
    Ellipsis,  // ...
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            TokenKind::IntLiteral(n) => return write!(f, "{}", n),
            TokenKind::FloatLiteral(x) => return write!(f, "{:?}", x),
            TokenKind::CharLiteral(c) => return write!(f, "'{}'", c.escape_default()),
            TokenKind::StringLiteral(s) => return write!(f, "\"{}\"", s.escape_default()),
            TokenKind::Ident(name) => return write!(f, "{}", name),
            TokenKind::Int => "int",
            TokenKind::Float => "float",
            TokenKind::Char => "char",
            TokenKind::Void => "void",
            TokenKind::Const => "const",
            TokenKind::Static => "static",
            TokenKind::Extern => "extern",
            TokenKind::If => "if",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::For => "for",
            TokenKind::Return => "return",
            TokenKind::Break => "break",
            TokenKind::Continue => "continue",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::Percent => "%",
            TokenKind::EqEq => "==",
            TokenKind::NotEq => "!=",
            TokenKind::Lt => "<",
            TokenKind::Le => "<=",
            TokenKind::Gt => ">",
            TokenKind::Ge => ">=",
            TokenKind::AndAnd => "&&",
            TokenKind::OrOr => "||",
            TokenKind::Bang => "!",
            TokenKind::Amp => "&",
            TokenKind::Eq => "=",
            TokenKind::PlusEq => "+=",
            TokenKind::MinusEq => "-=",
            TokenKind::StarEq => "*=",
            TokenKind::SlashEq => "/=",
            TokenKind::PercentEq => "%=",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBrace => "{",
            TokenKind::RBrace => "}",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Semicolon => ";",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Dot => ".",
            TokenKind::Ellipsis => "...",
        };
        write!(f, "{}", text)
    }
}

/// A classified lexeme and where it starts.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, location: SourceLocation) -> Self {
        Self { kind, location }
    }

    pub fn line(&self) -> usize {
        self.location.line
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// What went wrong while scanning
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    IllegalCharacter(char),
    UnterminatedString,
    UnterminatedChar,
    UnterminatedComment,
    EmptyChar,
    MultiCharacterChar,
    InvalidEscape(char),
    InvalidNumber(String),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexErrorKind::IllegalCharacter(ch) => {
                write!(f, "illegal character '{}'", ch.escape_default())
            }
            LexErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            LexErrorKind::UnterminatedChar => write!(f, "unterminated character constant"),
            LexErrorKind::UnterminatedComment => write!(f, "unterminated comment"),
            LexErrorKind::EmptyChar => write!(f, "empty character constant"),
            LexErrorKind::MultiCharacterChar => {
                write!(f, "character constant holds more than one character")
            }
            LexErrorKind::InvalidEscape(ch) => {
                write!(f, "unknown escape sequence '\\{}'", ch.escape_default())
            }
            LexErrorKind::InvalidNumber(text) => write!(f, "invalid numeric literal {}", text),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub location: SourceLocation,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Lexical error at line {}, column {}: {}",
            self.location.line, self.location.column, self.kind
        )
    }
}

impl std::error::Error for LexError {}

/// Start a single-pass scan of `text`.
///
/// Tokens are produced on demand; errors found so far are available from
/// [`Lexer::errors`].
pub fn tokenize(text: &str) -> Lexer {
    Lexer::new(text)
}

/// Lexer for MiniC source code
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
    errors: Vec<LexError>,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
            errors: Vec::new(),
        }
    }

    /// Lexical errors recorded so far
    pub fn errors(&self) -> &[LexError] {
        &self.errors
    }

    /// Consume the lexer, returning its recorded errors
    pub fn finish(self) -> Vec<LexError> {
        self.errors
    }

    /// Drain the whole input
    pub fn tokenize_all(mut self) -> (Vec<Token>, Vec<LexError>) {
        let tokens: Vec<Token> = self.by_ref().collect();
        (tokens, self.errors)
    }

    /// Scan one token. Returns `None` when the character was illegal and skipped.
    fn next_token(&mut self) -> Option<Token> {
        let loc = self.current_location();
        let ch = self.advance()?;

        let kind = match ch {
            '"' => TokenKind::StringLiteral(self.string_literal(loc)),
            '\'' => TokenKind::CharLiteral(self.char_literal(loc)),
            '0'..='9' => self.number_literal(ch, loc),
            'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch),

            '+' => self.with_eq(TokenKind::PlusEq, TokenKind::Plus),
            '-' => self.with_eq(TokenKind::MinusEq, TokenKind::Minus),
            '*' => self.with_eq(TokenKind::StarEq, TokenKind::Star),
            '/' => self.with_eq(TokenKind::SlashEq, TokenKind::Slash),
            '%' => self.with_eq(TokenKind::PercentEq, TokenKind::Percent),
            '=' => self.with_eq(TokenKind::EqEq, TokenKind::Eq),
            '!' => self.with_eq(TokenKind::NotEq, TokenKind::Bang),
            '<' => self.with_eq(TokenKind::Le, TokenKind::Lt),
            '>' => self.with_eq(TokenKind::Ge, TokenKind::Gt),
            '&' => {
                if self.peek() == Some('&') {
                    self.advance();
                    TokenKind::AndAnd
                } else {
                    TokenKind::Amp
                }
            }
            '|' if self.peek() == Some('|') => {
                self.advance();
                TokenKind::OrOr
            }
            '.' => {
                if self.peek() == Some('.') && self.peek_ahead(1) == Some('.') {
                    self.advance();
                    self.advance();
                    TokenKind::Ellipsis
                } else if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.number_literal(ch, loc)
                } else {
                    TokenKind::Dot
                }
            }
            '(' => TokenKind::LParen,
            ')' => TokenKind::RParen,
            '{' => TokenKind::LBrace,
            '}' => TokenKind::RBrace,
            '[' => TokenKind::LBracket,
            ']' => TokenKind::RBracket,
            ';' => TokenKind::Semicolon,
            ',' => TokenKind::Comma,
            ':' => TokenKind::Colon,

            _ => {
                self.error(LexErrorKind::IllegalCharacter(ch), loc);
                return None;
            }
        };

        Some(Token::new(kind, loc))
    }

    /// `<op>=` if the next character is `=`, else `<op>`
    fn with_eq(&mut self, compound: TokenKind, single: TokenKind) -> TokenKind {
        if self.peek() == Some('=') {
            self.advance();
            compound
        } else {
            single
        }
    }

    /// Parse string literal; the opening quote is already consumed
    fn string_literal(&mut self, loc: SourceLocation) -> String {
        let mut string = String::new();

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.error(LexErrorKind::UnterminatedString, loc);
                    break;
                }
                Some('"') => {
                    self.advance();
                    break;
                }
                Some('\\') => {
                    self.advance();
                    if let Some(ch) = self.escape_sequence() {
                        string.push(ch);
                    }
                }
                Some(ch) => {
                    self.advance();
                    string.push(ch);
                }
            }
        }

        string
    }

    /// Parse character literal; the opening quote is already consumed
    fn char_literal(&mut self, loc: SourceLocation) -> char {
        let value = match self.peek() {
            None | Some('\n') => {
                self.error(LexErrorKind::UnterminatedChar, loc);
                return '\0';
            }
            Some('\'') => {
                self.advance();
                self.error(LexErrorKind::EmptyChar, loc);
                return '\0';
            }
            Some('\\') => {
                self.advance();
                match self.escape_sequence() {
                    Some(ch) => ch,
                    None => {
                        self.error(LexErrorKind::UnterminatedChar, loc);
                        return '\0';
                    }
                }
            }
            Some(ch) => {
                self.advance();
                ch
            }
        };

        if self.peek() == Some('\'') {
            self.advance();
            return value;
        }

        // 'ab' on one line: swallow up to the closing quote
        let rest = self.input[self.position..]
            .iter()
            .take_while(|&&c| c != '\n')
            .position(|&c| c == '\'');
        match rest {
            Some(offset) => {
                for _ in 0..=offset {
                    self.advance();
                }
                self.error(LexErrorKind::MultiCharacterChar, loc);
            }
            None => self.error(LexErrorKind::UnterminatedChar, loc),
        }
        value
    }

    /// Decode the character after a backslash. `None` only at end of input.
    fn escape_sequence(&mut self) -> Option<char> {
        let loc = self.current_location();
        let escaped = match self.peek() {
            None | Some('\n') => return None,
            Some(ch) => ch,
        };
        self.advance();

        let value = match escaped {
            'n' => '\n',
            't' => '\t',
            'r' => '\r',
            '0' => '\0',
            '\\' => '\\',
            '\'' => '\'',
            '"' => '"',
            'x' => {
                let mut digits = String::new();
                while digits.len() < 2 {
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            digits.push(c);
                            self.advance();
                        }
                        _ => break,
                    }
                }
                match u8::from_str_radix(&digits, 16) {
                    Ok(byte) => char::from(byte),
                    Err(_) => {
                        self.error(LexErrorKind::InvalidEscape('x'), loc);
                        'x'
                    }
                }
            }
            other => {
                self.error(LexErrorKind::InvalidEscape(other), loc);
                other
            }
        };

        Some(value)
    }

    /// Parse numeric literal: `123`, `1.5`, `.5`, `3.`
    fn number_literal(&mut self, first: char, loc: SourceLocation) -> TokenKind {
        let mut text = String::new();
        text.push(first);
        let mut is_float = first == '.';

        self.take_digits(&mut text);
        if !is_float && self.peek() == Some('.') && self.peek_ahead(1) != Some('.') {
            is_float = true;
            text.push('.');
            self.advance();
            self.take_digits(&mut text);
        }

        if is_float {
            match text.parse::<f64>() {
                Ok(value) => TokenKind::FloatLiteral(value),
                Err(_) => {
                    self.error(LexErrorKind::InvalidNumber(text), loc);
                    TokenKind::FloatLiteral(0.0)
                }
            }
        } else {
            match text.parse::<i64>() {
                Ok(value) => TokenKind::IntLiteral(value),
                Err(_) => {
                    self.error(LexErrorKind::InvalidNumber(text), loc);
                    TokenKind::IntLiteral(0)
                }
            }
        }
    }

    fn take_digits(&mut self, text: &mut String) {
        while let Some(ch) = self.peek() {
            if !ch.is_ascii_digit() {
                break;
            }
            text.push(ch);
            self.advance();
        }
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&mut self, first_char: char) -> TokenKind {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        match ident.as_str() {
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "char" => TokenKind::Char,
            "void" => TokenKind::Void,
            "const" => TokenKind::Const,
            "static" => TokenKind::Static,
            "extern" => TokenKind::Extern,
            "if" => TokenKind::If,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "for" => TokenKind::For,
            "return" => TokenKind::Return,
            "break" => TokenKind::Break,
            "continue" => TokenKind::Continue,
            _ => TokenKind::Ident(ident),
        }
    }

    /// Skip whitespace and comments
    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') if self.peek_ahead(1) == Some('/') => self.skip_line_comment(),
                Some('/') if self.peek_ahead(1) == Some('*') => self.skip_block_comment(),
                _ => break,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            if ch == '\n' {
                break;
            }
            self.advance();
        }
    }

    /// Skip multi-line comment (/* ... */), not nesting
    fn skip_block_comment(&mut self) {
        let start_loc = self.current_location();
        self.advance(); // skip '/'
        self.advance(); // skip '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }

        self.error(LexErrorKind::UnterminatedComment, start_loc);
    }

    fn error(&mut self, kind: LexErrorKind, location: SourceLocation) {
        let err = LexError { kind, location };
        debug!("{}", err);
        self.errors.push(err);
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character
    fn advance(&mut self) -> Option<char> {
        let ch = *self.input.get(self.position)?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        loop {
            self.skip_whitespace_and_comments();
            if self.is_at_end() {
                return None;
            }
            if let Some(token) = self.next_token() {
                return Some(token);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).map(|t| t.kind).collect()
    }

    #[test]
    fn test_simple_tokens() {
        let tokens = kinds("int main() { return 0; }");

        assert_eq!(
            tokens,
            vec![
                TokenKind::Int,
                TokenKind::Ident("main".to_string()),
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::Return,
                TokenKind::IntLiteral(0),
                TokenKind::Semicolon,
                TokenKind::RBrace,
            ]
        );
    }

    #[test]
    fn test_operators() {
        let tokens = kinds("+= -= *= /= %= == != <= >= && || ! & ...");

        assert_eq!(
            tokens,
            vec![
                TokenKind::PlusEq,
                TokenKind::MinusEq,
                TokenKind::StarEq,
                TokenKind::SlashEq,
                TokenKind::PercentEq,
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::Amp,
                TokenKind::Ellipsis,
            ]
        );
    }

    #[test]
    fn test_keywords() {
        let tokens = kinds("static extern const float char void while for break continue");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Static,
                TokenKind::Extern,
                TokenKind::Const,
                TokenKind::Float,
                TokenKind::Char,
                TokenKind::Void,
                TokenKind::While,
                TokenKind::For,
                TokenKind::Break,
                TokenKind::Continue,
            ]
        );
    }

    #[test]
    fn test_comments_advance_lines() {
        let tokens: Vec<Token> =
            tokenize("int x; // comment\nint y; /* block\ncomment */ int z;").collect();

        assert_eq!(tokens.len(), 9);
        assert_eq!(tokens[1].kind, TokenKind::Ident("x".to_string()));
        assert_eq!(tokens[1].line(), 1);
        assert_eq!(tokens[4].kind, TokenKind::Ident("y".to_string()));
        assert_eq!(tokens[4].line(), 2);
        assert_eq!(tokens[7].kind, TokenKind::Ident("z".to_string()));
        assert_eq!(tokens[7].line(), 3);
        assert_eq!(tokens[7].location.column, 16);
    }

    #[test]
    fn test_float_literals() {
        let tokens = kinds("1.5 .25 3. 42");
        assert_eq!(
            tokens,
            vec![
                TokenKind::FloatLiteral(1.5),
                TokenKind::FloatLiteral(0.25),
                TokenKind::FloatLiteral(3.0),
                TokenKind::IntLiteral(42),
            ]
        );
    }

    #[test]
    fn test_string_literal() {
        let tokens = kinds(r#""hello\nworld\t\"q\"""#);
        assert_eq!(
            tokens,
            vec![TokenKind::StringLiteral("hello\nworld\t\"q\"".to_string())]
        );
    }

    #[test]
    fn test_char_literals() {
        let tokens = kinds(r"'a' '\n' '\'' '\x41'");
        assert_eq!(
            tokens,
            vec![
                TokenKind::CharLiteral('a'),
                TokenKind::CharLiteral('\n'),
                TokenKind::CharLiteral('\''),
                TokenKind::CharLiteral('A'),
            ]
        );
    }

    #[test]
    fn test_illegal_character_is_skipped() {
        let (tokens, errors) = tokenize("int @x;\n$").tokenize_all();

        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[1].kind, TokenKind::Ident("x".to_string()));
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].kind, LexErrorKind::IllegalCharacter('@'));
        assert_eq!(errors[0].location, SourceLocation::new(1, 5));
        assert_eq!(errors[1].kind, LexErrorKind::IllegalCharacter('$'));
        assert_eq!(errors[1].location.line, 2);
    }

    #[test]
    fn test_unterminated_constructs() {
        let (_, errors) = tokenize("\"abc").tokenize_all();
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedString);

        let (_, errors) = tokenize("'a").tokenize_all();
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedChar);

        let (tokens, errors) = tokenize("int x; /* never closed\n\n").tokenize_all();
        assert_eq!(tokens.len(), 3);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind, LexErrorKind::UnterminatedComment);
        assert_eq!(errors[0].location, SourceLocation::new(1, 8));
    }

    #[test]
    fn test_multi_character_constant() {
        let (tokens, errors) = tokenize("'ab' x").tokenize_all();
        assert_eq!(tokens.len(), 2);
        assert_eq!(tokens[0].kind, TokenKind::CharLiteral('a'));
        assert_eq!(errors[0].kind, LexErrorKind::MultiCharacterChar);
    }

    #[test]
    fn test_scan_is_lazy() {
        let mut lexer = tokenize("int @");
        assert_eq!(lexer.next().map(|t| t.kind), Some(TokenKind::Int));
        assert!(lexer.errors().is_empty());
        assert_eq!(lexer.next(), None);
        assert_eq!(lexer.errors().len(), 1);
    }
}
