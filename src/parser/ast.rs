// AST (Abstract Syntax Tree) definitions for MiniC

use std::fmt;

/// Unique identifier for expression nodes, used as the key for checker annotations
pub type NodeId = usize;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Base types of the language
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    Int,
    Float,
    Char,
    Void,
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseType::Int => write!(f, "int"),
            BaseType::Float => write!(f, "float"),
            BaseType::Char => write!(f, "char"),
            BaseType::Void => write!(f, "void"),
        }
    }
}

/// Declared type: a base type plus the pointer and array parts of its declarator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Type {
    pub base: BaseType,
    pub is_const: bool,
    pub pointer_depth: usize, // 0 = not pointer, 1 = *, 2 = **, etc.
    pub array_dims: Vec<usize>,
}

impl Type {
    pub fn new(base: BaseType) -> Self {
        Type {
            base,
            is_const: false,
            pointer_depth: 0,
            array_dims: Vec::new(),
        }
    }

    pub fn with_const(mut self) -> Self {
        self.is_const = true;
        self
    }

    pub fn with_pointer(mut self) -> Self {
        self.pointer_depth += 1;
        self
    }

    pub fn with_array(mut self, size: usize) -> Self {
        self.array_dims.push(size);
        self
    }

    /// True for plain `void` (not `void *`).
    pub fn is_void(&self) -> bool {
        self.base == BaseType::Void && self.pointer_depth == 0 && self.array_dims.is_empty()
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        write!(f, "{}", self.base)?;
        for _ in 0..self.pointer_depth {
            write!(f, "*")?;
        }
        for dim in &self.array_dims {
            write!(f, "[{}]", dim)?;
        }
        Ok(())
    }
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    // Arithmetic
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    // Comparison
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    // Logical
    And,
    Or,
}

impl BinOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
            BinOp::Lt => "<",
            BinOp::Le => "<=",
            BinOp::Gt => ">",
            BinOp::Ge => ">=",
            BinOp::And => "&&",
            BinOp::Or => "||",
        }
    }
}

/// Unary prefix operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,    // -x
    Plus,   // +x
    Not,    // !x
    Deref,  // *x
    AddrOf, // &x
}

impl UnOp {
    pub fn symbol(self) -> &'static str {
        match self {
            UnOp::Neg => "-",
            UnOp::Plus => "+",
            UnOp::Not => "!",
            UnOp::Deref => "*",
            UnOp::AddrOf => "&",
        }
    }
}

/// Assignment operators (`=` and the compound forms)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignOp {
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Mod => "%=",
        }
    }

    /// The arithmetic operator a compound assignment applies before storing.
    pub fn binary_op(self) -> Option<BinOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinOp::Add),
            AssignOp::Sub => Some(BinOp::Sub),
            AssignOp::Mul => Some(BinOp::Mul),
            AssignOp::Div => Some(BinOp::Div),
            AssignOp::Mod => Some(BinOp::Mod),
        }
    }
}

/// Function parameter
#[derive(Debug, Clone)]
pub struct Parameter {
    pub param_type: Type,
    pub name: String,
    pub location: SourceLocation,
}

/// Parameter list of a function declarator
#[derive(Debug, Clone, Default)]
pub struct ParamList {
    pub params: Vec<Parameter>,
    /// Trailing `...`
    pub ellipsis: bool,
}

impl ParamList {
    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

/// Function definition, or a prototype when `body` is `None`
#[derive(Debug, Clone)]
pub struct FunctionDef {
    pub return_type: Type,
    pub name: String,
    pub params: ParamList,
    pub body: Option<CompoundStmt>,
    pub is_static: bool,
    pub is_extern: bool,
    pub location: SourceLocation,
}

impl FunctionDef {
    pub fn is_definition(&self) -> bool {
        self.body.is_some()
    }
}

/// Variable definition with optional initializer
#[derive(Debug, Clone)]
pub struct VariableDef {
    pub var_type: Type,
    pub name: String,
    pub init: Option<Expr>,
    pub is_static: bool,
    pub is_extern: bool,
    pub location: SourceLocation,
}

/// A declaration at file or block scope
#[derive(Debug, Clone)]
pub enum Decl {
    Function(FunctionDef),
    Variable(VariableDef),
}

impl Decl {
    pub fn name(&self) -> &str {
        match self {
            Decl::Function(func) => &func.name,
            Decl::Variable(var) => &var.name,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Decl::Function(func) => func.location,
            Decl::Variable(var) => var.location,
        }
    }
}

/// `{ decl* stmt* }`
#[derive(Debug, Clone)]
pub struct CompoundStmt {
    pub decls: Vec<Decl>,
    pub stmts: Vec<Stmt>,
    pub location: SourceLocation,
}

/// Statements
#[derive(Debug, Clone)]
pub enum Stmt {
    Compound(CompoundStmt),
    If {
        condition: Expr,
        then_branch: CompoundStmt,
        else_branch: Option<CompoundStmt>,
        location: SourceLocation,
    },
    While {
        condition: Expr,
        body: CompoundStmt,
        location: SourceLocation,
    },
    For {
        init: Option<Expr>,
        condition: Option<Expr>,
        step: Option<Expr>,
        body: CompoundStmt,
        location: SourceLocation,
    },
    Break {
        location: SourceLocation,
    },
    Continue {
        location: SourceLocation,
    },
    Return {
        expr: Option<Expr>,
        location: SourceLocation,
    },
    ExprStmt {
        expr: Expr,
        location: SourceLocation,
    },
}

impl Stmt {
    /// Get the source location of this statement
    pub fn location(&self) -> SourceLocation {
        match self {
            Stmt::Compound(block) => block.location,
            Stmt::If { location, .. }
            | Stmt::While { location, .. }
            | Stmt::For { location, .. }
            | Stmt::Break { location }
            | Stmt::Continue { location }
            | Stmt::Return { location, .. }
            | Stmt::ExprStmt { location, .. } => *location,
        }
    }
}

/// Expression node. `id` is unique within one parse.
#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub kind: ExprKind,
    pub location: SourceLocation,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    // Literals
    Integer(i64),
    Float(f64),
    Char(char),
    String(String),

    Ident(String),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Unary {
        op: UnOp,
        operand: Box<Expr>,
    },
    Assign {
        op: AssignOp,
        target: Box<Expr>,
        value: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Index {
        base: Box<Expr>,
        index: Box<Expr>,
    },
}

impl fmt::Display for Expr {
    /// Fully parenthesised prefix form, e.g. `(- (+ 1 (* 2 3)) 4)`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Integer(n) => write!(f, "{}", n),
            ExprKind::Float(x) => write!(f, "{:?}", x),
            ExprKind::Char(c) => write!(f, "'{}'", c.escape_default()),
            ExprKind::String(s) => write!(f, "\"{}\"", s.escape_default()),
            ExprKind::Ident(name) => write!(f, "{}", name),
            ExprKind::Binary { op, left, right } => {
                write!(f, "({} {} {})", op.symbol(), left, right)
            }
            ExprKind::Unary { op, operand } => write!(f, "({} {})", op.symbol(), operand),
            ExprKind::Assign { op, target, value } => {
                write!(f, "({} {} {})", op.symbol(), target, value)
            }
            ExprKind::Call { callee, args } => {
                write!(f, "(call {}", callee)?;
                for arg in args {
                    write!(f, " {}", arg)?;
                }
                write!(f, ")")
            }
            ExprKind::Index { base, index } => write!(f, "(index {} {})", base, index),
        }
    }
}

/// Top-level program structure
#[derive(Debug, Clone, Default)]
pub struct TranslationUnit {
    pub decls: Vec<Decl>, // All top-level declarations
}

impl TranslationUnit {
    pub fn new() -> Self {
        TranslationUnit::default()
    }

    /// Iterate over the top-level functions (definitions and prototypes)
    pub fn functions(&self) -> impl Iterator<Item = &FunctionDef> {
        self.decls.iter().filter_map(|decl| match decl {
            Decl::Function(func) => Some(func),
            Decl::Variable(_) => None,
        })
    }

    /// Find the first top-level function with the given name
    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions().find(|func| func.name == name)
    }
}
