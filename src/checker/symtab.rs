//! Scope-chained symbol table
//!
//! Scopes live in an arena ([`ScopeTree`]) and refer to each other by
//! [`ScopeId`]. A scope owns its entries and lists its children; the parent
//! link is just an index, so the whole tree can be kept after checking and
//! inspected by tooling.
//!
//! Lookups walk from a scope outward through its parents and never see
//! sibling scopes.

use crate::checker::types::Ty;
use crate::parser::ast::{FunctionDef, Parameter, SourceLocation, Type, VariableDef};
use index_vec::IndexVec;
use rustc_hash::FxHashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ScopeId(usize);
impl index_vec::Idx for ScopeId {
    fn from_usize(idx: usize) -> Self {
        Self(idx)
    }
    fn index(self) -> usize {
        self.0
    }
}

/// The declaration a name is bound to
#[derive(Debug, Clone, Copy)]
pub enum Symbol<'ast> {
    Function(&'ast FunctionDef),
    Variable(&'ast VariableDef),
    Parameter(&'ast Parameter),
}

impl<'ast> Symbol<'ast> {
    pub fn name(&self) -> &'ast str {
        match self {
            Symbol::Function(func) => &func.name,
            Symbol::Variable(var) => &var.name,
            Symbol::Parameter(param) => &param.name,
        }
    }

    pub fn location(&self) -> SourceLocation {
        match self {
            Symbol::Function(func) => func.location,
            Symbol::Variable(var) => var.location,
            Symbol::Parameter(param) => param.location,
        }
    }

    /// Declared type; the return type for functions
    pub fn declared_type(&self) -> &'ast Type {
        match self {
            Symbol::Function(func) => &func.return_type,
            Symbol::Variable(var) => &var.var_type,
            Symbol::Parameter(param) => &param.param_type,
        }
    }

    /// Type of the name when used in an expression
    pub fn value_type(&self) -> Ty {
        match self {
            Symbol::Function(_) => Ty::Function,
            Symbol::Variable(_) | Symbol::Parameter(_) => Ty::from_type(self.declared_type()),
        }
    }

    /// Prototypes and `extern` variables may be completed by a later definition.
    /// An `extern` variable with an initialiser is itself a definition.
    pub fn is_forward(&self) -> bool {
        match self {
            Symbol::Function(func) => !func.is_definition(),
            Symbol::Variable(var) => var.is_extern && var.init.is_none(),
            Symbol::Parameter(_) => false,
        }
    }

    /// Two declarations of one name agree on its type. Parameters compare
    /// after array decay.
    fn signature_matches(&self, other: &Symbol<'_>) -> bool {
        match (self, other) {
            (Symbol::Function(a), Symbol::Function(b)) => {
                a.return_type == b.return_type
                    && a.params.ellipsis == b.params.ellipsis
                    && a.params.len() == b.params.len()
                    && a.params.params.iter().zip(&b.params.params).all(|(x, y)| {
                        Ty::from_type(&x.param_type) == Ty::from_type(&y.param_type)
                    })
            }
            (Symbol::Variable(a), Symbol::Variable(b)) => a.var_type == b.var_type,
            _ => false,
        }
    }
}

#[derive(Debug, Default)]
pub struct Scope<'ast> {
    entries: FxHashMap<&'ast str, Symbol<'ast>>,
    parent: Option<ScopeId>,
    children: Vec<ScopeId>,
}

impl<'ast> Scope<'ast> {
    pub fn parent(&self) -> Option<ScopeId> {
        self.parent
    }

    pub fn children(&self) -> &[ScopeId] {
        &self.children
    }

    /// Binding declared directly in this scope
    pub fn get_local(&self, name: &str) -> Option<Symbol<'ast>> {
        self.entries.get(name).copied()
    }

    pub fn symbols(&self) -> impl Iterator<Item = Symbol<'ast>> + '_ {
        self.entries.values().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Arena of scopes; index 0 is the root (file) scope
#[derive(Debug)]
pub struct ScopeTree<'ast> {
    scopes: IndexVec<ScopeId, Scope<'ast>>,
}

impl<'ast> ScopeTree<'ast> {
    pub fn new() -> Self {
        let mut scopes = IndexVec::new();
        scopes.push(Scope::default());
        Self { scopes }
    }

    pub fn root(&self) -> ScopeId {
        ScopeId(0)
    }

    /// Open a new scope nested in `parent`
    pub fn push_child(&mut self, parent: ScopeId) -> ScopeId {
        let child = self.scopes.push(Scope {
            parent: Some(parent),
            ..Scope::default()
        });
        self.scopes[parent].children.push(child);
        child
    }

    pub fn scope(&self, id: ScopeId) -> &Scope<'ast> {
        &self.scopes[id]
    }

    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Bind `symbol` in `scope`.
    ///
    /// Fails with the existing binding if the name is already declared in
    /// this same scope. A forward declaration followed by a declaration with
    /// the same signature is not a conflict, and a definition replaces the
    /// forward entry. A mismatched signature is a conflict.
    pub fn add(&mut self, scope: ScopeId, symbol: Symbol<'ast>) -> Result<(), Symbol<'ast>> {
        let entries = &mut self.scopes[scope].entries;

        match entries.get(symbol.name()).copied() {
            None => {
                entries.insert(symbol.name(), symbol);
                Ok(())
            }
            Some(previous) if previous.signature_matches(&symbol) => {
                match (previous.is_forward(), symbol.is_forward()) {
                    (true, false) => {
                        entries.insert(symbol.name(), symbol);
                        Ok(())
                    }
                    (_, true) => Ok(()),
                    (false, false) => Err(previous),
                }
            }
            Some(previous) => Err(previous),
        }
    }

    /// Nearest binding of `name`, walking from `scope` to the root
    pub fn get(&self, scope: ScopeId, name: &str) -> Option<Symbol<'ast>> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let scope = &self.scopes[id];
            if let Some(symbol) = scope.get_local(name) {
                return Some(symbol);
            }
            current = scope.parent;
        }
        None
    }
}

impl Default for ScopeTree<'_> {
    fn default() -> Self {
        Self::new()
    }
}
