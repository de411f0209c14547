//! Checker type lattice
//!
//! [`Ty`] is the type the checker infers for an expression. It is coarser than
//! the declared [`Type`]: `const` is dropped and arrays decay to pointers.

use crate::parser::ast::{BaseType, BinOp, Type};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ty {
    Int,
    Float,
    Char,
    Void,
    /// Type of a string literal
    String,
    Pointer(Box<Ty>),
    /// A function name used as a value
    Function,
    /// Result of an ill-typed expression; compatible with everything so one
    /// mistake yields one diagnostic
    Error,
}

impl Ty {
    /// Type of a value declared with `ty`
    pub fn from_type(ty: &Type) -> Ty {
        let mut result = match ty.base {
            BaseType::Int => Ty::Int,
            BaseType::Float => Ty::Float,
            BaseType::Char => Ty::Char,
            BaseType::Void => Ty::Void,
        };
        for _ in 0..ty.pointer_depth + ty.array_dims.len() {
            result = Ty::pointer_to(result);
        }
        result
    }

    pub fn pointer_to(inner: Ty) -> Ty {
        Ty::Pointer(Box::new(inner))
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Ty::Error)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Ty::Int | Ty::Float | Ty::Char)
    }

    pub fn is_integral(&self) -> bool {
        matches!(self, Ty::Int | Ty::Char)
    }

    pub fn is_pointer(&self) -> bool {
        matches!(self, Ty::Pointer(_))
    }

    /// Usable as a condition (nonzero is true)
    pub fn is_truthy_coercible(&self) -> bool {
        self.is_numeric() || matches!(self, Ty::Pointer(_) | Ty::String | Ty::Error)
    }

    /// A string literal or a `char *`; both concatenate with `+`
    pub fn is_string_like(&self) -> bool {
        match self {
            Ty::String => true,
            Ty::Pointer(inner) => **inner == Ty::Char,
            _ => false,
        }
    }

    fn is_void_pointer(&self) -> bool {
        matches!(self, Ty::Pointer(inner) if **inner == Ty::Void)
    }

    /// Element type reached by `*` or `[]`
    pub fn pointee(&self) -> Option<Ty> {
        match self {
            Ty::Pointer(inner) => Some((**inner).clone()),
            Ty::String => Some(Ty::Char),
            _ => None,
        }
    }
}

/// Usual arithmetic promotion: any float makes the result float
fn promote(left: &Ty, right: &Ty) -> Ty {
    if *left == Ty::Float || *right == Ty::Float {
        Ty::Float
    } else {
        Ty::Int
    }
}

/// Whether pointer operands may be compared for equality
fn pointers_compatible(left: &Ty, right: &Ty) -> bool {
    let pointer_like = |ty: &Ty| ty.is_pointer() || *ty == Ty::String;
    pointer_like(left)
        && pointer_like(right)
        && (assignable(left, right) || assignable(right, left))
}

/// Whether a value of type `from` may be stored where `to` is expected
pub fn assignable(from: &Ty, to: &Ty) -> bool {
    if from.is_error() || to.is_error() || from == to {
        return true;
    }
    if from.is_numeric() && to.is_numeric() {
        return true;
    }
    match (from, to) {
        (Ty::String, Ty::Pointer(inner)) => matches!(**inner, Ty::Char | Ty::Void),
        (Ty::Pointer(_), Ty::Pointer(_)) => from.is_void_pointer() || to.is_void_pointer(),
        _ => false,
    }
}

/// Result type of `left op right`, or `None` if the operands are invalid
pub fn binary_result(op: BinOp, left: &Ty, right: &Ty) -> Option<Ty> {
    if left.is_error() || right.is_error() {
        return Some(Ty::Error);
    }

    match op {
        BinOp::Add if left.is_string_like() && right.is_string_like() => Some(Ty::String),
        BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod => {
            (left.is_numeric() && right.is_numeric()).then(|| promote(left, right))
        }
        BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => {
            let comparable = (left.is_numeric() && right.is_numeric())
                || (left == right && *left != Ty::Void && *left != Ty::Function);
            comparable.then_some(Ty::Int)
        }
        BinOp::Eq | BinOp::Ne => {
            let comparable = (left.is_numeric() && right.is_numeric())
                || (left == right && *left != Ty::Void && *left != Ty::Function)
                || pointers_compatible(left, right);
            comparable.then_some(Ty::Int)
        }
        BinOp::And | BinOp::Or => {
            (left.is_truthy_coercible() && right.is_truthy_coercible()).then_some(Ty::Int)
        }
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Int => write!(f, "int"),
            Ty::Float => write!(f, "float"),
            Ty::Char => write!(f, "char"),
            Ty::Void => write!(f, "void"),
            Ty::String => write!(f, "string"),
            Ty::Pointer(inner) => write!(f, "{}*", inner),
            Ty::Function => write!(f, "function"),
            Ty::Error => write!(f, "<error>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrays_decay_to_pointers() {
        let ty = Type::new(BaseType::Int).with_pointer().with_array(4);
        assert_eq!(Ty::from_type(&ty), Ty::pointer_to(Ty::pointer_to(Ty::Int)));
        assert_eq!(Ty::from_type(&ty).to_string(), "int**");

        let constant = Type::new(BaseType::Char).with_const();
        assert_eq!(Ty::from_type(&constant), Ty::Char);
    }

    #[test]
    fn test_arithmetic_promotion() {
        assert_eq!(binary_result(BinOp::Add, &Ty::Int, &Ty::Char), Some(Ty::Int));
        assert_eq!(binary_result(BinOp::Mul, &Ty::Int, &Ty::Float), Some(Ty::Float));
        assert_eq!(binary_result(BinOp::Add, &Ty::String, &Ty::String), Some(Ty::String));
        assert_eq!(binary_result(BinOp::Sub, &Ty::String, &Ty::String), None);
        assert_eq!(binary_result(BinOp::Add, &Ty::Int, &Ty::pointer_to(Ty::Int)), None);
    }

    #[test]
    fn test_char_pointers_concatenate() {
        let char_ptr = Ty::pointer_to(Ty::Char);

        assert_eq!(binary_result(BinOp::Add, &char_ptr, &Ty::String), Some(Ty::String));
        assert_eq!(binary_result(BinOp::Add, &Ty::String, &char_ptr), Some(Ty::String));
        assert_eq!(binary_result(BinOp::Add, &char_ptr, &char_ptr), Some(Ty::String));
        assert_eq!(binary_result(BinOp::Add, &char_ptr, &Ty::Int), None);
        assert_eq!(binary_result(BinOp::Sub, &char_ptr, &Ty::String), None);
        assert!(assignable(&Ty::String, &char_ptr));
    }

    #[test]
    fn test_comparisons() {
        let int_ptr = Ty::pointer_to(Ty::Int);
        let void_ptr = Ty::pointer_to(Ty::Void);
        let char_ptr = Ty::pointer_to(Ty::Char);

        assert_eq!(binary_result(BinOp::Lt, &Ty::Char, &Ty::Float), Some(Ty::Int));
        assert_eq!(binary_result(BinOp::Eq, &int_ptr, &void_ptr), Some(Ty::Int));
        assert_eq!(binary_result(BinOp::Ne, &int_ptr, &char_ptr), None);
        assert_eq!(binary_result(BinOp::Lt, &Ty::Int, &int_ptr), None);
        assert_eq!(binary_result(BinOp::And, &int_ptr, &Ty::Float), Some(Ty::Int));
        assert_eq!(binary_result(BinOp::Or, &Ty::Void, &Ty::Int), None);
    }

    #[test]
    fn test_error_type_is_silent() {
        assert_eq!(binary_result(BinOp::Add, &Ty::Error, &Ty::Void), Some(Ty::Error));
        assert!(assignable(&Ty::Error, &Ty::pointer_to(Ty::Int)));
        assert!(assignable(&Ty::Void, &Ty::Error));
    }

    #[test]
    fn test_assignability() {
        let char_ptr = Ty::pointer_to(Ty::Char);
        let void_ptr = Ty::pointer_to(Ty::Void);
        let int_ptr = Ty::pointer_to(Ty::Int);

        assert!(assignable(&Ty::Float, &Ty::Int));
        assert!(assignable(&Ty::String, &char_ptr));
        assert!(assignable(&void_ptr, &int_ptr));
        assert!(assignable(&int_ptr, &void_ptr));
        assert!(!assignable(&int_ptr, &char_ptr));
        assert!(!assignable(&Ty::String, &Ty::Int));
        assert!(!assignable(&Ty::Int, &int_ptr));
    }
}
