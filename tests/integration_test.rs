// Integration tests for the MiniC front end

use minic::checker::{DiagnosticKind, SemanticError};
use minic::parser::ast::{BinOp, ExprKind, Stmt};
use minic::parser::LexErrorKind;
use minic::{check, compile, parse, tokenize, FrontendError};

fn diagnostics(source: &str) -> Vec<DiagnosticKind> {
    let compilation = compile(source).expect("Parsing failed");
    assert!(compilation.lex_errors.is_empty(), "{:?}", compilation.lex_errors);
    let report = compilation.check();
    report.diagnostics.iter().map(SemanticError::kind).collect()
}

fn count(source: &str, kind: DiagnosticKind) -> usize {
    diagnostics(source).into_iter().filter(|k| *k == kind).count()
}

#[test]
fn test_declared_before_use_is_resolved() {
    let source = r#"
        int limit = 10;

        int clamp(int value) {
            int result;
            result = value;
            if (value > limit) {
                int excess;
                excess = value - limit;
                result = result - excess;
            }
            return result;
        }

        int main() {
            return clamp(limit);
        }
    "#;

    assert_eq!(count(source, DiagnosticKind::UndefinedSymbol), 0);
}

#[test]
fn test_use_outside_declaring_block_is_undefined() {
    let source = r#"
        int main() {
            { int inner; inner = 1; }
            { inner = 2; }
            return 0;
        }
    "#;

    assert_eq!(diagnostics(source), vec![DiagnosticKind::UndefinedSymbol]);
}

#[test]
fn test_duplicate_in_one_scope_but_not_when_shadowing() {
    let duplicate = "int main() { int x; int x; return 0; }";
    assert_eq!(count(duplicate, DiagnosticKind::DuplicateSymbol), 1);

    let shadowed = "int x; int main() { int x; { int x; } return 0; }";
    assert_eq!(count(shadowed, DiagnosticKind::DuplicateSymbol), 0);
}

#[test]
fn test_break_outside_and_inside_loops() {
    let outside = "int main() { break; return 0; }";
    assert_eq!(count(outside, DiagnosticKind::InvalidBreakContinue), 1);

    let nested = r#"
        int main() {
            int i;
            for (i = 0; i < 3; i += 1) {
                while (i) {
                    break;
                }
                continue;
            }
            return 0;
        }
    "#;
    assert_eq!(count(nested, DiagnosticKind::InvalidBreakContinue), 0);
}

#[test]
fn test_additive_and_multiplicative_structure() {
    let unit = parse(tokenize("int main() { 1 + 2 * 3 - 4; }")).expect("Parsing failed");
    let body = unit.function("main").unwrap().body.as_ref().unwrap();

    let Stmt::ExprStmt { expr, .. } = &body.stmts[0] else {
        panic!("Expected expression statement");
    };
    let ExprKind::Binary { op, left, right } = &expr.kind else {
        panic!("Expected binary expression");
    };
    assert_eq!(*op, BinOp::Sub);
    assert!(matches!(right.kind, ExprKind::Integer(4)));

    let ExprKind::Binary { op, right, .. } = &left.kind else {
        panic!("Expected binary expression");
    };
    assert_eq!(*op, BinOp::Add);
    assert!(matches!(right.kind, ExprKind::Binary { op: BinOp::Mul, .. }));

    assert_eq!(expr.to_string(), "(- (+ 1 (* 2 3)) 4)");
}

#[test]
fn test_minimal_main_is_ok() {
    let compilation = compile("int main() { return 0; }").expect("Parsing failed");
    let report = compilation.check();

    assert!(report.ok);
    assert!(report.diagnostics.is_empty());
}

#[test]
fn test_missing_main_is_fatal() {
    let source = r#"
        int helper(int a) {
            return a * 2;
        }
    "#;
    let compilation = compile(source).expect("Parsing failed");
    let report = compilation.check();

    assert_eq!(report.count(DiagnosticKind::MissingMain), 1);
    assert_eq!(report.diagnostics.len(), 1);
    assert!(!report.ok);
}

#[test]
fn test_non_fatal_diagnostics_keep_ok() {
    let compilation =
        compile("int main() { int x; int x; y = 1; return 0; }").expect("Parsing failed");
    let report = compilation.check();

    assert_eq!(report.diagnostics.len(), 2);
    assert!(report.ok);
}

#[test]
fn test_prototype_alone_is_not_main() {
    let compilation = compile("int main();").expect("Parsing failed");
    assert!(!compilation.check().ok);
}

#[test]
fn test_call_arity() {
    let too_many = r#"
        int f(int a) { return a; }
        int main() { return f(1, 2); }
    "#;
    assert_eq!(diagnostics(too_many), vec![DiagnosticKind::ArityMismatch]);

    let exact = r#"
        int f(int a) { return a; }
        int main() { return f(1); }
    "#;
    assert!(diagnostics(exact).is_empty());
}

#[test]
fn test_variadic_calls_need_the_fixed_arguments() {
    let source = r#"
        int printf(char *fmt, ...);
        int main() {
            printf("%d %d\n", 1, 2);
            printf("plain\n");
            printf();
            return 0;
        }
    "#;
    assert_eq!(diagnostics(source), vec![DiagnosticKind::ArityMismatch]);
}

#[test]
fn test_argument_types_are_checked() {
    let source = r#"
        int length(char *s) { return 0; }
        int main() {
            int n;
            length("literal");
            length(&n);
            return n;
        }
    "#;
    assert_eq!(diagnostics(source), vec![DiagnosticKind::TypeMismatch]);
}

#[test]
fn test_calling_a_variable_is_a_type_mismatch() {
    let source = "int main() { int f; f(); return 0; }";
    assert_eq!(diagnostics(source), vec![DiagnosticKind::TypeMismatch]);
}

#[test]
fn test_lexical_errors_do_not_stop_parsing() {
    let compilation = compile("int main() { int a@; return 0; # }").expect("Parsing failed");

    assert_eq!(compilation.lex_errors.len(), 2);
    assert!(matches!(
        compilation.lex_errors[0].kind,
        LexErrorKind::IllegalCharacter('@')
    ));
    assert!(matches!(
        compilation.lex_errors[1].kind,
        LexErrorKind::IllegalCharacter('#')
    ));
    assert!(compilation.check().ok);
}

#[test]
fn test_syntax_error_is_returned_as_value() {
    let err = compile("int main() {\n  return 0\n}").unwrap_err();

    let FrontendError::Syntax { error, lex_errors } = &err;
    assert_eq!(error.found, "}");
    assert_eq!(error.line(), Some(3));
    assert!(lex_errors.is_empty());
    assert!(err.to_string().starts_with("Syntax error at line 3"));
}

#[test]
fn test_lexical_errors_survive_a_syntax_error() {
    // The skipped '$' leaves `3 4`, which is what the parser rejects
    let err = compile("int main() { int x = 3 $ 4; return 0; }").unwrap_err();

    assert_eq!(err.lex_errors().len(), 1);
    assert!(matches!(
        err.lex_errors()[0].kind,
        LexErrorKind::IllegalCharacter('$')
    ));
    assert_eq!(err.lex_errors()[0].location.column, 24);

    let FrontendError::Syntax { error, .. } = &err;
    assert_eq!(error.found, "4");

    let message = err.to_string();
    assert!(message.starts_with("Lexical error at line 1, column 24"));
    assert!(message.contains("Syntax error at line 1, column 26"));
}
