//! Integration tests for the RSL parser.

use rsl_lexer::Lexer;
use rsl_parser::Parser;
use rsl_types::ast::*;
use rsl_types::SourceFile;

/// Parse RSL source into a Program (panics on errors).
fn parse(source: &str) -> Program {
    let sf = SourceFile::new("test.rsl", source);
    let lex = Lexer::new(&sf).lex();
    assert!(!lex.errors.has_errors(), "lex errors: {:?}", lex.errors.errors);
    let result = Parser::new(lex.tokens, &sf).parse();
    if result.errors.has_errors() {
        panic!(
            "parse errors:\n{}",
            result
                .errors
                .errors
                .iter()
                .map(|e| format!("  [{}] {}", e.code, e.message))
                .collect::<Vec<_>>()
                .join("\n")
        );
    }
    result.program.expect("no program after successful parse")
}

/// Parse expecting errors; returns the collected messages.
fn parse_err(source: &str) -> Vec<String> {
    let sf = SourceFile::new("test.rsl", source);
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    assert!(result.errors.has_errors(), "expected parse errors");
    result
        .errors
        .errors
        .iter()
        .map(|e| e.message.clone())
        .collect()
}

/// Shorthand: parse a single `main` wrapping the given statements.
fn parse_main(body: &str) -> Function {
    let mut prog = parse(&format!("func main()\n{body}\nendfunc"));
    prog.functions.remove(0)
}

#[test]
fn empty_function() {
    let prog = parse("func main() endfunc");
    assert_eq!(prog.functions.len(), 1);
    assert_eq!(prog.functions[0].name.name, "main");
    assert!(prog.functions[0].params.is_empty());
    assert!(prog.functions[0].body.is_empty());
}

#[test]
fn multiple_functions() {
    let prog = parse("func main() endfunc func helper(a, b) endfunc");
    assert_eq!(prog.functions.len(), 2);
    assert_eq!(prog.functions[1].name.name, "helper");
    assert_eq!(prog.functions[1].params.len(), 2);
}

#[test]
fn params_by_value_and_by_ref() {
    let prog = parse("func f(a, &b, c) endfunc");
    let params = &prog.functions[0].params;
    assert_eq!(params[0].mode, ParamMode::ByValue);
    assert_eq!(params[1].mode, ParamMode::ByRef);
    assert_eq!(params[1].name.name, "b");
    assert_eq!(params[2].mode, ParamMode::ByValue);
}

#[test]
fn assignment_statement() {
    let f = parse_main("x = 1 + 2;");
    assert_eq!(f.body.len(), 1);
    match &f.body[0].kind {
        StmtKind::Assign { target, value } => {
            assert_eq!(target.name, "x");
            assert!(matches!(
                value.kind,
                ExprKind::Binary { op: BinOp::Add, .. }
            ));
        }
        other => panic!("expected assignment, got {other:?}"),
    }
}

#[test]
fn precedence_mul_binds_tighter_than_add() {
    let f = parse_main("x = 1 + 2 * 3;");
    let StmtKind::Assign { value, .. } = &f.body[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { op, right, .. } = &value.kind else {
        panic!("expected binary expr");
    };
    assert_eq!(*op, BinOp::Add);
    assert!(matches!(
        right.kind,
        ExprKind::Binary { op: BinOp::Mul, .. }
    ));
}

#[test]
fn parens_override_precedence() {
    let f = parse_main("x = (1 + 2) * 3;");
    let StmtKind::Assign { value, .. } = &f.body[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { op, left, .. } = &value.kind else {
        panic!("expected binary expr");
    };
    assert_eq!(*op, BinOp::Mul);
    assert!(matches!(left.kind, ExprKind::Binary { op: BinOp::Add, .. }));
}

#[test]
fn and_binds_tighter_than_or() {
    let f = parse_main("x = true or false and false;");
    let StmtKind::Assign { value, .. } = &f.body[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Binary { op, right, .. } = &value.kind else {
        panic!("expected binary expr");
    };
    assert_eq!(*op, BinOp::Or);
    assert!(matches!(
        right.kind,
        ExprKind::Binary { op: BinOp::And, .. }
    ));
}

#[test]
fn unary_operators_nest() {
    let f = parse_main("x = - - 1; y = not not true; z = +1;");
    assert_eq!(f.body.len(), 3);
    let StmtKind::Assign { value, .. } = &f.body[0].kind else {
        panic!("expected assignment");
    };
    let ExprKind::Unary { op, operand } = &value.kind else {
        panic!("expected unary expr");
    };
    assert_eq!(*op, UnaryOp::Neg);
    assert!(matches!(
        operand.kind,
        ExprKind::Unary {
            op: UnaryOp::Neg,
            ..
        }
    ));
}

#[test]
fn if_without_else() {
    let f = parse_main("if x > 0 then y = 1; endif");
    let StmtKind::If {
        then_body,
        else_body,
        ..
    } = &f.body[0].kind
    else {
        panic!("expected if");
    };
    assert_eq!(then_body.len(), 1);
    assert!(else_body.is_none());
}

#[test]
fn if_with_else() {
    let f = parse_main("if x == 0 then y = 1; else y = 2; z = 3; endif");
    let StmtKind::If {
        then_body,
        else_body,
        ..
    } = &f.body[0].kind
    else {
        panic!("expected if");
    };
    assert_eq!(then_body.len(), 1);
    assert_eq!(else_body.as_ref().unwrap().len(), 2);
}

#[test]
fn while_loop() {
    let f = parse_main("while i < 10 do i = i + 1; endwhile");
    let StmtKind::While { body, .. } = &f.body[0].kind else {
        panic!("expected while");
    };
    assert_eq!(body.len(), 1);
}

#[test]
fn nested_control_flow() {
    let f = parse_main(
        "while a do if b then c = 1; else while d do e = 2; endwhile endif endwhile",
    );
    assert_eq!(f.body.len(), 1);
}

#[test]
fn return_with_and_without_value() {
    let f = parse_main("return; return 42;");
    assert!(matches!(f.body[0].kind, StmtKind::Return(None)));
    assert!(matches!(f.body[1].kind, StmtKind::Return(Some(_))));
}

#[test]
fn read_and_write() {
    let f = parse_main("read x; write x; write \"text\";");
    assert!(matches!(f.body[0].kind, StmtKind::Read(_)));
    assert!(matches!(f.body[1].kind, StmtKind::Write(_)));
    let StmtKind::Write(e) = &f.body[2].kind else {
        panic!("expected write");
    };
    assert_eq!(e.kind, ExprKind::StringLit("text".into()));
}

#[test]
fn call_statement_and_call_expression() {
    let f = parse_main("rSet(25.0, 25.0, 0.0); x = rXPosition();");
    let StmtKind::Call(call) = &f.body[0].kind else {
        panic!("expected call statement");
    };
    assert_eq!(call.callee.name, "rSet");
    assert_eq!(call.args.len(), 3);
    let StmtKind::Assign { value, .. } = &f.body[1].kind else {
        panic!("expected assignment");
    };
    assert!(matches!(&value.kind, ExprKind::Call(c) if c.callee.name == "rXPosition"));
}

#[test]
fn statement_lines_are_recorded() {
    let prog = parse("func main()\n  x = 1;\n  y = 2;\nendfunc");
    let f = &prog.functions[0];
    assert_eq!(f.body[0].line(), 2);
    assert_eq!(f.body[1].line(), 3);
}

#[test]
fn missing_semicolon_is_an_error() {
    let msgs = parse_err("func main() x = 1 endfunc");
    assert!(msgs.iter().any(|m| m.contains("expected ';'")), "{msgs:?}");
}

#[test]
fn chained_relational_is_an_error() {
    let msgs = parse_err("func main() x = 1 < 2 < 3; endfunc");
    assert!(msgs.iter().any(|m| m.contains("cannot be chained")));
}

#[test]
fn missing_endfunc_is_an_error() {
    let msgs = parse_err("func main() x = 1;");
    assert!(msgs.iter().any(|m| m.contains("missing 'endfunc'")));
}

#[test]
fn error_recovery_keeps_later_functions() {
    let sf = SourceFile::new("test.rsl", "func bad() x = ; endfunc func good() y = 1; endfunc");
    let lex = Lexer::new(&sf).lex();
    let result = Parser::new(lex.tokens, &sf).parse();
    assert!(result.errors.has_errors());
    let prog = result.program.expect("program should survive recovery");
    assert!(prog.functions.iter().any(|f| f.name.name == "good"));
}

#[test]
fn keywords_cannot_be_identifiers() {
    let msgs = parse_err("func main() read while; endfunc");
    assert!(msgs.iter().any(|m| m.contains("expected identifier")));
}
