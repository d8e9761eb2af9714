//! Integration tests for the RSL evaluator.

use rsl_eval::{EvalError, Interpreter, TextTracer};
use rsl_lexer::Lexer;
use rsl_parser::Parser;
use rsl_types::ast::Program;
use rsl_types::SourceFile;
use std::cell::RefCell;
use std::io::{self, Cursor, Write};
use std::rc::Rc;

/// A cloneable in-memory writer, so output can be inspected after the
/// interpreter (which owns its writer) has run.
#[derive(Clone, Default)]
struct SharedBuf(Rc<RefCell<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl SharedBuf {
    fn contents(&self) -> String {
        String::from_utf8(self.0.borrow().clone()).unwrap()
    }
}

/// Parse RSL source into a Program (panics on errors).
fn program(source: &str) -> Program {
    let sf = SourceFile::new("test.rsl", source);
    let lex = Lexer::new(&sf).lex();
    assert!(!lex.errors.has_errors(), "lex errors: {:?}", lex.errors.errors);
    let result = Parser::new(lex.tokens, &sf).parse();
    assert!(
        !result.errors.has_errors(),
        "parse errors: {:?}",
        result.errors.errors
    );
    result.program.expect("no program after successful parse")
}

/// Run a program and return everything it wrote.
fn run(source: &str) -> String {
    let prog = program(source);
    let out = SharedBuf::default();
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(out.clone()));
    interp.run().unwrap();
    out.contents()
}

/// Run a program with the given stdin contents.
fn run_with_input(source: &str, input: &str) -> String {
    let prog = program(source);
    let out = SharedBuf::default();
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(out.clone()))
        .with_input(Box::new(Cursor::new(input.to_string())));
    interp.run().unwrap();
    out.contents()
}

/// Build an interpreter expecting a load error. The interpreter itself
/// is not `Debug`, so the `Ok` arm is discarded before unwrapping.
fn load_err(prog: &Program) -> EvalError {
    Interpreter::new(prog).map(|_| ()).unwrap_err()
}

/// Run a program expecting a runtime error.
fn run_err(source: &str) -> EvalError {
    let prog = program(source);
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(io::sink()));
    interp.run().unwrap_err()
}

// ══════════════════════════════════════════════════════════════════════════════
// Expressions and statements
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn writes_integer_arithmetic() {
    assert_eq!(run("func main() write 2 + 3 * 4; endfunc"), "14");
}

#[test]
fn writes_float_values_with_decimal_point() {
    assert_eq!(run("func main() x = 1.5 + 2.5; write x; endfunc"), "4.0");
}

#[test]
fn integer_division_truncates_and_modulo_works() {
    let out = run("func main() write 7 / 2; write \" \"; write 7 % 2; endfunc");
    assert_eq!(out, "3 1");
}

#[test]
fn division_by_zero_reports_the_line() {
    let err = run_err("func main()\n  x = 1 / 0;\nendfunc");
    assert_eq!(err, EvalError::DivisionByZero { line: 2 });
}

#[test]
fn string_equality() {
    let out = run("func main() write \"hi\" == \"hi\"; write \" \"; write \"a\" == \"b\"; endfunc");
    assert_eq!(out, "true false");
}

#[test]
fn relational_operands_must_have_the_same_type() {
    let err = run_err("func main() write 1 == 1.0; endfunc");
    assert!(matches!(err, EvalError::IncompatibleOperands { .. }), "{err:?}");
}

#[test]
fn boolean_operators_short_circuit() {
    let out = run(
        "func main()\n\
         \x20 n = 0;\n\
         \x20 a = false and bump(n);\n\
         \x20 b = true or bump(n);\n\
         \x20 write n;\n\
         \x20 c = bump(n) and bump(n);\n\
         \x20 write \" \";\n\
         \x20 write n;\n\
         endfunc\n\
         func bump(&c)\n\
         \x20 c = c + 1;\n\
         \x20 return true;\n\
         endfunc",
    );
    assert_eq!(out, "0 2");
}

#[test]
fn condition_must_be_boolean() {
    let err = run_err("func main()\n  if 1 then write \"x\"; endif\nendfunc");
    assert_eq!(
        err,
        EvalError::ExpectedBool {
            found: "int",
            line: 2
        }
    );
}

#[test]
fn return_propagates_from_nested_loops() {
    let out = run(
        "func main()\n\
         \x20 write find();\n\
         endfunc\n\
         func find()\n\
         \x20 i = 0;\n\
         \x20 while true do\n\
         \x20   if i == 3 then\n\
         \x20     return i;\n\
         \x20   endif\n\
         \x20   i = i + 1;\n\
         \x20 endwhile\n\
         endfunc",
    );
    assert_eq!(out, "3");
}

// ══════════════════════════════════════════════════════════════════════════════
// Function calls and parameter passing
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn by_value_copies_and_by_reference_aliases() {
    let out = run(
        "func main()\n\
         \x20 a = 1;\n\
         \x20 setv(a);\n\
         \x20 write a;\n\
         \x20 write \" \";\n\
         \x20 setr(a);\n\
         \x20 write a;\n\
         endfunc\n\
         func setv(v)\n\
         \x20 v = 99;\n\
         endfunc\n\
         func setr(&v)\n\
         \x20 v = 99;\n\
         endfunc",
    );
    assert_eq!(out, "1 99");
}

#[test]
fn by_reference_requires_a_bare_variable() {
    let err = run_err("func main() f(1); endfunc func f(&x) endfunc");
    assert_eq!(err, EvalError::BadRefArgument { line: 1 });
}

#[test]
fn void_call_in_expression_is_an_error() {
    let err = run_err("func main()\n  x = nothing();\nendfunc\nfunc nothing()\n  return;\nendfunc");
    assert_eq!(
        err,
        EvalError::VoidResult {
            name: "nothing".into(),
            line: 2
        }
    );
}

#[test]
fn calling_an_undeclared_function_fails() {
    let err = run_err("func main()\n  missing();\nendfunc");
    assert_eq!(
        err,
        EvalError::UnknownFunction {
            name: "missing".into(),
            line: 2
        }
    );
}

#[test]
fn reading_an_undefined_variable_fails() {
    let err = run_err("func main()\n  x = y;\nendfunc");
    assert_eq!(
        err,
        EvalError::UndefinedVariable {
            name: "y".into(),
            line: 2
        }
    );
}

#[test]
fn wrong_argument_count_fails() {
    let err = run_err("func main()\n  f(1, 2);\nendfunc\nfunc f(a) endfunc");
    assert_eq!(
        err,
        EvalError::ArityMismatch {
            name: "f".into(),
            line: 2
        }
    );
}

#[test]
fn duplicate_functions_are_rejected_at_load() {
    let prog = program("func main() endfunc func main() endfunc");
    let err = load_err(&prog);
    assert_eq!(err, EvalError::DuplicateFunction { name: "main".into() });
}

#[test]
fn a_program_without_main_is_rejected() {
    let prog = program("func helper() endfunc");
    let err = load_err(&prog);
    assert_eq!(err, EvalError::MissingMain);
}

#[test]
fn main_must_not_take_parameters() {
    let prog = program("func main(a) endfunc");
    let err = load_err(&prog);
    assert_eq!(
        err,
        EvalError::ArityMismatch {
            name: "main".into(),
            line: 1
        }
    );
}

#[test]
fn stack_trace_names_the_active_frames() {
    let prog = program(
        "func main()\n\
         \x20 boom();\n\
         endfunc\n\
         func boom()\n\
         \x20 x = 1 / 0;\n\
         endfunc",
    );
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(io::sink()));
    interp.run().unwrap_err();
    let trace = interp.stack_trace();
    assert!(trace.contains("boom <line 5>"), "{trace}");
    assert!(trace.contains("main <line 2>"), "{trace}");
}

// ══════════════════════════════════════════════════════════════════════════════
// Read and write
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn read_accepts_int_float_and_string() {
    let out = run_with_input(
        "func main()\n\
         \x20 read a;\n\
         \x20 read b;\n\
         \x20 read c;\n\
         \x20 write a;\n\
         \x20 write \" \";\n\
         \x20 write b;\n\
         \x20 write \" \";\n\
         \x20 write c;\n\
         endfunc",
        "42 2.5 hello\n",
    );
    assert_eq!(out, "42 2.5 hello");
}

#[test]
fn reading_past_the_end_of_input_fails() {
    let prog = program("func main()\n  read x;\nendfunc");
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(io::sink()))
        .with_input(Box::new(Cursor::new(String::new())));
    let err = interp.run().unwrap_err();
    assert_eq!(err, EvalError::InputExhausted { line: 2 });
}

#[test]
fn write_emits_string_literals_verbatim() {
    assert_eq!(run("func main() write \"a\\nb\\t!\"; endfunc"), "a\nb\t!");
}

// ══════════════════════════════════════════════════════════════════════════════
// Robot built-ins
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn set_pose_and_query_it_back() {
    let out = run(
        "func main()\n\
         \x20 rSet(25.0, 25.0, 90.0);\n\
         \x20 write rXPosition();\n\
         \x20 write \" \";\n\
         \x20 write rYPosition();\n\
         \x20 write \" \";\n\
         \x20 write rRotation();\n\
         endfunc",
    );
    assert_eq!(out, "25.0 25.0 90.0");
}

#[test]
fn set_pose_respects_the_wall_margin() {
    let err = run_err("func main()\n  rSet(0.5, 25.0, 0.0);\nendfunc");
    assert_eq!(err, EvalError::PositionOutOfBounds { line: 2 });
    let out = run("func main() rSet(1.5, 25.0, 0.0); write rXPosition(); endfunc");
    assert_eq!(out, "1.5");
}

#[test]
fn builtin_arguments_are_type_checked() {
    let err = run_err("func main()\n  rSet(25, 25.0, 0.0);\nendfunc");
    assert_eq!(
        err,
        EvalError::ExpectedFloat {
            found: "int",
            line: 2
        }
    );
    let err = run_err("func main()\n  rSet(25.0, 25.0, 0.0);\n  x = rFeel(1.0);\nendfunc");
    assert_eq!(
        err,
        EvalError::ExpectedInt {
            found: "float",
            line: 3
        }
    );
}

#[test]
fn movement_requires_positioning_first() {
    let err = run_err("func main()\n  rMove(1.0);\nendfunc");
    assert_eq!(err, EvalError::NotPositioned { line: 2 });
}

#[test]
fn movement_stops_just_before_an_obstacle() {
    let prog = program(
        "func main()\n\
         \x20 rSet(5.0, 25.0, 0.0);\n\
         \x20 oSet(10.0, 25.0, 2.0, 2.0);\n\
         \x20 rMove(20.0);\n\
         endfunc",
    );
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(io::sink()));
    interp.run().unwrap();
    let x = interp.world().x().unwrap();
    // Contact at x = 8.0: obstacle half-width plus the robot radius.
    assert!(x < 8.0, "x = {x}");
    assert!(x > 7.99, "x = {x}");
}

#[test]
fn turning_wraps_the_heading() {
    let out = run("func main() rSet(25.0, 25.0, 0.0); rTurn(-90.0); write rRotation(); endfunc");
    assert_eq!(out, "270.0");
}

#[test]
fn sensors_detect_walls_without_moving_the_robot() {
    let out = run(
        "func main()\n\
         \x20 rSet(1.5, 25.0, 180.0);\n\
         \x20 write rFeel(0);\n\
         \x20 write \" \";\n\
         \x20 write rFeel(4);\n\
         \x20 write \" \";\n\
         \x20 write rXPosition();\n\
         endfunc",
    );
    assert_eq!(out, "true false 1.5");
}

#[test]
fn sensor_index_is_validated() {
    let err = run_err("func main()\n  rSet(25.0, 25.0, 0.0);\n  x = rFeel(8);\nendfunc");
    assert_eq!(err, EvalError::BadSensorIndex { index: 8, line: 3 });
}

#[test]
fn obstacles_are_validated_against_robot_and_bounds() {
    let err = run_err("func main()\n  rSet(25.0, 25.0, 0.0);\n  oSet(25.0, 25.0, 2.0, 2.0);\nendfunc");
    assert_eq!(err, EvalError::ObstacleOverlapsRobot { line: 3 });
    let err = run_err("func main()\n  rSet(25.0, 25.0, 0.0);\n  oSet(0.5, 25.0, 2.0, 2.0);\nendfunc");
    assert_eq!(err, EvalError::ObstacleOutOfBounds { line: 3 });
}

#[test]
fn trail_toggle_updates_the_world() {
    let prog = program("func main() rTrail(true); endfunc");
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(io::sink()));
    interp.run().unwrap();
    assert!(interp.world().trail());

    let err = run_err("func main()\n  rTrail(1);\nendfunc");
    assert_eq!(
        err,
        EvalError::ExpectedBool {
            found: "int",
            line: 2
        }
    );
}

// ══════════════════════════════════════════════════════════════════════════════
// Tracing
// ══════════════════════════════════════════════════════════════════════════════

#[test]
fn call_trace_records_nesting_parameters_and_lines() {
    let prog = program(
        "func main()\n\
         \x20 x = 1;\n\
         \x20 y = double(x);\n\
         \x20 write y;\n\
         endfunc\n\
         func double(n)\n\
         \x20 return n * 2;\n\
         endfunc",
    );
    let trace = SharedBuf::default();
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(io::sink()))
        .with_tracer(Box::new(TextTracer::new(trace.clone())));
    interp.run().unwrap();
    assert_eq!(
        trace.contents(),
        "main() <entry point>\n\
         |   double(n=1) <line 3>\n\
         |   return 2 <line 7>\n\
         return <line 4>\n"
    );
}

#[test]
fn call_trace_shows_final_by_reference_values() {
    let prog = program(
        "func main()\n\
         \x20 n = 0;\n\
         \x20 bump(n);\n\
         endfunc\n\
         func bump(&c)\n\
         \x20 c = c + 1;\n\
         endfunc",
    );
    let trace = SharedBuf::default();
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(io::sink()))
        .with_tracer(Box::new(TextTracer::new(trace.clone())));
    interp.run().unwrap();
    let text = trace.contents();
    assert!(text.contains("|   bump(&c=0) <line 3>"), "{text}");
    assert!(text.contains("|   return, &c=1 <line 6>"), "{text}");
}

#[test]
fn txt_trace_echoes_world_changes() {
    let prog = program("func main() rSet(25.0, 25.0, 0.0); rTurn(45.0); endfunc");
    let out = SharedBuf::default();
    let mut interp = Interpreter::new(&prog)
        .unwrap()
        .with_output(Box::new(out.clone()))
        .with_txt_trace(true);
    interp.run().unwrap();
    let text = out.contents();
    assert!(text.contains("Robot positioned:\nX: 25.0, Y: 25.0, Rotation(Deg): 0.0\n"), "{text}");
    assert!(text.contains("Robot rotated:\nRotation(Deg): 45.0\n"), "{text}");
}
