//! The tree-walking interpreter.
//!
//! Executes a program by calling `main` and walking statement and
//! expression nodes directly. Statement execution returns
//! `Ok(Some(value))` as soon as a `return` executes, which unwinds the
//! enclosing blocks up to the function call.

use crate::builtins;
use crate::display::{DisplayListener, NullDisplay};
use crate::error::{EvalError, EvalResult};
use crate::stack::{CallStack, Slot};
use crate::tracer::{CallTracer, ParamBinding};
use crate::value::{OpError, Value};
use crate::world::World;
use rsl_types::ast::{
    BinOp, Expr, ExprKind, Function, ParamMode, Program, Stmt, StmtKind, UnaryOp,
};
use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io::{self, BufRead, Write};
use std::rc::Rc;

// ══════════════════════════════════════════════════════════════════════════════
// Input tokenization
// ══════════════════════════════════════════════════════════════════════════════

/// Whitespace-separated token reader over an arbitrary input stream.
pub(crate) struct InputTokens {
    reader: Box<dyn BufRead>,
    pending: VecDeque<String>,
}

impl InputTokens {
    fn new(reader: Box<dyn BufRead>) -> Self {
        Self {
            reader,
            pending: VecDeque::new(),
        }
    }

    /// The next token, or `None` at end of input.
    fn next_token(&mut self) -> io::Result<Option<String>> {
        while self.pending.is_empty() {
            let mut line = String::new();
            if self.reader.read_line(&mut line)? == 0 {
                return Ok(None);
            }
            self.pending
                .extend(line.split_whitespace().map(str::to_owned));
        }
        Ok(self.pending.pop_front())
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Interpreter
// ══════════════════════════════════════════════════════════════════════════════

/// Executes an RSL program.
///
/// Construction resolves the function table and fails on duplicate
/// definitions or a missing `main`. Input, output, display listener
/// and call tracer are all injectable.
pub struct Interpreter<'p> {
    /// Function name to declaration.
    pub(crate) functions: HashMap<&'p str, &'p Function>,
    /// The call stack. Frames are deliberately kept on error so that
    /// [`Interpreter::stack_trace`] can render the failure context.
    pub(crate) stack: CallStack,
    /// Robot simulation state.
    pub(crate) world: World,
    /// Line of the statement or expression currently executing.
    pub(crate) line: u32,
    /// Call nesting; -1 outside any call, 0 inside `main`.
    pub(crate) depth: i32,
    /// Echo world changes as text on the output stream.
    pub(crate) txt_trace: bool,
    pub(crate) display: Box<dyn DisplayListener>,
    pub(crate) tracer: Option<Box<dyn CallTracer>>,
    pub(crate) input: InputTokens,
    pub(crate) output: Box<dyn Write>,
}

impl<'p> Interpreter<'p> {
    /// Builds the interpreter for a parsed program.
    pub fn new(program: &'p Program) -> EvalResult<Self> {
        let mut functions: HashMap<&'p str, &'p Function> = HashMap::new();
        for f in &program.functions {
            if functions.insert(f.name.name.as_str(), f).is_some() {
                return Err(EvalError::DuplicateFunction {
                    name: f.name.name.clone(),
                });
            }
        }
        match functions.get("main") {
            None => return Err(EvalError::MissingMain),
            Some(main) if !main.params.is_empty() => {
                return Err(EvalError::ArityMismatch {
                    name: "main".to_string(),
                    line: main.span.start_line,
                });
            }
            Some(_) => {}
        }
        Ok(Self {
            functions,
            stack: CallStack::new(),
            world: World::new(),
            line: 0,
            depth: -1,
            txt_trace: false,
            display: Box::new(NullDisplay),
            tracer: None,
            input: InputTokens::new(Box::new(io::BufReader::new(io::stdin()))),
            output: Box::new(io::stdout()),
        })
    }

    pub fn with_display(mut self, display: Box<dyn DisplayListener>) -> Self {
        self.display = display;
        self
    }

    pub fn with_tracer(mut self, tracer: Box<dyn CallTracer>) -> Self {
        self.tracer = Some(tracer);
        self
    }

    pub fn with_txt_trace(mut self, on: bool) -> Self {
        self.txt_trace = on;
        self
    }

    pub fn with_input(mut self, reader: Box<dyn BufRead>) -> Self {
        self.input = InputTokens::new(reader);
        self
    }

    pub fn with_output(mut self, writer: Box<dyn Write>) -> Self {
        self.output = writer;
        self
    }

    /// Runs the program by calling `main` without arguments.
    pub fn run(&mut self) -> EvalResult<()> {
        self.call_function("main", &[])?;
        Ok(())
    }

    /// The simulation state, for inspection after a run.
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Renders the call stack at the point of the last error.
    pub fn stack_trace(&self) -> String {
        self.stack.render_trace(self.line)
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Function calls
    // ──────────────────────────────────────────────────────────────────────────

    /// Calls a built-in or user function with the caller's argument
    /// expressions and returns its result.
    pub(crate) fn call_function(&mut self, name: &str, args: &'p [Expr]) -> EvalResult<Value> {
        if builtins::is_builtin(name) {
            return self.call_builtin(name, args);
        }
        let func = *self
            .functions
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction {
                name: name.to_string(),
                line: self.line,
            })?;

        if func.params.len() != args.len() {
            return Err(EvalError::ArityMismatch {
                name: name.to_string(),
                line: self.line,
            });
        }

        // Bind arguments in the caller's frame. By-value arguments get
        // a fresh slot; by-reference arguments must be bare variables
        // and share the caller's slot.
        let mut slots: Vec<Slot> = Vec::with_capacity(args.len());
        for (param, arg) in func.params.iter().zip(args) {
            self.line = arg.line();
            let slot = match param.mode {
                ParamMode::ByValue => Rc::new(RefCell::new(self.eval_expr(arg)?)),
                ParamMode::ByRef => match &arg.kind {
                    ExprKind::Var(var) => {
                        self.stack
                            .slot(var)
                            .ok_or_else(|| EvalError::UndefinedVariable {
                                name: var.clone(),
                                line: self.line,
                            })?
                    }
                    _ => return Err(EvalError::BadRefArgument { line: self.line }),
                },
            };
            slots.push(slot);
        }

        self.depth += 1;
        let depth = self.depth as usize;
        if self.tracer.is_some() {
            let bindings = Self::bindings(func, &slots);
            let line = self.line;
            if let Some(t) = self.tracer.as_mut() {
                t.call(name, &bindings, depth, line);
            }
        }

        self.stack.push(name.to_string(), self.line);
        self.line = func.span.start_line;
        for (param, slot) in func.params.iter().zip(&slots) {
            self.stack.bind(&param.name.name, slot.clone());
        }

        let result = self.exec_block(&func.body)?.unwrap_or(Value::Void);

        if self.tracer.is_some() {
            // Re-read the slots so by-reference mutations show up.
            let bindings = Self::bindings(func, &slots);
            let line = self.line;
            if let Some(t) = self.tracer.as_mut() {
                t.ret(&result, &bindings, depth, line);
            }
        }

        self.stack.pop();
        self.depth -= 1;
        Ok(result)
    }

    fn bindings(func: &Function, slots: &[Slot]) -> Vec<ParamBinding> {
        func.params
            .iter()
            .zip(slots)
            .map(|(p, s)| ParamBinding {
                name: p.name.name.clone(),
                value: s.borrow().clone(),
                by_ref: p.mode == ParamMode::ByRef,
            })
            .collect()
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Statements
    // ──────────────────────────────────────────────────────────────────────────

    /// Executes a block. Stops at the first statement producing a
    /// return value and propagates it.
    fn exec_block(&mut self, stmts: &'p [Stmt]) -> EvalResult<Option<Value>> {
        for stmt in stmts {
            if let Some(value) = self.exec_stmt(stmt)? {
                return Ok(Some(value));
            }
        }
        Ok(None)
    }

    fn exec_stmt(&mut self, stmt: &'p Stmt) -> EvalResult<Option<Value>> {
        self.line = stmt.line();
        match &stmt.kind {
            StmtKind::Assign { target, value } => {
                let v = self.eval_expr(value)?;
                self.stack.define(&target.name, v);
                Ok(None)
            }
            StmtKind::If {
                cond,
                then_body,
                else_body,
            } => {
                if self.eval_cond(cond)? {
                    self.exec_block(then_body)
                } else if let Some(else_body) = else_body {
                    self.exec_block(else_body)
                } else {
                    Ok(None)
                }
            }
            StmtKind::While { cond, body } => loop {
                if !self.eval_cond(cond)? {
                    return Ok(None);
                }
                if let Some(value) = self.exec_block(body)? {
                    return Ok(Some(value));
                }
            },
            StmtKind::Return(None) => Ok(Some(Value::Void)),
            StmtKind::Return(Some(expr)) => Ok(Some(self.eval_expr(expr)?)),
            StmtKind::Read(target) => {
                let token = self
                    .input
                    .next_token()
                    .map_err(|e| self.io_err(e))?
                    .ok_or(EvalError::InputExhausted { line: self.line })?;
                let value = if let Ok(i) = token.parse::<i32>() {
                    Value::Int(i)
                } else if let Ok(f) = token.parse::<f32>() {
                    Value::Float(f)
                } else {
                    Value::Str(token)
                };
                self.stack.define(&target.name, value);
                Ok(None)
            }
            StmtKind::Write(expr) => {
                // String literals are emitted verbatim, with their
                // escapes already resolved by the lexer.
                if let ExprKind::StringLit(s) = &expr.kind {
                    write!(self.output, "{s}").map_err(|e| self.io_err(e))?;
                } else {
                    let v = self.eval_expr(expr)?;
                    write!(self.output, "{v}").map_err(|e| self.io_err(e))?;
                }
                Ok(None)
            }
            StmtKind::Call(call) => {
                self.call_function(&call.callee.name, &call.args)?;
                Ok(None)
            }
        }
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Expressions
    // ──────────────────────────────────────────────────────────────────────────

    /// Evaluates an expression. The current line is moved to the
    /// expression while it executes and restored afterwards, so errors
    /// point at the innermost offending node.
    pub(crate) fn eval_expr(&mut self, expr: &'p Expr) -> EvalResult<Value> {
        let previous_line = self.line;
        self.line = expr.line();
        let value = self.eval_expr_kind(expr)?;
        self.line = previous_line;
        Ok(value)
    }

    fn eval_expr_kind(&mut self, expr: &'p Expr) -> EvalResult<Value> {
        match &expr.kind {
            ExprKind::IntLit(v) => Ok(Value::Int(*v)),
            ExprKind::FloatLit(v) => Ok(Value::Float(*v)),
            ExprKind::BoolLit(v) => Ok(Value::Bool(*v)),
            ExprKind::StringLit(s) => Ok(Value::Str(s.clone())),
            ExprKind::Var(name) => {
                self.stack
                    .value(name)
                    .ok_or_else(|| EvalError::UndefinedVariable {
                        name: name.clone(),
                        line: self.line,
                    })
            }
            ExprKind::Call(call) => {
                let value = self.call_function(&call.callee.name, &call.args)?;
                if value.is_void() {
                    return Err(EvalError::VoidResult {
                        name: call.callee.name.clone(),
                        line: call.span.start_line,
                    });
                }
                Ok(value)
            }
            ExprKind::Unary { op, operand } => {
                let value = self.eval_expr(operand)?;
                match op {
                    UnaryOp::Plus => {
                        self.check_numeric(&value)?;
                        Ok(value)
                    }
                    UnaryOp::Neg => match value {
                        Value::Int(v) => Ok(Value::Int(v.wrapping_neg())),
                        Value::Float(v) => Ok(Value::Float(-v)),
                        other => Err(EvalError::ExpectedNumeric {
                            found: other.type_name(),
                            line: self.line,
                        }),
                    },
                    UnaryOp::Not => match value {
                        Value::Bool(b) => Ok(Value::Bool(!b)),
                        other => Err(EvalError::ExpectedBool {
                            found: other.type_name(),
                            line: self.line,
                        }),
                    },
                }
            }
            ExprKind::Binary { op, left, right } => self.eval_binary(*op, left, right),
        }
    }

    fn eval_binary(&mut self, op: BinOp, left: &'p Expr, right: &'p Expr) -> EvalResult<Value> {
        match op {
            // Short-circuit: the right operand is only evaluated when
            // the left one does not decide the result.
            BinOp::And | BinOp::Or => {
                let l = self.eval_expr(left)?;
                let l = self.expect_bool(l)?;
                if (op == BinOp::And && !l) || (op == BinOp::Or && l) {
                    return Ok(Value::Bool(l));
                }
                let r = self.eval_expr(right)?;
                let r = self.expect_bool(r)?;
                Ok(Value::Bool(r))
            }
            _ if op.is_relational() => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                if l.type_name() != r.type_name() {
                    return Err(EvalError::IncompatibleOperands {
                        op,
                        left: l.type_name(),
                        right: r.type_name(),
                        line: self.line,
                    });
                }
                Value::relational(op, &l, &r).map_err(|e| self.op_err(e))
            }
            BinOp::Mod => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                self.check_int(&l)?;
                self.check_int(&r)?;
                Value::arith(op, &l, &r).map_err(|e| self.op_err(e))
            }
            _ => {
                let l = self.eval_expr(left)?;
                let r = self.eval_expr(right)?;
                self.check_numeric(&l)?;
                self.check_numeric(&r)?;
                if l.type_name() != r.type_name() {
                    return Err(EvalError::IncompatibleOperands {
                        op,
                        left: l.type_name(),
                        right: r.type_name(),
                        line: self.line,
                    });
                }
                Value::arith(op, &l, &r).map_err(|e| self.op_err(e))
            }
        }
    }

    fn eval_cond(&mut self, expr: &'p Expr) -> EvalResult<bool> {
        let value = self.eval_expr(expr)?;
        self.expect_bool(value)
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Checks and error adapters
    // ──────────────────────────────────────────────────────────────────────────

    pub(crate) fn expect_bool(&self, value: Value) -> EvalResult<bool> {
        match value {
            Value::Bool(b) => Ok(b),
            other => Err(EvalError::ExpectedBool {
                found: other.type_name(),
                line: self.line,
            }),
        }
    }

    fn check_numeric(&self, value: &Value) -> EvalResult<()> {
        if value.is_numeric() {
            Ok(())
        } else {
            Err(EvalError::ExpectedNumeric {
                found: value.type_name(),
                line: self.line,
            })
        }
    }

    fn check_int(&self, value: &Value) -> EvalResult<()> {
        if matches!(value, Value::Int(_)) {
            Ok(())
        } else {
            Err(EvalError::ExpectedInt {
                found: value.type_name(),
                line: self.line,
            })
        }
    }

    fn op_err(&self, e: OpError) -> EvalError {
        match e {
            OpError::DivisionByZero => EvalError::DivisionByZero { line: self.line },
            OpError::Unsupported { op, type_name } => EvalError::UnsupportedOperation {
                op,
                type_name,
                line: self.line,
            },
        }
    }

    pub(crate) fn io_err(&self, e: io::Error) -> EvalError {
        EvalError::Io {
            message: e.to_string(),
            line: self.line,
        }
    }
}
