//! Call tracing.
//!
//! The evaluator can report every user-function call and return to a
//! [`CallTracer`]. [`TextTracer`] renders the indented text format:
//!
//! ```text
//! main() <entry point>
//! |   double(n=1) <line 3>
//! |   return 2 <line 7>
//! return <line 4>
//! ```

use crate::value::Value;
use std::io::Write;

/// The value bound to one parameter at call or return time.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamBinding {
    pub name: String,
    pub value: Value,
    pub by_ref: bool,
}

/// Receives call and return events for user-defined functions.
pub trait CallTracer {
    /// A function was entered. `depth` is 0 for the entry point.
    fn call(&mut self, function: &str, params: &[ParamBinding], depth: usize, line: u32);

    /// A function returned. `params` carries the final values of the
    /// parameters; by-reference ones reflect mutations made inside.
    fn ret(&mut self, result: &Value, params: &[ParamBinding], depth: usize, line: u32);
}

/// Writes the indented text trace. Write failures are ignored so that
/// tracing never aborts execution.
pub struct TextTracer<W: Write> {
    out: W,
}

impl<W: Write> TextTracer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn indent(&mut self, depth: usize) {
        for _ in 0..depth {
            let _ = self.out.write_all(b"|   ");
        }
    }
}

impl<W: Write> CallTracer for TextTracer<W> {
    fn call(&mut self, function: &str, params: &[ParamBinding], depth: usize, line: u32) {
        self.indent(depth);
        let _ = write!(self.out, "{function}(");
        for (i, p) in params.iter().enumerate() {
            if i > 0 {
                let _ = write!(self.out, ", ");
            }
            if p.by_ref {
                let _ = write!(self.out, "&");
            }
            let _ = write!(self.out, "{}={}", p.name, p.value);
        }
        if depth == 0 {
            let _ = writeln!(self.out, ") <entry point>");
        } else {
            let _ = writeln!(self.out, ") <line {line}>");
        }
    }

    fn ret(&mut self, result: &Value, params: &[ParamBinding], depth: usize, line: u32) {
        self.indent(depth);
        let _ = write!(self.out, "return");
        if !result.is_void() {
            let _ = write!(self.out, " {result}");
        }
        for p in params.iter().filter(|p| p.by_ref) {
            let _ = write!(self.out, ", &{}={}", p.name, p.value);
        }
        let _ = writeln!(self.out, " <line {line}>");
        let _ = self.out.flush();
    }
}
