//! Call stack and activation records.
//!
//! Variables live in shared, mutable slots. Pass-by-reference binds the
//! callee's parameter name to the caller's slot, so assignments through
//! either name update the same cell. Assignment to an existing variable
//! writes through the slot rather than replacing it, which is what
//! makes the aliasing visible to the caller.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::rc::Rc;

/// A shared variable cell.
pub type Slot = Rc<RefCell<Value>>;

/// One stack frame: the local variables of a single function call.
#[derive(Debug, Default)]
pub struct ActivationRecord {
    function: String,
    call_line: u32,
    vars: HashMap<String, Slot>,
}

impl ActivationRecord {
    fn new(function: String, call_line: u32) -> Self {
        Self {
            function,
            call_line,
            vars: HashMap::new(),
        }
    }

    /// Assigns a value. A first assignment creates the variable; later
    /// assignments write through the existing slot.
    pub fn define(&mut self, name: &str, value: Value) {
        match self.vars.get(name) {
            Some(slot) => *slot.borrow_mut() = value,
            None => {
                self.vars
                    .insert(name.to_string(), Rc::new(RefCell::new(value)));
            }
        }
    }

    /// Binds a name directly to an existing slot (parameter passing).
    pub fn bind(&mut self, name: &str, slot: Slot) {
        self.vars.insert(name.to_string(), slot);
    }

    /// Current value of a variable, if defined.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.vars.get(name).map(|s| s.borrow().clone())
    }

    /// The slot behind a variable, if defined.
    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.vars.get(name).cloned()
    }
}

/// The runtime call stack.
#[derive(Debug, Default)]
pub struct CallStack {
    records: Vec<ActivationRecord>,
}

impl CallStack {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a frame for `function`, called from `call_line`.
    pub fn push(&mut self, function: String, call_line: u32) {
        self.records.push(ActivationRecord::new(function, call_line));
    }

    pub fn pop(&mut self) {
        self.records.pop();
    }

    pub fn depth(&self) -> usize {
        self.records.len()
    }

    fn top(&self) -> Option<&ActivationRecord> {
        self.records.last()
    }

    fn top_mut(&mut self) -> Option<&mut ActivationRecord> {
        self.records.last_mut()
    }

    /// Assigns in the current frame. No-op outside any call.
    pub fn define(&mut self, name: &str, value: Value) {
        if let Some(rec) = self.top_mut() {
            rec.define(name, value);
        }
    }

    /// Binds a slot in the current frame.
    pub fn bind(&mut self, name: &str, slot: Slot) {
        if let Some(rec) = self.top_mut() {
            rec.bind(name, slot);
        }
    }

    /// Value of a variable in the current frame.
    pub fn value(&self, name: &str) -> Option<Value> {
        self.top().and_then(|rec| rec.value(name))
    }

    /// Slot of a variable in the current frame.
    pub fn slot(&self, name: &str) -> Option<Slot> {
        self.top().and_then(|rec| rec.slot(name))
    }

    /// Renders the stack for error reports, innermost frame first.
    /// `current_line` is the line executing in the top frame.
    pub fn render_trace(&self, current_line: u32) -> String {
        let mut out = String::from("stack trace (most recent call first):\n");
        let mut line = current_line;
        for rec in self.records.iter().rev() {
            let _ = writeln!(out, "  {} <line {}>", rec.function, line);
            let mut names: Vec<&String> = rec.vars.keys().collect();
            names.sort();
            if !names.is_empty() {
                let locals = names
                    .iter()
                    .map(|n| format!("{n} = {}", rec.vars[*n].borrow()))
                    .collect::<Vec<_>>()
                    .join(", ");
                let _ = writeln!(out, "    locals: {locals}");
            }
            line = rec.call_line;
        }
        out
    }
}
