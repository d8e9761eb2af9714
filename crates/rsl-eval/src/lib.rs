//! RSL tree-walking evaluator.
//!
//! Executes RSL programs directly from the typed AST: expression
//! evaluation, statement execution, the function-call protocol with
//! by-value/by-reference parameters, and the robot simulation built-ins.

mod builtins;
mod display;
mod error;
mod interp;
mod stack;
mod tracer;
mod value;
mod world;

pub use display::{DisplayListener, NullDisplay};
pub use error::{EvalError, EvalResult};
pub use interp::Interpreter;
pub use stack::{ActivationRecord, CallStack, Slot};
pub use tracer::{CallTracer, ParamBinding, TextTracer};
pub use value::Value;
pub use world::{Obstacle, World, WorldError, C_MARGIN, ENV_SIZE, R_SIZE, SENSOR_R, SPEED};
