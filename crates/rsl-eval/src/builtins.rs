//! Robot built-in functions.
//!
//! These names are resolved before user functions and therefore cannot
//! be overridden:
//!
//! | name          | arguments                  | result |
//! |---------------|----------------------------|--------|
//! | `rSet`        | x, y, heading (float)      | void   |
//! | `rMove`       | distance (float)           | void   |
//! | `rTurn`       | degrees (float)            | void   |
//! | `oSet`        | x, y, sx, sy (float)       | void   |
//! | `rTrail`      | enabled (bool)             | void   |
//! | `rFeel`       | sensor 0..=7 (int)         | bool   |
//! | `rXPosition`  |                            | float  |
//! | `rYPosition`  |                            | float  |
//! | `rRotation`   |                            | float  |

use crate::error::{EvalError, EvalResult};
use crate::interp::Interpreter;
use crate::value::{fmt_float, Value};
use crate::world::WorldError;
use rsl_types::ast::Expr;
use std::io::Write;

const BUILTINS: &[&str] = &[
    "rSet",
    "rMove",
    "rTurn",
    "oSet",
    "rTrail",
    "rFeel",
    "rXPosition",
    "rYPosition",
    "rRotation",
];

pub(crate) fn is_builtin(name: &str) -> bool {
    BUILTINS.contains(&name)
}

impl<'p> Interpreter<'p> {
    pub(crate) fn call_builtin(&mut self, name: &str, args: &'p [Expr]) -> EvalResult<Value> {
        match name {
            "rSet" => self.builtin_set(args),
            "rMove" => self.builtin_move(args),
            "rTurn" => self.builtin_turn(args),
            "oSet" => self.builtin_obstacle(args),
            "rTrail" => self.builtin_trail(args),
            "rFeel" => self.builtin_feel(args),
            "rXPosition" => self.builtin_pose_query(name, args, |(x, _, _)| x),
            "rYPosition" => self.builtin_pose_query(name, args, |(_, y, _)| y),
            "rRotation" => self.builtin_pose_query(name, args, |(_, _, rot)| rot),
            _ => unreachable!("not a built-in: {name}"),
        }
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Argument helpers
    // ──────────────────────────────────────────────────────────────────────────

    fn check_arity(&self, name: &str, args: &[Expr], expected: usize) -> EvalResult<()> {
        if args.len() == expected {
            Ok(())
        } else {
            Err(EvalError::ArityMismatch {
                name: name.to_string(),
                line: self.line,
            })
        }
    }

    fn float_arg(&mut self, arg: &'p Expr) -> EvalResult<f32> {
        match self.eval_expr(arg)? {
            Value::Float(v) => Ok(v),
            other => Err(EvalError::ExpectedFloat {
                found: other.type_name(),
                line: self.line,
            }),
        }
    }

    fn int_arg(&mut self, arg: &'p Expr) -> EvalResult<i32> {
        match self.eval_expr(arg)? {
            Value::Int(v) => Ok(v),
            other => Err(EvalError::ExpectedInt {
                found: other.type_name(),
                line: self.line,
            }),
        }
    }

    fn bool_arg(&mut self, arg: &'p Expr) -> EvalResult<bool> {
        let value = self.eval_expr(arg)?;
        self.expect_bool(value)
    }

    fn require_positioned(&self) -> EvalResult<()> {
        if self.world.is_positioned() {
            Ok(())
        } else {
            Err(EvalError::NotPositioned { line: self.line })
        }
    }

    fn world_err(&self, e: WorldError) -> EvalError {
        match e {
            WorldError::NotPositioned => EvalError::NotPositioned { line: self.line },
            WorldError::PositionOutOfBounds => EvalError::PositionOutOfBounds { line: self.line },
            WorldError::ObstacleOutOfBounds => EvalError::ObstacleOutOfBounds { line: self.line },
            WorldError::ObstacleOverlapsRobot => {
                EvalError::ObstacleOverlapsRobot { line: self.line }
            }
            WorldError::BadSensorIndex(index) => EvalError::BadSensorIndex {
                index,
                line: self.line,
            },
        }
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Built-ins
    // ──────────────────────────────────────────────────────────────────────────

    /// `rSet(x, y, heading)`: places the robot at an absolute pose.
    fn builtin_set(&mut self, args: &'p [Expr]) -> EvalResult<Value> {
        self.check_arity("rSet", args, 3)?;
        let x = self.float_arg(&args[0])?;
        let y = self.float_arg(&args[1])?;
        let rot = self.float_arg(&args[2])?;

        let was_positioned = self.world.is_positioned();
        self.world
            .set_pose(x, y, rot)
            .map_err(|e| self.world_err(e))?;

        if let Some((px, py, prot)) = self.world.pose() {
            if self.txt_trace {
                let verb = if was_positioned {
                    "repositioned"
                } else {
                    "positioned"
                };
                writeln!(self.output, "Robot {verb}:").map_err(|e| self.io_err(e))?;
                writeln!(
                    self.output,
                    "X: {}, Y: {}, Rotation(Deg): {}",
                    fmt_float(px),
                    fmt_float(py),
                    fmt_float(prot)
                )
                .map_err(|e| self.io_err(e))?;
            }
            self.display.positioned(true);
            self.display.pose_updated(px, py, prot);
        }
        Ok(Value::Void)
    }

    /// `rMove(distance)`: moves along the heading, stopping silently
    /// at the first obstruction.
    fn builtin_move(&mut self, args: &'p [Expr]) -> EvalResult<Value> {
        self.require_positioned()?;
        self.check_arity("rMove", args, 1)?;
        let dist = self.float_arg(&args[0])?;

        self.world.advance(dist).map_err(|e| self.world_err(e))?;

        if let Some((px, py, prot)) = self.world.pose() {
            if self.txt_trace {
                writeln!(self.output, "Robot moved:").map_err(|e| self.io_err(e))?;
                writeln!(self.output, "X: {}, Y: {}", fmt_float(px), fmt_float(py))
                    .map_err(|e| self.io_err(e))?;
            }
            self.display.pose_updated(px, py, prot);
        }
        Ok(Value::Void)
    }

    /// `rTurn(degrees)`: rotates in place.
    fn builtin_turn(&mut self, args: &'p [Expr]) -> EvalResult<Value> {
        self.require_positioned()?;
        self.check_arity("rTurn", args, 1)?;
        let delta = self.float_arg(&args[0])?;

        self.world.turn(delta).map_err(|e| self.world_err(e))?;

        if let Some((px, py, prot)) = self.world.pose() {
            if self.txt_trace {
                writeln!(self.output, "Robot rotated:").map_err(|e| self.io_err(e))?;
                writeln!(self.output, "Rotation(Deg): {}", fmt_float(prot))
                    .map_err(|e| self.io_err(e))?;
            }
            self.display.pose_updated(px, py, prot);
        }
        Ok(Value::Void)
    }

    /// `oSet(x, y, sx, sy)`: adds a rectangular obstacle.
    fn builtin_obstacle(&mut self, args: &'p [Expr]) -> EvalResult<Value> {
        self.check_arity("oSet", args, 4)?;
        let x = self.float_arg(&args[0])?;
        let y = self.float_arg(&args[1])?;
        let sx = self.float_arg(&args[2])?;
        let sy = self.float_arg(&args[3])?;

        self.world
            .add_obstacle(x, y, sx, sy)
            .map_err(|e| self.world_err(e))?;

        if self.txt_trace {
            writeln!(self.output, "Obstacle set:").map_err(|e| self.io_err(e))?;
            writeln!(
                self.output,
                "X: {}, Y: {}, H. size: {}, V. size: {}",
                fmt_float(x),
                fmt_float(y),
                fmt_float(sx),
                fmt_float(sy)
            )
            .map_err(|e| self.io_err(e))?;
        }
        self.display.obstacle_added(x, y, sx, sy);
        Ok(Value::Void)
    }

    /// `rTrail(enabled)`: toggles trail drawing.
    fn builtin_trail(&mut self, args: &'p [Expr]) -> EvalResult<Value> {
        self.check_arity("rTrail", args, 1)?;
        let enabled = self.bool_arg(&args[0])?;

        self.world.set_trail(enabled);

        if self.txt_trace {
            let state = if enabled { "enabled" } else { "disabled" };
            writeln!(self.output, "Trailing {state}.").map_err(|e| self.io_err(e))?;
        }
        self.display.trail_changed(enabled);
        Ok(Value::Void)
    }

    /// `rFeel(sensor)`: probes one of the eight proximity sensors.
    fn builtin_feel(&mut self, args: &'p [Expr]) -> EvalResult<Value> {
        self.require_positioned()?;
        self.check_arity("rFeel", args, 1)?;
        let sensor = self.int_arg(&args[0])?;
        let sensed = self.world.feel(sensor).map_err(|e| self.world_err(e))?;
        Ok(Value::Bool(sensed))
    }

    /// `rXPosition()` / `rYPosition()` / `rRotation()`.
    fn builtin_pose_query(
        &mut self,
        name: &str,
        args: &'p [Expr],
        select: fn((f32, f32, f32)) -> f32,
    ) -> EvalResult<Value> {
        self.require_positioned()?;
        self.check_arity(name, args, 0)?;
        let pose = self
            .world
            .pose()
            .ok_or(EvalError::NotPositioned { line: self.line })?;
        Ok(Value::Float(select(pose)))
    }
}
