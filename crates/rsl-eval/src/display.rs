//! Display listener interface.
//!
//! The evaluator reports world changes through this trait so that a
//! graphical front end can mirror the simulation. All methods have
//! empty default bodies; listeners override what they need.

/// Receives world-state change notifications during execution.
pub trait DisplayListener {
    /// The robot pose changed.
    fn pose_updated(&mut self, _x: f32, _y: f32, _heading: f32) {}

    /// The robot became positioned (or lost its position).
    fn positioned(&mut self, _positioned: bool) {}

    /// An obstacle was added.
    fn obstacle_added(&mut self, _x: f32, _y: f32, _size_x: f32, _size_y: f32) {}

    /// Trail drawing was toggled.
    fn trail_changed(&mut self, _enabled: bool) {}
}

/// A listener that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl DisplayListener for NullDisplay {}
