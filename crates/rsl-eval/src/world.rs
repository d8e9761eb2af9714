//! Robot simulation world.
//!
//! A square arena with a disk-shaped robot and axis-aligned rectangular
//! obstacles. The robot pose is a centre position plus a heading in
//! degrees, normalized to `[0, 360)`. All geometry checks keep a small
//! clearance margin around the robot.

use thiserror::Error;

/// Side length of the square arena.
pub const ENV_SIZE: f32 = 50.0;
/// Robot radius.
pub const R_SIZE: f32 = 1.0;
/// Clearance margin kept between the robot and walls or obstacles.
pub const C_MARGIN: f32 = 0.01;
/// Distance covered by one movement integration step.
pub const SPEED: f32 = 0.00001;
/// Distance from the robot centre to a sensor probe point.
pub const SENSOR_R: f32 = 1.1;

/// An axis-aligned rectangular obstacle, given by centre and size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Obstacle {
    pub x: f32,
    pub y: f32,
    pub size_x: f32,
    pub size_y: f32,
}

/// Failures of world operations, without source locations. The
/// evaluator attaches the current line when reporting these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum WorldError {
    #[error("robot is not positioned yet")]
    NotPositioned,
    #[error("position out of bounds")]
    PositionOutOfBounds,
    #[error("obstacle out of bounds")]
    ObstacleOutOfBounds,
    #[error("obstacle overlaps with robot")]
    ObstacleOverlapsRobot,
    #[error("incorrect sensor number {0}")]
    BadSensorIndex(i32),
}

/// The simulation state: robot pose, trail flag, and obstacles.
#[derive(Debug)]
pub struct World {
    x: f32,
    y: f32,
    rot: f32,
    positioned: bool,
    trail: bool,
    obstacles: Vec<Obstacle>,
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

impl World {
    pub fn new() -> Self {
        Self {
            x: -1.0,
            y: -1.0,
            rot: 0.0,
            positioned: false,
            trail: false,
            obstacles: Vec::new(),
        }
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Geometry
    // ──────────────────────────────────────────────────────────────────────────

    /// Whether a robot centred at `(x, y)` fits inside the arena with
    /// the clearance margin.
    fn in_bounds(x: f32, y: f32) -> bool {
        x - R_SIZE - C_MARGIN >= 0.0
            && x + R_SIZE + C_MARGIN <= ENV_SIZE
            && y - R_SIZE - C_MARGIN >= 0.0
            && y + R_SIZE + C_MARGIN <= ENV_SIZE
    }

    /// Disk-vs-rectangle intersection test for a robot centred at
    /// `(x, y)` against one obstacle.
    fn hits(x: f32, y: f32, obs: &Obstacle) -> bool {
        let cdx = (x - obs.x).abs();
        let cdy = (y - obs.y).abs();

        if cdx > obs.size_x / 2.0 + R_SIZE {
            return false;
        }
        if cdy > obs.size_y / 2.0 + R_SIZE {
            return false;
        }
        if cdx <= obs.size_x / 2.0 {
            return true;
        }
        if cdy <= obs.size_y / 2.0 {
            return true;
        }

        // Corner case: compare the distance to the nearest corner
        // against the robot radius.
        let dx = cdx - obs.size_x / 2.0;
        let dy = cdy - obs.size_y / 2.0;
        dx * dx + dy * dy <= R_SIZE * R_SIZE
    }

    /// Whether a robot centred at `(x, y)` touches any obstacle.
    fn collides(&self, x: f32, y: f32) -> bool {
        self.obstacles.iter().any(|obs| Self::hits(x, y, obs))
    }

    fn free(&self, x: f32, y: f32) -> bool {
        !self.collides(x, y) && Self::in_bounds(x, y)
    }

    // ──────────────────────────────────────────────────────────────────────────
    // Operations
    // ──────────────────────────────────────────────────────────────────────────

    /// Places the robot at an absolute pose. The heading is normalized
    /// to `[0, 360)`. On failure the previous pose is kept.
    pub fn set_pose(&mut self, x: f32, y: f32, rot: f32) -> Result<(), WorldError> {
        if !Self::in_bounds(x, y) {
            return Err(WorldError::PositionOutOfBounds);
        }
        self.x = x;
        self.y = y;
        self.rot = rot.rem_euclid(360.0);
        self.positioned = true;
        Ok(())
    }

    /// Moves the robot along its heading. Negative distances move
    /// backwards. Movement is integrated in small steps and stops
    /// silently at the first obstruction, leaving the robot at the
    /// last free position.
    pub fn advance(&mut self, dist: f32) -> Result<(), WorldError> {
        if !self.positioned {
            return Err(WorldError::NotPositioned);
        }
        let rad = self.rot.to_radians();
        let (step_x, step_y) = (SPEED * rad.cos(), SPEED * rad.sin());

        let (mut last_x, mut last_y) = (self.x, self.y);
        let mut remaining = dist;
        if remaining < 0.0 {
            while remaining < 0.0 && self.free(self.x, self.y) {
                last_x = self.x;
                last_y = self.y;
                self.x -= step_x;
                self.y -= step_y;
                remaining += SPEED;
            }
        } else {
            while remaining > 0.0 && self.free(self.x, self.y) {
                last_x = self.x;
                last_y = self.y;
                self.x += step_x;
                self.y += step_y;
                remaining -= SPEED;
            }
        }

        // Commit the last position known to be free.
        self.x = last_x;
        self.y = last_y;
        Ok(())
    }

    /// Rotates the robot in place by `delta` degrees.
    pub fn turn(&mut self, delta: f32) -> Result<(), WorldError> {
        if !self.positioned {
            return Err(WorldError::NotPositioned);
        }
        self.rot = (self.rot + delta).rem_euclid(360.0);
        Ok(())
    }

    /// Adds an obstacle. It must not touch the robot and must lie
    /// entirely inside the arena.
    pub fn add_obstacle(&mut self, x: f32, y: f32, size_x: f32, size_y: f32) -> Result<(), WorldError> {
        let obs = Obstacle {
            x,
            y,
            size_x,
            size_y,
        };
        if Self::hits(self.x, self.y, &obs) {
            return Err(WorldError::ObstacleOverlapsRobot);
        }
        let inside = x - size_x / 2.0 >= 0.0
            && x + size_x / 2.0 <= ENV_SIZE
            && y - size_y / 2.0 >= 0.0
            && y + size_y / 2.0 <= ENV_SIZE;
        if !inside {
            return Err(WorldError::ObstacleOutOfBounds);
        }
        self.obstacles.push(obs);
        Ok(())
    }

    /// Probes sensor `index` (0..=7, at 45 degree increments starting
    /// from the heading). Returns `true` if the probe point would be an
    /// obstructed robot position. The pose is left untouched.
    pub fn feel(&self, index: i32) -> Result<bool, WorldError> {
        if !self.positioned {
            return Err(WorldError::NotPositioned);
        }
        if !(0..=7).contains(&index) {
            return Err(WorldError::BadSensorIndex(index));
        }
        let rad = (self.rot + 45.0 * index as f32).to_radians();
        let px = self.x + SENSOR_R * rad.cos();
        let py = self.y + SENSOR_R * rad.sin();
        Ok(!self.free(px, py))
    }

    pub fn set_trail(&mut self, on: bool) {
        self.trail = on;
    }

    pub fn trail(&self) -> bool {
        self.trail
    }

    pub fn is_positioned(&self) -> bool {
        self.positioned
    }

    /// The current pose `(x, y, heading)`, if the robot is positioned.
    pub fn pose(&self) -> Option<(f32, f32, f32)> {
        self.positioned.then_some((self.x, self.y, self.rot))
    }

    pub fn x(&self) -> Result<f32, WorldError> {
        if !self.positioned {
            return Err(WorldError::NotPositioned);
        }
        Ok(self.x)
    }

    pub fn y(&self) -> Result<f32, WorldError> {
        if !self.positioned {
            return Err(WorldError::NotPositioned);
        }
        Ok(self.y)
    }

    pub fn rotation(&self) -> Result<f32, WorldError> {
        if !self.positioned {
            return Err(WorldError::NotPositioned);
        }
        Ok(self.rot)
    }

    pub fn obstacles(&self) -> &[Obstacle] {
        &self.obstacles
    }
}

// ══════════════════════════════════════════════════════════════════════════════
// Tests
// ══════════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_pose_rejects_positions_near_walls() {
        let mut w = World::new();
        assert_eq!(
            w.set_pose(0.5, 25.0, 0.0),
            Err(WorldError::PositionOutOfBounds)
        );
        assert!(!w.is_positioned());
        assert!(w.set_pose(1.5, 25.0, 0.0).is_ok());
    }

    #[test]
    fn failed_set_pose_keeps_previous_pose() {
        let mut w = World::new();
        w.set_pose(25.0, 25.0, 90.0).unwrap();
        assert!(w.set_pose(0.5, 25.0, 0.0).is_err());
        assert_eq!(w.pose(), Some((25.0, 25.0, 90.0)));
    }

    #[test]
    fn heading_is_normalized() {
        let mut w = World::new();
        w.set_pose(25.0, 25.0, -90.0).unwrap();
        assert_eq!(w.rotation().unwrap(), 270.0);
        w.turn(450.0).unwrap();
        assert_eq!(w.rotation().unwrap(), 0.0);
    }

    #[test]
    fn operations_require_positioning() {
        let mut w = World::new();
        assert_eq!(w.advance(1.0), Err(WorldError::NotPositioned));
        assert_eq!(w.turn(90.0), Err(WorldError::NotPositioned));
        assert_eq!(w.feel(0), Err(WorldError::NotPositioned));
        assert_eq!(w.x(), Err(WorldError::NotPositioned));
    }

    #[test]
    fn advance_stops_at_the_wall() {
        let mut w = World::new();
        w.set_pose(2.0, 25.0, 180.0).unwrap();
        w.advance(5.0).unwrap();
        let x = w.x().unwrap();
        // The margin requires roughly x >= 1.01.
        assert!(x > 1.0099, "x = {x}");
        assert!(x < 1.02, "x = {x}");
    }

    #[test]
    fn advance_stops_at_an_obstacle() {
        let mut w = World::new();
        w.set_pose(5.0, 25.0, 0.0).unwrap();
        w.add_obstacle(10.0, 25.0, 2.0, 2.0).unwrap();
        w.advance(20.0).unwrap();
        let x = w.x().unwrap();
        // Contact at x = 8.0 (obstacle half-width plus robot radius).
        assert!(x < 8.0, "x = {x}");
        assert!(x > 7.99, "x = {x}");
    }

    #[test]
    fn disk_rectangle_corner_test() {
        let obs = Obstacle {
            x: 10.0,
            y: 10.0,
            size_x: 2.0,
            size_y: 2.0,
        };
        assert!(World::hits(11.7, 11.7, &obs));
        assert!(!World::hits(11.8, 11.8, &obs));
        assert!(World::hits(10.0, 11.9, &obs));
        assert!(!World::hits(10.0, 12.1, &obs));
    }

    #[test]
    fn obstacle_validation_order() {
        let mut w = World::new();
        w.set_pose(25.0, 25.0, 0.0).unwrap();
        assert_eq!(
            w.add_obstacle(25.0, 25.0, 2.0, 2.0),
            Err(WorldError::ObstacleOverlapsRobot)
        );
        assert_eq!(
            w.add_obstacle(0.5, 25.0, 2.0, 2.0),
            Err(WorldError::ObstacleOutOfBounds)
        );
        assert!(w.add_obstacle(10.0, 10.0, 2.0, 2.0).is_ok());
        assert_eq!(w.obstacles().len(), 1);
    }

    #[test]
    fn feel_senses_walls_and_obstacles() {
        let mut w = World::new();
        w.set_pose(1.5, 25.0, 180.0).unwrap();
        // Sensor 0 probes towards the wall, sensor 4 away from it.
        assert_eq!(w.feel(0), Ok(true));
        assert_eq!(w.feel(4), Ok(false));
        assert_eq!(w.feel(8), Err(WorldError::BadSensorIndex(8)));
        // Probing never moves the robot.
        assert_eq!(w.pose(), Some((1.5, 25.0, 180.0)));
    }
}
