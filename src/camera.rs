//! Orbit camera
//!
//! # Coordinate System
//!
//! Uses a **left-handed** world coordinate system:
//! - X: positive right
//! - Y: positive up
//! - Z: positive forward (into screen)
//!
//! # Orientation
//!
//! The camera sits on a sphere around a target point. Its position on the
//! sphere is stored as yaw/pitch angles plus a distance, and the view matrix
//! is rebuilt from them on demand.
//!
//! - **Yaw**: Rotation around the Y-axis (positive = orbit to the right)
//! - **Pitch**: Elevation above the XZ plane (positive = look down from above)

use crate::math::{Mat4, Vec3};
use crate::window::InputState;

/// Initial camera distance per unit of domain half-width.
pub const DISTANCE_FACTOR: f32 = 15.0;

const DEFAULT_YAW: f32 = 0.5;
const DEFAULT_PITCH: f32 = 0.5;
const MIN_DISTANCE: f32 = 0.1;

/// Camera orbiting a target point at a given distance.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    target: Vec3,
    distance: f32,
    yaw: f32,   // Rotation around Y-axis (radians)
    pitch: f32, // Elevation (radians)

    pitch_min: f32,
    pitch_max: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, DISTANCE_FACTOR)
    }
}

impl OrbitCamera {
    /// Creates a camera looking at `target` from `distance` away, slightly
    /// above and to the right.
    pub fn new(target: Vec3, distance: f32) -> Self {
        Self {
            target,
            distance: distance.max(MIN_DISTANCE),
            yaw: DEFAULT_YAW,
            pitch: DEFAULT_PITCH,
            pitch_min: -89.0_f32.to_radians(),
            pitch_max: 89.0_f32.to_radians(),
        }
    }

    /// Creates a camera framing a plot of domain half-width `half_width`.
    pub fn for_half_width(half_width: f64) -> Self {
        Self::new(Vec3::ZERO, framing_distance(half_width))
    }

    // =========================================================================
    // Orientation
    // =========================================================================

    /// Orbits by yaw (horizontal) and pitch (vertical) deltas in radians.
    /// Pitch is clamped so the camera never flips over the pole.
    pub fn orbit(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.yaw = (self.yaw + yaw_delta).rem_euclid(std::f32::consts::TAU);
        self.pitch = (self.pitch + pitch_delta).clamp(self.pitch_min, self.pitch_max);
    }

    /// Scales the distance to the target. Factors below 1 move closer.
    pub fn zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.distance = (self.distance * factor).max(MIN_DISTANCE);
        }
    }

    /// Resets the distance for a new domain half-width, keeping the angles.
    pub fn frame(&mut self, half_width: f64) {
        self.distance = framing_distance(half_width);
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// World-space position of the eye.
    pub fn position(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let offset = Vec3::new(cos_pitch * sin_yaw, sin_pitch, -cos_pitch * cos_yaw);
        self.target + offset * self.distance
    }

    /// Unit vector from the eye toward the target.
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position()).normalize()
    }

    /// Computes the view matrix for the rendering pipeline.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_lh(self.position(), self.target, Vec3::UP)
    }
}

fn framing_distance(half_width: f64) -> f32 {
    (half_width as f32 * DISTANCE_FACTOR).max(MIN_DISTANCE)
}

// =============================================================================
// Camera Controller
// =============================================================================

/// Mouse handling for orbit camera movement.
#[derive(Debug, Clone)]
pub struct OrbitCameraController {
    /// Orbit speed in radians per pixel of drag.
    pub orbit_sensitivity: f32,
    /// Distance multiplier per wheel notch.
    pub zoom_step: f32,
}

impl Default for OrbitCameraController {
    fn default() -> Self {
        Self {
            orbit_sensitivity: 0.005,
            zoom_step: 0.9,
        }
    }
}

impl OrbitCameraController {
    pub fn new(orbit_sensitivity: f32, zoom_step: f32) -> Self {
        Self {
            orbit_sensitivity,
            zoom_step,
        }
    }

    /// Updates the camera based on input state.
    ///
    /// # Input Mapping
    /// - Left-button drag: orbit around the target
    /// - Wheel up/down: zoom in/out
    pub fn update(&self, camera: &mut OrbitCamera, input: &InputState) {
        let (dx, dy) = input.drag_delta;
        if dx != 0 || dy != 0 {
            camera.orbit(
                -dx as f32 * self.orbit_sensitivity,
                dy as f32 * self.orbit_sensitivity,
            );
        }
        if input.wheel != 0 {
            camera.zoom(self.zoom_step.powi(input.wheel));
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
