//! Tuning constants for the showroom interaction and presentation.

use bevy::prelude::*;

// Orbit kinematics. Orbit speed is a per-tick increment, not scaled by frame
// time; self-rotation mixes a dt-scaled term with a fixed per-tick drift.
pub const BASE_ORBIT_SPEED: f32 = 0.002;
pub const ORBIT_SMOOTHING: f32 = 0.2;
pub const BASE_ROTATION_SPEED: f32 = 1.0;
pub const SLOW_ROTATION_SPEED: f32 = 0.1;
pub const ROTATION_SMOOTHING: f32 = 0.02;
pub const ROTATION_DRIFT: f32 = 0.01;
pub const ORBIT_RADIUS: f32 = 2.0;

// Outline glow fed to the bloom stage via emissive.
pub const GLOW_DEFAULT: f32 = 0.5;
pub const GLOW_MAX: f32 = 3.0;
pub const GLOW_HOLD_DURATION_MS: f64 = 1000.0;
pub const GLOW_FADE_MS: f64 = 500.0;

// Hold this long before a release commits the selection.
pub const ACTIVATION_HOLD_MS: f64 = 500.0;

// Dissolve transition.
pub const DISSOLVE_DURATION_S: f32 = 1.6;
pub const DISSOLVE_CLUSTER_COUNT: usize = 9;
pub const DISSOLVE_CLUSTER_RANGE: f32 = 0.75;
pub const DISSOLVE_JITTER: f32 = 0.01;
pub const DISSOLVE_FALLBACK_COLOUR: [f32; 3] = [0.85, 0.85, 0.95];

// Scene placement.
pub const GARMENT_SCALE: f32 = 0.5;
pub const AVATAR_SCALE: f32 = 0.008;
pub const AVATAR_POSITION: Vec3 = Vec3::new(0.0, -0.6, 0.0);
pub const AVATAR_SPIN_SPEED: f32 = 0.005;

// Camera rig.
pub const CAMERA_START_POSITION: Vec3 = Vec3::new(0.0, 1.2, 6.0);
pub const CAMERA_START_TARGET: Vec3 = Vec3::new(0.0, 0.5, 0.0);
pub const CAMERA_MOVEMENT_SPEED: f32 = 0.1;
pub const CAMERA_DAMPING: f32 = 12.0;
pub const CAMERA_MIN_DISTANCE: f32 = 0.5;
pub const CAMERA_MAX_DISTANCE: f32 = 10.0;
pub const CAMERA_RESET_POSITION: Vec3 = Vec3::new(0.0, 1.2, 3.0);

// Presentation pose after the avatar swap.
pub const PRESENT_POSITION: Vec3 = Vec3::new(0.0, 1.2, 3.0);
pub const PRESENT_TARGET: Vec3 = Vec3::new(0.0, 0.5, 0.0);
pub const PRESENT_TWEEN_S: f32 = 1.0;
pub const PRESENT_MIN_DISTANCE: f32 = 1.5;
pub const PRESENT_MAX_DISTANCE: f32 = 4.0;

// World-space focal point the dissolve particles converge on.
pub const DISSOLVE_FOCAL_POINT: Vec3 = PRESENT_TARGET;
