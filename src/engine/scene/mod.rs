//! Scene animation for the avatar and the orbiting garments.
//!
//! Provides the orbital carousel kinematics, the avatar's idle spin, and the
//! base-to-posed avatar swap that follows a committed selection.

/// Base and posed avatar lifecycle with their point-light rigs.
pub mod avatar;

/// Orbital carousel kinematics with hover slowdown and selection lock.
pub mod orbit;
