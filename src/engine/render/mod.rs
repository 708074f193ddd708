//! Rendering effects layered over the stock PBR pipeline.
//!
//! The glow boosts a hovered garment's emissives so the camera's bloom pass
//! picks them up; the dissolve replaces a committed garment with a burst of
//! additive points that collapse onto the avatar.

/// Point-cloud dissolve transition with its custom material.
pub mod dissolve;

/// Hover and hold glow driven through emissive boosts and bloom.
pub mod glow;
