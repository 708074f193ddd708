//! Asset management for the garment catalog and showroom scenes.
//!
//! Handles the JSON catalog that drives the whole page, GLB scene spawning
//! for the avatar and garments, and picking-volume derivation once scenes
//! have instantiated.

/// Garment catalog asset with name-to-entry resolution and dissolve colours.
pub mod catalog;

/// Avatar and garment spawning plus root-local picking bounds.
pub mod garment_library;
