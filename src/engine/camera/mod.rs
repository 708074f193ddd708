//! Showroom camera for browsing and presentation.
//!
//! Provides keyboard pan and scroll dolly while browsing, eased tweens to
//! fixed poses, and tightened constraints once a garment is presented.

/// Camera rig resource, tweening, and the per-frame controller system.
pub mod showroom_camera;
