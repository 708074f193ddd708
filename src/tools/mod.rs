//! Interactive tools for browsing and presenting garments.
//!
//! The picker owns the whole selection gesture, from hover glow through the
//! hold-to-commit threshold to catalog validation. The overlay is a passive
//! consumer: it waits for the presentation camera tween to land and then
//! shows the committed garment's title, description, tool list, and artwork.

/// Press-and-hold garment selection with hover raycasting and validation.
pub mod garment_picker;

/// Info panel revealed once the presentation pose is reached.
pub mod overlay;
