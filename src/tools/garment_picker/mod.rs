//! Press-and-hold garment selection.
//!
//! Hover raycasting, the hold-to-commit gesture, and catalog validation for
//! the orbiting garments. Selection is a one-shot flow: once a garment is
//! committed the showroom transitions to presentation and never returns to
//! browsing.
//!
//! ### Selection Flow
//!
//! ```text
//! Pointer move
//!   └─> hover_garments()           raycast, nearest hit wins
//!       └─> Idle <-> Hovered       glow follows the hover target
//! Pointer down
//!   └─> press_garment()            Hovered -> Armed, hold timer starts
//! Pointer up
//!   └─> release_garment()
//!       ├─> < 500 ms               Armed -> Hovered, glow fades out
//!       └─> >= 500 ms              resolve name -> catalog lookup
//!           ├─> no entry           Armed -> Hovered, warn
//!           └─> entry found        Committed, others hidden,
//!                                  GarmentCommitted fired
//! Dissolve finished
//!   └─> Replacing -> camera present tween -> Done (terminal)
//! ```
//!
//! Name resolution tries the root's `Name`, the parent's, the first child's,
//! and finally the `GarmentId` tag stamped at load time. Catalog lookup is
//! exact first, then substring in either direction.

/// Hold-to-commit press/release handling and garment name resolution.
pub mod commit;

/// Pointer hover raycasting with per-garment cursor artwork.
pub mod hover;

/// Slab-method ray tests against garment-local picking volumes.
pub mod ray;

/// Selection session state machine and the `GarmentCommitted` event.
pub mod state;

use bevy::prelude::*;

use crate::engine::camera::showroom_camera::{CameraTweenFinished, TweenKind};
use state::SelectionSession;

/// Seal the session once the presentation tween lands.
pub fn finish_on_presented(
    mut events: EventReader<CameraTweenFinished>,
    mut session: ResMut<SelectionSession>,
) {
    for event in events.read() {
        if event.kind == TweenKind::Present {
            session.finish();
        }
    }
}
