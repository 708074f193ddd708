use bevy::prelude::*;
use bevy::window::{PrimaryWindow, SystemCursorIcon};
use bevy::winit::cursor::{CursorIcon, CustomCursor, CustomCursorImage};

use crate::engine::assets::catalog::GarmentCatalog;
use crate::engine::assets::garment_library::GarmentId;
use crate::engine::render::glow::GlowSignal;
use crate::engine::scene::orbit::Garment;
use crate::tools::garment_picker::ray::{ray_hits_garment, PickBounds};
use crate::tools::garment_picker::state::{SelectionPhase, SelectionSession};

/// Cast the pointer into the scene each frame and mark the nearest garment
/// under it. Hover only reacts while the session is still browsing; once a
/// press is armed or a commit is running the flags stay put.
pub fn hover_garments(
    windows: Query<&Window, With<PrimaryWindow>>,
    cameras: Query<(&Camera, &GlobalTransform), With<Camera3d>>,
    mut garments: Query<(
        Entity,
        &mut Garment,
        &GlobalTransform,
        &PickBounds,
        &ViewVisibility,
    )>,
    mut session: ResMut<SelectionSession>,
    mut glow: ResMut<GlowSignal>,
) {
    if !matches!(
        session.phase(),
        SelectionPhase::Idle | SelectionPhase::Hovered
    ) {
        return;
    }
    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };

    let hit = window.cursor_position().and_then(|cursor| {
        let ray = camera.viewport_to_world(camera_transform, cursor).ok()?;
        let mut best: Option<(Entity, f32)> = None;
        for (entity, garment, transform, bounds, visibility) in &garments {
            if garment.locked || !visibility.get() {
                continue;
            }
            if let Some(t) = ray_hits_garment(ray.origin, *ray.direction, transform, bounds) {
                if best.is_none_or(|(_, best_t)| t < best_t) {
                    best = Some((entity, t));
                }
            }
        }
        best.map(|(entity, _)| entity)
    });

    for (entity, mut garment, _, _, _) in &mut garments {
        garment.hovered = hit == Some(entity);
    }
    session.set_hovered(hit);
    match hit {
        Some(entity) => glow.hover(entity),
        None => glow.clear(),
    }
}

/// Swap the window cursor to the hovered garment's artwork, falling back to
/// the platform default when nothing is under the pointer. The icon is only
/// rewritten when the hover target changes.
pub fn update_hover_cursor(
    mut commands: Commands,
    windows: Query<Entity, With<PrimaryWindow>>,
    session: Res<SelectionSession>,
    garment_ids: Query<&GarmentId>,
    catalog: Res<GarmentCatalog>,
    asset_server: Res<AssetServer>,
    mut last: Local<Option<Entity>>,
) {
    let hovered = match session.phase() {
        SelectionPhase::Idle | SelectionPhase::Hovered | SelectionPhase::Armed => {
            session.candidate()
        }
        _ => None,
    };
    if hovered == *last {
        return;
    }
    *last = hovered;
    let Ok(window) = windows.single() else {
        return;
    };

    let custom = hovered
        .and_then(|entity| garment_ids.get(entity).ok())
        .and_then(|id| catalog.entry_for(&id.0))
        .and_then(|entry| entry.cursor.as_ref())
        .map(|path| {
            CursorIcon::Custom(CustomCursor::Image(CustomCursorImage {
                handle: asset_server.load(path.clone()),
                texture_atlas: None,
                flip_x: false,
                flip_y: false,
                rect: None,
                hotspot: (8, 8),
            }))
        });

    commands
        .entity(window)
        .insert(custom.unwrap_or(CursorIcon::System(SystemCursorIcon::Default)));
}
