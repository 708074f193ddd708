use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::engine::assets::catalog::CatalogLoader;

#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Hash, States)]
pub enum AppState {
    #[default]
    Loading,
    Running,
}

#[derive(Component)]
pub struct FpsText;

/// Once the catalog has landed as a resource the showroom can be spawned and
/// the interactive systems take over.
pub fn transition_to_running(
    loader: Res<CatalogLoader>,
    mut next_state: ResMut<NextState<AppState>>,
) {
    if loader.loaded {
        info!("Catalog ready, transitioning to Running state");
        next_state.set(AppState::Running);
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    for mut text in &mut query {
        if let Some(fps) = diagnostics.get(&FrameTimeDiagnosticsPlugin::FPS) {
            if let Some(value) = fps.smoothed() {
                text.0 = format!("FPS: {value:.1}");
            }
        }
    }
}
