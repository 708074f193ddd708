use bevy::prelude::*;
use bevy::window::PresentMode;

/// Primary window for the showroom. On the web the app renders into the page
/// canvas and tracks its size; natively it opens a regular vsynced window.
pub fn create_window_config() -> Window {
    #[cfg(target_arch = "wasm32")]
    {
        Window {
            canvas: Some("#showroom-canvas".into()),
            fit_canvas_to_parent: true,
            prevent_default_event_handling: true,
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        Window {
            title: "Garment Showroom".into(),
            present_mode: PresentMode::AutoVsync,
            ..default()
        }
    }
}
