use bevy::asset::AssetMetaCheck;
use bevy::diagnostic::FrameTimeDiagnosticsPlugin;
use bevy::prelude::*;
use bevy_common_assets::json::JsonAssetPlugin;

// Crate engine modules
use crate::engine::assets::catalog::{CatalogLoader, GarmentCatalog, load_catalog};
use crate::engine::assets::garment_library::{compute_pick_bounds, spawn_showroom};
use crate::engine::camera::showroom_camera::{
    CameraTweenFinished, camera_controller, spawn_showroom_camera,
};
use crate::engine::render::dissolve::{
    DissolveFinished, DissolveMaterial, begin_dissolve, update_dissolves,
};
use crate::engine::render::glow::{GlowApplied, GlowSignal, apply_glow, update_glow};
use crate::engine::scene::avatar::{
    PendingSwap, avatar_idle_spin, log_swap_load_failure, stash_pending_swap,
    swap_avatar_on_dissolve,
};
use crate::engine::scene::orbit::garment_kinematics;

// Crate tools modules
use crate::tools::garment_picker::commit::{press_garment, release_garment};
use crate::tools::garment_picker::finish_on_presented;
use crate::tools::garment_picker::hover::{hover_garments, update_hover_cursor};
use crate::tools::garment_picker::state::{GarmentCommitted, SelectionSession};
use crate::tools::overlay::{PresentedGarment, remember_committed, reveal_overlay, spawn_overlay};

use crate::engine::core::app_state::{AppState, transition_to_running};
use crate::engine::core::window_config::create_window_config;

#[cfg(not(target_arch = "wasm32"))]
use crate::engine::core::app_state::{FpsText, fps_text_update_system};

pub fn create_app() -> App {
    let mut app = App::new();

    app.add_plugins(create_default_plugins())
        .init_state::<AppState>()
        .add_plugins(MaterialPlugin::<DissolveMaterial>::default())
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        // Registers GarmentCatalog as a loadable asset type from JSON files.
        .add_plugins(JsonAssetPlugin::<GarmentCatalog>::new(&["json"]));

    // Initialise resources early
    app.init_resource::<CatalogLoader>()
        .init_resource::<SelectionSession>()
        .init_resource::<GlowSignal>()
        .init_resource::<GlowApplied>()
        .init_resource::<PendingSwap>()
        .init_resource::<PresentedGarment>()
        .add_event::<GarmentCommitted>()
        .add_event::<DissolveFinished>()
        .add_event::<CameraTweenFinished>();

    // State-based system scheduling
    app.add_systems(Startup, (setup, spawn_showroom_camera, spawn_overlay))
        .add_systems(
            Update,
            (load_catalog, transition_to_running)
                .chain()
                .run_if(in_state(AppState::Loading)),
        )
        .add_systems(OnEnter(AppState::Running), spawn_showroom);

    // Runtime systems, ordered so a frame's hover feeds its press/release
    // and a commit reaches the dissolve before the avatar swap.
    let runtime_systems = (
        compute_pick_bounds,
        garment_kinematics,
        avatar_idle_spin,
        hover_garments,
        update_hover_cursor,
        press_garment,
        release_garment,
        update_glow,
        apply_glow,
        begin_dissolve,
        stash_pending_swap,
        update_dissolves,
        swap_avatar_on_dissolve,
        log_swap_load_failure,
        camera_controller,
        finish_on_presented,
        remember_committed,
        reveal_overlay,
    );

    app.add_systems(
        Update,
        runtime_systems.chain().run_if(in_state(AppState::Running)),
    );

    // FPS readout in a corner for native builds.
    #[cfg(not(target_arch = "wasm32"))]
    {
        app.add_systems(Update, fps_text_update_system);
    }

    app
}

fn spawn_lighting(commands: &mut Commands) {
    commands.insert_resource(AmbientLight {
        color: Color::WHITE,
        brightness: 300.0,
        ..default()
    });
    commands.spawn((
        DirectionalLight {
            illuminance: 4_000.0,
            shadows_enabled: false,
            ..default()
        },
        Transform::from_rotation(Quat::from_euler(
            EulerRot::ZYX,
            0.0,
            1.0,
            -std::f32::consts::FRAC_PI_4,
        )),
    ));
}

// Startup system that only handles basic initialisation
fn setup(mut commands: Commands) {
    spawn_lighting(&mut commands);

    #[cfg(not(target_arch = "wasm32"))]
    {
        create_native_overlays(&mut commands);
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn create_native_overlays(commands: &mut Commands) {
    commands
        .spawn(Node {
            width: Val::Percent(100.0),
            height: Val::Percent(100.0),
            ..default()
        })
        .with_children(|parent| {
            parent.spawn((
                Text::new("FPS: "),
                TextFont {
                    font_size: 16.0,
                    ..default()
                },
                TextColor(Color::srgb(1., 0., 0.)),
                Node {
                    position_type: PositionType::Absolute,
                    bottom: Val::Px(12.0),
                    right: Val::Px(12.0),
                    ..default()
                },
                FpsText,
            ));
        });
}

fn create_default_plugins() -> impl PluginGroup {
    let window_config = WindowPlugin {
        primary_window: Some(create_window_config()),
        ..default()
    };

    let asset_config = AssetPlugin {
        meta_check: AssetMetaCheck::Never,
        ..default()
    };

    DefaultPlugins.set(window_config).set(asset_config)
}
