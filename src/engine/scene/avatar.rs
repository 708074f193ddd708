use bevy::asset::LoadState;
use bevy::prelude::*;

use crate::constants::{AVATAR_POSITION, AVATAR_SCALE, AVATAR_SPIN_SPEED};
use crate::engine::camera::showroom_camera::ShowroomCamera;
use crate::engine::render::dissolve::DissolveFinished;
use crate::tools::garment_picker::state::GarmentCommitted;

/// Root of whichever avatar is currently standing in the scene, base or
/// posed. Its light rig hangs off it as children so a single despawn clears
/// everything.
#[derive(Component)]
pub struct AvatarRoot;

/// The posed avatar requested at commit time. Loading starts immediately so
/// the swap after the dissolve hides most of the fetch latency.
#[derive(Resource, Default)]
pub struct PendingSwap(pub Option<PendingSwapData>);

pub struct PendingSwapData {
    pub key: String,
    pub scene: Handle<Scene>,
    failure_logged: bool,
}

enum LightRig {
    Base,
    Posed,
}

/// Spawn the neutral standing avatar with its three-point light rig.
pub fn spawn_base_avatar(commands: &mut Commands, scene: Handle<Scene>) {
    spawn_avatar(commands, scene, LightRig::Base);
}

fn spawn_avatar(commands: &mut Commands, scene: Handle<Scene>, rig: LightRig) {
    let mut root = commands.spawn((
        SceneRoot(scene),
        Transform::from_translation(AVATAR_POSITION).with_scale(Vec3::splat(AVATAR_SCALE)),
        AvatarRoot,
    ));

    // Offsets are in avatar-local units; the root scale places them around
    // the figure the same way the source page did.
    root.with_children(|parent| match rig {
        LightRig::Base => {
            parent.spawn((
                PointLight {
                    intensity: 1_500_000.0,
                    range: 10.0,
                    shadows_enabled: true,
                    ..default()
                },
                Transform::from_xyz(80.0, 140.0, 80.0),
            ));
            parent.spawn((
                PointLight {
                    intensity: 400_000.0,
                    range: 10.0,
                    ..default()
                },
                Transform::from_xyz(-80.0, 130.0, -80.0),
            ));
            parent.spawn((
                PointLight {
                    intensity: 400_000.0,
                    range: 10.0,
                    ..default()
                },
                Transform::from_xyz(50.0, 80.0, -50.0),
            ));
        }
        LightRig::Posed => {
            parent.spawn((
                PointLight {
                    intensity: 1_300_000.0,
                    range: 10.0,
                    shadows_enabled: true,
                    ..default()
                },
                Transform::from_xyz(-100.0, 150.0, 100.0),
            ));
            parent.spawn((
                PointLight {
                    intensity: 1_300_000.0,
                    range: 10.0,
                    ..default()
                },
                Transform::from_xyz(-100.0, 130.0, -100.0),
            ));
            parent.spawn((
                PointLight {
                    intensity: 1_300_000.0,
                    range: 10.0,
                    ..default()
                },
                Transform::from_xyz(100.0, 150.0, -100.0),
            ));
            parent.spawn((
                PointLight {
                    intensity: 1_500_000.0,
                    range: 10.0,
                    ..default()
                },
                Transform::from_xyz(100.0, 130.0, 100.0),
            ));
        }
    });
}

/// Constant slow yaw of the standing avatar, a fixed per-tick increment.
pub fn avatar_idle_spin(mut avatars: Query<&mut Transform, With<AvatarRoot>>) {
    for mut transform in &mut avatars {
        transform.rotate_y(AVATAR_SPIN_SPEED);
    }
}

/// Start fetching the posed avatar as soon as a garment commits.
pub fn stash_pending_swap(
    mut events: EventReader<GarmentCommitted>,
    asset_server: Res<AssetServer>,
    mut pending: ResMut<PendingSwap>,
) {
    for committed in events.read() {
        info!(
            "Requesting posed avatar {} for {}",
            committed.posed_avatar, committed.key
        );
        pending.0 = Some(PendingSwapData {
            key: committed.key.clone(),
            scene: asset_server
                .load(GltfAssetLabel::Scene(0).from_asset(committed.posed_avatar.clone())),
            failure_logged: false,
        });
    }
}

/// When the dissolve completes, replace the standing avatar with the posed
/// one and retarget the camera toward the presentation pose.
pub fn swap_avatar_on_dissolve(
    mut events: EventReader<DissolveFinished>,
    mut commands: Commands,
    pending: Res<PendingSwap>,
    mut rig: ResMut<ShowroomCamera>,
    avatars: Query<Entity, With<AvatarRoot>>,
) {
    for finished in events.read() {
        let Some(swap) = pending.0.as_ref() else {
            warn!("Dissolve finished for {} with no pending swap", finished.key);
            continue;
        };
        for avatar in &avatars {
            commands.entity(avatar).despawn();
        }
        info!("Swapping in posed avatar for {}", swap.key);
        spawn_avatar(&mut commands, swap.scene.clone(), LightRig::Posed);
        rig.begin_present_tween();
    }
}

/// A failed posed-avatar load leaves the stage empty; log it once so the
/// console says why.
pub fn log_swap_load_failure(asset_server: Res<AssetServer>, mut pending: ResMut<PendingSwap>) {
    let Some(swap) = pending.0.as_mut() else {
        return;
    };
    if swap.failure_logged {
        return;
    }
    if let Some(LoadState::Failed(err)) = asset_server.get_load_state(&swap.scene) {
        error!("Posed avatar for {} failed to load: {}", swap.key, err);
        swap.failure_logged = true;
    }
}
