use bevy::prelude::*;
use bevy::render::mesh::MeshAabb;
use bevy::render::primitives::Aabb;
use rand::Rng;

use crate::constants::{GARMENT_SCALE, ORBIT_RADIUS};
use crate::engine::assets::catalog::GarmentCatalog;
use crate::engine::scene::avatar::spawn_base_avatar;
use crate::engine::scene::orbit::Garment;
use crate::tools::garment_picker::ray::PickBounds;

/// Ownership tag attached to every garment root at load time, derived from
/// the catalog key. The last resort of name resolution reads this instead of
/// re-deriving anything from asset paths per click.
#[derive(Component, Debug, Clone)]
pub struct GarmentId(pub String);

/// Spawn the base avatar and one orbiting root per catalog entry. Each GLB
/// scene streams in on its own; garments pop into view in whatever order
/// their assets finish loading.
pub fn spawn_showroom(
    mut commands: Commands,
    catalog: Res<GarmentCatalog>,
    asset_server: Res<AssetServer>,
) {
    spawn_base_avatar(
        &mut commands,
        asset_server.load(GltfAssetLabel::Scene(0).from_asset(catalog.avatar_base.clone())),
    );

    let count = catalog.garments.len();
    let mut rng = rand::rng();
    for (index, entry) in catalog.garments.iter().enumerate() {
        let garment = Garment::new(
            index,
            count,
            ORBIT_RADIUS,
            rng.random_range(0.0..std::f32::consts::TAU),
        );
        let position = garment.position();
        info!("Loading garment {} from {}", entry.key, entry.model);
        commands
            .spawn((
                SceneRoot(asset_server.load(GltfAssetLabel::Scene(0).from_asset(entry.model.clone()))),
                Transform::from_translation(position).with_scale(Vec3::splat(GARMENT_SCALE)),
                Name::new(entry.key.clone()),
                GarmentId(entry.key.clone()),
                garment,
            ))
            .with_children(|parent| {
                // Two-point mini rig per garment, as on the source page.
                parent.spawn((
                    PointLight {
                        intensity: 100_000.0,
                        range: 2.0,
                        ..default()
                    },
                    Transform::from_xyz(1.0, 1.0, 1.0),
                ));
                parent.spawn((
                    PointLight {
                        intensity: 100_000.0,
                        range: 2.0,
                        ..default()
                    },
                    Transform::from_xyz(-1.0, 1.0, 1.0),
                ));
            });
    }
}

/// Merge mesh AABBs into a root-local picking volume once a garment's scene
/// has instantiated. Runs until every garment has bounds; garments whose
/// meshes are not in yet are retried next frame.
pub fn compute_pick_bounds(
    mut commands: Commands,
    pending: Query<(Entity, &GlobalTransform), (With<Garment>, Without<PickBounds>)>,
    children: Query<&Children>,
    mesh_entities: Query<(&Mesh3d, &GlobalTransform)>,
    meshes: Res<Assets<Mesh>>,
) {
    for (root, root_xf) in &pending {
        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        let mut found = false;

        let root_inv = root_xf.compute_matrix().inverse();
        let mut queue = vec![root];
        while let Some(entity) = queue.pop() {
            if let Ok((mesh_handle, mesh_xf)) = mesh_entities.get(entity) {
                if let Some(aabb) = meshes.get(&mesh_handle.0).and_then(Mesh::compute_aabb) {
                    found = true;
                    for corner in aabb_corners(&aabb) {
                        let world = mesh_xf.transform_point(corner);
                        let local = root_inv.transform_point3(world);
                        min = min.min(local);
                        max = max.max(local);
                    }
                }
            }
            if let Ok(c) = children.get(entity) {
                queue.extend(c.iter());
            }
        }

        if found {
            commands.entity(root).insert(PickBounds {
                center: (min + max) * 0.5,
                size: max - min,
            });
        }
    }
}

fn aabb_corners(aabb: &Aabb) -> [Vec3; 8] {
    let c = Vec3::from(aabb.center);
    let h = Vec3::from(aabb.half_extents);
    [
        c + Vec3::new(-h.x, -h.y, -h.z),
        c + Vec3::new(h.x, -h.y, -h.z),
        c + Vec3::new(-h.x, h.y, -h.z),
        c + Vec3::new(h.x, h.y, -h.z),
        c + Vec3::new(-h.x, -h.y, h.z),
        c + Vec3::new(h.x, -h.y, h.z),
        c + Vec3::new(-h.x, h.y, h.z),
        c + Vec3::new(h.x, h.y, h.z),
    ]
}
