use bevy::prelude::*;
use bevy::render::mesh::{PrimitiveTopology, VertexAttributeValues};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{AsBindGroup, ShaderRef};
use rand::Rng;

use crate::constants::{
    DISSOLVE_CLUSTER_COUNT, DISSOLVE_CLUSTER_RANGE, DISSOLVE_DURATION_S, DISSOLVE_FOCAL_POINT,
    DISSOLVE_JITTER,
};
use crate::tools::garment_picker::state::{GarmentCommitted, SelectionSession};

/// Additive, depth-non-writing point material for dissolve particles.
/// `params` packs the particle colour in xyz and the current alpha in w.
#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct DissolveMaterial {
    #[uniform(0)]
    pub params: Vec4,
}

impl Material for DissolveMaterial {
    fn vertex_shader() -> ShaderRef {
        "shaders/dissolve.wgsl".into()
    }

    fn fragment_shader() -> ShaderRef {
        "shaders/dissolve.wgsl".into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        AlphaMode::Add
    }
}

/// One in-flight particle transition. Vertex count is fixed at creation;
/// progress is a single scalar shared by all vertices while each vertex
/// carries its own cluster target.
#[derive(Component, Debug)]
pub struct DissolveJob {
    original: Vec<Vec3>,
    targets: Vec<Vec3>,
    start_s: f32,
    duration_s: f32,
}

impl DissolveJob {
    /// Snapshot `original` world-space positions and assign every vertex to
    /// one of a handful of random cluster centres inside a bounded cube
    /// around `focal`. The assignment is made once and never changes.
    pub fn new(original: Vec<Vec3>, focal: Vec3, start_s: f32, rng: &mut impl Rng) -> Self {
        let clusters: Vec<Vec3> = (0..DISSOLVE_CLUSTER_COUNT)
            .map(|_| {
                focal
                    + Vec3::new(
                        rng.random_range(-DISSOLVE_CLUSTER_RANGE..DISSOLVE_CLUSTER_RANGE),
                        rng.random_range(-DISSOLVE_CLUSTER_RANGE..DISSOLVE_CLUSTER_RANGE),
                        rng.random_range(-DISSOLVE_CLUSTER_RANGE..DISSOLVE_CLUSTER_RANGE),
                    )
            })
            .collect();
        let targets = original
            .iter()
            .map(|_| clusters[rng.random_range(0..clusters.len())])
            .collect();
        Self {
            original,
            targets,
            start_s,
            duration_s: DISSOLVE_DURATION_S,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.original.len()
    }

    /// Shared progress scalar in [0, 1].
    pub fn progress(&self, now_s: f32) -> f32 {
        ((now_s - self.start_s) / self.duration_s).clamp(0.0, 1.0)
    }

    pub fn alpha(t: f32) -> f32 {
        1.0 - t
    }

    /// Position of vertex `j` at progress `t`: a straight blend from its
    /// original position to its cluster target, with a small oscillating
    /// jitter keyed by the shared clock and the vertex index.
    pub fn sample(&self, j: usize, t: f32, clock_s: f32) -> Vec3 {
        let blended = self.original[j].lerp(self.targets[j], t);
        let phase = clock_s * 6.0 + j as f32;
        blended
            + Vec3::new(
                (phase).sin() * DISSOLVE_JITTER,
                (phase * 1.3).cos() * DISSOLVE_JITTER,
                (phase * 0.7).sin() * DISSOLVE_JITTER,
            )
    }

    pub fn target(&self, j: usize) -> Vec3 {
        self.targets[j]
    }
}

/// Fired when a dissolve reaches full progress and its particles are gone.
#[derive(Event, Debug, Clone)]
pub struct DissolveFinished {
    pub key: String,
}

/// Catalog key carried by the particle entity so the finish event can name
/// the garment it replaces.
#[derive(Component)]
pub struct DissolveKey(String);

/// Convert a committed garment's first renderable mesh into a particle cloud
/// and hide the solid garment. The point entity lives in world space so the
/// frozen orbit transform is baked into the snapshot.
pub fn begin_dissolve(
    mut events: EventReader<GarmentCommitted>,
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<DissolveMaterial>>,
    mut session: ResMut<SelectionSession>,
    time: Res<Time>,
    children: Query<&Children>,
    mesh_handles: Query<(&Mesh3d, &GlobalTransform)>,
    mut visibility: Query<&mut Visibility>,
) {
    for committed in events.read() {
        let Some((handle, mesh_xf)) =
            first_mesh_descendant(committed.entity, &children, &mesh_handles)
        else {
            warn!("Committed garment {} has no renderable mesh", committed.key);
            continue;
        };
        let Some(mesh) = meshes.get(&handle) else {
            warn!("Mesh for {} not resident, skipping dissolve", committed.key);
            continue;
        };
        let Some(VertexAttributeValues::Float32x3(positions)) =
            mesh.attribute(Mesh::ATTRIBUTE_POSITION)
        else {
            warn!("Mesh for {} has no position attribute", committed.key);
            continue;
        };

        let world_positions: Vec<Vec3> = positions
            .iter()
            .map(|p| mesh_xf.transform_point(Vec3::from_array(*p)))
            .collect();

        let mut rng = rand::rng();
        let job = DissolveJob::new(
            world_positions.clone(),
            DISSOLVE_FOCAL_POINT,
            time.elapsed_secs(),
            &mut rng,
        );
        info!(
            "Dissolving {} ({} vertices into {} clusters)",
            committed.key,
            job.vertex_count(),
            DISSOLVE_CLUSTER_COUNT
        );

        let mut points = Mesh::new(PrimitiveTopology::PointList, RenderAssetUsages::default());
        points.insert_attribute(
            Mesh::ATTRIBUTE_POSITION,
            world_positions.iter().map(|p| p.to_array()).collect::<Vec<_>>(),
        );

        let colour = committed.colour;
        commands.spawn((
            Mesh3d(meshes.add(points)),
            MeshMaterial3d(materials.add(DissolveMaterial {
                params: Vec4::new(colour[0], colour[1], colour[2], 1.0),
            })),
            Transform::IDENTITY,
            DissolveKey(committed.key.clone()),
            job,
        ));

        // The solid garment disappears the moment its particles exist.
        if let Ok(mut vis) = visibility.get_mut(committed.entity) {
            *vis = Visibility::Hidden;
        }
        session.begin_replacing();
    }
}

/// Advance every active dissolve: blend positions, fade alpha, and retire
/// finished jobs. Dropping the entity releases its mesh and material assets.
pub fn update_dissolves(
    mut commands: Commands,
    time: Res<Time>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<DissolveMaterial>>,
    mut finished: EventWriter<DissolveFinished>,
    jobs: Query<(
        Entity,
        &DissolveJob,
        &DissolveKey,
        &Mesh3d,
        &MeshMaterial3d<DissolveMaterial>,
    )>,
) {
    let now_s = time.elapsed_secs();
    for (entity, job, key, mesh_handle, material_handle) in &jobs {
        let t = job.progress(now_s);
        if t >= 1.0 {
            commands.entity(entity).despawn();
            finished.write(DissolveFinished { key: key.0.clone() });
            continue;
        }

        if let Some(mesh) = meshes.get_mut(&mesh_handle.0) {
            let positions: Vec<[f32; 3]> = (0..job.vertex_count())
                .map(|j| job.sample(j, t, now_s).to_array())
                .collect();
            mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
        }
        if let Some(material) = materials.get_mut(&material_handle.0) {
            material.params.w = DissolveJob::alpha(t);
        }
    }
}

fn first_mesh_descendant(
    root: Entity,
    children: &Query<&Children>,
    mesh_handles: &Query<(&Mesh3d, &GlobalTransform)>,
) -> Option<(Handle<Mesh>, GlobalTransform)> {
    let mut queue = vec![root];
    while let Some(entity) = queue.pop() {
        if let Ok((mesh, xf)) = mesh_handles.get(entity) {
            return Some((mesh.0.clone(), *xf));
        }
        if let Ok(c) = children.get(entity) {
            queue.extend(c.iter());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    // Jitter amplitude across three axes.
    const JITTER_EPS: f32 = DISSOLVE_JITTER * 2.0;

    fn job() -> DissolveJob {
        let mut rng = StdRng::seed_from_u64(42);
        let original = vec![
            Vec3::new(2.0, 0.0, 0.0),
            Vec3::new(2.1, 0.5, 0.0),
            Vec3::new(1.9, 1.0, 0.2),
        ];
        DissolveJob::new(original, DISSOLVE_FOCAL_POINT, 0.0, &mut rng)
    }

    #[test]
    fn starts_at_original_positions_with_full_alpha() {
        let j = job();
        for v in 0..j.vertex_count() {
            let p = j.sample(v, 0.0, 0.0);
            assert!(p.distance(j.original[v]) <= JITTER_EPS);
        }
        assert_eq!(DissolveJob::alpha(0.0), 1.0);
    }

    #[test]
    fn ends_at_cluster_targets_with_zero_alpha() {
        let j = job();
        for v in 0..j.vertex_count() {
            let p = j.sample(v, 1.0, 3.7);
            assert!(p.distance(j.target(v)) <= JITTER_EPS);
        }
        assert_eq!(DissolveJob::alpha(1.0), 0.0);
    }

    #[test]
    fn cluster_targets_stay_inside_bounded_cube() {
        let j = job();
        for v in 0..j.vertex_count() {
            let offset = j.target(v) - DISSOLVE_FOCAL_POINT;
            assert!(offset.x.abs() <= DISSOLVE_CLUSTER_RANGE);
            assert!(offset.y.abs() <= DISSOLVE_CLUSTER_RANGE);
            assert!(offset.z.abs() <= DISSOLVE_CLUSTER_RANGE);
        }
    }

    #[test]
    fn progress_is_clamped_and_duration_fixed() {
        let j = job();
        assert_eq!(j.progress(-1.0), 0.0);
        assert_eq!(j.progress(0.0), 0.0);
        assert!((j.progress(DISSOLVE_DURATION_S / 2.0) - 0.5).abs() < 1e-6);
        assert_eq!(j.progress(DISSOLVE_DURATION_S * 10.0), 1.0);
    }

    #[test]
    fn vertex_assignment_is_stable_between_samples() {
        let j = job();
        let a = j.sample(1, 0.5, 1.0);
        let b = j.sample(1, 0.5, 1.0);
        assert_eq!(a, b);
    }
}
