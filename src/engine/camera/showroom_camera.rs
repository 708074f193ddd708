use bevy::input::mouse::{MouseScrollUnit, MouseWheel};
use bevy::prelude::*;

use crate::constants::{
    CAMERA_DAMPING, CAMERA_MAX_DISTANCE, CAMERA_MIN_DISTANCE, CAMERA_MOVEMENT_SPEED,
    CAMERA_RESET_POSITION, CAMERA_START_POSITION, CAMERA_START_TARGET, PRESENT_MAX_DISTANCE,
    PRESENT_MIN_DISTANCE, PRESENT_POSITION, PRESENT_TARGET, PRESENT_TWEEN_S,
};

/// Why a camera tween was started; presentation tweens tighten constraints
/// and unlock the overlay on completion, resets do not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TweenKind {
    Reset,
    Present,
}

/// Eased camera move between two position/target pairs.
#[derive(Debug, Clone)]
pub struct CameraTween {
    pub kind: TweenKind,
    from_position: Vec3,
    to_position: Vec3,
    from_target: Vec3,
    to_target: Vec3,
    elapsed_s: f32,
    duration_s: f32,
}

impl CameraTween {
    pub fn new(
        kind: TweenKind,
        from_position: Vec3,
        to_position: Vec3,
        from_target: Vec3,
        to_target: Vec3,
        duration_s: f32,
    ) -> Self {
        Self {
            kind,
            from_position,
            to_position,
            from_target,
            to_target,
            elapsed_s: 0.0,
            duration_s,
        }
    }

    pub fn advance(&mut self, dt: f32) {
        self.elapsed_s += dt;
    }

    pub fn finished(&self) -> bool {
        self.elapsed_s >= self.duration_s
    }

    /// Current (position, target) pair with an ease-out curve.
    pub fn sample(&self) -> (Vec3, Vec3) {
        let t = ease_out_quad((self.elapsed_s / self.duration_s).clamp(0.0, 1.0));
        (
            self.from_position.lerp(self.to_position, t),
            self.from_target.lerp(self.to_target, t),
        )
    }
}

pub fn ease_out_quad(t: f32) -> f32 {
    1.0 - (1.0 - t) * (1.0 - t)
}

/// Showroom camera rig: a desired pose the rendered camera eases toward,
/// plus pan/zoom constraints that tighten once a garment is presented.
#[derive(Resource, Debug)]
pub struct ShowroomCamera {
    pub desired_position: Vec3,
    pub target: Vec3,
    pub pan_enabled: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub tween: Option<CameraTween>,
}

impl Default for ShowroomCamera {
    fn default() -> Self {
        Self {
            desired_position: CAMERA_START_POSITION,
            target: CAMERA_START_TARGET,
            pan_enabled: true,
            min_distance: CAMERA_MIN_DISTANCE,
            max_distance: CAMERA_MAX_DISTANCE,
            tween: None,
        }
    }
}

impl ShowroomCamera {
    pub fn begin_reset_tween(&mut self) {
        self.tween = Some(CameraTween::new(
            TweenKind::Reset,
            self.desired_position,
            CAMERA_RESET_POSITION,
            self.target,
            CAMERA_START_TARGET,
            PRESENT_TWEEN_S,
        ));
    }

    /// Move to the fixed presentation pose for the posed avatar.
    pub fn begin_present_tween(&mut self) {
        self.tween = Some(CameraTween::new(
            TweenKind::Present,
            self.desired_position,
            PRESENT_POSITION,
            self.target,
            PRESENT_TARGET,
            PRESENT_TWEEN_S,
        ));
    }

    fn apply_presentation_constraints(&mut self) {
        self.pan_enabled = false;
        self.min_distance = PRESENT_MIN_DISTANCE;
        self.max_distance = PRESENT_MAX_DISTANCE;
    }
}

/// Fired when a camera tween completes; the presentation variant gates the
/// overlay reveal and the terminal selection phase.
#[derive(Event, Debug, Clone, Copy)]
pub struct CameraTweenFinished {
    pub kind: TweenKind,
}

pub fn spawn_showroom_camera(mut commands: Commands) {
    use bevy::core_pipeline::bloom::Bloom;
    use bevy::core_pipeline::tonemapping::Tonemapping;

    commands.spawn((
        Camera3d::default(),
        Camera {
            hdr: true,
            ..default()
        },
        Tonemapping::TonyMcMapface,
        Bloom::NATURAL,
        Transform::from_translation(CAMERA_START_POSITION).looking_at(CAMERA_START_TARGET, Vec3::Y),
    ));
    commands.insert_resource(ShowroomCamera::default());
}

/// Keyboard pan, scroll dolly, Space reset, tween playback, and the final
/// damped easing of the rendered transform toward the desired pose.
pub fn camera_controller(
    time: Res<Time>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut scroll_events: EventReader<MouseWheel>,
    mut rig: ResMut<ShowroomCamera>,
    mut finished: EventWriter<CameraTweenFinished>,
    mut cameras: Query<&mut Transform, With<Camera3d>>,
) {
    let dt = time.delta_secs();

    if let Some(mut tween) = rig.tween.take() {
        tween.advance(dt);
        let (position, target) = tween.sample();
        rig.desired_position = position;
        rig.target = target;
        if tween.finished() {
            if tween.kind == TweenKind::Present {
                rig.apply_presentation_constraints();
            }
            finished.write(CameraTweenFinished { kind: tween.kind });
        } else {
            rig.tween = Some(tween);
        }
    } else {
        if rig.pan_enabled {
            let mut delta = Vec3::ZERO;
            if keyboard.pressed(KeyCode::KeyW) {
                delta.z -= CAMERA_MOVEMENT_SPEED;
            }
            if keyboard.pressed(KeyCode::KeyS) {
                delta.z += CAMERA_MOVEMENT_SPEED;
            }
            if keyboard.pressed(KeyCode::KeyA) {
                delta.x -= CAMERA_MOVEMENT_SPEED;
            }
            if keyboard.pressed(KeyCode::KeyD) {
                delta.x += CAMERA_MOVEMENT_SPEED;
            }
            if keyboard.pressed(KeyCode::KeyQ) {
                delta.y += CAMERA_MOVEMENT_SPEED;
            }
            if keyboard.pressed(KeyCode::KeyE) {
                delta.y -= CAMERA_MOVEMENT_SPEED;
            }
            rig.desired_position += delta;
        }

        if keyboard.just_pressed(KeyCode::Space) {
            rig.begin_reset_tween();
        }

        let mut scroll = 0.0;
        for ev in scroll_events.read() {
            scroll += match ev.unit {
                MouseScrollUnit::Line => ev.y,
                MouseScrollUnit::Pixel => ev.y * 0.05,
            };
        }
        if scroll.abs() > f32::EPSILON {
            let to_target = rig.target - rig.desired_position;
            let distance = to_target.length();
            if distance > f32::EPSILON {
                let new_distance =
                    (distance - scroll * 0.5).clamp(rig.min_distance, rig.max_distance);
                rig.desired_position = rig.target - to_target.normalize() * new_distance;
            }
        }
    }

    let Ok(mut transform) = cameras.single_mut() else {
        return;
    };
    let lerp_factor = (CAMERA_DAMPING * dt).min(1.0);
    let target = rig.target;
    let desired = rig.desired_position;
    transform.translation = transform.translation.lerp(desired, lerp_factor);
    transform.look_at(target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ease_out_quad_endpoints_and_shape() {
        assert_eq!(ease_out_quad(0.0), 0.0);
        assert_eq!(ease_out_quad(1.0), 1.0);
        assert!(ease_out_quad(0.5) > 0.5);
    }

    #[test]
    fn tween_samples_endpoints() {
        let mut tween = CameraTween::new(
            TweenKind::Present,
            Vec3::ZERO,
            Vec3::new(0.0, 1.2, 3.0),
            Vec3::ZERO,
            Vec3::new(0.0, 0.5, 0.0),
            1.0,
        );
        let (p0, t0) = tween.sample();
        assert_eq!(p0, Vec3::ZERO);
        assert_eq!(t0, Vec3::ZERO);
        tween.advance(2.0);
        assert!(tween.finished());
        let (p1, t1) = tween.sample();
        assert_eq!(p1, Vec3::new(0.0, 1.2, 3.0));
        assert_eq!(t1, Vec3::new(0.0, 0.5, 0.0));
    }

    #[test]
    fn presentation_constraints_tighten_rig() {
        let mut rig = ShowroomCamera::default();
        assert!(rig.pan_enabled);
        rig.apply_presentation_constraints();
        assert!(!rig.pan_enabled);
        assert_eq!(rig.min_distance, PRESENT_MIN_DISTANCE);
        assert_eq!(rig.max_distance, PRESENT_MAX_DISTANCE);
    }
}
