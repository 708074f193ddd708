use bevy::prelude::*;

use crate::constants::{GLOW_DEFAULT, GLOW_FADE_MS, GLOW_HOLD_DURATION_MS, GLOW_MAX};
use crate::tools::garment_picker::state::{SelectionPhase, SelectionSession};

// Emissive added per unit of edge strength; the camera's bloom pass turns the
// boosted emissive into the visible halo.
const EMISSIVE_PER_STRENGTH: f32 = 0.6;

/// The attention signal fed to the renderer: an edge strength scalar plus the
/// at-most-one garment it applies to.
#[derive(Resource, Debug, Default)]
pub struct GlowSignal {
    pub edge_strength: f32,
    pub selected: Option<Entity>,
    fade: Option<GlowFade>,
}

#[derive(Debug, Clone, Copy)]
struct GlowFade {
    from: f32,
    started_at_ms: f64,
}

impl GlowSignal {
    pub fn hover(&mut self, entity: Entity) {
        self.selected = Some(entity);
        self.edge_strength = GLOW_DEFAULT;
        self.fade = None;
    }

    pub fn clear(&mut self) {
        self.selected = None;
        self.edge_strength = 0.0;
        self.fade = None;
    }

    /// Start easing the current strength back to zero.
    pub fn begin_fade(&mut self, now_ms: f64) {
        self.fade = Some(GlowFade {
            from: self.edge_strength,
            started_at_ms: now_ms,
        });
    }

    pub fn is_fading(&self) -> bool {
        self.fade.is_some()
    }

    fn tick_fade(&mut self, now_ms: f64) {
        let Some(fade) = self.fade else {
            return;
        };
        let t = ((now_ms - fade.started_at_ms) / GLOW_FADE_MS).clamp(0.0, 1.0) as f32;
        self.edge_strength = fade.from * (1.0 - ease_out_cubic(t));
        if t >= 1.0 {
            self.selected = None;
            self.fade = None;
        }
    }
}

/// Strength of the press-and-hold ramp after `elapsed_ms` of holding:
/// linear from the hover default up to the maximum, clamped.
pub fn hold_strength(elapsed_ms: f64) -> f32 {
    let progress = (elapsed_ms / GLOW_HOLD_DURATION_MS).clamp(0.0, 1.0) as f32;
    GLOW_DEFAULT + (GLOW_MAX - GLOW_DEFAULT) * progress
}

pub fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}

/// Drive the signal from the selection session: ramp while armed, fade after
/// an abandoned press.
pub fn update_glow(
    time: Res<Time>,
    session: Res<SelectionSession>,
    mut signal: ResMut<GlowSignal>,
) {
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    if session.phase() == SelectionPhase::Armed {
        if let Some(elapsed) = session.hold_elapsed_ms(now_ms) {
            signal.edge_strength = hold_strength(elapsed);
        }
    }
    signal.tick_fade(now_ms);
}

/// Book-keeping for the emissive boost currently applied to a garment, so
/// the original material values can be restored when the glow moves on.
#[derive(Resource, Default)]
pub struct GlowApplied {
    entity: Option<Entity>,
    originals: Vec<(AssetId<StandardMaterial>, LinearRgba)>,
}

/// Apply the signal to the selected garment's materials. Selective bloom is
/// expressed through emissive rather than per-frame material swapping; only
/// the selected garment ever gets a boost, so only it blooms.
pub fn apply_glow(
    signal: Res<GlowSignal>,
    mut applied: ResMut<GlowApplied>,
    mut materials: ResMut<Assets<StandardMaterial>>,
    children: Query<&Children>,
    mesh_materials: Query<&MeshMaterial3d<StandardMaterial>>,
) {
    if applied.entity != signal.selected {
        for (id, original) in applied.originals.drain(..) {
            if let Some(material) = materials.get_mut(id) {
                material.emissive = original;
            }
        }
        applied.entity = signal.selected;
        if let Some(root) = signal.selected {
            for id in collect_materials(root, &children, &mesh_materials) {
                if let Some(material) = materials.get(id) {
                    applied.originals.push((id, material.emissive));
                }
            }
        }
    }

    if applied.entity.is_none() {
        return;
    }
    let boost = signal.edge_strength * EMISSIVE_PER_STRENGTH;
    for (id, original) in applied.originals.iter() {
        if let Some(material) = materials.get_mut(*id) {
            material.emissive = LinearRgba::new(
                original.red + boost,
                original.green + boost,
                original.blue + boost,
                original.alpha,
            );
        }
    }
}

fn collect_materials(
    root: Entity,
    children: &Query<&Children>,
    mesh_materials: &Query<&MeshMaterial3d<StandardMaterial>>,
) -> Vec<AssetId<StandardMaterial>> {
    let mut out = Vec::new();
    let mut queue = vec![root];
    while let Some(entity) = queue.pop() {
        if let Ok(handle) = mesh_materials.get(entity) {
            out.push(handle.0.id());
        }
        if let Ok(c) = children.get(entity) {
            queue.extend(c.iter());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_sets_default_strength() {
        let mut s = GlowSignal::default();
        s.hover(Entity::from_raw(1));
        assert_eq!(s.edge_strength, GLOW_DEFAULT);
        assert_eq!(s.selected, Some(Entity::from_raw(1)));
    }

    #[test]
    fn hold_ramp_is_linear_and_clamped() {
        assert_eq!(hold_strength(0.0), GLOW_DEFAULT);
        let mid = hold_strength(GLOW_HOLD_DURATION_MS / 2.0);
        assert!((mid - (GLOW_DEFAULT + (GLOW_MAX - GLOW_DEFAULT) * 0.5)).abs() < 1e-6);
        assert_eq!(hold_strength(GLOW_HOLD_DURATION_MS), GLOW_MAX);
        assert_eq!(hold_strength(GLOW_HOLD_DURATION_MS * 3.0), GLOW_MAX);
    }

    #[test]
    fn fade_eases_to_zero_and_clears_selection() {
        let mut s = GlowSignal::default();
        s.hover(Entity::from_raw(2));
        s.begin_fade(1000.0);
        s.tick_fade(1000.0 + GLOW_FADE_MS * 0.5);
        assert!(s.edge_strength > 0.0);
        assert!(s.edge_strength < GLOW_DEFAULT);
        s.tick_fade(1000.0 + GLOW_FADE_MS + 1.0);
        assert_eq!(s.edge_strength, 0.0);
        assert!(s.selected.is_none());
        assert!(!s.is_fading());
    }

    #[test]
    fn ease_out_cubic_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        assert!(ease_out_cubic(0.5) > 0.5);
    }
}
