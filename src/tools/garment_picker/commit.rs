use bevy::prelude::*;

use crate::engine::assets::catalog::GarmentCatalog;
use crate::engine::assets::garment_library::GarmentId;
use crate::engine::render::glow::GlowSignal;
use crate::engine::scene::orbit::Garment;
use crate::tools::garment_picker::state::{GarmentCommitted, ReleaseOutcome, SelectionSession};

/// Pointer-down on a hovered garment arms the hold timer.
pub fn press_garment(
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut session: ResMut<SelectionSession>,
) {
    if !buttons.just_pressed(MouseButton::Left) {
        return;
    }
    let Some(candidate) = session.candidate() else {
        return;
    };
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    if session.press(candidate, now_ms) {
        info!("Hold started on {:?}", candidate);
    }
}

/// Pointer-up. A hold past the activation threshold resolves the garment's
/// name, validates it against the catalog and commits; anything shorter is
/// treated as an abandoned press and the glow fades back out.
pub fn release_garment(
    buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut session: ResMut<SelectionSession>,
    mut glow: ResMut<GlowSignal>,
    catalog: Res<GarmentCatalog>,
    names: Query<&Name>,
    ids: Query<&GarmentId>,
    parents: Query<&ChildOf>,
    children: Query<&Children>,
    mut garments: Query<(Entity, &mut Garment, &mut Visibility)>,
    mut committed: EventWriter<GarmentCommitted>,
) {
    if !buttons.just_released(MouseButton::Left) {
        return;
    }
    let now_ms = time.elapsed_secs_f64() * 1000.0;
    match session.release(now_ms) {
        ReleaseOutcome::Abandoned => {
            glow.begin_fade(now_ms);
        }
        ReleaseOutcome::HeldPastThreshold { candidate } => {
            let resolved = resolve_garment_name(candidate, &names, &ids, &parents, &children);
            let entry = resolved
                .as_deref()
                .and_then(|name| catalog.entry_for(name));
            match entry {
                Some(entry) => {
                    info!("Committed garment {}", entry.key);
                    session.confirm_commit();
                    glow.begin_fade(now_ms);
                    for (entity, mut garment, mut visibility) in &mut garments {
                        if entity == candidate {
                            garment.locked = true;
                        } else {
                            *visibility = Visibility::Hidden;
                        }
                    }
                    committed.write(GarmentCommitted {
                        entity: candidate,
                        key: entry.key.clone(),
                        posed_avatar: entry.posed_avatar.clone(),
                        colour: catalog.dissolve_colour(&entry.key),
                    });
                }
                None => {
                    warn!(
                        "Held garment {:?} did not resolve to a catalog entry (name: {:?})",
                        candidate, resolved
                    );
                    session.abort_commit();
                    glow.begin_fade(now_ms);
                }
            }
        }
    }
}

/// Resolve a garment root to a lookup key: its own `Name`, else the parent's,
/// else the first child's, else the load-time [`GarmentId`] tag. Names are
/// trimmed and case-folded before use; an empty name does not count.
pub fn resolve_garment_name(
    entity: Entity,
    names: &Query<&Name>,
    ids: &Query<&GarmentId>,
    parents: &Query<&ChildOf>,
    children: &Query<&Children>,
) -> Option<String> {
    if let Some(name) = usable_name(entity, names) {
        return Some(name);
    }
    if let Ok(parent) = parents.get(entity) {
        if let Some(name) = usable_name(parent.parent(), names) {
            return Some(name);
        }
    }
    if let Ok(kids) = children.get(entity) {
        if let Some(first) = kids.iter().next() {
            if let Some(name) = usable_name(first, names) {
                return Some(name);
            }
        }
    }
    ids.get(entity).ok().map(|id| normalise(&id.0))
}

fn usable_name(entity: Entity, names: &Query<&Name>) -> Option<String> {
    let name = names.get(entity).ok()?;
    let folded = normalise(name.as_str());
    (!folded.is_empty()).then_some(folded)
}

fn normalise(raw: &str) -> String {
    raw.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::assets::catalog::{GarmentEntry, OverlayContent};
    use bevy::ecs::system::{RunSystemOnce, SystemState};
    use std::time::Duration;

    fn resolve_in(world: &mut World, entity: Entity) -> Option<String> {
        let mut state: SystemState<(
            Query<&Name>,
            Query<&GarmentId>,
            Query<&ChildOf>,
            Query<&Children>,
        )> = SystemState::new(world);
        let (names, ids, parents, children) = state.get(world);
        resolve_garment_name(entity, &names, &ids, &parents, &children)
    }

    #[test]
    fn own_name_wins() {
        let mut world = World::new();
        let e = world
            .spawn((Name::new("  Puffer "), GarmentId("other".into())))
            .id();
        assert_eq!(resolve_in(&mut world, e), Some("puffer".into()));
    }

    #[test]
    fn empty_name_falls_back_to_parent() {
        let mut world = World::new();
        let child = world.spawn(Name::new("   ")).id();
        world.spawn(Name::new("Domi")).add_child(child);
        assert_eq!(resolve_in(&mut world, child), Some("domi".into()));
    }

    #[test]
    fn falls_back_to_first_child() {
        let mut world = World::new();
        let kid = world.spawn(Name::new("NB1_mesh")).id();
        let root = world.spawn_empty().add_child(kid).id();
        assert_eq!(resolve_in(&mut world, root), Some("nb1_mesh".into()));
    }

    #[test]
    fn id_tag_is_last_resort() {
        let mut world = World::new();
        let e = world.spawn(GarmentId("Jumpsuit".into())).id();
        assert_eq!(resolve_in(&mut world, e), Some("jumpsuit".into()));
    }

    #[test]
    fn unresolvable_without_any_source() {
        let mut world = World::new();
        let e = world.spawn_empty().id();
        assert_eq!(resolve_in(&mut world, e), None);
    }

    fn two_entry_catalog() -> GarmentCatalog {
        let entry = |key: &str| GarmentEntry {
            key: key.into(),
            model: format!("models/{key}.glb"),
            posed_avatar: format!("models/{key}_Posed.glb"),
            cursor: None,
            colour: [1.0, 0.5, 0.0],
            overlay: OverlayContent {
                title: key.into(),
                description: String::new(),
                tools: vec![],
                images: vec![],
            },
        };
        GarmentCatalog {
            avatar_base: "models/Avatar_Base2.glb".into(),
            garments: vec![entry("puffer"), entry("domi")],
        }
    }

    #[test]
    fn long_hold_release_commits_locks_candidate_and_hides_others() {
        let mut world = World::new();
        world.init_resource::<Events<GarmentCommitted>>();
        world.insert_resource(GlowSignal::default());
        world.insert_resource(two_entry_catalog());

        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(700));
        world.insert_resource(time);

        let mut buttons = ButtonInput::<MouseButton>::default();
        buttons.press(MouseButton::Left);
        buttons.release(MouseButton::Left);
        world.insert_resource(buttons);

        let candidate = world
            .spawn((
                Name::new("Puffer"),
                Garment::new(0, 2, 2.0, 0.0),
                Visibility::default(),
            ))
            .id();
        let bystander = world
            .spawn((
                Name::new("Domi"),
                Garment::new(1, 2, 2.0, 0.5),
                Visibility::default(),
            ))
            .id();

        let mut session = SelectionSession::default();
        session.set_hovered(Some(candidate));
        assert!(session.press(candidate, 0.0));
        world.insert_resource(session);

        world.run_system_once(release_garment).unwrap();

        let session = world.resource::<SelectionSession>();
        assert!(session.is_committed());
        assert!(world.get::<Garment>(candidate).unwrap().locked);
        assert!(!world.get::<Garment>(bystander).unwrap().locked);
        assert_eq!(
            *world.get::<Visibility>(bystander).unwrap(),
            Visibility::Hidden
        );
        assert_eq!(
            *world.get::<Visibility>(candidate).unwrap(),
            Visibility::Inherited
        );

        let committed: Vec<GarmentCommitted> = world
            .resource_mut::<Events<GarmentCommitted>>()
            .drain()
            .collect();
        assert_eq!(committed.len(), 1);
        assert_eq!(committed[0].entity, candidate);
        assert_eq!(committed[0].key, "puffer");
        assert_eq!(committed[0].posed_avatar, "models/puffer_Posed.glb");
    }

    #[test]
    fn short_hold_release_leaves_everything_untouched() {
        let mut world = World::new();
        world.init_resource::<Events<GarmentCommitted>>();
        world.insert_resource(GlowSignal::default());
        world.insert_resource(two_entry_catalog());

        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(300));
        world.insert_resource(time);

        let mut buttons = ButtonInput::<MouseButton>::default();
        buttons.press(MouseButton::Left);
        buttons.release(MouseButton::Left);
        world.insert_resource(buttons);

        let candidate = world
            .spawn((
                Name::new("Puffer"),
                Garment::new(0, 2, 2.0, 0.0),
                Visibility::default(),
            ))
            .id();

        let mut session = SelectionSession::default();
        session.set_hovered(Some(candidate));
        session.press(candidate, 0.0);
        world.insert_resource(session);

        world.run_system_once(release_garment).unwrap();

        let session = world.resource::<SelectionSession>();
        assert!(!session.is_committed());
        assert!(!world.get::<Garment>(candidate).unwrap().locked);
        assert_eq!(
            *world.get::<Visibility>(candidate).unwrap(),
            Visibility::Inherited
        );
        assert!(world.resource::<GlowSignal>().is_fading());
        let committed: Vec<GarmentCommitted> = world
            .resource_mut::<Events<GarmentCommitted>>()
            .drain()
            .collect();
        assert!(committed.is_empty());
    }
}
