use bevy::prelude::*;

use crate::engine::assets::catalog::GarmentCatalog;
use crate::engine::camera::showroom_camera::{CameraTweenFinished, TweenKind};
use crate::tools::garment_picker::state::GarmentCommitted;

/// Key of the garment currently being presented. Captured at commit time so
/// the overlay can populate itself once the camera lands.
#[derive(Resource, Default)]
pub struct PresentedGarment(pub Option<String>);

#[derive(Component)]
pub struct OverlayRoot;

#[derive(Component)]
pub struct OverlayTitle;

#[derive(Component)]
pub struct OverlayDescription;

#[derive(Component)]
pub struct OverlayTools;

#[derive(Component)]
pub struct OverlayImage;

/// Build the hidden info panel once at startup. It stays display-none until
/// the presentation tween finishes.
pub fn spawn_overlay(mut commands: Commands) {
    commands
        .spawn((
            OverlayRoot,
            Node {
                position_type: PositionType::Absolute,
                right: Val::Px(0.0),
                top: Val::Px(0.0),
                bottom: Val::Px(0.0),
                width: Val::Percent(34.0),
                padding: UiRect::all(Val::Px(24.0)),
                flex_direction: FlexDirection::Column,
                row_gap: Val::Px(12.0),
                display: Display::None,
                ..default()
            },
            BackgroundColor(Color::srgba(0.02, 0.02, 0.04, 0.88)),
        ))
        .with_children(|parent| {
            parent.spawn((
                OverlayTitle,
                Text::new(""),
                TextFont {
                    font_size: 28.0,
                    ..default()
                },
                TextColor(Color::WHITE),
            ));
            parent.spawn((
                OverlayDescription,
                Text::new(""),
                TextFont {
                    font_size: 15.0,
                    ..default()
                },
                TextColor(Color::srgb(0.85, 0.85, 0.85)),
            ));
            parent.spawn((
                OverlayTools,
                Text::new(""),
                TextFont {
                    font_size: 13.0,
                    ..default()
                },
                TextColor(Color::srgb(0.6, 0.6, 0.65)),
            ));
            parent.spawn((
                OverlayImage,
                ImageNode::default(),
                Node {
                    width: Val::Percent(100.0),
                    ..default()
                },
            ));
        });
}

/// Remember which garment was committed so the reveal can find its entry.
pub fn remember_committed(
    mut events: EventReader<GarmentCommitted>,
    mut presented: ResMut<PresentedGarment>,
) {
    for event in events.read() {
        presented.0 = Some(event.key.clone());
    }
}

/// Populate and show the panel when the camera reaches its presentation pose.
pub fn reveal_overlay(
    mut events: EventReader<CameraTweenFinished>,
    presented: Res<PresentedGarment>,
    catalog: Res<GarmentCatalog>,
    asset_server: Res<AssetServer>,
    mut roots: Query<&mut Node, With<OverlayRoot>>,
    mut titles: Query<&mut Text, With<OverlayTitle>>,
    mut descriptions: Query<&mut Text, (With<OverlayDescription>, Without<OverlayTitle>)>,
    mut tools: Query<
        &mut Text,
        (
            With<OverlayTools>,
            Without<OverlayTitle>,
            Without<OverlayDescription>,
        ),
    >,
    mut images: Query<&mut ImageNode, With<OverlayImage>>,
) {
    if !events.read().any(|e| e.kind == TweenKind::Present) {
        return;
    }
    let Some(key) = presented.0.as_deref() else {
        return;
    };
    let Some(entry) = catalog.entry_for(key) else {
        warn!("No catalog entry for presented garment {key}");
        return;
    };

    if let Ok(mut title) = titles.single_mut() {
        title.0 = entry.overlay.title.clone();
    }
    if let Ok(mut description) = descriptions.single_mut() {
        description.0 = entry.overlay.description.clone();
    }
    if let Ok(mut tool_list) = tools.single_mut() {
        tool_list.0 = entry.overlay.tools.join("  /  ");
    }
    if let Ok(mut image) = images.single_mut() {
        if let Some(first) = entry.overlay.images.first() {
            image.image = asset_server.load(first.clone());
        }
    }
    if let Ok(mut node) = roots.single_mut() {
        node.display = Display::Flex;
        info!("Overlay revealed for {}", entry.key);
    }
}
