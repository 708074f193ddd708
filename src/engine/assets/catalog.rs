use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::constants::DISSOLVE_FALLBACK_COLOUR;

/// Static per-garment content: the posed avatar to swap in, the hover cursor,
/// the dissolve particle colour, and the overlay copy. Loaded once from
/// `assets/showroom.json` and read-only afterwards.
///
/// Entries are an ordered list rather than a map so that fuzzy name matching
/// is deterministic: the first entry that matches wins.
#[derive(Debug, Clone, Serialize, Deserialize, Asset, TypePath, Resource)]
pub struct GarmentCatalog {
    pub avatar_base: String,
    pub garments: Vec<GarmentEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GarmentEntry {
    pub key: String,
    pub model: String,
    pub posed_avatar: String,
    #[serde(default)]
    pub cursor: Option<String>,
    #[serde(default = "default_colour")]
    pub colour: [f32; 3],
    pub overlay: OverlayContent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverlayContent {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tools: Vec<String>,
    #[serde(default)]
    pub images: Vec<String>,
}

fn default_colour() -> [f32; 3] {
    DISSOLVE_FALLBACK_COLOUR
}

impl GarmentCatalog {
    /// Look up the entry for a resolved garment name. Exact key match first;
    /// otherwise substring containment is tested both directions against each
    /// key in catalog order and the first hit wins.
    pub fn entry_for(&self, resolved_name: &str) -> Option<&GarmentEntry> {
        if let Some(entry) = self.garments.iter().find(|e| e.key == resolved_name) {
            return Some(entry);
        }
        self.garments
            .iter()
            .find(|e| resolved_name.contains(&e.key) || e.key.contains(resolved_name))
    }

    /// Particle colour for a dissolving garment, with a neutral fallback when
    /// the name matches nothing.
    pub fn dissolve_colour(&self, resolved_name: &str) -> [f32; 3] {
        self.entry_for(resolved_name)
            .map(|e| e.colour)
            .unwrap_or(DISSOLVE_FALLBACK_COLOUR)
    }
}

/// Tracks the in-flight catalog load, mirroring the handle + loaded flag
/// pattern used for scene metadata elsewhere in the app.
#[derive(Resource, Default)]
pub struct CatalogLoader {
    pub handle: Option<Handle<GarmentCatalog>>,
    pub loaded: bool,
}

pub const CATALOG_PATH: &str = "showroom.json";

/// Kick off and finalise the catalog load. Once the JSON asset is available
/// the catalog is cloned into a plain resource so every consumer can read it
/// without holding `Assets` access.
pub fn load_catalog(
    mut loader: ResMut<CatalogLoader>,
    asset_server: Res<AssetServer>,
    catalogs: Res<Assets<GarmentCatalog>>,
    mut commands: Commands,
) {
    if loader.handle.is_none() {
        info!("Loading garment catalog from {}", CATALOG_PATH);
        loader.handle = Some(asset_server.load(CATALOG_PATH));
        return;
    }

    if !loader.loaded {
        if let Some(ref handle) = loader.handle {
            if let Some(catalog) = catalogs.get(handle) {
                info!(
                    "Garment catalog loaded: {} garments",
                    catalog.garments.len()
                );
                commands.insert_resource(catalog.clone());
                loader.loaded = true;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog(keys: &[&str]) -> GarmentCatalog {
        GarmentCatalog {
            avatar_base: "models/Avatar_Base2.glb".into(),
            garments: keys
                .iter()
                .map(|k| GarmentEntry {
                    key: (*k).into(),
                    model: format!("models/{k}.glb"),
                    posed_avatar: format!("models/{k}_Posed.glb"),
                    cursor: None,
                    colour: [1.0, 0.0, 0.0],
                    overlay: OverlayContent {
                        title: (*k).into(),
                        description: String::new(),
                        tools: vec![],
                        images: vec![],
                    },
                })
                .collect(),
        }
    }

    #[test]
    fn exact_key_match_wins() {
        let c = catalog(&["nb", "jumpsuit"]);
        assert_eq!(c.entry_for("jumpsuit").unwrap().key, "jumpsuit");
    }

    #[test]
    fn fuzzy_match_by_substring_containment() {
        // Resolved name carries a loader suffix; "nb" is contained in it.
        let c = catalog(&["nb", "jumpsuit"]);
        let entry = c.entry_for("nb_draco2").unwrap();
        assert_eq!(entry.posed_avatar, "models/nb_Posed.glb");
    }

    #[test]
    fn fuzzy_match_other_direction() {
        // Resolved name is a substring of the key.
        let c = catalog(&["charam"]);
        assert_eq!(c.entry_for("chara").unwrap().key, "charam");
    }

    #[test]
    fn ambiguous_fuzzy_match_takes_first_in_catalog_order() {
        let c = catalog(&["puffer_long", "puffer"]);
        assert_eq!(c.entry_for("puffer_long_v2").unwrap().key, "puffer_long");
    }

    #[test]
    fn unknown_name_has_no_entry_and_fallback_colour() {
        let c = catalog(&["puffer"]);
        assert!(c.entry_for("trenchcoat").is_none());
        assert_eq!(c.dissolve_colour("trenchcoat"), DISSOLVE_FALLBACK_COLOUR);
    }

    #[test]
    fn catalog_json_round_trips() {
        let json = r#"{
            "avatar_base": "models/Avatar_Base2.glb",
            "garments": [
                {
                    "key": "puffer",
                    "model": "models/Puffer.glb",
                    "posed_avatar": "models/Puffer_Posed.glb",
                    "colour": [0.9, 0.5, 0.2],
                    "overlay": {
                        "title": "Puffer",
                        "description": "Quilted volume jacket."
                    }
                }
            ]
        }"#;
        let parsed: GarmentCatalog = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.garments.len(), 1);
        assert_eq!(parsed.garments[0].colour, [0.9, 0.5, 0.2]);
        assert!(parsed.garments[0].cursor.is_none());
        assert!(parsed.garments[0].overlay.tools.is_empty());
    }
}
