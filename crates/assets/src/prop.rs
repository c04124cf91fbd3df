use propscape_common::{
    BodyDesc, Category, Color, EntityDescriptor, EntityId, FocusOverlay, Shape, Transform,
};
use propscape_registry::Registry;
use propscape_render::SceneGraph;
use serde::{Deserialize, Serialize};

use crate::store::{AssetKind, AssetStore};

/// One static prop of the scene, as written in the scene file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PropDescriptor {
    pub name: String,
    /// Model the prop renders. `None` means a plain primitive.
    pub asset: Option<String>,
    pub shape: Shape,
    pub transform: Transform,
    pub color: Color,
    pub category: Category,
    pub pickable: bool,
    pub spawn_trigger: bool,
    pub link: Option<String>,
    pub focus: Option<FocusOverlay>,
    /// Give the prop a fixed collider so dynamic bodies rest on it.
    pub collider: bool,
}

impl Default for PropDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            asset: None,
            shape: Shape::default(),
            transform: Transform::default(),
            color: Color::default(),
            category: Category::StaticPickable,
            pickable: false,
            spawn_trigger: false,
            link: None,
            focus: None,
            collider: false,
        }
    }
}

impl PropDescriptor {
    /// The registry descriptor for this prop. Props are always persistent.
    pub fn to_entity(&self) -> EntityDescriptor {
        EntityDescriptor {
            name: self.name.clone(),
            shape: self.shape,
            transform: self.transform,
            body: self.collider.then_some(BodyDesc { mass: 0.0 }),
            color: self.color,
            mesh: self.asset.clone(),
            category: self.category,
            pickable: self.pickable || self.link.is_some() || self.focus.is_some(),
            spawn_trigger: self.spawn_trigger,
            link: self.link.clone(),
            focus: self.focus.clone(),
            persistent: true,
            collision_audio: false,
        }
    }
}

/// Places the scene's static props as their assets become ready.
#[derive(Debug, Default)]
pub struct PropLoader {
    waiting: Vec<PropDescriptor>,
    placed: Vec<(String, EntityId)>,
    dropped: Vec<String>,
}

impl PropLoader {
    pub fn new(props: impl IntoIterator<Item = PropDescriptor>) -> Self {
        Self {
            waiting: props.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Ask `store` for every asset the props need.
    pub fn request_assets(&self, store: &mut AssetStore) {
        for asset in self.waiting.iter().filter_map(|p| p.asset.as_deref()) {
            store.request(asset, AssetKind::Model);
        }
    }

    /// Props not placed yet.
    pub fn waiting(&self) -> usize {
        self.waiting.len()
    }

    /// `(name, id)` of every prop placed so far, in placement order.
    pub fn placed(&self) -> &[(String, EntityId)] {
        &self.placed
    }

    /// Names of props given up on: failed asset or rejected spawn.
    pub fn dropped(&self) -> &[String] {
        &self.dropped
    }

    pub fn is_done(&self) -> bool {
        self.waiting.is_empty()
    }

    /// Spawn every prop whose asset is ready. Props with pending assets stay
    /// queued; props with failed assets are dropped. Returns the new ids.
    pub fn poll<S: SceneGraph>(
        &mut self,
        store: &AssetStore,
        registry: &mut Registry<S>,
    ) -> Vec<EntityId> {
        let mut spawned = Vec::new();
        let mut still_waiting = Vec::new();
        for prop in std::mem::take(&mut self.waiting) {
            if let Some(asset) = prop.asset.as_deref() {
                if store.is_failed(asset) {
                    tracing::warn!(prop = %prop.name, asset, "prop dropped, asset failed");
                    self.dropped.push(prop.name);
                    continue;
                }
                if !store.is_ready(asset) {
                    still_waiting.push(prop);
                    continue;
                }
            }
            match registry.spawn(&prop.to_entity()) {
                Ok(id) => {
                    tracing::debug!(prop = %prop.name, %id, "prop placed");
                    self.placed.push((prop.name, id));
                    spawned.push(id);
                }
                Err(e) => {
                    tracing::warn!(prop = %prop.name, error = %e, "prop dropped");
                    self.dropped.push(prop.name);
                }
            }
        }
        self.waiting = still_waiting;
        spawned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use propscape_physics::{PhysicsSettings, PhysicsWorld};
    use propscape_render::HeadlessScene;

    fn registry() -> Registry<HeadlessScene> {
        Registry::new(PhysicsWorld::new(PhysicsSettings::default()), HeadlessScene::new())
    }

    fn prop(name: &str, asset: Option<&str>) -> PropDescriptor {
        PropDescriptor {
            name: name.into(),
            asset: asset.map(String::from),
            transform: Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
            ..PropDescriptor::default()
        }
    }

    #[test]
    fn primitive_props_spawn_immediately() {
        let mut reg = registry();
        let store = AssetStore::new();
        let mut loader = PropLoader::new([prop("plinth", None)]);
        let ids = loader.poll(&store, &mut reg);
        assert_eq!(ids.len(), 1);
        assert!(loader.is_done());
        let entity = reg.get(ids[0]).unwrap();
        assert!(entity.persistent);
        assert!(entity.body.is_none());
    }

    #[test]
    fn props_wait_for_their_asset() {
        let mut reg = registry();
        let mut store = AssetStore::new();
        let mut loader = PropLoader::new([prop("frame", Some("frame.glb"))]);
        loader.request_assets(&mut store);

        assert!(loader.poll(&store, &mut reg).is_empty());
        assert!(loader.poll(&store, &mut reg).is_empty());
        assert_eq!(loader.waiting(), 1);
        assert!(reg.is_empty());

        store.complete("frame.glb", b"gltf").unwrap();
        let ids = loader.poll(&store, &mut reg);
        assert_eq!(ids.len(), 1);
        assert_eq!(reg.get(ids[0]).unwrap().mesh.as_deref(), Some("frame.glb"));

        // Never placed twice.
        assert!(loader.poll(&store, &mut reg).is_empty());
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn failed_asset_drops_prop() {
        let mut reg = registry();
        let mut store = AssetStore::new();
        let mut loader = PropLoader::new([prop("bust", Some("bust.glb")), prop("plinth", None)]);
        loader.request_assets(&mut store);
        store.fail("bust.glb", "404");

        let ids = loader.poll(&store, &mut reg);
        assert_eq!(ids.len(), 1);
        assert_eq!(loader.dropped(), ["bust".to_string()]);
        assert!(loader.is_done());
    }

    #[test]
    fn link_and_focus_make_props_pickable() {
        let linked = PropDescriptor {
            category: Category::Navigational,
            link: Some("https://example.com".into()),
            ..prop("sign", None)
        };
        assert!(linked.to_entity().pickable);
        assert!(!prop("wall", None).to_entity().pickable);
    }

    #[test]
    fn collider_props_get_fixed_bodies() {
        let mut reg = registry();
        let store = AssetStore::new();
        let table = PropDescriptor {
            collider: true,
            ..prop("table", None)
        };
        let mut loader = PropLoader::new([table]);
        let ids = loader.poll(&store, &mut reg);
        assert!(reg.get(ids[0]).unwrap().body.is_some());
        assert_eq!(reg.dynamic_count(), 0);
    }

    #[test]
    fn props_deserialize_from_json() {
        let json = r#"[
            { "name": "frame", "asset": "frame.glb",
              "focus": { "kind": "panel", "name": "about" } },
            { "name": "sign", "category": "navigational", "link": "https://example.com" }
        ]"#;
        let props: Vec<PropDescriptor> = serde_json::from_str(json).unwrap();
        assert_eq!(props.len(), 2);
        assert!(props[0].to_entity().pickable);
        assert_eq!(props[1].category, Category::Navigational);
    }
}
