use std::collections::{BTreeMap, HashMap};

use propscape_common::{
    Category, Color, EntityDescriptor, EntityId, FocusOverlay, NodeId, Shape, Transform,
};
use propscape_physics::{BodyHandle, Impact, PhysicsWorld, Stepper};
use propscape_render::{ProxyDesc, SceneError, SceneGraph};

/// Errors from registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("failed to create render proxy: {0}")]
    Scene(#[from] SceneError),
}

/// Membership changes, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryEvent {
    Spawned { id: EntityId, name: String },
    Disposed { id: EntityId, name: String },
}

/// A live entity. Read-only outside the registry.
#[derive(Debug, Clone)]
pub struct Entity {
    pub id: EntityId,
    pub name: String,
    pub node: NodeId,
    pub body: Option<BodyHandle>,
    pub shape: Shape,
    pub mesh: Option<String>,
    /// Transform of the proxy as of the last sync.
    pub transform: Transform,
    pub category: Category,
    pub pickable: bool,
    pub spawn_trigger: bool,
    pub link: Option<String>,
    pub focus: Option<FocusOverlay>,
    pub persistent: bool,
    pub base_color: Color,
    /// Color currently shown by the proxy.
    pub color: Color,
}

/// An impact delivered to a live entity whose collision callback is registered.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoutedImpact {
    pub entity: EntityId,
    pub speed: f32,
}

/// Result of advancing the owned physics world for one frame.
#[derive(Debug, Clone, Default)]
pub struct StepOutcome {
    pub substeps: u32,
    pub impacts: Vec<RoutedImpact>,
}

/// Owns the physics world, the scene graph and the entities pairing them.
///
/// Entities are kept in a `BTreeMap` keyed by monotonically increasing ids, so
/// iteration order is spawn order and stable across frames.
pub struct Registry<S> {
    physics: PhysicsWorld,
    scene: S,
    entities: BTreeMap<EntityId, Entity>,
    /// Collision callback table: bodies whose impacts reach the audio trigger.
    subscriptions: HashMap<BodyHandle, EntityId>,
    next_id: u64,
    events: Vec<RegistryEvent>,
}

impl<S: SceneGraph> Registry<S> {
    pub fn new(physics: PhysicsWorld, scene: S) -> Self {
        Self {
            physics,
            scene,
            entities: BTreeMap::new(),
            subscriptions: HashMap::new(),
            next_id: 0,
            events: Vec::new(),
        }
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn physics(&self) -> &PhysicsWorld {
        &self.physics
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Entities that `reset_all` would keep.
    pub fn persistent_count(&self) -> usize {
        self.entities.values().filter(|e| e.persistent).count()
    }

    /// Entities with a non-fixed body.
    pub fn dynamic_count(&self) -> usize {
        self.entities
            .values()
            .filter(|e| !e.persistent && e.body.is_some())
            .count()
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// All live entities in spawn order.
    pub fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values()
    }

    /// The pickable set, in spawn order.
    pub fn pickables(&self) -> impl Iterator<Item = &Entity> {
        self.entities.values().filter(|e| e.pickable)
    }

    /// Read-only access to the membership log.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Drain and return the membership log.
    pub fn drain_events(&mut self) -> Vec<RegistryEvent> {
        std::mem::take(&mut self.events)
    }

    /// Build the body (if any) and the proxy for `desc` and register them.
    ///
    /// If the scene graph refuses the proxy, the body created for it is
    /// removed again before the error is returned.
    pub fn spawn(&mut self, desc: &EntityDescriptor) -> Result<EntityId, RegistryError> {
        let body = desc.body.as_ref().map(|body| {
            self.physics
                .add_body(&desc.shape, &desc.transform, body, desc.collision_audio)
        });

        let proxy = ProxyDesc {
            name: desc.name.clone(),
            shape: desc.shape,
            transform: desc.transform,
            color: desc.color,
            mesh: desc.mesh.clone(),
        };
        let node = match self.scene.add_node(&proxy) {
            Ok(node) => node,
            Err(e) => {
                if let Some(body) = body {
                    self.physics.remove_body(body);
                }
                return Err(e.into());
            }
        };

        self.next_id += 1;
        let id = EntityId(self.next_id);
        if desc.collision_audio {
            if let Some(body) = body {
                self.subscriptions.insert(body, id);
            }
        }
        self.entities.insert(
            id,
            Entity {
                id,
                name: desc.name.clone(),
                node,
                body,
                shape: desc.shape,
                mesh: desc.mesh.clone(),
                transform: desc.transform,
                category: desc.category,
                pickable: desc.pickable,
                spawn_trigger: desc.spawn_trigger,
                link: desc.link.clone(),
                focus: desc.focus.clone(),
                persistent: desc.persistent,
                base_color: desc.color,
                color: desc.color,
            },
        );
        self.events.push(RegistryEvent::Spawned {
            id,
            name: desc.name.clone(),
        });
        tracing::debug!(%id, name = %desc.name, has_body = body.is_some(), "entity spawned");
        Ok(id)
    }

    /// Tear down an entity. Unknown ids return false and change nothing.
    pub fn dispose(&mut self, id: EntityId) -> bool {
        let Some(entity) = self.entities.remove(&id) else {
            return false;
        };
        if let Some(body) = entity.body {
            self.subscriptions.remove(&body);
            self.physics.remove_body(body);
        }
        self.scene.remove_node(entity.node);
        tracing::debug!(%id, name = %entity.name, "entity disposed");
        self.events.push(RegistryEvent::Disposed {
            id,
            name: entity.name,
        });
        true
    }

    /// Dispose every non-persistent entity. Returns how many were removed.
    pub fn reset_all(&mut self) -> usize {
        let doomed: Vec<EntityId> = self
            .entities
            .values()
            .filter(|e| !e.persistent)
            .map(|e| e.id)
            .collect();
        for id in &doomed {
            self.dispose(*id);
        }
        if !doomed.is_empty() {
            tracing::info!(removed = doomed.len(), "registry reset");
        }
        doomed.len()
    }

    /// Copy every body's pose into its proxy. Scale stays as spawned.
    pub fn sync_frame(&mut self) {
        for entity in self.entities.values_mut() {
            let Some(body) = entity.body else { continue };
            let Some((position, rotation)) = self.physics.body_pose(body) else {
                continue;
            };
            entity.transform.position = position;
            entity.transform.rotation = rotation;
            self.scene.set_transform(entity.node, entity.transform);
        }
    }

    /// Run `stepper` against the owned world and route the resulting impacts.
    pub fn advance(&mut self, stepper: &mut Stepper, elapsed: f64) -> StepOutcome {
        let report = stepper.step(elapsed, &mut self.physics);
        StepOutcome {
            substeps: report.substeps,
            impacts: report
                .impacts
                .iter()
                .filter_map(|impact| self.route_impact(impact))
                .collect(),
        }
    }

    /// Resolve an impact to its subscribed entity, if that entity is still live.
    pub fn route_impact(&self, impact: &Impact) -> Option<RoutedImpact> {
        let entity = *self.subscriptions.get(&impact.body)?;
        Some(RoutedImpact {
            entity,
            speed: impact.speed,
        })
    }

    /// Show `color` on the entity's proxy. Returns false for unknown ids.
    pub fn paint(&mut self, id: EntityId, color: Color) -> bool {
        let Some(entity) = self.entities.get_mut(&id) else {
            return false;
        };
        if entity.color != color {
            entity.color = color;
            self.scene.set_color(entity.node, color);
        }
        true
    }

    /// Restore the entity's base color.
    pub fn unpaint(&mut self, id: EntityId) -> bool {
        match self.entities.get(&id).map(|e| e.base_color) {
            Some(base) => self.paint(id, base),
            None => false,
        }
    }
}
