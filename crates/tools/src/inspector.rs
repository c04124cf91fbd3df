use propscape_common::{Category, EntityId};
use propscape_registry::Registry;
use propscape_render::SceneGraph;

/// Registry inspector for developer tooling.
pub struct RegistryInspector;

impl RegistryInspector {
    pub fn summary<S: SceneGraph>(registry: &Registry<S>) -> RegistrySummary {
        RegistrySummary {
            entity_count: registry.len(),
            persistent_count: registry.persistent_count(),
            dynamic_count: registry.dynamic_count(),
            pickable_count: registry.pickables().count(),
            body_count: registry.physics().body_count(),
            pending_events: registry.events().len(),
        }
    }

    pub fn inspect_entity<S: SceneGraph>(
        registry: &Registry<S>,
        id: EntityId,
    ) -> Option<EntityInfo> {
        registry.get(id).map(|e| {
            let p = e.transform.position;
            let s = e.transform.scale;
            EntityInfo {
                id,
                name: e.name.clone(),
                category: e.category,
                has_body: e.body.is_some(),
                pickable: e.pickable,
                persistent: e.persistent,
                position: [p.x, p.y, p.z],
                scale: [s.x, s.y, s.z],
            }
        })
    }

    /// All entity ids in spawn order.
    pub fn list_entities<S: SceneGraph>(registry: &Registry<S>) -> Vec<EntityId> {
        registry.iter().map(|e| e.id).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrySummary {
    pub entity_count: usize,
    pub persistent_count: usize,
    pub dynamic_count: usize,
    pub pickable_count: usize,
    pub body_count: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for RegistrySummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Registry: entities={} persistent={} dynamic={} pickable={} bodies={} pending_events={}",
            self.entity_count,
            self.persistent_count,
            self.dynamic_count,
            self.pickable_count,
            self.body_count,
            self.pending_events
        )
    }
}

#[derive(Debug, Clone)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub category: Category,
    pub has_body: bool,
    pub pickable: bool,
    pub persistent: bool,
    pub position: [f32; 3],
    pub scale: [f32; 3],
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut flags = String::new();
        if self.has_body {
            flags.push('B');
        }
        if self.pickable {
            flags.push('P');
        }
        if self.persistent {
            flags.push('S');
        }
        write!(
            f,
            "Entity [{}] {} {:?} [{}] pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.id,
            self.name,
            self.category,
            flags,
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use propscape_common::EntityDescriptor;
    use propscape_physics::{PhysicsSettings, PhysicsWorld};
    use propscape_render::HeadlessScene;

    fn registry() -> Registry<HeadlessScene> {
        Registry::new(PhysicsWorld::new(PhysicsSettings::default()), HeadlessScene::new())
    }

    #[test]
    fn summary_empty_registry() {
        let reg = registry();
        let summary = RegistryInspector::summary(&reg);
        assert_eq!(summary.entity_count, 0);
        assert_eq!(summary.body_count, 0);
    }

    #[test]
    fn summary_counts_by_kind() {
        let mut reg = registry();
        reg.spawn(&EntityDescriptor::fixed_box("floor", Vec3::ONE, Vec3::ZERO)).unwrap();
        reg.spawn(&EntityDescriptor::dynamic_box(Vec3::ONE, Vec3::Y)).unwrap();
        reg.spawn(&EntityDescriptor::dynamic_ball(0.5, Vec3::Y).pickable()).unwrap();

        let summary = RegistryInspector::summary(&reg);
        assert_eq!(summary.entity_count, 3);
        assert_eq!(summary.persistent_count, 1);
        assert_eq!(summary.dynamic_count, 2);
        assert_eq!(summary.pickable_count, 1);
        assert_eq!(summary.body_count, 3);
        assert_eq!(summary.pending_events, 3);
    }

    #[test]
    fn inspect_entity_found() {
        let mut reg = registry();
        let id = reg
            .spawn(&EntityDescriptor::dynamic_box(Vec3::ONE, Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        let info = RegistryInspector::inspect_entity(&reg, id).unwrap();
        assert_eq!(info.position, [1.0, 2.0, 3.0]);
        assert!(info.has_body);
        let line = info.to_string();
        assert!(line.contains("[e1] box"));
        assert!(line.contains("pos=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn inspect_entity_not_found() {
        let reg = registry();
        assert!(RegistryInspector::inspect_entity(&reg, EntityId(42)).is_none());
    }

    #[test]
    fn list_entities_in_spawn_order() {
        let mut reg = registry();
        let a = reg.spawn(&EntityDescriptor::dynamic_box(Vec3::ONE, Vec3::Y)).unwrap();
        let b = reg.spawn(&EntityDescriptor::dynamic_box(Vec3::ONE, Vec3::Y)).unwrap();
        assert_eq!(RegistryInspector::list_entities(&reg), vec![a, b]);
    }

    #[test]
    fn summary_display() {
        let s = RegistryInspector::summary(&registry()).to_string();
        assert!(s.contains("entities=0"));
    }
}
