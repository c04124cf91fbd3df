use glam::{Quat, Vec3};
use parking_lot::Mutex;
use propscape_common::{BodyDesc, Shape, Transform};
use rapier3d::prelude::*;
use serde::{Deserialize, Serialize};

/// Opaque handle to a body owned by a [`PhysicsWorld`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BodyHandle(RigidBodyHandle);

/// A collision that started during a fixed step, reported once per body involved.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Impact {
    pub body: BodyHandle,
    pub other: Option<BodyHandle>,
    /// Relative linear speed of the two bodies along the contact normal.
    pub speed: f32,
}

/// World-level physics parameters. Contact material values are shared by all bodies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    pub friction: f32,
    pub restitution: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -28.0, 0.0),
            friction: 0.1,
            restitution: 0.2,
        }
    }
}

/// Collects collision starts raised inside the rapier pipeline.
///
/// Rapier requires `Send + Sync` event handlers, so the buffer sits behind a
/// mutex; it is drained after every fixed step.
#[derive(Default)]
struct ImpactCollector {
    impacts: Mutex<Vec<Impact>>,
}

impl ImpactCollector {
    fn drain(&self) -> Vec<Impact> {
        std::mem::take(&mut *self.impacts.lock())
    }
}

impl EventHandler for ImpactCollector {
    fn handle_collision_event(
        &self,
        bodies: &RigidBodySet,
        colliders: &ColliderSet,
        event: CollisionEvent,
        contact_pair: Option<&ContactPair>,
    ) {
        if !event.started() {
            return;
        }
        // Sensors have no contact pair and no meaningful normal.
        let Some(normal) = contact_pair
            .and_then(|pair| pair.manifolds.first())
            .map(|manifold| manifold.data.normal)
        else {
            return;
        };

        let parent = |h: ColliderHandle| colliders.get(h).and_then(|c| c.parent());
        let velocity = |h: Option<RigidBodyHandle>| {
            h.and_then(|h| bodies.get(h))
                .map(|rb| *rb.linvel())
                .unwrap_or_else(Vector::<Real>::zeros)
        };

        let body1 = parent(event.collider1());
        let body2 = parent(event.collider2());
        let speed = (velocity(body1) - velocity(body2)).dot(&normal).abs();

        let mut impacts = self.impacts.lock();
        for (body, other) in [(body1, body2), (body2, body1)] {
            if let Some(body) = body {
                impacts.push(Impact {
                    body: BodyHandle(body),
                    other: other.map(BodyHandle),
                    speed,
                });
            }
        }
    }

    fn handle_contact_force_event(
        &self,
        _dt: Real,
        _bodies: &RigidBodySet,
        _colliders: &ColliderSet,
        _contact_pair: &ContactPair,
        _total_force_magnitude: Real,
    ) {
    }
}

/// Rigid-body world backed by rapier.
///
/// Bodies are created from shared descriptors and addressed by [`BodyHandle`].
/// Shapes are taken at face value: `Transform::scale` only affects the render
/// proxy, never the collider.
pub struct PhysicsWorld {
    settings: PhysicsSettings,
    integration_parameters: IntegrationParameters,
    pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    bodies: RigidBodySet,
    colliders: ColliderSet,
    impulse_joints: ImpulseJointSet,
    multibody_joints: MultibodyJointSet,
    ccd_solver: CCDSolver,
    collector: ImpactCollector,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new(PhysicsSettings::default())
    }
}

impl PhysicsWorld {
    pub fn new(settings: PhysicsSettings) -> Self {
        Self {
            settings,
            integration_parameters: IntegrationParameters::default(),
            pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            bodies: RigidBodySet::new(),
            colliders: ColliderSet::new(),
            impulse_joints: ImpulseJointSet::new(),
            multibody_joints: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            collector: ImpactCollector::default(),
        }
    }

    pub fn settings(&self) -> &PhysicsSettings {
        &self.settings
    }

    /// Number of live bodies.
    pub fn body_count(&self) -> usize {
        self.bodies.len()
    }

    pub fn contains(&self, handle: BodyHandle) -> bool {
        self.bodies.contains(handle.0)
    }

    /// Create a body with one collider. A mass of zero creates a fixed body.
    pub fn add_body(
        &mut self,
        shape: &Shape,
        transform: &Transform,
        desc: &BodyDesc,
        collision_events: bool,
    ) -> BodyHandle {
        let p = transform.position;
        let (axis, angle) = transform.rotation.to_axis_angle();
        let scaled_axis = axis * angle;

        let builder = if desc.mass > 0.0 {
            RigidBodyBuilder::dynamic()
        } else {
            RigidBodyBuilder::fixed()
        };
        let body = builder
            .translation(vector![p.x, p.y, p.z])
            .rotation(vector![scaled_axis.x, scaled_axis.y, scaled_axis.z])
            .build();
        let handle = self.bodies.insert(body);

        let mut collider = match *shape {
            Shape::Cuboid { half_extents: h } => ColliderBuilder::cuboid(h.x, h.y, h.z),
            Shape::Ball { radius } => ColliderBuilder::ball(radius),
        }
        .friction(self.settings.friction)
        .restitution(self.settings.restitution);
        if desc.mass > 0.0 {
            collider = collider.mass(desc.mass);
        }
        if collision_events {
            collider = collider.active_events(ActiveEvents::COLLISION_EVENTS);
        }
        self.colliders
            .insert_with_parent(collider.build(), handle, &mut self.bodies);

        BodyHandle(handle)
    }

    /// Remove a body and its collider. Returns false for unknown handles.
    pub fn remove_body(&mut self, handle: BodyHandle) -> bool {
        self.bodies
            .remove(
                handle.0,
                &mut self.island_manager,
                &mut self.colliders,
                &mut self.impulse_joints,
                &mut self.multibody_joints,
                true,
            )
            .is_some()
    }

    /// Current position and orientation of a body.
    pub fn body_pose(&self, handle: BodyHandle) -> Option<(Vec3, Quat)> {
        let body = self.bodies.get(handle.0)?;
        let t = body.translation();
        let r = body.rotation();
        Some((Vec3::new(t.x, t.y, t.z), Quat::from_xyzw(r.i, r.j, r.k, r.w)))
    }

    pub fn linear_velocity(&self, handle: BodyHandle) -> Option<Vec3> {
        let v = self.bodies.get(handle.0)?.linvel();
        Some(Vec3::new(v.x, v.y, v.z))
    }

    /// Advance the world by exactly one fixed step of `dt` seconds and return
    /// the collisions that started during it.
    pub fn step_fixed(&mut self, dt: f32) -> Vec<Impact> {
        let g = self.settings.gravity;
        let gravity = vector![g.x, g.y, g.z];
        self.integration_parameters.dt = dt;
        self.pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.bodies,
            &mut self.colliders,
            &mut self.impulse_joints,
            &mut self.multibody_joints,
            &mut self.ccd_solver,
            None,
            &(),
            &self.collector,
        );
        self.collector.drain()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn floor(world: &mut PhysicsWorld) -> BodyHandle {
        world.add_body(
            &Shape::cuboid(20.0, 1000.0, 20.0),
            &Transform::from_position(Vec3::new(0.0, -500.0, 0.0)),
            &BodyDesc { mass: 0.0 },
            true,
        )
    }

    #[test]
    fn add_and_remove_body() {
        let mut world = PhysicsWorld::default();
        let h = world.add_body(
            &Shape::ball(0.5),
            &Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
            &BodyDesc::default(),
            false,
        );
        assert_eq!(world.body_count(), 1);
        assert!(world.contains(h));
        assert!(world.remove_body(h));
        assert!(!world.contains(h));
        assert!(!world.remove_body(h));
        assert!(world.body_pose(h).is_none());
    }

    #[test]
    fn dynamic_body_falls() {
        let mut world = PhysicsWorld::default();
        let h = world.add_body(
            &Shape::ball(0.5),
            &Transform::from_position(Vec3::new(0.0, 10.0, 0.0)),
            &BodyDesc::default(),
            false,
        );
        for _ in 0..10 {
            world.step_fixed(1.0 / 60.0);
        }
        let (p, _) = world.body_pose(h).unwrap();
        assert!(p.y < 10.0);
        assert!(world.linear_velocity(h).unwrap().y < 0.0);
    }

    #[test]
    fn fixed_body_does_not_move() {
        let mut world = PhysicsWorld::default();
        let h = floor(&mut world);
        for _ in 0..10 {
            world.step_fixed(1.0 / 60.0);
        }
        let (p, _) = world.body_pose(h).unwrap();
        assert_eq!(p, Vec3::new(0.0, -500.0, 0.0));
    }

    #[test]
    fn landing_reports_impact_for_both_bodies() {
        let mut world = PhysicsWorld::default();
        let floor = floor(&mut world);
        let boxed = world.add_body(
            &Shape::cuboid(1.0, 1.0, 1.0),
            &Transform::from_position(Vec3::new(0.0, 3.0, 0.0)),
            &BodyDesc::default(),
            true,
        );

        let mut impacts = Vec::new();
        for _ in 0..120 {
            impacts.extend(world.step_fixed(1.0 / 60.0));
        }
        let first = impacts
            .iter()
            .find(|i| i.body == boxed)
            .expect("box should hit the floor");
        assert_eq!(first.other, Some(floor));
        assert!(first.speed > 1.5, "speed was {}", first.speed);
        assert!(impacts.iter().any(|i| i.body == floor));
    }
}
