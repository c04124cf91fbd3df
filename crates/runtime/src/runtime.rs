use propscape_assets::{AssetStore, PropLoader};
use propscape_audio::{AudioSink, CollisionAudio};
use propscape_common::{EntityDescriptor, EntityId};
use propscape_input::{Camera, PointerState};
use propscape_interaction::{InteractionController, InteractionState, PageSurface};
use propscape_physics::{PhysicsWorld, Stepper};
use propscape_registry::{Registry, RegistryError};
use propscape_render::SceneGraph;
use propscape_spawn::PeriodicSpawner;

use crate::config::SceneConfig;

/// What one `tick` did.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameReport {
    pub frame: u64,
    pub substeps: u32,
    /// Impacts delivered to live subscribed entities.
    pub impacts: usize,
    /// Impacts loud enough to trigger the hit sound.
    pub sounds: usize,
    /// Entities spawned this frame by props, bursts and the ambient spawner.
    pub spawned: Vec<EntityId>,
    pub state: InteractionState,
}

/// The per-frame driver.
///
/// `S` is the scene graph, `A` the audio backend, `P` the page surface.
pub struct SceneRuntime<S, A, P> {
    registry: Registry<S>,
    stepper: Stepper,
    audio: CollisionAudio,
    sink: A,
    spawner: PeriodicSpawner,
    controller: InteractionController,
    surface: P,
    camera: Camera,
    assets: AssetStore,
    props: PropLoader,
    frame: u64,
}

impl<S: SceneGraph, A: AudioSink, P: PageSurface> SceneRuntime<S, A, P> {
    /// Build the runtime and place the floor. Props are placed by `tick` as
    /// their assets become ready.
    pub fn new(
        config: SceneConfig,
        scene: S,
        sink: A,
        surface: P,
    ) -> Result<Self, RegistryError> {
        let mut registry = Registry::new(PhysicsWorld::new(config.physics), scene);
        if let Some(floor) = config.floor {
            registry.spawn(&EntityDescriptor::fixed_box("floor", floor.size, floor.position))?;
        }

        let mut assets = AssetStore::new();
        let props = PropLoader::new(config.props);
        props.request_assets(&mut assets);
        if let Some(root) = &config.asset_root {
            let ready = assets.load_pending_from(root);
            tracing::info!(root = %root.display(), ready, "prop assets loaded");
        }

        Ok(Self {
            registry,
            stepper: Stepper::new(config.stepper),
            audio: CollisionAudio::new(config.audio),
            sink,
            spawner: PeriodicSpawner::new(config.spawner),
            controller: InteractionController::new(config.interaction),
            surface,
            camera: config.camera,
            assets,
            props,
            frame: 0,
        })
    }

    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut Registry<S> {
        &mut self.registry
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn spawner(&self) -> &PeriodicSpawner {
        &self.spawner
    }

    pub fn stepper(&self) -> &Stepper {
        &self.stepper
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn surface(&self) -> &P {
        &self.surface
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Camera controls write here between frames.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    /// The embedder reports finished asset loads here.
    pub fn assets_mut(&mut self) -> &mut AssetStore {
        &mut self.assets
    }

    pub fn props(&self) -> &PropLoader {
        &self.props
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Spawn on behalf of the user, e.g. a debug button.
    pub fn spawn(&mut self, desc: &EntityDescriptor) -> Result<EntityId, RegistryError> {
        self.registry.spawn(desc)
    }

    /// Advance one frame to `elapsed` seconds since start.
    pub fn tick(&mut self, elapsed: f64, pointer: &PointerState) -> FrameReport {
        self.frame += 1;
        let _span = tracing::info_span!("frame", frame = self.frame).entered();

        let outcome = self.registry.advance(&mut self.stepper, elapsed);

        self.audio.begin_frame(self.frame);
        let mut sounds = 0;
        for impact in &outcome.impacts {
            if self.audio.on_impact(impact.speed, &mut self.sink) {
                sounds += 1;
            }
        }

        self.registry.sync_frame();

        let mut spawned = self.props.poll(&self.assets, &mut self.registry);

        spawned.extend(self.controller.update(
            elapsed,
            &self.camera,
            pointer,
            &mut self.registry,
            &mut self.surface,
        ));

        for desc in self.spawner.update(elapsed, self.controller.is_focused()) {
            match self.registry.spawn(&desc) {
                Ok(id) => spawned.push(id),
                Err(e) => tracing::warn!(name = %desc.name, error = %e, "ambient spawn failed"),
            }
        }

        let report = FrameReport {
            frame: self.frame,
            substeps: outcome.substeps,
            impacts: outcome.impacts.len(),
            sounds,
            spawned,
            state: self.controller.state(),
        };
        tracing::trace!(
            substeps = report.substeps,
            impacts = report.impacts,
            sounds = report.sounds,
            spawned = report.spawned.len(),
            entities = self.registry.len(),
            "frame done"
        );
        report
    }

    /// Clear every transient entity and leave focus.
    pub fn reset(&mut self) -> usize {
        self.controller.reset(&mut self.registry, &mut self.surface);
        let removed = self.registry.reset_all();
        tracing::info!(removed, "scene reset");
        removed
    }
}
