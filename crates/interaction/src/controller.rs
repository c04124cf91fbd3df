use propscape_common::{Category, Color, EntityDescriptor, EntityId, FocusOverlay, Transform};
use propscape_input::{Camera, PointerState, Ray};
use propscape_registry::{Entity, Registry};
use propscape_render::SceneGraph;
use propscape_spawn::{DropPattern, DropPatternConfig, StaggerQueue};
use serde::{Deserialize, Serialize};

use crate::surface::PageSurface;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    pub hover_color: Color,
    /// Drops requested by one click on a spawn trigger.
    pub burst_size: usize,
    pub burst_stagger: f64,
    pub burst_pattern: DropPatternConfig,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            hover_color: Color::from_hex(0xff0000),
            burst_size: 5,
            burst_stagger: 0.1,
            burst_pattern: DropPatternConfig {
                seed: 0xb0057,
                ..DropPatternConfig::default()
            },
        }
    }
}

/// What is currently focused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget {
    /// Enlarged inspection proxy spawned for the focused prop.
    Entity(EntityId),
    /// Named overlay panel on the page.
    Panel(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InteractionState {
    Idle,
    Hovering(EntityId),
    Focused(FocusTarget),
}

/// Interaction changes, in the order they happened.
#[derive(Debug, Clone, PartialEq)]
pub enum InteractionEvent {
    FocusEntered { source: EntityId, target: FocusTarget },
    FocusExited { target: FocusTarget },
    LinkOpened { source: EntityId, url: String },
    BurstScheduled { source: EntityId, count: usize },
}

/// Per-frame picking plus the click state machine.
#[derive(Debug)]
pub struct InteractionController {
    config: InteractionConfig,
    current_intersect: Option<EntityId>,
    focused: Option<FocusTarget>,
    burst: StaggerQueue,
    pattern: DropPattern,
    events: Vec<InteractionEvent>,
}

impl InteractionController {
    pub fn new(config: InteractionConfig) -> Self {
        let pattern = DropPattern::new(config.burst_pattern.clone());
        Self {
            config,
            current_intersect: None,
            focused: None,
            burst: StaggerQueue::new(),
            pattern,
            events: Vec::new(),
        }
    }

    pub fn config(&self) -> &InteractionConfig {
        &self.config
    }

    /// Nearest pickable under the pointer as of the last update.
    pub fn current_intersect(&self) -> Option<EntityId> {
        self.current_intersect
    }

    pub fn focused(&self) -> Option<&FocusTarget> {
        self.focused.as_ref()
    }

    pub fn is_focused(&self) -> bool {
        self.focused.is_some()
    }

    pub fn state(&self) -> InteractionState {
        match (&self.focused, self.current_intersect) {
            (Some(target), _) => InteractionState::Focused(target.clone()),
            (None, Some(id)) => InteractionState::Hovering(id),
            (None, None) => InteractionState::Idle,
        }
    }

    /// Burst spawns not yet released.
    pub fn pending_burst(&self) -> usize {
        self.burst.len()
    }

    pub fn events(&self) -> &[InteractionEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<InteractionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Run one frame: re-pick, repaint, handle a click, release due burst
    /// spawns. Returns the ids of entities spawned by the burst this frame.
    pub fn update<S: SceneGraph>(
        &mut self,
        now: f64,
        camera: &Camera,
        pointer: &PointerState,
        registry: &mut Registry<S>,
        surface: &mut dyn PageSurface,
    ) -> Vec<EntityId> {
        let ray = pointer.ndc.map(|ndc| camera.ray_from_ndc(ndc));
        self.current_intersect = ray.and_then(|ray| pick(&ray, registry.pickables()));
        self.repaint(registry);

        if pointer.clicked {
            self.click(now, registry, surface);
        }

        self.release_burst(now, registry)
    }

    /// Leave focus and drop pending bursts. Hover is recomputed next frame.
    pub fn reset<S: SceneGraph>(
        &mut self,
        registry: &mut Registry<S>,
        surface: &mut dyn PageSurface,
    ) {
        self.exit_focus(registry, surface);
        self.burst.cancel();
        self.current_intersect = None;
    }

    fn repaint<S: SceneGraph>(&self, registry: &mut Registry<S>) {
        let ids: Vec<EntityId> = registry.pickables().map(|e| e.id).collect();
        for id in ids {
            if Some(id) == self.current_intersect {
                registry.paint(id, self.config.hover_color);
            } else {
                registry.unpaint(id);
            }
        }
    }

    fn click<S: SceneGraph>(
        &mut self,
        now: f64,
        registry: &mut Registry<S>,
        surface: &mut dyn PageSurface,
    ) {
        if self.focused.is_some() {
            self.exit_focus(registry, surface);
            return;
        }
        let Some(hit) = self.current_intersect.and_then(|id| registry.get(id)).cloned() else {
            return;
        };

        if hit.spawn_trigger {
            let batch = self.pattern.batch(self.config.burst_size);
            let count = batch.len();
            self.burst.schedule_batch(now, self.config.burst_stagger, batch);
            tracing::info!(source = %hit.id, count, "burst scheduled");
            self.events.push(InteractionEvent::BurstScheduled {
                source: hit.id,
                count,
            });
            return;
        }

        match (hit.category, &hit.link, &hit.focus) {
            (Category::Navigational, Some(url), _) => {
                tracing::info!(source = %hit.id, %url, "opening link");
                surface.open_link(url);
                self.events.push(InteractionEvent::LinkOpened {
                    source: hit.id,
                    url: url.clone(),
                });
            }
            (Category::StaticPickable, _, Some(overlay)) => {
                self.enter_focus(&hit, overlay, registry, surface);
            }
            _ => {}
        }
    }

    fn enter_focus<S: SceneGraph>(
        &mut self,
        source: &Entity,
        overlay: &FocusOverlay,
        registry: &mut Registry<S>,
        surface: &mut dyn PageSurface,
    ) {
        registry.reset_all();
        self.burst.cancel();

        let target = match overlay {
            FocusOverlay::Panel { name } => {
                surface.show_panel(name);
                FocusTarget::Panel(name.clone())
            }
            FocusOverlay::Enlarge { position, scale } => {
                let mut desc = EntityDescriptor::static_prop(
                    format!("{} (focus)", source.name),
                    source.shape,
                    Transform {
                        position: *position,
                        rotation: source.transform.rotation,
                        scale: source.transform.scale * *scale,
                    },
                )
                .with_color(source.base_color);
                desc.mesh = source.mesh.clone();
                // Transient: a reset clears it like any other spawned entity.
                desc.persistent = false;
                match registry.spawn(&desc) {
                    Ok(id) => FocusTarget::Entity(id),
                    Err(e) => {
                        tracing::warn!(source = %source.id, error = %e, "could not spawn focus proxy");
                        return;
                    }
                }
            }
        };

        tracing::info!(source = %source.id, ?target, "focus entered");
        self.events.push(InteractionEvent::FocusEntered {
            source: source.id,
            target: target.clone(),
        });
        self.focused = Some(target);
    }

    fn exit_focus<S: SceneGraph>(
        &mut self,
        registry: &mut Registry<S>,
        surface: &mut dyn PageSurface,
    ) {
        let Some(target) = self.focused.take() else {
            return;
        };
        match &target {
            FocusTarget::Panel(name) => surface.hide_panel(name),
            FocusTarget::Entity(id) => {
                registry.dispose(*id);
            }
        }
        tracing::info!(?target, "focus exited");
        self.events.push(InteractionEvent::FocusExited { target });
    }

    fn release_burst<S: SceneGraph>(
        &mut self,
        now: f64,
        registry: &mut Registry<S>,
    ) -> Vec<EntityId> {
        if self.focused.is_some() {
            self.burst.cancel();
            return Vec::new();
        }
        let mut spawned = Vec::new();
        for desc in self.burst.release_due(now) {
            match registry.spawn(&desc) {
                Ok(id) => spawned.push(id),
                Err(e) => tracing::warn!(name = %desc.name, error = %e, "burst spawn failed"),
            }
        }
        spawned
    }
}

/// Nearest entity hit by `ray`. Ties keep the entity seen first, which is the
/// lower id since the registry iterates in spawn order.
fn pick<'a>(ray: &Ray, candidates: impl Iterator<Item = &'a Entity>) -> Option<EntityId> {
    let mut best: Option<(f32, EntityId)> = None;
    for entity in candidates {
        let Some(t) = ray.intersect(&entity.shape, &entity.transform) else {
            continue;
        };
        if best.is_none_or(|(best_t, _)| t < best_t) {
            best = Some((t, entity.id));
        }
    }
    best.map(|(_, id)| id)
}
