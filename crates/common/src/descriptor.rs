use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::types::{Color, Shape, Transform};

/// How an entity reacts to being picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Physics-driven clutter. Cleared by a reset.
    #[default]
    Dynamic,
    /// Static prop that can be inspected (opens a focus overlay).
    StaticPickable,
    /// Static prop that triggers an external action such as opening a link.
    Navigational,
}

/// What gets revealed when a `StaticPickable` entity is focused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FocusOverlay {
    /// External panel, shown and hidden through the page surface.
    Panel { name: String },
    /// Enlarged copy of the prop, placed at `position` and scaled by `scale`.
    Enlarge { position: Vec3, scale: f32 },
}

/// Rigid-body part of a descriptor. A mass of zero makes the body fixed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    pub mass: f32,
}

impl Default for BodyDesc {
    fn default() -> Self {
        Self { mass: 1.0 }
    }
}

/// Everything the registry needs to build one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EntityDescriptor {
    pub name: String,
    pub shape: Shape,
    pub transform: Transform,
    /// `None` makes a proxy-only entity (static decoration).
    pub body: Option<BodyDesc>,
    pub color: Color,
    /// Mesh asset the proxy renders, if any.
    pub mesh: Option<String>,
    pub category: Category,
    pub pickable: bool,
    /// Clicking this entity requests a burst of dynamic spawns.
    pub spawn_trigger: bool,
    /// Target of a `Navigational` click.
    pub link: Option<String>,
    pub focus: Option<FocusOverlay>,
    /// Persistent entities survive `reset_all`.
    pub persistent: bool,
    pub collision_audio: bool,
}

impl Default for EntityDescriptor {
    fn default() -> Self {
        Self {
            name: String::new(),
            shape: Shape::default(),
            transform: Transform::default(),
            body: None,
            color: Color::default(),
            mesh: None,
            category: Category::Dynamic,
            pickable: false,
            spawn_trigger: false,
            link: None,
            focus: None,
            persistent: false,
            collision_audio: true,
        }
    }
}

impl EntityDescriptor {
    /// Dynamic box of full size `size` at `position`, mass 1.
    pub fn dynamic_box(size: Vec3, position: Vec3) -> Self {
        Self {
            name: "box".into(),
            shape: Shape::cuboid(size.x, size.y, size.z),
            transform: Transform::from_position(position),
            body: Some(BodyDesc::default()),
            ..Self::default()
        }
    }

    /// Dynamic sphere at `position`, mass 1.
    pub fn dynamic_ball(radius: f32, position: Vec3) -> Self {
        Self {
            name: "sphere".into(),
            shape: Shape::ball(radius),
            transform: Transform::from_position(position),
            body: Some(BodyDesc::default()),
            ..Self::default()
        }
    }

    /// Persistent proxy-only prop.
    pub fn static_prop(name: impl Into<String>, shape: Shape, transform: Transform) -> Self {
        Self {
            name: name.into(),
            shape,
            transform,
            persistent: true,
            collision_audio: false,
            ..Self::default()
        }
    }

    /// Immovable box with a fixed body, kept across resets. Used for floors and walls.
    pub fn fixed_box(name: impl Into<String>, size: Vec3, position: Vec3) -> Self {
        Self {
            name: name.into(),
            shape: Shape::cuboid(size.x, size.y, size.z),
            transform: Transform::from_position(position),
            body: Some(BodyDesc { mass: 0.0 }),
            persistent: true,
            ..Self::default()
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_mass(mut self, mass: f32) -> Self {
        self.body = Some(BodyDesc { mass });
        self
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn pickable(mut self) -> Self {
        self.pickable = true;
        self
    }

    pub fn as_spawn_trigger(mut self) -> Self {
        self.pickable = true;
        self.spawn_trigger = true;
        self
    }

    pub fn with_link(mut self, link: impl Into<String>) -> Self {
        self.category = Category::Navigational;
        self.pickable = true;
        self.link = Some(link.into());
        self
    }

    pub fn with_focus(mut self, focus: FocusOverlay) -> Self {
        self.category = Category::StaticPickable;
        self.pickable = true;
        self.focus = Some(focus);
        self
    }

    /// True if the descriptor produces a rigid body with non-zero mass.
    pub fn is_dynamic(&self) -> bool {
        self.body.is_some_and(|b| b.mass > 0.0)
    }
}
