//! Rendering Adapter: the scene-graph seam render proxies live behind.
//!
//! # Invariants
//! - The core only adds/removes nodes and sets their transform and color.
//! - Render state derives from the registry; the renderer never mutates it.
//!
//! `HeadlessScene` is the in-memory implementation used by tests and the CLI;
//! a GPU backend implements the same trait without touching consumers.

mod renderer;
mod scene;

pub use renderer::{DebugTextRenderer, RenderView, Renderer};
pub use scene::{HeadlessScene, ProxyDesc, SceneError, SceneGraph, SceneNode};
