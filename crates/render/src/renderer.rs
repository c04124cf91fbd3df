use std::fmt::Write;

use glam::Vec3;

use crate::scene::HeadlessScene;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy)]
pub struct RenderView {
    /// Camera position in world space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
}

impl Default for RenderView {
    fn default() -> Self {
        Self {
            eye: Vec3::new(5.0, 10.0, 5.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
        }
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads the scene and a view, then produces output. It never
/// mutates the scene.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> Self::Output;
}

/// Produces a human-readable dump of the scene. Used by the CLI and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &HeadlessScene, view: &RenderView) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene ({} nodes) ===", scene.len());
        let _ = writeln!(
            out,
            "Camera: eye=({:.1}, {:.1}, {:.1}) target=({:.1}, {:.1}, {:.1}) fov={:.0}",
            view.eye.x, view.eye.y, view.eye.z, view.target.x, view.target.y, view.target.z,
            view.fov_degrees
        );
        for (id, node) in scene.nodes() {
            let p = node.transform.position;
            let [r, g, b] = node.color.0;
            let _ = writeln!(
                out,
                "  [{:>4}] {:<12} pos=({:.2}, {:.2}, {:.2}) color=({:.2}, {:.2}, {:.2})",
                id.0, node.name, p.x, p.y, p.z, r, g, b
            );
        }
        out
    }
}
