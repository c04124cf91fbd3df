use glam::Vec2;

/// Pointer sample for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Position in normalized device coordinates. `None` when the pointer is
    /// outside the viewport.
    pub ndc: Option<Vec2>,
    /// A click happened since the previous frame.
    pub clicked: bool,
}

impl PointerState {
    pub fn at(ndc: Vec2) -> Self {
        Self {
            ndc: Some(ndc),
            clicked: false,
        }
    }

    pub fn click_at(ndc: Vec2) -> Self {
        Self {
            ndc: Some(ndc),
            clicked: true,
        }
    }

    /// Map a pixel position (origin top-left, +y down) into NDC.
    pub fn from_screen(x: f32, y: f32, width: f32, height: f32, clicked: bool) -> Self {
        if width <= 0.0 || height <= 0.0 {
            return Self { ndc: None, clicked };
        }
        let ndc = Vec2::new(x / width * 2.0 - 1.0, -(y / height) * 2.0 + 1.0);
        Self {
            ndc: Some(ndc),
            clicked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn screen_corners_map_to_ndc() {
        let p = PointerState::from_screen(0.0, 0.0, 800.0, 600.0, false);
        assert_eq!(p.ndc, Some(Vec2::new(-1.0, 1.0)));
        let p = PointerState::from_screen(800.0, 600.0, 800.0, 600.0, true);
        assert_eq!(p.ndc, Some(Vec2::new(1.0, -1.0)));
        assert!(p.clicked);
        let p = PointerState::from_screen(400.0, 300.0, 800.0, 600.0, false);
        assert_eq!(p.ndc, Some(Vec2::ZERO));
    }

    #[test]
    fn empty_viewport_has_no_position() {
        let p = PointerState::from_screen(10.0, 10.0, 0.0, 600.0, true);
        assert!(p.ndc.is_none());
        assert!(p.clicked);
    }
}
