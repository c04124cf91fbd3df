/// The page around the canvas: links and overlay panels.
pub trait PageSurface {
    /// Open `url`, typically in a new tab.
    fn open_link(&mut self, url: &str);

    fn show_panel(&mut self, name: &str);

    fn hide_panel(&mut self, name: &str);
}

/// Surface that ignores every request. Used by headless runs.
#[derive(Debug, Default)]
pub struct NullSurface;

impl PageSurface for NullSurface {
    fn open_link(&mut self, _url: &str) {}

    fn show_panel(&mut self, _name: &str) {}

    fn hide_panel(&mut self, _name: &str) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SurfaceCall {
    OpenLink(String),
    ShowPanel(String),
    HidePanel(String),
}

/// Surface that records every request in order.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub calls: Vec<SurfaceCall>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn links_opened(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, SurfaceCall::OpenLink(_)))
            .count()
    }
}

impl PageSurface for RecordingSurface {
    fn open_link(&mut self, url: &str) {
        self.calls.push(SurfaceCall::OpenLink(url.to_string()));
    }

    fn show_panel(&mut self, name: &str) {
        self.calls.push(SurfaceCall::ShowPanel(name.to_string()));
    }

    fn hide_panel(&mut self, name: &str) {
        self.calls.push(SurfaceCall::HidePanel(name.to_string()));
    }
}
