use crate::PanelPhase;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PanelViewModel {
    pub phase: PanelPhase,
    pub collapsed: bool,
    pub width_px: u32,
    pub toggle_top_px: u32,
    pub toggle_visible: bool,
    pub dirty: bool,
}

impl PanelViewModel {
    /// Width the host content must yield, if any.
    pub fn reserved_width_px(&self) -> Option<u32> {
        (!self.collapsed).then_some(self.width_px)
    }
}
