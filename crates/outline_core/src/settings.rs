/// Geometry and gesture tuning for the outline panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelSettings {
    pub min_width_px: u32,
    pub max_width_px: u32,
    /// Width applied on first expand, before any resize.
    pub default_width_px: u32,
    /// Press-to-release displacement up to which a gesture still counts as a click.
    pub click_threshold_px: u32,
    pub toggle_height_px: u32,
    pub viewport_height_px: u32,
    pub start_collapsed: bool,
}

impl Default for PanelSettings {
    fn default() -> Self {
        Self {
            min_width_px: 200,
            max_width_px: 800,
            default_width_px: 300,
            click_threshold_px: 3,
            toggle_height_px: 40,
            viewport_height_px: 800,
            start_collapsed: true,
        }
    }
}

impl PanelSettings {
    pub fn clamp_width(&self, raw: i64) -> u32 {
        raw.clamp(i64::from(self.min_width_px), i64::from(self.max_width_px)) as u32
    }

    /// Largest toggle offset that keeps the button fully inside the viewport.
    pub fn max_toggle_top(&self) -> u32 {
        self.viewport_height_px.saturating_sub(self.toggle_height_px)
    }

    pub fn clamp_toggle_top(&self, raw: i64) -> u32 {
        raw.clamp(0, i64::from(self.max_toggle_top())) as u32
    }

    pub fn exceeds_click_threshold(&self, delta: i64) -> bool {
        delta.unsigned_abs() > u64::from(self.click_threshold_px)
    }
}
