use crate::view_model::PanelViewModel;
use crate::{Effect, PanelSettings, Surface};

/// Layout owned by the panel for the lifetime of a page view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayoutState {
    pub collapsed: bool,
    pub width_px: u32,
    pub toggle_top_px: u32,
}

/// Discrete states of the interaction machine, including the transient drag states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPhase {
    #[default]
    Collapsed,
    Expanded,
    ResizingFromHandle,
    DraggingToggle,
}

/// An in-flight press on one of the panel surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Gesture {
    pub surface: Surface,
    pub press_x: i32,
    pub press_y: i32,
    /// Width (handle) or toggle offset (toggle) captured at press time.
    pub origin_px: u32,
    /// Latched once displacement exceeds the click threshold.
    pub dragging: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PanelState {
    settings: PanelSettings,
    layout: PanelLayoutState,
    gesture: Option<Gesture>,
    dirty: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self::with_settings(PanelSettings::default())
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: PanelSettings) -> Self {
        let layout = PanelLayoutState {
            collapsed: settings.start_collapsed,
            width_px: settings.clamp_width(i64::from(settings.default_width_px)),
            toggle_top_px: settings.max_toggle_top() / 2,
        };
        Self {
            settings,
            layout,
            gesture: None,
            dirty: false,
        }
    }

    pub fn view(&self) -> PanelViewModel {
        PanelViewModel {
            phase: self.phase(),
            collapsed: self.layout.collapsed,
            width_px: self.layout.width_px,
            toggle_top_px: self.layout.toggle_top_px,
            toggle_visible: self.layout.collapsed,
            dirty: self.dirty,
        }
    }

    pub fn phase(&self) -> PanelPhase {
        match (self.gesture, self.layout.collapsed) {
            (
                Some(Gesture {
                    surface: Surface::ResizeHandle,
                    dragging: true,
                    ..
                }),
                false,
            ) => PanelPhase::ResizingFromHandle,
            (
                Some(Gesture {
                    surface: Surface::Toggle,
                    dragging: true,
                    ..
                }),
                true,
            ) => PanelPhase::DraggingToggle,
            (_, true) => PanelPhase::Collapsed,
            (_, false) => PanelPhase::Expanded,
        }
    }

    pub fn layout(&self) -> PanelLayoutState {
        self.layout
    }

    pub fn settings(&self) -> &PanelSettings {
        &self.settings
    }

    pub fn gesture(&self) -> Option<Gesture> {
        self.gesture
    }

    /// Returns whether a render is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Effects that reproduce the whole current layout on freshly inserted elements.
    pub(crate) fn mount_effects(&self) -> Vec<Effect> {
        let layout = self.layout;
        vec![
            Effect::SetCollapsed {
                collapsed: layout.collapsed,
            },
            Effect::SetPanelWidth {
                width_px: layout.width_px,
            },
            Effect::SetToggleTop {
                top_px: layout.toggle_top_px,
            },
            Effect::SetToggleVisible {
                visible: layout.collapsed,
            },
            Effect::Reflow {
                width_px: (!layout.collapsed).then_some(layout.width_px),
            },
        ]
    }

    pub(crate) fn begin_gesture(&mut self, surface: Surface, x: i32, y: i32) -> bool {
        let origin_px = match (surface, self.layout.collapsed) {
            (Surface::ResizeHandle, false) => self.layout.width_px,
            (Surface::Toggle, true) => self.layout.toggle_top_px,
            // The handle is hidden while collapsed and the toggle while expanded.
            _ => return false,
        };
        self.gesture = Some(Gesture {
            surface,
            press_x: x,
            press_y: y,
            origin_px,
            dragging: false,
        });
        true
    }

    pub(crate) fn end_gesture(&mut self) -> Option<Gesture> {
        self.gesture.take()
    }

    /// Applies pointer displacement to the active gesture and returns resulting effects.
    pub(crate) fn track_pointer(&mut self, x: i32, y: i32) -> Vec<Effect> {
        let Some(gesture) = self.gesture.as_mut() else {
            return Vec::new();
        };

        match gesture.surface {
            Surface::ResizeHandle => {
                let delta = i64::from(gesture.press_x) - i64::from(x);
                if self.settings.exceeds_click_threshold(delta) {
                    gesture.dragging = true;
                }
                if !gesture.dragging {
                    return Vec::new();
                }
                // Right-anchored panel: a leftward drag grows the width.
                let width = self
                    .settings
                    .clamp_width(i64::from(gesture.origin_px) + delta);
                if width == self.layout.width_px {
                    return Vec::new();
                }
                self.layout.width_px = width;
                self.dirty = true;
                vec![
                    Effect::SetPanelWidth { width_px: width },
                    Effect::Reflow {
                        width_px: Some(width),
                    },
                ]
            }
            Surface::Toggle => {
                let delta = i64::from(y) - i64::from(gesture.press_y);
                if self.settings.exceeds_click_threshold(delta) {
                    gesture.dragging = true;
                }
                if !gesture.dragging {
                    return Vec::new();
                }
                let top = self
                    .settings
                    .clamp_toggle_top(i64::from(gesture.origin_px) + delta);
                if top == self.layout.toggle_top_px {
                    return Vec::new();
                }
                self.layout.toggle_top_px = top;
                self.dirty = true;
                vec![Effect::SetToggleTop { top_px: top }]
            }
        }
    }

    pub(crate) fn collapse(&mut self) -> Vec<Effect> {
        self.layout.collapsed = true;
        self.dirty = true;
        vec![
            Effect::SetCollapsed { collapsed: true },
            Effect::Reflow { width_px: None },
            Effect::SetToggleVisible { visible: true },
        ]
    }

    pub(crate) fn expand(&mut self) -> Vec<Effect> {
        self.layout.collapsed = false;
        self.dirty = true;
        let width_px = self.layout.width_px;
        vec![
            Effect::SetCollapsed { collapsed: false },
            Effect::SetPanelWidth { width_px },
            Effect::Reflow {
                width_px: Some(width_px),
            },
            Effect::SetToggleVisible { visible: false },
        ]
    }

    pub(crate) fn resize_viewport(&mut self, height_px: u32) -> Vec<Effect> {
        self.settings.viewport_height_px = height_px;
        let top = self
            .settings
            .clamp_toggle_top(i64::from(self.layout.toggle_top_px));
        if top == self.layout.toggle_top_px {
            return Vec::new();
        }
        self.layout.toggle_top_px = top;
        self.dirty = true;
        vec![Effect::SetToggleTop { top_px: top }]
    }
}
