#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Ask the content-reflow collaborator to yield `width_px`, or restore native layout on `None`.
    Reflow { width_px: Option<u32> },
    SetPanelWidth { width_px: u32 },
    SetCollapsed { collapsed: bool },
    SetToggleVisible { visible: bool },
    SetToggleTop { top_px: u32 },
    /// Marks the resize handle while it is held.
    SetResizing { active: bool },
    SetCursor {
        target: CursorTarget,
        cursor: Option<Cursor>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorTarget {
    Body,
    Toggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cursor {
    ColResize,
    Grabbing,
}

impl Cursor {
    pub fn css_value(self) -> &'static str {
        match self {
            Cursor::ColResize => "col-resize",
            Cursor::Grabbing => "grabbing",
        }
    }
}
