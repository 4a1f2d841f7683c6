/// Draggable surfaces owned by the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Vertical strip on the panel's left edge.
    ResizeHandle,
    /// Floating button shown while the panel is collapsed.
    Toggle,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// Panel elements were (re)inserted into the page; replay the current layout.
    Mounted,
    /// Pointer pressed on one of the panel's surfaces.
    Press { surface: Surface, x: i32, y: i32 },
    /// Pointer moved anywhere in the document.
    Move { x: i32, y: i32 },
    /// Pointer released anywhere in the document.
    Release { x: i32, y: i32 },
    /// Browser viewport height changed.
    ViewportResized { height_px: u32 },
    /// Input the panel does not react to; leaves state and effects untouched.
    NoOp,
}
