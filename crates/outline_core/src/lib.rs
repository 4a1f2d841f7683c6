//! Outline core: pure panel interaction state machine and view-model helpers.
mod effect;
mod msg;
mod settings;
mod state;
mod update;
mod view_model;

pub use effect::{Cursor, CursorTarget, Effect};
pub use msg::{Msg, Surface};
pub use settings::PanelSettings;
pub use state::{Gesture, PanelLayoutState, PanelPhase, PanelState};
pub use update::update;
pub use view_model::PanelViewModel;
