//! Outline engine: turn discovery, classification, outline building and the
//! page-facing panel session.
mod adapter;
mod classify;
mod discovery;
mod error;
mod html;
mod outline;
mod preview;
mod reflow;
mod render;
mod session;
mod source;
mod types;
mod watch;

pub use adapter::{AdapterConfig, AdapterRegistry, RoleRule};
pub use classify::classify;
pub use discovery::discover_turn_nodes;
pub use error::{AdapterError, HostError};
pub use html::HtmlPage;
pub use outline::{build_outline, collect_turns, scan};
pub use preview::{extract_preview, prepare_preview_text, MAX_PREVIEW_CHARS};
pub use reflow::{ContentReflow, MESSAGE_WIDTH_PROPERTY, WIDTH_PROPERTY};
pub use render::{
    item_label, outline_markup, panel_markup, toggle_markup, LIST_ID, PANEL_ID, PANEL_TITLE,
    RESIZER_ID, TOGGLE_ID, TURN_INDEX_ATTR,
};
pub use session::{PanelSession, SessionSettings, OPEN_CLASS};
pub use source::{HostPage, TurnSource};
pub use types::{Group, MutationKind, MutationRecord, Outline, Role, Turn};
pub use watch::{ChangeWatcher, Debouncer, WatchSettings};
