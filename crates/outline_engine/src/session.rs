use std::time::Instant;

use outline_core::{update, CursorTarget, Effect, Msg, PanelSettings, PanelState, PanelViewModel};
use outline_logging::{outline_debug, outline_error, outline_info, outline_warn};

use crate::outline::scan;
use crate::reflow::ContentReflow;
use crate::render::{
    outline_markup, panel_markup, toggle_markup, LIST_ID, PANEL_ID, RESIZER_ID, TOGGLE_ID,
    TURN_INDEX_ATTR,
};
use crate::watch::{ChangeWatcher, WatchSettings};
use crate::{AdapterConfig, AdapterRegistry, HostError, HostPage, MutationRecord, Outline};

/// Body class present while the panel is open.
pub const OPEN_CLASS: &str = "chatgpt-outline-open";
const COLLAPSED_CLASS: &str = "collapsed";
const RESIZING_CLASS: &str = "resizing";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionSettings {
    pub panel: PanelSettings,
    pub watch: WatchSettings,
}

/// One page view's outline panel: owns the layout state machine, the change
/// watcher with its debounce timer, and the latest outline.
pub struct PanelSession<P: HostPage> {
    page: P,
    adapter: Option<AdapterConfig>,
    reflow: ContentReflow,
    panel: PanelState,
    watcher: ChangeWatcher,
    outline: Outline<P::Node>,
    started: bool,
}

impl<P: HostPage> PanelSession<P> {
    pub fn new(
        page: P,
        registry: &AdapterRegistry,
        host_or_url: &str,
        settings: SessionSettings,
    ) -> Self {
        let adapter = registry.resolve(host_or_url).cloned();
        match &adapter {
            Some(adapter) => outline_info!("Using adapter {} for {}", adapter.name(), host_or_url),
            None => outline_info!("No adapter for {}; outline will stay empty", host_or_url),
        }
        let reflow = ContentReflow::new(adapter.as_ref());
        Self {
            page,
            adapter,
            reflow,
            panel: PanelState::with_settings(settings.panel),
            watcher: ChangeWatcher::new(settings.watch),
            outline: Outline::default(),
            started: false,
        }
    }

    /// Injects the panel, runs the first scan and starts observing mutations.
    pub fn start(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        self.ensure_panel();
        self.rescan();
        self.watcher.observe();
    }

    /// Stops observing, drops any pending scan and gives the host its layout back.
    /// The injected elements stay in place.
    pub fn stop(&mut self) {
        if !self.started {
            return;
        }
        self.started = false;
        self.watcher.disconnect();
        let panel = self.page.find_by_id(PANEL_ID);
        self.reflow.apply(&mut self.page, None, panel);
    }

    pub fn is_started(&self) -> bool {
        self.started
    }

    /// Feeds one input event through the state machine and applies its effects.
    /// Returns whether the panel layout changed.
    pub fn dispatch(&mut self, msg: Msg) -> bool {
        let state = std::mem::take(&mut self.panel);
        let (mut state, effects) = update(state, msg);
        let changed = state.consume_dirty();
        self.panel = state;
        for effect in effects {
            match self.apply_effect(&effect) {
                Ok(()) => {}
                Err(HostError::MissingBody) => {
                    outline_error!("Could not apply {:?}: document has no body", effect)
                }
                Err(err) => outline_warn!("Could not apply {:?}: {}", effect, err),
            }
        }
        changed
    }

    /// Handles one batch of mutation notifications.
    ///
    /// Missing panel elements are re-injected immediately; changes outside the
    /// panel then (re)start the debounce timer. Returns whether a re-scan is pending.
    pub fn on_mutations(&mut self, batch: &[MutationRecord<P::Node>], now: Instant) -> bool {
        if !self.started {
            return false;
        }
        if !self.panel_present() {
            outline_info!("Panel removed by host page; re-injecting");
            self.ensure_panel();
            self.render_outline();
        }
        let relevant: Vec<MutationRecord<P::Node>> = batch
            .iter()
            .filter(|record| !record.target.is_some_and(|t| self.inside_panel(t)))
            .cloned()
            .collect();
        self.watcher.on_mutations(&relevant, now);
        self.watcher.pending_deadline().is_some()
    }

    /// Timer expiry check; runs the debounced scan when due.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.watcher.poll(now) {
            return false;
        }
        self.rescan();
        true
    }

    /// Rebuilds the outline from the current page and renders it.
    /// Returns the number of turns in the new outline.
    pub fn rescan(&mut self) -> usize {
        let panel = self.page.find_by_id(PANEL_ID);
        let outline = scan(&self.page, self.adapter.as_ref(), panel);
        self.outline = outline;
        self.render_outline();
        self.watcher.record_scan();
        self.outline.turn_count()
    }

    /// Scrolls the source of the `index`-th turn into view; stale sources are a no-op.
    pub fn reveal(&mut self, index: usize) -> bool {
        let Some(source) = self.outline.turn(index).map(|turn| turn.source) else {
            return false;
        };
        let revealed = self.page.scroll_into_view(source);
        if !revealed {
            outline_debug!("Turn {} is no longer in the document", index);
        }
        revealed
    }

    /// Click on a rendered outline item.
    pub fn handle_item_click(&mut self, item: P::Node) -> bool {
        let index = self
            .page
            .attribute(item, TURN_INDEX_ATTR)
            .and_then(|raw| raw.parse::<usize>().ok());
        match index {
            Some(index) => self.reveal(index),
            None => false,
        }
    }

    pub fn outline(&self) -> &Outline<P::Node> {
        &self.outline
    }

    pub fn view(&self) -> PanelViewModel {
        self.panel.view()
    }

    pub fn adapter(&self) -> Option<&AdapterConfig> {
        self.adapter.as_ref()
    }

    pub fn watcher(&self) -> &ChangeWatcher {
        &self.watcher
    }

    pub fn page(&self) -> &P {
        &self.page
    }

    pub fn page_mut(&mut self) -> &mut P {
        &mut self.page
    }

    pub fn into_page(self) -> P {
        self.page
    }

    fn panel_present(&self) -> bool {
        self.page.find_by_id(PANEL_ID).is_some() && self.page.find_by_id(TOGGLE_ID).is_some()
    }

    fn inside_panel(&self, node: P::Node) -> bool {
        [PANEL_ID, TOGGLE_ID]
            .iter()
            .filter_map(|id| self.page.find_by_id(id))
            .any(|root| root == node || self.page.contains(root, node))
    }

    /// Inserts whichever panel elements are missing, then replays the layout onto them.
    fn ensure_panel(&mut self) {
        let mut inserted = false;
        for (id, markup) in [(PANEL_ID, panel_markup()), (TOGGLE_ID, toggle_markup())] {
            if self.page.find_by_id(id).is_some() {
                continue;
            }
            match self.page.append_to_body(&markup) {
                Ok(_) => inserted = true,
                Err(err) => outline_warn!("Could not insert #{}: {}", id, err),
            }
        }
        if inserted {
            self.dispatch(Msg::Mounted);
        }
    }

    fn render_outline(&mut self) {
        let list = match self.anchor(LIST_ID) {
            Ok(list) => list,
            Err(err) => {
                outline_warn!("Outline not rendered: {}", err);
                return;
            }
        };
        let markup = outline_markup(&self.outline);
        if let Err(err) = self.page.replace_children(list, &markup) {
            outline_warn!("Outline not rendered: {}", err);
        }
    }

    fn anchor(&self, id: &str) -> Result<P::Node, HostError> {
        self.page
            .find_by_id(id)
            .ok_or_else(|| HostError::MissingElement {
                selector: format!("#{id}"),
            })
    }

    fn apply_effect(&mut self, effect: &Effect) -> Result<(), HostError> {
        match effect {
            Effect::Reflow { width_px } => {
                let panel = self.page.find_by_id(PANEL_ID);
                self.reflow.apply(&mut self.page, *width_px, panel);
            }
            Effect::SetPanelWidth { width_px } => {
                let panel = self.anchor(PANEL_ID)?;
                let width = format!("{width_px}px");
                self.page.set_style(panel, "width", Some(width.as_str()));
            }
            Effect::SetCollapsed { collapsed } => {
                let panel = self.anchor(PANEL_ID)?;
                self.page.set_class(panel, COLLAPSED_CLASS, *collapsed);
                let body = self.page.body().ok_or(HostError::MissingBody)?;
                self.page.set_class(body, OPEN_CLASS, !*collapsed);
            }
            Effect::SetToggleVisible { visible } => {
                let toggle = self.anchor(TOGGLE_ID)?;
                let display = if *visible { "flex" } else { "none" };
                self.page.set_style(toggle, "display", Some(display));
            }
            Effect::SetToggleTop { top_px } => {
                let toggle = self.anchor(TOGGLE_ID)?;
                let top = format!("{top_px}px");
                self.page.set_style(toggle, "top", Some(top.as_str()));
                self.page.set_style(toggle, "transform", Some("none"));
            }
            Effect::SetResizing { active } => {
                let resizer = self.anchor(RESIZER_ID)?;
                self.page.set_class(resizer, RESIZING_CLASS, *active);
            }
            Effect::SetCursor { target, cursor } => {
                let node = match target {
                    CursorTarget::Body => self.page.body().ok_or(HostError::MissingBody)?,
                    CursorTarget::Toggle => self.anchor(TOGGLE_ID)?,
                };
                self.page
                    .set_style(node, "cursor", cursor.map(|c| c.css_value()));
            }
        }
        Ok(())
    }
}
