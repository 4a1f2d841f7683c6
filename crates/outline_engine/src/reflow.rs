use std::collections::HashSet;

use outline_logging::{outline_debug, outline_warn};

use crate::{AdapterConfig, HostPage};

/// Custom property carrying the panel width, set on the root and body.
pub const WIDTH_PROPERTY: &str = "--chat-outline-width";
/// Custom property carrying the width left for the message area.
pub const MESSAGE_WIDTH_PROPERTY: &str = "--chat-outline-message-width";

/// Containers shared by most chat front-ends.
const COMMON_CONTAINERS: &[&str] = &["main", "[role=\"main\"]"];

/// Makes host content yield horizontal space to the open panel.
#[derive(Debug, Clone, Default)]
pub struct ContentReflow {
    selectors: Vec<String>,
}

impl ContentReflow {
    pub fn new(adapter: Option<&AdapterConfig>) -> Self {
        let mut selectors: Vec<String> = COMMON_CONTAINERS.iter().map(|s| s.to_string()).collect();
        if let Some(adapter) = adapter {
            for selector in &adapter.reflow_selectors {
                if !selectors.contains(selector) {
                    selectors.push(selector.clone());
                }
            }
        }
        Self { selectors }
    }

    pub fn selectors(&self) -> &[String] {
        &self.selectors
    }

    /// Reserves `width_px` on the right edge, or restores the native layout on `None`.
    /// Returns the number of content containers touched.
    pub fn apply<P: HostPage>(
        &self,
        page: &mut P,
        width_px: Option<u32>,
        exclude: Option<P::Node>,
    ) -> usize {
        let width = width_px.map(|w| format!("{w}px"));
        let message_width = width_px.map(|w| format!("calc(100vw - {w}px)"));

        let globals = [page.document_element(), page.body()];
        for node in globals.into_iter().flatten() {
            page.set_style(node, WIDTH_PROPERTY, width.as_deref());
            page.set_style(node, MESSAGE_WIDTH_PROPERTY, message_width.as_deref());
        }
        if let Some(body) = page.body() {
            page.set_style(body, "padding-right", width.as_deref());
        }

        let mut touched = HashSet::new();
        for selector in &self.selectors {
            let nodes = match page.select_all(selector) {
                Ok(nodes) => nodes,
                Err(err) => {
                    outline_warn!("Skipping reflow selector: {}", err);
                    continue;
                }
            };
            for node in nodes {
                let inside_panel =
                    exclude.is_some_and(|panel| panel == node || page.contains(panel, node));
                if inside_panel || !touched.insert(node) {
                    continue;
                }
                page.set_style(node, "width", message_width.as_deref());
                page.set_style(node, "max-width", message_width.as_deref());
            }
        }

        outline_debug!(
            "Reflow {} on {} containers",
            width.as_deref().unwrap_or("restored"),
            touched.len()
        );
        touched.len()
    }
}
