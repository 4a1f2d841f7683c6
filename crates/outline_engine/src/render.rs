use crate::{Outline, Role};

pub const PANEL_ID: &str = "chatgpt-outline-sidebar";
pub const RESIZER_ID: &str = "chatgpt-outline-resizer";
pub const LIST_ID: &str = "chatgpt-outline-list";
pub const TOGGLE_ID: &str = "chatgpt-outline-expand-btn";

/// Attribute on rendered items holding the flattened turn index.
pub const TURN_INDEX_ATTR: &str = "data-outline-turn";

pub const PANEL_TITLE: &str = "Chat Outline";

const CHEVRON_LEFT: &str = r#"<svg width="20" height="20" viewBox="0 0 24 24" fill="none" stroke="currentColor" stroke-width="2" stroke-linecap="round" stroke-linejoin="round"><polyline points="15 18 9 12 15 6"></polyline></svg>"#;

/// The panel root: header, resize handle and list container.
pub fn panel_markup() -> String {
    format!(
        r#"<div id="{PANEL_ID}"><h2>{PANEL_TITLE}</h2><div id="{RESIZER_ID}"></div><div id="{LIST_ID}"></div></div>"#
    )
}

/// The floating button that expands the collapsed panel.
pub fn toggle_markup() -> String {
    format!(r#"<button id="{TOGGLE_ID}" title="Show Outline (Drag to move)">{CHEVRON_LEFT}</button>"#)
}

/// List markup for an outline: one `qa-group` per group, one item per turn.
pub fn outline_markup<N>(outline: &Outline<N>) -> String {
    let mut out = String::new();
    let mut index = 0usize;
    for group in &outline.groups {
        out.push_str(r#"<div class="qa-group">"#);
        for turn in &group.turns {
            out.push_str(&format!(
                r#"<div class="outline-item {class}" {attr}="{index}">{label}</div>"#,
                class = turn.role.css_class(),
                attr = TURN_INDEX_ATTR,
                label = escape_html(&item_label(turn.role, &turn.preview_text)),
            ));
            index += 1;
        }
        out.push_str("</div>");
    }
    out
}

/// Item label as shown to the reader.
pub fn item_label(role: Role, preview: &str) -> String {
    format!("{}{}", role.prefix(), preview)
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
