use crate::{AdapterConfig, TurnSource};

/// Truncation marker, also used alone for turns without visible text.
const ELLIPSIS: &str = "...";
pub const MAX_PREVIEW_CHARS: usize = 60;

/// Preview text for a turn: the first content element's visible text, or the
/// turn node's own text when no content selector matches.
pub fn extract_preview<S: TurnSource>(
    source: &S,
    node: S::Node,
    adapter: &AdapterConfig,
) -> String {
    let content = adapter
        .content_selectors
        .iter()
        .find_map(|selector| source.select_within(node, selector).ok().flatten())
        .unwrap_or(node);
    prepare_preview_text(&source.text_content(content))
}

/// Collapses whitespace, trims and caps at `MAX_PREVIEW_CHARS` characters.
pub fn prepare_preview_text(raw: &str) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.is_empty() {
        return ELLIPSIS.to_string();
    }
    match collapsed.char_indices().nth(MAX_PREVIEW_CHARS) {
        None => collapsed,
        Some((end, _)) => {
            let truncated = collapsed[..end].trim_end();
            format!("{truncated}{ELLIPSIS}")
        }
    }
}
