use std::collections::HashSet;

use outline_logging::{outline_debug, outline_warn};

use crate::{AdapterConfig, TurnSource};

/// Candidate turn nodes in document order, outermost match per logical turn.
///
/// Every selector of the adapter contributes to one working set; a match strictly
/// inside another match is dropped. Matches inside `exclude` (the injected panel)
/// are ignored. Invalid selectors are skipped, and an empty result is valid.
pub fn discover_turn_nodes<S: TurnSource>(
    source: &S,
    adapter: &AdapterConfig,
    exclude: Option<S::Node>,
) -> Vec<S::Node> {
    let mut seen = HashSet::new();
    let mut matches = Vec::new();
    for selector in &adapter.selectors {
        match source.select_all(selector) {
            Ok(found) => {
                for node in found {
                    if seen.insert(node) {
                        matches.push(node);
                    }
                }
            }
            Err(err) => outline_warn!("Skipping selector for {}: {}", adapter.name(), err),
        }
    }

    if let Some(panel) = exclude {
        matches.retain(|node| *node != panel && !source.contains(panel, *node));
    }

    let outermost: Vec<S::Node> = matches
        .iter()
        .copied()
        .filter(|node| !matches.iter().any(|other| source.contains(*other, *node)))
        .collect();

    let mut ordered = outermost;
    ordered.sort_by(|a, b| source.compare_document_position(*a, *b));

    outline_debug!(
        "Discovered {} turn nodes ({} raw matches) for {}",
        ordered.len(),
        matches.len(),
        adapter.name()
    );
    ordered
}
