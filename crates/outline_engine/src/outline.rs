use outline_logging::outline_debug;

use crate::classify::classify;
use crate::discovery::discover_turn_nodes;
use crate::preview::extract_preview;
use crate::{AdapterConfig, Group, Outline, Role, Turn, TurnSource};

/// Discovers, classifies and summarises every turn of the current snapshot.
pub fn collect_turns<S: TurnSource>(
    source: &S,
    adapter: &AdapterConfig,
    exclude: Option<S::Node>,
) -> Vec<Turn<S::Node>> {
    discover_turn_nodes(source, adapter, exclude)
        .into_iter()
        .enumerate()
        .map(|(index, node)| Turn {
            role: classify(source, node, index, adapter),
            preview_text: extract_preview(source, node, adapter),
            source: node,
        })
        .collect()
}

/// Groups ordered turns into question/answer clusters.
///
/// A user turn always opens a group; any other turn joins the open group, opening
/// a fallback group first when the transcript starts without a user turn.
/// Unknown turns contribute nothing.
pub fn build_outline<N>(turns: Vec<Turn<N>>) -> Outline<N> {
    let mut groups: Vec<Group<N>> = Vec::new();
    for turn in turns.into_iter().filter(|t| t.role != Role::Unknown) {
        match groups.last_mut() {
            Some(open) if turn.role != Role::User => open.turns.push(turn),
            _ => groups.push(Group { turns: vec![turn] }),
        }
    }
    Outline { groups }
}

/// Full pipeline over one snapshot. Without an adapter the outline is empty.
pub fn scan<S: TurnSource>(
    source: &S,
    adapter: Option<&AdapterConfig>,
    exclude: Option<S::Node>,
) -> Outline<S::Node> {
    let Some(adapter) = adapter else {
        outline_debug!("No adapter for this host; outline stays empty");
        return Outline::default();
    };
    let outline = build_outline(collect_turns(source, adapter, exclude));
    outline_debug!(
        "Built outline with {} groups / {} turns",
        outline.groups.len(),
        outline.turn_count()
    );
    outline
}
