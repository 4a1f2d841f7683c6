use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::node::Node;
use scraper::{ElementRef, Html, Selector};

use crate::{AdapterError, HostError, HostPage, MutationRecord, TurnSource};

/// A parsed HTML document standing in for the live page.
///
/// Host content is never rewritten: inline styles and marker classes live in side
/// tables keyed by node, and injected markup is grafted as new subtrees. Removed
/// nodes stay in the arena as detached orphans, so old handles remain valid but
/// report `is_attached() == false`.
pub struct HtmlPage {
    html: Html,
    styles: HashMap<NodeId, BTreeMap<String, String>>,
    classes: HashMap<NodeId, BTreeMap<String, bool>>,
    revealed: Vec<NodeId>,
}

impl HtmlPage {
    pub fn parse(markup: &str) -> Self {
        Self {
            html: Html::parse_document(markup),
            styles: HashMap::new(),
            classes: HashMap::new(),
            revealed: Vec::new(),
        }
    }

    /// Nodes scrolled into view so far, oldest first.
    pub fn revealed(&self) -> &[NodeId] {
        &self.revealed
    }

    pub fn first(&self, selector: &str) -> Option<NodeId> {
        self.select_all(selector).ok()?.into_iter().next()
    }

    /// Appends `markup` under the first match of `parent_selector`, as a host
    /// re-render would, and reports the change.
    pub fn append_html(
        &mut self,
        parent_selector: &str,
        markup: &str,
    ) -> Result<MutationRecord<NodeId>, HostError> {
        let parent = self.first_required(parent_selector)?;
        let added = self.graft_markup(parent, markup).len();
        Ok(MutationRecord::child_list(Some(parent), added, 0))
    }

    /// Detaches every element matching `selector`.
    pub fn remove_matching(&mut self, selector: &str) -> Result<MutationRecord<NodeId>, HostError> {
        let targets = self.select_all(selector)?;
        let mut parent = None;
        let mut removed = 0;
        for id in targets {
            // An earlier removal may already have taken this node along.
            if !self.is_attached(id) {
                continue;
            }
            if let Some(mut node) = self.html.tree.get_mut(id) {
                if parent.is_none() {
                    parent = node.parent().map(|p| p.id());
                }
                node.detach();
                removed += 1;
            }
        }
        Ok(MutationRecord::child_list(parent, 0, removed))
    }

    fn first_required(&self, selector: &str) -> Result<NodeId, HostError> {
        self.select_all(selector)?
            .into_iter()
            .next()
            .ok_or_else(|| HostError::MissingElement {
                selector: selector.to_string(),
            })
    }

    fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    fn graft_markup(&mut self, parent: NodeId, markup: &str) -> Vec<NodeId> {
        let fragment = Html::parse_fragment(markup);
        let mut inserted = Vec::new();
        for child in fragment.root_element().children() {
            if let Some(id) = graft(&mut self.html.tree, parent, child) {
                if child.value().is_element() {
                    inserted.push(id);
                }
            }
        }
        inserted
    }

    fn path_from_root(&self, id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.html.tree.get(id) else {
            return Vec::new();
        };
        let mut path: Vec<NodeId> = node.ancestors().map(|a| a.id()).collect();
        path.reverse();
        path.push(id);
        path
    }
}

fn node_id(element: ElementRef<'_>) -> NodeId {
    let node: &NodeRef<'_, Node> = &element;
    node.id()
}

/// Deep-copies `source` as the last child of `parent`.
fn graft(tree: &mut Tree<Node>, parent: NodeId, source: NodeRef<'_, Node>) -> Option<NodeId> {
    let id = tree.get_mut(parent)?.append(source.value().clone()).id();
    for child in source.children() {
        graft(tree, id, child);
    }
    Some(id)
}

pub(crate) fn parse_selector(selector: &str) -> Result<Selector, AdapterError> {
    Selector::parse(selector).map_err(|err| AdapterError::InvalidSelector {
        selector: selector.to_string(),
        message: err.to_string(),
    })
}

impl TurnSource for HtmlPage {
    type Node = NodeId;

    fn select_all(&self, selector: &str) -> Result<Vec<NodeId>, AdapterError> {
        let selector = parse_selector(selector)?;
        let root = self.html.root_element();
        let mut found = Vec::new();
        if selector.matches(&root) {
            found.push(node_id(root));
        }
        found.extend(root.select(&selector).map(node_id));
        Ok(found)
    }

    fn select_within(&self, scope: NodeId, selector: &str) -> Result<Option<NodeId>, AdapterError> {
        let selector = parse_selector(selector)?;
        Ok(self
            .element(scope)
            .and_then(|el| el.select(&selector).next())
            .map(node_id))
    }

    fn matches(&self, node: NodeId, selector: &str) -> Result<bool, AdapterError> {
        let selector = parse_selector(selector)?;
        Ok(self.element(node).is_some_and(|el| selector.matches(&el)))
    }

    fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        self.html
            .tree
            .get(node)
            .is_some_and(|n| n.ancestors().any(|a| a.id() == ancestor))
    }

    fn compare_document_position(&self, a: NodeId, b: NodeId) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let path_a = self.path_from_root(a);
        let path_b = self.path_from_root(b);
        let diverge = path_a
            .iter()
            .zip(path_b.iter())
            .position(|(x, y)| x != y);
        match diverge {
            // One path is a prefix of the other: the ancestor comes first.
            None => path_a.len().cmp(&path_b.len()),
            Some(i) => {
                let later_sibling = self
                    .html
                    .tree
                    .get(path_a[i])
                    .is_some_and(|n| n.next_siblings().any(|s| s.id() == path_b[i]));
                if later_sibling {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
        }
    }

    fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.value().attr(name)
    }

    fn class_names(&self, node: NodeId) -> Vec<String> {
        let mut names: Vec<String> = self
            .element(node)
            .map(|el| el.value().classes().map(str::to_string).collect())
            .unwrap_or_default();
        if let Some(overrides) = self.classes.get(&node) {
            for (class, present) in overrides {
                let existing = names.iter().position(|c| c == class);
                match (*present, existing) {
                    (true, None) => names.push(class.clone()),
                    (false, Some(idx)) => {
                        names.remove(idx);
                    }
                    _ => {}
                }
            }
        }
        names
    }

    fn text_content(&self, node: NodeId) -> String {
        self.element(node)
            .map(|el| el.text().collect())
            .unwrap_or_default()
    }

    fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        self.element(node)
            .map(|el| el.children().filter_map(ElementRef::wrap).map(node_id).collect())
            .unwrap_or_default()
    }

    fn is_attached(&self, node: NodeId) -> bool {
        let root = self.html.tree.root().id();
        self.html
            .tree
            .get(node)
            .is_some_and(|n| n.id() == root || n.ancestors().any(|a| a.id() == root))
    }

    fn find_by_id(&self, id: &str) -> Option<NodeId> {
        self.html
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().id() == Some(id))
            .map(node_id)
    }

    fn body(&self) -> Option<NodeId> {
        self.html
            .root_element()
            .children()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().name() == "body")
            .map(node_id)
    }

    fn document_element(&self) -> Option<NodeId> {
        Some(node_id(self.html.root_element()))
    }
}

impl HostPage for HtmlPage {
    fn append_to_body(&mut self, markup: &str) -> Result<Vec<NodeId>, HostError> {
        let body = self.body().ok_or(HostError::MissingBody)?;
        let inserted = self.graft_markup(body, markup);
        if inserted.is_empty() {
            return Err(HostError::EmptyMarkup);
        }
        Ok(inserted)
    }

    fn replace_children(&mut self, parent: NodeId, markup: &str) -> Result<(), HostError> {
        let children: Vec<NodeId> = self
            .html
            .tree
            .get(parent)
            .ok_or_else(|| HostError::MissingElement {
                selector: format!("{parent:?}"),
            })?
            .children()
            .map(|c| c.id())
            .collect();
        for id in children {
            if let Some(mut child) = self.html.tree.get_mut(id) {
                child.detach();
            }
        }
        self.graft_markup(parent, markup);
        Ok(())
    }

    fn set_style(&mut self, node: NodeId, property: &str, value: Option<&str>) {
        let entry = self.styles.entry(node).or_default();
        match value.filter(|v| !v.is_empty()) {
            Some(value) => {
                entry.insert(property.to_string(), value.to_string());
            }
            None => {
                entry.remove(property);
            }
        }
    }

    fn style(&self, node: NodeId, property: &str) -> Option<&str> {
        self.styles
            .get(&node)
            .and_then(|props| props.get(property))
            .map(String::as_str)
    }

    fn set_class(&mut self, node: NodeId, class: &str, present: bool) {
        self.classes
            .entry(node)
            .or_default()
            .insert(class.to_string(), present);
    }

    fn scroll_into_view(&mut self, node: NodeId) -> bool {
        if !self.is_attached(node) {
            return false;
        }
        self.revealed.push(node);
        true
    }
}
