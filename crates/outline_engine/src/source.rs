use std::cmp::Ordering;
use std::fmt::Debug;
use std::hash::Hash;

use crate::{AdapterError, HostError};

/// Read-only view of a page that can enumerate candidate turn nodes.
///
/// Any tree exposing selector queries plus attribute, class and text accessors
/// satisfies discovery and classification. Node handles are cheap copies that may
/// outlive their attachment to the document.
pub trait TurnSource {
    type Node: Copy + Eq + Hash + Debug;

    /// All attached elements matching `selector`, in document order.
    fn select_all(&self, selector: &str) -> Result<Vec<Self::Node>, AdapterError>;

    /// First strict descendant of `scope` matching `selector`.
    fn select_within(
        &self,
        scope: Self::Node,
        selector: &str,
    ) -> Result<Option<Self::Node>, AdapterError>;

    fn matches(&self, node: Self::Node, selector: &str) -> Result<bool, AdapterError>;

    /// True when `ancestor` strictly contains `node`.
    fn contains(&self, ancestor: Self::Node, node: Self::Node) -> bool;

    fn compare_document_position(&self, a: Self::Node, b: Self::Node) -> Ordering;

    fn attribute(&self, node: Self::Node, name: &str) -> Option<&str>;

    fn class_names(&self, node: Self::Node) -> Vec<String>;

    fn text_content(&self, node: Self::Node) -> String;

    fn element_children(&self, node: Self::Node) -> Vec<Self::Node>;

    fn is_attached(&self, node: Self::Node) -> bool;

    fn find_by_id(&self, id: &str) -> Option<Self::Node>;

    fn body(&self) -> Option<Self::Node>;

    fn document_element(&self) -> Option<Self::Node>;
}

/// Write access the panel needs: insertion at the end of the body, inline styles,
/// marker classes on its own anchors and scroll-to-reveal.
pub trait HostPage: TurnSource {
    /// Parses `markup` and appends the resulting elements to the body.
    fn append_to_body(&mut self, markup: &str) -> Result<Vec<Self::Node>, HostError>;

    /// Replaces every child of `parent` with the elements parsed from `markup`.
    fn replace_children(&mut self, parent: Self::Node, markup: &str) -> Result<(), HostError>;

    /// Sets an inline style property; `None` removes it.
    fn set_style(&mut self, node: Self::Node, property: &str, value: Option<&str>);

    fn style(&self, node: Self::Node, property: &str) -> Option<&str>;

    fn set_class(&mut self, node: Self::Node, class: &str, present: bool);

    /// Scrolls `node` to the centre of the viewport. Returns false for detached nodes.
    fn scroll_into_view(&mut self, node: Self::Node) -> bool;
}
