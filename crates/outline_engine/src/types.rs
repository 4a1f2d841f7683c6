use std::fmt;

/// Author of a conversational turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    User,
    Assistant,
    Unknown,
}

impl Role {
    /// Marker class used on rendered outline items.
    pub fn css_class(self) -> &'static str {
        match self {
            Role::User => "user-msg",
            Role::Assistant => "assistant-msg",
            Role::Unknown => "unknown-msg",
        }
    }

    pub fn prefix(self) -> &'static str {
        match self {
            Role::User => "Q: ",
            Role::Assistant | Role::Unknown => "A: ",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => write!(f, "user"),
            Role::Assistant => write!(f, "assistant"),
            Role::Unknown => write!(f, "unknown"),
        }
    }
}

/// One discovered turn. `source` is a handle into the page, valid only for reveal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn<N> {
    pub role: Role,
    pub preview_text: String,
    pub source: N,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group<N> {
    pub turns: Vec<Turn<N>>,
}

impl<N> Group<N> {
    /// True for the implicit group opened by a leading non-user turn.
    pub fn is_fallback(&self) -> bool {
        self.turns
            .first()
            .is_some_and(|turn| turn.role != Role::User)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outline<N> {
    pub groups: Vec<Group<N>>,
}

impl<N> Default for Outline<N> {
    fn default() -> Self {
        Self { groups: Vec::new() }
    }
}

impl<N> Outline<N> {
    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn turn_count(&self) -> usize {
        self.groups.iter().map(|group| group.turns.len()).sum()
    }

    /// Turns in document order, flattened across groups.
    pub fn turns(&self) -> impl Iterator<Item = &Turn<N>> {
        self.groups.iter().flat_map(|group| group.turns.iter())
    }

    pub fn turn(&self, index: usize) -> Option<&Turn<N>> {
        self.turns().nth(index)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    ChildList,
    Attributes,
    CharacterData,
}

/// One entry of a batched mutation notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MutationRecord<N> {
    pub kind: MutationKind,
    pub target: Option<N>,
    pub added: usize,
    pub removed: usize,
}

impl<N> MutationRecord<N> {
    pub fn child_list(target: Option<N>, added: usize, removed: usize) -> Self {
        Self {
            kind: MutationKind::ChildList,
            target,
            added,
            removed,
        }
    }
}
