use outline_logging::{outline_trace, outline_warn};

use crate::{AdapterConfig, Role, RoleRule, TurnSource};

/// Determines the author of a discovered node by walking the adapter's rule chain.
///
/// `index` is the node's 0-based position in the discovery sequence. Returns
/// `Role::Unknown` only when no rule matches, which requires a chain without
/// `RoleRule::Alternation`.
pub fn classify<S: TurnSource>(
    source: &S,
    node: S::Node,
    index: usize,
    adapter: &AdapterConfig,
) -> Role {
    for rule in &adapter.role_rules {
        if let Some(role) = apply_rule(source, node, index, adapter, rule) {
            outline_trace!("Turn {} classified {} by {:?}", index, role, rule);
            return role;
        }
    }
    Role::Unknown
}

fn apply_rule<S: TurnSource>(
    source: &S,
    node: S::Node,
    index: usize,
    adapter: &AdapterConfig,
    rule: &RoleRule,
) -> Option<Role> {
    match rule {
        RoleRule::RoleAttribute => role_attribute(source, node, &adapter.role_attribute),
        RoleRule::MarkdownBubble { bubble_class } => {
            markdown_bubble(source, node, bubble_class, &adapter.markdown_selector)
        }
        RoleRule::ClassName => source
            .class_names(node)
            .iter()
            .find_map(|class| role_from_token(class)),
        RoleRule::MarkdownChild => {
            match source.select_within(node, &adapter.markdown_selector) {
                Ok(found) => found.map(|_| Role::Assistant),
                Err(err) => {
                    outline_warn!("Markdown probe failed for {}: {}", adapter.name(), err);
                    None
                }
            }
        }
        RoleRule::Alternation => Some(if index % 2 == 0 {
            Role::User
        } else {
            Role::Assistant
        }),
    }
}

fn role_attribute<S: TurnSource>(source: &S, node: S::Node, attribute: &str) -> Option<Role> {
    if let Some(role) = source.attribute(node, attribute).and_then(role_from_token) {
        return Some(role);
    }
    // Turn containers often wrap the element that actually carries the role.
    let selector = format!("[{attribute}]");
    let inner = source.select_within(node, &selector).ok().flatten()?;
    source.attribute(inner, attribute).and_then(role_from_token)
}

fn markdown_bubble<S: TurnSource>(
    source: &S,
    node: S::Node,
    bubble_class: &str,
    markdown_selector: &str,
) -> Option<Role> {
    if !source.class_names(node).iter().any(|c| c == bubble_class) {
        return None;
    }
    let children = source.element_children(node);
    let only_markdown = match children.as_slice() {
        [only] => source.matches(*only, markdown_selector).unwrap_or(false),
        _ => false,
    };
    Some(if only_markdown {
        Role::Assistant
    } else {
        Role::User
    })
}

fn role_from_token(token: &str) -> Option<Role> {
    let lower = token.to_ascii_lowercase();
    if lower.contains("user") {
        Some(Role::User)
    } else if lower.contains("assistant") || lower.contains("bot") {
        Some(Role::Assistant)
    } else {
        None
    }
}
