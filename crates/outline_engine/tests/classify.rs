use std::sync::Once;

use outline_engine::{classify, AdapterConfig, AdapterRegistry, HtmlPage, Role, RoleRule};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(outline_logging::initialize_for_tests);
}

fn adapter(rules: Vec<RoleRule>) -> AdapterConfig {
    AdapterConfig {
        hosts: vec!["test.local".to_string()],
        selectors: vec![".turn".to_string()],
        role_rules: rules,
        role_attribute: "data-message-author-role".to_string(),
        markdown_selector: ".markdown".to_string(),
        content_selectors: Vec::new(),
        reflow_selectors: Vec::new(),
    }
}

fn roles(page: &HtmlPage, adapter: &AdapterConfig) -> Vec<Role> {
    outline_engine::discover_turn_nodes(page, adapter, None)
        .into_iter()
        .enumerate()
        .map(|(index, node)| classify(page, node, index, adapter))
        .collect()
}

#[test]
fn role_attribute_on_node_wins() {
    init_logging();
    let page = HtmlPage::parse(
        r#"<body>
            <div class="turn" data-message-author-role="assistant"><div class="markdown">x</div></div>
            <div class="turn assistant" data-message-author-role="user">y</div>
            <div class="turn" data-message-author-role="chat-bot">z</div>
        </body>"#,
    );
    let adapter = adapter(vec![
        RoleRule::RoleAttribute,
        RoleRule::ClassName,
        RoleRule::Alternation,
    ]);

    assert_eq!(
        roles(&page, &adapter),
        vec![Role::Assistant, Role::User, Role::Assistant]
    );
}

#[test]
fn role_attribute_is_found_on_inner_element() {
    init_logging();
    let page = HtmlPage::parse(
        r#"<body>
            <div class="turn"><div data-message-author-role="assistant">Hello</div></div>
            <div class="turn"><div data-message-author-role="user">Hi</div></div>
        </body>"#,
    );
    let adapter = adapter(vec![RoleRule::RoleAttribute, RoleRule::Alternation]);

    // Positional fallback would say user, assistant.
    assert_eq!(roles(&page, &adapter), vec![Role::Assistant, Role::User]);
}

#[test]
fn unrecognised_attribute_value_falls_through() {
    init_logging();
    let page = HtmlPage::parse(
        r#"<body><div class="turn" data-message-author-role="system">s</div><div class="turn" data-message-author-role="tool">t</div></body>"#,
    );
    let adapter = adapter(vec![RoleRule::RoleAttribute, RoleRule::Alternation]);

    assert_eq!(roles(&page, &adapter), vec![Role::User, Role::Assistant]);
}

#[test]
fn markdown_bubble_rule_for_hosts_declaring_it() {
    init_logging();
    let page = HtmlPage::parse(
        r#"<body>
            <div class="ds-message"><div class="ds-markdown"><p>Welcome</p></div></div>
            <div class="ds-message"><div class="prompt">Question</div></div>
            <div class="ds-message"><div class="ds-markdown">Answer</div><div class="actions"></div></div>
        </body>"#,
    );
    let registry = AdapterRegistry::builtin();
    let adapter = registry.resolve("chat.deepseek.com").expect("deepseek adapter");

    assert_eq!(
        roles(&page, adapter),
        vec![Role::Assistant, Role::User, Role::User]
    );
}

#[test]
fn class_name_heuristic() {
    init_logging();
    let page = HtmlPage::parse(
        r#"<body>
            <div class="turn bot-reply">a</div>
            <div class="turn from-user">b</div>
            <div class="turn AssistantMessage">c</div>
        </body>"#,
    );
    let adapter = adapter(vec![RoleRule::ClassName, RoleRule::Alternation]);

    assert_eq!(
        roles(&page, &adapter),
        vec![Role::Assistant, Role::User, Role::Assistant]
    );
}

#[test]
fn markdown_child_implies_assistant() {
    init_logging();
    let page = HtmlPage::parse(
        r#"<body><div class="turn"><section><div class="markdown">Hello</div></section></div></body>"#,
    );
    let adapter = adapter(vec![RoleRule::MarkdownChild, RoleRule::Alternation]);

    assert_eq!(roles(&page, &adapter), vec![Role::Assistant]);
}

#[test]
fn positional_fallback_alternates_from_user() {
    init_logging();
    let page = HtmlPage::parse(
        r#"<body><div class="turn">1</div><div class="turn">2</div><div class="turn">3</div></body>"#,
    );
    let adapter = adapter(vec![
        RoleRule::RoleAttribute,
        RoleRule::ClassName,
        RoleRule::MarkdownChild,
        RoleRule::Alternation,
    ]);

    assert_eq!(
        roles(&page, &adapter),
        vec![Role::User, Role::Assistant, Role::User]
    );
}

#[test]
fn chain_without_fallback_yields_unknown() {
    init_logging();
    let page = HtmlPage::parse(r#"<body><div class="turn">plain</div></body>"#);
    let adapter = adapter(vec![RoleRule::RoleAttribute, RoleRule::ClassName]);

    assert_eq!(roles(&page, &adapter), vec![Role::Unknown]);
}
