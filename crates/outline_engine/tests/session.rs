use std::sync::Once;
use std::time::{Duration, Instant};

use outline_core::{Msg, PanelPhase, Surface};
use outline_engine::{
    AdapterRegistry, HostPage, HtmlPage, PanelSession, SessionSettings, TurnSource, LIST_ID,
    OPEN_CLASS, PANEL_ID, RESIZER_ID, TOGGLE_ID, WIDTH_PROPERTY,
};
use pretty_assertions::assert_eq;

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(outline_logging::initialize_for_tests);
}

const TRANSCRIPT: &str = r#"<html><body><main>
    <article id="t1"><div data-message-author-role="user"><div class="whitespace-pre-wrap">Hi</div></div></article>
    <article id="t2"><div data-message-author-role="assistant"><div class="markdown"><p>Hello!</p></div></div></article>
    <article id="t3"><div data-message-author-role="user"><div class="whitespace-pre-wrap">Bye</div></div></article>
</main></body></html>"#;

fn started(host: &str) -> PanelSession<HtmlPage> {
    let mut session = PanelSession::new(
        HtmlPage::parse(TRANSCRIPT),
        &AdapterRegistry::builtin(),
        host,
        SessionSettings::default(),
    );
    session.start();
    session
}

fn item_labels(page: &HtmlPage) -> Vec<String> {
    page.select_all(&format!("#{LIST_ID} .outline-item"))
        .unwrap_or_default()
        .into_iter()
        .map(|item| page.text_content(item))
        .collect()
}

fn has_class(page: &HtmlPage, node: ego_tree::NodeId, class: &str) -> bool {
    page.class_names(node).iter().any(|c| c == class)
}

fn anchor(page: &HtmlPage, id: &str) -> ego_tree::NodeId {
    page.find_by_id(id).expect("panel anchor")
}

fn click(session: &mut PanelSession<HtmlPage>, surface: Surface, x: i32, y: i32) {
    session.dispatch(Msg::Press { surface, x, y });
    session.dispatch(Msg::Release { x, y });
}

#[test]
fn start_injects_collapsed_panel_and_renders_outline() {
    init_logging();
    let session = started("https://chatgpt.com/c/1");
    let page = session.page();

    assert_eq!(session.outline().groups.len(), 2);
    assert_eq!(item_labels(page), vec!["Q: Hi", "A: Hello!", "Q: Bye"]);
    assert_eq!(
        page.select_all(&format!("#{LIST_ID} .qa-group"))
            .map(|groups| groups.len()),
        Ok(2)
    );

    let panel = anchor(page, PANEL_ID);
    let toggle = anchor(page, TOGGLE_ID);
    let body = page.body().expect("body");
    assert!(has_class(page, panel, "collapsed"));
    assert!(!has_class(page, body, OPEN_CLASS));
    assert_eq!(page.style(toggle, "display"), Some("flex"));
    assert_eq!(page.style(toggle, "top"), Some("380px"));
    assert_eq!(page.style(body, "padding-right"), None);
    assert_eq!(session.view().phase, PanelPhase::Collapsed);
    assert!(session.watcher().is_observing());
    assert_eq!(session.watcher().scans(), 1);
}

#[test]
fn start_is_idempotent() {
    init_logging();
    let mut session = started("chatgpt.com");
    session.start();

    let page = session.page();
    assert_eq!(page.select_all(&format!("#{PANEL_ID}")).map(|n| n.len()), Ok(1));
    assert_eq!(page.select_all(&format!("#{TOGGLE_ID}")).map(|n| n.len()), Ok(1));
    assert_eq!(item_labels(page).len(), 3);
}

#[test]
fn toggle_click_expands_and_reflows_host_content() {
    init_logging();
    let mut session = started("chatgpt.com");

    click(&mut session, Surface::Toggle, 20, 400);

    let page = session.page();
    let body = page.body().expect("body");
    let root = page.document_element().expect("root");
    let main = page.first("main").expect("main");
    let panel = anchor(page, PANEL_ID);
    assert_eq!(session.view().phase, PanelPhase::Expanded);
    assert!(!has_class(page, panel, "collapsed"));
    assert!(has_class(page, body, OPEN_CLASS));
    assert_eq!(page.style(panel, "width"), Some("300px"));
    assert_eq!(page.style(body, "padding-right"), Some("300px"));
    assert_eq!(page.style(root, WIDTH_PROPERTY), Some("300px"));
    assert_eq!(page.style(main, "max-width"), Some("calc(100vw - 300px)"));
    assert_eq!(page.style(anchor(page, TOGGLE_ID), "display"), Some("none"));
}

#[test]
fn handle_click_collapses_and_restores_layout() {
    init_logging();
    let mut session = started("chatgpt.com");
    click(&mut session, Surface::Toggle, 20, 400);

    session.dispatch(Msg::Press {
        surface: Surface::ResizeHandle,
        x: 1000,
        y: 300,
    });
    session.dispatch(Msg::Move { x: 999, y: 300 });
    session.dispatch(Msg::Release { x: 999, y: 300 });

    let page = session.page();
    let body = page.body().expect("body");
    let main = page.first("main").expect("main");
    assert_eq!(session.view().phase, PanelPhase::Collapsed);
    assert!(!has_class(page, body, OPEN_CLASS));
    assert_eq!(page.style(body, "padding-right"), None);
    assert_eq!(page.style(main, "max-width"), None);
    assert_eq!(page.style(anchor(page, TOGGLE_ID), "display"), Some("flex"));
}

#[test]
fn handle_drag_resizes_without_collapsing() {
    init_logging();
    let mut session = started("chatgpt.com");
    click(&mut session, Surface::Toggle, 20, 400);

    session.dispatch(Msg::Press {
        surface: Surface::ResizeHandle,
        x: 1000,
        y: 300,
    });
    session.dispatch(Msg::Move { x: 950, y: 300 });
    {
        let page = session.page();
        let body = page.body().expect("body");
        assert_eq!(session.view().phase, PanelPhase::ResizingFromHandle);
        assert_eq!(page.style(body, "cursor"), Some("col-resize"));
        assert!(has_class(page, anchor(page, RESIZER_ID), "resizing"));
    }
    session.dispatch(Msg::Release { x: 950, y: 300 });

    let page = session.page();
    let body = page.body().expect("body");
    assert_eq!(session.view().phase, PanelPhase::Expanded);
    assert_eq!(session.view().width_px, 350);
    assert_eq!(page.style(anchor(page, PANEL_ID), "width"), Some("350px"));
    assert_eq!(page.style(body, "padding-right"), Some("350px"));
    assert_eq!(page.style(body, "cursor"), None);
    assert!(!has_class(page, anchor(page, RESIZER_ID), "resizing"));
}

#[test]
fn lost_handle_release_does_not_leave_resize_feedback_behind() {
    init_logging();
    let mut session = started("chatgpt.com");
    click(&mut session, Surface::Toggle, 20, 400);

    session.dispatch(Msg::Press {
        surface: Surface::ResizeHandle,
        x: 1000,
        y: 300,
    });
    session.dispatch(Msg::Move { x: 950, y: 300 });
    click(&mut session, Surface::Toggle, 20, 400);

    let page = session.page();
    let body = page.body().expect("body");
    assert_eq!(page.style(body, "cursor"), None);
    assert!(!has_class(page, anchor(page, RESIZER_ID), "resizing"));
    assert_eq!(session.view().phase, PanelPhase::Expanded);
}

#[test]
fn toggle_drag_moves_button_only() {
    init_logging();
    let mut session = started("chatgpt.com");

    session.dispatch(Msg::Press {
        surface: Surface::Toggle,
        x: 20,
        y: 400,
    });
    assert_eq!(
        session.page().style(anchor(session.page(), TOGGLE_ID), "cursor"),
        Some("grabbing")
    );
    session.dispatch(Msg::Move { x: 20, y: 200 });
    session.dispatch(Msg::Release { x: 20, y: 200 });

    let page = session.page();
    let toggle = anchor(page, TOGGLE_ID);
    assert_eq!(session.view().phase, PanelPhase::Collapsed);
    assert_eq!(page.style(toggle, "top"), Some("180px"));
    assert_eq!(page.style(toggle, "cursor"), None);
}

#[test]
fn new_messages_are_picked_up_after_quiet_period() {
    init_logging();
    let mut session = started("chatgpt.com");
    let t0 = Instant::now();

    let record = session
        .page_mut()
        .append_html(
            "main",
            r#"<article id="t4"><div data-message-author-role="assistant"><div class="markdown">See you</div></div></article>"#,
        )
        .expect("append");
    assert!(session.on_mutations(&[record], t0));

    assert!(!session.tick(t0 + Duration::from_millis(999)));
    assert_eq!(item_labels(session.page()).len(), 3);
    assert!(session.tick(t0 + Duration::from_millis(1000)));

    assert_eq!(
        item_labels(session.page()),
        vec!["Q: Hi", "A: Hello!", "Q: Bye", "A: See you"]
    );
    assert_eq!(session.watcher().scans(), 2);
}

#[test]
fn removed_panel_is_reinjected_immediately() {
    init_logging();
    let mut session = started("chatgpt.com");
    let t0 = Instant::now();

    let record = session
        .page_mut()
        .remove_matching(&format!("#{PANEL_ID}"))
        .expect("remove");
    assert!(session.page().find_by_id(PANEL_ID).is_none());

    let pending = session.on_mutations(&[record], t0);

    let page = session.page();
    assert!(pending);
    assert!(page.find_by_id(PANEL_ID).is_some());
    assert!(has_class(page, anchor(page, PANEL_ID), "collapsed"));
    assert_eq!(item_labels(page), vec!["Q: Hi", "A: Hello!", "Q: Bye"]);
    assert_eq!(page.select_all(&format!("#{TOGGLE_ID}")).map(|n| n.len()), Ok(1));
}

#[test]
fn removed_toggle_is_reinjected_without_duplicating_panel() {
    init_logging();
    let mut session = started("chatgpt.com");

    let record = session
        .page_mut()
        .remove_matching(&format!("#{TOGGLE_ID}"))
        .expect("remove");
    session.on_mutations(&[record], Instant::now());

    let page = session.page();
    assert!(page.find_by_id(TOGGLE_ID).is_some());
    assert_eq!(page.select_all(&format!("#{PANEL_ID}")).map(|n| n.len()), Ok(1));
}

#[test]
fn mutations_inside_the_panel_do_not_schedule_scans() {
    init_logging();
    let mut session = started("chatgpt.com");
    let list = anchor(session.page(), LIST_ID);

    let record = outline_engine::MutationRecord::child_list(Some(list), 3, 3);

    assert!(!session.on_mutations(&[record], Instant::now()));
}

#[test]
fn clicking_an_item_reveals_its_turn() {
    init_logging();
    let mut session = started("chatgpt.com");
    let items = session
        .page()
        .select_all(&format!("#{LIST_ID} .outline-item"))
        .expect("items");

    assert!(session.handle_item_click(items[1]));

    let page = session.page();
    assert_eq!(page.revealed(), &[anchor(page, "t2")]);
}

#[test]
fn revealing_a_detached_turn_is_a_no_op() {
    init_logging();
    let mut session = started("chatgpt.com");
    session
        .page_mut()
        .remove_matching("#t1")
        .expect("remove");

    assert!(!session.reveal(0));
    assert!(session.reveal(1));
    assert!(!session.reveal(42));
    assert_eq!(session.page().revealed().len(), 1);
}

#[test]
fn unknown_host_renders_empty_outline() {
    init_logging();
    let session = started("https://example.com/chat");

    assert!(session.adapter().is_none());
    assert!(session.outline().is_empty());
    assert!(session.page().find_by_id(PANEL_ID).is_some());
    assert!(item_labels(session.page()).is_empty());
}

#[test]
fn stop_restores_layout_and_ignores_mutations() {
    init_logging();
    let mut session = started("chatgpt.com");
    click(&mut session, Surface::Toggle, 20, 400);
    let t0 = Instant::now();
    let record = outline_engine::MutationRecord::child_list(None, 1, 0);
    session.on_mutations(&[record.clone()], t0);

    session.stop();

    let page = session.page();
    let body = page.body().expect("body");
    assert!(!session.is_started());
    assert_eq!(page.style(body, "padding-right"), None);
    assert!(!session.on_mutations(&[record], t0));
    assert!(!session.tick(t0 + Duration::from_secs(5)));
}
