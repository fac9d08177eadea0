use super::{MenuStore, SECURITY_SCHEMES_SECTION_PREFIX};
use crate::channels::{ElementHandle, HistoryChannel, RenderSurface};
use crate::config::Config;
use crate::document::DocumentTree;
use crate::resolved::{
    DocSection, Document, MediaType, Operation, Parameter, Response, Schema, SchemaField, Tag,
    TagGroup,
};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

/// History double logging every publish through a shared handle.
#[derive(Default, Clone)]
struct HistoryLog {
    writes: Rc<RefCell<Vec<(String, bool)>>>,
    current: Rc<RefCell<String>>,
}

struct TestHistory(HistoryLog);

impl HistoryChannel for TestHistory {
    fn current_id(&self) -> String {
        self.0.current.borrow().clone()
    }

    fn replace(&mut self, id: &str, rewrite: bool) {
        *self.0.current.borrow_mut() = id.to_string();
        self.0.writes.borrow_mut().push((id.to_string(), rewrite));
    }
}

/// Render-surface double: element handles are flattened positions, and the
/// viewport edges are two adjustable thresholds over those positions.
#[derive(Default, Clone)]
struct Viewport {
    positions: Rc<RefCell<HashMap<String, u64>>>,
    /// Handles at or past this position are below the viewport.
    below_at: Rc<Cell<u64>>,
    /// Handles at or before this position are above the viewport.
    above_at: Rc<Cell<i64>>,
    scrolled: Rc<RefCell<Vec<String>>>,
}

struct TestSurface(Viewport);

impl RenderSurface for TestSurface {
    fn lookup(&self, id: &str) -> Option<ElementHandle> {
        self.0.positions.borrow().get(id).copied().map(ElementHandle)
    }

    fn is_above(&self, el: ElementHandle) -> bool {
        i64::try_from(el.0).unwrap() <= self.0.above_at.get()
    }

    fn is_below(&self, el: ElementHandle) -> bool {
        el.0 >= self.0.below_at.get()
    }

    fn scroll_into_view(&mut self, el: ElementHandle) {
        self.0.scrolled.borrow_mut().push(format!("el:{}", el.0));
    }

    fn scroll_to_id(&mut self, id: &str) {
        self.0.scrolled.borrow_mut().push(format!("id:{id}"));
    }
}

fn op(id: &str, verb: &str, path: &str) -> Operation {
    Operation {
        operation_id: Some(id.to_string()),
        summary: None,
        http_verb: verb.to_string(),
        path: path.to_string(),
        deprecated: false,
        parameters: Vec::new(),
        request_body: None,
        responses: Vec::new(),
        callbacks: Vec::new(),
    }
}

fn field(name: &str) -> SchemaField {
    SchemaField {
        name: name.to_string(),
        required: false,
        deprecated: false,
        schema: None,
    }
}

/// Flattened shape (with responses expanded):
///
/// ```text
///  0 tag/alpha
///  1 operation/opa
///  2 operation/opa/pet                       (field with oneOf schema)
///  3 .../pet/schema/oneof/0/whiskers
///  4 .../pet/schema/oneof/1/bark
///  5 operation/opa/limit
///  6 .../200/content/application/json/schema/id
///  7 .../200/content/application/json/schema/details
///  8 .../200/content/.../details/schema/age
///  9 .../200/content/application/xml/schema/xid
/// 10 operation/opb
/// ```
fn alpha_doc() -> Document {
    let pet_schema = Schema {
        one_of: vec![
            Schema {
                title: Some("Cat".to_string()),
                fields: vec![field("whiskers")],
                ..Schema::default()
            },
            Schema {
                title: Some("Dog".to_string()),
                fields: vec![field("bark")],
                ..Schema::default()
            },
        ],
        ..Schema::default()
    };
    let json_schema = Schema {
        fields: vec![
            field("id"),
            SchemaField {
                name: "details".to_string(),
                required: false,
                deprecated: false,
                schema: Some(Box::new(Schema {
                    fields: vec![field("age")],
                    ..Schema::default()
                })),
            },
        ],
        ..Schema::default()
    };

    let mut op_a = op("opA", "get", "/a");
    op_a.parameters = vec![
        Parameter {
            name: "pet".to_string(),
            location: Some("query".to_string()),
            required: false,
            deprecated: false,
            schema: Some(pet_schema),
        },
        Parameter {
            name: "limit".to_string(),
            location: Some("query".to_string()),
            required: false,
            deprecated: false,
            schema: None,
        },
    ];
    op_a.responses = vec![Response {
        code: "200".to_string(),
        description: None,
        headers: Vec::new(),
        content: vec![
            MediaType {
                mime: "application/json".to_string(),
                schema: Some(json_schema),
            },
            MediaType {
                mime: "application/xml".to_string(),
                schema: Some(Schema {
                    fields: vec![field("xid")],
                    ..Schema::default()
                }),
            },
        ],
    }];

    Document {
        sections: Vec::new(),
        groups: Vec::new(),
        tags: vec![Tag {
            name: "Alpha".to_string(),
            description: None,
            operations: vec![op_a, op("opB", "get", "/b")],
        }],
        webhooks: Vec::new(),
    }
}

fn expand_all() -> Config {
    Config {
        group_depth: 0,
        expand_responses: vec!["all".to_string()],
    }
}

fn make_store(doc: &Document, cfg: &Config) -> (MenuStore, HistoryLog, Viewport) {
    let tree = DocumentTree::build(doc, cfg).unwrap();
    let history = HistoryLog::default();
    let viewport = Viewport::default();
    viewport.below_at.set(u64::MAX);
    viewport.above_at.set(-1);
    let store = MenuStore::new(
        tree,
        cfg,
        Box::new(TestSurface(viewport.clone())),
        Box::new(TestHistory(history.clone())),
    );
    for (position, &idx) in store.flat_items().iter().enumerate() {
        viewport
            .positions
            .borrow_mut()
            .insert(store.tree().node(idx).id.clone(), u64::try_from(position).unwrap());
    }
    (store, history, viewport)
}

/// Arena handle of the node with this id, menu item or not.
fn handle(store: &MenuStore, id: &str) -> usize {
    (0..store.tree().len())
        .find(|&idx| store.tree().node(idx).id == id)
        .unwrap_or_else(|| panic!("no node with id {id}"))
}

#[test]
fn activate_is_idempotent() {
    let (mut store, history, _) = make_store(&alpha_doc(), &expand_all());
    let op_a = store.get_item_by_id("operation/opa");
    store.activate(op_a, true, false);
    assert_eq!(store.active_idx(), Some(1));
    assert_eq!(history.writes.borrow().len(), 1);
    store.activate(op_a, true, false);
    assert_eq!(store.active_idx(), Some(1));
    assert_eq!(history.writes.borrow().len(), 1, "no second history write");
}

#[test]
fn groups_never_activate() {
    let mut doc = alpha_doc();
    doc.groups = vec![TagGroup {
        name: "Everything".to_string(),
        tags: vec!["Alpha".to_string()],
    }];
    let (mut store, history, _) = make_store(&doc, &expand_all());
    let group = store.get_item_by_id("group/everything");
    assert!(group.is_some());
    store.activate(group, true, false);
    assert_eq!(store.active_idx(), None);
    assert!(history.writes.borrow().is_empty());
}

#[test]
fn structural_depths_refuse_activation() {
    let cfg = Config {
        group_depth: 1,
        expand_responses: vec!["all".to_string()],
    };
    let (mut store, history, _) = make_store(&alpha_doc(), &cfg);
    let tag = store.get_item_by_id("tag/alpha");
    store.activate(tag, true, false);
    assert_eq!(store.active_idx(), None);
    assert!(history.writes.borrow().is_empty());
}

#[test]
fn activating_a_child_keeps_its_ancestors_expanded() {
    let (mut store, history, _) = make_store(&alpha_doc(), &expand_all());
    let op_a = store.get_item_by_id("operation/opa");
    store.activate(op_a, true, false);
    assert_eq!(store.active_idx(), Some(1));
    assert_eq!(*history.current.borrow(), "operation/opa");

    let limit = store.get_item_by_id("operation/opa/limit");
    store.activate(limit, true, false);
    assert_eq!(store.active_idx(), Some(5));
    assert_eq!(*history.current.borrow(), "operation/opa/limit");
    // opA sits on the new item's chain: collapsed with the old chain, then
    // re-expanded with the new one
    assert_eq!(store.tree().node(op_a.unwrap()).expanded, Some(true));
    assert_eq!(
        store.tree().node(handle(&store, "tag/alpha")).expanded,
        Some(true)
    );
}

#[test]
fn deactivation_collapses_the_previous_chain_but_never_fields() {
    let (mut store, _, _) = make_store(&alpha_doc(), &expand_all());
    let pet = handle(&store, "operation/opa/pet");
    store.tree_mut().node_mut(pet).toggle();
    assert_eq!(store.tree().node(pet).expanded, Some(true));

    let whiskers = store.get_item_by_id("operation/opa/pet/schema/oneof/0/whiskers");
    store.activate(whiskers, true, false);
    let op_b = store.get_item_by_id("operation/opb");
    store.activate(op_b, true, false);

    let op_a = handle(&store, "operation/opa");
    assert_eq!(store.tree().node(op_a).expanded, Some(false), "opA collapsed");
    assert!(!store.tree().node(op_a).active);
    // the shared tag ancestor was re-expanded by the new activation
    assert_eq!(
        store.tree().node(handle(&store, "tag/alpha")).expanded,
        Some(true)
    );
    // fields are not legit menu items for the collapse walk
    assert_eq!(store.tree().node(pet).expanded, Some(true));
}

#[test]
fn visibility_follows_media_selection() {
    let (store, _, _) = make_store(&alpha_doc(), &expand_all());
    assert!(store.is_visible(6), "json field visible under json tab");
    assert!(!store.is_visible(9), "xml field hidden under json tab");

    let (mut store, _, _) = make_store(&alpha_doc(), &expand_all());
    let holder = handle(&store, "operation/opa/200/content");
    store.tree_mut().select_media(holder, 1);
    assert!(!store.is_visible(6));
    assert!(store.is_visible(9));
}

#[test]
fn visibility_follows_variant_selection() {
    let (mut store, _, _) = make_store(&alpha_doc(), &expand_all());
    let pet = handle(&store, "operation/opa/pet");
    store.tree_mut().node_mut(pet).toggle();

    let whiskers = store.get_item_by_id("operation/opa/pet/schema/oneof/0/whiskers");
    let bark = store.get_item_by_id("operation/opa/pet/schema/oneof/1/bark");
    let whiskers_pos = store.tree().node(whiskers.unwrap()).absolute_idx.unwrap();
    let bark_pos = store.tree().node(bark.unwrap()).absolute_idx.unwrap();
    assert!(store.is_visible(whiskers_pos));
    assert!(!store.is_visible(bark_pos));

    let selector = handle(&store, "operation/opa/pet/schema");
    store.tree_mut().select_variant(selector, 1);
    assert!(!store.is_visible(whiskers_pos));
    assert!(store.is_visible(bark_pos));
}

#[test]
fn collapsed_ancestors_hide_descendants() {
    // pet never toggled: its schema subtree stays hidden
    let (store, _, _) = make_store(&alpha_doc(), &expand_all());
    assert!(!store.is_visible(3));

    // responses not expanded: response subtree hidden until toggled
    let cfg = Config {
        group_depth: 0,
        expand_responses: Vec::new(),
    };
    let (mut store, _, _) = make_store(&alpha_doc(), &cfg);
    assert!(!store.is_visible(6));
    let response = handle(&store, "operation/opa/200");
    store.tree_mut().node_mut(response).toggle();
    assert!(store.is_visible(6));
}

#[test]
fn history_exact_match_activates_without_echoing() {
    let (mut store, history, viewport) = make_store(&alpha_doc(), &expand_all());
    store.toggle_sidebar();
    assert!(store.sidebar_open());

    store.update_on_history(Some("operation/opb"));
    assert_eq!(store.active_item().unwrap().id, "operation/opb");
    assert!(history.writes.borrow().is_empty(), "no echo back to history");
    assert!(viewport.scrolled.borrow().contains(&"el:10".to_string()));
    assert!(!store.sidebar_open(), "leaf activation closes the sidebar");
}

#[test]
fn history_unknown_id_only_scrolls_raw() {
    let (mut store, history, viewport) = make_store(&alpha_doc(), &expand_all());
    store.update_on_history(Some("missing/thing"));
    assert_eq!(store.active_idx(), None);
    assert!(history.writes.borrow().is_empty());
    assert_eq!(*viewport.scrolled.borrow(), vec!["id:missing/thing".to_string()]);
}

#[test]
fn security_prefix_falls_back_to_the_section() {
    let mut doc = alpha_doc();
    doc.sections = vec![DocSection {
        name: "Authentication".to_string(),
        description: None,
        children: Vec::new(),
    }];
    let (mut store, history, viewport) = make_store(&doc, &expand_all());

    let hash = format!("{SECURITY_SCHEMES_SECTION_PREFIX}api-key");
    store.update_on_history(Some(&hash));
    assert_eq!(store.active_item().unwrap().id, "section/authentication");
    assert!(history.writes.borrow().is_empty());
    // the raw target is still scrolled to, matched or not
    assert!(viewport
        .scrolled
        .borrow()
        .contains(&format!("id:{hash}")));
}

#[test]
fn scroll_down_at_the_last_index_takes_zero_steps() {
    let (mut store, history, _) = make_store(&alpha_doc(), &expand_all());
    let op_b = store.get_item_by_id("operation/opb");
    store.activate(op_b, true, false);
    let writes = history.writes.borrow().len();

    store.update_on_scroll(true);
    assert_eq!(store.active_item().unwrap().id, "operation/opb");
    assert_eq!(history.writes.borrow().len(), writes, "re-activation is a no-op");
}

#[test]
fn scroll_down_skips_hidden_candidates() {
    let (mut store, history, viewport) = make_store(&alpha_doc(), &expand_all());
    let op_a = store.get_item_by_id("operation/opa");
    store.activate(op_a, true, false);

    // everything from position 4 onward is below the fold; positions 3 and 4
    // (the oneOf fields) are hidden because pet is collapsed, so the scan
    // settles on limit at position 5
    viewport.below_at.set(4);
    store.update_on_scroll(true);
    assert_eq!(store.active_item().unwrap().id, "operation/opa/limit");
    let last = history.writes.borrow().last().cloned().unwrap();
    assert_eq!(last, ("operation/opa/limit".to_string(), true));
}

#[test]
fn scroll_up_steps_back_to_the_previous_item() {
    let (mut store, _, viewport) = make_store(&alpha_doc(), &expand_all());
    let limit = store.get_item_by_id("operation/opa/limit");
    store.activate(limit, true, false);

    let pet = handle(&store, "operation/opa/pet");
    store.tree_mut().node_mut(pet).toggle();

    // position 5 is above the viewport edge, so the active item backs up to
    // the first candidate whose predecessor is visible
    viewport.above_at.set(5);
    store.update_on_scroll(false);
    assert_eq!(store.active_item().unwrap().id, "operation/opa/pet/schema/oneof/1/bark");
}

#[test]
fn scroll_up_past_the_top_clears_the_location() {
    let (mut store, history, viewport) = make_store(&alpha_doc(), &expand_all());
    let op_a = store.get_item_by_id("operation/opa");
    store.activate(op_a, true, false);

    viewport.above_at.set(-1);
    store.update_on_scroll(false);
    assert_eq!(store.active_idx(), None);
    assert_eq!(*history.current.borrow(), "");
    let last = history.writes.borrow().last().cloned().unwrap();
    assert_eq!(last, (String::new(), true));
}

#[test]
fn dispose_detaches_idempotently() {
    let (mut store, history, _) = make_store(&alpha_doc(), &expand_all());
    let op_a = store.get_item_by_id("operation/opa");
    store.activate(op_a, true, false);
    let writes = history.writes.borrow().len();

    store.dispose();
    assert!(!store.is_attached());
    store.update_on_scroll(true);
    store.update_on_history(Some("operation/opb"));
    assert_eq!(store.active_item().unwrap().id, "operation/opa");
    assert_eq!(history.writes.borrow().len(), writes);
    store.dispose();
}

#[test]
fn static_scroll_helper_targets_the_raw_id() {
    let viewport = Viewport::default();
    let mut surface = TestSurface(viewport.clone());
    MenuStore::scroll_to_hash(&mut surface, "operation/opa");
    MenuStore::scroll_to_hash(&mut surface, "");
    assert_eq!(*viewport.scrolled.borrow(), vec!["id:operation/opa".to_string()]);
}

#[test]
fn activate_and_scroll_re_resolves_and_scrolls() {
    let (mut store, _, viewport) = make_store(&alpha_doc(), &expand_all());
    store.toggle_sidebar();

    let op_a = store.get_item_by_id("operation/opa");
    store.activate_and_scroll(op_a, true, false);
    assert_eq!(store.active_item().unwrap().id, "operation/opa");
    assert!(viewport.scrolled.borrow().contains(&"el:1".to_string()));
    assert!(store.sidebar_open(), "items with children keep the sidebar open");

    let op_b = store.get_item_by_id("operation/opb");
    store.activate_and_scroll(op_b, true, false);
    assert!(viewport.scrolled.borrow().contains(&"el:10".to_string()));
    assert!(!store.sidebar_open(), "leaf items close the sidebar");
}
