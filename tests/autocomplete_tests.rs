use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use bookfinder::{
    config::{Config, UiOptions},
    error::{MountError, SearchError},
    models::BookSummary,
    services::{HttpSearchEndpoint, SearchEndpoint},
    ui::{
        autocomplete::{ATTENTION_CLASS, ENTRANCE_CLASS},
        view::{
            COLLAB_TITLE_ID, CONTENT_TITLE_ID, DEVELOPER_CARD_CLASS, HYBRID_TITLE_ID,
            RECOMMEND_BUTTONS_ID, SEARCH_RESULTS_ID,
        },
        AutocompleteOutcome, ClickTarget, Element, MemoryDom, SearchAutocompleteUI, View,
    },
};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

// ============================================================================
// Helper Functions
// ============================================================================

/// Answers each query after its own delay, so tests can control arrival order
struct DelayedEndpoint {
    responses: HashMap<String, (Duration, Vec<BookSummary>)>,
}

impl DelayedEndpoint {
    fn new() -> Self {
        Self {
            responses: HashMap::new(),
        }
    }

    fn respond(mut self, query: &str, delay_ms: u64, titles: &[&str]) -> Self {
        let books = titles
            .iter()
            .map(|t| BookSummary::new(*t, "Frank Herbert", "/img/cover.jpg"))
            .collect();
        self.responses
            .insert(query.to_string(), (Duration::from_millis(delay_ms), books));
        self
    }
}

#[async_trait::async_trait]
impl SearchEndpoint for DelayedEndpoint {
    async fn search(&self, query: &str) -> Result<Vec<BookSummary>, SearchError> {
        let (delay, books) = self
            .responses
            .get(query)
            .cloned()
            .ok_or_else(|| SearchError::Network(format!("unexpected query {}", query)))?;
        tokio::time::sleep(delay).await;
        Ok(books)
    }
}

fn mount(
    dom: &Arc<MemoryDom>,
    endpoint: DelayedEndpoint,
    options: UiOptions,
) -> SearchAutocompleteUI {
    SearchAutocompleteUI::mount(dom.clone(), Arc::new(endpoint), options).unwrap()
}

fn type_text(dom: &MemoryDom, ui: &SearchAutocompleteUI, text: &str) {
    dom.set_value(ui.bindings().search_input, text);
}

fn rendered_titles(dom: &MemoryDom) -> Vec<String> {
    dom.by_id(SEARCH_RESULTS_ID)
        .unwrap()
        .rows
        .into_iter()
        .map(|b| b.title)
        .collect()
}

// ============================================================================
// Response Ordering
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_slow_earlier_response_is_dropped() {
    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = DelayedEndpoint::new()
        .respond("du", 300, &["Dune", "Dune Messiah", "Dubliners"])
        .respond("dune", 100, &["Dune", "Dune Messiah"]);
    let ui = mount(&dom, endpoint, UiOptions::default());

    type_text(&dom, &ui, "du");
    let first = ui.on_input();
    type_text(&dom, &ui, "dune");
    let second = ui.on_input();

    let (first, second) = tokio::join!(first, second);
    assert_eq!(second, AutocompleteOutcome::Rendered(2));
    assert_eq!(first, AutocompleteOutcome::Stale);
    assert_eq!(rendered_titles(&dom), vec!["Dune", "Dune Messiah"]);
}

#[tokio::test(start_paused = true)]
async fn test_in_order_responses_both_render() {
    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = DelayedEndpoint::new()
        .respond("du", 50, &["Dune", "Dubliners"])
        .respond("dun", 200, &["Dune"]);
    let ui = mount(&dom, endpoint, UiOptions::default());

    type_text(&dom, &ui, "du");
    let first = ui.on_input();
    type_text(&dom, &ui, "dun");
    let second = ui.on_input();

    let (first, second) = tokio::join!(first, second);
    assert_eq!(first, AutocompleteOutcome::Rendered(2));
    assert_eq!(second, AutocompleteOutcome::Rendered(1));
    assert_eq!(rendered_titles(&dom), vec!["Dune"]);
}

#[tokio::test(start_paused = true)]
async fn test_arrival_order_when_guard_disabled() {
    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = DelayedEndpoint::new()
        .respond("du", 300, &["Dune", "Dune Messiah", "Dubliners"])
        .respond("dune", 100, &["Dune", "Dune Messiah"]);
    let options = UiOptions {
        discard_stale_responses: false,
        ..UiOptions::default()
    };
    let ui = mount(&dom, endpoint, options);

    type_text(&dom, &ui, "du");
    let first = ui.on_input();
    type_text(&dom, &ui, "dune");
    let second = ui.on_input();

    let (first, _) = tokio::join!(first, second);
    assert_eq!(first, AutocompleteOutcome::Rendered(3));
    assert_eq!(
        rendered_titles(&dom),
        vec!["Dune", "Dune Messiah", "Dubliners"]
    );
}

#[tokio::test(start_paused = true)]
async fn test_response_after_clearing_input_stays_hidden() {
    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = DelayedEndpoint::new().respond("du", 100, &["Dune"]);
    let ui = mount(&dom, endpoint, UiOptions::default());

    type_text(&dom, &ui, "du");
    let pending = ui.on_input();
    type_text(&dom, &ui, "d");
    assert_eq!(ui.on_input().await, AutocompleteOutcome::TooShort);

    assert_eq!(pending.await, AutocompleteOutcome::Stale);
    assert!(!dom.by_id(SEARCH_RESULTS_ID).unwrap().visible);
}

#[tokio::test(start_paused = true)]
async fn test_pending_response_does_not_reopen_after_selection() {
    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = DelayedEndpoint::new()
        .respond("du", 50, &["Dune"])
        .respond("dun", 300, &["Dune Messiah"]);
    let ui = mount(&dom, endpoint, UiOptions::default());

    type_text(&dom, &ui, "du");
    let first = ui.on_input();
    type_text(&dom, &ui, "dun");
    let second = ui.on_input();

    assert_eq!(first.await, AutocompleteOutcome::Rendered(1));
    assert!(ui.on_result_click(0).is_some());

    assert_eq!(second.await, AutocompleteOutcome::Stale);
    assert!(!dom.by_id(SEARCH_RESULTS_ID).unwrap().visible);
    assert_eq!(dom.value(ui.bindings().search_input), "Dune");
}

#[tokio::test(start_paused = true)]
async fn test_pending_response_does_not_reopen_after_outside_click() {
    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = DelayedEndpoint::new().respond("dune", 200, &["Dune"]);
    let ui = mount(&dom, endpoint, UiOptions::default());

    type_text(&dom, &ui, "dune");
    let pending = ui.on_input();
    let outside = ClickTarget::Element(ui.bindings().recommend_buttons);
    assert!(ui.on_document_click(outside));

    assert_eq!(pending.await, AutocompleteOutcome::Stale);
    assert!(!dom.by_id(SEARCH_RESULTS_ID).unwrap().visible);
}

// ============================================================================
// Page Load
// ============================================================================

#[tokio::test(start_paused = true)]
async fn test_restores_search_term_without_animation() {
    let dom = Arc::new(MemoryDom::search_page_with_value("  Dune "));
    let ui = mount(&dom, DelayedEndpoint::new(), UiOptions::default());

    for id in [HYBRID_TITLE_ID, COLLAB_TITLE_ID, CONTENT_TITLE_ID] {
        assert_eq!(dom.by_id(id).unwrap().value, "Dune");
    }
    let panel = dom.by_id(RECOMMEND_BUTTONS_ID).unwrap();
    assert!(panel.visible);
    assert!(!panel.has_class(ENTRANCE_CLASS));

    tokio::time::sleep(Duration::from_secs(2)).await;
    let button = dom.element(ui.bindings().hybrid_button).unwrap();
    assert!(!button.has_class(ATTENTION_CLASS));
}

#[tokio::test]
async fn test_blank_field_is_not_restored() {
    let dom = Arc::new(MemoryDom::search_page_with_value("   "));
    let ui = mount(&dom, DelayedEndpoint::new(), UiOptions::default());

    assert!(!dom.by_id(RECOMMEND_BUTTONS_ID).unwrap().visible);
    assert!(!ui.state().recommend_targets_visible);
}

#[tokio::test]
async fn test_developer_cards_are_staggered() {
    let dom = Arc::new(MemoryDom::search_page());
    let _ui = mount(&dom, DelayedEndpoint::new(), UiOptions::default());

    let delays: Vec<Option<Duration>> = dom
        .elements_by_class(DEVELOPER_CARD_CLASS)
        .into_iter()
        .map(|card| {
            let card = dom.element(card).unwrap();
            assert!(card.has_class(ENTRANCE_CLASS));
            card.animation_delay
        })
        .collect();

    assert_eq!(
        delays,
        vec![
            Some(Duration::ZERO),
            Some(Duration::from_millis(200)),
            Some(Duration::from_millis(400)),
        ]
    );
}

#[tokio::test]
async fn test_tooltips_activated() {
    let dom = Arc::new(MemoryDom::search_page());
    let _ui = mount(&dom, DelayedEndpoint::new(), UiOptions::default());

    let targets = dom.elements_with_attribute("data-bs-toggle", "tooltip");
    assert_eq!(targets.len(), 2);
    for target in targets {
        assert!(dom.element(target).unwrap().tooltip_active);
    }
}

#[tokio::test]
async fn test_mount_requires_search_field() {
    let dom = Arc::new(MemoryDom::new());
    dom.append(None, Element::new().with_class("btn-hybrid"));

    let endpoint = Arc::new(DelayedEndpoint::new());
    let result = SearchAutocompleteUI::mount(dom, endpoint, UiOptions::default());
    assert!(matches!(result, Err(MountError::MissingElement("book-search"))));
}

// ============================================================================
// Against a Live Endpoint
// ============================================================================

#[tokio::test]
async fn test_typing_then_picking_a_suggestion() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search_books"))
        .and(query_param("query", "du"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "Dune", "author": "Frank Herbert", "image_url": "/img/dune.jpg"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = HttpSearchEndpoint::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let ui = SearchAutocompleteUI::mount(dom.clone(), Arc::new(endpoint), UiOptions::default())
        .unwrap();

    type_text(&dom, &ui, "du");
    assert_eq!(ui.on_input().await, AutocompleteOutcome::Rendered(1));

    let list = dom.by_id(SEARCH_RESULTS_ID).unwrap();
    assert!(list.visible);
    assert_eq!(
        list.rows,
        vec![BookSummary::new("Dune", "Frank Herbert", "/img/dune.jpg")]
    );

    ui.on_result_click(0);
    assert_eq!(dom.value(ui.bindings().search_input), "Dune");
    assert!(!dom.by_id(SEARCH_RESULTS_ID).unwrap().visible);
    assert!(dom.by_id(RECOMMEND_BUTTONS_ID).unwrap().visible);
}

#[tokio::test]
async fn test_endpoint_failure_degrades_to_no_suggestions() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search_books"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let dom = Arc::new(MemoryDom::search_page());
    let endpoint = HttpSearchEndpoint::new(&server.uri(), Duration::from_secs(2)).unwrap();
    let ui = SearchAutocompleteUI::mount(dom.clone(), Arc::new(endpoint), UiOptions::default())
        .unwrap();

    type_text(&dom, &ui, "dune");
    let outcome = ui.on_input().await;
    assert!(matches!(
        outcome,
        AutocompleteOutcome::Failed(SearchError::InvalidResponse(_))
    ));
    assert!(!dom.by_id(SEARCH_RESULTS_ID).unwrap().visible);
    assert!(dom.element(ui.bindings().search_input).unwrap().notice.is_some());
}

#[tokio::test]
async fn test_mount_from_env_targets_configured_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search_books"))
        .and(query_param("query", "emma"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"title": "Emma", "author": "Jane Austen", "image_url": "/img/emma.jpg"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let config: Config = envy::from_iter(vec![
        ("SEARCH_ENDPOINT_URL".to_string(), server.uri()),
        ("REQUEST_TIMEOUT_SECS".to_string(), "2".to_string()),
    ])
    .unwrap();
    let dom = Arc::new(MemoryDom::search_page());
    let ui = SearchAutocompleteUI::mount_from_env(dom.clone(), &config).unwrap();

    type_text(&dom, &ui, "  emma ");
    assert_eq!(ui.on_input().await, AutocompleteOutcome::Rendered(1));
    assert_eq!(rendered_titles(&dom), vec!["Emma"]);
}
