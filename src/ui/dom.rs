//! In-memory `View`
//!
//! Keeps a flat arena of elements with parent links. Used to run the widget
//! headless and to observe what it did.

use std::collections::BTreeMap;
use std::time::Duration;

use parking_lot::RwLock;

use super::view::{
    ElementHandle, View, COLLAB_TITLE_ID, CONTENT_TITLE_ID, DEVELOPER_CARD_CLASS,
    HYBRID_BUTTON_CLASS, HYBRID_TITLE_ID, RECOMMEND_BUTTONS_ID, SEARCH_INPUT_ID,
    SEARCH_RESULTS_ID, TOOLTIP_ATTRIBUTE,
};
use crate::models::BookSummary;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub attributes: BTreeMap<String, String>,
    pub value: String,
    pub visible: bool,
    pub animation_delay: Option<Duration>,
    pub tooltip_active: bool,
    pub rows: Vec<BookSummary>,
    pub notice: Option<String>,
    parent: Option<ElementHandle>,
}

impl Default for Element {
    fn default() -> Self {
        Self {
            id: None,
            classes: Vec::new(),
            attributes: BTreeMap::new(),
            value: String::new(),
            visible: true,
            animation_delay: None,
            tooltip_active: false,
            rows: Vec::new(),
            notice: None,
            parent: None,
        }
    }
}

impl Element {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn parent(&self) -> Option<ElementHandle> {
        self.parent
    }
}

#[derive(Debug, Default)]
pub struct MemoryDom {
    elements: RwLock<Vec<Element>>,
    focused: RwLock<Option<ElementHandle>>,
}

impl MemoryDom {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the book search page: search field, suggestion list, the three
    /// recommendation forms behind a hidden button panel, three developer
    /// cards and two tooltip-bearing skill badges.
    pub fn search_page() -> Self {
        Self::search_page_with_value("")
    }

    /// Same page, with the search field already holding `value` as a browser
    /// does after navigating back.
    pub fn search_page_with_value(value: &str) -> Self {
        let dom = Self::new();

        let form = dom.append(None, Element::new().with_id("search-form"));
        dom.append(Some(form), Element::new().with_id(SEARCH_INPUT_ID).with_value(value));
        dom.append(Some(form), Element::new().with_id(SEARCH_RESULTS_ID).hidden());

        let panel = dom.append(None, Element::new().with_id(RECOMMEND_BUTTONS_ID).hidden());
        for (field, button) in [
            (HYBRID_TITLE_ID, HYBRID_BUTTON_CLASS),
            (COLLAB_TITLE_ID, "btn-collab"),
            (CONTENT_TITLE_ID, "btn-content"),
        ] {
            dom.append(Some(panel), Element::new().with_id(field));
            dom.append(Some(panel), Element::new().with_class(button));
        }

        let team = dom.append(None, Element::new().with_id("team"));
        for i in 0..3 {
            let card = dom.append(Some(team), Element::new().with_class(DEVELOPER_CARD_CLASS));
            if i < 2 {
                dom.append(
                    Some(card),
                    Element::new()
                        .with_class("skill-badge")
                        .with_attribute(TOOLTIP_ATTRIBUTE.0, TOOLTIP_ATTRIBUTE.1),
                );
            }
        }

        dom
    }

    pub fn append(&self, parent: Option<ElementHandle>, mut element: Element) -> ElementHandle {
        let mut elements = self.elements.write();
        element.parent = parent.filter(|p| p.0 < elements.len());
        elements.push(element);
        ElementHandle(elements.len() - 1)
    }

    /// Snapshot of an element's current state
    pub fn element(&self, handle: ElementHandle) -> Option<Element> {
        self.elements.read().get(handle.0).cloned()
    }

    pub fn by_id(&self, id: &str) -> Option<Element> {
        self.element_by_id(id).and_then(|h| self.element(h))
    }

    pub fn focused(&self) -> Option<ElementHandle> {
        *self.focused.read()
    }

    fn with_element(&self, handle: ElementHandle, f: impl FnOnce(&mut Element)) {
        if let Some(element) = self.elements.write().get_mut(handle.0) {
            f(element);
        }
    }
}

impl View for MemoryDom {
    fn element_by_id(&self, id: &str) -> Option<ElementHandle> {
        self.elements
            .read()
            .iter()
            .position(|e| e.id.as_deref() == Some(id))
            .map(ElementHandle)
    }

    fn elements_by_class(&self, class: &str) -> Vec<ElementHandle> {
        self.elements
            .read()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.has_class(class))
            .map(|(i, _)| ElementHandle(i))
            .collect()
    }

    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<ElementHandle> {
        self.elements
            .read()
            .iter()
            .enumerate()
            .filter(|(_, e)| e.attributes.get(name).map(String::as_str) == Some(value))
            .map(|(i, _)| ElementHandle(i))
            .collect()
    }

    fn contains(&self, ancestor: ElementHandle, node: ElementHandle) -> bool {
        let elements = self.elements.read();
        let mut current = Some(node);
        while let Some(handle) = current {
            if handle == ancestor {
                return true;
            }
            current = elements.get(handle.0).and_then(|e| e.parent);
        }
        false
    }

    fn value(&self, element: ElementHandle) -> String {
        self.elements
            .read()
            .get(element.0)
            .map(|e| e.value.clone())
            .unwrap_or_default()
    }

    fn set_value(&self, element: ElementHandle, value: &str) {
        self.with_element(element, |e| e.value = value.to_string());
    }

    fn focus(&self, element: ElementHandle) {
        if element.0 < self.elements.read().len() {
            *self.focused.write() = Some(element);
        }
    }

    fn set_visible(&self, element: ElementHandle, visible: bool) {
        self.with_element(element, |e| e.visible = visible);
    }

    fn add_class(&self, element: ElementHandle, class: &str) {
        self.with_element(element, |e| {
            if !e.has_class(class) {
                e.classes.push(class.to_string());
            }
        });
    }

    fn remove_class(&self, element: ElementHandle, class: &str) {
        self.with_element(element, |e| e.classes.retain(|c| c != class));
    }

    fn set_animation_delay(&self, element: ElementHandle, delay: Duration) {
        self.with_element(element, |e| e.animation_delay = Some(delay));
    }

    fn render_rows(&self, list: ElementHandle, rows: &[BookSummary]) {
        self.with_element(list, |e| e.rows = rows.to_vec());
    }

    fn set_notice(&self, element: ElementHandle, notice: Option<&str>) {
        self.with_element(element, |e| e.notice = notice.map(str::to_string));
    }

    fn activate_tooltip(&self, element: ElementHandle) {
        self.with_element(element, |e| e.tooltip_active = true);
    }
}
