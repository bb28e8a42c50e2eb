use std::time::Duration;

use crate::{error::MountError, models::BookSummary};

pub const SEARCH_INPUT_ID: &str = "book-search";
pub const SEARCH_RESULTS_ID: &str = "search-results";
pub const HYBRID_TITLE_ID: &str = "hybrid-book-title";
pub const COLLAB_TITLE_ID: &str = "collab-book-title";
pub const CONTENT_TITLE_ID: &str = "content-book-title";
pub const RECOMMEND_BUTTONS_ID: &str = "recommend-buttons";
pub const HYBRID_BUTTON_CLASS: &str = "btn-hybrid";
pub const DEVELOPER_CARD_CLASS: &str = "developer-card";
pub const TOOLTIP_ATTRIBUTE: (&str, &str) = ("data-bs-toggle", "tooltip");

/// Opaque reference to an element owned by a `View`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementHandle(pub usize);

/// The rendering surface the search widget drives
///
/// A browser binding maps these calls onto the DOM; `MemoryDom` keeps them in
/// memory. All methods are synchronous and must not block. Calls on a handle
/// the view does not know are ignored.
pub trait View: Send + Sync {
    fn element_by_id(&self, id: &str) -> Option<ElementHandle>;

    fn elements_by_class(&self, class: &str) -> Vec<ElementHandle>;

    fn elements_with_attribute(&self, name: &str, value: &str) -> Vec<ElementHandle>;

    /// True when `node` is `ancestor` or lies somewhere beneath it
    fn contains(&self, ancestor: ElementHandle, node: ElementHandle) -> bool;

    /// Current text of a form field
    fn value(&self, element: ElementHandle) -> String;

    fn set_value(&self, element: ElementHandle, value: &str);

    fn focus(&self, element: ElementHandle);

    fn set_visible(&self, element: ElementHandle, visible: bool);

    fn add_class(&self, element: ElementHandle, class: &str);

    fn remove_class(&self, element: ElementHandle, class: &str);

    fn set_animation_delay(&self, element: ElementHandle, delay: Duration);

    /// Replace the suggestion rows shown inside `list`, one row per book, in order
    fn render_rows(&self, list: ElementHandle, rows: &[BookSummary]);

    /// Show or clear a short non-blocking message attached to `element`
    fn set_notice(&self, element: ElementHandle, notice: Option<&str>);

    /// Hand the element to the toolkit's tooltip widget
    fn activate_tooltip(&self, element: ElementHandle);
}

/// Every element the widget touches, resolved once at mount
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bindings {
    pub search_input: ElementHandle,
    pub search_results: ElementHandle,
    /// Hidden form fields of the hybrid, collaborative and content forms
    pub dependent_fields: [ElementHandle; 3],
    pub recommend_buttons: ElementHandle,
    pub hybrid_button: ElementHandle,
    pub developer_cards: Vec<ElementHandle>,
    pub tooltip_targets: Vec<ElementHandle>,
}

impl Bindings {
    pub fn resolve(view: &dyn View) -> Result<Self, MountError> {
        let by_id = |id: &'static str| view.element_by_id(id).ok_or(MountError::MissingElement(id));

        let hybrid_button = view
            .elements_by_class(HYBRID_BUTTON_CLASS)
            .into_iter()
            .next()
            .ok_or(MountError::MissingClass(HYBRID_BUTTON_CLASS))?;

        Ok(Self {
            search_input: by_id(SEARCH_INPUT_ID)?,
            search_results: by_id(SEARCH_RESULTS_ID)?,
            dependent_fields: [
                by_id(HYBRID_TITLE_ID)?,
                by_id(COLLAB_TITLE_ID)?,
                by_id(CONTENT_TITLE_ID)?,
            ],
            recommend_buttons: by_id(RECOMMEND_BUTTONS_ID)?,
            hybrid_button,
            developer_cards: view.elements_by_class(DEVELOPER_CARD_CLASS),
            tooltip_targets: view.elements_with_attribute(TOOLTIP_ATTRIBUTE.0, TOOLTIP_ATTRIBUTE.1),
        })
    }
}
