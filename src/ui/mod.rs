pub mod autocomplete;
pub mod dom;
pub mod view;

pub use autocomplete::{AutocompleteOutcome, ClickTarget, SearchAutocompleteUI};
pub use dom::{Element, MemoryDom};
pub use view::{Bindings, ElementHandle, View};
