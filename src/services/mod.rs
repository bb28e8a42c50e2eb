pub mod catalog;
pub mod search_client;

pub use catalog::Catalog;
pub use search_client::{HttpSearchEndpoint, SearchEndpoint};
