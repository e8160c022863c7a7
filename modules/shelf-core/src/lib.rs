pub mod admin_form;
pub mod controller;
pub mod debounce;
pub mod facets;
pub mod filter;
pub mod preferences;

pub use admin_form::{AdminForm, FormMessage};
pub use controller::{LoadTicket, ViewController, LOAD_ERROR_MESSAGE};
pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use facets::{derive_facets, representative_url, Facets};
pub use filter::{filter_articles, filter_groups, locale_compare};
pub use preferences::{MemoryPreferenceStore, PreferenceStore};
