pub mod google_news;
pub mod tool;

pub use google_news::GoogleNewsLookup;
pub use tool::NewsSearchTool;

pub mod prelude {
    pub use super::{GoogleNewsLookup, NewsSearchTool};
    pub use nr_core::{LookupItem, NewsLookup};
}
