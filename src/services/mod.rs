pub mod browse;
pub mod catalog;
pub mod detail;
pub mod home_feed;
pub mod library;
pub mod paged_list;
pub mod preferences;
pub mod status;
#[cfg(test)]
pub(crate) mod test_support;

pub use browse::{BrowseDriver, BrowseFeed, BrowseSnapshot};
pub use catalog::{CatalogClient, ImageSize, ImageUrlBuilder, SortBy, TmdbClient};
pub use detail::{DetailSnapshot, DetailView};
pub use home_feed::{HomeFeed, HomeList, HomeSnapshot};
pub use library::{LibrarySnapshot, LibraryView};
pub use paged_list::{ListSnapshot, LoadOutcome};
pub use preferences::PreferenceStore;
pub use status::ViewStatus;
