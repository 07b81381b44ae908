mod fetcher;
pub mod sheets;

pub use fetcher::{FetchedResource, HttpFetcher, ResourceFetcher};
