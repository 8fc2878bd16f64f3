pub mod error;
pub mod fetcher;
pub mod knmi;
pub mod store;
