//! Astra DB access: secure connect bundle parsing and the Data API client

pub mod bundle;
pub mod store;

pub use bundle::{data_api_endpoint, read_bundle, BundleConfig};
pub use store::AstraVectorStore;
