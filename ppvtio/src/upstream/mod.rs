pub mod client;
pub mod types;

pub use client::{UpstreamClient, UpstreamConfig};
pub use types::{CategoryGroup, StreamItem, StreamListing};
