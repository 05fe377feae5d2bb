pub mod client;
pub mod error;
pub mod types;

pub use client::{image_url, TmdbClient};
pub use error::TmdbError;
