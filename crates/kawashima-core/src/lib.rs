pub mod annotations;
pub mod config;
pub mod error;
pub mod focus;
pub mod session;
pub mod sort;

pub use session::DiscoverySession;
pub use sort::SortKey;
