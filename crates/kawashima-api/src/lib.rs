//! Movie catalog service clients.

pub mod tmdb;
pub mod traits;
