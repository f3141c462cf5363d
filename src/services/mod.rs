use serde::Serialize;

pub mod artist;
pub mod show;
pub mod venue;

/// Search response shape shared by venue and artist search.
#[derive(Debug, Serialize)]
pub struct SearchResults<T> {
    pub count: usize,
    pub data: Vec<T>,
}
