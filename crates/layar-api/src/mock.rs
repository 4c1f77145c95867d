//! Built-in catalog: the lowest-priority source in the chain.
//!
//! Serves a static dataset compiled into the binary, so it can neither
//! fail nor block — which is what guarantees the resolver always
//! terminates with something to show.

use std::sync::OnceLock;

use async_trait::async_trait;
use layar_core::models::{Show, ShowDetails};

use crate::error::SourceError;
use crate::source::{ContentSource, ListRequest};

const CATALOG: &str = include_str!("../data/catalog.json");

fn dataset() -> &'static [Show] {
    static SHOWS: OnceLock<Vec<Show>> = OnceLock::new();
    SHOWS.get_or_init(|| serde_json::from_str(CATALOG).expect("built-in catalog is valid JSON"))
}

/// Case-insensitive substring match against the fields a user would
/// type for: title, original title, overview, and genre names. This is
/// the dataset's own matching policy, not a general search layer.
fn matches_keyword(show: &Show, keyword: &str) -> bool {
    let keyword = keyword.to_lowercase();
    show.title.to_lowercase().contains(&keyword)
        || show.original_title.to_lowercase().contains(&keyword)
        || show.overview.to_lowercase().contains(&keyword)
        || show
            .genres
            .iter()
            .any(|g| g.name.to_lowercase().contains(&keyword))
}

#[derive(Default)]
pub struct BuiltinCatalog;

impl BuiltinCatalog {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentSource for BuiltinCatalog {
    fn name(&self) -> &'static str {
        "builtin-catalog"
    }

    async fn fetch_list(&self, request: &ListRequest) -> Result<Vec<Show>, SourceError> {
        let shows = match request {
            ListRequest::Trending { kind } => dataset()
                .iter()
                .filter(|s| s.show_type == *kind)
                .cloned()
                .collect(),
            ListRequest::Search { keyword } => dataset()
                .iter()
                .filter(|s| matches_keyword(s, keyword))
                .cloned()
                .collect(),
            ListRequest::ByGenre { genre_id, kind } => dataset()
                .iter()
                .filter(|s| s.show_type == *kind && s.genres.iter().any(|g| g.id == *genre_id))
                .cloned()
                .collect(),
        };
        Ok(shows)
    }

    async fn fetch_details(&self, id: &str) -> Result<Option<ShowDetails>, SourceError> {
        Ok(dataset().iter().find(|s| s.id == id).cloned().map(Into::into))
    }
}
