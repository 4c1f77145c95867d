//! The contract every content source implements.
//!
//! Sources normalize their raw payloads into the canonical schema
//! before returning, so the resolver never sees source-specific shapes.

use async_trait::async_trait;
use layar_core::genres;
use layar_core::models::{Show, ShowDetails, ShowType};

use crate::error::SourceError;

/// A list request the resolver can satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRequest {
    Trending { kind: ShowType },
    Search { keyword: String },
    ByGenre { genre_id: String, kind: ShowType },
}

impl ListRequest {
    pub fn trending(kind: ShowType) -> Self {
        Self::Trending { kind }
    }

    /// Search request. The keyword is trimmed; empty input is rejected.
    pub fn search(keyword: &str) -> Option<Self> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return None;
        }
        Some(Self::Search {
            keyword: keyword.to_string(),
        })
    }

    /// Genre browse request. The id must be in the genre taxonomy.
    pub fn by_genre(genre_id: &str, kind: ShowType) -> Option<Self> {
        if !genres::is_known_genre(genre_id) {
            return None;
        }
        Some(Self::ByGenre {
            genre_id: genre_id.to_string(),
            kind,
        })
    }

    /// Short label for diagnostics.
    pub fn describe(&self) -> String {
        match self {
            Self::Trending { kind } => format!("trending({kind})"),
            Self::Search { keyword } => format!("search({keyword})"),
            Self::ByGenre { genre_id, kind } => format!("genre({genre_id}, {kind})"),
        }
    }
}

/// One upstream content provider the resolver can query.
#[async_trait]
pub trait ContentSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch_list(&self, request: &ListRequest) -> Result<Vec<Show>, SourceError>;

    /// `Ok(None)` means the source answered but does not know the id.
    async fn fetch_details(&self, id: &str) -> Result<Option<ShowDetails>, SourceError>;
}
