//! Canonical catalog schema shared by every content source.
//!
//! Each source normalizes its raw payload into these types, so the
//! resolver and the front-end stay source-agnostic. `Show` is a value
//! object: copied freely, never owned by another entity.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Art URL used when a source has no usable image.
pub const PLACEHOLDER_IMAGE: &str = "/placeholder.jpg";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShowType {
    #[default]
    Movie,
    Series,
}

impl ShowType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl std::fmt::Display for ShowType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Genre tag. Order within a show is irrelevant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub id: String,
    pub name: String,
}

/// Cast member, director, or creator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub name: String,
}

/// Vertical poster art in the named resolutions the front-end renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosterSet {
    pub w240: String,
    pub w360: String,
    pub w480: String,
    pub w600: String,
    pub w720: String,
}

impl PosterSet {
    pub fn from_single(url: &str) -> Self {
        Self {
            w240: url.to_string(),
            w360: url.to_string(),
            w480: url.to_string(),
            w600: url.to_string(),
            w720: url.to_string(),
        }
    }
}

impl Default for PosterSet {
    fn default() -> Self {
        Self::from_single(PLACEHOLDER_IMAGE)
    }
}

/// Horizontal poster / backdrop art.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackdropSet {
    pub w360: String,
    pub w480: String,
    pub w720: String,
    pub w1080: String,
    pub w1440: String,
}

impl BackdropSet {
    pub fn from_single(url: &str) -> Self {
        Self {
            w360: url.to_string(),
            w480: url.to_string(),
            w720: url.to_string(),
            w1080: url.to_string(),
            w1440: url.to_string(),
        }
    }
}

impl Default for BackdropSet {
    fn default() -> Self {
        Self::from_single(PLACEHOLDER_IMAGE)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSet {
    #[serde(default)]
    pub vertical_poster: PosterSet,
    #[serde(default)]
    pub horizontal_poster: BackdropSet,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vertical_backdrop: Option<PosterSet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub horizontal_backdrop: Option<BackdropSet>,
}

impl ImageSet {
    /// Fan one image URL out to every named resolution. Real sources
    /// give us at most one poster (and sometimes one backdrop) per show.
    pub fn from_urls(poster: &str, backdrop: Option<&str>) -> Self {
        let poster = if poster.is_empty() {
            PLACEHOLDER_IMAGE
        } else {
            poster
        };
        let backdrop = backdrop.filter(|u| !u.is_empty()).unwrap_or(poster);
        Self {
            vertical_poster: PosterSet::from_single(poster),
            horizontal_poster: BackdropSet::from_single(backdrop),
            vertical_backdrop: None,
            horizontal_backdrop: None,
        }
    }
}

/// Streaming service descriptor attached to an offer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingService {
    pub id: String,
    pub name: String,
}

/// One streaming offer on a show, keyed per country on the show itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamingOption {
    pub service: StreamingService,
    #[serde(rename = "type")]
    pub kind: String,
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quality: Option<String>,
}

/// A catalog entry as rendered in browse rows.
///
/// `id` is opaque (a site slug or an external catalog id) and only
/// unique within one source's result set — the same title can carry
/// different ids on different sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Show {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub original_title: String,
    #[serde(default)]
    pub overview: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_air_year: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_air_year: Option<u16>,
    #[serde(default)]
    pub genres: Vec<Genre>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub directors: Vec<Person>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub cast: Vec<Person>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f32>,
    #[serde(default)]
    pub image_set: ImageSet,
    pub show_type: ShowType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub episode_count: Option<u32>,
    #[serde(default, skip_serializing_if = "HashMap::is_empty")]
    pub streaming_options: HashMap<String, Vec<StreamingOption>>,
}

impl Show {
    /// Display year: release year for movies, first air year for series.
    pub fn year(&self) -> Option<u16> {
        self.release_year.or(self.first_air_year)
    }
}

/// Detail-page payload: a show plus the fields only a detail fetch has.
/// Constructed fresh on every fetch and never cached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShowDetails {
    #[serde(flatten)]
    pub show: Show,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tagline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<u32>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub creators: Vec<Person>,
}

impl From<Show> for ShowDetails {
    fn from(show: Show) -> Self {
        Self {
            show,
            tagline: None,
            runtime: None,
            creators: Vec::new(),
        }
    }
}
