//! Client for the community proxy catalog API (JSON over REST).
//!
//! The upstream is loosely typed: numbers arrive as numbers or strings
//! depending on the deployment, genres as plain strings or objects, and
//! most fields are optional. The raw record type absorbs all of that
//! and the normalizer maps it into the canonical schema.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use layar_core::config::SourcesConfig;
use layar_core::models::{
    Genre, ImageSet, Person, Show, ShowDetails, ShowType, StreamingOption, StreamingService,
};
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::SourceError;
use crate::source::{ContentSource, ListRequest};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ProxyCatalog {
    base_url: String,
    api_key: String,
    api_host: String,
    http: Client,
}

impl ProxyCatalog {
    pub fn new(sources: &SourcesConfig) -> Self {
        Self {
            base_url: sources.proxy_api_url.trim_end_matches('/').to_string(),
            api_key: sources.api_key.clone(),
            api_host: sources.api_host.clone(),
            http: Client::new(),
        }
    }

    fn request(&self, path: &str) -> reqwest::RequestBuilder {
        let mut req = self
            .http
            .get(format!("{}{}", self.base_url, path))
            .timeout(REQUEST_TIMEOUT);
        if !self.api_key.is_empty() && !self.api_host.is_empty() {
            req = req
                .header("X-RapidAPI-Key", &self.api_key)
                .header("X-RapidAPI-Host", &self.api_host);
        }
        req
    }

    async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, SourceError> {
        if resp.status().is_success() {
            Ok(resp)
        } else {
            Err(SourceError::Status(resp.status()))
        }
    }

    async fn fetch_results(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<Show>, SourceError> {
        let resp = self.request(path).query(query).send().await?;
        let resp = Self::check_response(resp).await?;
        let body: ListResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(body.results.into_iter().map(RawMovie::into_show).collect())
    }

    /// Direct stream URL for a movie, when the proxy has one.
    pub async fn stream_url(&self, id: &str) -> Result<Option<String>, SourceError> {
        let resp = self.request(&format!("/movie/{id}/stream")).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check_response(resp).await?;
        let body: StreamResponse = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        Ok(body.into_url())
    }
}

#[async_trait]
impl ContentSource for ProxyCatalog {
    fn name(&self) -> &'static str {
        "proxy-api"
    }

    async fn fetch_list(&self, request: &ListRequest) -> Result<Vec<Show>, SourceError> {
        match request {
            ListRequest::Trending { kind } => {
                // The proxy indexes movies only; series requests fall
                // through to the next source.
                if *kind == ShowType::Series {
                    return Ok(Vec::new());
                }
                self.fetch_results("/movies", &[("page", "1")]).await
            }
            ListRequest::Search { keyword } => {
                self.fetch_results("/search", &[("q", keyword)]).await
            }
            ListRequest::ByGenre { genre_id, kind } => {
                if *kind == ShowType::Series {
                    return Ok(Vec::new());
                }
                self.fetch_results("/movies/genre", &[("genre", genre_id), ("page", "1")])
                    .await
            }
        }
    }

    async fn fetch_details(&self, id: &str) -> Result<Option<ShowDetails>, SourceError> {
        let resp = self.request(&format!("/movie/{id}")).send().await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let resp = Self::check_response(resp).await?;
        let raw: RawMovie = resp
            .json()
            .await
            .map_err(|e| SourceError::Parse(e.to_string()))?;
        let details = raw.into_details();
        if details.show.title.is_empty() {
            return Ok(None);
        }
        Ok(Some(details))
    }
}

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<RawMovie>,
}

#[derive(Debug, Deserialize)]
struct StreamResponse {
    #[serde(rename = "streamUrl")]
    stream_url: Option<String>,
}

impl StreamResponse {
    /// An empty `streamUrl` means the proxy has no direct stream.
    fn into_url(self) -> Option<String> {
        self.stream_url.filter(|u| !u.is_empty())
    }
}

/// A movie record as the proxy returns it.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawMovie {
    id: Option<String>,
    slug: Option<String>,
    title: Option<String>,
    synopsis: Option<String>,
    description: Option<String>,
    year: Option<serde_json::Value>,
    rating: Option<serde_json::Value>,
    genres: Vec<serde_json::Value>,
    directors: Vec<String>,
    cast: Vec<String>,
    poster: Option<String>,
    thumbnail: Option<String>,
    backdrop: Option<String>,
    streaming_url: Option<String>,
    tagline: Option<String>,
    duration: Option<serde_json::Value>,
}

impl RawMovie {
    fn into_show(self) -> Show {
        let id = self.id.or(self.slug).unwrap_or_default();
        let title = self.title.unwrap_or_default();
        let overview = self.synopsis.or(self.description).unwrap_or_default();
        let poster = self.poster.or(self.thumbnail).unwrap_or_default();

        let mut streaming_options = HashMap::new();
        if let Some(link) = self.streaming_url.filter(|u| !u.is_empty()) {
            streaming_options.insert(
                "id".to_string(),
                vec![StreamingOption {
                    service: StreamingService {
                        id: "lk21".into(),
                        name: "LK21".into(),
                    },
                    kind: "stream".into(),
                    link,
                    quality: None,
                }],
            );
        }

        Show {
            id,
            original_title: title.clone(),
            title,
            overview,
            release_year: self.year.as_ref().and_then(value_to_year),
            first_air_year: None,
            last_air_year: None,
            genres: self.genres.iter().filter_map(genre_from_value).collect(),
            directors: self.directors.iter().map(person_from_name).collect(),
            cast: self.cast.iter().map(person_from_name).collect(),
            rating: self.rating.as_ref().and_then(value_to_f32),
            image_set: ImageSet::from_urls(&poster, self.backdrop.as_deref()),
            show_type: ShowType::Movie,
            season_count: None,
            episode_count: None,
            streaming_options,
        }
    }

    fn into_details(mut self) -> ShowDetails {
        let tagline = self.tagline.take().filter(|t| !t.is_empty());
        let runtime = self.duration.as_ref().and_then(value_to_u32);
        ShowDetails {
            show: self.into_show(),
            tagline,
            runtime,
            creators: Vec::new(),
        }
    }
}

fn person_from_name(name: &String) -> Person {
    Person {
        id: name.clone(),
        name: name.clone(),
    }
}

/// Genres arrive either as `"Action"` or `{"id": "action", "name": "Action"}`.
fn genre_from_value(value: &serde_json::Value) -> Option<Genre> {
    match value {
        serde_json::Value::String(name) => Some(Genre {
            id: name.to_lowercase(),
            name: name.clone(),
        }),
        serde_json::Value::Object(map) => {
            let name = map.get("name")?.as_str()?.to_string();
            let id = map
                .get("id")
                .and_then(|v| v.as_str())
                .map(str::to_string)
                .unwrap_or_else(|| name.to_lowercase());
            Some(Genre { id, name })
        }
        _ => None,
    }
}

fn value_to_f32(value: &serde_json::Value) -> Option<f32> {
    match value {
        serde_json::Value::Number(n) => n.as_f64().map(|f| f as f32),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_u32(value: &serde_json::Value) -> Option<u32> {
    match value {
        serde_json::Value::Number(n) => n.as_u64().and_then(|v| u32::try_from(v).ok()),
        serde_json::Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn value_to_year(value: &serde_json::Value) -> Option<u16> {
    value_to_u32(value).and_then(|v| u16::try_from(v).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalizes_string_typed_fields() {
        let raw: RawMovie = serde_json::from_str(
            r#"{
                "slug": "the-raid-2011",
                "title": "The Raid",
                "description": "A S.W.A.T. team becomes trapped in a tenement.",
                "year": "2011",
                "rating": "7.6",
                "genres": ["Action", "Crime"],
                "poster": "//img.example/raid.jpg"
            }"#,
        )
        .unwrap();

        let show = raw.into_show();
        assert_eq!(show.id, "the-raid-2011");
        assert_eq!(show.release_year, Some(2011));
        assert_eq!(show.rating, Some(7.6));
        assert_eq!(show.genres[0].id, "action");
        assert_eq!(show.genres[1].name, "Crime");
        assert_eq!(show.overview, "A S.W.A.T. team becomes trapped in a tenement.");
    }

    #[test]
    fn test_normalizes_object_genres_and_id_field() {
        let raw: RawMovie = serde_json::from_str(
            r#"{
                "id": "tt1877830",
                "title": "The Batman",
                "synopsis": "Vigilante in year two.",
                "year": 2022,
                "rating": 7.8,
                "genres": [{"id": "crime", "name": "Crime"}],
                "directors": ["Matt Reeves"],
                "cast": ["Robert Pattinson"]
            }"#,
        )
        .unwrap();

        let show = raw.into_show();
        assert_eq!(show.id, "tt1877830");
        assert_eq!(show.genres, vec![Genre { id: "crime".into(), name: "Crime".into() }]);
        assert_eq!(show.directors[0].name, "Matt Reeves");
        assert_eq!(show.cast[0].name, "Robert Pattinson");
    }

    #[test]
    fn test_missing_art_becomes_placeholder() {
        let raw: RawMovie =
            serde_json::from_str(r#"{"id": "x", "title": "No Art"}"#).unwrap();
        let show = raw.into_show();
        assert_eq!(
            show.image_set.vertical_poster.w240,
            layar_core::models::PLACEHOLDER_IMAGE
        );
    }

    #[test]
    fn test_streaming_url_maps_to_offer() {
        let raw: RawMovie = serde_json::from_str(
            r#"{"id": "x", "title": "T", "streamingUrl": "https://cdn.example/x.m3u8"}"#,
        )
        .unwrap();
        let show = raw.into_show();
        let offers = show.streaming_options.get("id").unwrap();
        assert_eq!(offers[0].service.id, "lk21");
        assert_eq!(offers[0].kind, "stream");
        assert_eq!(offers[0].link, "https://cdn.example/x.m3u8");
    }

    #[test]
    fn test_details_carry_tagline_and_runtime() {
        let raw: RawMovie = serde_json::from_str(
            r#"{"id": "x", "title": "T", "tagline": "Unmask the truth.", "duration": "176"}"#,
        )
        .unwrap();
        let details = raw.into_details();
        assert_eq!(details.tagline.as_deref(), Some("Unmask the truth."));
        assert_eq!(details.runtime, Some(176));
    }

    #[test]
    fn test_list_response_tolerates_missing_results() {
        let body: ListResponse = serde_json::from_str("{}").unwrap();
        assert!(body.results.is_empty());
    }

    #[test]
    fn test_stream_response_shapes() {
        let body: StreamResponse =
            serde_json::from_str(r#"{"streamUrl": "https://cdn.example/x.m3u8"}"#).unwrap();
        assert_eq!(body.into_url().as_deref(), Some("https://cdn.example/x.m3u8"));

        let body: StreamResponse = serde_json::from_str(r#"{"streamUrl": ""}"#).unwrap();
        assert!(body.into_url().is_none());

        let body: StreamResponse = serde_json::from_str(r#"{"streamUrl": null}"#).unwrap();
        assert!(body.into_url().is_none());

        let body: StreamResponse = serde_json::from_str("{}").unwrap();
        assert!(body.into_url().is_none());
    }
}
