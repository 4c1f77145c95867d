//! HTML scraper for the LK21 movie site and its drama mirror.
//!
//! `scraper::Html` is not `Send`, so all parsing happens in synchronous
//! free functions after the response body has been fetched; nothing
//! holds a parsed document across an await point.

use async_trait::async_trait;
use layar_core::config::SourcesConfig;
use layar_core::models::{Genre, ImageSet, Show, ShowDetails, ShowType};
use reqwest::{header, Client, StatusCode};
use scraper::{Html, Selector};

use crate::error::SourceError;
use crate::source::{ContentSource, ListRequest};

// The site serves a trimmed page to clients it does not recognize.
const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

const TRENDING_LIMIT: usize = 20;

pub struct Lk21Scraper {
    movie_url: String,
    series_url: String,
    http: Client,
}

impl Lk21Scraper {
    pub fn new(sources: &SourcesConfig) -> Self {
        Self {
            movie_url: sources.lk21_url.trim_end_matches('/').to_string(),
            series_url: sources.nontondrama_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    async fn fetch_html(&self, url: &str, query: &[(&str, &str)]) -> Result<String, SourceError> {
        let resp = self
            .http
            .get(url)
            .query(query)
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status()));
        }
        Ok(resp.text().await?)
    }
}

#[async_trait]
impl ContentSource for Lk21Scraper {
    fn name(&self) -> &'static str {
        "lk21"
    }

    async fn fetch_list(&self, request: &ListRequest) -> Result<Vec<Show>, SourceError> {
        match request {
            ListRequest::Trending { kind } => {
                let base = match kind {
                    ShowType::Movie => &self.movie_url,
                    ShowType::Series => &self.series_url,
                };
                let body = self.fetch_html(base, &[]).await?;
                parse_list(&body, *kind, Some(TRENDING_LIMIT))
            }
            ListRequest::Search { keyword } => {
                let body = self
                    .fetch_html(&self.movie_url, &[("s", keyword.as_str())])
                    .await?;
                parse_list(&body, ShowType::Movie, None)
            }
            ListRequest::ByGenre { genre_id, kind } => {
                let base = match kind {
                    ShowType::Movie => &self.movie_url,
                    ShowType::Series => &self.series_url,
                };
                let body = self
                    .fetch_html(&format!("{base}/genre/{genre_id}"), &[])
                    .await?;
                parse_list(&body, *kind, None)
            }
        }
    }

    async fn fetch_details(&self, id: &str) -> Result<Option<ShowDetails>, SourceError> {
        let resp = self
            .http
            .get(format!("{}/{}", self.movie_url, id))
            .header(header::USER_AGENT, USER_AGENT)
            .send()
            .await?;
        if resp.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !resp.status().is_success() {
            return Err(SourceError::Status(resp.status()));
        }
        let body = resp.text().await?;
        parse_details(&body, id)
    }
}

fn selector(css: &str) -> Result<Selector, SourceError> {
    Selector::parse(css).map_err(|e| SourceError::Parse(format!("bad selector {css:?}: {e}")))
}

/// Last path segment of a card link, which doubles as the show id.
fn slug_from_href(href: &str) -> Option<&str> {
    href.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|s| !s.is_empty())
}

/// Protocol-relative image URLs are common on the site.
fn normalize_image_url(url: &str) -> String {
    if let Some(rest) = url.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        url.to_string()
    }
}

fn parse_list(body: &str, kind: ShowType, limit: Option<usize>) -> Result<Vec<Show>, SourceError> {
    let card_sel = selector("article.item-infinite")?;
    let link_sel = selector("h2.entry-title a")?;
    let img_sel = selector("img")?;
    let rating_sel = selector(".gmr-rating-item")?;
    let year_sel = selector(".gmr-movie-on")?;

    let document = Html::parse_document(body);
    let mut shows = Vec::new();

    for card in document.select(&card_sel) {
        let Some(link) = card.select(&link_sel).next() else {
            continue;
        };
        let Some(id) = link.value().attr("href").and_then(slug_from_href) else {
            continue;
        };
        let title = link.text().collect::<String>().trim().to_string();
        if title.is_empty() {
            continue;
        }

        let poster = card
            .select(&img_sel)
            .next()
            .and_then(|img| img.value().attr("src"))
            .map(normalize_image_url)
            .unwrap_or_default();

        let rating = card
            .select(&rating_sel)
            .next()
            .and_then(|el| el.text().collect::<String>().trim().parse::<f32>().ok());

        let year = card
            .select(&year_sel)
            .next()
            .and_then(|el| el.text().collect::<String>().trim().parse::<u16>().ok());

        let mut show = Show {
            id: id.to_string(),
            title: title.clone(),
            original_title: title,
            rating,
            image_set: ImageSet::from_urls(&poster, None),
            show_type: kind,
            ..Default::default()
        };
        match kind {
            ShowType::Movie => show.release_year = year,
            ShowType::Series => show.first_air_year = year,
        }
        shows.push(show);

        if limit.is_some_and(|n| shows.len() >= n) {
            break;
        }
    }

    Ok(shows)
}

fn parse_details(body: &str, id: &str) -> Result<Option<ShowDetails>, SourceError> {
    let title_sel = selector("h1.entry-title")?;
    let poster_sel = selector(".gmr-movie-data img")?;
    let overview_sel = selector(".entry-content p")?;
    let rating_sel = selector(".gmr-rating-value")?;
    let genre_sel = selector(".gmr-movie-genre a")?;

    let document = Html::parse_document(body);

    let title = document
        .select(&title_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();
    // Error pages come back 200 with no title heading.
    if title.is_empty() {
        return Ok(None);
    }

    let poster = document
        .select(&poster_sel)
        .next()
        .and_then(|img| img.value().attr("src"))
        .map(normalize_image_url)
        .unwrap_or_default();

    let overview = document
        .select(&overview_sel)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
        .unwrap_or_default();

    let rating = document
        .select(&rating_sel)
        .next()
        .and_then(|el| el.text().collect::<String>().trim().parse::<f32>().ok());

    let genres = document
        .select(&genre_sel)
        .map(|el| {
            let name = el.text().collect::<String>().trim().to_string();
            Genre {
                id: name.to_lowercase(),
                name,
            }
        })
        .filter(|g| !g.name.is_empty())
        .collect();

    let show = Show {
        id: id.to_string(),
        title: title.clone(),
        original_title: title,
        overview,
        rating,
        genres,
        image_set: ImageSet::from_urls(&poster, None),
        show_type: ShowType::Movie,
        ..Default::default()
    };
    Ok(Some(show.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIST_FIXTURE: &str = r#"
        <html><body>
        <article class="item-infinite">
            <a href="/the-batman-2022/"><img src="//img.example/batman.jpg"></a>
            <h2 class="entry-title"><a href="https://tv.example/the-batman-2022/">The Batman</a></h2>
            <div class="gmr-rating-item">7.8</div>
            <div class="gmr-movie-on">2022</div>
        </article>
        <article class="item-infinite">
            <h2 class="entry-title"><a href="https://tv.example/serbuan-maut-2011/">The Raid</a></h2>
        </article>
        <article class="item-infinite">
            <h2 class="entry-title"><a>No Href Here</a></h2>
        </article>
        </body></html>
    "#;

    #[test]
    fn test_parse_list_extracts_cards() {
        let shows = parse_list(LIST_FIXTURE, ShowType::Movie, None).unwrap();
        assert_eq!(shows.len(), 2);

        assert_eq!(shows[0].id, "the-batman-2022");
        assert_eq!(shows[0].title, "The Batman");
        assert_eq!(shows[0].rating, Some(7.8));
        assert_eq!(shows[0].release_year, Some(2022));
        assert_eq!(
            shows[0].image_set.vertical_poster.w240,
            "https://img.example/batman.jpg"
        );

        // Sparse card still yields a usable entry.
        assert_eq!(shows[1].id, "serbuan-maut-2011");
        assert_eq!(shows[1].rating, None);
        assert_eq!(shows[1].release_year, None);
    }

    #[test]
    fn test_parse_list_respects_limit_and_kind() {
        let shows = parse_list(LIST_FIXTURE, ShowType::Series, Some(1)).unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].show_type, ShowType::Series);
        assert_eq!(shows[0].first_air_year, Some(2022));
        assert_eq!(shows[0].release_year, None);
    }

    #[test]
    fn test_parse_details_full_page() {
        let body = r#"
            <html><body>
            <h1 class="entry-title">The Batman (2022)</h1>
            <div class="gmr-movie-data"><img src="//img.example/batman-big.jpg"></div>
            <div class="entry-content"><p>Vigilante in year two.</p></div>
            <span class="gmr-rating-value">7.8</span>
            <div class="gmr-movie-genre">
                <a href="/genre/action/">Action</a>
                <a href="/genre/crime/">Crime</a>
            </div>
            </body></html>
        "#;
        let details = parse_details(body, "the-batman-2022").unwrap().unwrap();
        assert_eq!(details.show.id, "the-batman-2022");
        assert_eq!(details.show.title, "The Batman (2022)");
        assert_eq!(details.show.overview, "Vigilante in year two.");
        assert_eq!(details.show.rating, Some(7.8));
        assert_eq!(
            details.show.genres,
            vec![
                Genre { id: "action".into(), name: "Action".into() },
                Genre { id: "crime".into(), name: "Crime".into() },
            ]
        );
        assert_eq!(
            details.show.image_set.vertical_poster.w240,
            "https://img.example/batman-big.jpg"
        );
    }

    #[test]
    fn test_parse_details_without_title_is_none() {
        let body = "<html><body><p>Halaman tidak ditemukan</p></body></html>";
        assert!(parse_details(body, "whatever").unwrap().is_none());
    }

    #[test]
    fn test_slug_from_href() {
        assert_eq!(
            slug_from_href("https://tv.example/the-batman-2022/"),
            Some("the-batman-2022")
        );
        assert_eq!(slug_from_href("/inception-2010"), Some("inception-2010"));
        assert_eq!(slug_from_href(""), None);
        assert_eq!(slug_from_href("///"), None);
    }

    #[test]
    fn test_normalize_image_url() {
        assert_eq!(
            normalize_image_url("//img.example/a.jpg"),
            "https://img.example/a.jpg"
        );
        assert_eq!(
            normalize_image_url("https://img.example/a.jpg"),
            "https://img.example/a.jpg"
        );
    }
}
