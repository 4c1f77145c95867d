//! Static genre taxonomy used for browse filters and request validation.

use crate::models::Genre;

/// The closed set of genres the catalog understands, as `(id, name)`.
pub const GENRES: &[(&str, &str)] = &[
    ("action", "Action"),
    ("adventure", "Adventure"),
    ("animation", "Animation"),
    ("comedy", "Comedy"),
    ("crime", "Crime"),
    ("documentary", "Documentary"),
    ("drama", "Drama"),
    ("family", "Family"),
    ("fantasy", "Fantasy"),
    ("history", "History"),
    ("horror", "Horror"),
    ("music", "Music"),
    ("mystery", "Mystery"),
    ("romance", "Romance"),
    ("scifi", "Sci-Fi"),
    ("thriller", "Thriller"),
    ("war", "War"),
    ("western", "Western"),
];

pub fn genre_by_id(id: &str) -> Option<Genre> {
    GENRES.iter().find(|(gid, _)| *gid == id).map(|(gid, name)| Genre {
        id: (*gid).to_string(),
        name: (*name).to_string(),
    })
}

/// Display name for a genre id, falling back to the raw id.
pub fn genre_name(id: &str) -> String {
    genre_by_id(id).map(|g| g.name).unwrap_or_else(|| id.to_string())
}

pub fn is_known_genre(id: &str) -> bool {
    GENRES.iter().any(|(gid, _)| *gid == id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_known_genre() {
        let genre = genre_by_id("scifi").unwrap();
        assert_eq!(genre.name, "Sci-Fi");
        assert!(is_known_genre("western"));
    }

    #[test]
    fn test_unknown_genre_falls_back_to_id() {
        assert!(genre_by_id("telenovela").is_none());
        assert!(!is_known_genre("telenovela"));
        assert_eq!(genre_name("telenovela"), "telenovela");
    }
}
