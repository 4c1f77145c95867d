//! Plain-text rendering for terminal output.

use layar_core::genres;
use layar_core::models::{Show, ShowDetails};

pub fn print_shows(shows: &[Show]) {
    if shows.is_empty() {
        println!("(nothing found)");
        return;
    }
    for show in shows {
        let year = show
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "----".into());
        let rating = show
            .rating
            .map(|r| format!("{r:.1}"))
            .unwrap_or_else(|| "-.-".into());
        println!(
            "{:<24} {year}  {rating}  {} [{}]",
            show.id, show.title, show.show_type
        );
    }
}

pub fn print_details(details: &ShowDetails) {
    let show = &details.show;
    println!("{} [{}]", show.title, show.show_type);
    if show.original_title != show.title {
        println!("  original title: {}", show.original_title);
    }
    if let Some(tagline) = &details.tagline {
        println!("  {tagline}");
    }
    if let Some(year) = show.year() {
        println!("  year:    {year}");
    }
    if let Some(rating) = show.rating {
        println!("  rating:  {rating:.1}");
    }
    if let Some(runtime) = details.runtime {
        println!("  runtime: {runtime} min");
    }
    if let (Some(seasons), Some(episodes)) = (show.season_count, show.episode_count) {
        println!("  seasons: {seasons} ({episodes} episodes)");
    }
    if !show.genres.is_empty() {
        let names: Vec<String> = show
            .genres
            .iter()
            .map(|g| genres::genre_name(&g.id))
            .collect();
        println!("  genres:  {}", names.join(", "));
    }
    if !show.directors.is_empty() {
        let names: Vec<&str> = show.directors.iter().map(|p| p.name.as_str()).collect();
        println!("  directed by {}", names.join(", "));
    }
    if !show.cast.is_empty() {
        let names: Vec<&str> = show.cast.iter().map(|p| p.name.as_str()).collect();
        println!("  cast: {}", names.join(", "));
    }
    if !show.overview.is_empty() {
        println!();
        println!("  {}", show.overview);
    }
    for options in show.streaming_options.values() {
        for option in options {
            println!("  stream ({}): {}", option.service.name, option.link);
        }
    }
}
