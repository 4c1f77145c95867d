mod output;

use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, Subcommand};
use layar_api::playback::PlaybackSession;
use layar_api::proxy::ProxyCatalog;
use layar_api::resolver::Resolver;
use layar_api::source::ListRequest;
use layar_core::config::AppConfig;
use layar_core::genres;
use layar_core::models::ShowType;
use layar_core::mylist::{JsonFilePersistence, MyList};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "layar")]
#[command(about = "Browse the movie catalog from the terminal", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Trending shows
    Trending {
        /// List series instead of movies
        #[arg(long)]
        series: bool,
    },
    /// Search the catalog by keyword
    Search { keyword: String },
    /// Browse shows in a genre
    Genre {
        id: String,
        /// List series instead of movies
        #[arg(long)]
        series: bool,
    },
    /// Print the genre taxonomy
    Genres,
    /// Full details for one show
    Details { id: String },
    /// Manage the personal watchlist
    #[command(subcommand)]
    List(ListCommand),
    /// Print playback servers for a title
    Play {
        /// IMDb id, e.g. tt1375666
        id: String,
        /// Start from this server index instead of the first
        #[arg(long)]
        server: Option<usize>,
        /// Season number, for series
        #[arg(long, requires = "episode")]
        season: Option<u32>,
        /// Episode number, for series
        #[arg(long, requires = "season")]
        episode: Option<u32>,
    },
}

#[derive(Subcommand, Debug)]
enum ListCommand {
    /// Add a show by id
    Add { id: String },
    /// Remove a show by id
    Remove { id: String },
    /// Print the watchlist
    Show,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("layar=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let resolver = Resolver::from_config(&config);

    match cli.command {
        Command::Trending { series } => {
            let kind = kind_of(series);
            let shows = resolver.list(&ListRequest::trending(kind)).await;
            output::print_shows(&shows);
        }
        Command::Search { keyword } => {
            let request = ListRequest::search(&keyword).ok_or("search keyword is empty")?;
            let shows = resolver.list(&request).await;
            output::print_shows(&shows);
        }
        Command::Genre { id, series } => {
            let request = ListRequest::by_genre(&id, kind_of(series))
                .ok_or_else(|| format!("unknown genre {id:?}, see `layar genres`"))?;
            let shows = resolver.list(&request).await;
            output::print_shows(&shows);
        }
        Command::Genres => {
            for (id, name) in genres::GENRES {
                println!("{id:<12} {name}");
            }
        }
        Command::Details { id } => {
            let details = resolver
                .details(&id)
                .await
                .ok_or_else(|| format!("no source knows {id:?}"))?;
            output::print_details(&details);
        }
        Command::List(cmd) => run_list(cmd, &resolver).await?,
        Command::Play {
            id,
            server,
            season,
            episode,
        } => run_play(&config, &id, server, season.zip(episode)).await?,
    }
    Ok(())
}

fn kind_of(series: bool) -> ShowType {
    if series {
        ShowType::Series
    } else {
        ShowType::Movie
    }
}

async fn run_list(
    cmd: ListCommand,
    resolver: &Resolver,
) -> Result<(), Box<dyn std::error::Error>> {
    let persistence = JsonFilePersistence::new(AppConfig::mylist_path());
    let mut list = MyList::load(Box::new(persistence));

    match cmd {
        ListCommand::Add { id } => {
            // Resolve first so the stored entry carries full metadata.
            let details = resolver
                .details(&id)
                .await
                .ok_or_else(|| format!("no source knows {id:?}"))?;
            if list.add(details.show)? {
                println!("added {id}");
            } else {
                println!("{id} is already on the list");
            }
        }
        ListCommand::Remove { id } => {
            if list.remove(&id)? {
                println!("removed {id}");
            } else {
                println!("{id} was not on the list");
            }
        }
        ListCommand::Show => output::print_shows(list.shows()),
    }
    Ok(())
}

async fn run_play(
    config: &AppConfig,
    id: &str,
    server: Option<usize>,
    season_episode: Option<(u32, u32)>,
) -> Result<(), Box<dyn std::error::Error>> {
    let timeout = Duration::from_secs(config.playback.load_timeout_secs);
    let auto_advance = config.playback.auto_advance;

    let mut session = match season_episode {
        Some((season, episode)) => {
            PlaybackSession::for_episode(id, season, episode, timeout, auto_advance)?
        }
        None => PlaybackSession::for_movie(id, timeout, auto_advance)?,
    };
    if let Some(index) = server {
        session.select_server(index);
    }

    for (i, candidate) in session.candidates().iter().enumerate() {
        let marker = if i == session.current_index() { '>' } else { ' ' };
        println!(
            "{marker} [{i}] {} ({}) {}",
            candidate.provider, candidate.description, candidate.url
        );
    }

    // Movies sometimes have a direct stream on the proxy, which beats
    // any embed. Best effort; the embeds above are the baseline.
    if season_episode.is_none() {
        let proxy = ProxyCatalog::new(&config.sources);
        match proxy.stream_url(id).await {
            Ok(Some(url)) => println!("direct stream: {url}"),
            Ok(None) => {}
            Err(err) => tracing::debug!(id, %err, "no direct stream from proxy"),
        }
    }
    Ok(())
}
